//! Formatting quality heuristics
//!
//! The score starts at 100 and every rule in [`FORMATTING_RULES`] whose
//! predicate fires subtracts its penalty. Rules are independent of each other
//! and of their order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

const MONTHS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

static TABLE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<table|<tr|<td|<th|\|").expect("valid table regex"));

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"\b(?:{})\s+\d{{4}}\b", MONTHS),
        r"\b\d{2}/\d{4}\b".to_string(),
        r"\b\d{4}\b".to_string(),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid date regex"))
    .collect()
});

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-•]\s+").expect("valid bullet regex"));

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").expect("valid numbered regex"));

static HEADER_FOOTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)header|footer").expect("valid header regex"));

static DECORATIVE_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[✔★►→❖✨]").expect("valid symbol regex"));

static IMAGE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|jpg|jpeg|gif|svg)|<img").expect("valid image regex")
});

static EMPHASIS_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*{1,2}.*?\*{1,2}|_{1,2}.*?_{1,2}").expect("valid emphasis regex"));

static NON_ASCII: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]").expect("valid ascii regex"));

static MARKDOWN_EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\*\*|\*|__|_)[\w\s]+(\*\*|\*|__|_)").expect("valid markdown regex")
});

static NON_STANDARD_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s,.!?-]").expect("valid punctuation regex"));

pub const SECTION_HEADERS: [&str; 7] = [
    "education",
    "experience",
    "skills",
    "projects",
    "certifications",
    "contact",
    "summary",
];

/// Text and page count a rule predicate looks at
pub struct FormattingInput<'a> {
    pub text: &'a str,
    pub lowered: String,
    pub page_count: usize,
}

impl<'a> FormattingInput<'a> {
    pub fn new(text: &'a str, page_count: usize) -> Self {
        Self {
            text,
            lowered: text.to_lowercase(),
            page_count,
        }
    }
}

pub struct FormattingRule {
    pub name: &'static str,
    pub penalty: u32,
    pub applies: fn(&FormattingInput) -> bool,
}

pub static FORMATTING_RULES: &[FormattingRule] = &[
    FormattingRule {
        name: "more than two pages",
        penalty: 15,
        applies: |input| input.page_count > 2,
    },
    FormattingRule {
        name: "no blank line between paragraphs",
        penalty: 10,
        applies: |input| !input.text.contains("\n\n"),
    },
    FormattingRule {
        name: "table markup",
        penalty: 15,
        applies: |input| TABLE_MARKUP.is_match(input.text),
    },
    FormattingRule {
        name: "inconsistent date formats",
        penalty: 10,
        applies: |input| distinct_dates(input.text) > 1,
    },
    FormattingRule {
        name: "fewer than five list items",
        penalty: 10,
        applies: |input| {
            BULLET_LINE.find_iter(input.text).count() + NUMBERED_LINE.find_iter(input.text).count()
                < 5
        },
    },
    FormattingRule {
        name: "header or footer",
        penalty: 5,
        applies: |input| HEADER_FOOTER.is_match(input.text),
    },
    FormattingRule {
        name: "decorative symbols",
        penalty: 10,
        applies: |input| DECORATIVE_SYMBOL.is_match(input.text),
    },
    FormattingRule {
        name: "image references",
        penalty: 15,
        applies: |input| IMAGE_REFERENCE.is_match(input.text),
    },
    FormattingRule {
        name: "heavy emphasis markup",
        penalty: 10,
        applies: |input| EMPHASIS_SPAN.find_iter(input.text).count() > 5,
    },
    FormattingRule {
        name: "non-ASCII characters",
        penalty: 10,
        applies: |input| NON_ASCII.is_match(input.text),
    },
    FormattingRule {
        name: "markdown emphasis",
        penalty: 10,
        applies: |input| MARKDOWN_EMPHASIS.find_iter(input.text).count() > 10,
    },
    FormattingRule {
        name: "missing section headers",
        penalty: 10,
        applies: |input| missing_sections(&input.lowered) > 2,
    },
    FormattingRule {
        name: "non-standard punctuation",
        penalty: 10,
        applies: |input| NON_STANDARD_PUNCTUATION.find_iter(input.text).count() > 20,
    },
    FormattingRule {
        name: "word count outside 200-1500",
        penalty: 10,
        applies: |input| {
            let words = input.text.split_whitespace().count();
            !(200..=1500).contains(&words)
        },
    },
    FormattingRule {
        name: "repetitive wording",
        penalty: 10,
        applies: |input| repeated_words(input.text) > 5,
    },
];

fn distinct_dates(text: &str) -> usize {
    DATE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text).map(|m| m.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

pub fn missing_sections(lowered: &str) -> usize {
    SECTION_HEADERS
        .iter()
        .filter(|header| !lowered.contains(*header))
        .count()
}

/// Distinct words appearing more than ten times
fn repeated_words(text: &str) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts.values().filter(|&&count| count > 10).count()
}

/// Rules that fire for this text, in table order
pub fn triggered_rules(text: &str, page_count: usize) -> Vec<&'static FormattingRule> {
    let input = FormattingInput::new(text, page_count);
    FORMATTING_RULES
        .iter()
        .filter(|rule| (rule.applies)(&input))
        .collect()
}

/// Formatting score in [0, 100]
pub fn formatting_score(text: &str, page_count: usize) -> u32 {
    let penalty: u32 = triggered_rules(text, page_count)
        .iter()
        .map(|rule| rule.penalty)
        .sum();
    100u32.saturating_sub(penalty)
}
