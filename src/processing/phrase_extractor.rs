//! Candidate phrase and lemma extraction
//!
//! A small rule-based part-of-speech tagger feeds a noun chunker. Every
//! component that needs "candidate terms from free text" goes through
//! [`PhraseExtractor::extract`], so skill extraction, job-description parsing
//! and fuzzy matching all see the same phrases.

use crate::processing::text_processor::STOP_WORDS;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Lower-cased, lemmatized, deduplicated candidate phrases
pub type PhraseSet = BTreeSet<String>;

/// Chunks never span these boundaries
static CLAUSE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[,;:!?()\[\]{}|•\n\r\t/]|\.(?:\s|$)|\s[-–—]\s").expect("valid clause regex")
});

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w][\w+#.'\-]*[\w+#]|[\w]").expect("valid word regex")
});

/// Domain-generic words that look like nouns in every resume
static STOP_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "communication", "team", "work", "responsibilities", "skills", "development",
        "experience", "knowledge", "ability", "role", "scripting skills",
    ]
    .into_iter()
    .collect()
});

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "our", "their",
        "his", "her", "its", "some", "any", "each", "every", "all", "no", "several", "many",
        "both", "either", "neither", "another",
    ]
    .into_iter()
    .collect()
});

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "we", "you", "he", "she", "they", "it", "me", "us", "them", "him", "who", "whom",
        "which", "what", "myself", "ourselves", "yourself", "themselves",
    ]
    .into_iter()
    .collect()
});

static PREPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "in", "on", "at", "with", "for", "of", "to", "from", "by", "about", "into", "through",
        "across", "over", "under", "within", "without", "via", "per", "as", "like",
        "including", "between", "among", "during", "towards", "toward", "upon", "onto",
        "against", "than", "after", "before",
    ]
    .into_iter()
    .collect()
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["and", "or", "but", "nor", "so", "yet", "while", "whereas", "&", "plus", "if", "because"]
        .into_iter()
        .collect()
});

static AUXILIARIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "is", "are", "was", "were", "be", "been", "being", "am", "have", "has", "had", "do",
        "does", "did", "will", "would", "can", "could", "should", "may", "might", "must",
        "shall", "not",
    ]
    .into_iter()
    .collect()
});

/// Base forms of verbs common in resumes and postings
static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "develop", "build", "built", "design", "implement", "create", "maintain", "manage",
        "lead", "led", "work", "use", "utilize", "collaborate", "require", "seek", "join",
        "ensure", "support", "deliver", "drive", "write", "wrote", "improve", "optimize",
        "deploy", "analyze", "analyse", "own", "help", "mentor", "coordinate", "participate",
        "contribute", "architect", "automate", "migrate", "reduce", "increase", "launch",
        "ship", "integrate", "monitor", "troubleshoot", "resolve", "review", "apply",
        "provide", "conduct", "perform", "achieve", "establish", "define", "prepare",
        "communicate", "partner", "looking", "look", "hire", "offer", "gain", "learn",
        "earn", "complete", "graduate", "spearhead", "streamline", "scale", "enhance",
        "configure", "administer", "handle", "oversee", "execute", "plan", "present",
        "train", "test", "code", "research", "make", "get", "want", "need", "know",
    ]
    .into_iter()
    .collect()
});

/// Base verb forms that also name a thing ("ui design", "code review")
static NOUN_HOMOGRAPHS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "design", "support", "review", "test", "code", "lead", "build", "plan", "research",
        "monitor", "help", "partner", "launch", "scale", "architect", "mentor", "graduate",
        "hire", "offer",
    ]
    .into_iter()
    .collect()
});

/// `-ing` forms that name a field or activity rather than act as a verb
static GERUND_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "learning", "engineering", "testing", "programming", "computing", "networking",
        "marketing", "accounting", "training", "modeling", "modelling", "processing",
        "scripting", "debugging", "mining", "warehousing", "planning", "writing", "reporting",
        "budgeting", "forecasting", "designing", "troubleshooting", "monitoring", "logging",
        "caching", "auditing", "recruiting", "consulting", "banking", "manufacturing",
        "scheduling", "coding", "research",
    ]
    .into_iter()
    .collect()
});

static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "strong", "new", "senior", "junior", "good", "excellent", "solid", "proficient",
        "familiar", "responsible", "hands-on", "cross-functional", "fast", "large", "small",
        "high", "low", "modern", "key", "various", "relevant", "related", "complex",
        "robust", "deep", "great", "proven", "effective", "efficient", "advanced", "basic",
        "preferred", "required", "minimum", "multiple", "other", "top", "real", "remote",
        "full", "open", "best", "better", "quick", "main", "major", "current", "previous",
        "successful", "innovative", "detail-oriented", "self-motivated", "independent",
        "internal", "external", "global", "local", "technical", "professional",
    ]
    .into_iter()
    .collect()
});

/// Stop words that still behave as nouns inside a chunk
static STOP_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "system", "interest", "part", "bill", "name", "detail", "amount", "bottom", "top",
        "side", "front", "fire",
    ]
    .into_iter()
    .collect()
});

/// Plural-looking words whose singular is themselves
static INVARIANT_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "news", "series", "analytics", "statistics", "physics", "mathematics", "economics",
        "kubernetes", "aws", "graphics", "ethics", "logistics", "devops", "jenkins", "pandas",
        "sass", "less", "express", "business", "process", "access", "windows", "sales",
        "species", "ios", "css", "js", "redis", "postgres", "teams", "ads",
    ]
    .into_iter()
    .collect()
});

const ADJECTIVE_SUFFIXES: &[&str] = &["ive", "ous", "ful", "able", "ible", "less", "ical", "ish"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Determiner,
    Pronoun,
    Preposition,
    Conjunction,
    Auxiliary,
    Verb,
    Adverb,
    Adjective,
    Number,
    Noun,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedToken {
    pub text: String,
    pub lemma: String,
    pub tag: PosTag,
    pub is_stop: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PhraseExtractor;

impl PhraseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Noun chunks plus lemmatized standalone nouns, lower-cased and deduplicated
    pub fn extract(&self, text: &str) -> PhraseSet {
        let lowered = text.to_lowercase();
        let mut phrases = PhraseSet::new();

        for clause in CLAUSE_BREAK.split(&lowered) {
            let tokens = self.tag(clause);

            for chunk in Self::noun_chunks(&tokens) {
                if Self::is_candidate_chunk(&chunk) {
                    phrases.insert(chunk);
                }
            }

            for token in &tokens {
                if token.tag == PosTag::Noun
                    && !token.is_stop
                    && token.text.chars().count() > 3
                    && !STOP_PHRASES.contains(token.text.as_str())
                {
                    phrases.insert(token.lemma.clone());
                }
            }
        }

        phrases
    }

    /// Tag the words of a single lower-cased clause
    pub fn tag(&self, clause: &str) -> Vec<TaggedToken> {
        let words: Vec<&str> = WORD.find_iter(clause).map(|m| m.as_str()).collect();

        let mut tokens: Vec<TaggedToken> = words
            .iter()
            .map(|word| {
                let tag = Self::tag_word(word);
                let lemma = if tag == PosTag::Noun {
                    Self::singularize(word)
                } else {
                    (*word).to_string()
                };
                TaggedToken {
                    text: (*word).to_string(),
                    lemma,
                    tag,
                    is_stop: STOP_WORDS.contains(word),
                }
            })
            .collect();

        Self::resolve_homographs(&mut tokens);
        tokens
    }

    /// Retag verb/noun homographs as nouns when their neighbours call for a
    /// noun. Runs until stable so "code review is" resolves right to left.
    fn resolve_homographs(tokens: &mut [TaggedToken]) {
        loop {
            let mut changed = false;
            for i in 0..tokens.len() {
                let token = &tokens[i];
                if token.tag != PosTag::Verb || !NOUN_HOMOGRAPHS.contains(token.text.as_str()) {
                    continue;
                }

                let prev = i.checked_sub(1).map(|j| &tokens[j]);
                let next = tokens.get(i + 1);
                let after_infinitive = prev.is_some_and(|p| p.text == "to");

                // "the design", "strong design", "ui design"; a plural noun
                // before is a subject ("engineers design")
                let modified = prev.is_some_and(|p| match p.tag {
                    PosTag::Determiner | PosTag::Adjective | PosTag::Number => true,
                    PosTag::Noun => p.lemma == p.text,
                    _ => false,
                });
                let is_subject = next.is_some_and(|n| n.tag == PosTag::Auxiliary)
                    && !after_infinitive
                    && !prev.is_some_and(|p| matches!(p.tag, PosTag::Pronoun | PosTag::Auxiliary));
                let is_modifier = next.is_some_and(|n| n.tag == PosTag::Noun)
                    && prev.map_or(true, |p| p.tag == PosTag::Preposition && !after_infinitive);

                if modified || is_subject || is_modifier {
                    let token = &mut tokens[i];
                    token.tag = PosTag::Noun;
                    token.lemma = Self::singularize(&token.text);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn tag_word(word: &str) -> PosTag {
        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '+') {
            return PosTag::Number;
        }
        if DETERMINERS.contains(word) {
            return PosTag::Determiner;
        }
        if PRONOUNS.contains(word) {
            return PosTag::Pronoun;
        }
        if PREPOSITIONS.contains(word) {
            return PosTag::Preposition;
        }
        if CONJUNCTIONS.contains(word) {
            return PosTag::Conjunction;
        }
        if AUXILIARIES.contains(word) {
            return PosTag::Auxiliary;
        }
        if GERUND_NOUNS.contains(word) {
            return PosTag::Noun;
        }
        if Self::is_verb_form(word) {
            return PosTag::Verb;
        }
        if ADJECTIVES.contains(word) {
            return PosTag::Adjective;
        }
        if STOP_WORDS.contains(word) && !STOP_NOUNS.contains(word) {
            return PosTag::Other;
        }
        if word.len() > 4 && word.ends_with("ly") {
            return PosTag::Adverb;
        }
        if word.len() > 4 && word.ends_with("ed") {
            return PosTag::Adjective;
        }
        if word.len() > 5 && ADJECTIVE_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)) {
            return PosTag::Adjective;
        }
        PosTag::Noun
    }

    fn is_verb_form(word: &str) -> bool {
        if VERBS.contains(word) {
            return true;
        }

        let candidates = [
            word.strip_suffix("ing"),
            word.strip_suffix("ed"),
            word.strip_suffix('d'),
            word.strip_suffix("es"),
            word.strip_suffix('s'),
        ];
        if candidates.iter().flatten().any(|stem| VERBS.contains(stem)) {
            return true;
        }

        // "managing" -> "manage", "shipped" -> "ship"
        if let Some(stem) = word.strip_suffix("ing").or_else(|| word.strip_suffix("ed")) {
            if VERBS.contains(format!("{}e", stem).as_str()) {
                return true;
            }
            let mut chars = stem.chars();
            if let (Some(last), Some(prev)) = (chars.next_back(), chars.next_back()) {
                if last == prev && VERBS.contains(&stem[..stem.len() - last.len_utf8()]) {
                    return true;
                }
            }
        }

        false
    }

    /// Reduce a plural noun to its singular form
    pub fn singularize(word: &str) -> String {
        if INVARIANT_NOUNS.contains(word) || word.len() <= 3 {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() > 1 {
                return format!("{}y", stem);
            }
        }
        if word.ends_with("sses")
            || word.ends_with("ches")
            || word.ends_with("shes")
            || word.ends_with("xes")
            || word.ends_with("zes")
        {
            return word[..word.len() - 2].to_string();
        }
        if word.ends_with('s')
            && !word.ends_with("ss")
            && !word.ends_with("us")
            && !word.ends_with("is")
        {
            return word[..word.len() - 1].to_string();
        }
        word.to_string()
    }

    /// Maximal (determiner)? (adjective | number | noun)* noun spans
    fn noun_chunks(tokens: &[TaggedToken]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&TaggedToken> = Vec::new();

        for token in tokens {
            match token.tag {
                PosTag::Determiner => {
                    Self::flush_chunk(&mut current, &mut chunks);
                    current.push(token);
                }
                PosTag::Adjective | PosTag::Number | PosTag::Noun => current.push(token),
                _ => Self::flush_chunk(&mut current, &mut chunks),
            }
        }
        Self::flush_chunk(&mut current, &mut chunks);

        chunks
    }

    fn flush_chunk(current: &mut Vec<&TaggedToken>, chunks: &mut Vec<String>) {
        while current.last().is_some_and(|t| t.tag != PosTag::Noun) {
            current.pop();
        }
        if !current.is_empty() {
            let text = current
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            chunks.push(text);
        }
        current.clear();
    }

    fn is_candidate_chunk(phrase: &str) -> bool {
        let length = phrase.chars().count();
        length > 2
            && length < 50
            && phrase.matches(' ').count() <= 3
            && phrase.chars().any(|c| c.is_alphabetic())
            && !STOP_PHRASES.contains(phrase)
    }
}
