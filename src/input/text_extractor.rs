//! Text extraction from various file formats

use crate::error::{AtsError, Result};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

// Empty paragraphs are often self-closing and still count as a line.
static DOCX_PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*?)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>")
        .expect("valid paragraph regex")
});

static DOCX_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>").expect("valid run regex")
});

/// Plain text plus the page count the scorers need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

impl ExtractedText {
    pub fn new(text: String, page_count: usize) -> Self {
        Self { text, page_count }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            AtsError::PdfExtraction(format!("Failed to extract text from PDF: {}", e))
        })?;
        let page_count = pages.len();
        Ok(ExtractedText::new(pages.join("\n"), page_count))
    }
}

/// Reads `word/document.xml` out of the archive, one line per paragraph.
/// Word documents carry no reliable page count, so it is reported as 1.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| AtsError::DocxExtraction(format!("Not a valid DOCX archive: {}", e)))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| AtsError::DocxExtraction(format!("Missing document body: {}", e)))?
            .read_to_string(&mut xml)?;

        Ok(ExtractedText::new(Self::document_xml_to_text(&xml), 1))
    }
}

impl DocxExtractor {
    fn document_xml_to_text(xml: &str) -> String {
        let mut text = String::new();
        for paragraph in DOCX_PARAGRAPH.find_iter(xml) {
            for run in DOCX_RUN.captures_iter(paragraph.as_str()) {
                match run.get(1) {
                    Some(content) => text.push_str(&decode_entities(content.as_str())),
                    None if run[0].starts_with("<w:tab") => text.push('\t'),
                    None => text.push('\n'),
                }
            }
            text.push('\n');
        }
        text
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let content = String::from_utf8_lossy(bytes).into_owned();
        Ok(ExtractedText::new(content, 1))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(ExtractedText::new(self.html_to_text(&html_output), 1))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        let text = html.replace("<br>", "\n").replace("</p>", "\n\n");
        let clean_text = HTML_TAG.replace_all(&text, "");

        // keep blank lines between paragraphs, they matter to the formatting score
        let mut lines: Vec<String> = Vec::new();
        for line in clean_text.lines() {
            let trimmed = decode_entities(line.trim());
            if trimmed.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
            lines.push(trimmed);
        }

        lines.join("\n").trim().to_string()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Rust &amp; Python</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let extracted = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(extracted.page_count, 1);
        assert_eq!(extracted.text, "Jane Doe\nSkills: Rust & Python\n");
    }

    #[test]
    fn test_self_closing_paragraphs_are_blank_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Summary</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:r><w:t>Backend engineer</w:t></w:r></w:p>
            <w:p w:rsidR="00A1" w:rsidRDefault="00B2"/>
            <w:p w:rsidR="00C3"><w:r><w:t>Experience</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let extracted = DocxExtractor.extract(&build_docx(xml)).unwrap();
        assert_eq!(extracted.text, "Summary\n\nBackend engineer\n\nExperience\n");
    }

    #[test]
    fn test_blank_docx_paragraphs_reach_the_formatting_scorer() {
        use crate::processing::formatting::triggered_rules;

        let spaced = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p><w:p/>
            <w:p><w:r><w:t>Rust developer</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let dense = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p><w:r><w:t>Rust developer</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let rule_names = |xml: &str| -> Vec<&'static str> {
            let extracted = DocxExtractor.extract(&build_docx(xml)).unwrap();
            triggered_rules(&extracted.text, extracted.page_count)
                .iter()
                .map(|rule| rule.name)
                .collect()
        };

        assert!(!rule_names(spaced).contains(&"no blank line between paragraphs"));
        assert!(rule_names(dense).contains(&"no blank line between paragraphs"));
    }

    #[test]
    fn test_docx_rejects_non_archive() {
        let result = DocxExtractor.extract(b"definitely not a zip");
        assert!(matches!(result, Err(AtsError::DocxExtraction(_))));
    }

    #[test]
    fn test_markdown_is_flattened() {
        let md = "# Jane Doe\n\n**Software Engineer**\n\n- Rust\n- Go\n";
        let extracted = MarkdownExtractor.extract(md.as_bytes()).unwrap();

        assert!(extracted.text.contains("Jane Doe"));
        assert!(extracted.text.contains("Software Engineer"));
        assert!(!extracted.text.contains("**"));
        assert!(!extracted.text.contains('#'));
    }

    #[test]
    fn test_blank_detection() {
        assert!(PlainTextExtractor.extract(b"  \n\t ").unwrap().is_blank());
        assert!(!PlainTextExtractor.extract(b"resume").unwrap().is_blank());
    }
}
