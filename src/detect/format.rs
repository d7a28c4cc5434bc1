//! Structured-data-format and markup detection.

/// A detected structured data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    #[default]
    None,
    Json,
    Xml,
    Yaml,
    Csv,
    Toml,
    Ini,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataFormat::None => "None",
            DataFormat::Json => "JSON",
            DataFormat::Xml => "XML",
            DataFormat::Yaml => "YAML",
            DataFormat::Csv => "CSV",
            DataFormat::Toml => "TOML",
            DataFormat::Ini => "INI",
        };
        f.write_str(name)
    }
}

/// A detected markup language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupLang {
    #[default]
    None,
    Html,
    Markdown,
    Latex,
    Rtf,
    /// reStructuredText.
    Rest,
    AsciiDoc,
    /// Emacs Org-mode.
    Org,
}

impl std::fmt::Display for MarkupLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MarkupLang::None => "None",
            MarkupLang::Html => "HTML",
            MarkupLang::Markdown => "Markdown",
            MarkupLang::Latex => "LaTeX",
            MarkupLang::Rtf => "RTF",
            MarkupLang::Rest => "reST",
            MarkupLang::AsciiDoc => "AsciiDoc",
            MarkupLang::Org => "Org",
        };
        f.write_str(name)
    }
}

/// Identify structured data formats; first match wins.
pub(super) fn detect_data_format(text: &str) -> DataFormat {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return DataFormat::None;
    }

    // JSON: object/array opener plus quoted keys.
    if (trimmed.starts_with('{') || trimmed.starts_with('[')) && text.contains("\":") {
        return DataFormat::Json;
    }

    // XML: declaration, or closing tags without being HTML.
    if trimmed.starts_with('<') {
        if text.contains("<?xml") {
            return DataFormat::Xml;
        }
        if text.contains("</") && text.contains('>') {
            let lower = text.to_lowercase();
            if !lower.contains("<html") && !lower.contains("<!doctype html") {
                return DataFormat::Xml;
            }
        }
    }

    // YAML: key: value lines without JSON braces.
    if text.contains(": ")
        && !text.contains('{')
        && (trimmed.starts_with("---") || text.contains("\n  ") || text.contains("\n- "))
    {
        return DataFormat::Yaml;
    }

    // CSV: first two lines share a positive comma count.
    let mut lines = text.split('\n');
    if let (Some(first), Some(second)) = (lines.next(), lines.next()) {
        let commas = first.matches(',').count();
        if commas > 0 && commas == second.matches(',').count() && !first.contains('{') {
            return DataFormat::Csv;
        }
    }

    // TOML: [section] headers together with spaced assignments.
    if text.contains('[') && text.contains(']') && text.contains(" = ") {
        if text.contains("\n[") || trimmed.starts_with('[') {
            return DataFormat::Toml;
        }
    }

    // INI: like TOML but assignments need not be spaced.
    if text.contains('[') && text.contains('=') {
        if text.contains("\n[") || trimmed.starts_with('[') {
            return DataFormat::Ini;
        }
    }

    DataFormat::None
}

/// Identify markup languages; first match wins.
pub(super) fn detect_markup(text: &str) -> MarkupLang {
    if text.is_empty() {
        return MarkupLang::None;
    }

    let lower = text.to_lowercase();

    if lower.contains("<!doctype html")
        || lower.contains("<html")
        || (lower.contains("<head") && lower.contains("<body"))
        || (lower.contains("<div") && lower.contains("</"))
    {
        return MarkupLang::Html;
    }

    if text.contains("\\documentclass")
        || text.contains("\\begin{document}")
        || text.contains("\\usepackage")
        || text.contains("\\section{")
    {
        return MarkupLang::Latex;
    }

    if text.starts_with("{\\rtf") {
        return MarkupLang::Rtf;
    }

    if text.trim_start().starts_with("* ")
        || text.contains("#+TITLE")
        || text.contains("#+BEGIN_SRC")
    {
        return MarkupLang::Org;
    }

    if has_rest_underline(text) && text.contains(".. ") {
        return MarkupLang::Rest;
    }

    if text.trim_start().starts_with("= ")
        || text.contains("\n== ")
        || text.contains(":toc:")
        || text.contains("[source,")
    {
        return MarkupLang::AsciiDoc;
    }

    let mut md_score = 0;
    if text.contains("# ") {
        md_score += 2;
    }
    if text.contains("## ") {
        md_score += 2;
    }
    if text.contains("```") {
        md_score += 3;
    }
    if text.contains("](") && text.contains('[') {
        md_score += 2;
    }
    if text.contains("**") || text.contains("__") {
        md_score += 1;
    }
    if text.contains("- ") || text.contains("* ") {
        md_score += 1;
    }
    if md_score >= 3 {
        return MarkupLang::Markdown;
    }

    MarkupLang::None
}

/// True when some line is a section underline: at least four repetitions
/// of one of `=-~^` directly below a non-empty line.
fn has_rest_underline(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    for i in 1..lines.len() {
        let line = lines[i].trim();
        if line.len() > 3 {
            let ch = line.chars().next().unwrap();
            if matches!(ch, '=' | '-' | '~' | '^')
                && line.chars().all(|c| c == ch)
                && !lines[i - 1].is_empty()
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_and_array() {
        assert_eq!(detect_data_format(r#"{"key": "value"}"#), DataFormat::Json);
        assert_eq!(detect_data_format(r#"[{"id": 1}]"#), DataFormat::Json);
    }

    #[test]
    fn xml_with_declaration_and_without() {
        assert_eq!(
            detect_data_format("<?xml version=\"1.0\"?>\n<root/>"),
            DataFormat::Xml
        );
        assert_eq!(
            detect_data_format("<config>\n  <item>x</item>\n</config>"),
            DataFormat::Xml
        );
    }

    #[test]
    fn yaml_document() {
        assert_eq!(
            detect_data_format("---\nname: test\nitems:\n  - one\n  - two\n"),
            DataFormat::Yaml
        );
    }

    #[test]
    fn csv_consistent_columns() {
        assert_eq!(
            detect_data_format("name,age,city\nalice,30,berlin\n"),
            DataFormat::Csv
        );
        // Inconsistent comma counts are not CSV.
        assert_eq!(detect_data_format("a,b,c\nd,e\n"), DataFormat::None);
    }

    #[test]
    fn toml_and_ini() {
        assert_eq!(
            detect_data_format("[package]\nname = \"demo\"\nversion = \"1.0\"\n"),
            DataFormat::Toml
        );
        assert_eq!(
            detect_data_format("[section]\nkey=value\nother=1\n"),
            DataFormat::Ini
        );
    }

    #[test]
    fn html_detection() {
        assert_eq!(
            detect_markup("<!DOCTYPE html>\n<html><body>hi</body></html>"),
            MarkupLang::Html
        );
        assert_eq!(
            detect_markup("<div class=\"x\">text</div>"),
            MarkupLang::Html
        );
    }

    #[test]
    fn latex_and_rtf() {
        assert_eq!(
            detect_markup("\\documentclass{article}\n\\begin{document}\nhi\n\\end{document}"),
            MarkupLang::Latex
        );
        assert_eq!(detect_markup("{\\rtf1\\ansi hello}"), MarkupLang::Rtf);
    }

    #[test]
    fn rest_and_asciidoc_and_org() {
        assert_eq!(
            detect_markup("Title\n=====\n\n.. note:: remember\n"),
            MarkupLang::Rest
        );
        assert_eq!(
            detect_markup("= Document Title\n\nSome text with :toc: enabled\n"),
            MarkupLang::AsciiDoc
        );
        assert_eq!(
            detect_markup("#+TITLE: Notes\n\n* Heading\ntext\n"),
            MarkupLang::Org
        );
    }

    #[test]
    fn plain_prose_is_no_markup() {
        assert_eq!(
            detect_markup("just a plain paragraph of text without structure"),
            MarkupLang::None
        );
    }
}
