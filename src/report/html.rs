//! Print-ready HTML. Page breaks and table styling target PDF conversion.

use crate::report::document::{Block, ReportDocument, Section, Table};
use crate::report::{Format, Renderer};

const PRINT_STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;font-size:11pt;margin:2cm;color:#222}\
h1{font-size:20pt;border-bottom:2px solid #444}\
h2{font-size:15pt;margin-top:1.5em;page-break-after:avoid}\
h3{font-size:12pt}\
table{border-collapse:collapse;width:100%;margin:.5em 0 1em;page-break-inside:avoid}\
th,td{border:1px solid #999;padding:4px 8px;text-align:left}\
th{background:#eee}\
dl.meta{display:grid;grid-template-columns:max-content auto;gap:2px 12px}\
dt{font-weight:bold}";

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn format(&self) -> Format {
        Format::Html
    }

    fn render(&self, document: &ReportDocument) -> String {
        let title = escape(&document.metadata.title);
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{title}</title>\n<style>{PRINT_STYLE}</style>\n"));
        out.push_str("</head>\n<body>\n");
        out.push_str(&format!("<h1>{title}</h1>\n<dl class=\"meta\">\n"));
        for (label, value) in document.metadata.entries() {
            out.push_str(&format!("<dt>{label}</dt><dd>{}</dd>\n", escape(&value)));
        }
        out.push_str("</dl>\n");
        for section in &document.sections {
            add_section(&mut out, section);
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn add_section(out: &mut String, section: &Section) {
    out.push_str(&format!(
        "<section id=\"{}\">\n<h2>{}</h2>\n",
        section.id.slug(),
        escape(&section.title)
    ));
    for block in &section.blocks {
        match block {
            Block::Paragraph(text) => out.push_str(&format!("<p>{}</p>\n", escape(text))),
            Block::Table(table) => add_table(out, table),
            Block::Bullets(items) => add_list(out, "ul", items),
            Block::Numbered(items) => add_list(out, "ol", items),
        }
    }
    out.push_str("</section>\n");
}

fn add_table(out: &mut String, table: &Table) {
    out.push_str("<table>\n");
    if let Some(caption) = &table.caption {
        out.push_str(&format!("<caption>{}</caption>\n", escape(caption)));
    }
    out.push_str("<thead><tr>");
    for heading in &table.header {
        out.push_str(&format!("<th>{}</th>", escape(heading)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn add_list(out: &mut String, tag: &str, items: &[String]) {
    out.push_str(&format!("<{tag}>\n"));
    for item in items {
        out.push_str(&format!("<li>{}</li>\n", escape(item)));
    }
    out.push_str(&format!("</{tag}>\n"));
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_are_escaped() {
        assert_eq!(escape("<b>R&D</b> \"x\""), "&lt;b&gt;R&amp;D&lt;/b&gt; &quot;x&quot;");
    }

    #[test]
    fn lists_use_tag() {
        let mut out = String::new();
        add_list(&mut out, "ol", &["one".to_string(), "two".to_string()]);
        assert_eq!(out, "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n");
    }
}
