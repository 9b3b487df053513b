//! Wiki page markup (`h2.` headings, `||header||` tables).

use crate::report::document::{Block, ReportDocument, Section, Table};
use crate::report::{Format, Renderer};

pub struct WikiRenderer;

impl Renderer for WikiRenderer {
    fn format(&self) -> Format {
        Format::Wiki
    }

    fn render(&self, document: &ReportDocument) -> String {
        let mut out = String::new();
        out.push_str(&format!("h1. {}\n\n", escape(&document.metadata.title)));
        for (label, value) in document.metadata.entries() {
            out.push_str(&format!("*{label}:* {}\n", escape(&value)));
        }
        out.push('\n');
        for section in &document.sections {
            out.add_section(section);
        }
        out
    }
}

trait WikiExt {
    fn add_section(&mut self, section: &Section);
    fn add_table(&mut self, table: &Table);
    fn add_list(&mut self, marker: &str, items: &[String]);
}

impl WikiExt for String {
    fn add_section(&mut self, section: &Section) {
        self.push_str(&format!("h2. {}\n\n", escape(&section.title)));
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => self.push_str(&format!("{}\n\n", escape(text))),
                Block::Table(table) => self.add_table(table),
                Block::Bullets(items) => self.add_list("*", items),
                Block::Numbered(items) => self.add_list("#", items),
            }
        }
    }

    fn add_table(&mut self, table: &Table) {
        if let Some(caption) = &table.caption {
            self.push_str(&format!("h3. {}\n\n", escape(caption)));
        }
        let header = table.header.iter().map(|h| cell(h)).collect::<Vec<_>>();
        self.push_str(&format!("||{}||\n", header.join("||")));
        for row in &table.rows {
            let row = row.iter().map(|c| cell(c)).collect::<Vec<_>>();
            self.push_str(&format!("|{}|\n", row.join("|")));
        }
        self.push('\n');
    }

    fn add_list(&mut self, marker: &str, items: &[String]) {
        for item in items {
            self.push_str(&format!("{marker} {}\n", escape(item)));
        }
        self.push('\n');
    }
}

/// Empty cells collapse the grid, so they get a single space.
fn cell(text: &str) -> String {
    let text = escape(text);
    if text.trim().is_empty() {
        " ".to_string()
    } else {
        text
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '|' | '{' | '}' | '[' | ']' | '*' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}
