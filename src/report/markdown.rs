use crate::report::document::{Block, ReportDocument, Section, Table};
use crate::report::{Format, Renderer};
use itertools::Itertools;
use markdown_builder::{List, Markdown};
use markdown_table::{Heading, MarkdownTable};
use std::fmt;
use tracing::warn;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn format(&self) -> Format {
        Format::Markdown
    }

    fn render(&self, document: &ReportDocument) -> String {
        let mut doc = Markdown::new();

        doc.header1(escape(&document.metadata.title));
        let meta = document
            .metadata
            .entries()
            .into_iter()
            .fold(List::builder(), |list, (label, value)| {
                list.append(format!("**{label}:** {}", escape(&value)))
            })
            .unordered();
        doc.list(meta);
        for section in &document.sections {
            doc.add_section(section);
        }

        doc.render()
    }
}

trait MarkdownExt {
    fn add_section(&mut self, section: &Section);
    fn add_table(&mut self, table: &Table);
    fn add_items(&mut self, items: &[String], ordered: bool);
}

impl MarkdownExt for Markdown {
    fn add_section(&mut self, section: &Section) {
        self.header2(escape(&section.title));
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => {
                    self.paragraph(escape(text));
                }
                Block::Table(table) => self.add_table(table),
                Block::Bullets(items) => self.add_items(items, false),
                Block::Numbered(items) => self.add_items(items, true),
            }
        }
    }

    fn add_table(&mut self, table: &Table) {
        if let Some(caption) = &table.caption {
            self.paragraph(format!("**{}**", escape(caption)));
        }
        let header_cells = table.header.iter().map(|h| cell(h)).collect::<Vec<_>>();
        let header = header_cells
            .iter()
            .map(|heading| Heading::new(heading.clone(), None))
            .collect::<Vec<_>>();
        let rows = table
            .rows
            .iter()
            .map(|row| row.iter().map(|c| cell(c)).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let mut md_table = MarkdownTable::new(rows.clone());
        md_table.with_headings(header);

        let rendered = match md_table.as_markdown() {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(?err, "markdown table rejected, writing plain grid");
                plain_grid(&header_cells, &rows)
            }
        };
        // Paragraphs are word wrapped, which would split table rows.
        self.elements.push(Box::new(Grid(rendered)));
    }

    fn add_items(&mut self, items: &[String], ordered: bool) {
        if items.is_empty() {
            return;
        }
        let list = items
            .iter()
            .fold(List::builder(), |list, item| list.append(escape(item)));
        self.list(if ordered { list.ordered() } else { list.unordered() });
    }
}

/// Pre-rendered table printed as is.
#[derive(Debug, Clone)]
struct Grid(String);

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.0.trim_end())
    }
}

/// Cells are expected to be escaped already.
fn plain_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let line = |cells: &[String]| format!("| {} |", cells.join(" | "));
    let separator = format!("|{}|", header.iter().map(|_| " --- ").join("|"));
    std::iter::once(line(header))
        .chain(std::iter::once(separator))
        .chain(rows.iter().map(|row| line(row.as_slice())))
        .join("\n")
}

/// Table cells cannot hold a bare pipe.
fn cell(text: &str) -> String {
    escape(text).replace('|', "\\|")
}

/// Inline text: one line, no block markers. Wrapping may start a new line
/// at any word, so a word made only of `-`, `=` or `+` is escaped as well.
fn escape(text: &str) -> String {
    text.split(['\n', '\r'])
        .flat_map(|line| line.split(' '))
        .filter(|word| !word.is_empty())
        .map(|word| {
            if word.chars().all(|c| matches!(c, '-' | '=' | '+')) {
                format!("\\{word}")
            } else {
                escape_inline(word)
            }
        })
        .join(" ")
}

fn escape_inline(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::SectionId;

    #[test]
    fn inline_markup_is_escaped() {
        assert_eq!(escape("fix *all* the [bugs]"), "fix \\*all\\* the \\[bugs\\]");
        assert_eq!(escape("Sprint Comparison (Estimated)"), "Sprint Comparison (Estimated)");
    }

    #[test]
    fn block_markers_cannot_start_a_line() {
        assert_eq!(escape("Ship refunds\n## Stretch goals\n---"), "Ship refunds \\#\\# Stretch goals \\---");
        assert!(!escape("a\r\nb").contains(['\n', '\r']));
    }

    #[test]
    fn cells_escape_pipes() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn plain_grid_fallback() {
        let grid = plain_grid(
            &["A".to_string(), "B".to_string()],
            &[vec!["1".to_string(), "2".to_string()]],
        );
        assert_eq!(grid, "| A | B |\n| --- | --- |\n| 1 | 2 |");
    }

    #[test]
    fn lists_use_builder_markers() {
        let mut doc = Markdown::new();
        doc.add_items(&["one".to_string(), "two".to_string()], true);
        doc.add_items(&["*x*".to_string()], false);
        assert_eq!(doc.render(), "1. one\n2. two\n\n- \\*x\\*\n");
    }

    #[test]
    fn long_tables_are_not_wrapped() {
        let long = "word ".repeat(40);
        let mut doc = Markdown::new();
        doc.add_section(
            &Section::new(SectionId::Epics)
                .table(Table::new(&["Key", "Summary"]).row(vec!["E-1".to_string(), long])),
        );
        let rendered = doc.render();
        let rows = rendered.lines().filter(|line| line.starts_with('|')).count();
        assert_eq!(rows, 3);
        assert!(rendered.starts_with("## Epics\n\n| Key"));
    }
}
