pub mod builder;
pub mod document;
pub mod html;
pub mod markdown;
pub mod wiki;

pub use builder::build;
pub use document::{Block, Metadata, ReportDocument, Section, SectionId, SectionKind, Table};

use clap::ValueEnum;

/// Serializes a [`ReportDocument`] into one target syntax.
///
/// Implementations are stateless, do no I/O and only differ in syntax and
/// escaping. Cell text is printed exactly as the section builder produced it.
pub trait Renderer: Send + Sync {
    fn format(&self) -> Format;
    fn render(&self, document: &ReportDocument) -> String;
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, ValueEnum)]
pub enum Format {
    /// Wiki page markup.
    Wiki,
    /// Print-ready HTML, the input for PDF conversion.
    Html,
    /// Markdown document.
    Markdown,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Wiki, Format::Html, Format::Markdown];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Wiki => "wiki",
            Format::Html => "html",
            Format::Markdown => "md",
        }
    }

    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            Format::Wiki => Box::new(wiki::WikiRenderer),
            Format::Html => Box::new(html::HtmlRenderer),
            Format::Markdown => Box::new(markdown::MarkdownRenderer),
        }
    }
}

/// Renders `document` once per format, in the order given.
pub fn render_all(document: &ReportDocument, formats: &[Format]) -> Vec<(Format, String)> {
    formats
        .iter()
        .map(|format| (*format, format.renderer().render(document)))
        .collect()
}
