use crate::normalize::DroppedRecords;

/// Report sections in their canonical order. Every renderer emits them in
/// exactly this order.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum SectionId {
    ExecutiveSummary,
    SprintGoals,
    Deliverables,
    SprintComparison,
    WorkBreakdown,
    Epics,
    Improvements,
    PriorityResolution,
    TopContributors,
    QualityMetrics,
    VelocityAnalysis,
    RiskAssessment,
    ActionItems,
    NextSteps,
    Acknowledgements,
}

impl SectionId {
    pub const CANONICAL: [SectionId; 15] = [
        SectionId::ExecutiveSummary,
        SectionId::SprintGoals,
        SectionId::Deliverables,
        SectionId::SprintComparison,
        SectionId::WorkBreakdown,
        SectionId::Epics,
        SectionId::Improvements,
        SectionId::PriorityResolution,
        SectionId::TopContributors,
        SectionId::QualityMetrics,
        SectionId::VelocityAnalysis,
        SectionId::RiskAssessment,
        SectionId::ActionItems,
        SectionId::NextSteps,
        SectionId::Acknowledgements,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionId::ExecutiveSummary => "Executive Summary",
            SectionId::SprintGoals => "Sprint Goals and Objectives",
            SectionId::Deliverables => "Deliverables",
            SectionId::SprintComparison => "Sprint Comparison (Estimated)",
            SectionId::WorkBreakdown => "Work Breakdown",
            SectionId::Epics => "Epics",
            SectionId::Improvements => "Improvements",
            SectionId::PriorityResolution => "Priority Resolution",
            SectionId::TopContributors => "Top Contributors",
            SectionId::QualityMetrics => "Quality Metrics",
            SectionId::VelocityAnalysis => "Velocity Analysis",
            SectionId::RiskAssessment => "Risk Assessment",
            SectionId::ActionItems => "Action Items",
            SectionId::NextSteps => "Next Steps",
            SectionId::Acknowledgements => "Acknowledgements",
        }
    }

    /// Stable anchor, e.g. `executive-summary`.
    pub fn slug(&self) -> &'static str {
        match self {
            SectionId::ExecutiveSummary => "executive-summary",
            SectionId::SprintGoals => "sprint-goals",
            SectionId::Deliverables => "deliverables",
            SectionId::SprintComparison => "sprint-comparison",
            SectionId::WorkBreakdown => "work-breakdown",
            SectionId::Epics => "epics",
            SectionId::Improvements => "improvements",
            SectionId::PriorityResolution => "priority-resolution",
            SectionId::TopContributors => "top-contributors",
            SectionId::QualityMetrics => "quality-metrics",
            SectionId::VelocityAnalysis => "velocity-analysis",
            SectionId::RiskAssessment => "risk-assessment",
            SectionId::ActionItems => "action-items",
            SectionId::NextSteps => "next-steps",
            SectionId::Acknowledgements => "acknowledgements",
        }
    }
}

/// Ordered rows of ordered, already formatted cells.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Table {
    pub caption: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            caption: None,
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: vec![],
        }
    }

    pub fn with_caption(mut self, caption: impl ToString) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn row(mut self, cells: Vec<String>) -> Self {
        self.push(cells);
        self
    }

    /// Pads or truncates `cells` to the header width.
    pub fn push(&mut self, mut cells: Vec<String>) {
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Block {
    Paragraph(String),
    Table(Table),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SectionKind {
    Table,
    Narrative,
    Mixed,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(id: SectionId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            blocks: vec![],
        }
    }

    pub fn paragraph(mut self, text: impl ToString) -> Self {
        self.blocks.push(Block::Paragraph(text.to_string()));
        self
    }

    pub fn table(mut self, table: Table) -> Self {
        self.blocks.push(Block::Table(table));
        self
    }

    pub fn bullets(mut self, items: Vec<String>) -> Self {
        self.blocks.push(Block::Bullets(items));
        self
    }

    pub fn numbered(mut self, items: Vec<String>) -> Self {
        self.blocks.push(Block::Numbered(items));
        self
    }

    pub fn kind(&self) -> SectionKind {
        let tables = self
            .blocks
            .iter()
            .filter(|block| matches!(block, Block::Table(_)))
            .count();
        if tables == 0 {
            SectionKind::Narrative
        } else if tables == self.blocks.len() {
            SectionKind::Table
        } else {
            SectionKind::Mixed
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub sprint_name: String,
    pub date_range: String,
    pub duration: String,
    pub state: String,
    /// Supplied by the caller; the pipeline never reads the clock.
    pub generated_at: Option<String>,
    pub dropped: DroppedRecords,
}

impl Metadata {
    /// Label/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            ("Sprint", self.sprint_name.clone()),
            ("Dates", self.date_range.clone()),
            ("Duration", self.duration.clone()),
            ("State", self.state.clone()),
        ];
        if let Some(generated_at) = &self.generated_at {
            entries.push(("Generated", generated_at.clone()));
        }
        if self.dropped.total() > 0 {
            entries.push(("Skipped records", self.dropped.total().to_string()));
        }
        entries
    }
}

/// One sprint's report as format-neutral sections. Read-only once built and
/// safe to hand to any number of renderers.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub metadata: Metadata,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.title.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_fitted_to_header() {
        let table = Table::new(&["a", "b"])
            .row(vec!["1".to_string()])
            .row(vec!["1".to_string(), "2".to_string(), "3".to_string()]);
        assert_eq!(table.rows[0], vec!["1".to_string(), String::new()]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn kind_follows_blocks() {
        let table = Table::new(&["a"]);
        assert_eq!(Section::new(SectionId::Epics).kind(), SectionKind::Narrative);
        assert_eq!(
            Section::new(SectionId::Epics).table(table.clone()).kind(),
            SectionKind::Table
        );
        assert_eq!(
            Section::new(SectionId::Epics)
                .table(table)
                .paragraph("note")
                .kind(),
            SectionKind::Mixed
        );
    }

    #[test]
    fn canonical_slugs_are_unique() {
        let mut slugs = SectionId::CANONICAL.iter().map(|id| id.slug()).collect::<Vec<_>>();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), SectionId::CANONICAL.len());
    }
}
