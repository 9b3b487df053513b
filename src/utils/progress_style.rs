use indicatif::ProgressStyle;

const ONLY_MESSAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const STAGE_TEMPLATE: &str = "{spinner} {prefix:>10.bold} {wide_msg}";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn only_message() -> ProgressStyle {
        ProgressStyle::with_template(ONLY_MESSAGE_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Spinner with a right-aligned stage name, e.g. `   issues Read 42 records`.
    pub fn stage() -> ProgressStyle {
        ProgressStyle::with_template(STAGE_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}
