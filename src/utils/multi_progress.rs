use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar;
    fn add_stage(&self, stage: &'static str, style: ProgressStyle) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
        let pb = self.add(pb);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn add_stage(&self, stage: &'static str, style: ProgressStyle) -> ProgressBar {
        let pb = self.add_with_style(ProgressBar::new_spinner(), style);
        pb.set_prefix(stage);
        pb
    }
}
