//! Per-folder progress bars
//!
//! Each folder shows two transient bars labelled with its title: one counting
//! crawled subfolders, one counting finished videos. Bars are cleared when
//! they complete.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{msg}: {percent:>3}%|{bar:30.cyan/blue}| {pos}/{len} {prefix} [{elapsed_precise}]";

/// Shared progress display for one run
///
/// [`Progress::hidden`] hands out bars that draw nothing.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    bars: Option<MultiProgress>,
}

impl Progress {
    /// Progress bars drawn on stderr
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            bars: Some(MultiProgress::with_draw_target(target)),
        }
    }

    pub fn hidden() -> Self {
        Self { bars: None }
    }

    pub fn is_hidden(&self) -> bool {
        self.bars.is_none()
    }

    /// Bar counting a folder's subfolders
    pub fn folder_bar(&self, title: &str, len: usize) -> ProgressBar {
        self.bar(title, len, "FOLDER")
    }

    /// Bar counting a folder's videos
    pub fn video_bar(&self, title: &str, len: usize) -> ProgressBar {
        self.bar(title, len, "VIDEO")
    }

    fn bar(&self, title: &str, len: usize, unit: &'static str) -> ProgressBar {
        let Some(multi) = &self.bars else {
            return ProgressBar::hidden();
        };

        let bar = multi.add(ProgressBar::new(len as u64));
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_prefix(unit);
        bar.set_message(title.to_string());
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_by_default() {
        assert!(Progress::default().is_hidden());
        assert!(Progress::hidden().folder_bar("Root", 3).is_hidden());
    }

    #[test]
    fn test_folder_bar_labels() {
        let progress = Progress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = progress.folder_bar("Moje_filmy", 4);

        assert!(!progress.is_hidden());
        assert_eq!(bar.length(), Some(4));
        assert_eq!(bar.message(), "Moje_filmy");
        assert_eq!(bar.prefix(), "FOLDER");
    }

    #[test]
    fn test_video_bar_counts() {
        let progress = Progress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = progress.video_bar("Root", 2);
        bar.inc(1);
        bar.inc(1);

        assert_eq!(bar.position(), 2);
        assert_eq!(bar.prefix(), "VIDEO");
    }
}
