use std::path::PathBuf;

use cda_core::DownloadOptions;
use clap::Parser;

/// Command-line arguments for `cda-dl`
#[derive(Parser, Debug)]
#[command(
    name = "cda-dl",
    version,
    about = "Download videos and whole folders from cda.pl",
    long_about = "cda-dl downloads single videos or crawls cda.pl folders recursively, \
                  mirroring the folder tree on disk. Files that already exist are skipped."
)]
pub struct Cli {
    /// Video or folder URLs
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Force a resolution for all videos (e.g. 720p, or "best")
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// List available resolutions for video URLs and exit
    #[arg(short = 'R', long)]
    pub list_resolutions: bool,

    /// Re-download files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Maximum number of concurrent video downloads
    #[arg(short, long, default_value_t = 3)]
    pub jobs: usize,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Hide the per-folder progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            directory: self.directory.clone(),
            resolution: self.resolution.clone(),
            overwrite: self.overwrite,
            max_concurrent: self.jobs,
            progress: !(self.no_progress || self.json),
        }
    }
}
