//! `cda-dl`: command-line front end for cda-core
//!
//! Exit codes: 0 on success, 1 on a fatal error, 2 when the run finished but
//! some videos failed.

mod cli;

use std::sync::Arc;

use cda_core::{CdaClient, CdaError, DownloadReport, Downloader, Resolution};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

const DEFAULT_LOG_FILTER: &str = "cda_core=info,cda_dl=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32, CdaError> {
    let client = Arc::new(CdaClient::new()?);
    let downloader = Downloader::new(client, cli.download_options());
    tracing::debug!(urls = cli.urls.len(), jobs = cli.jobs, "starting run");

    if cli.list_resolutions {
        let listed = downloader.list_resolutions(&cli.urls).await?;
        print_resolutions(&listed, cli.json)?;
        return Ok(0);
    }

    let report = downloader.download(&cli.urls).await?;
    print_report(&report, cli.json)?;

    Ok(exit_code(&report))
}

fn exit_code(report: &DownloadReport) -> i32 {
    if report.failed > 0 { 2 } else { 0 }
}

fn print_resolutions(listed: &[(String, Vec<Resolution>)], json: bool) -> Result<(), CdaError> {
    if json {
        let map: serde_json::Map<String, serde_json::Value> = listed
            .iter()
            .map(|(url, resolutions)| {
                let labels = resolutions
                    .iter()
                    .map(|r| serde_json::Value::String(r.to_string()))
                    .collect();
                (url.clone(), serde_json::Value::Array(labels))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for (url, resolutions) in listed {
        println!("Available resolutions for {}:", url);
        for resolution in resolutions {
            println!("  {}", resolution);
        }
    }
    Ok(())
}

fn print_report(report: &DownloadReport, json: bool) -> Result<(), CdaError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "Downloaded: {}, skipped: {}, failed: {} (total {})",
            report.downloaded,
            report.skipped,
            report.failed,
            report.total()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_clean_run() {
        let report = DownloadReport {
            downloaded: 2,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(exit_code(&report), 0);
    }

    #[test]
    fn test_exit_code_with_failures() {
        let report = DownloadReport {
            downloaded: 2,
            skipped: 0,
            failed: 1,
        };
        assert_eq!(exit_code(&report), 2);
    }

    #[tokio::test]
    async fn test_run_rejects_unrecognized_url() {
        let cli = Cli::try_parse_from(["cda-dl", "https://example.com/nope"]).unwrap();
        let result = run(cli).await;
        assert!(matches!(result, Err(CdaError::UnrecognizedUrl(_))));
    }

    #[tokio::test]
    async fn test_run_rejects_resolution_with_folder() {
        let cli = Cli::try_parse_from(["cda-dl", "-r", "720p", "https://www.cda.pl/user/myfolder"])
            .unwrap();
        let result = run(cli).await;
        assert!(matches!(result, Err(CdaError::FlagMisuse(_))));
    }
}
