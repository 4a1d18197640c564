//! Download artifacts from another workflow run
//!
//! This example demonstrates the cross-run path of artifact-dl:
//! - Building a downloader from configuration
//! - Describing the run and the selection with `DownloadInputs`
//! - Inspecting the summary, including integrity warnings
//!
//! Run with:
//!
//! ```bash
//! GITHUB_TOKEN=ghp_... REPOSITORY=owner/repo RUN_ID=123456 \
//!     cargo run --example download_run -- 'dist-*'
//! ```

use artifact_dl::{ArtifactDownloader, Config, DownloadInputs, Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let pattern = std::env::args().nth(1);

    let inputs = DownloadInputs {
        pattern,
        path: Some("artifacts".into()),
        merge_multiple: false,
        github_token: std::env::var("GITHUB_TOKEN").ok(),
        repository: std::env::var("REPOSITORY").ok(),
        run_id: std::env::var("RUN_ID").ok(),
        ..Default::default()
    };

    let downloader = ArtifactDownloader::new(Config::default())?;

    let summary = match downloader.run(&inputs).await {
        Ok(summary) => summary,
        Err(e @ Error::Config { .. }) => {
            eprintln!("Invalid inputs: {}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "Downloaded {} artifact(s) to {}",
        summary.downloaded,
        summary.download_path.display()
    );
    for outcome in &summary.outcomes {
        println!(
            "  {} (id {}) -> {}",
            outcome.name,
            outcome.artifact_id,
            outcome.path.display()
        );
    }
    for warning in &summary.warnings {
        println!("warning: {}", warning);
    }

    Ok(())
}
