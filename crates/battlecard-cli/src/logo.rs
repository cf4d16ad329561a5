//! Brand logo commands. Uploads follow the same validation as the dashboard.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use battlecard_dashboard::Dashboard;
use clap::Subcommand;

/// Sub-commands available under `logo`.
#[derive(Debug, Subcommand)]
pub enum LogoCommands {
    /// Upload a PNG, JPG or SVG file (1 MiB max)
    Set { path: PathBuf },
    /// Go back to the default logo
    Clear,
    /// Print the stored logo as a data URI
    Show,
}

/// Content type implied by a file extension. Unknown extensions fall through
/// to validation, which reports them as unsupported.
fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png".to_string(),
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "svg" => "image/svg+xml".to_string(),
        other => format!("application/x-{other}"),
    }
}

/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub(crate) async fn run_logo(dashboard: &Dashboard, command: LogoCommands) -> anyhow::Result<()> {
    match command {
        LogoCommands::Set { path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            dashboard
                .upload_logo(&content_type_for(&path), &bytes)
                .await?;
            println!("logo updated from {}", path.display());
        }
        LogoCommands::Clear => {
            dashboard.clear_logo().await;
            println!("logo reset to default");
        }
        LogoCommands::Show => match dashboard.logo().await {
            Some(logo) => println!("{}", logo.as_str()),
            None => println!("default logo"),
        },
    }
    Ok(())
}
