use std::path::Path;

use anyhow::Context as _;
use battlecard_dashboard::Dashboard;
use battlecard_export::ExportFormat;

/// Render a battle card and write it into `out_dir` under its standard
/// filename, e.g. `BattleCard_Swatio_vs_Buffer.pdf`.
///
/// # Errors
///
/// Returns an error if `id` is unknown, rendering fails, or the file cannot
/// be written.
pub(crate) async fn run_export(
    dashboard: &Dashboard,
    id: &str,
    format: ExportFormat,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let file = dashboard.export(id, format).await?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let path = out_dir.join(&file.filename);
    std::fs::write(&path, &file.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {} ({} bytes)", path.display(), file.bytes.len());
    Ok(())
}
