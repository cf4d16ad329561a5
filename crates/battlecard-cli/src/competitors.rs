//! Competitor list, detail and mutation commands.

use battlecard_core::SectionType;
use battlecard_dashboard::{render_section, render_text, Dashboard, RefreshReport};
use chrono::{DateTime, Utc};

/// Format an optional timestamp for display, returning `"never"` when `None`.
fn fmt_updated(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn print_report(report: &RefreshReport) {
    for id in &report.refreshed {
        println!("refreshed  {id}");
    }
    for failure in &report.failed {
        println!("failed     {}: {}", failure.id, failure.reason);
    }
    for id in &report.skipped {
        println!("skipped    {id} (no URL)");
    }
    println!(
        "{} refreshed, {} failed, {} skipped",
        report.refreshed.len(),
        report.failed.len(),
        report.skipped.len()
    );
}

pub(crate) async fn run_list(dashboard: &Dashboard) {
    let rows = dashboard.list().await;
    println!("{:<32}{:<22}{:<18}{:<7}URL", "ID", "NAME", "UPDATED", "STALE");
    for row in &rows {
        println!(
            "{:<32}{:<22}{:<18}{:<7}{}",
            row.id,
            row.name,
            fmt_updated(row.last_updated),
            if row.stale { "yes" } else { "" },
            row.url
        );
    }
}

/// Print every section of a battle card, or just `section`.
///
/// # Errors
///
/// Returns an error if `id` is unknown.
pub(crate) async fn run_show(
    dashboard: &Dashboard,
    id: Option<&str>,
    section: Option<SectionType>,
) -> anyhow::Result<()> {
    let profile = match id {
        Some(id) => dashboard.profile(id).await?,
        None => dashboard.selected().await?,
    };

    println!("{}", profile.title);
    println!("updated: {}", fmt_updated(profile.last_updated));
    let sections = section.map_or_else(|| SectionType::ALL.to_vec(), |s| vec![s]);
    for section in sections {
        let view = render_section(&profile, section, dashboard.brand());
        println!();
        print!("{}", render_text(&view));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error on invalid input or if generation fails.
pub(crate) async fn run_add(dashboard: &Dashboard, name: &str, url: &str) -> anyhow::Result<()> {
    println!("researching {name}...");
    let profile = dashboard.add_competitor(name, url).await?;
    println!("added {} as '{}'", profile.name, profile.id);
    Ok(())
}

/// # Errors
///
/// Returns an error if the single refresh fails. With `all`, per-competitor
/// failures are reported and do not fail the command.
pub(crate) async fn run_refresh(
    dashboard: &Dashboard,
    id: Option<&str>,
    all: bool,
) -> anyhow::Result<()> {
    if all {
        let report = dashboard.refresh_all().await;
        print_report(&report);
        return Ok(());
    }

    let id = id.ok_or_else(|| anyhow::anyhow!("a competitor id or --all is required"))?;
    let profile = dashboard.refresh(id).await?;
    println!(
        "refreshed {} (updated {})",
        profile.id,
        fmt_updated(profile.last_updated)
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if `id` is unknown or is the only stored competitor.
pub(crate) async fn run_delete(dashboard: &Dashboard, id: &str) -> anyhow::Result<()> {
    let removed = dashboard.delete(id).await?;
    println!("deleted {} ({})", removed.name, removed.id);
    Ok(())
}

/// Refresh stale profiles one at a time, or list them with `dry_run`.
pub(crate) async fn run_check_stale(dashboard: &Dashboard, dry_run: bool) {
    if dry_run {
        let stale = dashboard.stale_candidates().await;
        if stale.is_empty() {
            println!("all competitor profiles are fresh");
        }
        for id in &stale {
            println!("stale      {id}");
        }
        return;
    }

    match dashboard.run_startup_refresh().await {
        Some(report) if !report.is_empty() => print_report(&report),
        _ => println!("all competitor profiles are fresh"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_updated_formats_minutes_and_never() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(fmt_updated(Some(at)), "2025-03-01 09:30");
        assert_eq!(fmt_updated(None), "never");
    }
}
