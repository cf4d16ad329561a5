use battlecard_dashboard::Dashboard;

/// Ask one question about `competitor`, or about the first competitor when
/// none is given, and print the answer.
///
/// # Errors
///
/// Returns an error for an unknown competitor or a blank question.
pub(crate) async fn run_ask(
    dashboard: &Dashboard,
    question: &str,
    competitor: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(id) = competitor {
        dashboard.select(id).await?;
    }
    let selected = dashboard.selected().await?;
    tracing::debug!(competitor_id = %selected.id, "asking assistant");

    if let Some(answer) = dashboard.ask(question).await? {
        println!("{}", answer.text);
    }
    Ok(())
}
