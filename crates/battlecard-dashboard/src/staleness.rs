//! Startup staleness scan.

use battlecard_core::{CompetitorProfile, ProfileMap};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Profiles older than this are regenerated on startup.
pub const FRESHNESS_WINDOW: TimeDelta = TimeDelta::weeks(4);

/// Progress of the startup refresh, as reported by the controller status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StalenessState {
    #[default]
    Idle,
    Scanning,
    Refreshing { done: usize, total: usize },
}

/// A profile is stale when it can be regenerated (has a URL) and was never
/// generated or was generated more than [`FRESHNESS_WINDOW`] ago.
#[must_use]
pub fn is_stale(profile: &CompetitorProfile, now: DateTime<Utc>) -> bool {
    if !profile.has_url() {
        return false;
    }
    if profile.is_never_updated() {
        return true;
    }
    profile
        .last_updated
        .is_some_and(|updated| now.signed_duration_since(updated) > FRESHNESS_WINDOW)
}

/// Ids of every stale profile, in id order.
#[must_use]
pub fn select_stale(profiles: &ProfileMap, now: DateTime<Utc>) -> Vec<String> {
    profiles
        .values()
        .filter(|p| is_stale(p, now))
        .map(|p| p.id.clone())
        .collect()
}
