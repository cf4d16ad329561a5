use battlecard_core::{CompetitorProfile, ProfileMap};
use chrono::{DateTime, Utc};

const DEFAULT_COMPETITORS_YAML: &str = include_str!("default_competitors.yaml");

/// The built-in competitor set, each stamped as generated at `now`.
///
/// # Errors
///
/// Returns [`serde_yaml::Error`] if the embedded document does not match the
/// profile schema.
pub fn default_profiles(now: DateTime<Utc>) -> Result<ProfileMap, serde_yaml::Error> {
    let profiles: Vec<CompetitorProfile> = serde_yaml::from_str(DEFAULT_COMPETITORS_YAML)?;
    Ok(profiles
        .into_iter()
        .map(|mut profile| {
            profile.last_updated = Some(now);
            (profile.id.clone(), profile)
        })
        .collect())
}
