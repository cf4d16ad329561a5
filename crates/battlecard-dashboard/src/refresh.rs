//! Refresh strategies for regenerating several profiles.

use battlecard_core::CompetitorProfile;
use battlecard_gemini::{GenerationError, ProfileGenerator};
use futures::stream::{self, BoxStream, FuturesUnordered};
use futures::StreamExt;
use serde::Serialize;

/// How a batch of regenerations is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStrategy {
    /// One call at a time; the next starts after the previous result has been
    /// applied. Used by the startup staleness refresh.
    Sequential,
    /// All calls issued at once, results applied in completion order. Used by
    /// "refresh all".
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshFailure {
    pub id: String,
    pub reason: String,
}

/// Outcome of a batch refresh. A failure never affects other profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub refreshed: Vec<String>,
    pub failed: Vec<RefreshFailure>,
    /// Profiles without a URL.
    pub skipped: Vec<String>,
}

impl RefreshReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refreshed.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Inputs for regenerating one existing profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RefreshJob {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl RefreshJob {
    pub(crate) fn from_profile(profile: &CompetitorProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            url: profile.url.clone(),
        }
    }
}

pub(crate) type JobResult<'a> = (&'a RefreshJob, Result<CompetitorProfile, GenerationError>);

/// Stream of generation results for `jobs`.
///
/// With [`RefreshStrategy::Sequential`] a call is only issued when the
/// consumer polls for the next item, so applying each result before polling
/// again serializes the whole queue.
pub(crate) fn results<'a>(
    generator: &'a dyn ProfileGenerator,
    jobs: &'a [RefreshJob],
    strategy: RefreshStrategy,
) -> BoxStream<'a, JobResult<'a>> {
    let run = move |job: &'a RefreshJob| async move {
        let result = generator
            .generate_profile(&job.name, &job.url, Some(&job.id))
            .await;
        (job, result)
    };

    match strategy {
        RefreshStrategy::Sequential => stream::iter(jobs).then(run).boxed(),
        RefreshStrategy::Concurrent => jobs.iter().map(run).collect::<FuturesUnordered<_>>().boxed(),
    }
}
