use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};

use battlecard_core::{
    derive_profile_id, validate_logo, BrandContext, CompetitorProfile, LogoDataUri, SectionType,
};
use battlecard_export::{ExportFormat, ExportedFile};
use battlecard_gemini::ProfileGenerator;
use battlecard_store::{KeyValueStorage, LogoStore, ProfileStore};
use chrono::{DateTime, TimeDelta, Utc};
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::chat::{ChatMessage, ChatSession, ChatTranscript, PendingQuestion, NO_CONTEXT};
use crate::refresh::{self, RefreshFailure, RefreshJob, RefreshReport, RefreshStrategy};
use crate::staleness::{is_stale, select_stale, StalenessState};
use crate::views::{render_section, SectionView};
use crate::DashboardError;

/// One row of the competitor list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitorSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub stale: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStatus {
    pub auto_refreshing: bool,
    pub staleness: StalenessState,
    pub selected: String,
    pub competitor_count: usize,
    pub logo_set: bool,
    pub chat_pending: bool,
}

struct State {
    profiles: ProfileStore,
    logo: LogoStore,
    selected: String,
    chat: ChatSession,
    auto_refreshing: bool,
    staleness: StalenessState,
}

impl State {
    fn profile(&self, id: &str) -> Result<&CompetitorProfile, DashboardError> {
        self.profiles
            .get(id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))
    }

    /// Move the selection, resetting the chat when the competitor changes.
    fn select(&mut self, id: &str) {
        if self.selected == id {
            return;
        }
        let name = self
            .profiles
            .get(id)
            .map_or_else(|| id.to_string(), |p| p.name.clone());
        self.selected = id.to_string();
        self.chat = ChatSession::new(id, &name);
        tracing::debug!(competitor_id = %id, "selection changed");
    }

    /// Point a dangling selection at the first remaining profile.
    fn ensure_selection(&mut self) {
        if self.profiles.contains(&self.selected) {
            return;
        }
        if let Some(first) = self.profiles.first_id().map(str::to_string) {
            self.select(&first);
        }
    }

    /// Store a freshly generated profile. `lastUpdated` only moves forward,
    /// even if the clock did not.
    fn apply(&mut self, mut profile: CompetitorProfile) -> CompetitorProfile {
        let previous = self.profiles.get(&profile.id).and_then(|p| p.last_updated);
        let completed = profile.last_updated.unwrap_or_else(Utc::now);
        profile.last_updated = Some(advance_timestamp(previous, completed));
        self.profiles.upsert(profile.clone());
        self.ensure_selection();
        profile
    }

    fn jobs_for(&self, ids: &[String], report: &mut RefreshReport) -> Vec<RefreshJob> {
        let mut jobs = Vec::with_capacity(ids.len());
        for id in ids {
            match self.profiles.get(id) {
                Some(profile) if profile.has_url() => jobs.push(RefreshJob::from_profile(profile)),
                Some(_) => report.skipped.push(id.clone()),
                None => report.failed.push(RefreshFailure {
                    id: id.clone(),
                    reason: DashboardError::NotFound(id.clone()).to_string(),
                }),
            }
        }
        jobs
    }
}

fn advance_timestamp(previous: Option<DateTime<Utc>>, completed: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(previous) if previous >= completed => previous + TimeDelta::milliseconds(1),
        _ => completed,
    }
}

fn validate_new_competitor(name: &str, url: &str) -> Result<(), DashboardError> {
    if name.is_empty() {
        return Err(DashboardError::InvalidInput(
            "competitor name must not be empty".to_string(),
        ));
    }
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            DashboardError::InvalidInput(format!("URL must start with http:// or https://: {url}"))
        })?;
    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(DashboardError::InvalidInput(format!("invalid URL: {url}")));
    }
    Ok(())
}

/// Application state for one dashboard session.
///
/// Shared as `Arc<Dashboard>` by the server and the CLI. State sits behind
/// an async mutex that is never held across a generator call, so reads stay
/// responsive while profiles are being regenerated.
pub struct Dashboard {
    generator: Arc<dyn ProfileGenerator>,
    brand: BrandContext,
    state: Mutex<State>,
    /// Questions whose `ask` was dropped while the state was locked
    /// elsewhere. Settled on the next lock.
    abandoned: std::sync::Mutex<Vec<PendingQuestion>>,
    startup_refresh_claimed: AtomicBool,
}

/// Settles a question whose `ask` future is dropped before the answer
/// lands, so the session does not stay pending forever.
struct InFlight<'a> {
    dashboard: &'a Dashboard,
    pending: Option<PendingQuestion>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        tracing::debug!("chat request dropped before the answer arrived");
        match self.dashboard.state.try_lock() {
            Ok(mut state) => state.chat.abandon(pending),
            Err(_) => self
                .dashboard
                .abandoned
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(pending),
        }
    }
}

impl Dashboard {
    /// Load profiles and logo from `storage` and select the first profile.
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        generator: Arc<dyn ProfileGenerator>,
        brand: BrandContext,
    ) -> Self {
        let profiles = ProfileStore::load(Arc::clone(&storage), Utc::now());
        let logo = LogoStore::load(storage);
        let (selected, name) = profiles
            .profiles()
            .values()
            .next()
            .map(|p| (p.id.clone(), p.name.clone()))
            .unwrap_or_default();
        tracing::info!(
            competitors = profiles.len(),
            selected = %selected,
            logo = logo.current().is_some(),
            "dashboard loaded"
        );

        Self {
            generator,
            brand,
            state: Mutex::new(State {
                profiles,
                logo,
                chat: ChatSession::new(&selected, &name),
                selected,
                auto_refreshing: false,
                staleness: StalenessState::Idle,
            }),
            abandoned: std::sync::Mutex::new(Vec::new()),
            startup_refresh_claimed: AtomicBool::new(false),
        }
    }

    async fn lock(&self) -> MutexGuard<'_, State> {
        let mut state = self.state.lock().await;
        let abandoned = std::mem::take(
            &mut *self
                .abandoned
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for pending in abandoned {
            state.chat.abandon(pending);
        }
        state
    }

    #[must_use]
    pub fn brand(&self) -> &BrandContext {
        &self.brand
    }

    pub async fn list(&self) -> Vec<CompetitorSummary> {
        let state = self.lock().await;
        let now = Utc::now();
        state
            .profiles
            .profiles()
            .values()
            .map(|p| CompetitorSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                url: p.url.clone(),
                last_updated: p.last_updated,
                stale: is_stale(p, now),
                selected: p.id == state.selected,
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] for unknown ids.
    pub async fn profile(&self, id: &str) -> Result<CompetitorProfile, DashboardError> {
        self.lock().await.profile(id).cloned()
    }

    pub async fn selected_id(&self) -> String {
        self.lock().await.selected.clone()
    }

    /// The currently selected profile.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] only if the store is empty, which
    /// user actions cannot cause.
    pub async fn selected(&self) -> Result<CompetitorProfile, DashboardError> {
        let state = self.lock().await;
        state.profile(&state.selected).cloned()
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] for unknown ids; the selection is
    /// left unchanged.
    pub async fn select(&self, id: &str) -> Result<(), DashboardError> {
        let mut state = self.lock().await;
        state.profile(id)?;
        state.select(id);
        Ok(())
    }

    /// Generate a profile for a new competitor, store it and select it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidInput`] for a blank name or a non-HTTP
    /// URL, and [`DashboardError::Generation`] if the generator fails. Nothing
    /// is stored on failure.
    pub async fn add_competitor(
        &self,
        name: &str,
        url: &str,
    ) -> Result<CompetitorProfile, DashboardError> {
        let (name, url) = (name.trim(), url.trim());
        validate_new_competitor(name, url)?;

        tracing::info!(competitor = %name, url = %url, "adding competitor");
        let mut profile = self
            .generator
            .generate_profile(name, url, None)
            .await
            .inspect_err(|e| tracing::warn!(competitor = %name, error = %e, "add competitor failed"))?;

        let mut state = self.lock().await;
        let mut stamp = profile.last_updated.unwrap_or_else(Utc::now);
        while state.profiles.contains(&profile.id) {
            stamp += TimeDelta::milliseconds(1);
            profile.id = derive_profile_id(&profile.name, stamp);
        }
        let profile = state.apply(profile);
        state.select(&profile.id);
        tracing::info!(competitor_id = %profile.id, "competitor added");
        Ok(profile)
    }

    /// Regenerate one profile in place.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`], [`DashboardError::MissingUrl`] if
    /// the profile has nothing to regenerate from, or
    /// [`DashboardError::Generation`]. A failed refresh leaves the stored
    /// profile untouched.
    pub async fn refresh(&self, id: &str) -> Result<CompetitorProfile, DashboardError> {
        let job = {
            let state = self.lock().await;
            let profile = state.profile(id)?;
            if !profile.has_url() {
                return Err(DashboardError::MissingUrl(id.to_string()));
            }
            RefreshJob::from_profile(profile)
        };

        tracing::info!(competitor_id = %id, "refreshing competitor");
        let mut profile = self
            .generator
            .generate_profile(&job.name, &job.url, Some(&job.id))
            .await
            .inspect_err(|e| tracing::warn!(competitor_id = %id, error = %e, "refresh failed"))?;
        profile.id = job.id;

        Ok(self.lock().await.apply(profile))
    }

    /// Regenerate every profile concurrently, applying results as they
    /// arrive.
    pub async fn refresh_all(&self) -> RefreshReport {
        let ids: Vec<String> = {
            let state = self.lock().await;
            state.profiles.profiles().keys().cloned().collect()
        };
        self.refresh_many(&ids, RefreshStrategy::Concurrent).await
    }

    /// Regenerate `ids` with the given strategy.
    pub async fn refresh_many(&self, ids: &[String], strategy: RefreshStrategy) -> RefreshReport {
        self.run_refresh(ids, strategy, false).await
    }

    async fn run_refresh(
        &self,
        ids: &[String],
        strategy: RefreshStrategy,
        track_progress: bool,
    ) -> RefreshReport {
        let mut report = RefreshReport::default();
        let jobs = self.lock().await.jobs_for(ids, &mut report);
        let total = jobs.len();
        tracing::info!(total, ?strategy, skipped = report.skipped.len(), "refresh started");

        let mut done = 0;
        let mut results = refresh::results(self.generator.as_ref(), &jobs, strategy);
        while let Some((job, result)) = results.next().await {
            done += 1;
            let mut state = self.lock().await;
            match result {
                Ok(mut profile) => {
                    profile.id.clone_from(&job.id);
                    let profile = state.apply(profile);
                    report.refreshed.push(profile.id);
                }
                Err(e) => {
                    tracing::warn!(competitor_id = %job.id, error = %e, "refresh failed; profile unchanged");
                    report.failed.push(RefreshFailure {
                        id: job.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            if track_progress {
                state.staleness = StalenessState::Refreshing { done, total };
            }
        }

        tracing::info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "refresh finished"
        );
        report
    }

    /// Ids the startup refresh would regenerate right now.
    pub async fn stale_candidates(&self) -> Vec<String> {
        let state = self.lock().await;
        select_stale(state.profiles.profiles(), Utc::now())
    }

    /// Regenerate stale profiles one at a time. Runs at most once per
    /// dashboard; later calls return `None`.
    pub async fn run_startup_refresh(&self) -> Option<RefreshReport> {
        if self.startup_refresh_claimed.swap(true, Ordering::SeqCst) {
            return None;
        }

        let stale = {
            let mut state = self.lock().await;
            state.staleness = StalenessState::Scanning;
            let stale = select_stale(state.profiles.profiles(), Utc::now());
            if stale.is_empty() {
                state.staleness = StalenessState::Idle;
                tracing::info!("no stale competitors");
                return Some(RefreshReport::default());
            }
            state.auto_refreshing = true;
            state.staleness = StalenessState::Refreshing {
                done: 0,
                total: stale.len(),
            };
            stale
        };

        tracing::info!(count = stale.len(), "auto-refreshing stale competitors");
        let report = self
            .run_refresh(&stale, RefreshStrategy::Sequential, true)
            .await;

        let mut state = self.lock().await;
        state.auto_refreshing = false;
        state.staleness = StalenessState::Idle;
        Some(report)
    }

    /// Delete a profile. If it was selected, the selection falls back to the
    /// first remaining id.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] or [`DashboardError::LastProfile`].
    pub async fn delete(&self, id: &str) -> Result<CompetitorProfile, DashboardError> {
        let mut state = self.lock().await;
        let removed = state.profiles.remove(id)?;
        state.ensure_selection();
        tracing::info!(competitor_id = %id, "competitor deleted");
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] for unknown ids.
    pub async fn render(&self, id: &str, section: SectionType) -> Result<SectionView, DashboardError> {
        let state = self.lock().await;
        Ok(render_section(state.profile(id)?, section, &self.brand))
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] for unknown ids and
    /// [`DashboardError::Export`] if rendering fails.
    pub async fn export(&self, id: &str, format: ExportFormat) -> Result<ExportedFile, DashboardError> {
        let profile = self.profile(id).await?;
        let file = battlecard_export::export(&profile, &self.brand, format, Utc::now().date_naive())?;
        tracing::info!(competitor_id = %id, %format, bytes = file.bytes.len(), "exported battle card");
        Ok(file)
    }

    pub async fn logo(&self) -> Option<LogoDataUri> {
        self.lock().await.logo.current().cloned()
    }

    /// Validate and store a new logo.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Logo`] with the rejection reason; the current
    /// logo is kept.
    pub async fn upload_logo(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<LogoDataUri, DashboardError> {
        let logo = validate_logo(content_type, bytes)
            .inspect_err(|e| tracing::info!(error = %e, "logo upload rejected"))?;
        self.lock().await.logo.set(Some(logo.clone()));
        Ok(logo)
    }

    /// Return to the default logo.
    pub async fn clear_logo(&self) {
        self.lock().await.logo.set(None);
    }

    pub async fn chat_transcript(&self) -> ChatTranscript {
        self.lock().await.chat.transcript()
    }

    /// Ask the assistant about the selected competitor.
    ///
    /// Returns the answer message, or `None` if the selection changed while
    /// the answer was being generated (the transcript it belonged to is gone).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::EmptyQuestion`] for blank input.
    pub async fn ask(&self, question: &str) -> Result<Option<ChatMessage>, DashboardError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DashboardError::EmptyQuestion);
        }

        let (pending, context) = {
            let mut state = self.lock().await;
            let context = state
                .profiles
                .get(&state.selected)
                .map(|p| p.ai_context.clone())
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| NO_CONTEXT.to_string());
            (state.chat.begin(question), context)
        };
        let mut in_flight = InFlight {
            dashboard: self,
            pending: Some(pending),
        };

        let answer = self.generator.answer_question(question, &context).await;

        let mut state = self.lock().await;
        let Some(pending) = in_flight.pending.take() else {
            return Ok(None);
        };
        let message = state.chat.finish(pending, answer);
        if message.is_none() {
            tracing::debug!("selection changed during chat; answer discarded");
        }
        Ok(message)
    }

    pub async fn status(&self) -> DashboardStatus {
        let state = self.lock().await;
        DashboardStatus {
            auto_refreshing: state.auto_refreshing,
            staleness: state.staleness,
            selected: state.selected.clone(),
            competitor_count: state.profiles.len(),
            logo_set: state.logo.current().is_some(),
            chat_pending: state.chat.pending(),
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
