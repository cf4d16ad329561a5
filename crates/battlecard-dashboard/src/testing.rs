//! In-process generator double for controller tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use battlecard_core::{derive_profile_id, CompetitorProfile};
use battlecard_gemini::{GenerationError, ProfileGenerator};
use chrono::Utc;
use tokio::sync::Notify;

pub(crate) struct FakeGenerator {
    pub calls: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    in_flight: AtomicUsize,
    failing: HashSet<String>,
    delay: Option<Duration>,
    answer: String,
    /// When set, `answer_question` waits for a notification before replying.
    pub answer_gate: Option<Notify>,
    pub questions: Mutex<Vec<(String, String)>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            failing: HashSet::new(),
            delay: None,
            answer: "Canned answer.".to_string(),
            answer_gate: None,
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Generation fails for competitors with this name.
    pub fn failing_for(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub fn gated(mut self) -> Self {
        self.answer_gate = Some(Notify::new());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<(String, String)> {
        self.questions.lock().unwrap().clone()
    }
}

/// A complete profile for `name`, built from the bundled Hootsuite card.
pub(crate) fn generated_profile(id: String, name: &str, url: &str) -> CompetitorProfile {
    let mut profile = battlecard_store::default_profiles(Utc::now()).unwrap()["hootsuite"].clone();
    profile.id = id;
    profile.name = name.to_string();
    profile.url = url.to_string();
    profile.title = format!("Analysis: {name}");
    profile.summary.verdict = format!("Fresh verdict on {name}");
    profile.ai_context = format!("{name} context");
    profile.last_updated = Some(Utc::now());
    profile
}

#[async_trait]
impl ProfileGenerator for FakeGenerator {
    async fn generate_profile(
        &self,
        name: &str,
        url: &str,
        existing_id: Option<&str>,
    ) -> Result<CompetitorProfile, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(name) {
            return Err(GenerationError::EmptyResponse);
        }
        let id = existing_id.map_or_else(|| derive_profile_id(name, Utc::now()), str::to_string);
        Ok(generated_profile(id, name, url))
    }

    async fn answer_question(&self, question: &str, context: &str) -> String {
        self.questions
            .lock()
            .unwrap()
            .push((question.to_string(), context.to_string()));
        if let Some(gate) = &self.answer_gate {
            gate.notified().await;
        }
        self.answer.clone()
    }
}
