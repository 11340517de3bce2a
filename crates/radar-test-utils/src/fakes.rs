//! Scripted fakes for the capability ports.

use async_trait::async_trait;
use parking_lot::Mutex;
use radar_ports::{
    CandidateSelector, DocumentParser, DownstreamError, GenerateRequest, GenerationError,
    IndexUpdater, ParseError, RepoExplorer, ReportAggregator, SelectionError, StructuredGenerator,
};
use radar_schema::{Extraction, PaperTask, ParsedDocument};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

/// Generator fake scripted per schema title.
///
/// Requests are served from a per-schema queue first, then from a
/// per-schema default; unscripted requests fail with a provider error.
/// Every request is recorded so tests can count capability calls.
#[derive(Default)]
pub struct ScriptedGenerator {
    scripts: Mutex<HashMap<String, VecDeque<Result<Value, GenerationError>>>>,
    defaults: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<String>>,
    fail_all: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` whenever a request for `T`'s schema has no queued
    /// response.
    #[must_use]
    pub fn with_default<T: Serialize + schemars::JsonSchema>(self, value: &T) -> Self {
        self.defaults.lock().insert(
            T::schema_name(),
            serde_json::to_value(value).expect("fixture serializes"),
        );
        self
    }

    /// Queue one response for `T`'s schema.
    pub fn push<T: schemars::JsonSchema>(&self, response: Result<Value, GenerationError>) {
        self.scripts
            .lock()
            .entry(T::schema_name())
            .or_default()
            .push_back(response);
    }

    /// Queue one successful payload for `T`'s schema.
    pub fn push_ok<T: Serialize + schemars::JsonSchema>(&self, value: &T) {
        self.push::<T>(Ok(serde_json::to_value(value).expect("fixture serializes")));
    }

    /// Make every subsequent request fail with a provider error.
    pub fn fail_everything(&self, reason: &str) {
        *self.fail_all.lock() = Some(reason.to_string());
    }

    /// Sleep this long before answering each request.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    /// Schema titles of every request served, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of requests served.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl StructuredGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerateRequest) -> Result<Value, GenerationError> {
        let title = request.schema_title().unwrap_or("unknown").to_string();
        self.calls.lock().push(title.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = self.fail_all.lock().clone() {
            return Err(GenerationError::Provider(reason));
        }

        if let Some(response) = self
            .scripts
            .lock()
            .get_mut(&title)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }

        if let Some(value) = self.defaults.lock().get(&title) {
            return Ok(value.clone());
        }

        Err(GenerationError::Provider(format!(
            "unscripted request for schema {title}"
        )))
    }
}

/// Parser that always succeeds with fixed text.
pub struct StaticParser {
    name: &'static str,
    text: String,
    calls: Mutex<usize>,
}

impl StaticParser {
    #[must_use]
    pub fn new(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
            calls: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl DocumentParser for StaticParser {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn parse(&self, _url: &str, paper_id: &str) -> Result<ParsedDocument, ParseError> {
        *self.calls.lock() += 1;
        Ok(ParsedDocument::new(paper_id, self.text.clone()))
    }
}

/// Parser that always fails.
pub struct FailingParser {
    name: &'static str,
    reason: String,
}

impl FailingParser {
    #[must_use]
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DocumentParser for FailingParser {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn parse(&self, _url: &str, _paper_id: &str) -> Result<ParsedDocument, ParseError> {
        Err(ParseError::Backend(self.reason.clone()))
    }
}

/// Selector serving a fixed candidate list.
pub struct StaticSelector {
    tasks: Vec<PaperTask>,
    calls: Mutex<usize>,
}

impl StaticSelector {
    #[must_use]
    pub fn new(tasks: Vec<PaperTask>) -> Self {
        Self {
            tasks,
            calls: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl CandidateSelector for StaticSelector {
    async fn select(&self, _run_date: &str) -> Result<Vec<PaperTask>, SelectionError> {
        *self.calls.lock() += 1;
        Ok(self.tasks.clone())
    }
}

/// Aggregator that records its inputs and returns a fixed location.
#[derive(Default)]
pub struct RecordingAggregator {
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ReportAggregator for RecordingAggregator {
    async fn build(
        &self,
        run_date: &str,
        completed: &[String],
    ) -> Result<String, DownstreamError> {
        self.calls
            .lock()
            .push((run_date.to_string(), completed.to_vec()));
        Ok(format!("reports/daily/{run_date}.md"))
    }
}

/// Index updater that records its inputs.
#[derive(Default)]
pub struct RecordingIndex {
    by_date: Mutex<Vec<(String, Vec<String>)>>,
    by_score: Mutex<Vec<Vec<(String, u8)>>>,
}

impl RecordingIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn date_updates(&self) -> Vec<(String, Vec<String>)> {
        self.by_date.lock().clone()
    }

    #[must_use]
    pub fn score_updates(&self) -> Vec<Vec<(String, u8)>> {
        self.by_score.lock().clone()
    }
}

#[async_trait]
impl IndexUpdater for RecordingIndex {
    async fn update_by_date(
        &self,
        run_date: &str,
        completed: &[String],
    ) -> Result<(), DownstreamError> {
        self.by_date
            .lock()
            .push((run_date.to_string(), completed.to_vec()));
        Ok(())
    }

    async fn update_by_score(&self, scores: &[(String, u8)]) -> Result<(), DownstreamError> {
        self.by_score.lock().push(scores.to_vec());
        Ok(())
    }
}

/// Explorer returning a fixed method count and remembering mapped slugs.
pub struct StaticExplorer {
    methods_found: u32,
    mapped: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl StaticExplorer {
    #[must_use]
    pub fn new(methods_found: u32) -> Self {
        Self {
            methods_found,
            mapped: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pretend `slug` was mapped in an earlier run.
    pub fn mark_mapped(&self, slug: &str) {
        self.mapped.lock().insert(slug.to_string());
    }

    /// Paper ids mapped during this process, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RepoExplorer for StaticExplorer {
    async fn map_implementation(
        &self,
        task: &PaperTask,
        _extraction: &Extraction,
    ) -> Result<u32, DownstreamError> {
        self.calls.lock().push(task.paper_id.clone());
        self.mapped.lock().insert(task.slug());
        Ok(self.methods_found)
    }

    async fn mapping_exists(&self, slug: &str) -> bool {
        self.mapped.lock().contains(slug)
    }
}
