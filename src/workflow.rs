//! Orchestrates conversions and history loading, exposing the observable
//! state a UI layer renders from.

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::engine::ConversionEngine;
use crate::history::HistoryStore;
use crate::model::{self, ConversionRecord};
use crate::rate_source::RateSource;

/// Snapshot of the workflow's observable fields. The workflow is the only
/// writer; callers read it back from each call.
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    pub is_loading: bool,
    pub result: Option<f64>,
    pub error_message: Option<String>,
    pub history: Vec<ConversionRecord>,
    pub is_loading_history: bool,
}

pub struct ConversionWorkflow<S, H> {
    engine: ConversionEngine<S>,
    store: H,
    state: WorkflowState,
}

impl<S: RateSource, H: HistoryStore> ConversionWorkflow<S, H> {
    pub fn new(engine: ConversionEngine<S>, store: H) -> Self {
        ConversionWorkflow {
            engine,
            store,
            state: WorkflowState::default(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Runs one conversion and, on success, appends it to the history. A
    /// failed save surfaces a message but never rolls back the displayed
    /// result. The loading flag clears on every path.
    pub async fn convert(&mut self, from: &str, to: &str, amount_text: &str) -> &WorkflowState {
        self.state.is_loading = true;
        self.state.result = None;
        self.state.error_message = None;

        match self.engine.convert(from, to, amount_text).await {
            Ok(outcome) => {
                debug!(
                    "Conversion succeeded: {} {} -> {} {}",
                    outcome.amount, from, outcome.result, to
                );
                self.state.result = Some(outcome.result);

                let record = ConversionRecord {
                    timestamp: model::format_timestamp(Utc::now().timestamp_millis()),
                    source: from.to_string(),
                    target: to.to_string(),
                    amount: outcome.amount,
                    result: outcome.result,
                };
                if let Err(e) = self.store.save(&record).await {
                    warn!("Failed to save conversion record: {}", e);
                    self.state.error_message = Some(format!("could not save conversion: {e}"));
                }
            }
            Err(e) => {
                error!("Conversion failed: {}", e);
                self.state.error_message = Some(e.to_string());
            }
        }

        self.state.is_loading = false;
        &self.state
    }

    /// Reloads the conversion history. On failure the history empties and a
    /// message is set; the loading flag clears on every path.
    pub async fn load_history(&mut self) -> &WorkflowState {
        self.state.is_loading_history = true;
        self.state.error_message = None;

        match self.store.list().await {
            Ok(records) => self.state.history = records,
            Err(e) => {
                error!("Failed to load conversion history: {}", e);
                self.state.history = Vec::new();
                self.state.error_message = Some(format!("could not load history: {e}"));
            }
        }

        self.state.is_loading_history = false;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, StoreError};
    use crate::rate_source::RateQuote;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubSource {
        rate: f64,
    }

    #[async_trait]
    impl RateSource for StubSource {
        async fn fetch(
            &self,
            _from: &str,
            _to: &str,
            amount: f64,
        ) -> Result<RateQuote, FetchError> {
            Ok(RateQuote {
                rate: self.rate,
                result: amount * self.rate,
                date: "2024-06-01".to_string(),
            })
        }
    }

    /// Records saves in memory; optionally fails every operation.
    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<ConversionRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl HistoryStore for RecordingStore {
        async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Remote("backend unavailable".to_string()));
            }
            self.saved.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<ConversionRecord>, StoreError> {
            if self.fail {
                return Err(StoreError::Remote("backend unavailable".to_string()));
            }
            Ok(self.saved.lock().unwrap().clone())
        }
    }

    fn workflow(
        rate: f64,
        fail_store: bool,
    ) -> ConversionWorkflow<StubSource, RecordingStore> {
        ConversionWorkflow::new(
            ConversionEngine::new(StubSource { rate }),
            RecordingStore {
                fail: fail_store,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_convert_saves_exactly_one_record() {
        let mut workflow = workflow(0.92, false);

        let state = workflow.convert("USD", "EUR", "100").await;

        assert_eq!(state.result, Some(92.0));
        assert!(state.error_message.is_none());
        assert!(!state.is_loading);

        let saved = workflow.store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].source, "USD");
        assert_eq!(saved[0].target, "EUR");
        assert_eq!(saved[0].amount, 100.0);
        assert_eq!(saved[0].result, 92.0);
        assert_ne!(model::parse_timestamp(&saved[0].timestamp), 0);
    }

    #[tokio::test]
    async fn test_convert_validation_failure_skips_save() {
        let mut workflow = workflow(0.92, false);

        let state = workflow.convert("", "EUR", "100").await;

        assert!(state.result.is_none());
        assert_eq!(state.error_message.as_deref(), Some("all fields are required"));
        assert!(!state.is_loading);
        assert!(workflow.store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_convert_fetch_failure_sets_prefixed_message() {
        struct FailingSource;

        #[async_trait]
        impl RateSource for FailingSource {
            async fn fetch(
                &self,
                _from: &str,
                _to: &str,
                _amount: f64,
            ) -> Result<RateQuote, FetchError> {
                Err(FetchError::CurrencyNotFound("EUR".to_string()))
            }
        }

        let mut workflow = ConversionWorkflow::new(
            ConversionEngine::new(FailingSource),
            RecordingStore::default(),
        );

        let state = workflow.convert("USD", "EUR", "100").await;

        assert!(state.result.is_none());
        assert!(state.error_message.as_deref().unwrap().starts_with("error:"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_displayed_result() {
        let mut workflow = workflow(0.92, true);

        let state = workflow.convert("USD", "EUR", "100").await;

        assert_eq!(state.result, Some(92.0));
        assert!(
            state
                .error_message
                .as_deref()
                .unwrap()
                .contains("could not save conversion")
        );
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_convert_clears_previous_state() {
        let mut workflow = workflow(0.92, false);

        workflow.convert("USD", "EUR", "abc").await;
        assert!(workflow.state().error_message.is_some());

        let state = workflow.convert("USD", "EUR", "100").await;
        assert_eq!(state.result, Some(92.0));
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn test_load_history_success() {
        let mut workflow = workflow(0.92, false);
        workflow.convert("USD", "EUR", "100").await;

        let state = workflow.load_history().await;

        assert_eq!(state.history.len(), 1);
        assert!(state.error_message.is_none());
        assert!(!state.is_loading_history);
    }

    #[tokio::test]
    async fn test_load_history_failure_empties_history() {
        let mut workflow = workflow(0.92, true);

        let state = workflow.load_history().await;

        assert!(state.history.is_empty());
        assert!(
            state
                .error_message
                .as_deref()
                .unwrap()
                .contains("could not load history")
        );
        assert!(!state.is_loading_history);
    }
}
