//! The contemplation loop — sequential recursive self-dialogue.
//!
//! Given a seed, a depth, and a mode, the engine issues one completion per
//! step, feeding each step's output back in as the next step's input. Every
//! step is journaled and appended to the in-process thought log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use mirrormind_core::error::{EngineError, ProviderError};
use mirrormind_core::message::Message;
use mirrormind_core::mode::RecursionMode;
use mirrormind_core::provider::{Provider, ProviderRequest};
use mirrormind_core::thought::ThoughtRecord;

use crate::decorate::Decorator;
use crate::journal::ThoughtJournal;

/// What to do when the provider fails partway through a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the sequence and propagate the error (default).
    Halt,
    /// Record a placeholder output and keep going.
    Placeholder,
}

impl FailurePolicy {
    /// Map a config string ("halt" / "placeholder") to a policy.
    /// Unknown strings fall back to `Halt`; config validation rejects them
    /// earlier.
    pub fn from_config(value: &str) -> Self {
        match value {
            "placeholder" => FailurePolicy::Placeholder,
            _ => FailurePolicy::Halt,
        }
    }
}

/// The recursion engine. One instance per process, shared via `Arc`.
pub struct ContemplationEngine {
    provider: Arc<dyn Provider>,
    model: String,
    journal: ThoughtJournal,
    decorator: Decorator,
    failure_policy: FailurePolicy,
    max_depth: u32,
    max_tokens: Option<u32>,
    thoughts: RwLock<Vec<ThoughtRecord>>,
    started_at: DateTime<Utc>,
}

impl ContemplationEngine {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        journal: ThoughtJournal,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            journal,
            decorator: Decorator::new(),
            failure_policy: FailurePolicy::Halt,
            max_depth: 10,
            max_tokens: None,
            thoughts: RwLock::new(Vec::new()),
            started_at: Utc::now(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = if max_tokens == 0 {
            None
        } else {
            Some(max_tokens)
        };
        self
    }

    /// Run a recursive contemplation.
    ///
    /// Produces exactly `depth` records where record i's input is record
    /// i-1's output (record 1's input is `seed`). Strictly sequential: each
    /// completion is awaited before the next begins.
    pub async fn contemplate(
        &self,
        seed: &str,
        depth: u32,
        mode: RecursionMode,
    ) -> Result<Vec<ThoughtRecord>, EngineError> {
        if depth == 0 || depth > self.max_depth {
            return Err(EngineError::InvalidDepth {
                depth,
                max: self.max_depth,
            });
        }

        info!(mode = %mode, depth, "Starting contemplation");

        let mut records = Vec::with_capacity(depth as usize);
        let mut current = seed.to_string();

        for step in 1..=depth {
            let output = match self.step(&current, mode).await {
                Ok(text) => text,
                Err(err) => match self.failure_policy {
                    FailurePolicy::Halt => {
                        warn!(step, error = %err, "Provider failed, halting sequence");
                        return Err(EngineError::Provider {
                            depth: step,
                            source: err,
                        });
                    }
                    FailurePolicy::Placeholder => {
                        warn!(step, error = %err, "Provider failed, recording placeholder");
                        format!("contemplation error: {err}")
                    }
                },
            };

            let record = ThoughtRecord::new(step, current.clone(), output.clone(), mode);
            self.journal.append(&record, &self.model)?;
            self.thoughts.write().await.push(record.clone());
            records.push(record);

            current = output;
        }

        info!(mode = %mode, steps = records.len(), "Contemplation complete");
        Ok(records)
    }

    /// One recursion step: format, complete, decorate.
    async fn step(&self, input: &str, mode: RecursionMode) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::user(mode.instruction(input))],
            temperature: mode.temperature(),
            max_tokens: self.max_tokens,
        };

        debug!(mode = %mode, temperature = request.temperature, "Requesting completion");

        let response = self.provider.complete(request).await?;
        Ok(self.decorator.apply(mode, &response.message.content))
    }

    /// The model this engine completes against.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Total thought records logged this process, across all requests.
    pub async fn thoughts_processed(&self) -> usize {
        self.thoughts.read().await.len()
    }

    /// Seconds since this engine instance was created.
    pub fn uptime_secs(&self) -> u64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
            .max(0) as u64
    }

    /// Names of every available mode.
    pub fn modes_available(&self) -> Vec<String> {
        RecursionMode::ALL
            .iter()
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
