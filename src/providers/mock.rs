/*!
 * Mock translator implementations for testing.
 *
 * This module provides a scripted translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::failing()` - Always fails with a server error
 * - `MockTranslator::unauthorized()` - Rejects the credential until new credentials are set
 * - `MockTranslator::slow(ms)` - Succeeds after a delay
 *
 * Every request is recorded so tests can check what reached the service.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{TranslationRequest, TranslationResult, Translator};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with a server error
    Failing,
    /// Answers 401 until `set_credentials` is called
    Unauthorized,
    /// Returns an empty translation
    Empty,
    /// Simulates a slow service
    Slow { delay_ms: u64 },
}

/// Mock translator for testing session behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Fixed answers by source text
    responses: Arc<HashMap<String, String>>,
    /// Requests received so far
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Set once new credentials arrived
    reauthenticated: Arc<AtomicBool>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            responses: Arc::new(HashMap::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
            request_count: Arc::new(AtomicUsize::new(0)),
            reauthenticated: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn unauthorized() -> Self {
        Self::new(MockBehavior::Unauthorized)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Answer `text` with `translation` instead of the generated default
    pub fn with_response(mut self, text: impl Into<String>, translation: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.responses).insert(text.into(), translation.into());
        self
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received, oldest first
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    fn answer(&self, request: &TranslationRequest) -> TranslationResult {
        let text = self.responses
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", request.target_language, request.text));
        TranslationResult { text }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => Ok(self.answer(request)),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.answer(request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated service failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Unauthorized => {
                if self.reauthenticated.load(Ordering::SeqCst) {
                    Ok(self.answer(request))
                } else {
                    Err(ProviderError::AuthenticationError("Simulated expired token".to_string()))
                }
            }

            MockBehavior::Empty => Ok(TranslationResult { text: String::new() }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.answer(request))
            }
        }
    }

    fn set_credentials(&self, _token: &str) {
        self.reauthenticated.store(true, Ordering::SeqCst);
    }
}
