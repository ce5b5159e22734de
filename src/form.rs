use tracing::{debug, warn};

use crate::api::RunResponse;
use crate::client::{AgentRunner, RequestError};

/// Shown when a failed request carries no message of its own.
pub const FALLBACK_ERROR: &str = "요청 실패";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Loading,
    Answered(String),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct FormController {
    input: String,
    state: FormState,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Loading)
    }

    pub fn controls_disabled(&self) -> bool {
        self.is_loading()
    }

    pub fn answer(&self) -> Option<&str> {
        match &self.state {
            FormState::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FormState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.controls_disabled() {
            return false;
        }
        self.input = text.into();
        true
    }

    /// Starts a submission and hands back the trimmed query to send.
    ///
    /// Returns `None` without touching the state when the trimmed input is
    /// empty or a request is already pending.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.controls_disabled() {
            debug!("submit ignored while a request is pending");
            return None;
        }
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.state = FormState::Loading;
        debug!("form loading");
        Some(query)
    }

    pub fn settle(&mut self, result: Result<RunResponse, RequestError>) {
        if !self.is_loading() {
            warn!(state = ?self.state, "settle called with no pending request");
            return;
        }
        self.state = match result {
            Ok(response) => {
                if !response.success {
                    warn!("agent reported success=false; showing its answer anyway");
                }
                FormState::Answered(response.final_answer)
            }
            Err(err) if err.message().is_empty() => {
                FormState::Failed(FALLBACK_ERROR.to_string())
            }
            Err(err) => FormState::Failed(err.message().to_string()),
        };
        debug!(state = ?self.state, "form settled");
    }

    pub async fn submit<R>(&mut self, runner: &R) -> bool
    where
        R: AgentRunner + ?Sized,
    {
        let Some(query) = self.begin_submit() else {
            return false;
        };
        let result = runner.run(&query).await;
        self.settle(result);
        true
    }
}
