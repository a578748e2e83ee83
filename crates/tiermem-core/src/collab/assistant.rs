//! Conversational assistant sessions.
//!
//! The remote service is abstracted behind [`AssistantService`]; runs complete
//! asynchronously and are awaited by polling with exponential backoff.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Assistant result type alias
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Assistant errors
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The remote service rejected or failed a request
    #[error("assistant service error: {message}")]
    Service { message: String },

    /// The run reached the `failed` status
    #[error("run {run_id} failed: {message}")]
    RunFailed { run_id: String, message: String },

    /// The run was still pending after the last poll
    #[error("run {run_id} did not finish after {attempts} polls")]
    Timeout { run_id: String, attempts: u32 },
}

impl AssistantError {
    /// Create a service error
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(SessionId);
string_id!(MessageId);
string_id!(RunId);

/// Run lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot of a run returned by a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub status: RunStatus,
    /// Assistant reply once completed
    pub output: Option<String>,
    /// Failure reason once failed
    pub error: Option<String>,
}

impl RunState {
    pub fn pending(status: RunStatus) -> Self {
        Self {
            status,
            output: None,
            error: None,
        }
    }

    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Completed,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Failed,
            output: None,
            error: Some(error.into()),
        }
    }
}

/// Remote assistant session service
#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn create_session(&self) -> AssistantResult<SessionId>;

    async fn post_message(&self, session: &SessionId, content: &str) -> AssistantResult<MessageId>;

    async fn start_run(&self, session: &SessionId) -> AssistantResult<RunId>;

    async fn poll_run(&self, session: &SessionId, run: &RunId) -> AssistantResult<RunState>;
}

/// Backoff between run polls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            backoff_multiplier: 2.0,
            max_attempts: 30,
        }
    }
}

/// Waits for runs to reach a terminal status
#[derive(Debug, Clone, Default)]
pub struct RunPoller {
    config: PollConfig,
}

impl RunPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Delay before poll number `attempt + 1`
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let base = self.config.initial_delay_ms as f64
            * self.config.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        if !base.is_finite() || base >= self.config.max_delay_ms as f64 {
            self.config.max_delay_ms
        } else {
            base as u64
        }
    }

    /// Poll until the run completes or fails
    pub async fn wait(
        &self,
        service: &dyn AssistantService,
        session: &SessionId,
        run: &RunId,
    ) -> AssistantResult<RunState> {
        for attempt in 0..self.config.max_attempts {
            let state = service.poll_run(session, run).await?;

            match state.status {
                RunStatus::Completed => return Ok(state),
                RunStatus::Failed => {
                    let message = state.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!(session = %session, run = %run, error = %message, "Assistant run failed");
                    return Err(AssistantError::RunFailed {
                        run_id: run.to_string(),
                        message,
                    });
                }
                RunStatus::Queued | RunStatus::Running => {
                    if attempt + 1 == self.config.max_attempts {
                        break;
                    }
                    let delay = self.delay_ms(attempt);
                    debug!(run = %run, status = ?state.status, attempt = attempt + 1, delay_ms = delay, "Run pending");
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                }
            }
        }

        warn!(run = %run, attempts = self.config.max_attempts, "Gave up waiting for assistant run");
        Err(AssistantError::Timeout {
            run_id: run.to_string(),
            attempts: self.config.max_attempts,
        })
    }
}

/// Send one message in a fresh session and wait for the reply
pub async fn ask(
    service: &dyn AssistantService,
    poller: &RunPoller,
    content: &str,
) -> AssistantResult<RunState> {
    let session = service.create_session().await?;
    service.post_message(&session, content).await?;
    let run = service.start_run(&session).await?;
    poller.wait(service, &session, &run).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays a fixed sequence of poll results
    struct ScriptedService {
        polls: Mutex<VecDeque<AssistantResult<RunState>>>,
        poll_count: AtomicU32,
        messages: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn new(polls: Vec<AssistantResult<RunState>>) -> Self {
            Self {
                polls: Mutex::new(polls.into()),
                poll_count: AtomicU32::new(0),
                messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AssistantService for ScriptedService {
        async fn create_session(&self) -> AssistantResult<SessionId> {
            Ok("session-1".into())
        }

        async fn post_message(&self, _session: &SessionId, content: &str) -> AssistantResult<MessageId> {
            self.messages.lock().unwrap().push(content.to_string());
            Ok("message-1".into())
        }

        async fn start_run(&self, _session: &SessionId) -> AssistantResult<RunId> {
            Ok("run-1".into())
        }

        async fn poll_run(&self, _session: &SessionId, _run: &RunId) -> AssistantResult<RunState> {
            self.poll_count.fetch_add(1, Ordering::SeqCst);
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RunState::pending(RunStatus::Running)))
        }
    }

    fn fast_poller(max_attempts: u32) -> RunPoller {
        RunPoller::new(PollConfig {
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
            max_attempts,
        })
    }

    #[test]
    fn test_delay_backoff() {
        let poller = RunPoller::default();
        assert_eq!(poller.delay_ms(0), 200);
        assert_eq!(poller.delay_ms(1), 400);
        assert_eq!(poller.delay_ms(4), 3_200);
        assert_eq!(poller.delay_ms(5), 5_000);
        assert_eq!(poller.delay_ms(10_000), 5_000);
    }

    #[test]
    fn test_run_status_terminal() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(!RunStatus::Queued.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }

    #[tokio::test]
    async fn test_ask_completes() {
        let service = ScriptedService::new(vec![
            Ok(RunState::pending(RunStatus::Queued)),
            Ok(RunState::pending(RunStatus::Running)),
            Ok(RunState::completed("Paris")),
        ]);

        let state = ask(&service, &fast_poller(10), "Capital of France?").await.unwrap();

        assert_eq!(state.output.as_deref(), Some("Paris"));
        assert_eq!(service.poll_count.load(Ordering::SeqCst), 3);
        assert_eq!(*service.messages.lock().unwrap(), vec!["Capital of France?"]);
    }

    #[tokio::test]
    async fn test_wait_run_failed() {
        let service = ScriptedService::new(vec![
            Ok(RunState::pending(RunStatus::Running)),
            Ok(RunState::failed("rate limited")),
        ]);

        let err = fast_poller(10)
            .wait(&service, &"session-1".into(), &"run-1".into())
            .await
            .unwrap_err();

        match err {
            AssistantError::RunFailed { run_id, message } => {
                assert_eq!(run_id, "run-1");
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_wait_times_out() {
        let service = ScriptedService::new(Vec::new());

        let err = fast_poller(4)
            .wait(&service, &"session-1".into(), &"run-1".into())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(service.poll_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_service_error_propagates() {
        let service = ScriptedService::new(vec![Err(AssistantError::service("502 bad gateway"))]);

        let err = tokio_test::block_on(fast_poller(3).wait(
            &service,
            &"session-1".into(),
            &"run-1".into(),
        ))
        .unwrap_err();

        assert!(err.to_string().contains("502"));
        assert_eq!(service.poll_count.load(Ordering::SeqCst), 1);
    }
}
