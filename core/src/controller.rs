//! URL-decompose form controller.
//!
//! # Design
//! The controller owns the input text and the submission state and nothing
//! else. `submit` resets the state and hands back the request to execute;
//! the host performs the round-trip and feeds the outcome to `resolve`.
//!
//! Every submission is tagged with a sequence number. Only the outcome of the
//! latest submission is applied; a reply to an older submission that arrives
//! late is dropped, so a stale response can never overwrite a fresher one.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::{ApiError, DecomposeFailure};
use crate::http::{HttpRequest, Outcome};
use crate::render::{error_view, result_rows, View};
use crate::types::UrlDecomposition;

/// Exactly one of idle, success or failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Success(UrlDecomposition),
    Failure(DecomposeFailure),
}

/// A request waiting to be executed by the host.
#[derive(Debug, Clone)]
pub struct Submission {
    pub seq: u64,
    pub request: HttpRequest,
}

/// Whether `resolve` changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct DecomposeForm {
    client: ApiClient,
    url: String,
    state: SubmissionState,
    latest_seq: u64,
}

impl DecomposeForm {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            url: String::new(),
            state: SubmissionState::Idle,
            latest_seq: 0,
        }
    }

    /// Replace the input text. No validation happens here.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Start a submission: clear any previous result or error and build the
    /// request for the current input.
    pub fn submit(&mut self) -> Result<Submission, ApiError> {
        self.state = SubmissionState::Idle;
        let request = self.client.build_decompose(&self.url)?;
        self.latest_seq += 1;
        debug!(seq = self.latest_seq, "decompose submitted");
        Ok(Submission {
            seq: self.latest_seq,
            request,
        })
    }

    /// Apply the outcome of submission `seq`.
    pub fn resolve(&mut self, seq: u64, outcome: Outcome) -> Resolution {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "dropping stale decompose response");
            return Resolution::Stale;
        }
        self.state = match self.client.parse_decompose(outcome) {
            Ok(result) => SubmissionState::Success(result),
            Err(failure) => SubmissionState::Failure(failure),
        };
        Resolution::Applied
    }

    /// Submit and resolve in one step with a host-supplied executor.
    pub fn run<F>(&mut self, execute: F) -> Result<&SubmissionState, ApiError>
    where
        F: FnOnce(&HttpRequest) -> Outcome,
    {
        let submission = self.submit()?;
        let outcome = execute(&submission.request);
        self.resolve(submission.seq, outcome);
        Ok(&self.state)
    }

    pub fn view(&self) -> View {
        match &self.state {
            SubmissionState::Idle => View::Empty,
            SubmissionState::Success(result) => View::Result(result_rows(result)),
            SubmissionState::Failure(failure) => View::Error(error_view(failure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, TransportError};
    use crate::render::{GENERIC_ERROR_TITLE, VALIDATION_ERROR_TITLE};

    fn form() -> DecomposeForm {
        DecomposeForm::new(ApiClient::new("http://localhost:8000"))
    }

    fn ok(body: &str) -> Outcome {
        Ok(HttpResponse::new(200, body))
    }

    #[test]
    fn starts_idle_with_empty_view() {
        let form = form();
        assert_eq!(form.state(), &SubmissionState::Idle);
        assert_eq!(form.view(), View::Empty);
    }

    #[test]
    fn set_url_keeps_raw_text() {
        let mut form = form();
        form.set_url("https://test.com");
        assert_eq!(form.url(), "https://test.com");
        let submission = form.submit().unwrap();
        let body: serde_json::Value =
            serde_json::from_str(submission.request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["url"], "https://test.com");
    }

    #[test]
    fn submit_clears_previous_state() {
        let mut form = form();
        form.set_url("invalid");
        form.run(|_| Ok(HttpResponse::new(400, r#"{"detail":{"message":"error"}}"#)))
            .unwrap();
        assert!(matches!(form.state(), SubmissionState::Failure(_)));

        form.submit().unwrap();
        assert_eq!(form.state(), &SubmissionState::Idle);
    }

    #[test]
    fn success_then_error_then_success() {
        let mut form = form();
        form.set_url("invalid");
        form.run(|_| Ok(HttpResponse::new(400, r#"{"detail":{"message":"error"}}"#)))
            .unwrap();
        match form.view() {
            View::Error(view) => assert_eq!(view.title, VALIDATION_ERROR_TITLE),
            other => panic!("expected error view, got {other:?}"),
        }

        form.set_url("http://good.com");
        form.run(|_| ok(r#"{"scheme":"http","netloc":"good.com"}"#)).unwrap();
        match form.view() {
            View::Result(rows) => {
                assert_eq!(rows[0].value, "http");
                assert_eq!(rows[1].value, "good.com");
            }
            other => panic!("expected result view, got {other:?}"),
        }
    }

    #[test]
    fn rejected_request_renders_generic_error() {
        let mut form = form();
        form.set_url("https://example.com");
        let state = form.run(|_| Err(TransportError::new("Network error"))).unwrap();
        assert!(matches!(state, SubmissionState::Failure(DecomposeFailure::Transport(_))));
        match form.view() {
            View::Error(view) => {
                assert_eq!(view.title, GENERIC_ERROR_TITLE);
                assert!(!view.examples.is_empty());
            }
            other => panic!("expected error view, got {other:?}"),
        }
    }

    #[test]
    fn unstructured_error_body_is_not_a_transport_failure() {
        let mut form = form();
        let state = form.run(|_| Ok(HttpResponse::new(500, "Internal Server Error"))).unwrap();
        assert_eq!(
            state,
            &SubmissionState::Failure(DecomposeFailure::UnexpectedResponse { status: 500 })
        );
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut form = form();
        form.set_url("https://slow.example");
        let first = form.submit().unwrap();
        form.set_url("https://fast.example");
        let second = form.submit().unwrap();

        assert_eq!(
            form.resolve(second.seq, ok(r#"{"netloc":"fast.example"}"#)),
            Resolution::Applied
        );
        assert_eq!(
            form.resolve(first.seq, ok(r#"{"netloc":"slow.example"}"#)),
            Resolution::Stale
        );
        match form.state() {
            SubmissionState::Success(result) => {
                assert_eq!(result.netloc.as_deref(), Some("fast.example"))
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn in_order_responses_apply_latest() {
        let mut form = form();
        let first = form.submit().unwrap();
        assert_eq!(form.resolve(first.seq, ok(r#"{"netloc":"a"}"#)), Resolution::Applied);
        let second = form.submit().unwrap();
        assert_eq!(form.resolve(second.seq, ok(r#"{"netloc":"b"}"#)), Resolution::Applied);
        assert!(matches!(
            form.state(),
            SubmissionState::Success(r) if r.netloc.as_deref() == Some("b")
        ));
    }
}
