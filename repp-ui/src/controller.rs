//! Submission controller
//!
//! Drives one prediction request at a time through
//! `Idle → Submitting → Success | Failed`.
//!
//! # Single-flight
//! [`SubmissionController::begin`] checks that no attempt is in flight
//! before anything else happens; a submit received while Submitting is
//! ignored. [`SubmissionController::submit`] runs begin, dispatch and
//! resolve in sequence for callers that simply await the result.
//!
//! # Snapshots
//! The active mode's data is cloned when an attempt starts, so edits made
//! to the form while a request is outstanding do not affect it.

use crate::api_client::{ApiError, ErrorMessage, PredictionApi};
use crate::form::{InputForm, InputMode};
use repp_common::{AttributeRecord, Prediction};
use thiserror::Error;
use tracing::{debug, info_span, warn, Instrument};

/// Lifecycle of the current submission
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success(Prediction),
    Failed(ErrorMessage),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// Prediction of the last successful attempt, if the state holds one
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            SubmissionState::Success(prediction) => Some(prediction),
            _ => None,
        }
    }
}

/// Local rejection before any network call
///
/// Never moves the controller into Failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Listing URL is empty")]
    EmptyLink,
}

/// Immutable copy of the active mode's data taken at submit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionInput {
    Attributes(AttributeRecord),
    Link(String),
}

impl SubmissionInput {
    /// Snapshot the active mode of `form`
    pub fn capture(form: &InputForm) -> Result<Self, ValidationError> {
        match form.mode() {
            InputMode::Manual => Ok(SubmissionInput::Attributes(form.record().clone())),
            InputMode::Link => {
                let url = form.link().trim();
                if url.is_empty() {
                    return Err(ValidationError::EmptyLink);
                }
                Ok(SubmissionInput::Link(url.to_string()))
            }
        }
    }

    /// Send this input to the matching endpoint
    pub async fn dispatch<A: PredictionApi>(&self, api: &A) -> Result<Prediction, ApiError> {
        match self {
            SubmissionInput::Attributes(record) => api.predict_from_attributes(record).await,
            SubmissionInput::Link(url) => api.predict_from_link(url).await,
        }
    }
}

/// Ticket for an attempt that has entered Submitting
#[derive(Debug)]
pub struct PendingSubmission {
    attempt: u64,
    input: SubmissionInput,
}

impl PendingSubmission {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn input(&self) -> &SubmissionInput {
        &self.input
    }
}

/// Result of [`SubmissionController::begin`]
#[derive(Debug)]
pub enum BeginOutcome {
    Started(PendingSubmission),
    /// An attempt is already in flight; nothing changed
    Ignored,
}

/// Result of one submit action
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success(Prediction),
    Failed(ErrorMessage),
    /// An attempt was already in flight
    Ignored,
    /// Local validation failed; state unchanged
    Rejected(ValidationError),
}

type SuccessHook = Box<dyn FnMut(&Prediction) + Send>;

/// Single-flight submission state machine
#[derive(Default)]
pub struct SubmissionController {
    state: SubmissionState,
    /// Number of attempts started so far
    attempts: u64,
    /// Attempt currently in Submitting
    in_flight: Option<u64>,
    last_input: Option<SubmissionInput>,
    on_success: Option<SuccessHook>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Snapshot used by the most recent attempt
    pub fn last_input(&self) -> Option<&SubmissionInput> {
        self.last_input.as_ref()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Register the hook run synchronously on every transition to Success
    ///
    /// Replaces any previously registered hook.
    pub fn on_success<F>(&mut self, hook: F)
    where
        F: FnMut(&Prediction) + Send + 'static,
    {
        self.on_success = Some(Box::new(hook));
    }

    /// Start an attempt from the form's active mode
    pub fn begin(&mut self, form: &InputForm) -> Result<BeginOutcome, ValidationError> {
        if self.state.is_submitting() {
            warn!(attempt = ?self.in_flight, "Submit ignored: request already in flight");
            return Ok(BeginOutcome::Ignored);
        }

        let input = SubmissionInput::capture(form)?;

        self.attempts += 1;
        let attempt = self.attempts;
        self.in_flight = Some(attempt);
        self.last_input = Some(input.clone());
        self.state = SubmissionState::Submitting;
        debug!(attempt, mode = %form.mode(), "Submitting");

        Ok(BeginOutcome::Started(PendingSubmission { attempt, input }))
    }

    /// Apply the service outcome of a started attempt
    ///
    /// A ticket that is not the attempt in flight is discarded.
    pub fn resolve(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<Prediction, ApiError>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(pending.attempt) {
            warn!(
                attempt = pending.attempt,
                in_flight = ?self.in_flight,
                "Discarding result of stale submission"
            );
            return SubmitOutcome::Ignored;
        }
        self.in_flight = None;

        match outcome {
            Ok(prediction) => {
                debug!(attempt = pending.attempt, "Submission succeeded");
                self.state = SubmissionState::Success(prediction);
                if let Some(hook) = self.on_success.as_mut() {
                    hook(&prediction);
                }
                SubmitOutcome::Success(prediction)
            }
            Err(e) => {
                warn!(attempt = pending.attempt, error = %e, "Submission failed");
                let message = e.message();
                self.state = SubmissionState::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Submit the form's active mode and wait for the service
    pub async fn submit<A: PredictionApi>(&mut self, form: &InputForm, api: &A) -> SubmitOutcome {
        let pending = match self.begin(form) {
            Ok(BeginOutcome::Started(pending)) => pending,
            Ok(BeginOutcome::Ignored) => return SubmitOutcome::Ignored,
            Err(e) => {
                debug!(error = %e, "Submit rejected locally");
                return SubmitOutcome::Rejected(e);
            }
        };

        let span = info_span!("submission", attempt = pending.attempt);
        let outcome = pending.input.dispatch(api).instrument(span).await;
        self.resolve(pending, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repp_common::{AttributeField, Locale, Preferences};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Scripted stand-in for the prediction service
    #[derive(Default)]
    struct FakeApi {
        reply: Mutex<Option<Result<Prediction, ApiError>>>,
        calls: AtomicUsize,
        last_record: Mutex<Option<AttributeRecord>>,
    }

    impl FakeApi {
        fn replying(reply: Result<Prediction, ApiError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next_reply(&self) -> Result<Prediction, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(ApiError::Transport("no reply scripted".to_string())))
        }
    }

    impl PredictionApi for FakeApi {
        async fn predict_from_attributes(
            &self,
            record: &AttributeRecord,
        ) -> Result<Prediction, ApiError> {
            *self.last_record.lock().unwrap() = Some(record.clone());
            self.next_reply()
        }

        async fn predict_from_link(&self, _url: &str) -> Result<Prediction, ApiError> {
            self.next_reply()
        }
    }

    fn prediction() -> Prediction {
        Prediction::new(150000.0, 10500000.0)
    }

    #[tokio::test]
    async fn test_empty_record_is_submitted() {
        let api = FakeApi::replying(Ok(prediction()));
        let mut controller = SubmissionController::new();

        let outcome = controller.submit(&InputForm::new(), &api).await;

        assert_eq!(outcome, SubmitOutcome::Success(prediction()));
        assert_eq!(api.calls(), 1);
        assert!(api.last_record.lock().unwrap().as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_begin_while_submitting_is_ignored() {
        let mut controller = SubmissionController::new();
        let form = InputForm::new();

        let first = controller.begin(&form).unwrap();
        assert!(matches!(first, BeginOutcome::Started(_)));
        assert!(controller.state().is_submitting());

        let second = controller.begin(&form).unwrap();
        assert!(matches!(second, BeginOutcome::Ignored));
        assert!(controller.state().is_submitting());
        assert_eq!(controller.attempts(), 1);
    }

    #[test]
    fn test_empty_link_rejected_without_state_change() {
        let mut controller = SubmissionController::new();
        let mut form = InputForm::new();
        form.set_mode(InputMode::Link);
        form.set_link("   ");

        assert_eq!(controller.begin(&form).unwrap_err(), ValidationError::EmptyLink);
        assert_eq!(controller.state(), &SubmissionState::Idle);
        assert_eq!(controller.attempts(), 0);
    }

    #[tokio::test]
    async fn test_empty_link_after_success_keeps_success() {
        let api = FakeApi::replying(Ok(prediction()));
        let mut controller = SubmissionController::new();
        let mut form = InputForm::new();
        controller.submit(&form, &api).await;

        form.set_mode(InputMode::Link);
        let outcome = controller.submit(&form, &api).await;

        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::EmptyLink));
        assert_eq!(controller.state(), &SubmissionState::Success(prediction()));
        assert_eq!(api.calls(), 1);
    }

    #[test]
    fn test_snapshot_isolated_from_later_edits() {
        let mut controller = SubmissionController::new();
        let mut form = InputForm::new();
        form.set_attribute(AttributeField::TotalArea, "70");

        let pending = match controller.begin(&form).unwrap() {
            BeginOutcome::Started(pending) => pending,
            BeginOutcome::Ignored => panic!("first begin must start"),
        };
        form.set_attribute(AttributeField::TotalArea, "99");
        assert_eq!(controller.last_input(), Some(pending.input()));

        match pending.input() {
            SubmissionInput::Attributes(record) => {
                assert_eq!(record.get(AttributeField::TotalArea), "70")
            }
            other => panic!("unexpected snapshot {:?}", other),
        }
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut controller = SubmissionController::new();
        let form = InputForm::new();

        let first = match controller.begin(&form).unwrap() {
            BeginOutcome::Started(p) => p,
            BeginOutcome::Ignored => unreachable!(),
        };
        let forged = PendingSubmission {
            attempt: first.attempt() + 10,
            input: first.input().clone(),
        };

        assert_eq!(controller.resolve(forged, Ok(prediction())), SubmitOutcome::Ignored);
        assert!(controller.state().is_submitting());

        assert_eq!(
            controller.resolve(first, Ok(prediction())),
            SubmitOutcome::Success(prediction())
        );
    }

    #[tokio::test]
    async fn test_failure_then_resubmit_discards_error() {
        let api = FakeApi::replying(Err(ApiError::Service {
            status: 422,
            detail: "invalid url".to_string(),
        }));
        let mut controller = SubmissionController::new();
        let mut form = InputForm::new();
        form.set_mode(InputMode::Link);
        form.set_link("https://example.org/not-a-listing");

        let outcome = controller.submit(&form, &api).await;
        assert_eq!(outcome, SubmitOutcome::Failed(ErrorMessage::new("invalid url")));
        assert_eq!(form.link(), "https://example.org/not-a-listing");

        *api.reply.lock().unwrap() = Some(Ok(prediction()));
        let outcome = controller.submit(&form, &api).await;
        assert_eq!(outcome, SubmitOutcome::Success(prediction()));
        assert_eq!(controller.state().prediction(), Some(&prediction()));
    }

    #[tokio::test]
    async fn test_success_hook_runs_once_per_success() {
        let api = FakeApi::replying(Ok(prediction()));
        let mut controller = SubmissionController::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.on_success(move |p| sink.lock().unwrap().push(*p));

        let form = InputForm::new();
        controller.submit(&form, &api).await;
        controller.submit(&form, &api).await;

        *api.reply.lock().unwrap() = Some(Err(ApiError::Status { status: 500 }));
        controller.submit(&form, &api).await;

        assert_eq!(*seen.lock().unwrap(), vec![prediction(), prediction()]);
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_preference_toggles_leave_state_alone() {
        let api = FakeApi::replying(Ok(prediction()));
        let mut controller = SubmissionController::new();
        let mut prefs = Preferences::new();
        controller.submit(&InputForm::new(), &api).await;
        let before = controller.state().clone();

        prefs.toggle_locale();
        prefs.toggle_theme();

        assert_eq!(prefs.locale(), Locale::En);
        assert_eq!(controller.state(), &before);
    }
}
