//! The submission protocol — a small state machine gating submit and
//! cancel intents on validation.
//!
//! Exactly one `Submitted` or `Cancelled` event is emitted per user action.
//! All handling happens on the single control flow that owns the
//! controller; the in-flight flag is the one serialization guard, covering
//! a validating future that was abandoned mid-await.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::instance::{FormId, FormInstance};
use crate::validation::{ValidationEngine, ValidationReport};

/// Protocol state of one form attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolState {
    /// Open for edits and intents
    Ready,
    /// A submit intent is being validated
    Validating,
    /// The attempt ended in submission; reopen to start another
    Submitted,
    /// The attempt ended in cancellation; reopen to start another
    Cancelled,
}

/// Single-shot notification emitted to the caller. The caller fetches the
/// data via `data()` on the referenced instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submitted { form: FormId },
    Cancelled { form: FormId },
}

/// What a submit intent came to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation passed; one Submitted event was emitted
    Submitted,
    /// Validation failed; the form stays open with the report attached
    Rejected(ValidationReport),
    /// Another intent is still in flight; nothing happened
    Busy,
    /// The attempt already ended; nothing happened
    Ignored,
}

/// What a cancel intent came to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// One Cancelled event was emitted
    Cancelled,
    /// A pending validation was aborted back to Ready; no event
    AbortedValidation,
    /// Another intent is still in flight; nothing happened
    Busy,
    /// The attempt already ended; nothing happened
    Ignored,
}

/// Drives the submit/cancel lifecycle of one form instance.
pub struct FormController {
    instance: FormInstance,
    engine: ValidationEngine,
    state: ProtocolState,
    in_flight: bool,
    last_report: Option<ValidationReport>,
    events: UnboundedSender<FormEvent>,
}

impl FormController {
    /// Wrap an instance and return the controller plus the event receiver
    /// the caller listens on.
    pub fn new(instance: FormInstance) -> (Self, UnboundedReceiver<FormEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                instance,
                engine: ValidationEngine::new(),
                state: ProtocolState::Ready,
                in_flight: false,
                last_report: None,
                events,
            },
            receiver,
        )
    }

    pub fn instance(&self) -> &FormInstance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut FormInstance {
        &mut self.instance
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// The report attached by the most recent rejected submit, if any.
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    /// Validate on demand without touching the protocol state.
    pub async fn request_validate(&mut self) -> ValidationReport {
        self.engine.validate(&mut self.instance).await
    }

    /// Handle a submit intent from the rendering layer.
    pub async fn notify_submit_intent(&mut self) -> SubmitOutcome {
        if self.in_flight {
            debug!(form = %self.instance.id(), "submit intent while busy, ignoring");
            return SubmitOutcome::Busy;
        }
        if self.state != ProtocolState::Ready {
            debug!(form = %self.instance.id(), state = ?self.state, "submit intent ignored");
            return SubmitOutcome::Ignored;
        }

        self.in_flight = true;
        self.state = ProtocolState::Validating;
        let report = self.engine.validate(&mut self.instance).await;
        self.in_flight = false;

        if report.is_valid() {
            self.state = ProtocolState::Submitted;
            self.last_report = None;
            self.emit(FormEvent::Submitted {
                form: self.instance.id(),
            });
            SubmitOutcome::Submitted
        } else {
            // stays open for correction; entered values are untouched
            self.state = ProtocolState::Ready;
            self.last_report = Some(report.clone());
            debug!(
                form = %self.instance.id(),
                fields = report.len(),
                "submit rejected, awaiting correction"
            );
            SubmitOutcome::Rejected(report)
        }
    }

    /// Handle a cancel intent from the rendering layer. Cancel bypasses
    /// validation entirely.
    pub fn notify_cancel_intent(&mut self) -> CancelOutcome {
        if self.in_flight {
            debug!(form = %self.instance.id(), "cancel intent while busy, ignoring");
            return CancelOutcome::Busy;
        }
        match self.state {
            ProtocolState::Ready => {
                self.state = ProtocolState::Cancelled;
                self.emit(FormEvent::Cancelled {
                    form: self.instance.id(),
                });
                CancelOutcome::Cancelled
            }
            ProtocolState::Validating => {
                // an abandoned validation: abort without emitting anything
                self.state = ProtocolState::Ready;
                CancelOutcome::AbortedValidation
            }
            ProtocolState::Submitted | ProtocolState::Cancelled => {
                debug!(form = %self.instance.id(), state = ?self.state, "cancel intent ignored");
                CancelOutcome::Ignored
            }
        }
    }

    /// Recover a controller whose validating future was dropped mid-await.
    /// Returns true if there was a pending validation to abort.
    pub fn abort_validation(&mut self) -> bool {
        if self.state == ProtocolState::Validating {
            self.state = ProtocolState::Ready;
            self.in_flight = false;
            true
        } else {
            false
        }
    }

    /// Return a submitted or cancelled form to Ready for another attempt.
    /// Entered values are preserved. Returns false if the form is not in a
    /// terminal state.
    pub fn reopen(&mut self) -> bool {
        match self.state {
            ProtocolState::Submitted | ProtocolState::Cancelled => {
                self.state = ProtocolState::Ready;
                true
            }
            _ => false,
        }
    }

    fn emit(&self, event: FormEvent) {
        // the caller may have dropped the receiver; that is its choice
        let _ = self.events.send(event);
    }
}
