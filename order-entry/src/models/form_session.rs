//! Per-browser form session: a draft plus its confirm-before-send phase.
//!
//! ```text
//! Editing ──save──▶ PendingConfirmation ──send──▶ Submitting ──ok──▶ Editing (fresh draft)
//!    ▲                    │                            │
//!    └──────cancel/edit───┘                            └──error──▶ Editing (same draft)
//! ```
//!
//! Only one submission can be outstanding; edits and resubmissions are
//! refused while `Submitting`.

use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormStateError {
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("there is nothing pending confirmation")]
    NothingToConfirm,
}

impl From<FormStateError> for AppError {
    fn from(err: FormStateError) -> Self {
        AppError::Conflict(err.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPhase<P> {
    Editing,
    /// Preview shown; `P` is exactly what will be sent.
    PendingConfirmation(P),
    Submitting(P),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormSession<D, P> {
    draft: D,
    phase: SubmissionPhase<P>,
    notice: Option<Notice>,
}

impl<D: Default, P: Clone> Default for FormSession<D, P> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: Default, P: Clone> FormSession<D, P> {
    pub fn new(draft: D) -> Self {
        Self {
            draft,
            phase: SubmissionPhase::Editing,
            notice: None,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn phase(&self) -> &SubmissionPhase<P> {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitting(_))
    }

    /// Payload awaiting confirmation or in flight.
    pub fn pending_payload(&self) -> Option<&P> {
        match &self.phase {
            SubmissionPhase::PendingConfirmation(payload) | SubmissionPhase::Submitting(payload) => {
                Some(payload)
            }
            SubmissionPhase::Editing => None,
        }
    }

    /// Mutate the draft. A successful edit discards any pending preview so the
    /// user always confirms what is on screen.
    pub fn edit<R, E>(&mut self, f: impl FnOnce(&mut D) -> Result<R, E>) -> Result<R, E>
    where
        E: From<FormStateError>,
    {
        if self.is_submitting() {
            return Err(FormStateError::SubmissionInProgress.into());
        }
        let result = f(&mut self.draft)?;
        self.phase = SubmissionPhase::Editing;
        Ok(result)
    }

    pub fn request_confirmation(&mut self, payload: P) -> Result<(), FormStateError> {
        if self.is_submitting() {
            return Err(FormStateError::SubmissionInProgress);
        }
        self.phase = SubmissionPhase::PendingConfirmation(payload);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), FormStateError> {
        if self.is_submitting() {
            return Err(FormStateError::SubmissionInProgress);
        }
        self.phase = SubmissionPhase::Editing;
        Ok(())
    }

    /// Take the previewed payload for sending and lock the session.
    pub fn begin_submit(&mut self) -> Result<P, FormStateError> {
        match &self.phase {
            SubmissionPhase::PendingConfirmation(payload) => {
                let payload = payload.clone();
                self.phase = SubmissionPhase::Submitting(payload.clone());
                Ok(payload)
            }
            SubmissionPhase::Submitting(_) => Err(FormStateError::SubmissionInProgress),
            SubmissionPhase::Editing => Err(FormStateError::NothingToConfirm),
        }
    }

    /// Unlock after the transport answered. A success starts a fresh draft.
    pub fn finish_submit(&mut self, notice: Notice) {
        if notice.level == NoticeLevel::Success {
            self.draft = D::default();
        }
        self.phase = SubmissionPhase::Editing;
        self.notice = Some(notice);
    }

    /// Discard the draft, keeping nothing but a fresh one.
    pub fn reset(&mut self) -> Result<(), FormStateError> {
        if self.is_submitting() {
            return Err(FormStateError::SubmissionInProgress);
        }
        self.draft = D::default();
        self.phase = SubmissionPhase::Editing;
        self.notice = None;
        Ok(())
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
