//! Confirmed submissions: take the previewed payload, post it, report back.

use crate::models::{FormSession, Notice};
use crate::services::draft_store::DraftStore;
use crate::services::erp_client::{ErpAck, SubmitError};
use crate::services::metrics::record_submission;
use crate::AppState;
use service_core::error::AppError;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Order,
    Customer,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Order => "order",
            SubmissionKind::Customer => "customer",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            SubmissionKind::Order => "Orden guardada correctamente",
            SubmissionKind::Customer => "Cliente registrado correctamente",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            SubmissionKind::Order => "Error al guardar la orden",
            SubmissionKind::Customer => "Error al registrar el cliente",
        }
    }
}

/// User-facing notice for a transport outcome.
pub fn outcome_notice(kind: SubmissionKind, result: &Result<ErpAck, SubmitError>) -> Notice {
    match result {
        Ok(ack) if kind == SubmissionKind::Order && !ack.body.is_empty() => {
            Notice::success(format!("{}: {}", kind.success_message(), ack.body))
        }
        Ok(_) => Notice::success(kind.success_message()),
        Err(err) => match err.detail() {
            Some(detail) => Notice::error(format!("{}: {}", kind.failure_message(), detail)),
            None => Notice::error(kind.failure_message()),
        },
    }
}

pub async fn submit_order(
    state: &AppState,
    draft_id: Uuid,
    request_id: Option<String>,
) -> Result<Notice, AppError> {
    let client = state.erp_client.clone();
    run_submission(
        state.orders.clone(),
        draft_id,
        SubmissionKind::Order,
        move |payload| async move {
            tracing::info!(
                client = %payload.cliente_codigo,
                lines = payload.detalles.len(),
                total = %payload.total,
                "Submitting order"
            );
            client.create_order(&payload, request_id.as_deref()).await
        },
    )
    .await
}

pub async fn submit_customer(
    state: &AppState,
    draft_id: Uuid,
    request_id: Option<String>,
) -> Result<Notice, AppError> {
    let client = state.erp_client.clone();
    run_submission(
        state.customers.clone(),
        draft_id,
        SubmissionKind::Customer,
        move |record| async move {
            tracing::info!(card_code = %record.card_code, "Submitting customer");
            client.create_customer(&record, request_id.as_deref()).await
        },
    )
    .await
}

/// Lock the session, send outside the lock, then unlock with a notice.
///
/// The send runs on its own task so the session is released even if the
/// browser disconnects mid-request. A task that dies without answering
/// still unlocks the session, with the generic failure notice.
async fn run_submission<D, P, F, Fut>(
    store: Arc<DraftStore<FormSession<D, P>>>,
    draft_id: Uuid,
    kind: SubmissionKind,
    send: F,
) -> Result<Notice, AppError>
where
    D: Default + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
    F: FnOnce(P) -> Fut + Send + 'static,
    Fut: Future<Output = Result<ErpAck, SubmitError>> + Send + 'static,
{
    let payload = store.with_draft(draft_id, |session| session.begin_submit())?;
    let sessions = store.clone();

    let task = tokio::spawn(async move {
        let result = send(payload).await;

        match &result {
            Ok(ack) => {
                tracing::info!(kind = kind.as_str(), status = %ack.status, "Submission sent");
                record_submission(kind.as_str(), "sent");
            }
            Err(err) => {
                tracing::error!(kind = kind.as_str(), error = %err, "Submission failed");
                record_submission(kind.as_str(), "failed");
            }
        }

        let notice = outcome_notice(kind, &result);
        store.with_draft(draft_id, |session| session.finish_submit(notice.clone()));
        notice
    });

    match task.await {
        Ok(notice) => Ok(notice),
        Err(e) => {
            tracing::error!(kind = kind.as_str(), error = %e, "Submission task aborted");
            record_submission(kind.as_str(), "failed");
            sessions.with_draft(draft_id, |session| {
                session.finish_submit(Notice::error(kind.failure_message()))
            });
            Err(AppError::InternalError(anyhow::anyhow!(
                "Submission task failed: {}",
                e
            )))
        }
    }
}
