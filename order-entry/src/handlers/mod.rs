pub mod app;
pub mod customer;
pub mod metrics;
pub mod order;

use service_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

pub const ORDER_DRAFT_KEY: &str = "order_draft_id";
pub const CUSTOMER_DRAFT_KEY: &str = "customer_draft_id";

/// Draft id bound to this browser session, allocated on first visit.
pub(crate) async fn draft_id(session: &Session, key: &str) -> Result<Uuid, AppError> {
    let existing: Option<Uuid> = session
        .get(key)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session
        .insert(key, id)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    tracing::debug!(key = %key, draft_id = %id, "Allocated new draft");
    Ok(id)
}
