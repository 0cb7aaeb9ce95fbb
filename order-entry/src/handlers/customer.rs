use super::{draft_id, CUSTOMER_DRAFT_KEY};
use crate::models::{CustomerDraft, CustomerSession, Notice};
use crate::services::submission::submit_customer;
use crate::AppState;
use askama::Template;
use axum::{extract::State, http::HeaderMap, response::Redirect, Form};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id;
use tower_sessions::Session;
use validator::Validate;

const CUSTOMER_PAGE: &str = "/cliente";

#[derive(Template)]
#[template(path = "cliente.html")]
pub struct CustomerTemplate {
    pub current_page: &'static str,
    pub notice: Option<Notice>,
    pub customer: CustomerDraft,
    /// Derived `CardCode`, shown read-only.
    pub card_code: String,
    pub preview: Option<String>,
    pub submitting: bool,
}

fn render(form: &mut CustomerSession) -> Result<CustomerTemplate, AppError> {
    let preview = form
        .pending_payload()
        .map(|record| serde_json::to_string_pretty(record))
        .transpose()?;

    Ok(CustomerTemplate {
        current_page: "cliente",
        customer: form.draft().clone(),
        card_code: form.draft().card_code(),
        preview,
        submitting: form.is_submitting(),
        notice: form.take_notice(),
    })
}

pub async fn customer_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<CustomerTemplate, AppError> {
    let id = draft_id(&session, CUSTOMER_DRAFT_KEY).await?;
    state.customers.with_draft(id, render)
}

/// Keep what was typed, validate the OCRD record and show it for confirmation.
pub async fn register_customer(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CustomerDraft>,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, CUSTOMER_DRAFT_KEY).await?;
    state.customers.with_draft(id, |form| {
        form.edit(|draft| {
            *draft = input;
            Ok::<_, AppError>(())
        })?;

        let record = form.draft().record();
        record.validate()?;
        form.request_confirmation(record)?;
        Ok::<_, AppError>(())
    })?;

    Ok(Redirect::to(CUSTOMER_PAGE))
}

pub async fn send_customer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, CUSTOMER_DRAFT_KEY).await?;
    let notice = submit_customer(&state, id, request_id(&headers).map(str::to_string)).await?;

    tracing::info!(draft_id = %id, level = notice.level.as_str(), "Customer submission finished");
    Ok(Redirect::to(CUSTOMER_PAGE))
}

pub async fn cancel_customer(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, CUSTOMER_DRAFT_KEY).await?;
    state.customers.with_draft(id, |form| form.cancel())?;

    Ok(Redirect::to(CUSTOMER_PAGE))
}
