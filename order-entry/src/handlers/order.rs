use super::{draft_id, ORDER_DRAFT_KEY};
use crate::models::{
    build_payload, HeaderField, LineEdit, LineItem, Notice, OrderError, OrderSession, OrderState,
};
use crate::services::submission::submit_order;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    response::Redirect,
    Form,
};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::middleware::tracing::request_id;
use tower_sessions::Session;

const ORDER_PAGE: &str = "/";

#[derive(Template)]
#[template(path = "ov.html")]
pub struct OrderTemplate {
    pub current_page: &'static str,
    pub notice: Option<Notice>,
    pub order: OrderView,
    /// Pretty JSON of the payload awaiting confirmation.
    pub preview: Option<String>,
    pub submitting: bool,
}

pub struct OrderView {
    pub correlative_id: String,
    pub client_code: String,
    pub client_name: String,
    pub document: String,
    pub date: String,
    pub shipping_address: String,
    pub lines: Vec<LineView>,
    pub total: String,
}

pub struct LineView {
    pub index: usize,
    pub code: String,
    pub description: String,
    pub unit_price: String,
    pub quantity: String,
    pub subtotal: String,
}

impl LineView {
    fn new(index: usize, line: &LineItem) -> Self {
        Self {
            index,
            code: line.code().to_string(),
            description: line.description().to_string(),
            unit_price: line.unit_price().normalize().to_string(),
            quantity: line.quantity().normalize().to_string(),
            subtotal: format!("{:.2}", line.subtotal()),
        }
    }
}

impl From<&OrderState> for OrderView {
    fn from(order: &OrderState) -> Self {
        Self {
            correlative_id: order.correlative_id().to_string(),
            client_code: order.client_code().to_string(),
            client_name: order.client_name().to_string(),
            document: order.document().to_string(),
            date: order.date().to_string(),
            shipping_address: order.shipping_address().to_string(),
            lines: order
                .lines()
                .iter()
                .enumerate()
                .map(|(index, line)| LineView::new(index, line))
                .collect(),
            total: format!("{:.2}", order.total()),
        }
    }
}

fn render(form: &mut OrderSession) -> Result<OrderTemplate, AppError> {
    let preview = form
        .pending_payload()
        .map(|payload| serde_json::to_string_pretty(payload))
        .transpose()?;

    Ok(OrderTemplate {
        current_page: "ov",
        order: OrderView::from(form.draft()),
        preview,
        submitting: form.is_submitting(),
        notice: form.take_notice(),
    })
}

pub async fn order_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrderTemplate, AppError> {
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, render)
}

/// Header inputs arrive as `name=value` pairs using the wire field names.
pub async fn update_header(
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let fields = fields
        .into_iter()
        .map(|(name, value)| Ok((name.parse::<HeaderField>()?, value)))
        .collect::<Result<Vec<_>, OrderError>>()?;

    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, |form| {
        form.edit(|order| {
            for (field, value) in fields {
                order.set_header_field(field, value);
            }
            Ok::<_, AppError>(())
        })
    })?;

    Ok(Redirect::to(ORDER_PAGE))
}

pub async fn add_line(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    let index = state
        .orders
        .with_draft(id, |form| form.edit(|order| Ok::<_, AppError>(order.add_line())))?;

    tracing::debug!(draft_id = %id, index, "Line added");
    Ok(Redirect::to(ORDER_PAGE))
}

#[derive(Deserialize)]
pub struct LineEditForm {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Line index from the URL. Anything that is not a position is a line that
/// does not exist.
fn line_index(path: Result<Path<usize>, PathRejection>) -> Result<usize, AppError> {
    path.map(|Path(index)| index).map_err(|rejection| {
        AppError::NotFound(anyhow::anyhow!("No such line: {}", rejection.body_text()))
    })
}

pub async fn update_line(
    State(state): State<AppState>,
    session: Session,
    index: Result<Path<usize>, PathRejection>,
    Form(input): Form<LineEditForm>,
) -> Result<Redirect, AppError> {
    let index = line_index(index)?;
    let edit = LineEdit::parse(&input.field, &input.value)?;

    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, |form| {
        form.edit(|order| {
            order.update_line(index, edit)?;
            Ok::<_, AppError>(())
        })
    })?;

    Ok(Redirect::to(ORDER_PAGE))
}

pub async fn remove_line(
    State(state): State<AppState>,
    session: Session,
    index: Result<Path<usize>, PathRejection>,
) -> Result<Redirect, AppError> {
    let index = line_index(index)?;
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, |form| {
        form.edit(|order| {
            order.remove_line(index)?;
            Ok::<_, AppError>(())
        })
    })?;

    tracing::debug!(draft_id = %id, index, "Line removed");
    Ok(Redirect::to(ORDER_PAGE))
}

/// Build the payload and show it for confirmation. Nothing is sent yet.
pub async fn save_order(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, |form| {
        let payload = build_payload(form.draft());
        form.request_confirmation(payload)
    })?;

    Ok(Redirect::to(ORDER_PAGE))
}

pub async fn send_order(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    let notice = submit_order(&state, id, request_id(&headers).map(str::to_string)).await?;

    tracing::info!(draft_id = %id, level = notice.level.as_str(), "Order submission finished");
    Ok(Redirect::to(ORDER_PAGE))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, |form| form.cancel())?;

    Ok(Redirect::to(ORDER_PAGE))
}

/// Discard the draft and start a new order.
pub async fn reset_order(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let id = draft_id(&session, ORDER_DRAFT_KEY).await?;
    state.orders.with_draft(id, |form| form.reset())?;

    Ok(Redirect::to(ORDER_PAGE))
}
