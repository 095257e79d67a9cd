//! Order draft handlers.
//!
//! One handler per order-entry screen event: create/read/discard a draft,
//! add and remove lines, resize a line, apply a discount, and submit. All
//! mutation flows through the order engine; handlers only hold the lock
//! and map domain errors onto HTTP.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{DraftStatus, OrderLine, OrderTotals, Product};
use crate::services::metrics::record_submission;
use crate::services::{OrderDraft, OrderError};
use crate::AppState;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request to add a catalog product to a draft. Carries the full product
/// record: the catalog is external and this service never refetches it.
#[derive(Debug, Deserialize, Validate)]
pub struct AddLineRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub unit_label: String,
    #[serde(default)]
    pub stock_count: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<AddLineRequest> for Product {
    fn from(req: AddLineRequest) -> Self {
        Self {
            product_id: req.product_id,
            name: req.name,
            unit_price: req.unit_price,
            unit_label: req.unit_label,
            stock_count: req.stock_count,
            category: req.category,
            image_url: req.image_url,
        }
    }
}

/// Request to set the quantity on a line.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

/// Request to apply a percentage discount to all current lines.
#[derive(Debug, Deserialize)]
pub struct ApplyDiscountRequest {
    pub rate: u32,
}

/// Request to submit a draft as a persisted order.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub customer_id: Option<Uuid>,
}

/// Draft view returned by every draft endpoint.
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft_id: Uuid,
    pub created_utc: DateTime<Utc>,
    pub status: DraftStatus,
    pub discount_rate: u32,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
}

impl From<&OrderDraft> for DraftResponse {
    fn from(draft: &OrderDraft) -> Self {
        Self {
            draft_id: draft.draft_id,
            created_utc: draft.created_utc,
            status: draft.order.status(),
            discount_rate: draft.order.discount_rate(),
            lines: draft.order.lines().to_vec(),
            totals: draft.order.totals(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Mutations are refused while a submission is outstanding for the draft.
fn ensure_composing(draft: &OrderDraft) -> Result<(), AppError> {
    if draft.order.status() == DraftStatus::Submitting {
        return Err(OrderError::SubmissionInFlight.into());
    }
    Ok(())
}

// ============================================================================
// Draft Handlers
// ============================================================================

/// Create an empty draft.
///
/// POST /api/drafts
pub async fn create_draft(State(state): State<AppState>) -> (StatusCode, Json<DraftResponse>) {
    let draft = OrderDraft::new();
    let response = DraftResponse::from(&draft);

    state.drafts.write().await.insert(draft.draft_id, draft);

    tracing::info!(draft_id = %response.draft_id, "Order draft created");

    (StatusCode::CREATED, Json(response))
}

/// Get a draft with its lines and totals.
///
/// GET /api/drafts/:draft_id
pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftResponse>, AppError> {
    let drafts = state.drafts.read().await;
    let draft = drafts
        .get(&draft_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;

    Ok(Json(DraftResponse::from(draft)))
}

/// Discard a draft (navigation away from the screen).
///
/// DELETE /api/drafts/:draft_id
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .drafts
        .write()
        .await
        .remove(&draft_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;

    tracing::info!(draft_id = %draft_id, "Order draft discarded");

    Ok(StatusCode::NO_CONTENT)
}

/// Add a product to a draft. An already-present product increments its
/// line's quantity instead of creating a duplicate line.
///
/// POST /api/drafts/:draft_id/lines
pub async fn add_line(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(req): Json<AddLineRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    req.validate()?;

    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;
    ensure_composing(draft)?;

    draft.order.add_product(&Product::from(req));

    Ok(Json(DraftResponse::from(&*draft)))
}

/// Remove a line. Removing an absent product is a no-op, not an error.
///
/// DELETE /api/drafts/:draft_id/lines/:product_id
pub async fn remove_line(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DraftResponse>, AppError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;
    ensure_composing(draft)?;

    draft.order.remove_product(product_id);

    Ok(Json(DraftResponse::from(&*draft)))
}

/// Set the quantity on a line.
///
/// PUT /api/drafts/:draft_id/lines/:product_id
pub async fn set_line_quantity(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;
    ensure_composing(draft)?;

    draft.order.set_quantity(product_id, req.quantity)?;

    Ok(Json(DraftResponse::from(&*draft)))
}

/// Apply a percentage discount to every current line.
///
/// POST /api/drafts/:draft_id/discount
pub async fn apply_discount(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(req): Json<ApplyDiscountRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts
        .get_mut(&draft_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;
    ensure_composing(draft)?;

    draft.order.apply_discount(req.rate)?;

    Ok(Json(DraftResponse::from(&*draft)))
}

/// Submit a draft to the upstream orders API.
///
/// A missing customer blocks the request before any state change. The
/// upstream call runs outside the draft lock; the submitting state keeps
/// other submissions and mutations out in the meantime. Success resets the
/// draft, failure leaves the lines intact so the user can retry.
///
/// POST /api/drafts/:draft_id/submit
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = {
        let mut drafts = state.drafts.write().await;
        let draft = drafts
            .get_mut(&draft_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Draft not found")))?;

        let payload = draft.order.build_payload(req.customer_id)?;
        draft.order.begin_submission()?;
        payload
    };

    let result = state.order_client.submit(&payload).await;

    {
        let mut drafts = state.drafts.write().await;
        if let Some(draft) = drafts.get_mut(&draft_id) {
            draft.order.finish_submission(result.is_ok());
        }
    }

    match result {
        Ok(()) => {
            record_submission("accepted");
            tracing::info!(
                draft_id = %draft_id,
                customer = %payload.customer,
                line_count = payload.products.len(),
                discount = payload.discount,
                "Order submitted"
            );
            Ok(Json(MessageResponse {
                message: "Order created successfully".to_string(),
            }))
        }
        Err(e) => {
            record_submission("failed");
            tracing::warn!(draft_id = %draft_id, error = %e, "Order submission failed");
            Err(e)
        }
    }
}
