use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, ChangeKind};
use crate::services::changes::publish_change;
use crate::services::confirmation;
use crate::state::AppState;

// Public booking shape. The confirmation code is delivered out of band and
// never leaves the admin surface.
#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_whatsapp: Option<String>,
    workspace_type: String,
    date: String,
    time_slot: String,
    duration: i64,
    total_price: f64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl From<&Booking> for BookingResponse {
    fn from(b: &Booking) -> Self {
        BookingResponse {
            id: b.id.clone(),
            customer_name: b.customer_name.clone(),
            customer_email: b.customer_email.clone(),
            customer_phone: b.customer_phone.clone(),
            customer_whatsapp: b.customer_whatsapp.clone(),
            workspace_type: b.workspace_type.clone(),
            date: b.date.format("%Y-%m-%d").to_string(),
            time_slot: b.time_slot.clone(),
            duration: b.duration,
            total_price: b.total_price,
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_whatsapp: Option<String>,
    pub workspace_type: String,
    pub date: String,
    pub time_slot: String,
    pub duration: Option<i64>,
    pub total_price: f64,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let name = body.customer_name.trim();
    let email = body.customer_email.trim();
    let phone = body.customer_phone.trim();
    if name.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(AppError::Validation(
            "customer_name, customer_email and customer_phone are required".to_string(),
        ));
    }
    if body.workspace_type.trim().is_empty() || body.time_slot.trim().is_empty() {
        return Err(AppError::Validation(
            "workspace_type and time_slot are required".to_string(),
        ));
    }
    let date = NaiveDate::parse_from_str(body.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be YYYY-MM-DD".to_string()))?;
    if body.total_price < 0.0 {
        return Err(AppError::Validation(
            "total_price must not be negative".to_string(),
        ));
    }
    let duration = body.duration.unwrap_or(1);
    if duration <= 0 {
        return Err(AppError::Validation(
            "duration must be a positive number of hours".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        customer_name: name.to_string(),
        customer_email: email.to_string(),
        customer_phone: phone.to_string(),
        customer_whatsapp: body
            .customer_whatsapp
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty()),
        workspace_type: body.workspace_type.trim().to_string(),
        date,
        time_slot: body.time_slot.trim().to_string(),
        duration,
        total_price: body.total_price,
        status: BookingStatus::Pending,
        confirmation_code: None,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::insert_booking(&db, &booking)?;
    }

    tracing::info!(
        booking_id = %booking.id,
        workspace_type = %booking.workspace_type,
        date = %booking.date,
        "booking created"
    );
    publish_change(&state, ChangeKind::Inserted, &booking);

    Ok(Json(BookingResponse::from(&booking)))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    Ok(Json(BookingResponse::from(&booking)))
}

// POST /api/bookings/:id/confirm
#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub code: String,
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ConfirmRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    // The code is matched exactly as submitted, no trimming.
    let booking = confirmation::confirm(&state, &id, &body.code).await?;
    Ok(Json(BookingResponse::from(&booking)))
}
