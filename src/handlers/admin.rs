use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::services::confirmation;
use crate::state::AppState;

const DEFAULT_TOTAL_DESKS: &str = "20";
const DEFAULT_HOURLY_SLOTS: &str = "09:00 - 10:00,10:00 - 11:00,11:00 - 12:00,12:00 - 13:00,13:00 - 14:00,14:00 - 15:00,15:00 - 16:00,16:00 - 17:00";

// GET /api/admin/stats
#[derive(Serialize)]
pub struct StatsResponse {
    total_bookings: i64,
    pending_count: i64,
    confirmed_revenue: f64,
    active_members: i64,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    auth::authenticate(&headers, &state.config)?;

    let stats = {
        let db = state.db.lock().unwrap();
        queries::get_dashboard_stats(&db)?
    };

    Ok(Json(StatsResponse {
        total_bookings: stats.total_bookings,
        pending_count: stats.pending_count,
        confirmed_revenue: stats.confirmed_revenue,
        active_members: stats.active_members,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

// Admin booking shape, code included so the dashboard can show what was
// sent to the customer.
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
    confirmation_code: Option<String>,
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
            confirmation_code: b.confirmation_code.clone(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    auth::authenticate(&headers, &state.config)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db, status_filter, limit)?
    };

    let response: Vec<BookingResponse> = bookings.iter().map(BookingResponse::from).collect();
    Ok(Json(response))
}

// POST /api/admin/bookings/:id/send-code
pub async fn send_code(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let session = auth::authenticate(&headers, &state.config)?;

    let booking = confirmation::issue_code(&state, &session, &id).await?;
    Ok(Json(BookingResponse::from(&booking)))
}

// POST /api/admin/bookings/:id/reject
pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let session = auth::authenticate(&headers, &state.config)?;

    let booking = confirmation::reject(&state, &session, &id).await?;
    Ok(Json(BookingResponse::from(&booking)))
}

// GET /api/admin/settings
#[derive(Serialize)]
pub struct SettingsResponse {
    total_desks: String,
    hourly_slots: String,
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SettingsResponse>, AppError> {
    auth::authenticate(&headers, &state.config)?;

    let (total_desks, hourly_slots) = {
        let db = state.db.lock().unwrap();
        (
            queries::get_setting(&db, "total_desks", DEFAULT_TOTAL_DESKS)?,
            queries::get_setting(&db, "hourly_slots", DEFAULT_HOURLY_SLOTS)?,
        )
    };

    Ok(Json(SettingsResponse {
        total_desks,
        hourly_slots,
    }))
}

// POST /api/admin/settings
#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub total_desks: Option<String>,
    pub hourly_slots: Option<String>,
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::authenticate(&headers, &state.config)?;

    if let Some(desks) = &body.total_desks {
        match desks.trim().parse::<i64>() {
            Ok(n) if n > 0 => {}
            _ => {
                return Err(AppError::Validation(
                    "total_desks must be a positive integer".to_string(),
                ))
            }
        }
    }

    {
        let db = state.db.lock().unwrap();
        if let Some(desks) = &body.total_desks {
            queries::set_setting(&db, "total_desks", desks.trim())?;
        }
        if let Some(slots) = &body.hourly_slots {
            queries::set_setting(&db, "hourly_slots", slots)?;
        }
    }

    Ok(Json(serde_json::json!({"ok": true})))
}
