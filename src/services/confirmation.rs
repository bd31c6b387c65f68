use std::sync::Arc;

use rand::Rng;

use crate::auth::AdminSession;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, ChangeKind};
use crate::services::changes::publish_change;
use crate::services::notifier::{NotifyAction, WebhookEvent};
use crate::state::AppState;

// Uniformly random 6-digit decimal code. The range keeps the first digit
// non-zero, so rendering needs no padding.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

// Issue (or re-issue) a confirmation code and move the booking to code_sent.
// A fresh code always overwrites whatever was stored before.
pub async fn issue_code(
    state: &Arc<AppState>,
    session: &AdminSession,
    booking_id: &str,
) -> Result<Booking, AppError> {
    let _guard = state.booking_locks.acquire(booking_id).await;

    let code = generate_code();

    let booking = {
        let db = state.db.lock().unwrap();

        queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

        queries::update_booking_code(&db, booking_id, &BookingStatus::CodeSent, &code)?;

        queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?
    };

    tracing::info!(
        booking_id = %booking_id,
        actor = %session.actor,
        "confirmation code issued"
    );

    publish_change(state, ChangeKind::Updated, &booking);
    dispatch_notification(state, NotifyAction::SendConfirmationCode, &booking);

    Ok(booking)
}

// Customer-facing confirmation: exact, case-sensitive match against the
// stored code, only from code_sent.
pub async fn confirm(
    state: &Arc<AppState>,
    booking_id: &str,
    supplied_code: &str,
) -> Result<Booking, AppError> {
    let _guard = state.booking_locks.acquire(booking_id).await;

    let booking = {
        let db = state.db.lock().unwrap();

        let booking = queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

        if booking.status != BookingStatus::CodeSent {
            return Err(AppError::InvalidState {
                status: booking.status,
            });
        }

        let stored_code = match booking.confirmation_code.as_deref() {
            Some(code) if code == supplied_code => code.to_string(),
            _ => return Err(AppError::InvalidCode),
        };

        // The code is rewritten with the value it already holds: confirmed
        // records keep their code.
        queries::update_booking_code(&db, booking_id, &BookingStatus::Confirmed, &stored_code)?;

        queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?
    };

    tracing::info!(booking_id = %booking_id, "booking confirmed by customer");

    publish_change(state, ChangeKind::Updated, &booking);
    dispatch_notification(state, NotifyAction::BookingConfirmedByCustomer, &booking);

    Ok(booking)
}

// Reject a booking. The protocol only requires the record to exist; the
// dashboard offers the action for pending and code_sent rows.
pub async fn reject(
    state: &Arc<AppState>,
    session: &AdminSession,
    booking_id: &str,
) -> Result<Booking, AppError> {
    let _guard = state.booking_locks.acquire(booking_id).await;

    let (previous_status, booking) = {
        let db = state.db.lock().unwrap();

        let booking = queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        let previous_status = booking.status;

        queries::update_booking_status(&db, booking_id, &BookingStatus::Rejected)?;

        let updated = queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        (previous_status, updated)
    };

    tracing::info!(
        booking_id = %booking_id,
        actor = %session.actor,
        previous_status = %previous_status,
        "booking rejected"
    );

    publish_change(state, ChangeKind::Updated, &booking);
    dispatch_notification(state, NotifyAction::BookingRejected, &booking);

    Ok(booking)
}

// The store mutation has already committed by the time this runs, so webhook
// delivery is best-effort: failures are logged and never reach the caller.
fn dispatch_notification(state: &Arc<AppState>, action: NotifyAction, booking: &Booking) {
    let event = WebhookEvent::new(action, booking);
    let notifier = Arc::clone(&state.notifier);
    tokio::spawn(async move {
        if let Err(e) = notifier.post(&event).await {
            tracing::warn!(
                error = %e,
                action = event.action.as_str(),
                booking_id = %event.booking_id,
                "webhook notification failed"
            );
        }
    });
}
