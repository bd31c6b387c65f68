use crate::models::{Booking, BookingChange, ChangeKind};
use crate::state::AppState;

// Publish a committed insert/update to dashboard subscribers.
pub fn publish_change(state: &AppState, kind: ChangeKind, booking: &Booking) {
    let change = BookingChange {
        kind,
        booking: booking.clone(),
    };
    // Broadcast to SSE subscribers; ignore if nobody is connected.
    let _ = state.changes_tx.send(change);
}
