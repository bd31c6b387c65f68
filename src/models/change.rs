use serde::Serialize;

use super::booking::Booking;

// Payload broadcast to dashboard subscribers whenever a booking row is
// inserted or mutated. Carries the full post-write snapshot so clients can
// update without a re-fetch.
#[derive(Clone, Debug, Serialize)]
pub struct BookingChange {
    pub kind: ChangeKind,
    pub booking: Booking,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Inserted,
    Updated,
}
