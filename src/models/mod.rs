pub mod booking;
pub mod change;

pub use booking::{Booking, BookingStatus};
pub use change::{BookingChange, ChangeKind};
