pub mod admin;
pub mod bookings;
pub mod events;
pub mod health;
