pub mod webhook;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::models::Booking;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotifyAction {
    SendConfirmationCode,
    BookingConfirmedByCustomer,
    BookingRejected,
}

impl NotifyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyAction::SendConfirmationCode => "send_confirmation_code",
            NotifyAction::BookingConfirmedByCustomer => "booking_confirmed_by_customer",
            NotifyAction::BookingRejected => "booking_rejected",
        }
    }
}

// Body POSTed to the external webhook on every status change. Field names
// are camelCase on the wire; the consumer is a third-party integration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub action: NotifyAction,
    pub booking_id: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
    pub customer_data: CustomerData,
    pub booking_details: BookingDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub workspace_type: String,
    pub date: String,
    pub time_slot: String,
    pub duration: i64,
    pub total_price: f64,
}

impl WebhookEvent {
    pub fn new(action: NotifyAction, booking: &Booking) -> Self {
        Self {
            action,
            booking_id: booking.id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            // The code is only disclosed on the send_confirmation_code event.
            confirmation_code: match action {
                NotifyAction::SendConfirmationCode => booking.confirmation_code.clone(),
                _ => None,
            },
            customer_data: CustomerData {
                name: booking.customer_name.clone(),
                email: booking.customer_email.clone(),
                phone: booking.customer_phone.clone(),
                whatsapp: booking.customer_whatsapp.clone(),
            },
            booking_details: BookingDetails {
                workspace_type: booking.workspace_type.clone(),
                date: booking.date.format("%Y-%m-%d").to_string(),
                time_slot: booking.time_slot.clone(),
                duration: booking.duration,
                total_price: booking.total_price,
            },
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post(&self, event: &WebhookEvent) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::NaiveDate;

    fn sample_booking() -> Booking {
        Booking {
            id: "bk-1".to_string(),
            customer_name: "Alice".to_string(),
            customer_email: "alice@example.com".to_string(),
            customer_phone: "+15551110000".to_string(),
            customer_whatsapp: None,
            workspace_type: "hot_desk".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            time_slot: "09:00 - 10:00".to_string(),
            duration: 2,
            total_price: 30.0,
            status: BookingStatus::CodeSent,
            confirmation_code: Some("482913".to_string()),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_event_wire_format() {
        let event = WebhookEvent::new(NotifyAction::SendConfirmationCode, &sample_booking());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], "send_confirmation_code");
        assert_eq!(json["bookingId"], "bk-1");
        assert_eq!(json["confirmationCode"], "482913");
        assert_eq!(json["customerData"]["name"], "Alice");
        assert_eq!(json["customerData"]["email"], "alice@example.com");
        assert_eq!(json["bookingDetails"]["workspaceType"], "hot_desk");
        assert_eq!(json["bookingDetails"]["date"], "2025-06-15");
        assert_eq!(json["bookingDetails"]["totalPrice"], 30.0);
        // RFC 3339 timestamp with explicit UTC marker
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_code_not_disclosed_on_other_actions() {
        let event = WebhookEvent::new(NotifyAction::BookingConfirmedByCustomer, &sample_booking());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], "booking_confirmed_by_customer");
        assert!(json.get("confirmationCode").is_none());
    }
}
