use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::page::{PageProperties, PropertyValue};

/// Placeholder forwarded for any field the sender left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Client identifier used when the connection address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Postcard form as posted by the browser. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub recipient_address_1: Option<String>,
    #[serde(default)]
    pub recipient_address_2: Option<String>,
    #[serde(default)]
    pub recipient_state: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
}

/// A normalised submission, ready to be forwarded to the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub recipient_name: String,
    pub recipient_address_1: String,
    pub recipient_address_2: String,
    pub recipient_state: String,
    pub recipient_pin: String,
    pub sender_name: String,
    pub submitted_at: DateTime<Utc>,
    pub sender_ip: String,
}

fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

impl SubmissionRecord {
    /// Normalise a form. Absent and empty fields become [`NOT_AVAILABLE`].
    pub fn new(form: SubmissionForm, sender_ip: &str, submitted_at: DateTime<Utc>) -> Self {
        let sender_ip = if sender_ip.is_empty() {
            UNKNOWN_CLIENT.to_string()
        } else {
            sender_ip.to_string()
        };

        Self {
            recipient_name: or_not_available(form.recipient_name),
            recipient_address_1: or_not_available(form.recipient_address_1),
            recipient_address_2: or_not_available(form.recipient_address_2),
            recipient_state: or_not_available(form.recipient_state),
            recipient_pin: or_not_available(form.pin),
            sender_name: or_not_available(form.sender_name),
            submitted_at,
            sender_ip,
        }
    }

    /// ISO-8601 submission timestamp with millisecond precision.
    pub fn submitted_at_iso(&self) -> String {
        self.submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Columns of the postcard database.
    pub fn to_properties(&self) -> PageProperties {
        PageProperties::new()
            .with(
                "Recipient Full Name",
                PropertyValue::Title(self.recipient_name.clone()),
            )
            .with(
                "Recipient Address Line 1",
                PropertyValue::RichText(self.recipient_address_1.clone()),
            )
            .with(
                "Recipient Address Line 2",
                PropertyValue::RichText(self.recipient_address_2.clone()),
            )
            .with(
                "Recipient State",
                PropertyValue::RichText(self.recipient_state.clone()),
            )
            .with(
                "Recipient PIN Code",
                PropertyValue::RichText(self.recipient_pin.clone()),
            )
            .with("Submission Date", PropertyValue::Date(self.submitted_at))
            .with(
                "Sender Name",
                PropertyValue::RichText(self.sender_name.clone()),
            )
            .with(
                "Sender IP Address",
                PropertyValue::RichText(self.sender_ip.clone()),
            )
    }
}
