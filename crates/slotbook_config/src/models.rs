// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Booking Policy Config ---
// Blocked weekdays and the two bookable hour ranges are deployment policy,
// not algorithmic necessity, so they live here rather than in the source.

/// A half-open range of integer hours `[start, end)` in 24-hour local time.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Weekdays on which no bookings are offered ("Mon".."Sun").
    #[serde(default = "default_blocked_weekdays")]
    pub blocked_weekdays: Vec<String>,
    /// Morning bookable window, e.g. 8..14 for 8am-2pm.
    #[serde(default = "default_morning")]
    pub morning: HourRange,
    /// Evening bookable window, e.g. 19..22 for 7pm-10pm.
    #[serde(default = "default_evening")]
    pub evening: HourRange,
    /// Summary line used for created calendar events.
    #[serde(default)]
    pub meeting_summary: Option<String>,
    /// IANA time zone the bookable hours are expressed in. Defaults to UTC.
    #[serde(default)]
    pub time_zone: Option<String>,
    /// The service's own mailbox, invited to every booked meeting and the
    /// recipient of contact-form messages.
    #[serde(default)]
    pub service_mailbox: Option<String>,
}

fn default_blocked_weekdays() -> Vec<String> {
    vec!["Fri".to_string(), "Sat".to_string()]
}

fn default_morning() -> HourRange {
    HourRange { start: 8, end: 14 }
}

fn default_evening() -> HourRange {
    HourRange { start: 19, end: 22 }
}

impl Default for BookingConfig {
    fn default() -> Self {
        BookingConfig {
            blocked_weekdays: default_blocked_weekdays(),
            morning: default_morning(),
            evening: default_evening(),
            meeting_summary: None,
            time_zone: None,
            service_mailbox: None,
        }
    }
}

// --- Google Calendar Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
    /// Cap on events fetched per availability query.
    pub max_events_per_day: Option<u32>,
    // Secrets loaded from the service account key file at key_path.
}

// --- Gmail Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GmailConfig {
    pub key_path: Option<String>,
    /// Mailbox confirmation emails are sent from (impersonated subject).
    pub sender_email: Option<String>,
    /// Display name used in the From header.
    pub sender_name: Option<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_gmail: bool,

    // --- Booking policy (falls back to reference defaults) ---
    #[serde(default)]
    pub booking: BookingConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub gmail: Option<GmailConfig>,
}
