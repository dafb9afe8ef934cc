// --- File: crates/slotbook_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module defines the contracts for the two external capabilities the
//! booking core depends on: calendar access (read and write events against a
//! remote calendar) and notification access (send an email-like message).
//! Concrete implementations own their authentication lifecycle; the core only
//! sees these traits, which keeps handlers testable with in-memory fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for calendar access operations.
///
/// Implementations are expected to be stateless after construction so a
/// single handle can be shared across concurrent requests.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List occupied intervals intersecting `[time_min, time_max)`.
    ///
    /// Only start/end instants are surfaced; the query is capped at
    /// `max_results` events for performance.
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error>;

    /// Insert a meeting event, optionally sending invitations to attendees.
    fn insert_event(
        &self,
        calendar_id: &str,
        event: MeetingEvent,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CreatedEvent, Self::Error>;
}

/// A trait for notification access operations.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an email message on behalf of the service identity.
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A factory for creating service instances.
///
/// Built once at process start; handlers receive the resulting handles by
/// reference instead of lazily caching clients in global state.
pub trait ServiceFactory: Send + Sync {
    /// Get a calendar service instance, if configured.
    fn calendar_service(&self) -> Option<Arc<dyn CalendarService<Error = BoxedError>>>;

    /// Get a notification service instance, if configured.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;
}

/// An existing occupied interval on the remote calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A reminder attached to a created event. Semantics depend on what the
/// calendar backend supports; unsupported reminders are dropped silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOverride {
    /// Delivery method, e.g. "email" or "popup".
    pub method: String,
    /// Minutes before the event start.
    pub minutes: i32,
}

/// The derived entity handed to calendar access when booking a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA time zone label the event is displayed in.
    pub time_zone: String,
    /// Attendee email addresses (service mailbox first, then requester).
    pub attendees: Vec<String>,
    pub reminders: Vec<ReminderOverride>,
}

/// Result of inserting a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// The backend-assigned event identifier.
    pub event_id: Option<String>,
    /// A shareable link to the event, if the backend provides one.
    pub html_link: Option<String>,
    /// The status of the event, e.g. "confirmed".
    pub status: String,
}

/// An email message to be sent by notification access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    /// Address replies should go to, when different from the sender.
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Result of a notification send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub message_id: Option<String>,
    pub status: String,
}
