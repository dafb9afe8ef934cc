// --- File: crates/slotbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod features; // Runtime feature gating
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export the service seam types for easier access
pub use features::is_feature_enabled;
pub use services::{
    BoxFuture, BoxedError, BusyInterval, CalendarService, CreatedEvent, EmailMessage,
    MeetingEvent, NotificationResult, NotificationService, ReminderOverride, ServiceFactory,
};
