// --- File: crates/slotbook_booking/src/routes.rs ---

use crate::handlers::{
    available_slots_handler, create_meeting_handler, send_email_handler, BookingState,
};
use crate::logic::BookingPolicy;
use axum::{
    routing::{get, post},
    Router,
};
use slotbook_common::services::ServiceFactory;
use slotbook_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all booking and contact routes.
///
/// Service handles come from the factory built at process start, so every
/// request reuses the same authenticated clients.
pub fn routes(config: Arc<AppConfig>, factory: Arc<dyn ServiceFactory>) -> Router {
    let booking_state = Arc::new(BookingState {
        policy: BookingPolicy::from_config(&config.booking),
        calendar: factory.calendar_service(),
        notifier: factory.notification_service(),
        config,
    });

    Router::new()
        .route("/booking/available-slots", get(available_slots_handler))
        .route("/booking/create-meeting", post(create_meeting_handler))
        .route("/contact/send-email", post(send_email_handler))
        .with_state(booking_state)
}
