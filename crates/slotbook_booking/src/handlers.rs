// File: crates/slotbook_booking/src/handlers.rs
use crate::logic::{
    available_slots, build_meeting_event, confirmation_email, contact_email, day_bounds,
    validate_booking, AvailabilityQuery, AvailableSlotsResponse, BookingError, BookingPolicy,
    CreateMeetingRequest, CreateMeetingResponse, SendEmailRequest, SendEmailResponse,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use slotbook_common::services::{BoxedError, CalendarService, NotificationService};
use slotbook_config::AppConfig;
use std::sync::Arc;
use tracing::{error, info, warn};

// Define shared state needed by booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub policy: BookingPolicy,
    /// Calendar access handle, built once at startup.
    pub calendar: Option<Arc<dyn CalendarService<Error = BoxedError>>>,
    /// Notification access handle, built once at startup.
    pub notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

/// JSON error envelope: `{ error }` for validation failures, plus `details`
/// for downstream failures.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
            details: None,
        }),
    )
}

fn service_unavailable(error: &str) -> ApiError {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: error.to_string(),
            details: None,
        }),
    )
}

fn internal_error(error: &str, details: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
            details: Some(details),
        }),
    )
}

fn booking_error(err: BookingError) -> ApiError {
    match err {
        BookingError::MissingField | BookingError::InvalidFormat | BookingError::InvalidInput => {
            bad_request(err.to_string())
        }
        BookingError::UnavailableDay(message) => bad_request(message),
        BookingError::CalendarUnavailable(details) => {
            internal_error("Failed to create meeting", details)
        }
        BookingError::NotificationFailed(details) => internal_error("Failed to send email", details),
    }
}

fn calendar_id(config: &AppConfig) -> &str {
    config
        .gcal
        .as_ref()
        .and_then(|gcal| gcal.calendar_id.as_deref())
        .unwrap_or("primary")
}

fn max_events_per_day(config: &AppConfig) -> u32 {
    config
        .gcal
        .as_ref()
        .and_then(|gcal| gcal.max_events_per_day)
        .unwrap_or(250)
}

/// Handler to get available time slots for a date.
///
/// Blocked weekdays are a policy outcome, not an error: the response carries
/// an empty slot list plus an explanatory message with success status.
#[axum::debug_handler]
pub async fn available_slots_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableSlotsResponse>, ApiError> {
    let date_param = query
        .date
        .filter(|date| !date.trim().is_empty())
        .ok_or_else(|| bad_request("Date parameter is required"))?;

    let date = NaiveDate::parse_from_str(date_param.trim(), "%Y-%m-%d")
        .map_err(|_| bad_request("Invalid date format (YYYY-MM-DD)"))?;

    if state.policy.is_blocked(date.weekday()) {
        return Ok(Json(AvailableSlotsResponse {
            available_slots: Vec::new(),
            date: date_param,
            error: Some(state.policy.blocked_day_message()),
        }));
    }

    let calendar = state
        .calendar
        .as_ref()
        .ok_or_else(|| service_unavailable("Calendar service is disabled."))?;

    let (time_min, time_max) = day_bounds(date, state.policy.time_zone).ok_or_else(|| {
        internal_error(
            "Failed to fetch available slots",
            "could not resolve day bounds in the business time zone".to_string(),
        )
    })?;

    match calendar
        .list_events(
            calendar_id(&state.config),
            time_min,
            time_max,
            max_events_per_day(&state.config),
        )
        .await
    {
        Ok(events) => Ok(Json(AvailableSlotsResponse {
            available_slots: available_slots(&state.policy, date, &events),
            date: date_param,
            error: None,
        })),
        Err(e) => {
            error!("Error fetching events for {}: {}", date_param, e);
            Err(internal_error(
                "Failed to fetch available slots",
                e.to_string(),
            ))
        }
    }
}

/// Handler to book a slot: validate, create the calendar event with attendee
/// invitations, then send a best-effort confirmation email.
#[axum::debug_handler]
pub async fn create_meeting_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<CreateMeetingRequest>,
) -> Result<Json<CreateMeetingResponse>, ApiError> {
    // All validation happens before any external call.
    let booking = validate_booking(&state.policy, &payload).map_err(booking_error)?;

    let calendar = state
        .calendar
        .as_ref()
        .ok_or_else(|| service_unavailable("Calendar service is disabled."))?;

    let service_mailbox = state.config.booking.service_mailbox.clone();
    let event = build_meeting_event(&state.policy, service_mailbox.as_deref(), &booking);

    let created = calendar
        .insert_event(calendar_id(&state.config), event, true)
        .await
        .map_err(|e| {
            error!("Error creating meeting: {}", e);
            booking_error(BookingError::CalendarUnavailable(e.to_string()))
        })?;

    info!("Successfully created event: {:?}", created.event_id);

    // The calendar event is the authoritative record; the confirmation email
    // is best-effort and must not fail the booking.
    if let Some(notifier) = state.notifier.as_ref() {
        let signature = state
            .config
            .gmail
            .as_ref()
            .and_then(|gmail| gmail.sender_name.clone())
            .or_else(|| service_mailbox.clone())
            .unwrap_or_else(|| "The team".to_string());
        let email = confirmation_email(&booking, created.html_link.as_deref(), &signature);
        if let Err(e) = notifier.send_email(email).await {
            warn!(
                "Confirmation email to {} failed after successful booking: {}",
                booking.email, e
            );
        }
    } else {
        warn!("No notification service configured; skipping confirmation email");
    }

    Ok(Json(CreateMeetingResponse {
        success: true,
        message: "Meeting scheduled successfully".to_string(),
        event_id: created.event_id.unwrap_or_default(),
        event_link: created.html_link.unwrap_or_default(),
    }))
}

/// Handler for the contact form: forwards the message to the service mailbox.
#[axum::debug_handler]
pub async fn send_email_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.message.trim().is_empty()
    {
        return Err(bad_request("Missing required fields"));
    }

    let notifier = state
        .notifier
        .as_ref()
        .ok_or_else(|| service_unavailable("Email service is disabled."))?;

    let service_mailbox = state.config.booking.service_mailbox.clone().ok_or_else(|| {
        internal_error(
            "Failed to send email",
            "service mailbox is not configured".to_string(),
        )
    })?;

    match notifier
        .send_email(contact_email(&service_mailbox, &payload))
        .await
    {
        Ok(_) => Ok(Json(SendEmailResponse {
            success: true,
            message: "Email sent successfully".to_string(),
        })),
        Err(e) => {
            error!("Error sending contact email: {}", e);
            Err(booking_error(BookingError::NotificationFailed(
                e.to_string(),
            )))
        }
    }
}
