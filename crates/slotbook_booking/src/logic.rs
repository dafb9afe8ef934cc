// --- File: crates/slotbook_booking/src/logic.rs ---
//! Availability computation and booking validation.
//!
//! Everything in this module is pure: slot arithmetic, display-time parsing,
//! and construction of the calendar event and confirmation email. Handlers
//! own the external calls.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotbook_common::services::{BusyInterval, EmailMessage, MeetingEvent, ReminderOverride};
use slotbook_config::{BookingConfig, HourRange};
use std::str::FromStr;
use thiserror::Error;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Missing required fields")]
    MissingField,
    #[error("Invalid time format")]
    InvalidFormat,
    #[error("Invalid date format (YYYY-MM-DD)")]
    InvalidInput,
    #[error("{0}")]
    UnavailableDay(String),
    #[error("Calendar service error: {0}")]
    CalendarUnavailable(String),
    #[error("Notification send failed: {0}")]
    NotificationFailed(String),
}

// --- Data Structures ---
#[derive(Deserialize, Debug)]
pub struct AvailabilityQuery {
    /// Target date in YYYY-MM-DD format
    pub date: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    /// Display-formatted bookable slots, chronological ("9:00 AM", ...).
    pub available_slots: Vec<String>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateMeetingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// YYYY-MM-DD
    #[serde(default)]
    pub date: String,
    /// Display time, e.g. "2:00 PM"
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingResponse {
    pub success: bool,
    pub message: String,
    pub event_id: String,
    pub event_link: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
}

// --- Booking Policy ---

/// Deployment policy for bookable slots, parsed once from configuration.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub blocked_weekdays: Vec<Weekday>,
    pub morning: HourRange,
    pub evening: HourRange,
    pub time_zone: Tz,
    pub meeting_summary: String,
}

fn parse_weekday(day: &str) -> Option<Weekday> {
    match day {
        "Mon" => Some(Weekday::Mon),
        "Tue" => Some(Weekday::Tue),
        "Wed" => Some(Weekday::Wed),
        "Thu" => Some(Weekday::Thu),
        "Fri" => Some(Weekday::Fri),
        "Sat" => Some(Weekday::Sat),
        "Sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl BookingPolicy {
    pub fn from_config(config: &BookingConfig) -> Self {
        let blocked_weekdays = config
            .blocked_weekdays
            .iter()
            .filter_map(|day| parse_weekday(day))
            .collect();
        let time_zone = config
            .time_zone
            .as_deref()
            .and_then(|tz| Tz::from_str(tz).ok())
            .unwrap_or(Tz::UTC);
        let meeting_summary = config
            .meeting_summary
            .clone()
            .unwrap_or_else(|| "Discovery Meeting".to_string());

        BookingPolicy {
            blocked_weekdays,
            morning: config.morning,
            evening: config.evening,
            time_zone,
            meeting_summary,
        }
    }

    pub fn is_blocked(&self, weekday: Weekday) -> bool {
        self.blocked_weekdays.contains(&weekday)
    }

    /// User-facing reason for an empty slot list on a blocked weekday,
    /// e.g. "Bookings are not available on Friday or Saturday".
    pub fn blocked_day_message(&self) -> String {
        let names: Vec<&str> = self
            .blocked_weekdays
            .iter()
            .map(|day| weekday_name(*day))
            .collect();
        format!("Bookings are not available on {}", names.join(" or "))
    }

    /// All candidate slot hours, morning range first, then evening range.
    pub fn slot_hours(&self) -> impl Iterator<Item = u32> + '_ {
        (self.morning.start..self.morning.end).chain(self.evening.start..self.evening.end)
    }
}

// --- Availability Logic ---

/// UTC bounds of the given civil date in the business time zone.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()?;
    let end = tz
        .from_local_datetime(&date.succ_opt()?.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// UTC bounds of the one-hour slot `[h:00, (h+1):00)` on the given date.
/// Returns None for hours a DST transition removes from the local day.
pub fn slot_bounds(date: NaiveDate, hour: u32, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz
        .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, 0, 0)
        .earliest()?;
    let end = start + Duration::hours(1);
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Strict half-open overlap test: the slot is free iff no event satisfies
/// `slot_start < event.end && slot_end > event.start`.
pub fn slot_is_free(
    slot_start: DateTime<Utc>,
    slot_end: DateTime<Utc>,
    events: &[BusyInterval],
) -> bool {
    !events
        .iter()
        .any(|event| slot_start < event.end && slot_end > event.start)
}

/// Computes the display-formatted bookable slots for a date, in chronological
/// order. Blocked-weekday handling happens before this is called.
pub fn available_slots(
    policy: &BookingPolicy,
    date: NaiveDate,
    events: &[BusyInterval],
) -> Vec<String> {
    policy
        .slot_hours()
        .filter_map(|hour| {
            let (slot_start, slot_end) = slot_bounds(date, hour, policy.time_zone)?;
            slot_is_free(slot_start, slot_end, events).then(|| format_slot_hour(hour))
        })
        .collect()
}

/// 12-hour clock label without a leading zero: 0 -> "12:00 AM",
/// 9 -> "9:00 AM", 12 -> "12:00 PM", 13 -> "1:00 PM".
pub fn format_slot_hour(hour: u32) -> String {
    let (display, period) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{}:00 {}", display, period)
}

/// Parses a display time like "2:00 PM" (case-insensitive, 1-2 digit hour,
/// 2 digit minutes) into a 24-hour (hour, minute) pair: PM adds 12 unless
/// the hour is 12; 12 AM becomes hour 0.
pub fn parse_display_time(time: &str) -> Result<(u32, u32), BookingError> {
    let upper = time.trim().to_ascii_uppercase();
    let (clock, is_pm) = if let Some(rest) = upper.strip_suffix("PM") {
        (rest, true)
    } else if let Some(rest) = upper.strip_suffix("AM") {
        (rest, false)
    } else {
        return Err(BookingError::InvalidFormat);
    };

    let clock = clock.trim_end();
    let (hour_str, minute_str) = clock.split_once(':').ok_or(BookingError::InvalidFormat)?;
    let digits_only = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(hour_str) || hour_str.len() > 2 || !digits_only(minute_str) || minute_str.len() != 2
    {
        return Err(BookingError::InvalidFormat);
    }

    let hour: u32 = hour_str.parse().map_err(|_| BookingError::InvalidFormat)?;
    let minute: u32 = minute_str.parse().map_err(|_| BookingError::InvalidFormat)?;
    if hour > 12 || minute > 59 {
        return Err(BookingError::InvalidFormat);
    }

    let hour = match (is_pm, hour) {
        (true, h) if h != 12 => h + 12,
        (false, 12) => 0,
        (_, h) => h,
    };
    Ok((hour, minute))
}

/// Long-form date for descriptions and emails, e.g. "Monday, 2 June 2025".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

// --- Booking Validation ---

/// A booking request that passed validation, with resolved slot instants.
#[derive(Debug, Clone)]
pub struct ValidatedBooking {
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    /// The display time as submitted, e.g. "2:00 PM".
    pub display_time: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub message: Option<String>,
}

/// Validates a booking request without touching any external service.
///
/// Order matters: presence first, then date parse, then blocked weekday,
/// then time format, so bad input never reaches a collaborator.
pub fn validate_booking(
    policy: &BookingPolicy,
    request: &CreateMeetingRequest,
) -> Result<ValidatedBooking, BookingError> {
    let name = request.name.trim();
    let email = request.email.trim();
    let date_str = request.date.trim();
    let time_str = request.time.trim();
    if name.is_empty() || email.is_empty() || date_str.is_empty() || time_str.is_empty() {
        return Err(BookingError::MissingField);
    }

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidInput)?;

    if policy.is_blocked(date.weekday()) {
        return Err(BookingError::UnavailableDay(policy.blocked_day_message()));
    }

    let (hour, minute) = parse_display_time(time_str)?;
    let start = policy
        .time_zone
        .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, minute, 0)
        .earliest()
        .ok_or(BookingError::InvalidFormat)?
        .with_timezone(&Utc);
    let end = start + Duration::hours(1);

    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    Ok(ValidatedBooking {
        name: name.to_string(),
        email: email.to_string(),
        date,
        display_time: time_str.to_string(),
        start,
        end,
        message,
    })
}

// --- Event & Email Construction ---

/// Multi-line event description embedding the requester details.
pub fn meeting_description(summary: &str, booking: &ValidatedBooking) -> String {
    let mut description = format!(
        "{}\n\nClient Information:\n- Name: {}\n- Email: {}\n- Date: {}\n- Time: {}\n- Duration: 1 hour",
        summary,
        booking.name,
        booking.email,
        long_date(booking.date),
        booking.display_time,
    );
    if let Some(message) = &booking.message {
        description.push_str(&format!("\n\nClient Message:\n{}", message));
    }
    description
}

/// Builds the calendar event for a validated booking: configured summary,
/// generated description, service mailbox + requester as attendees, and an
/// email reminder 24h before plus a popup reminder 15min before.
pub fn build_meeting_event(
    policy: &BookingPolicy,
    service_mailbox: Option<&str>,
    booking: &ValidatedBooking,
) -> MeetingEvent {
    let mut attendees = Vec::new();
    if let Some(mailbox) = service_mailbox {
        attendees.push(mailbox.to_string());
    }
    attendees.push(booking.email.clone());

    MeetingEvent {
        summary: policy.meeting_summary.clone(),
        description: meeting_description(&policy.meeting_summary, booking),
        start: booking.start,
        end: booking.end,
        time_zone: policy.time_zone.name().to_string(),
        attendees,
        reminders: vec![
            ReminderOverride {
                method: "email".to_string(),
                minutes: 24 * 60,
            },
            ReminderOverride {
                method: "popup".to_string(),
                minutes: 15,
            },
        ],
    }
}

/// Confirmation email sent to the requester after the calendar write
/// succeeded. Best-effort: a failure here never unwinds the booking.
pub fn confirmation_email(
    booking: &ValidatedBooking,
    event_link: Option<&str>,
    signature: &str,
) -> EmailMessage {
    let mut body = format!(
        "Hi {},\n\nYour consultation meeting has been successfully scheduled!\n\nMeeting Details:\n- Date: {}\n- Time: {}\n- Duration: 1 hour",
        booking.name,
        long_date(booking.date),
        booking.display_time,
    );
    if let Some(link) = event_link {
        body.push_str(&format!("\n\nCalendar Link: {}", link));
    }
    if let Some(message) = &booking.message {
        body.push_str(&format!("\n\nYour message: {}", message));
    }
    body.push_str(&format!(
        "\n\nLooking forward to speaking with you!\n\nBest regards,\n{}",
        signature
    ));

    EmailMessage {
        to: booking.email.clone(),
        to_name: Some(booking.name.clone()),
        reply_to: None,
        subject: "Meeting Confirmed - Consultation Scheduled".to_string(),
        body,
    }
}

/// Contact-form message forwarded to the service mailbox, reply-addressed to
/// the visitor.
pub fn contact_email(service_mailbox: &str, request: &SendEmailRequest) -> EmailMessage {
    let body = format!(
        "{}\n\n---\nSent from the website contact form by {} <{}>",
        request.message.trim(),
        request.name.trim(),
        request.email.trim(),
    );

    EmailMessage {
        to: service_mailbox.to_string(),
        to_name: None,
        reply_to: Some(request.email.trim().to_string()),
        subject: request.subject.trim().to_string(),
        body,
    }
}
