// --- File: crates/slotbook_gcal/src/service.rs ---
//! Google Calendar implementation of the `CalendarService` trait.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventAttendee, EventDateTime, EventReminder, EventReminders,
};
use slotbook_common::services::{
    BoxFuture, BusyInterval, CalendarService, CreatedEvent, MeetingEvent,
};
use thiserror::Error;
use tracing::debug;

use crate::auth::HubType;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

/// Extracts occupied intervals from a raw event listing.
///
/// Date-only (all-day) entries carry no start/end instant and are skipped;
/// an all-day marker does not occupy any bookable hour slot.
pub fn busy_intervals(items: Vec<Event>) -> Vec<BusyInterval> {
    let mut intervals = Vec::new();
    for event in items {
        let (Some(start), Some(end)) = (event.start, event.end) else {
            continue;
        };
        match (start.date_time, end.date_time) {
            (Some(start_dt), Some(end_dt)) => intervals.push(BusyInterval {
                start: start_dt,
                end: end_dt,
            }),
            _ => debug!("Skipping event without concrete start/end instants"),
        }
    }
    intervals
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Lists events intersecting `[time_min, time_max)`, capped at
    /// `max_results`, and reduces them to their occupied intervals.
    ///
    /// Recurring events are expanded (`single_events`) so each occurrence
    /// contributes its own interval.
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, events_list) = calendar_hub
                .events()
                .list(&calendar_id)
                .time_min(time_min)
                .time_max(time_max)
                .single_events(true)
                .order_by("startTime")
                .max_results(max_results as i32)
                .doit()
                .await?;

            let mut intervals = busy_intervals(events_list.items.unwrap_or_default());
            intervals.sort_by_key(|interval| interval.start);
            Ok(intervals)
        })
    }

    /// Inserts a meeting event, optionally asking the backend to send
    /// invitations to all attendees.
    fn insert_event(
        &self,
        calendar_id: &str,
        event: MeetingEvent,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CreatedEvent, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let reminders = if event.reminders.is_empty() {
                None
            } else {
                Some(EventReminders {
                    use_default: Some(false),
                    overrides: Some(
                        event
                            .reminders
                            .iter()
                            .map(|reminder| EventReminder {
                                method: Some(reminder.method.clone()),
                                minutes: Some(reminder.minutes),
                            })
                            .collect(),
                    ),
                })
            };

            let new_event = Event {
                summary: Some(event.summary),
                description: Some(event.description),
                start: Some(EventDateTime {
                    date_time: Some(event.start),
                    time_zone: Some(event.time_zone.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(event.end),
                    time_zone: Some(event.time_zone),
                    ..Default::default()
                }),
                attendees: Some(
                    event
                        .attendees
                        .into_iter()
                        .map(|email| EventAttendee {
                            email: Some(email),
                            ..Default::default()
                        })
                        .collect(),
                ),
                reminders,
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .send_updates(if notify_attendees { "all" } else { "none" })
                .doit()
                .await?;

            Ok(CreatedEvent {
                event_id: created_event.id,
                html_link: created_event.html_link,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
