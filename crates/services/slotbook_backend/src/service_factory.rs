// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the concrete calendar and notification services once at startup,
//! behind the seam traits the booking handlers consume. A collaborator that
//! fails to initialize is logged and left as `None`; the routes that need it
//! answer 503 instead of taking the whole process down.
use slotbook_config::AppConfig;
use std::sync::Arc;
#[allow(unused_imports)] // used only when the matching features are compiled in
use {
    chrono::{DateTime, Utc},
    slotbook_common::is_feature_enabled,
    slotbook_common::services::{
        BoxFuture, BoxedError, BusyInterval, CalendarService, CreatedEvent, EmailMessage,
        MeetingEvent, NotificationResult, NotificationService, ServiceFactory,
    },
    tracing::{error, info},
};

#[cfg(feature = "gcal")]
use slotbook_gcal::{auth::create_calendar_hub, service::GoogleCalendarService};

#[cfg(feature = "gmail")]
use slotbook_gmail::{auth::create_gmail_hub, service::GmailNotificationService};

/// Adapter erasing the concrete calendar error type behind `BoxedError` so
/// handlers can hold a single trait-object type.
#[cfg(feature = "gcal")]
struct BoxedCalendarService {
    inner: GoogleCalendarService,
}

#[cfg(feature = "gcal")]
impl CalendarService for BoxedCalendarService {
    type Error = BoxedError;

    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let inner = &self.inner;

        Box::pin(async move {
            inner
                .list_events(&calendar_id, time_min, time_max, max_results)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        event: MeetingEvent,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CreatedEvent, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let inner = &self.inner;

        Box::pin(async move {
            inner
                .insert_event(&calendar_id, event, notify_attendees)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Same erasure for the notification side.
#[cfg(feature = "gmail")]
struct BoxedNotificationService {
    inner: GmailNotificationService,
}

#[cfg(feature = "gmail")]
impl NotificationService for BoxedNotificationService {
    type Error = BoxedError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let inner = &self.inner;

        Box::pin(async move {
            inner
                .send_email(message)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Service factory for the backend binary.
///
/// Holds one shared handle per collaborator. Each is present only when its
/// compile-time feature, runtime flag, and configuration section all line up
/// and its client construction succeeded.
pub struct SlotbookServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    #[cfg(feature = "gcal")]
    calendar_service: Option<Arc<dyn CalendarService<Error = BoxedError>>>,
    #[cfg(feature = "gmail")]
    notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

impl SlotbookServiceFactory {
    /// Create a new service factory, initializing every enabled collaborator.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            config: config.clone(),
            #[cfg(feature = "gcal")]
            calendar_service: None,
            #[cfg(feature = "gmail")]
            notification_service: None,
        };

        #[cfg(feature = "gcal")]
        {
            if !is_feature_enabled(config.use_gcal, config.gcal.as_ref()) {
                info!("Calendar support compiled, but disabled via runtime config or missing gcal section.");
            } else if let Some(gcal_config) = config.gcal.as_ref() {
                info!("Initializing Google Calendar service...");
                match create_calendar_hub(gcal_config).await {
                    Ok(hub) => {
                        let service = GoogleCalendarService::new(Arc::new(hub));
                        factory.calendar_service =
                            Some(Arc::new(BoxedCalendarService { inner: service }));
                        info!("Google Calendar service initialized.");
                    }
                    Err(e) => {
                        error!(
                            "Failed to initialize Google Calendar service: {}. Booking routes will answer 503.",
                            e
                        );
                    }
                }
            }
        }

        #[cfg(feature = "gmail")]
        {
            if !is_feature_enabled(config.use_gmail, config.gmail.as_ref()) {
                info!("Gmail support compiled, but disabled via runtime config or missing gmail section.");
            } else if let Some(gmail_config) = config.gmail.as_ref() {
                info!("Initializing Gmail notification service...");
                match (
                    create_gmail_hub(gmail_config).await,
                    gmail_config.sender_email.clone(),
                ) {
                    (Ok(hub), Some(sender_email)) => {
                        let service = GmailNotificationService::new(
                            Arc::new(hub),
                            sender_email,
                            gmail_config.sender_name.clone(),
                        );
                        factory.notification_service =
                            Some(Arc::new(BoxedNotificationService { inner: service }));
                        info!("Gmail notification service initialized.");
                    }
                    (Ok(_), None) => {
                        error!("Gmail sender_email is not configured. Emails disabled.");
                    }
                    (Err(e), _) => {
                        error!("Failed to initialize Gmail service: {}. Emails disabled.", e);
                    }
                }
            }
        }

        factory
    }
}

impl ServiceFactory for SlotbookServiceFactory {
    fn calendar_service(&self) -> Option<Arc<dyn CalendarService<Error = BoxedError>>> {
        #[cfg(feature = "gcal")]
        {
            if let Some(service) = self.calendar_service.clone() {
                return Some(service);
            }
        }

        None
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        #[cfg(feature = "gmail")]
        {
            if let Some(service) = self.notification_service.clone() {
                return Some(service);
            }
        }

        None
    }
}
