// --- File: crates/slotbook_gmail/src/service.rs ---
//! Gmail implementation of the `NotificationService` trait.
//!
//! Messages are assembled as plain RFC 822 text and handed to the Gmail API
//! `messages.send` call; the generated client takes care of the base64url
//! encoding of the raw payload.

use std::io::Cursor;
use std::sync::Arc;

use google_gmail1::api::Message;
use slotbook_common::services::{
    BoxFuture, EmailMessage, NotificationResult, NotificationService,
};
use thiserror::Error;
use tracing::debug;

use crate::auth::HubType;

/// Errors that can occur when sending mail through Gmail.
#[derive(Error, Debug)]
pub enum GmailServiceError {
    #[error("Gmail API Error: {0}")]
    ApiError(#[from] google_gmail1::Error),
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Gmail notification service implementation.
pub struct GmailNotificationService {
    gmail_hub: Arc<HubType>,
    sender_email: String,
    sender_name: Option<String>,
}

impl GmailNotificationService {
    /// Create a new Gmail notification service for the given sender mailbox.
    pub fn new(gmail_hub: Arc<HubType>, sender_email: String, sender_name: Option<String>) -> Self {
        Self {
            gmail_hub,
            sender_email,
            sender_name,
        }
    }
}

fn format_address(email: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => format!("{} <{}>", name.trim(), email),
        _ => email.to_string(),
    }
}

/// Assembles a plain-text RFC 822 message.
pub fn build_rfc822(sender_email: &str, sender_name: Option<&str>, message: &EmailMessage) -> String {
    let mut headers = vec![
        format!("From: {}", format_address(sender_email, sender_name)),
        format!(
            "To: {}",
            format_address(&message.to, message.to_name.as_deref())
        ),
    ];
    if let Some(reply_to) = &message.reply_to {
        headers.push(format!("Reply-To: {}", reply_to));
    }
    headers.push(format!("Subject: {}", message.subject));
    headers.push("MIME-Version: 1.0".to_string());
    headers.push("Content-Type: text/plain; charset=\"UTF-8\"".to_string());

    format!("{}\r\n\r\n{}", headers.join("\r\n"), message.body)
}

impl NotificationService for GmailNotificationService {
    type Error = GmailServiceError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let gmail_hub = self.gmail_hub.clone();
        let raw = build_rfc822(&self.sender_email, self.sender_name.as_deref(), &message);

        Box::pin(async move {
            let request = Message {
                raw: Some(raw.into_bytes()),
                ..Default::default()
            };

            let mime_type = "message/rfc822"
                .parse::<mime::Mime>()
                .map_err(|e| GmailServiceError::InternalError(e.to_string()))?;

            // The raw field carries the whole message; the upload body stays empty.
            let (_response, sent) = gmail_hub
                .users()
                .messages_send(request, "me")
                .upload(Cursor::new(Vec::new()), mime_type)
                .await?;

            debug!("Sent message to {}: id={:?}", message.to, sent.id);

            Ok(NotificationResult {
                message_id: sent.id,
                status: "sent".to_string(),
            })
        })
    }
}
