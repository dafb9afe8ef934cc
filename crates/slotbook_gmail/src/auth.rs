// File: crates/slotbook_gmail/src/auth.rs
use google_gmail1::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    Gmail,
};
use slotbook_config::GmailConfig;
use std::{error::Error, path::Path};

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = Gmail<Connector>;

/// Builds an authenticated Gmail hub from the configured service account key,
/// impersonating the configured sender mailbox. Constructed once at process
/// start and shared behind an Arc.
pub async fn create_gmail_hub(
    config: &GmailConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or("Missing key_path in GmailConfig")?;
    let sender = config
        .sender_email
        .as_deref()
        .ok_or("Missing sender_email in GmailConfig")?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    // Sending mail requires acting as the mailbox owner, hence the subject.
    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .subject(sender)
        .build()
        .await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let hub = Gmail::new(client, auth);

    Ok(hub)
}
