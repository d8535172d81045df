//! Outbound messaging transport.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::FaxmeConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging API returned {status}: {message} (code {code:?})")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },
}

/// Sends one text message. Retry and timeout policy belong to the implementation.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), TransportError>;
}

/// Error body returned by the Twilio REST API.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<u32>,
    message: Option<String>,
}

/// Twilio Programmable Messaging client.
pub struct TwilioTransport {
    client: reqwest::Client,
    messages_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioTransport {
    pub fn new(
        api_url: &str,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let account_sid = account_sid.into();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let messages_url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            api_url.trim_end_matches('/'),
            account_sid
        );

        Ok(Self {
            client,
            messages_url,
            account_sid,
            auth_token: auth_token.into(),
        })
    }

    pub fn from_config(config: &FaxmeConfig) -> Result<Self, TransportError> {
        Self::new(
            &config.twilio_api_url,
            config.twilio_sid.clone(),
            config.twilio_token.clone(),
            Duration::from_secs(config.twilio_timeout_secs),
        )
    }
}

#[async_trait]
impl MessagingTransport for TwilioTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), TransportError> {
        let res = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }

        let text = res.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<TwilioErrorBody>(&text) {
            Ok(err) => (err.code, err.message.unwrap_or(text)),
            Err(_) => (None, text),
        };

        Err(TransportError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Form, http::StatusCode, routing::post, Router};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_send_posts_form() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let app = Router::new().route(
            "/2010-04-01/Accounts/AC123/Messages.json",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let tx = tx.clone();
                async move {
                    tx.send(form).unwrap();
                    (StatusCode::CREATED, "{}")
                }
            }),
        );
        let base = serve(app).await;

        let transport = TwilioTransport::new(&base, "AC123", "tok", Duration::from_secs(5)).unwrap();
        transport
            .send("12223334444", "14443332222", "You have a fax!\n\nhttp://x/y.pdf")
            .await
            .unwrap();

        let form = rx.recv().await.unwrap();
        assert_eq!(form["From"], "12223334444");
        assert_eq!(form["To"], "14443332222");
        assert_eq!(form["Body"], "You have a fax!\n\nhttp://x/y.pdf");
    }

    #[tokio::test]
    async fn test_api_error() {
        let app = Router::new().route(
            "/2010-04-01/Accounts/AC123/Messages.json",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    r#"{"code": 21211, "message": "The 'To' number is not a valid phone number.", "status": 400}"#,
                )
            }),
        );
        let base = serve(app).await;

        let transport = TwilioTransport::new(&base, "AC123", "tok", Duration::from_secs(5)).unwrap();
        let err = transport.send("1", "bogus", "hi").await.unwrap_err();

        match err {
            TransportError::Api { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, Some(21211));
                assert!(message.contains("not a valid phone number"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
