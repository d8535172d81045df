//! Shared harness for webhook integration tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use faxme::accounts::{Account, AccountDirectory, SharedDirectory};
use faxme::config::FaxmeConfig;
use faxme::http::{AppState, HttpServer};
use faxme::notify::{MessagingTransport, TransportError};
use faxme::Shutdown;

pub const USER: &str = "fax";
pub const PWD: &str = "secret";
pub const TOKEN: &str = "twilio-token";

/// One recorded send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub from: String,
    pub to: String,
    pub body: String,
}

/// In-memory transport that records every attempt and fails for chosen recipients.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    failing: Vec<String>,
}

impl RecordingTransport {
    pub fn failing(recipients: &[&str]) -> Self {
        Self {
            failing: recipients.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingTransport for RecordingTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent {
            from: from.to_string(),
            to: to.to_string(),
            body: body.to_string(),
        });
        if self.failing.iter().any(|f| f == to) {
            return Err(TransportError::Api {
                status: 400,
                code: Some(21211),
                message: "invalid number".into(),
            });
        }
        Ok(())
    }
}

pub struct TestServer {
    pub base: String,
    pub transport: Arc<RecordingTransport>,
    pub directory: Arc<SharedDirectory>,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config with basic auth on and signature validation skipped.
pub fn config() -> FaxmeConfig {
    FaxmeConfig {
        http_user: USER.into(),
        http_pwd: PWD.into(),
        twilio_sid: "AC123".into(),
        twilio_token: TOKEN.into(),
        skip_request_validation: true,
        ..FaxmeConfig::default()
    }
}

pub fn account(fax: &str, contacts: &[&str]) -> Account {
    Account::new(fax, contacts.iter().map(|s| s.to_string()).collect())
}

/// Boot a server on an ephemeral port.
///
/// When `config.public_url` is empty it is pointed at the bound address so
/// signatures can be computed against the real URL.
pub async fn start(
    mut config: FaxmeConfig,
    accounts: Vec<Account>,
    transport: RecordingTransport,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);
    if config.public_url.is_empty() {
        config.public_url = base.clone();
    }

    let transport = Arc::new(transport);
    let directory = Arc::new(SharedDirectory::new(AccountDirectory::from_accounts(accounts)));
    let state = AppState::from_config(&config, directory.clone(), transport.clone());
    let server = HttpServer::new(state);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    TestServer {
        base,
        transport,
        directory,
        client,
        shutdown,
    }
}
