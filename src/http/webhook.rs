//! Fax webhook endpoints.
//!
//! Two stateless calls per fax:
//! 1. decision (`/fax/receive?to=<fax>`): answer with a receive or reject directive
//! 2. completion (`/fax/received?to=<fax>`, form `MediaUrl`): text every contact
//!
//! Nothing is kept between the two; the sender carries `to` from the first
//! call into the second.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, FailedToBufferBody},
        FromRequest, Request, State,
    },
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::info;
use url::form_urlencoded;

use crate::http::response::FaxDirective;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::{credentials, AuthError};

/// Form field names carrying the received media location.
pub const MEDIA_URL_FIELDS: &[&str] = &["MediaUrl", "mediaUrl"];

const DECISION: &str = "decision";
const COMPLETION: &str = "completion";

/// Request-level failures. Each maps to one HTTP status.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("method not allowed on webhook endpoint")]
    NotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("missing \"?to=<faxnumber>\" query in request")]
    MissingTo,

    #[error("request body exceeds the configured limit")]
    BodyTooLarge,

    #[error("failed to read request body")]
    Body,
}

impl From<BytesRejection> for WebhookError {
    fn from(rejection: BytesRejection) -> Self {
        match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                WebhookError::BodyTooLarge
            }
            _ => WebhookError::Body,
        }
    }
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::NotFound => StatusCode::NOT_FOUND,
            WebhookError::Auth(_) => StatusCode::UNAUTHORIZED,
            WebhookError::MissingTo => StatusCode::BAD_REQUEST,
            WebhookError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            WebhookError::Body => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        info!(status = status.as_u16(), error = %self, "HTTP error");

        match self {
            WebhookError::Auth(AuthError::Credentials) => (
                status,
                [(header::WWW_AUTHENTICATE, credentials::challenge())],
                "Unauthorised.\n",
            )
                .into_response(),
            WebhookError::MissingTo => (status, self.to_string()).into_response(),
            _ => status.into_response(),
        }
    }
}

/// An authenticated webhook call with its target fax number.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    pub to: String,
    /// Decoded form body in wire order.
    pub form: Vec<(String, String)>,
}

impl WebhookRequest {
    /// First non-empty value among `names`, checked in order.
    pub fn form_value(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| {
            self.form
                .iter()
                .find(|(k, v)| k == name && !v.is_empty())
                .map(|(_, v)| v.as_str())
        })
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Checks run in order: method, transport credentials, origin signature, `to`.
impl FromRequest<AppState> for WebhookRequest {
    type Rejection = WebhookError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if req.method() != Method::POST {
            return Err(WebhookError::NotFound);
        }

        state.authenticator.check_transport(req.headers())?;

        let headers = req.headers().clone();
        let uri = req.uri().clone();
        // Limit comes from the router's `DefaultBodyLimit`.
        let bytes = Bytes::from_request(req, state).await?;
        let form: Vec<(String, String)> = if is_form(&headers) {
            form_urlencoded::parse(&bytes).into_owned().collect()
        } else {
            Vec::new()
        };

        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        state
            .authenticator
            .check_origin(path_and_query, &headers, &form)?;

        let to = query_param(uri.query(), "to")
            .filter(|to| !to.is_empty())
            .ok_or(WebhookError::MissingTo)?;

        Ok(Self { to, form })
    }
}

fn reject(endpoint: &'static str, error: WebhookError) -> Response {
    metrics::record_webhook(endpoint, error.status().as_u16());
    error.into_response()
}

/// Decision endpoint: accept faxes for known numbers, reject the rest.
pub async fn decision_handler(
    State(state): State<AppState>,
    request: Result<WebhookRequest, WebhookError>,
) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(e) => return reject(DECISION, e),
    };

    let directive = match state.directory.find(&request.to) {
        Some(account) => FaxDirective::Receive {
            to: account.fax_number,
        },
        None => FaxDirective::Reject,
    };

    metrics::record_webhook(DECISION, 200);
    metrics::record_decision(directive.label());
    info!(fax_num = %request.to, resp = %directive.render(), "HTTP response");

    directive.into_response()
}

/// Completion endpoint: notify every contact of the account.
///
/// Unknown numbers and a missing media URL are logged and answered with an
/// empty 200, as are failed sends.
pub async fn completion_handler(
    State(state): State<AppState>,
    request: Result<WebhookRequest, WebhookError>,
) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(e) => return reject(COMPLETION, e),
    };
    metrics::record_webhook(COMPLETION, 200);

    let Some(account) = state.directory.find(&request.to) else {
        info!(fax_num = %request.to, "account not found");
        return StatusCode::OK.into_response();
    };

    let Some(media_url) = request.form_value(MEDIA_URL_FIELDS) else {
        info!(fax_num = %request.to, "missing MediaUrl");
        return StatusCode::OK.into_response();
    };

    let outcomes = state.dispatcher.notify_all(&account, media_url).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        fax_num = %request.to,
        contacts = outcomes.len(),
        failed,
        "fax notifications dispatched"
    );

    StatusCode::OK.into_response()
}
