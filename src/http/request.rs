//! Request log ids.
//!
//! Every inbound request is tagged with a sequential id in `x-request-id`.
//! The id is recorded on the request span, so every log line emitted while
//! handling the request carries it, and it is echoed back on the response.

use axum::http::{HeaderName, HeaderValue, Request};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Hands out increasing log ids starting at 1.
#[derive(Clone, Debug, Default)]
pub struct LogIdMaker {
    last: Arc<AtomicU64>,
}

impl LogIdMaker {
    pub fn next_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl MakeRequestId for LogIdMaker {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Some(RequestId::new(HeaderValue::from(self.next_id())))
    }
}

/// The log id assigned to `request`, or `-` before one is assigned.
pub fn log_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_and_shared() {
        let mut maker = LogIdMaker::default();
        let mut clone = maker.clone();
        let request = Request::new(());

        let first = maker.make_request_id(&request).unwrap();
        let second = clone.make_request_id(&request).unwrap();

        assert_eq!(first.header_value(), "1");
        assert_eq!(second.header_value(), "2");
    }

    #[test]
    fn test_log_id_fallback() {
        let mut request = Request::new(());
        assert_eq!(log_id(&request), "-");
        request.headers_mut().insert(X_REQUEST_ID, HeaderValue::from_static("7"));
        assert_eq!(log_id(&request), "7");
    }
}
