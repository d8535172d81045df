//! Fax directive bodies.
//!
//! The decision endpoint always answers 200; the body tells the sender
//! whether to receive the fax and where to report completion.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use url::form_urlencoded;

/// Path of the completion endpoint, referenced from the accept directive.
pub const COMPLETION_PATH: &str = "/fax/received";

pub const REJECT_BODY: &str = "<Response><Reject/></Response>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaxDirective {
    /// Receive the fax and report completion for `to`.
    Receive { to: String },
    Reject,
}

impl FaxDirective {
    pub fn label(&self) -> &'static str {
        match self {
            FaxDirective::Receive { .. } => "accept",
            FaxDirective::Reject => "reject",
        }
    }

    pub fn render(&self) -> String {
        match self {
            FaxDirective::Receive { to } => format!(
                r#"<Response><Receive action="{}?to={}"/></Response>"#,
                COMPLETION_PATH,
                encode_query_value(to)
            ),
            FaxDirective::Reject => REJECT_BODY.to_string(),
        }
    }
}

impl IntoResponse for FaxDirective {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            self.render(),
        )
            .into_response()
    }
}

/// Percent-encode for the query string so the sender echoes `to` back
/// byte-for-byte. The output never contains XML metacharacters.
fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_body() {
        let directive = FaxDirective::Receive {
            to: "12223334444".into(),
        };
        assert_eq!(
            directive.render(),
            r#"<Response><Receive action="/fax/received?to=12223334444"/></Response>"#
        );
        assert_eq!(directive.label(), "accept");
    }

    #[test]
    fn test_reject_body() {
        assert_eq!(FaxDirective::Reject.render(), "<Response><Reject/></Response>");
    }

    #[test]
    fn test_plus_survives_round_trip() {
        let directive = FaxDirective::Receive {
            to: "+12223334444".into(),
        };
        assert_eq!(
            directive.render(),
            r#"<Response><Receive action="/fax/received?to=%2B12223334444"/></Response>"#
        );
    }

    #[test]
    fn test_attribute_is_safe() {
        let directive = FaxDirective::Receive {
            to: r#"1"/><Evil a="&"#.into(),
        };
        assert_eq!(
            directive.render(),
            r#"<Response><Receive action="/fax/received?to=1%22%2F%3E%3CEvil+a%3D%22%26"/></Response>"#
        );
    }
}
