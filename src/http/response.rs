//! Response signals and the final response.
//!
//! # Responsibilities
//! - Define what a handler can signal (`ResponseSignal`, `Redirect`)
//! - Carry the settled status/headers/body back to the transport
//!
//! # Design Decisions
//! - Redirects are values, not unwinding
//! - A 301 always names its target; a 303 may leave it to the dispatcher
//! - `DispatchResponse` converts straight into an axum response

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

/// What a handler asks the dispatcher to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSignal {
    /// Send `body` with 200. Ignored after a write handler.
    Rendered(String),
    /// Redirect the client.
    Redirect(Redirect),
    /// Answer 404.
    NotFound,
}

impl ResponseSignal {
    pub fn rendered(body: impl Into<String>) -> Self {
        ResponseSignal::Rendered(body.into())
    }

    /// Shorthand for a write handler with nothing to say.
    pub fn done() -> Self {
        ResponseSignal::Rendered(String::new())
    }
}

impl From<Redirect> for ResponseSignal {
    fn from(redirect: Redirect) -> Self {
        ResponseSignal::Redirect(redirect)
    }
}

impl From<String> for ResponseSignal {
    fn from(body: String) -> Self {
        ResponseSignal::Rendered(body)
    }
}

impl From<&str> for ResponseSignal {
    fn from(body: &str) -> Self {
        ResponseSignal::Rendered(body.to_string())
    }
}

/// Redirect status codes a handler can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStatus {
    MovedPermanently,
    SeeOther,
}

impl RedirectStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectStatus::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
            RedirectStatus::SeeOther => StatusCode::SEE_OTHER,
        }
    }
}

/// A redirect with an optional target. Without a target the client is sent
/// back to the URL it requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    status: RedirectStatus,
    location: Option<String>,
}

impl Redirect {
    /// 301 to `location`.
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        Self {
            status: RedirectStatus::MovedPermanently,
            location: Some(location.into()),
        }
    }

    /// 303 back to the requested URL.
    pub fn see_other() -> Self {
        Self {
            status: RedirectStatus::SeeOther,
            location: None,
        }
    }

    /// 303 to `location`.
    pub fn see_other_to(location: impl Into<String>) -> Self {
        Self {
            status: RedirectStatus::SeeOther,
            location: Some(location.into()),
        }
    }

    pub fn status(&self) -> RedirectStatus {
        self.status
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Target to send the client to, falling back to `requested_url`.
    pub fn resolve_location<'a>(&'a self, requested_url: &'a str) -> &'a str {
        self.location.as_deref().unwrap_or(requested_url)
    }
}

/// Final status, headers and body handed to the transport.
#[derive(Debug, Clone)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl DispatchResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
