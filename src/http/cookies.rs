//! Request-scoped cookie jar.
//!
//! Cookies from the request's `Cookie` headers are loaded as originals;
//! only cookies added, changed or removed during the request are emitted
//! back as `Set-Cookie`.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;

/// Mutable cookie collection for one request/response cycle.
#[derive(Debug, Default, Clone)]
pub struct CookieJar {
    inner: cookie::CookieJar,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every cookie from the `Cookie` headers. Malformed pairs are
    /// skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut inner = cookie::CookieJar::new();
        let values = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok());

        for value in values {
            for parsed in Cookie::split_parse(value).flatten() {
                inner.add_original(parsed.into_owned());
            }
        }
        Self { inner }
    }

    /// Value of the cookie named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(Cookie::value)
    }

    /// Full cookie, attributes included.
    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.inner.get(name)
    }

    /// Set a plain `name=value` cookie.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.add(Cookie::new(name.into(), value.into()));
    }

    /// Set a cookie carrying its own attributes (path, max-age, ...).
    pub fn add(&mut self, cookie: Cookie<'static>) {
        self.inner.add(cookie);
    }

    /// Remove a cookie. If the client sent it, an expiring `Set-Cookie`
    /// is emitted.
    pub fn remove(&mut self, name: impl Into<String>) {
        self.inner.remove(Cookie::from(name.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.inner.iter()
    }

    /// Whether anything needs to be sent back.
    pub fn is_modified(&self) -> bool {
        self.inner.delta().next().is_some()
    }

    /// Append one `Set-Cookie` header per modified cookie.
    pub fn write_delta(&self, headers: &mut HeaderMap) {
        for cookie in self.inner.delta() {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(_) => {
                    tracing::warn!(cookie = %cookie.name(), "Dropping cookie with invalid header value");
                }
            }
        }
    }
}
