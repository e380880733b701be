//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Carry the transport's request into the dispatcher (`DispatchRequest`)
//! - Parse query string and urlencoded form body
//! - Expose a read-only view of the request to pages (`RequestView`)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Repeated keys are kept in order; `get` returns the first value,
//!   `get_all` every one
//! - Bodies that are not urlencoded forms contribute no parameters

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Makes `x-request-id` values from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Ordered name/value pairs decoded from a query string or form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Decode `application/x-www-form-urlencoded` input.
    pub fn parse(input: &[u8]) -> Self {
        form_urlencoded::parse(input).into_owned().collect()
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Combine two parameter sets. A name present in `over` takes all its
    /// values from `over`; the values `self` had for it are dropped.
    pub fn overlaid_by(&self, over: &Params) -> Params {
        let kept = self.pairs.iter().filter(|(name, _)| !over.contains(name));
        over.pairs.iter().chain(kept).cloned().collect()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// A request as handed over by the transport.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl DispatchRequest {
    /// Build from a method and a request target such as `/sub?x=1`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn post(target: &str) -> Self {
        Self::new(Method::POST, target)
    }

    pub fn from_parts(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn into_view(self) -> RequestView {
        let query = self
            .query
            .as_deref()
            .map(|q| Params::parse(q.as_bytes()))
            .unwrap_or_default();
        let form = if is_form(&self.headers) {
            Params::parse(&self.body)
        } else {
            Params::default()
        };

        RequestView {
            method: self.method,
            path: self.path,
            query_string: self.query.filter(|q| !q.is_empty()),
            query,
            form,
            headers: self.headers,
            body: self.body,
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    match headers.get(header::CONTENT_TYPE) {
        None => true,
        Some(value) => value
            .to_str()
            .map(|v| v.trim_start().starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false),
    }
}

/// Read-only view of the current request, given to pages that ask for it.
#[derive(Debug, Clone)]
pub struct RequestView {
    method: Method,
    path: String,
    query_string: Option<String>,
    query: Params,
    form: Params,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestView {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The URL as originally requested: path plus `?query` when present.
    pub fn url(&self) -> String {
        match &self.query_string {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Fields decoded from a urlencoded body.
    pub fn form(&self) -> &Params {
        &self.form
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
