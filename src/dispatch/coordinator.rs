//! Response coordination.
//!
//! # States
//! ```text
//! Invoking ──Ok(Rendered), read──────▶ Completed (200)
//!          ──Ok(Rendered), write─────▶ Signaled  (303 to requested URL)
//!          ──Ok(Redirect)────────────▶ Signaled  (its status, its target or requested URL)
//!          ──Ok(NotFound)────────────▶ NotFound  (404)
//!          ──Err(HandlerFault)───────▶ Failed    (handed to the transport)
//! ```
//!
//! Cookie changes are written on every branch except `Failed`.

use axum::http::{header, HeaderValue, StatusCode};

use crate::dispatch::binder::HandlerKind;
use crate::http::{CookieJar, DispatchResponse, Redirect, ResponseSignal};
use crate::page::{BoundArgs, HandlerFault, HandlerResult, PageContext};
use crate::routing::PageNode;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Where a request ended up.
#[derive(Debug)]
pub enum Settled {
    Completed(String),
    Signaled(Redirect),
    NotFound,
    Failed(HandlerFault),
}

/// Call the bound handler on the node's page.
pub fn invoke(
    node: &PageNode,
    kind: HandlerKind,
    ctx: &mut PageContext<'_>,
    args: &BoundArgs,
) -> HandlerResult {
    match kind {
        HandlerKind::Read => node.page().index(ctx, args),
        HandlerKind::Write => node.page().action(ctx, args),
    }
}

/// Interpret a handler's result.
pub fn settle(kind: HandlerKind, result: HandlerResult) -> Settled {
    match result {
        Ok(ResponseSignal::Rendered(body)) => match kind {
            HandlerKind::Read => Settled::Completed(body),
            HandlerKind::Write => Settled::Signaled(Redirect::see_other()),
        },
        Ok(ResponseSignal::Redirect(redirect)) => Settled::Signaled(redirect),
        Ok(ResponseSignal::NotFound) => Settled::NotFound,
        Err(fault) => Settled::Failed(fault),
    }
}

/// Turn a settled outcome into the response for the transport.
pub fn respond(
    settled: Settled,
    requested_url: &str,
    cookies: &CookieJar,
) -> Result<DispatchResponse, HandlerFault> {
    let mut response = match settled {
        Settled::Completed(body) => {
            let mut response = DispatchResponse::new(StatusCode::OK);
            response.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(HTML_CONTENT_TYPE),
            );
            response.body = Some(body);
            response
        }
        Settled::Signaled(redirect) => {
            let location = redirect.resolve_location(requested_url);
            let value = HeaderValue::from_str(location).map_err(|e| {
                HandlerFault::from_error(format!("invalid redirect location {location:?}"), e)
            })?;
            let mut response = DispatchResponse::new(redirect.status().status_code());
            response.headers.insert(header::LOCATION, value);
            response
        }
        Settled::NotFound => DispatchResponse::new(StatusCode::NOT_FOUND),
        Settled::Failed(fault) => return Err(fault),
    };

    cookies.write_delta(&mut response.headers);
    Ok(response)
}
