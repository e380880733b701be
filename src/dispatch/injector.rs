//! Capability injection.
//!
//! Fills a `PageContext` with the values the resolved node asked for, in a
//! fixed order: assigned URL, request view, cookie jar.

use crate::http::{CookieJar, RequestView};
use crate::page::{Capability, PageContext};
use crate::routing::PageNode;

pub fn inject<'r>(
    node: &'r PageNode,
    request: &'r RequestView,
    cookies: &'r mut CookieJar,
) -> PageContext<'r> {
    let capabilities = node.capabilities();
    let mut ctx = PageContext::new();

    if capabilities.contains(Capability::UrlSetter) {
        ctx.set_url(node.url());
    }
    if capabilities.contains(Capability::RequestSetter) {
        ctx.set_request(request);
    }
    if capabilities.contains(Capability::CookieSetter) {
        ctx.set_cookies(cookies);
    }

    tracing::trace!(url = %node.url(), capabilities = ?capabilities, "Injected page context");
    ctx
}
