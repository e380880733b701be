//! Request-scoped values handed to a page's handlers.

use crate::http::{CookieJar, RequestView};

/// Values injected into a page for one request.
///
/// Each accessor returns `None` unless the page declared the matching
/// capability.
#[derive(Debug, Default)]
pub struct PageContext<'r> {
    url: Option<&'r str>,
    request: Option<&'r RequestView>,
    cookies: Option<&'r mut CookieJar>,
}

impl<'r> PageContext<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_url(&mut self, url: &'r str) {
        self.url = Some(url);
    }

    pub fn set_request(&mut self, request: &'r RequestView) {
        self.request = Some(request);
    }

    pub fn set_cookies(&mut self, cookies: &'r mut CookieJar) {
        self.cookies = Some(cookies);
    }

    /// URL assigned to the page when the tree was built.
    pub fn url(&self) -> Option<&'r str> {
        self.url
    }

    pub fn request(&self) -> Option<&'r RequestView> {
        self.request
    }

    pub fn cookies(&mut self) -> Option<&mut CookieJar> {
        self.cookies.as_deref_mut()
    }
}
