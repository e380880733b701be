//! Demonstration site served by the `pagewalk` binary.
//!
//! ```text
//! /                 Home      index()
//! /hello            Greeting  index(greeting='Hello', greeted='World')
//! /calc             Calculator index(p1, p2)
//! /whoami           WhoAmI    url + request capabilities
//! /login            Login     index(), action(username, logout), cookies
//! /old-hello        Moved     301 to /hello
//! ```

use std::sync::{Arc, Mutex};

use crate::http::{Redirect, ResponseSignal};
use crate::page::{
    BoundArgs, Capability, CapabilitySet, HandlerFault, HandlerResult, HandlerSignature, Page,
    PageContext, Subpage,
};
use crate::routing::{PageTree, TreeError};

/// Compile the demonstration page tree.
pub fn tree() -> Result<PageTree, TreeError> {
    PageTree::new(Home::new())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Root page linking to the others.
pub struct Home {
    children: Vec<Subpage>,
}

impl Home {
    pub fn new() -> Self {
        Self {
            children: vec![
                Subpage::new("hello", Arc::new(Greeting)),
                Subpage::new("calc", Arc::new(Calculator)),
                Subpage::new("whoami", Arc::new(WhoAmI)),
                Subpage::new("login", Arc::new(Login::default())),
                Subpage::new("old-hello", Arc::new(Moved::to("/hello"))),
            ],
        }
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for Home {
    fn index_signature(&self) -> Option<HandlerSignature> {
        Some(HandlerSignature::new())
    }

    fn index(&self, _ctx: &mut PageContext<'_>, _args: &BoundArgs) -> HandlerResult {
        let links: String = self
            .children
            .iter()
            .map(|sub| format!("<li><a href=\"/{0}\">{0}</a></li>", sub.name))
            .collect();
        Ok(ResponseSignal::rendered(format!(
            "<h1>pagewalk</h1><ul>{links}</ul>"
        )))
    }

    fn subpages(&self) -> Vec<Subpage> {
        self.children.clone()
    }
}

/// Optional parameters from the query string.
pub struct Greeting;

impl Page for Greeting {
    fn index_signature(&self) -> Option<HandlerSignature> {
        Some(
            HandlerSignature::new()
                .optional("greeting", "Hello")
                .optional("greeted", "World"),
        )
    }

    fn index(&self, _ctx: &mut PageContext<'_>, args: &BoundArgs) -> HandlerResult {
        let greeting = escape(args.get_or("greeting", "Hello"));
        let greeted = escape(args.get_or("greeted", "World"));
        Ok(ResponseSignal::rendered(format!("{greeting}, {greeted}!")))
    }
}

/// Mandatory parameters from path segments: `/calc/3/2`.
pub struct Calculator;

impl Page for Calculator {
    fn index_signature(&self) -> Option<HandlerSignature> {
        Some(HandlerSignature::new().mandatory("p1").mandatory("p2"))
    }

    fn index(&self, _ctx: &mut PageContext<'_>, args: &BoundArgs) -> HandlerResult {
        let (Some(p1), Some(p2)) = (args.positional(0), args.positional(1)) else {
            return Ok(ResponseSignal::rendered("usage: /calc/<p1>/<p2>"));
        };
        match (p1.parse::<i64>(), p2.parse::<i64>()) {
            (Ok(a), Ok(b)) => Ok(ResponseSignal::rendered(format!(
                "{a} + {b} = {}",
                a.saturating_add(b)
            ))),
            _ => Ok(ResponseSignal::NotFound),
        }
    }
}

/// Shows what the URL and request capabilities provide.
pub struct WhoAmI;

impl Page for WhoAmI {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
            .with(Capability::UrlSetter)
            .with(Capability::RequestSetter)
    }

    fn index_signature(&self) -> Option<HandlerSignature> {
        Some(HandlerSignature::new())
    }

    fn index(&self, ctx: &mut PageContext<'_>, _args: &BoundArgs) -> HandlerResult {
        let url = ctx.url().unwrap_or("?");
        let method = ctx
            .request()
            .map(|r| r.method().to_string())
            .unwrap_or_default();
        Ok(ResponseSignal::rendered(format!(
            "url: {}; method: {}",
            escape(url),
            method
        )))
    }
}

/// Login form. The logged-in user is state owned by this page and shared by
/// every visitor; the `user` cookie only remembers who this browser claimed
/// to be.
#[derive(Default)]
pub struct Login {
    current: Mutex<Option<String>>,
}

impl Login {
    fn current_user(&self) -> Result<Option<String>, HandlerFault> {
        self.current
            .lock()
            .map(|user| user.clone())
            .map_err(|_| HandlerFault::new("login state poisoned"))
    }

    fn set_current_user(&self, user: Option<String>) -> Result<(), HandlerFault> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| HandlerFault::new("login state poisoned"))?;
        *current = user;
        Ok(())
    }
}

impl Page for Login {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
            .with(Capability::UrlSetter)
            .with(Capability::CookieSetter)
    }

    fn index_signature(&self) -> Option<HandlerSignature> {
        Some(HandlerSignature::new())
    }

    fn index(&self, ctx: &mut PageContext<'_>, _args: &BoundArgs) -> HandlerResult {
        let url = ctx.url().unwrap_or("/login");
        let remembered = ctx
            .cookies()
            .and_then(|jar| jar.get("user").map(escape))
            .unwrap_or_else(|| "nobody".to_string());
        let current = self
            .current_user()?
            .map(|u| escape(&u))
            .unwrap_or_else(|| "nobody".to_string());

        Ok(ResponseSignal::rendered(format!(
            "<p>logged in: {current}</p><p>this browser: {remembered}</p>\
             <form method=\"post\" action=\"{url}\">\
             <input name=\"username\"><button>login</button></form>"
        )))
    }

    fn action_signature(&self) -> Option<HandlerSignature> {
        Some(
            HandlerSignature::new()
                .optional_unset("username")
                .optional_unset("logout"),
        )
    }

    fn action(&self, ctx: &mut PageContext<'_>, args: &BoundArgs) -> HandlerResult {
        let jar = ctx
            .cookies()
            .ok_or_else(|| HandlerFault::new("cookie jar not injected"))?;

        if args.get("logout").is_some() {
            self.set_current_user(None)?;
            jar.remove("user");
            return Ok(ResponseSignal::done());
        }

        match args.get("username").map(str::trim) {
            Some(name) if !name.is_empty() => {
                self.set_current_user(Some(name.to_string()))?;
                jar.set("user", name);
                Ok(Redirect::see_other_to("/").into())
            }
            _ => Ok(ResponseSignal::done()),
        }
    }
}

/// Permanently redirects every read to a fixed location.
pub struct Moved {
    location: String,
}

impl Moved {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl Page for Moved {
    fn index_signature(&self) -> Option<HandlerSignature> {
        Some(HandlerSignature::new())
    }

    fn index(&self, _ctx: &mut PageContext<'_>, _args: &BoundArgs) -> HandlerResult {
        Ok(Redirect::moved_permanently(self.location.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_compiles_with_expected_urls() {
        let tree = tree().unwrap();
        for url in ["/", "/hello", "/calc", "/whoami", "/login", "/old-hello"] {
            assert!(tree.find(url).is_some(), "missing {url}");
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
