//! Handler selection and argument binding.
//!
//! # Responsibilities
//! - Pick the read or write handler from the request method
//! - Bind leftover path segments to mandatory parameters, by position
//! - Bind query (and, for writes, form) fields to optional parameters, by name
//!
//! # Design Decisions
//! - More segments than mandatory parameters is a 404; fewer is allowed
//!   and the missing ones are bound to `None`
//! - Unknown query keys are ignored; a repeated key binds every value
//! - Mandatory parameters are never looked up in the query string

use std::borrow::Cow;

use axum::http::Method;
use thiserror::Error;

use crate::http::{Params, RequestView};
use crate::page::{BoundArgs, HandlerSignature};
use crate::routing::PageNode;

/// Which of a page's handlers a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// `index`, for safe verbs.
    Read,
    /// `action`, for POST.
    Write,
}

impl HandlerKind {
    pub fn name(self) -> &'static str {
        match self {
            HandlerKind::Read => "index",
            HandlerKind::Write => "action",
        }
    }
}

/// Why no handler was bound. Always answered with 404.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("method {0} is not dispatched to pages")]
    UnsupportedMethod(Method),

    #[error("page has no {0} handler")]
    MissingHandler(&'static str),

    #[error("{given} path segments left for {expected} mandatory parameters")]
    TooManySegments { expected: usize, given: usize },
}

/// A handler ready to be invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub kind: HandlerKind,
    pub args: BoundArgs,
}

/// Safe verbs read, POST writes, everything else is unsupported.
pub fn select(method: &Method) -> Option<HandlerKind> {
    if *method == Method::POST {
        Some(HandlerKind::Write)
    } else if method.is_safe() {
        Some(HandlerKind::Read)
    } else {
        None
    }
}

/// Bind `remainder` and `params` against `signature`.
pub fn bind(
    signature: &HandlerSignature,
    remainder: &[String],
    params: &Params,
) -> Result<BoundArgs, NotFound> {
    let expected = signature.mandatory_count();
    if remainder.len() > expected {
        return Err(NotFound::TooManySegments {
            expected,
            given: remainder.len(),
        });
    }

    let positional = signature
        .mandatory_params()
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), remainder.get(i).cloned()))
        .collect();

    let named = signature
        .optional_params()
        .iter()
        .map(|param| {
            let supplied: Vec<String> = params.get_all(&param.name).map(str::to_string).collect();
            let values = if supplied.is_empty() {
                param.default.iter().cloned().collect()
            } else {
                supplied
            };
            (param.name.clone(), values)
        })
        .collect();

    Ok(BoundArgs::new(positional, named))
}

/// Select the handler on `node` for `request` and bind its arguments.
pub fn bind_request(
    node: &PageNode,
    remainder: &[String],
    request: &RequestView,
) -> Result<Binding, NotFound> {
    let method = request.method();
    let kind = select(method).ok_or_else(|| NotFound::UnsupportedMethod(method.clone()))?;

    let signature = match kind {
        HandlerKind::Read => node.index_signature(),
        HandlerKind::Write => node.action_signature(),
    }
    .ok_or(NotFound::MissingHandler(kind.name()))?;

    let params = match kind {
        HandlerKind::Read => Cow::Borrowed(request.query()),
        HandlerKind::Write => Cow::Owned(request.query().overlaid_by(request.form())),
    };

    let args = bind(signature, remainder, &params)?;
    Ok(Binding { kind, args })
}
