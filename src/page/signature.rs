//! Handler signatures and bound arguments.
//!
//! A signature declares the parameters of a read or write handler:
//! mandatory ones are filled positionally from path segments, optional ones
//! by name from query or form fields.

use std::collections::HashSet;
use thiserror::Error;

/// Declared parameter list of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerSignature {
    mandatory: Vec<String>,
    optional: Vec<OptionalParam>,
}

/// An optional parameter and the value it takes when not supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalParam {
    pub name: String,
    pub default: Option<String>,
}

/// Errors detected in a signature while the page tree is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("parameter names must not be empty")]
    EmptyName,
}

impl HandlerSignature {
    /// A handler taking no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mandatory parameter.
    pub fn mandatory(mut self, name: impl Into<String>) -> Self {
        self.mandatory.push(name.into());
        self
    }

    /// Append an optional parameter with a default value.
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.optional.push(OptionalParam {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Append an optional parameter whose default is "no value".
    pub fn optional_unset(mut self, name: impl Into<String>) -> Self {
        self.optional.push(OptionalParam {
            name: name.into(),
            default: None,
        });
        self
    }

    pub fn mandatory_params(&self) -> &[String] {
        &self.mandatory
    }

    pub fn optional_params(&self) -> &[OptionalParam] {
        &self.optional
    }

    pub fn mandatory_count(&self) -> usize {
        self.mandatory.len()
    }

    pub(crate) fn validate(&self) -> Result<(), SignatureError> {
        let mut seen = HashSet::new();
        let names = self
            .mandatory
            .iter()
            .map(String::as_str)
            .chain(self.optional.iter().map(|p| p.name.as_str()));

        for name in names {
            if name.is_empty() {
                return Err(SignatureError::EmptyName);
            }
            if !seen.insert(name) {
                return Err(SignatureError::DuplicateParameter(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Arguments bound to a handler's parameters for one request.
///
/// An optional parameter keeps every value the request supplied for it, in
/// order; a parameter left at its default holds the default alone, or
/// nothing when the default is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    positional: Vec<(String, Option<String>)>,
    named: Vec<(String, Vec<String>)>,
}

impl BoundArgs {
    pub(crate) fn new(
        positional: Vec<(String, Option<String>)>,
        named: Vec<(String, Vec<String>)>,
    ) -> Self {
        Self { positional, named }
    }

    /// Value of the `index`-th mandatory parameter, `None` when the path
    /// did not supply it.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).and_then(|(_, v)| v.as_deref())
    }

    /// First value of a parameter by name, mandatory or optional.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Every value of a parameter by name. Mandatory parameters have at
    /// most one.
    pub fn get_all(&self, name: &str) -> &[String] {
        if let Some((_, value)) = self.positional.iter().find(|(n, _)| n == name) {
            return value.as_slice();
        }
        self.named
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Like [`get`](Self::get), falling back to `default` when unset.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Mandatory parameters in declaration order.
    pub fn positional_args(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.positional.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Optional parameters in declaration order, with all their values.
    pub fn named_args(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.named.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let sig = HandlerSignature::new()
            .mandatory("p1")
            .mandatory("p2")
            .optional("greeting", "Hello")
            .optional_unset("extra");

        assert_eq!(sig.mandatory_params(), ["p1", "p2"]);
        assert_eq!(sig.mandatory_count(), 2);
        assert_eq!(sig.optional_params()[0].default.as_deref(), Some("Hello"));
        assert_eq!(sig.optional_params()[1].default, None);
    }

    #[test]
    fn test_validate_rejects_duplicates_across_kinds() {
        let sig = HandlerSignature::new().mandatory("id").optional("id", "0");
        assert_eq!(
            sig.validate(),
            Err(SignatureError::DuplicateParameter("id".into()))
        );
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let sig = HandlerSignature::new().optional_unset("");
        assert_eq!(sig.validate(), Err(SignatureError::EmptyName));
    }

    #[test]
    fn test_bound_args_lookup() {
        let args = BoundArgs::new(
            vec![("p1".into(), Some("3".into())), ("p2".into(), None)],
            vec![
                ("greeting".into(), vec!["Hi".into()]),
                ("tag".into(), vec!["a".into(), "b".into()]),
                ("unset".into(), Vec::new()),
            ],
        );

        assert_eq!(args.positional(0), Some("3"));
        assert_eq!(args.positional(1), None);
        assert_eq!(args.positional(7), None);
        assert_eq!(args.get("p1"), Some("3"));
        assert_eq!(args.get("greeting"), Some("Hi"));
        assert_eq!(args.get_or("p2", "none"), "none");
        assert_eq!(args.get("tag"), Some("a"));
        assert_eq!(args.get_all("tag"), ["a", "b"]);
        assert_eq!(args.get_all("p1"), ["3"]);
        assert!(args.get_all("p2").is_empty());
        assert_eq!(args.get("unset"), None);
        assert!(args.get_all("missing").is_empty());
    }
}
