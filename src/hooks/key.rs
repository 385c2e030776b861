//! General-purpose sanitize hooks

use crate::core::{FieldValue, SanitizeHook};
use std::collections::HashSet;

/// Replaces the value of any field named in a fixed key set
///
/// Keys are compared case-insensitively.
///
/// # Example
///
/// ```
/// use logging_facility::hooks::KeyHook;
/// use logging_facility::{FieldValue, SanitizeHook};
///
/// let hook = KeyHook::new(["password", "token"]);
/// assert!(hook.check("token"));
/// assert_eq!(hook.sanitize(FieldValue::from("abc")), FieldValue::from("***"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyHook {
    keys: HashSet<String>,
    mask: FieldValue,
}

impl KeyHook {
    pub const DEFAULT_MASK: &'static str = "***";

    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            mask: FieldValue::from(Self::DEFAULT_MASK),
        }
    }

    #[must_use]
    pub fn with_mask(mut self, mask: impl Into<FieldValue>) -> Self {
        self.mask = mask.into();
        self
    }
}

impl SanitizeHook for KeyHook {
    fn check(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn sanitize(&self, _value: FieldValue) -> FieldValue {
        self.mask.clone()
    }
}

/// Sanitize hook assembled from a key predicate and a value transform
///
/// # Example
///
/// ```
/// use logging_facility::hooks::FnHook;
/// use logging_facility::{FieldValue, SanitizeHook};
///
/// let hook = FnHook::new(
///     |key: &str| key.ends_with("_email"),
///     |_value: FieldValue| FieldValue::from("<redacted>"),
/// );
/// assert!(hook.check("user_email"));
/// ```
pub struct FnHook<C, S> {
    check: C,
    sanitize: S,
}

impl<C, S> FnHook<C, S>
where
    C: Fn(&str) -> bool + Send + Sync,
    S: Fn(FieldValue) -> FieldValue + Send + Sync,
{
    pub fn new(check: C, sanitize: S) -> Self {
        Self { check, sanitize }
    }
}

impl<C, S> SanitizeHook for FnHook<C, S>
where
    C: Fn(&str) -> bool + Send + Sync,
    S: Fn(FieldValue) -> FieldValue + Send + Sync,
{
    fn check(&self, key: &str) -> bool {
        (self.check)(key)
    }

    fn sanitize(&self, value: FieldValue) -> FieldValue {
        (self.sanitize)(value)
    }
}
