//! Sanitize hooks applied to field values before records are emitted

use super::fields::FieldValue;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Redaction step for sensitive field values.
///
/// `check` receives the lower-cased field key; when it returns `true` the
/// value is replaced by `sanitize(value)`. A well-behaved hook is idempotent:
/// sanitizing an already sanitized value returns it unchanged.
pub trait SanitizeHook: Send + Sync {
    fn check(&self, key: &str) -> bool;
    fn sanitize(&self, value: FieldValue) -> FieldValue;
}

static GLOBAL_HOOKS: Lazy<Arc<HookRegistry>> = Lazy::new(|| Arc::new(HookRegistry::new()));

/// Append-only list of sanitize hooks.
///
/// Registration and iteration are mutually exclusive. Loggers use the
/// process-wide registry unless built with their own instance.
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn SanitizeHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// The process-wide registry
    pub fn global() -> Arc<HookRegistry> {
        Arc::clone(&GLOBAL_HOOKS)
    }

    pub fn register<H: SanitizeHook + 'static>(&self, hook: H) {
        self.hooks.write().push(Arc::new(hook));
    }

    pub fn register_shared(&self, hook: Arc<dyn SanitizeHook>) {
        self.hooks.write().push(hook);
    }

    /// Run every matching hook over `value`, in registration order.
    ///
    /// Hooks chain: a later hook sees the value produced by an earlier one.
    pub fn apply(&self, key: &str, value: FieldValue) -> FieldValue {
        // Hooks run outside the lock so they may log or register hooks
        let hooks = self.hooks.read().clone();
        if hooks.is_empty() {
            return value;
        }

        let key = key.to_lowercase();
        hooks.iter().fold(value, |value, hook| {
            if hook.check(&key) {
                hook.sanitize(value)
            } else {
                value
            }
        })
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    /// Remove every hook. Intended for test isolation.
    pub fn clear(&self) {
        self.hooks.write().clear();
    }
}

/// Register a hook with the process-wide registry
pub fn register_sanitize_hook<H: SanitizeHook + 'static>(hook: H) {
    GLOBAL_HOOKS.register(hook);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mask(&'static str);

    impl SanitizeHook for Mask {
        fn check(&self, key: &str) -> bool {
            key.contains(self.0)
        }

        fn sanitize(&self, _value: FieldValue) -> FieldValue {
            FieldValue::from("***")
        }
    }

    struct Suffix;

    impl SanitizeHook for Suffix {
        fn check(&self, key: &str) -> bool {
            key == "token"
        }

        fn sanitize(&self, value: FieldValue) -> FieldValue {
            match value {
                FieldValue::String(s) if !s.ends_with("!") => FieldValue::String(s + "!"),
                other => other,
            }
        }
    }

    #[test]
    fn test_apply_without_hooks() {
        let registry = HookRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.apply("password", "x".into()), FieldValue::from("x"));
    }

    #[test]
    fn test_check_sees_lowercased_key() {
        let registry = HookRegistry::new();
        registry.register(Mask("password"));

        assert_eq!(
            registry.apply("DB_Password", "hunter2".into()),
            FieldValue::from("***")
        );
        assert_eq!(registry.apply("user", "tj".into()), FieldValue::from("tj"));
    }

    #[test]
    fn test_hooks_chain_in_registration_order() {
        let registry = HookRegistry::new();
        registry.register(Mask("token"));
        registry.register(Suffix);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.apply("token", "abc".into()), FieldValue::from("***!"));
    }

    #[test]
    fn test_idempotent_hook() {
        let registry = HookRegistry::new();
        registry.register(Suffix);

        let once = registry.apply("token", "abc".into());
        let twice = registry.apply("token", once.clone());
        assert_eq!(once, twice);
    }

    struct Registering(std::sync::Weak<HookRegistry>);

    impl SanitizeHook for Registering {
        fn check(&self, key: &str) -> bool {
            key == "token"
        }

        fn sanitize(&self, value: FieldValue) -> FieldValue {
            if let Some(registry) = self.0.upgrade() {
                registry.register(Mask("secret"));
            }
            value
        }
    }

    #[test]
    fn test_hook_may_register_while_applied() {
        let registry = Arc::new(HookRegistry::new());
        registry.register(Registering(Arc::downgrade(&registry)));

        assert_eq!(registry.apply("token", "abc".into()), FieldValue::from("abc"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.apply("secret", "x".into()), FieldValue::from("***"));
    }

    #[test]
    fn test_clear() {
        let registry = HookRegistry::new();
        registry.register(Mask("a"));
        registry.clear();
        assert!(registry.is_empty());
    }
}
