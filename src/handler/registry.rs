//! Handler registry for dispatching frames by command identifier.
//!
//! The registry is a plain identifier-to-handler map plus one fallback
//! slot. It knows nothing about which identifiers a layout reserves;
//! the engine builder enforces that policy before anything lands here.
//!
//! Handlers are stored behind `Arc` so dispatch can clone one out and
//! run it while the engine stays borrowable by the handler itself.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::CommandHandler;

/// Registry mapping command identifiers to handlers.
pub struct HandlerRegistry {
    handlers: HashMap<u16, Arc<dyn CommandHandler>>,
    fallback: Option<Arc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry with no fallback.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Associate `handler` with `id`. Re-registration overwrites.
    pub fn register(&mut self, id: u16, handler: impl CommandHandler + 'static) {
        self.register_shared(id, Arc::new(handler));
    }

    pub(crate) fn register_shared(&mut self, id: u16, handler: Arc<dyn CommandHandler>) {
        if self.handlers.insert(id, handler).is_some() {
            debug!(command = id, "handler re-registered");
        }
    }

    /// Install the fallback used for identifiers with no handler.
    pub fn set_fallback(&mut self, handler: impl CommandHandler + 'static) {
        self.set_fallback_shared(Arc::new(handler));
    }

    pub(crate) fn set_fallback_shared(&mut self, handler: Arc<dyn CommandHandler>) {
        self.fallback = Some(handler);
    }

    /// Handler for `id`, if one is registered.
    pub fn lookup(&self, id: u16) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(&id).cloned()
    }

    /// The fallback handler, if installed.
    pub fn fallback(&self) -> Option<Arc<dyn CommandHandler>> {
        self.fallback.clone()
    }

    /// True when a handler is registered for `id`.
    pub fn is_registered(&self, id: u16) -> bool {
        self.handlers.contains_key(&id)
    }

    /// Number of registered handlers, fallback excluded.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Context;
    use crate::error::Result;

    fn noop(_ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.is_empty());

        registry.register(7, noop);

        assert!(registry.is_registered(7));
        assert!(registry.lookup(7).is_some());
        assert!(registry.lookup(8).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_re_registration_overwrites() {
        let mut registry = HandlerRegistry::new();
        registry.register(7, noop);
        registry.register(7, noop);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_fallback_slot() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.fallback().is_none());

        registry.set_fallback(noop);
        assert!(registry.fallback().is_some());
    }
}
