//! Handler registry for button and modal interactions.
//!
//! Populated once at startup, then frozen behind an `Arc` ([`RegistryHolder`])
//! and shared read-only with the dispatcher.

use crate::core::{handler::ComponentHandler, interaction::InteractionKind};
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error;
use tracing::debug;

/// Separator between the category and the action in a lookup key.
pub const KEY_SEPARATOR: char = ':';

/// Frozen, shareable registry.
pub type RegistryHolder = Arc<HandlerRegistry>;

/// Registration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another handler already owns this key
    #[error("a {kind} handler is already registered for `{key}`")]
    Duplicate {
        /// Mapping the collision happened in
        kind: InteractionKind,
        /// Colliding key
        key: String,
    },
    /// Handler key is empty
    #[error("handler keys must not be empty")]
    EmptyKey,
    /// No handler matches the lookup key
    #[error("no {kind} handler for `{key}`")]
    NotFound {
        /// Mapping that was searched
        kind: InteractionKind,
        /// Lookup key
        key: String,
    },
}

/// A handler tagged with the capability it serves.
#[derive(Clone)]
pub enum Handler {
    /// Serves button clicks
    Button(Arc<dyn ComponentHandler>),
    /// Serves modal submissions
    Modal(Arc<dyn ComponentHandler>),
}

impl Handler {
    /// Capability this handler serves.
    #[must_use]
    pub const fn kind(&self) -> InteractionKind {
        match self {
            Self::Button(_) => InteractionKind::Button,
            Self::Modal(_) => InteractionKind::Modal,
        }
    }

    /// Registry key of the wrapped handler.
    #[must_use]
    pub fn custom_id(&self) -> &str {
        match self {
            Self::Button(handler) | Self::Modal(handler) => handler.custom_id(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind())
            .field("custom_id", &self.custom_id())
            .finish()
    }
}

type HandlerMap = BTreeMap<String, Arc<dyn ComponentHandler>>;

/// Two independent mappings from lookup key to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    buttons: HandlerMap,
    modals: HandlerMap,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its `custom_id`.
    pub fn register(&mut self, handler: Handler) -> Result<(), RegistryError> {
        let kind = handler.kind();
        let (map, handler) = match handler {
            Handler::Button(handler) => (&mut self.buttons, handler),
            Handler::Modal(handler) => (&mut self.modals, handler),
        };

        let key = handler.custom_id().to_string();
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if map.contains_key(&key) {
            return Err(RegistryError::Duplicate { kind, key });
        }

        debug!(%kind, key = %key, "Registered interaction handler");
        map.insert(key, handler);
        Ok(())
    }

    /// Finds the handler for `key`.
    ///
    /// Exact matches win. Otherwise the longest registered key that is a prefix
    /// of `key` ending on a [`KEY_SEPARATOR`] boundary is chosen, so `clan`
    /// serves `clan:create` but never `clan-invite:accept`.
    pub fn resolve(
        &self,
        kind: InteractionKind,
        key: &str,
    ) -> Result<Arc<dyn ComponentHandler>, RegistryError> {
        let map = self.map(kind);
        if let Some(handler) = map.get(key) {
            return Ok(Arc::clone(handler));
        }

        map.iter()
            .filter(|(prefix, _)| is_aligned_prefix(prefix, key))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, handler)| Arc::clone(handler))
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                key: key.to_string(),
            })
    }

    /// Number of handlers registered for a capability.
    #[must_use]
    pub fn len(&self, kind: InteractionKind) -> usize {
        self.map(kind).len()
    }

    /// True when no handler of either kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.modals.is_empty()
    }

    /// Freezes the registry for sharing.
    #[must_use]
    pub fn into_holder(self) -> RegistryHolder {
        Arc::new(self)
    }

    const fn map(&self, kind: InteractionKind) -> &HandlerMap {
        match kind {
            InteractionKind::Button => &self.buttons,
            InteractionKind::Modal => &self.modals,
        }
    }
}

fn is_aligned_prefix(prefix: &str, key: &str) -> bool {
    key.strip_prefix(prefix).is_some_and(|rest| {
        prefix.ends_with(KEY_SEPARATOR) || rest.starts_with(KEY_SEPARATOR)
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::RecordingHandler;

    fn button(key: &str) -> Handler {
        Handler::Button(RecordingHandler::new(key))
    }

    #[test]
    fn test_exact_match() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("settings:toggle-tickets")).unwrap();

        let handler = registry
            .resolve(InteractionKind::Button, "settings:toggle-tickets")
            .unwrap();
        assert_eq!(handler.custom_id(), "settings:toggle-tickets");
    }

    #[test]
    fn test_unregistered_key_is_not_found() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("settings:toggle-tickets")).unwrap();

        let err = registry
            .resolve(InteractionKind::Button, "settings:toggle-logs")
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::NotFound {
                kind: InteractionKind::Button,
                key: "settings:toggle-logs".to_string(),
            }
        );
    }

    #[test]
    fn test_button_and_modal_maps_are_independent() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("clan:create")).unwrap();
        registry
            .register(Handler::Modal(RecordingHandler::new("clan:create")))
            .unwrap();

        assert_eq!(registry.len(InteractionKind::Button), 1);
        assert_eq!(registry.len(InteractionKind::Modal), 1);
        assert!(
            registry
                .resolve(InteractionKind::Modal, "ticket:submit")
                .is_err()
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("ticket:open")).unwrap();
        let err = registry.register(button("ticket:open")).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { kind: InteractionKind::Button, .. }));
        assert_eq!(registry.register(button("")), Err(RegistryError::EmptyKey));
    }

    #[test]
    fn test_prefix_requires_separator_alignment() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("clan")).unwrap();

        assert!(registry.resolve(InteractionKind::Button, "clan:create").is_ok());
        assert!(
            registry
                .resolve(InteractionKind::Button, "clan-invite:accept")
                .is_err()
        );
        assert!(registry.resolve(InteractionKind::Button, "cla").is_err());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("clan-invite")).unwrap();
        registry.register(button("clan-invite:accept")).unwrap();
        registry.register(button("clan-invite:")).unwrap();

        // Exact match beats any prefix
        let exact = registry
            .resolve(InteractionKind::Button, "clan-invite:accept")
            .unwrap();
        assert_eq!(exact.custom_id(), "clan-invite:accept");

        // "clan-invite:" and "clan-invite" both match; the longer one wins
        let longest = registry
            .resolve(InteractionKind::Button, "clan-invite:decline")
            .unwrap();
        assert_eq!(longest.custom_id(), "clan-invite:");

        // "clan-invite:accept" is a prefix of this key, aligned on ':'
        let nested = registry
            .resolve(InteractionKind::Button, "clan-invite:accept:all")
            .unwrap();
        assert_eq!(nested.custom_id(), "clan-invite:accept");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = HandlerRegistry::new();
        registry.register(button("ticket:open")).unwrap();
        assert!(registry.resolve(InteractionKind::Button, "Ticket:Open").is_err());
    }
}
