//! Discord component handlers
//!
//! Buttons and modals routed by the dispatcher. [`register_all`] is called once
//! at startup, before the registry is frozen.

/// Clan creation and invite handlers
pub mod clan;
/// Settings toggle handlers
pub mod settings;
/// Support ticket handlers
pub mod ticket;

use crate::core::{
    registry::{Handler, HandlerRegistry, RegistryError},
    settings::SettingField,
};
use std::sync::Arc;

/// Registers every button and modal handler the bot serves.
pub fn register_all(registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
    for field in SettingField::ALL {
        registry.register(Handler::Button(Arc::new(
            settings::ToggleSettingHandler::new(field),
        )))?;
    }

    registry.register(Handler::Button(Arc::new(clan::CreateClanButton)))?;
    registry.register(Handler::Modal(Arc::new(clan::CreateClanModal)))?;
    registry.register(Handler::Button(Arc::new(clan::ClanInviteHandler)))?;

    registry.register(Handler::Button(Arc::new(ticket::OpenTicketButton)))?;
    registry.register(Handler::Modal(Arc::new(ticket::SubmitTicketModal)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::interaction::InteractionKind;

    #[test]
    fn test_register_all() {
        let mut registry = HandlerRegistry::new();
        register_all(&mut registry).unwrap();

        assert_eq!(registry.len(InteractionKind::Button), 6);
        assert_eq!(registry.len(InteractionKind::Modal), 2);

        let accept = registry
            .resolve(InteractionKind::Button, "clan-invite:accept")
            .unwrap();
        assert_eq!(accept.custom_id(), "clan-invite");

        // A second registration pass collides on the first key
        assert!(matches!(
            register_all(&mut registry),
            Err(RegistryError::Duplicate { .. })
        ));
    }
}
