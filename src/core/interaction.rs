//! Framework-agnostic view of an inbound component interaction and of the reply
//! a handler wants sent back.
//!
//! The bot layer converts serenity interactions into [`Interaction`] and renders
//! [`Reply`] back into serenity builders, so everything under `core` can be
//! exercised without a gateway connection.

use std::fmt;

/// Capability an interaction arrives through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Button click
    Button,
    /// Modal submission
    Modal,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button => f.write_str("button"),
            Self::Modal => f.write_str("modal"),
        }
    }
}

/// An inbound button or modal interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Button or modal
    pub kind: InteractionKind,
    /// Raw custom id carried by the component
    pub custom_id: String,
    /// Discord user id of the actor
    pub actor_id: u64,
    /// Guild the interaction happened in, if any
    pub guild_id: Option<u64>,
    /// Submitted modal text inputs as `(custom_id, value)` pairs
    pub fields: Vec<(String, String)>,
}

impl Interaction {
    /// Creates a button interaction.
    #[must_use]
    pub fn button(custom_id: impl Into<String>, actor_id: u64, guild_id: Option<u64>) -> Self {
        Self {
            kind: InteractionKind::Button,
            custom_id: custom_id.into(),
            actor_id,
            guild_id,
            fields: Vec::new(),
        }
    }

    /// Creates a modal submission with its text inputs.
    #[must_use]
    pub fn modal(
        custom_id: impl Into<String>,
        actor_id: u64,
        guild_id: Option<u64>,
        fields: Vec<(String, String)>,
    ) -> Self {
        Self {
            kind: InteractionKind::Modal,
            custom_id: custom_id.into(),
            actor_id,
            guild_id,
            fields,
        }
    }

    /// Value of a submitted modal input, trimmed. Empty values count as missing.
    #[must_use]
    pub fn field(&self, input_id: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(id, _)| id == input_id)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Single-line or paragraph text input shown in a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalInput {
    /// Input custom id, echoed back in the submission
    pub custom_id: String,
    /// Label shown above the input
    pub label: String,
    /// Paragraph (multi-line) input
    pub paragraph: bool,
    /// Maximum length in characters
    pub max_length: u16,
}

/// What a handler wants sent back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain message response
    Message {
        /// Message text
        content: String,
        /// Only visible to the actor
        ephemeral: bool,
    },
    /// Open a modal (only valid in response to a button)
    Modal {
        /// Encoded custom id of the modal
        custom_id: String,
        /// Modal title
        title: String,
        /// Text inputs, one per row
        inputs: Vec<ModalInput>,
    },
}

impl Reply {
    /// Ephemeral message visible only to the actor.
    #[must_use]
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: true,
        }
    }

    /// Message visible to the whole channel.
    #[must_use]
    pub fn public(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// Message text, if this is a message reply.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Message { content, .. } => Some(content),
            Self::Modal { .. } => None,
        }
    }
}
