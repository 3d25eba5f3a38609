//! Core logic - framework-agnostic interaction dispatch, cooldowns, job
//! submission and store operations.
//!
//! Nothing here talks to Discord directly; the `bot` module converts serenity
//! types into [`interaction::Interaction`] and renders [`interaction::Reply`].

/// NATS JetStream job broker
pub mod broker;
/// Clan store operations
pub mod clan;
/// Per-user, per-action cooldowns
pub mod cooldown;
/// Component custom id codec
pub mod custom_id;
/// Decode → cooldown → resolve → execute pipeline
pub mod dispatch;
/// Handler trait, context and errors
pub mod handler;
/// Inbound interaction and reply types
pub mod interaction;
/// Job queue bridge
pub mod jobs;
/// Button/modal handler registry
pub mod registry;
/// Guild settings store operations
pub mod settings;
