//! Error types for runeforge-core

use crate::identity::EntityId;
use thiserror::Error;

/// Core error type
///
/// None of these abort a dispatch: the executor logs and skips the failing
/// effect, and the periodic driver logs and skips the failing actor.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Enchantment id must not be empty")]
    EmptyId,

    #[error("Enchantment '{0}' has no display name")]
    EmptyDisplayName(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] ron::error::SpannedError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
