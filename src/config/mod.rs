//! Configuration module for Sluice.
//!
//! Handles the settings file, environment variables, and the target table identifier.

mod settings;
mod table;

pub use settings::{
    expand_env_vars, BoundsSettings, ConversationSettings, ProviderKind, ProviderSettings,
    Settings, SettingsError, TableSettings,
};
pub use table::TableIdent;
