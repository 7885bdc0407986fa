//! Agent settings repository trait.

use super::settings::AgentSettings;
use crate::error::Result;

/// Persistence for the agent configuration.
///
/// The whole configuration (agents plus active set) is stored as a single
/// document; callers read-modify-write it as a unit.
pub trait AgentSettingsRepository: Send + Sync {
    /// Loads the configuration.
    ///
    /// Never fails: a missing or unreadable document yields
    /// [`AgentSettings::defaults`].
    fn load(&self) -> AgentSettings;

    /// Replaces the stored configuration.
    fn save(&self, settings: &AgentSettings) -> Result<()>;
}
