//! Profile repository trait.

use super::model::UserProfile;
use crate::error::Result;

/// Persistence for the single user profile record.
pub trait ProfileRepository: Send + Sync {
    /// Loads the profile, falling back to [`UserProfile::default`].
    fn load(&self) -> UserProfile;

    fn save(&self, profile: &UserProfile) -> Result<()>;
}
