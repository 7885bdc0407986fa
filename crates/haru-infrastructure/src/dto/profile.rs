//! User profile DTO.

use haru_core::profile::UserProfile;
use serde::{Deserialize, Serialize};

/// Stored profile. Missing fields take the default profile's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub name: String,
    pub handle: String,
    pub avatar_url: String,
    pub bio: String,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        ProfileRecord::from(&UserProfile::default())
    }
}

impl From<&UserProfile> for ProfileRecord {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            handle: profile.handle.clone(),
            avatar_url: profile.avatar_url.clone(),
            bio: profile.bio.clone(),
        }
    }
}

impl From<ProfileRecord> for UserProfile {
    fn from(record: ProfileRecord) -> Self {
        UserProfile {
            name: record.name,
            handle: record.handle,
            avatar_url: record.avatar_url,
            bio: record.bio,
        }
    }
}
