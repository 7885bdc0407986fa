//! UserProfile domain model.

/// The diary owner's public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub handle: String,
    pub avatar_url: String,
    pub bio: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            handle: "@user".to_string(),
            avatar_url: "https://picsum.photos/200".to_string(),
            bio: "Just another day in paradise.".to_string(),
        }
    }
}
