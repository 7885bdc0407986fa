//! User profile service with change notification.

use haru_core::Result;
use haru_core::profile::{ProfileRepository, UserProfile};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
    events: broadcast::Sender<UserProfile>,
}

impl ProfileService {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        let (events, _) = broadcast::channel(8);
        Self { repository, events }
    }

    /// The stored profile, or the default one.
    pub fn get(&self) -> UserProfile {
        self.repository.load()
    }

    /// Saves the profile and notifies subscribers.
    pub fn update(&self, profile: UserProfile) -> Result<UserProfile> {
        self.repository.save(&profile)?;
        tracing::info!(handle = %profile.handle, "Profile updated");
        let _ = self.events.send(profile.clone());
        Ok(profile)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UserProfile> {
        self.events.subscribe()
    }
}
