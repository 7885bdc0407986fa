//! JSON-document ProfileRepository implementation

use crate::dto::ProfileRecord;
use crate::storage::{PersistedStore, keys};
use haru_core::Result;
use haru_core::profile::{ProfileRepository, UserProfile};

pub struct JsonProfileRepository {
    store: PersistedStore,
}

impl JsonProfileRepository {
    pub fn new(store: PersistedStore) -> Self {
        Self { store }
    }
}

impl ProfileRepository for JsonProfileRepository {
    fn load(&self) -> UserProfile {
        self.store
            .read_or(keys::PROFILE, ProfileRecord::default)
            .into()
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        self.store.write(keys::PROFILE, &ProfileRecord::from(profile))
    }
}
