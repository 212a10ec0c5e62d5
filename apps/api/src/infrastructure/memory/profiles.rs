use super::{AccountRecord, MemoryStore};
use crate::domain::{
    profile::{
        entity::{Credentials, NewAccount, Profile, ProfileChanges},
        repository::ProfileRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> Result<Profile, DomainError> {
        let mut state = self.state.lock().await;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Conflict("Email is already registered".into()));
        }
        let taken = state.profiles.values().any(|p| {
            p.username
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(&account.username))
        });
        if taken {
            return Err(DomainError::Conflict("Username is already taken".into()));
        }

        let now = Utc::now();
        let profile = Profile {
            id: Uuid::now_v7(),
            username: Some(account.username),
            display_name: account.display_name,
            avatar_url: None,
            bio: None,
            location: None,
            website: None,
            created_at: now,
            updated_at: now,
        };
        state.accounts.insert(
            profile.id,
            AccountRecord {
                email: account.email,
                password_hash: account.password_hash,
            },
        );
        state.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .iter()
            .find(|(_, account)| account.email == email)
            .map(|(id, account)| Credentials {
                account_id: *id,
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, DomainError> {
        Ok(self.state.lock().await.profiles.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .profiles
            .values()
            .find(|p| {
                p.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username))
            })
            .cloned())
    }

    async fn update(&self, id: Uuid, changes: ProfileChanges) -> Result<Profile, DomainError> {
        let mut state = self.state.lock().await;
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Profile not found".into()))?;
        changes.apply_to(profile);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn toggle_follow(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;
        let edge = (follower_id, following_id);
        if state.follows.remove(&edge) {
            Ok(false)
        } else {
            state.follows.insert(edge);
            Ok(true)
        }
    }

    async fn is_following(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self
            .state
            .lock()
            .await
            .follows
            .contains(&(follower_id, following_id)))
    }

    async fn follow_counts(&self, id: Uuid) -> Result<(i64, i64), DomainError> {
        let state = self.state.lock().await;
        let followers = state.follows.iter().filter(|(_, to)| *to == id).count();
        let following = state.follows.iter().filter(|(from, _)| *from == id).count();
        Ok((followers as i64, following as i64))
    }
}
