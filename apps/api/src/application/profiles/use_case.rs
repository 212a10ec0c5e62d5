use super::dto::{FollowResponse, UpdateProfileRequest};
use crate::domain::{
    post::repository::PostRepository,
    profile::{
        entity::{Profile, ProfileView},
        repository::ProfileRepository,
    },
    shared::errors::DomainError,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct ProfilesUseCase {
    profiles: Arc<dyn ProfileRepository>,
    posts: Arc<dyn PostRepository>,
}

impl ProfilesUseCase {
    pub fn new(profiles: Arc<dyn ProfileRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { profiles, posts }
    }

    pub async fn by_username(
        &self,
        viewer: Option<Uuid>,
        username: &str,
    ) -> Result<ProfileView, DomainError> {
        let profile = self.find_username(username).await?;
        let (follower_count, following_count) = self.profiles.follow_counts(profile.id).await?;
        let post_count = self.posts.count_by_author(profile.id).await?;
        let is_following = match viewer {
            Some(viewer_id) => Some(self.profiles.is_following(viewer_id, profile.id).await?),
            None => None,
        };
        Ok(ProfileView {
            profile,
            follower_count,
            following_count,
            post_count,
            is_following,
        })
    }

    pub async fn me(&self, caller: Option<Uuid>) -> Result<Profile, DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        self.profiles
            .find_by_id(caller_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Profile not found".into()))
    }

    pub async fn update_me(
        &self,
        caller: Option<Uuid>,
        request: UpdateProfileRequest,
    ) -> Result<Profile, DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        request.validate()?;
        self.profiles.update(caller_id, request.into()).await
    }

    pub async fn toggle_follow(
        &self,
        caller: Option<Uuid>,
        username: &str,
    ) -> Result<FollowResponse, DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        let target = self.find_username(username).await?;
        if target.id == caller_id {
            return Err(DomainError::ValidationError("You cannot follow yourself".into()));
        }
        let following = self.profiles.toggle_follow(caller_id, target.id).await?;
        let (follower_count, _) = self.profiles.follow_counts(target.id).await?;
        Ok(FollowResponse {
            following,
            follower_count,
        })
    }

    async fn find_username(&self, username: &str) -> Result<Profile, DomainError> {
        self.profiles
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| DomainError::NotFound("Profile not found".into()))
    }
}
