use super::storage_error;
use crate::domain::{
    profile::{
        entity::{Credentials, NewAccount, Profile, ProfileChanges},
        repository::ProfileRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const PROFILE_COLUMNS: &str =
    "id, username, display_name, avatar_url, bio, location, website, created_at, updated_at";

pub struct SqlxProfileRepository {
    pub pool: PgPool,
}
impl SqlxProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn create_account(&self, account: NewAccount) -> Result<Profile, DomainError> {
        let id = Uuid::now_v7();
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query("INSERT INTO accounts (id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&account.email)
            .bind(&account.password_hash)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (id, username, display_name) VALUES ($1, $2, $3) \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(id)
        .bind(&account.username)
        .bind(&account.display_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(profile)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DomainError> {
        let row = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, email, password_hash FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(|(account_id, email, password_hash)| Credentials {
            account_id,
            email,
            password_hash,
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, DomainError> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, DomainError> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE LOWER(username) = LOWER($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn update(&self, id: Uuid, changes: ProfileChanges) -> Result<Profile, DomainError> {
        let mut profile = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Profile not found".into()))?;
        changes.apply_to(&mut profile);

        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET display_name = $2, avatar_url = $3, bio = $4, location = $5, \
                 website = $6, updated_at = NOW() \
             WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(id)
        .bind(&profile.display_name)
        .bind(&profile.avatar_url)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(&profile.website)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn toggle_follow(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        let removed = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
            .bind(follower_id)
            .bind(following_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO follows (follower_id, following_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(follower_id)
            .bind(following_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        }

        tx.commit().await.map_err(storage_error)?;
        Ok(removed == 0)
    }

    async fn is_following(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn follow_counts(&self, id: Uuid) -> Result<(i64, i64), DomainError> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT COUNT(*) FROM follows WHERE following_id = $1), \
                    (SELECT COUNT(*) FROM follows WHERE follower_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }
}
