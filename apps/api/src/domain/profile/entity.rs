use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Public profile of an account. `id` is the account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Author card embedded in posts and comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthorSummary {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    /// Whether the viewer follows this profile; `None` for anonymous viewers.
    pub is_following: Option<bool>,
}

/// Login material. Never serialized.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub account_id: Uuid,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub display_name: Option<String>,
}

/// Editable profile fields. Inner `None` clears a field.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub website: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(v) = self.display_name {
            profile.display_name = v;
        }
        if let Some(v) = self.avatar_url {
            profile.avatar_url = v;
        }
        if let Some(v) = self.bio {
            profile.bio = v;
        }
        if let Some(v) = self.location {
            profile.location = v;
        }
        if let Some(v) = self.website {
            profile.website = v;
        }
    }
}
