use crate::domain::{
    profile::entity::AuthorSummary, shared::closed_set::closed_set,
    vote::entity::VoteDirection,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

closed_set! {
    #[ts(export)]
    pub enum PostType {
        Theory => "theory",
        Art => "art",
        Discussion => "discussion",
        Question => "question",
        News => "news",
    }
}

/// A community post.
///
/// `votes` is a cache of the post's tally. It is only ever written by the tally
/// engine after a recount; post edits cannot touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub author_id: Uuid,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post decorated for listing: author card, comment count and the viewer's vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub comment_count: i64,
    pub user_vote: Option<VoteDirection>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub post_type: PostType,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub image_url: Option<String>,
}

/// Editable fields of a post. `image_url: Some(None)` clears the image.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub post_type: Option<PostType>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<Option<String>>,
}

impl PostChanges {
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(post_type) = self.post_type {
            post.post_type = post_type;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub post_type: Option<PostType>,
    pub author_username: Option<String>,
}
