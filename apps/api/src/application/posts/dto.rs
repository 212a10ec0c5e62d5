use crate::domain::post::{
    entity::{PostChanges, PostType},
    value_objects::{normalize_tags, validate_tags},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    /// Author username.
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 20000, message = "Content must be 1 to 20000 characters"))]
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000, message = "Content must be 1 to 20000 characters"))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub remove_image: bool,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(request: UpdatePostRequest) -> Self {
        let image_url = if request.remove_image {
            Some(None)
        } else {
            request.image_url.map(Some)
        };
        PostChanges {
            title: request.title.map(|t| t.trim().to_string()),
            content: request.content,
            post_type: request.post_type,
            tags: request.tags.map(normalize_tags),
            image_url,
        }
    }
}
