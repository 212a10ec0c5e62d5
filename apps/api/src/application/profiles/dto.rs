use crate::domain::profile::entity::ProfileChanges;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidateUrl, ValidationError};

/// Profile edit. Empty strings clear a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 60, message = "Display name must be less than 60 characters"))]
    pub display_name: Option<String>,
    #[validate(custom(function = "url_or_empty", message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 500, message = "Bio must be less than 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "Location must be less than 100 characters"))]
    pub location: Option<String>,
    #[validate(custom(function = "url_or_empty", message = "Invalid website URL"))]
    pub website: Option<String>,
}

fn url_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.trim().validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileChanges {
            display_name: clearable(request.display_name),
            avatar_url: clearable(request.avatar_url),
            bio: clearable(request.bio),
            location: clearable(request.location),
            website: clearable(request.website),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FollowResponse {
    pub following: bool,
    pub follower_count: i64,
}
