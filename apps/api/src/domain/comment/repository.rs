use super::entity::{Comment, CommentView, NewComment};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    /// Every comment of the post, oldest first, with author cards.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError>;
    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError>;
    /// Removes the comment and its votes. Replies are left in place.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
