use super::entity::{NewPost, Post, PostChanges, PostFilter, PostView};
use crate::domain::shared::{errors::DomainError, pagination::PaginationRequest};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, DomainError>;
    /// Newest first. Returns the requested page and the total match count.
    async fn list(
        &self,
        filter: PostFilter,
        page: PaginationRequest,
    ) -> Result<(Vec<PostView>, i64), DomainError>;
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError>;
    /// Removes the post together with its comments and votes.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn count_by_author(&self, author_id: Uuid) -> Result<i64, DomainError>;
}
