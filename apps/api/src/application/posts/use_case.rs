use super::dto::{CreatePostRequest, ListPostsQuery, UpdatePostRequest};
use crate::domain::{
    post::{
        entity::{NewPost, Post, PostFilter, PostView},
        repository::PostRepository,
        value_objects::normalize_tags,
    },
    shared::{
        errors::DomainError,
        pagination::{PaginatedResponse, PaginationRequest},
    },
    vote::{entity::TargetKind, repository::VoteRepository},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct PostsUseCase {
    posts: Arc<dyn PostRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl PostsUseCase {
    pub fn new(posts: Arc<dyn PostRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { posts, votes }
    }

    pub async fn list(
        &self,
        viewer: Option<Uuid>,
        query: ListPostsQuery,
    ) -> Result<PaginatedResponse<PostView>, DomainError> {
        let page = PaginationRequest::new(query.page, query.limit);
        let filter = PostFilter {
            post_type: query.post_type,
            author_username: query
                .author
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        };
        let (mut items, total) = self.posts.list(filter, page).await?;
        self.attach_viewer_votes(viewer, &mut items).await?;
        Ok(PaginatedResponse::new(items, total, page))
    }

    pub async fn get(&self, viewer: Option<Uuid>, id: Uuid) -> Result<PostView, DomainError> {
        let view = self
            .posts
            .find_view(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;
        let mut items = vec![view];
        self.attach_viewer_votes(viewer, &mut items).await?;
        Ok(items.remove(0))
    }

    pub async fn create(
        &self,
        author: Option<Uuid>,
        request: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let author_id = author.ok_or(DomainError::Unauthorized)?;
        request.validate()?;
        if request.content.trim().is_empty() {
            return Err(DomainError::ValidationError("Post content cannot be empty".into()));
        }

        let post = self
            .posts
            .create(NewPost {
                title: request.title.trim().to_string(),
                content: request.content,
                post_type: request.post_type,
                tags: normalize_tags(request.tags),
                author_id,
                image_url: request.image_url,
            })
            .await?;
        tracing::info!(post_id = %post.id, author = %author_id, "post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        caller: Option<Uuid>,
        id: Uuid,
        request: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        request.validate()?;
        self.ensure_author(caller_id, id).await?;
        self.posts.update(id, request.into()).await
    }

    pub async fn delete(&self, caller: Option<Uuid>, id: Uuid) -> Result<(), DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        self.ensure_author(caller_id, id).await?;
        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }

    async fn ensure_author(&self, caller_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;
        if post.author_id != caller_id {
            return Err(DomainError::Forbidden("Only the author can change this post".into()));
        }
        Ok(())
    }

    async fn attach_viewer_votes(
        &self,
        viewer: Option<Uuid>,
        items: &mut [PostView],
    ) -> Result<(), DomainError> {
        let Some(viewer_id) = viewer else {
            return Ok(());
        };
        if items.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = items.iter().map(|v| v.post.id).collect();
        let votes = self
            .votes
            .votes_by_voter(viewer_id, TargetKind::Post, &ids)
            .await?;
        for item in items.iter_mut() {
            item.user_vote = votes.get(&item.post.id).copied();
        }
        Ok(())
    }
}
