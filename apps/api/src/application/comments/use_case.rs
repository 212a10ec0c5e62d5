use super::dto::{CreateCommentRequest, UpdateCommentRequest};
use crate::domain::{
    comment::{
        entity::{Comment, CommentView, NewComment},
        repository::CommentRepository,
        threading::{CommentThreads, thread_comments},
    },
    post::repository::PostRepository,
    shared::errors::DomainError,
    vote::{entity::TargetKind, repository::VoteRepository},
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct CommentsUseCase {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl CommentsUseCase {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        votes: Arc<dyn VoteRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            votes,
        }
    }

    /// Comments of a post arranged into reply threads, oldest first.
    pub async fn threads(
        &self,
        viewer: Option<Uuid>,
        post_id: Uuid,
    ) -> Result<CommentThreads<CommentView>, DomainError> {
        self.ensure_post(post_id).await?;
        let mut comments = self.comments.list_for_post(post_id).await?;

        if let Some(viewer_id) = viewer.filter(|_| !comments.is_empty()) {
            let ids: Vec<Uuid> = comments.iter().map(|c| c.comment.id).collect();
            let votes = self
                .votes
                .votes_by_voter(viewer_id, TargetKind::Comment, &ids)
                .await?;
            for view in comments.iter_mut() {
                view.user_vote = votes.get(&view.comment.id).copied();
            }
        }

        let threads = thread_comments(comments);
        if !threads.orphans.is_empty() {
            tracing::warn!(
                post_id = %post_id,
                orphans = threads.orphans.len(),
                "comments reference missing parents"
            );
        }
        Ok(threads)
    }

    pub async fn create(
        &self,
        author: Option<Uuid>,
        post_id: Uuid,
        request: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let author_id = author.ok_or(DomainError::Unauthorized)?;
        request.validate()?;
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::ValidationError("Comment cannot be empty".into()));
        }
        self.ensure_post(post_id).await?;

        if let Some(parent_id) = request.parent_id {
            let parent = self
                .comments
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| DomainError::NotFound("Parent comment not found".into()))?;
            if parent.post_id != post_id {
                return Err(DomainError::ValidationError(
                    "Parent comment belongs to another post".into(),
                ));
            }
        }

        let comment = self
            .comments
            .create(NewComment {
                post_id,
                author_id,
                content,
                parent_id: request.parent_id,
            })
            .await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        caller: Option<Uuid>,
        id: Uuid,
        request: UpdateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        request.validate()?;
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::ValidationError("Comment cannot be empty".into()));
        }
        self.ensure_author(caller_id, id).await?;
        self.comments.update_content(id, content).await
    }

    pub async fn delete(&self, caller: Option<Uuid>, id: Uuid) -> Result<(), DomainError> {
        let caller_id = caller.ok_or(DomainError::Unauthorized)?;
        self.ensure_author(caller_id, id).await?;
        self.comments.delete(id).await
    }

    async fn ensure_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))
    }

    async fn ensure_author(&self, caller_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Comment not found".into()))?;
        if comment.author_id != caller_id {
            return Err(DomainError::Forbidden(
                "Only the author can change this comment".into(),
            ));
        }
        Ok(())
    }
}
