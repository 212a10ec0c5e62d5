use super::{MemoryState, MemoryStore};
use crate::domain::{
    comment::{
        entity::{Comment, CommentView, NewComment},
        repository::CommentRepository,
    },
    shared::errors::DomainError,
    vote::entity::VoteTarget,
};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

impl MemoryState {
    fn comment_view(&self, comment: &Comment) -> CommentView {
        CommentView {
            comment: comment.clone(),
            author: self.author_summary(comment.author_id),
            user_vote: None,
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.state.lock().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(DomainError::NotFound("Post not found".into()));
        }
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::now_v7(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            content: comment.content,
            parent_id: comment.parent_id,
            votes: 0,
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        Ok(self.state.lock().await.comments.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let state = self.state.lock().await;
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments
            .into_iter()
            .map(|comment| state.comment_view(comment))
            .collect())
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        let mut state = self.state.lock().await;
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Comment not found".into()))?;
        comment.content = content;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.comments.remove(&id).is_none() {
            return Err(DomainError::NotFound("Comment not found".into()));
        }
        state.purge_votes(VoteTarget::comment(id));
        Ok(())
    }
}
