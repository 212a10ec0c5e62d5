use super::{MemoryState, MemoryStore};
use crate::domain::{
    post::{
        entity::{NewPost, Post, PostChanges, PostFilter, PostView},
        repository::PostRepository,
    },
    profile::entity::AuthorSummary,
    shared::{errors::DomainError, pagination::PaginationRequest},
    vote::entity::VoteTarget,
};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

impl MemoryState {
    pub(super) fn author_summary(&self, author_id: Uuid) -> AuthorSummary {
        self.profiles
            .get(&author_id)
            .map(|profile| profile.summary())
            .unwrap_or_default()
    }

    fn post_view(&self, post: &Post) -> PostView {
        PostView {
            post: post.clone(),
            author: self.author_summary(post.author_id),
            comment_count: self
                .comments
                .values()
                .filter(|comment| comment.post_id == post.id)
                .count() as i64,
            user_vote: None,
        }
    }

    fn matches_filter(&self, post: &Post, filter: &PostFilter) -> bool {
        if filter.post_type.is_some_and(|t| t != post.post_type) {
            return false;
        }
        match &filter.author_username {
            Some(username) => self
                .profiles
                .get(&post.author_id)
                .and_then(|profile| profile.username.as_deref())
                .is_some_and(|name| name.eq_ignore_ascii_case(username)),
            None => true,
        }
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            title: post.title,
            content: post.content,
            post_type: post.post_type,
            author_id: post.author_id,
            image_url: post.image_url,
            tags: post.tags,
            votes: 0,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.posts.get(&id).map(|post| state.post_view(post)))
    }

    async fn list(
        &self,
        filter: PostFilter,
        page: PaginationRequest,
    ) -> Result<(Vec<PostView>, i64), DomainError> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Post> = state
            .posts
            .values()
            .filter(|post| state.matches_filter(post, &filter))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|post| state.post_view(post))
            .collect();
        Ok((items, total))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let mut state = self.state.lock().await;
        let post = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;
        changes.apply_to(post);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.posts.remove(&id).is_none() {
            return Err(DomainError::NotFound("Post not found".into()));
        }
        let comment_ids: Vec<Uuid> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == id)
            .map(|comment| comment.id)
            .collect();
        for comment_id in comment_ids {
            state.comments.remove(&comment_id);
            state.purge_votes(VoteTarget::comment(comment_id));
        }
        state.purge_votes(VoteTarget::post(id));
        Ok(())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .posts
            .values()
            .filter(|post| post.author_id == author_id)
            .count() as i64)
    }
}
