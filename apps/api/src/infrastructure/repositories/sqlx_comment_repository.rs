use super::storage_error;
use crate::domain::{
    comment::{
        entity::{Comment, CommentView, NewComment},
        repository::CommentRepository,
    },
    profile::entity::AuthorSummary,
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "id, post_id, author_id, content, parent_id, votes, created_at, updated_at";

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}
impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentViewRow {
    #[sqlx(flatten)]
    comment: Comment,
    username: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
}

impl From<CommentViewRow> for CommentView {
    fn from(row: CommentViewRow) -> Self {
        CommentView {
            comment: row.comment,
            author: AuthorSummary {
                username: row.username,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
            },
            user_vote: None,
        }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (id, post_id, author_id, content, parent_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let rows = sqlx::query_as::<_, CommentViewRow>(
            "SELECT c.id, c.post_id, c.author_id, c.content, c.parent_id, c.votes, \
                    c.created_at, c.updated_at, \
                    pr.username, pr.display_name, pr.avatar_url \
             FROM comments c \
             LEFT JOIN profiles pr ON pr.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(CommentView::from).collect())
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&content)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| DomainError::NotFound("Comment not found".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        // Votes cascade; replies keep their dangling parent_id.
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Comment not found".into()));
        }
        Ok(())
    }
}
