use super::storage_error;
use crate::domain::{
    post::{
        entity::{NewPost, Post, PostChanges, PostFilter, PostView},
        repository::PostRepository,
    },
    profile::entity::AuthorSummary,
    shared::{errors::DomainError, pagination::PaginationRequest},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const POST_COLUMNS: &str = "p.id, p.title, p.content, p.type AS post_type, p.author_id, \
     p.image_url, p.tags, p.votes, p.created_at, p.updated_at";

const VIEW_FROM: &str = " FROM posts p LEFT JOIN profiles pr ON pr.id = p.author_id";

pub struct SqlxPostRepository {
    pub pool: PgPool,
}
impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    post_type: String,
    author_id: Uuid,
    image_url: Option<String>,
    tags: Vec<String>,
    votes: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: row.id,
            title: row.title,
            content: row.content,
            post_type: row.post_type.parse()?,
            author_id: row.author_id,
            image_url: row.image_url,
            tags: row.tags,
            votes: row.votes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PostViewRow {
    #[sqlx(flatten)]
    post: PostRow,
    username: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
    comment_count: i64,
}

impl TryFrom<PostViewRow> for PostView {
    type Error = DomainError;

    fn try_from(row: PostViewRow) -> Result<Self, Self::Error> {
        Ok(PostView {
            post: row.post.try_into()?,
            author: AuthorSummary {
                username: row.username,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
            },
            comment_count: row.comment_count,
            user_vote: None,
        })
    }
}

fn view_query() -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
    qb.push(POST_COLUMNS);
    qb.push(
        ", pr.username, pr.display_name, pr.avatar_url, \
         (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count",
    );
    qb.push(VIEW_FROM);
    qb
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    qb.push(" WHERE TRUE");
    if let Some(post_type) = filter.post_type {
        qb.push(" AND p.type = ");
        qb.push_bind(post_type.as_str());
    }
    if let Some(username) = &filter.author_username {
        qb.push(" AND LOWER(pr.username) = LOWER(");
        qb.push_bind(username.clone());
        qb.push(")");
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts (id, title, content, type, author_id, image_url, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, title, content, type AS post_type, author_id, image_url, tags, \
                       votes, created_at, updated_at",
        )
        .bind(Uuid::now_v7())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.post_type.as_str())
        .bind(post.author_id)
        .bind(&post.image_url)
        .bind(&post.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(Post::try_from)
        .transpose()
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, DomainError> {
        let mut qb = view_query();
        qb.push(" WHERE p.id = ");
        qb.push_bind(id);
        qb.build_query_as::<PostViewRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .map(PostView::try_from)
            .transpose()
    }

    async fn list(
        &self,
        filter: PostFilter,
        page: PaginationRequest,
    ) -> Result<(Vec<PostView>, i64), DomainError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count_qb.push(VIEW_FROM);
        push_filter(&mut count_qb, &filter);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        let mut qb = view_query();
        push_filter(&mut qb, &filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());
        let rows = qb
            .build_query_as::<PostViewRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        let posts = rows
            .into_iter()
            .map(PostView::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((posts, total))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let mut post = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;
        changes.apply_to(&mut post);

        // `votes` is owned by the tally engine and never written here.
        let row = sqlx::query_as::<_, PostRow>(
            "UPDATE posts SET title = $2, content = $3, type = $4, tags = $5, image_url = $6, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, title, content, type AS post_type, author_id, image_url, tags, \
                       votes, created_at, updated_at",
        )
        .bind(id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.post_type.as_str())
        .bind(&post.tags)
        .bind(&post.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| DomainError::NotFound("Post not found".into()))?;
        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        // Comments and votes go with the post through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".into()));
        }
        Ok(())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }
}
