//! Vote tally against a real Postgres. Skipped unless `DATABASE_URL` is set.

use super::helpers::{unique_email, unique_username};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use wyrmlore_api::{
    domain::{
        comment::{entity::NewComment, repository::CommentRepository},
        post::{
            entity::{NewPost, PostType},
            repository::PostRepository,
        },
        profile::{entity::NewAccount, repository::ProfileRepository},
        shared::errors::DomainError,
        vote::{
            entity::{VoteDirection, VoteTarget},
            repository::VoteRepository,
        },
    },
    infrastructure::{
        database::pool::create_pool,
        repositories::{
            SqlxCommentRepository, SqlxPostRepository, SqlxProfileRepository, SqlxVoteRepository,
        },
    },
};

async fn connect() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping Postgres vote tests");
        return None;
    };
    let pool = create_pool(&url, 10).await.expect("failed to create pool");
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(true);
    migrator.run(&pool).await.expect("migrations failed");
    Some(pool)
}

async fn account(pool: &PgPool) -> Uuid {
    SqlxProfileRepository::new(pool.clone())
        .create_account(NewAccount {
            email: unique_email("pg"),
            password_hash: "not-a-real-hash".into(),
            username: unique_username("pg"),
            display_name: None,
        })
        .await
        .expect("account should be created")
        .id
}

async fn post(pool: &PgPool, author_id: Uuid) -> Uuid {
    SqlxPostRepository::new(pool.clone())
        .create(NewPost {
            title: "Where do Skrills nest?".into(),
            content: "Somewhere cold.".into(),
            post_type: PostType::Question,
            tags: vec![],
            author_id,
            image_url: None,
        })
        .await
        .expect("post should be created")
        .id
}

async fn comment(pool: &PgPool, post_id: Uuid, author_id: Uuid) -> Uuid {
    SqlxCommentRepository::new(pool.clone())
        .create(NewComment {
            post_id,
            author_id,
            content: "Near the glaciers.".into(),
            parent_id: None,
        })
        .await
        .expect("comment should be created")
        .id
}

/// Cached column, SQL recount and repository recount, in that order.
async fn scores(pool: &PgPool, votes: &SqlxVoteRepository, target: VoteTarget) -> (i32, i64, i32) {
    let table = target.kind.table();
    let column = target.kind.vote_column();
    let cached: i32 = sqlx::query_scalar(&format!("SELECT votes FROM {table} WHERE id = $1"))
        .bind(target.id)
        .fetch_one(pool)
        .await
        .expect("cached votes");
    let counted: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FILTER (WHERE vote_type = 'up') - COUNT(*) FILTER (WHERE vote_type = 'down') \
         FROM votes WHERE {column} = $1"
    ))
    .bind(target.id)
    .fetch_one(pool)
    .await
    .expect("vote rows");
    let recounted = votes.recount(target).await.expect("recount").score();
    (cached, counted, recounted)
}

async fn rows_for(pool: &PgPool, voter: Uuid, target: VoteTarget) -> i64 {
    let column = target.kind.vote_column();
    sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM votes WHERE user_id = $1 AND {column} = $2"
    ))
    .bind(voter)
    .bind(target.id)
    .fetch_one(pool)
    .await
    .expect("vote row count")
}

#[tokio::test]
async fn post_column_tracks_vote_rows_through_every_transition() {
    let Some(pool) = connect().await else { return };
    let votes = SqlxVoteRepository::new(pool.clone());
    let author = account(&pool).await;
    let other = account(&pool).await;
    let target = VoteTarget::post(post(&pool, author).await);

    let steps = [
        (author, Some(VoteDirection::Up), 1),
        (author, Some(VoteDirection::Up), 1),
        (author, Some(VoteDirection::Down), -1),
        (other, Some(VoteDirection::Down), -2),
        (author, None, -1),
        (author, None, -1),
    ];
    for (voter, direction, expected) in steps {
        let outcome = votes
            .cast_vote(voter, target, direction, false)
            .await
            .expect("vote should apply");
        assert_eq!(outcome.total_votes, expected);
        assert_eq!(outcome.user_vote, direction);
        let (cached, counted, recounted) = scores(&pool, &votes, target).await;
        assert_eq!(cached, expected);
        assert_eq!(counted, i64::from(expected));
        assert_eq!(recounted, expected);
        assert!(rows_for(&pool, voter, target).await <= 1);
    }
    assert_eq!(rows_for(&pool, author, target).await, 0);
}

#[tokio::test]
async fn toggling_a_comment_vote_twice_clears_it() {
    let Some(pool) = connect().await else { return };
    let votes = SqlxVoteRepository::new(pool.clone());
    let author = account(&pool).await;
    let post_id = post(&pool, author).await;
    let target = VoteTarget::comment(comment(&pool, post_id, author).await);

    let first = votes
        .cast_vote(author, target, Some(VoteDirection::Up), true)
        .await
        .expect("first toggle");
    assert_eq!(first.user_vote, Some(VoteDirection::Up));
    assert_eq!(first.total_votes, 1);

    let second = votes
        .cast_vote(author, target, Some(VoteDirection::Up), true)
        .await
        .expect("second toggle");
    assert_eq!(second.user_vote, None);
    assert_eq!(second.total_votes, 0);
    assert_eq!(scores(&pool, &votes, target).await, (0, 0, 0));
    assert_eq!(rows_for(&pool, author, target).await, 0);
}

#[tokio::test]
async fn concurrent_votes_leave_the_column_equal_to_the_rows() {
    let Some(pool) = connect().await else { return };
    let votes = Arc::new(SqlxVoteRepository::new(pool.clone()));
    let author = account(&pool).await;
    let target = VoteTarget::post(post(&pool, author).await);

    let mut voters = Vec::new();
    for _ in 0..8 {
        voters.push(account(&pool).await);
    }
    let tasks: Vec<_> = voters
        .iter()
        .enumerate()
        .map(|(i, &voter)| {
            let votes = votes.clone();
            let direction = if i % 4 == 0 {
                VoteDirection::Down
            } else {
                VoteDirection::Up
            };
            tokio::spawn(async move { votes.cast_vote(voter, target, Some(direction), false).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("task panicked").expect("vote should apply");
    }

    assert_eq!(scores(&pool, &votes, target).await, (4, 4, 4));
}

#[tokio::test]
async fn concurrent_toggles_by_one_voter_cancel_out() {
    let Some(pool) = connect().await else { return };
    let votes = Arc::new(SqlxVoteRepository::new(pool.clone()));
    let author = account(&pool).await;
    let target = VoteTarget::post(post(&pool, author).await);

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let votes = votes.clone();
            tokio::spawn(async move {
                votes
                    .cast_vote(author, target, Some(VoteDirection::Up), true)
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task panicked").expect("toggle should apply");
    }

    assert_eq!(scores(&pool, &votes, target).await, (0, 0, 0));
    assert_eq!(rows_for(&pool, author, target).await, 0);
}

#[tokio::test]
async fn voting_on_a_missing_post_is_not_found() {
    let Some(pool) = connect().await else { return };
    let votes = SqlxVoteRepository::new(pool.clone());
    let voter = account(&pool).await;

    let result = votes
        .cast_vote(voter, VoteTarget::post(Uuid::now_v7()), Some(VoteDirection::Up), false)
        .await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
}
