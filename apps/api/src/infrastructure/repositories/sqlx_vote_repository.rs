use super::storage_error;
use crate::domain::{
    shared::errors::DomainError,
    vote::{
        entity::{TargetKind, Vote, VoteDirection, VoteOutcome, VoteTarget},
        repository::VoteRepository,
        tally::{resolve_toggle, Tally, VoteTransition},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

pub struct SqlxVoteRepository {
    pub pool: PgPool,
}
impl SqlxVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    id: Uuid,
    user_id: Uuid,
    vote_type: String,
    created_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_vote(self, target: VoteTarget) -> Result<Vote, DomainError> {
        Ok(Vote {
            id: self.id,
            voter_id: self.user_id,
            target,
            direction: self.vote_type.parse()?,
            created_at: self.created_at,
        })
    }
}

async fn load_vote<'e, E: PgExecutor<'e>>(
    executor: E,
    voter_id: Uuid,
    target: VoteTarget,
) -> Result<Option<Vote>, DomainError> {
    let sql = format!(
        "SELECT id, user_id, vote_type, created_at FROM votes WHERE user_id = $1 AND {} = $2",
        target.kind.vote_column()
    );
    sqlx::query_as::<_, VoteRow>(&sql)
        .bind(voter_id)
        .bind(target.id)
        .fetch_optional(executor)
        .await
        .map_err(storage_error)?
        .map(|row| row.into_vote(target))
        .transpose()
}

async fn tally_of<'e, E: PgExecutor<'e>>(
    executor: E,
    target: VoteTarget,
) -> Result<Tally, DomainError> {
    let sql = format!(
        "SELECT COUNT(*) FILTER (WHERE vote_type = 'up'), \
                COUNT(*) FILTER (WHERE vote_type = 'down') \
         FROM votes WHERE {} = $1",
        target.kind.vote_column()
    );
    let (up, down) = sqlx::query_as::<_, (i64, i64)>(&sql)
        .bind(target.id)
        .fetch_one(executor)
        .await
        .map_err(storage_error)?;
    Ok(Tally { up, down })
}

fn target_missing(target: VoteTarget) -> DomainError {
    match target.kind {
        TargetKind::Post => DomainError::NotFound("Post not found".into()),
        TargetKind::Comment => DomainError::NotFound("Comment not found".into()),
    }
}

#[async_trait]
impl VoteRepository for SqlxVoteRepository {
    async fn find_vote(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
    ) -> Result<Option<Vote>, DomainError> {
        load_vote(&self.pool, voter_id, target).await
    }

    async fn cast_vote(
        &self,
        voter_id: Uuid,
        target: VoteTarget,
        direction: Option<VoteDirection>,
        toggle: bool,
    ) -> Result<VoteOutcome, DomainError> {
        let table = target.kind.table();
        let column = target.kind.vote_column();
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        // The row lock serializes every vote on this target until commit.
        let locked = sqlx::query_scalar::<_, Uuid>(&format!(
            "SELECT id FROM {table} WHERE id = $1 FOR UPDATE"
        ))
        .bind(target.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;
        if locked.is_none() {
            return Err(target_missing(target));
        }

        let existing = load_vote(&mut *tx, voter_id, target).await?;
        let current = existing.as_ref().map(|vote| vote.direction);
        let direction = if toggle {
            resolve_toggle(current, direction)
        } else {
            direction
        };
        let transition = VoteTransition::between(current, direction);

        match transition {
            VoteTransition::Unchanged => {}
            VoteTransition::Inserted(to) => {
                sqlx::query(&format!(
                    "INSERT INTO votes (id, user_id, {column}, vote_type) VALUES ($1, $2, $3, $4)"
                ))
                .bind(Uuid::now_v7())
                .bind(voter_id)
                .bind(target.id)
                .bind(to.as_str())
                .execute(&mut *tx)
                .await
                .map_err(storage_error)?;
            }
            VoteTransition::Flipped { to, .. } => {
                if let Some(vote) = &existing {
                    sqlx::query("UPDATE votes SET vote_type = $1 WHERE id = $2")
                        .bind(to.as_str())
                        .bind(vote.id)
                        .execute(&mut *tx)
                        .await
                        .map_err(storage_error)?;
                }
            }
            VoteTransition::Removed(_) => {
                if let Some(vote) = &existing {
                    sqlx::query("DELETE FROM votes WHERE id = $1")
                        .bind(vote.id)
                        .execute(&mut *tx)
                        .await
                        .map_err(storage_error)?;
                }
            }
        }

        let tally = tally_of(&mut *tx, target).await?;
        sqlx::query(&format!("UPDATE {table} SET votes = $1 WHERE id = $2"))
            .bind(tally.score())
            .bind(target.id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        debug!(?transition, up = tally.up, down = tally.down, "Vote applied");

        Ok(VoteOutcome {
            target,
            total_votes: tally.score(),
            user_vote: transition.resulting(current),
        })
    }

    async fn recount(&self, target: VoteTarget) -> Result<Tally, DomainError> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            target.kind.table()
        ))
        .bind(target.id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;
        if !exists {
            return Err(target_missing(target));
        }
        tally_of(&self.pool, target).await
    }

    async fn votes_by_voter(
        &self,
        voter_id: Uuid,
        kind: TargetKind,
        target_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, VoteDirection>, DomainError> {
        if target_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let column = kind.vote_column();
        let rows = sqlx::query_as::<_, (Uuid, String)>(&format!(
            "SELECT {column}, vote_type FROM votes WHERE user_id = $1 AND {column} = ANY($2)"
        ))
        .bind(voter_id)
        .bind(target_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter()
            .map(|(id, vote_type)| vote_type.parse::<VoteDirection>().map(|d| (id, d)))
            .collect()
    }
}
