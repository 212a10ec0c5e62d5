use crate::{
    application::{
        cast_vote::use_case::CastVoteUseCase, comments::use_case::CommentsUseCase,
        encyclopedia::use_case::EncyclopediaUseCase, posts::use_case::PostsUseCase,
        profiles::use_case::ProfilesUseCase,
    },
    config::Config,
    domain::{
        comment::repository::CommentRepository, dragon::repository::DragonRepository,
        post::repository::PostRepository, profile::repository::ProfileRepository,
        vote::repository::VoteRepository,
    },
    infrastructure::{
        cache::redis_cache::RedisCache,
        memory::MemoryStore,
        repositories::{
            SqlxCommentRepository, SqlxDragonRepository, SqlxPostRepository,
            SqlxProfileRepository, SqlxVoteRepository,
        },
        security::rate_limiter::RateLimiter,
    },
};
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use std::sync::Arc;

/// One handle per store concern. Both backends plug in here.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub dragons: Arc<dyn DragonRepository>,
}

impl Repositories {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            posts: Arc::new(SqlxPostRepository::new(pool.clone())),
            comments: Arc::new(SqlxCommentRepository::new(pool.clone())),
            votes: Arc::new(SqlxVoteRepository::new(pool.clone())),
            profiles: Arc::new(SqlxProfileRepository::new(pool.clone())),
            dragons: Arc::new(SqlxDragonRepository::new(pool.clone())),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            votes: store.clone(),
            profiles: store.clone(),
            dragons: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` on the memory backend.
    pub db: Option<PgPool>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub votes: Arc<CastVoteUseCase>,
    pub posts: Arc<PostsUseCase>,
    pub comments: Arc<CommentsUseCase>,
    pub profiles: Arc<ProfilesUseCase>,
    pub encyclopedia: Arc<EncyclopediaUseCase>,
}

impl AppState {
    pub fn new(
        config: Config,
        repos: Repositories,
        db: Option<PgPool>,
        redis: Option<ConnectionManager>,
    ) -> Self {
        let cache = redis.clone().map(|conn| Arc::new(RedisCache::new(conn)));
        let rate_limiter = redis.map(|conn| Arc::new(RateLimiter::new(conn)));

        Self {
            votes: Arc::new(CastVoteUseCase::new(repos.votes.clone())),
            posts: Arc::new(PostsUseCase::new(repos.posts.clone(), repos.votes.clone())),
            comments: Arc::new(CommentsUseCase::new(
                repos.comments.clone(),
                repos.posts.clone(),
                repos.votes.clone(),
            )),
            profiles: Arc::new(ProfilesUseCase::new(
                repos.profiles.clone(),
                repos.posts.clone(),
            )),
            encyclopedia: Arc::new(
                EncyclopediaUseCase::new(repos.dragons.clone())
                    .with_cache(cache, config.encyclopedia_cache_ttl_seconds),
            ),
            profile_repo: repos.profiles,
            rate_limiter,
            db,
            config,
        }
    }

    pub fn in_memory(config: Config, store: Arc<MemoryStore>) -> Self {
        Self::new(config, Repositories::memory(store), None, None)
    }
}
