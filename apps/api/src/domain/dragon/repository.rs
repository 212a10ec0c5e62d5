use super::entity::{
    DragonClass, DragonLocation, FavoriteTarget, Favorites, IndividualDetail, IndividualFilter,
    RelationshipDetail, SpeciesDetail, SpeciesFilter,
};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

/// Reference-data reads return records with `is_favorited = false`; the
/// encyclopedia use case decorates them per viewer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DragonRepository: Send + Sync {
    async fn list_classes(&self) -> Result<Vec<DragonClass>, DomainError>;
    async fn list_species(&self, filter: SpeciesFilter) -> Result<Vec<SpeciesDetail>, DomainError>;
    async fn find_species(&self, id: Uuid) -> Result<Option<SpeciesDetail>, DomainError>;
    async fn list_individuals(
        &self,
        filter: IndividualFilter,
    ) -> Result<Vec<IndividualDetail>, DomainError>;
    async fn find_individual(&self, id: Uuid) -> Result<Option<IndividualDetail>, DomainError>;
    async fn relationships_of(&self, id: Uuid) -> Result<Vec<RelationshipDetail>, DomainError>;
    async fn list_locations(&self, include_hidden: bool)
    -> Result<Vec<DragonLocation>, DomainError>;
    async fn find_location(&self, id: Uuid) -> Result<Option<DragonLocation>, DomainError>;

    /// Flips the bookmark and returns whether it is now set. `NotFound` when the
    /// bookmarked record does not exist.
    async fn toggle_favorite(
        &self,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> Result<bool, DomainError>;
    /// Ids of every species and individual the user has bookmarked.
    async fn favorite_ids(&self, user_id: Uuid) -> Result<HashSet<FavoriteTarget>, DomainError>;
    /// Bookmarks, most recent first.
    async fn list_favorites(&self, user_id: Uuid) -> Result<Favorites, DomainError>;
}
