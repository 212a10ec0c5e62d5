use super::dto::{
    FavoriteResponse, IndividualQuery, SearchResults, SpeciesQuery, ToggleFavoriteRequest,
};
use crate::domain::{
    dragon::{
        entity::{
            DragonClass, DragonLocation, FavoriteTarget, Favorites, IndividualDetail,
            IndividualFilter, SpeciesDetail, SpeciesFilter,
        },
        repository::DragonRepository,
    },
    shared::errors::DomainError,
};
use crate::infrastructure::cache::redis_cache::RedisCache;
use serde::{Serialize, de::DeserializeOwned};
use std::{collections::HashSet, future::Future, sync::Arc};
use uuid::Uuid;

const CACHE_PREFIX: &str = "wyrmlore:dragons";

pub struct EncyclopediaUseCase {
    dragons: Arc<dyn DragonRepository>,
    cache: Option<Arc<RedisCache>>,
    cache_ttl_seconds: u64,
}

impl EncyclopediaUseCase {
    pub fn new(dragons: Arc<dyn DragonRepository>) -> Self {
        Self {
            dragons,
            cache: None,
            cache_ttl_seconds: 0,
        }
    }

    /// Serve viewer-independent reads through Redis. A zero TTL leaves caching off.
    pub fn with_cache(mut self, cache: Option<Arc<RedisCache>>, ttl_seconds: u64) -> Self {
        self.cache = cache.filter(|_| ttl_seconds > 0);
        self.cache_ttl_seconds = ttl_seconds;
        self
    }

    pub async fn classes(&self) -> Result<Vec<DragonClass>, DomainError> {
        let dragons = self.dragons.clone();
        self.cached(format!("{CACHE_PREFIX}:classes"), move || async move {
            dragons.list_classes().await
        })
        .await
    }

    pub async fn species(
        &self,
        viewer: Option<Uuid>,
        query: SpeciesQuery,
    ) -> Result<Vec<SpeciesDetail>, DomainError> {
        let filter: SpeciesFilter = query.into();
        let mut species = self.load_species(filter).await?;
        let favorites = self.favorites_of(viewer).await?;
        for item in species.iter_mut() {
            mark_species(item, &favorites);
        }
        Ok(species)
    }

    pub async fn species_by_id(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
    ) -> Result<SpeciesDetail, DomainError> {
        let mut species = self
            .dragons
            .find_species(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Dragon species not found".into()))?;
        mark_species(&mut species, &self.favorites_of(viewer).await?);
        Ok(species)
    }

    pub async fn individuals(
        &self,
        viewer: Option<Uuid>,
        query: IndividualQuery,
    ) -> Result<Vec<IndividualDetail>, DomainError> {
        let filter: IndividualFilter = query.into();
        let mut individuals = self.load_individuals(filter).await?;
        let favorites = self.favorites_of(viewer).await?;
        for item in individuals.iter_mut() {
            mark_individual(item, &favorites);
        }
        Ok(individuals)
    }

    /// One individual with its outgoing relationships.
    pub async fn individual_by_id(
        &self,
        viewer: Option<Uuid>,
        id: Uuid,
    ) -> Result<IndividualDetail, DomainError> {
        let mut individual = self
            .dragons
            .find_individual(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Dragon not found".into()))?;
        individual.relationships = self.dragons.relationships_of(id).await?;
        mark_individual(&mut individual, &self.favorites_of(viewer).await?);
        Ok(individual)
    }

    /// Public locations; hidden ones are only reachable by id.
    pub async fn locations(&self) -> Result<Vec<DragonLocation>, DomainError> {
        let dragons = self.dragons.clone();
        self.cached(format!("{CACHE_PREFIX}:locations"), move || async move {
            dragons.list_locations(false).await
        })
        .await
    }

    pub async fn location_by_id(&self, id: Uuid) -> Result<DragonLocation, DomainError> {
        self.dragons
            .find_location(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Location not found".into()))
    }

    pub async fn search(
        &self,
        viewer: Option<Uuid>,
        term: &str,
    ) -> Result<SearchResults, DomainError> {
        if term.trim().is_empty() {
            return Err(DomainError::ValidationError("Search term is required".into()));
        }
        let (species, individuals) = tokio::try_join!(
            self.species(
                viewer,
                SpeciesQuery {
                    search: Some(term.to_string()),
                    ..Default::default()
                },
            ),
            self.individuals(
                viewer,
                IndividualQuery {
                    search: Some(term.to_string()),
                    ..Default::default()
                },
            ),
        )?;
        Ok(SearchResults {
            species,
            individuals,
        })
    }

    pub async fn toggle_favorite(
        &self,
        caller: Option<Uuid>,
        request: ToggleFavoriteRequest,
    ) -> Result<FavoriteResponse, DomainError> {
        let user_id = caller.ok_or(DomainError::Unauthorized)?;
        let target = FavoriteTarget::try_from(request)?;
        let favorited = self.dragons.toggle_favorite(user_id, target).await?;
        Ok(FavoriteResponse { favorited })
    }

    pub async fn favorites(&self, caller: Option<Uuid>) -> Result<Favorites, DomainError> {
        let user_id = caller.ok_or(DomainError::Unauthorized)?;
        let mut favorites = self.dragons.list_favorites(user_id).await?;
        let ids = self.dragons.favorite_ids(user_id).await?;
        for species in favorites.species.iter_mut() {
            mark_species(species, &ids);
        }
        for individual in favorites.individuals.iter_mut() {
            mark_individual(individual, &ids);
        }
        Ok(favorites)
    }

    async fn load_species(&self, filter: SpeciesFilter) -> Result<Vec<SpeciesDetail>, DomainError> {
        let key = format!(
            "{CACHE_PREFIX}:species:{}:{}:{}",
            filter.class_id.map(|id| id.to_string()).unwrap_or_default(),
            filter.rarity.map(|r| r.as_str()).unwrap_or_default(),
            filter.search.as_deref().unwrap_or_default().to_lowercase(),
        );
        let dragons = self.dragons.clone();
        self.cached(key, move || async move { dragons.list_species(filter).await })
            .await
    }

    async fn load_individuals(
        &self,
        filter: IndividualFilter,
    ) -> Result<Vec<IndividualDetail>, DomainError> {
        let key = format!(
            "{CACHE_PREFIX}:individuals:{}:{}:{}",
            filter.featured.map(|f| f.to_string()).unwrap_or_default(),
            filter.species_id.map(|id| id.to_string()).unwrap_or_default(),
            filter.search.as_deref().unwrap_or_default().to_lowercase(),
        );
        let dragons = self.dragons.clone();
        self.cached(key, move || async move { dragons.list_individuals(filter).await })
            .await
    }

    async fn favorites_of(
        &self,
        viewer: Option<Uuid>,
    ) -> Result<HashSet<FavoriteTarget>, DomainError> {
        match viewer {
            Some(user_id) => self.dragons.favorite_ids(user_id).await,
            None => Ok(HashSet::new()),
        }
    }

    async fn cached<T, F, Fut>(&self, key: String, fetch: F) -> Result<T, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let Some(cache) = &self.cache else {
            return fetch().await;
        };
        cache
            .get_or_fetch(&key, self.cache_ttl_seconds, || async move {
                fetch().await.map_err(anyhow::Error::from)
            })
            .await
            .map_err(|err| match err.downcast::<DomainError>() {
                Ok(domain) => domain,
                Err(other) => DomainError::InfrastructureError(other.to_string()),
            })
    }
}

fn mark_species(species: &mut SpeciesDetail, favorites: &HashSet<FavoriteTarget>) {
    species.is_favorited = favorites.contains(&FavoriteTarget::Species(species.species.id));
}

fn mark_individual(individual: &mut IndividualDetail, favorites: &HashSet<FavoriteTarget>) {
    individual.is_favorited =
        favorites.contains(&FavoriteTarget::Individual(individual.individual.id));
    mark_species(&mut individual.species, favorites);
}
