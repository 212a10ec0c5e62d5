use super::{FavoriteRecord, MemoryState, MemoryStore};
use crate::domain::{
    dragon::{
        entity::{
            DragonClass, DragonIndividual, DragonLocation, DragonSpecies, FavoriteTarget,
            Favorites, IndividualDetail, IndividualFilter, RelationshipDetail, SpeciesDetail,
            SpeciesFilter, matches_search,
        },
        repository::DragonRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

impl MemoryState {
    fn species_detail(&self, species: &DragonSpecies) -> Result<SpeciesDetail, DomainError> {
        let dragon_class = self.classes.get(&species.class_id).cloned().ok_or_else(|| {
            DomainError::InfrastructureError(format!(
                "Species {} references missing class {}",
                species.id, species.class_id
            ))
        })?;
        let mut abilities: Vec<_> = self
            .abilities
            .iter()
            .filter(|a| a.species_id == species.id)
            .cloned()
            .collect();
        abilities.sort_by(|a, b| {
            b.power_level
                .cmp(&a.power_level)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(SpeciesDetail {
            species: species.clone(),
            dragon_class,
            abilities,
            stats: self.stats.get(&species.id).cloned(),
            is_favorited: false,
        })
    }

    fn individual_detail(
        &self,
        individual: &DragonIndividual,
    ) -> Result<IndividualDetail, DomainError> {
        let species = self.species.get(&individual.species_id).ok_or_else(|| {
            DomainError::InfrastructureError(format!(
                "Dragon {} references missing species {}",
                individual.id, individual.species_id
            ))
        })?;
        Ok(IndividualDetail {
            individual: individual.clone(),
            species: self.species_detail(species)?,
            relationships: Vec::new(),
            is_favorited: false,
        })
    }

    fn favorite_exists(&self, target: FavoriteTarget) -> bool {
        match target {
            FavoriteTarget::Species(id) => self.species.contains_key(&id),
            FavoriteTarget::Individual(id) => self.individuals.contains_key(&id),
        }
    }
}

#[async_trait]
impl DragonRepository for MemoryStore {
    async fn list_classes(&self) -> Result<Vec<DragonClass>, DomainError> {
        let state = self.state.lock().await;
        let mut classes: Vec<DragonClass> = state.classes.values().cloned().collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(classes)
    }

    async fn list_species(&self, filter: SpeciesFilter) -> Result<Vec<SpeciesDetail>, DomainError> {
        let state = self.state.lock().await;
        let mut species: Vec<&DragonSpecies> = state
            .species
            .values()
            .filter(|s| filter.class_id.is_none_or(|id| id == s.class_id))
            .filter(|s| filter.rarity.is_none_or(|rarity| rarity == s.rarity))
            .filter(|s| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|term| matches_search(term, &s.name, Some(&s.description)))
            })
            .collect();
        species.sort_by(|a, b| a.name.cmp(&b.name));
        species.into_iter().map(|s| state.species_detail(s)).collect()
    }

    async fn find_species(&self, id: Uuid) -> Result<Option<SpeciesDetail>, DomainError> {
        let state = self.state.lock().await;
        state
            .species
            .get(&id)
            .map(|s| state.species_detail(s))
            .transpose()
    }

    async fn list_individuals(
        &self,
        filter: IndividualFilter,
    ) -> Result<Vec<IndividualDetail>, DomainError> {
        let state = self.state.lock().await;
        let mut individuals: Vec<&DragonIndividual> = state
            .individuals
            .values()
            .filter(|i| filter.featured.is_none_or(|f| f == i.is_featured))
            .filter(|i| filter.species_id.is_none_or(|id| id == i.species_id))
            .filter(|i| {
                filter.search.as_deref().is_none_or(|term| {
                    matches_search(term, &i.name, i.description.as_deref())
                })
            })
            .collect();
        individuals.sort_by(|a, b| a.name.cmp(&b.name));
        individuals
            .into_iter()
            .map(|i| state.individual_detail(i))
            .collect()
    }

    async fn find_individual(&self, id: Uuid) -> Result<Option<IndividualDetail>, DomainError> {
        let state = self.state.lock().await;
        state
            .individuals
            .get(&id)
            .map(|i| state.individual_detail(i))
            .transpose()
    }

    async fn relationships_of(&self, id: Uuid) -> Result<Vec<RelationshipDetail>, DomainError> {
        let state = self.state.lock().await;
        let mut relationships: Vec<RelationshipDetail> = state
            .relationships
            .iter()
            .filter(|r| r.dragon1_id == id)
            .filter_map(|r| {
                state
                    .individuals
                    .get(&r.dragon2_id)
                    .map(|related| RelationshipDetail {
                        relationship: r.clone(),
                        related_dragon: related.clone(),
                    })
            })
            .collect();
        relationships.sort_by_key(|r| r.relationship.created_at);
        Ok(relationships)
    }

    async fn list_locations(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<DragonLocation>, DomainError> {
        let state = self.state.lock().await;
        let mut locations: Vec<DragonLocation> = state
            .locations
            .values()
            .filter(|l| include_hidden || !l.is_hidden)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    async fn find_location(&self, id: Uuid) -> Result<Option<DragonLocation>, DomainError> {
        Ok(self.state.lock().await.locations.get(&id).cloned())
    }

    async fn toggle_favorite(
        &self,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;
        if !state.favorite_exists(target) {
            return Err(DomainError::NotFound(match target {
                FavoriteTarget::Species(_) => "Dragon species not found".into(),
                FavoriteTarget::Individual(_) => "Dragon not found".into(),
            }));
        }
        let before = state.favorites.len();
        state
            .favorites
            .retain(|f| !(f.user_id == user_id && f.target == target));
        if state.favorites.len() < before {
            return Ok(false);
        }
        state.favorites.push(FavoriteRecord {
            user_id,
            target,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn favorite_ids(&self, user_id: Uuid) -> Result<HashSet<FavoriteTarget>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.target)
            .collect())
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Favorites, DomainError> {
        let state = self.state.lock().await;
        let mut records: Vec<&FavoriteRecord> = state
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut favorites = Favorites::default();
        for record in records {
            match record.target {
                FavoriteTarget::Species(id) => {
                    if let Some(species) = state.species.get(&id) {
                        favorites.species.push(state.species_detail(species)?);
                    }
                }
                FavoriteTarget::Individual(id) => {
                    if let Some(individual) = state.individuals.get(&id) {
                        favorites.individuals.push(state.individual_detail(individual)?);
                    }
                }
            }
        }
        Ok(favorites)
    }
}
