use crate::domain::dragon::entity::{
    FavoriteTarget, IndividualDetail, IndividualFilter, Rarity, SpeciesDetail, SpeciesFilter,
};
use crate::domain::shared::errors::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesQuery {
    pub class_id: Option<Uuid>,
    pub rarity: Option<Rarity>,
    pub search: Option<String>,
}

impl From<SpeciesQuery> for SpeciesFilter {
    fn from(query: SpeciesQuery) -> Self {
        SpeciesFilter {
            class_id: query.class_id,
            rarity: query.rarity,
            search: non_blank(query.search),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndividualQuery {
    pub featured: Option<bool>,
    pub species_id: Option<Uuid>,
    pub search: Option<String>,
}

impl From<IndividualQuery> for IndividualFilter {
    fn from(query: IndividualQuery) -> Self {
        IndividualFilter {
            featured: query.featured,
            species_id: query.species_id,
            search: non_blank(query.search),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub species: Vec<SpeciesDetail>,
    pub individuals: Vec<IndividualDetail>,
}

/// Exactly one of the two ids must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub species_id: Option<Uuid>,
    pub individual_id: Option<Uuid>,
}

impl TryFrom<ToggleFavoriteRequest> for FavoriteTarget {
    type Error = DomainError;

    fn try_from(request: ToggleFavoriteRequest) -> Result<Self, Self::Error> {
        match (request.species_id, request.individual_id) {
            (Some(id), None) => Ok(FavoriteTarget::Species(id)),
            (None, Some(id)) => Ok(FavoriteTarget::Individual(id)),
            _ => Err(DomainError::ValidationError(
                "Provide exactly one of species_id or individual_id".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub favorited: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
