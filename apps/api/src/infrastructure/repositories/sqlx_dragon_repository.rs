use super::storage_error;
use crate::domain::{
    dragon::{
        entity::{
            DragonAbility, DragonClass, DragonIndividual, DragonLocation, DragonRelationship,
            DragonSpecies, DragonStats, FavoriteTarget, Favorites, IndividualDetail,
            IndividualFilter, RelationshipDetail, SpeciesDetail, SpeciesFilter,
        },
        repository::DragonRepository,
    },
    shared::{closed_set::parse_optional, errors::DomainError},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const CLASS_COLUMNS: &str =
    "id, name, description, characteristics, color_code, created_at, updated_at";
const SPECIES_COLUMNS: &str = "id, name, class_id, description, lore, rarity, size_category, \
     habitat, diet, temperament, intelligence_level, image_url, created_at, updated_at";
const INDIVIDUAL_COLUMNS: &str = "id, name, species_id, description, status, gender, \
     age_category, rider_name, location, first_appearance, special_traits, image_url, \
     is_featured, created_at, updated_at";
const LOCATION_COLUMNS: &str = "id, name, description, location_type, climate, dangers, \
     notable_species, coordinates, image_url, is_hidden, created_at, updated_at";

pub struct SqlxDragonRepository {
    pub pool: PgPool,
}
impl SqlxDragonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SpeciesRow {
    id: Uuid,
    name: String,
    class_id: Uuid,
    description: String,
    lore: Option<String>,
    rarity: String,
    size_category: String,
    habitat: Vec<String>,
    diet: String,
    temperament: String,
    intelligence_level: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SpeciesRow> for DragonSpecies {
    type Error = DomainError;

    fn try_from(row: SpeciesRow) -> Result<Self, Self::Error> {
        Ok(DragonSpecies {
            id: row.id,
            name: row.name,
            class_id: row.class_id,
            description: row.description,
            lore: row.lore,
            rarity: row.rarity.parse()?,
            size_category: row.size_category.parse()?,
            habitat: row.habitat,
            diet: row.diet,
            temperament: row.temperament,
            intelligence_level: row.intelligence_level.parse()?,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AbilityRow {
    id: Uuid,
    species_id: Uuid,
    name: String,
    description: String,
    ability_type: String,
    power_level: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AbilityRow> for DragonAbility {
    type Error = DomainError;

    fn try_from(row: AbilityRow) -> Result<Self, Self::Error> {
        Ok(DragonAbility {
            id: row.id,
            species_id: row.species_id,
            name: row.name,
            description: row.description,
            ability_type: row.ability_type.parse()?,
            power_level: row.power_level,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct IndividualRow {
    id: Uuid,
    name: String,
    species_id: Uuid,
    description: Option<String>,
    status: String,
    gender: Option<String>,
    age_category: Option<String>,
    rider_name: Option<String>,
    location: Option<String>,
    first_appearance: Option<String>,
    special_traits: Vec<String>,
    image_url: Option<String>,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IndividualRow> for DragonIndividual {
    type Error = DomainError;

    fn try_from(row: IndividualRow) -> Result<Self, Self::Error> {
        Ok(DragonIndividual {
            id: row.id,
            name: row.name,
            species_id: row.species_id,
            description: row.description,
            status: row.status.parse()?,
            gender: parse_optional(row.gender)?,
            age_category: parse_optional(row.age_category)?,
            rider_name: row.rider_name,
            location: row.location,
            first_appearance: row.first_appearance,
            special_traits: row.special_traits,
            image_url: row.image_url,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RelationshipRow {
    id: Uuid,
    dragon1_id: Uuid,
    dragon2_id: Uuid,
    relationship_type: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RelationshipRow> for DragonRelationship {
    type Error = DomainError;

    fn try_from(row: RelationshipRow) -> Result<Self, Self::Error> {
        Ok(DragonRelationship {
            id: row.id,
            dragon1_id: row.dragon1_id,
            dragon2_id: row.dragon2_id,
            relationship_type: row.relationship_type.parse()?,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    id: Uuid,
    name: String,
    description: String,
    location_type: String,
    climate: Option<String>,
    dangers: Vec<String>,
    notable_species: Vec<String>,
    coordinates: Option<String>,
    image_url: Option<String>,
    is_hidden: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LocationRow> for DragonLocation {
    type Error = DomainError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(DragonLocation {
            id: row.id,
            name: row.name,
            description: row.description,
            location_type: row.location_type.parse()?,
            climate: row.climate,
            dangers: row.dangers,
            notable_species: row.notable_species,
            coordinates: row.coordinates,
            image_url: row.image_url,
            is_hidden: row.is_hidden,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// `strpos` keeps user input out of LIKE pattern syntax.
fn push_search(qb: &mut QueryBuilder<'_, Postgres>, search: &str) {
    qb.push(" AND (strpos(LOWER(name), LOWER(");
    qb.push_bind(search.to_string());
    qb.push(")) > 0 OR strpos(LOWER(COALESCE(description, '')), LOWER(");
    qb.push_bind(search.to_string());
    qb.push(")) > 0)");
}

impl SqlxDragonRepository {
    /// Attach class, abilities and stats to a batch of species rows, keeping row order.
    async fn assemble_species(&self, rows: Vec<SpeciesRow>) -> Result<Vec<SpeciesDetail>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let species: Vec<DragonSpecies> = convert_all(rows)?;
        let species_ids: Vec<Uuid> = species.iter().map(|s| s.id).collect();
        let class_ids: Vec<Uuid> = species
            .iter()
            .map(|s| s.class_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let classes: HashMap<Uuid, DragonClass> = sqlx::query_as::<_, DragonClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM dragon_classes WHERE id = ANY($1)"
        ))
        .bind(&class_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?
        .into_iter()
        .map(|class| (class.id, class))
        .collect();

        let ability_rows = sqlx::query_as::<_, AbilityRow>(
            "SELECT id, species_id, name, description, ability_type, power_level, created_at \
             FROM dragon_abilities WHERE species_id = ANY($1) \
             ORDER BY power_level DESC NULLS LAST, name",
        )
        .bind(&species_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        let mut abilities: HashMap<Uuid, Vec<DragonAbility>> = HashMap::new();
        for ability in convert_all::<_, DragonAbility>(ability_rows)? {
            abilities.entry(ability.species_id).or_default().push(ability);
        }

        let mut stats: HashMap<Uuid, DragonStats> = sqlx::query_as::<_, DragonStats>(
            "SELECT id, species_id, firepower, speed, armor, stealth, venom, jaw_strength, \
                    wing_span_meters, length_meters, weight_kg, created_at, updated_at \
             FROM dragon_stats WHERE species_id = ANY($1)",
        )
        .bind(&species_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?
        .into_iter()
        .map(|s| (s.species_id, s))
        .collect();

        species
            .into_iter()
            .map(|species| -> Result<SpeciesDetail, DomainError> {
                let dragon_class = classes.get(&species.class_id).cloned().ok_or_else(|| {
                    DomainError::InfrastructureError(format!(
                        "Species {} references missing class {}",
                        species.id, species.class_id
                    ))
                })?;
                Ok(SpeciesDetail {
                    abilities: abilities.remove(&species.id).unwrap_or_default(),
                    stats: stats.remove(&species.id),
                    dragon_class,
                    species,
                    is_favorited: false,
                })
            })
            .collect()
    }

    async fn species_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, SpeciesDetail>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, SpeciesRow>(&format!(
            "SELECT {SPECIES_COLUMNS} FROM dragon_species WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(self
            .assemble_species(rows)
            .await?
            .into_iter()
            .map(|detail| (detail.species.id, detail))
            .collect())
    }

    async fn assemble_individuals(
        &self,
        rows: Vec<IndividualRow>,
    ) -> Result<Vec<IndividualDetail>, DomainError> {
        let individuals: Vec<DragonIndividual> = convert_all(rows)?;
        let species_ids: Vec<Uuid> = individuals
            .iter()
            .map(|i| i.species_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let species = self.species_by_ids(&species_ids).await?;

        individuals
            .into_iter()
            .map(|individual| -> Result<IndividualDetail, DomainError> {
                let species = species.get(&individual.species_id).cloned().ok_or_else(|| {
                    DomainError::InfrastructureError(format!(
                        "Dragon {} references missing species {}",
                        individual.id, individual.species_id
                    ))
                })?;
                Ok(IndividualDetail {
                    individual,
                    species,
                    relationships: Vec::new(),
                    is_favorited: false,
                })
            })
            .collect()
    }

    async fn individuals_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, IndividualDetail>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, IndividualRow>(&format!(
            "SELECT {INDIVIDUAL_COLUMNS} FROM dragon_individuals WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(self
            .assemble_individuals(rows)
            .await?
            .into_iter()
            .map(|detail| (detail.individual.id, detail))
            .collect())
    }

    async fn record_exists(&self, target: FavoriteTarget) -> Result<bool, DomainError> {
        let (table, id) = match target {
            FavoriteTarget::Species(id) => ("dragon_species", id),
            FavoriteTarget::Individual(id) => ("dragon_individuals", id),
        };
        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }
}

#[async_trait]
impl DragonRepository for SqlxDragonRepository {
    async fn list_classes(&self) -> Result<Vec<DragonClass>, DomainError> {
        sqlx::query_as::<_, DragonClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM dragon_classes ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn list_species(&self, filter: SpeciesFilter) -> Result<Vec<SpeciesDetail>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SPECIES_COLUMNS} FROM dragon_species WHERE TRUE"
        ));
        if let Some(class_id) = filter.class_id {
            qb.push(" AND class_id = ");
            qb.push_bind(class_id);
        }
        if let Some(rarity) = filter.rarity {
            qb.push(" AND rarity = ");
            qb.push_bind(rarity.as_str());
        }
        if let Some(search) = &filter.search {
            push_search(&mut qb, search);
        }
        qb.push(" ORDER BY name");

        let rows = qb
            .build_query_as::<SpeciesRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        self.assemble_species(rows).await
    }

    async fn find_species(&self, id: Uuid) -> Result<Option<SpeciesDetail>, DomainError> {
        Ok(self.species_by_ids(&[id]).await?.remove(&id))
    }

    async fn list_individuals(
        &self,
        filter: IndividualFilter,
    ) -> Result<Vec<IndividualDetail>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {INDIVIDUAL_COLUMNS} FROM dragon_individuals WHERE TRUE"
        ));
        if let Some(featured) = filter.featured {
            qb.push(" AND is_featured = ");
            qb.push_bind(featured);
        }
        if let Some(species_id) = filter.species_id {
            qb.push(" AND species_id = ");
            qb.push_bind(species_id);
        }
        if let Some(search) = &filter.search {
            push_search(&mut qb, search);
        }
        qb.push(" ORDER BY name");

        let rows = qb
            .build_query_as::<IndividualRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        self.assemble_individuals(rows).await
    }

    async fn find_individual(&self, id: Uuid) -> Result<Option<IndividualDetail>, DomainError> {
        Ok(self.individuals_by_ids(&[id]).await?.remove(&id))
    }

    async fn relationships_of(&self, id: Uuid) -> Result<Vec<RelationshipDetail>, DomainError> {
        let rows = sqlx::query_as::<_, RelationshipRow>(
            "SELECT id, dragon1_id, dragon2_id, relationship_type, description, created_at \
             FROM dragon_relationships WHERE dragon1_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        let relationships: Vec<DragonRelationship> = convert_all(rows)?;
        if relationships.is_empty() {
            return Ok(Vec::new());
        }

        let related_ids: Vec<Uuid> = relationships.iter().map(|r| r.dragon2_id).collect();
        let related: HashMap<Uuid, DragonIndividual> =
            convert_all::<_, DragonIndividual>(
                sqlx::query_as::<_, IndividualRow>(&format!(
                    "SELECT {INDIVIDUAL_COLUMNS} FROM dragon_individuals WHERE id = ANY($1)"
                ))
                .bind(&related_ids)
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?,
            )?
            .into_iter()
            .map(|individual| (individual.id, individual))
            .collect();

        Ok(relationships
            .into_iter()
            .filter_map(|relationship| {
                related
                    .get(&relationship.dragon2_id)
                    .cloned()
                    .map(|related_dragon| RelationshipDetail {
                        relationship,
                        related_dragon,
                    })
            })
            .collect())
    }

    async fn list_locations(
        &self,
        include_hidden: bool,
    ) -> Result<Vec<DragonLocation>, DomainError> {
        let rows = sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM dragon_locations \
             WHERE $1 OR NOT is_hidden ORDER BY name"
        ))
        .bind(include_hidden)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        convert_all(rows)
    }

    async fn find_location(&self, id: Uuid) -> Result<Option<DragonLocation>, DomainError> {
        sqlx::query_as::<_, LocationRow>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM dragon_locations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(DragonLocation::try_from)
        .transpose()
    }

    async fn toggle_favorite(
        &self,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> Result<bool, DomainError> {
        if !self.record_exists(target).await? {
            return Err(DomainError::NotFound(match target {
                FavoriteTarget::Species(_) => "Dragon species not found".into(),
                FavoriteTarget::Individual(_) => "Dragon not found".into(),
            }));
        }
        let (column, id) = match target {
            FavoriteTarget::Species(id) => ("species_id", id),
            FavoriteTarget::Individual(id) => ("individual_id", id),
        };

        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        let removed = sqlx::query(&format!(
            "DELETE FROM user_favorites WHERE user_id = $1 AND {column} = $2"
        ))
        .bind(user_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?
        .rows_affected();

        if removed == 0 {
            sqlx::query(&format!(
                "INSERT INTO user_favorites (id, user_id, {column}) VALUES ($1, $2, $3) \
                 ON CONFLICT DO NOTHING"
            ))
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        }

        tx.commit().await.map_err(storage_error)?;
        Ok(removed == 0)
    }

    async fn favorite_ids(&self, user_id: Uuid) -> Result<HashSet<FavoriteTarget>, DomainError> {
        let rows = sqlx::query_as::<_, (Option<Uuid>, Option<Uuid>)>(
            "SELECT species_id, individual_id FROM user_favorites WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                (Some(id), _) => Some(FavoriteTarget::Species(id)),
                (None, Some(id)) => Some(FavoriteTarget::Individual(id)),
                (None, None) => None,
            })
            .collect())
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Favorites, DomainError> {
        let rows = sqlx::query_as::<_, (Option<Uuid>, Option<Uuid>)>(
            "SELECT species_id, individual_id FROM user_favorites \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        let species_ids: Vec<Uuid> = rows.iter().filter_map(|(s, _)| *s).collect();
        let individual_ids: Vec<Uuid> = rows.iter().filter_map(|(_, i)| *i).collect();

        let mut species = self.species_by_ids(&species_ids).await?;
        let mut individuals = self.individuals_by_ids(&individual_ids).await?;

        Ok(Favorites {
            species: species_ids
                .iter()
                .filter_map(|id| species.remove(id))
                .collect(),
            individuals: individual_ids
                .iter()
                .filter_map(|id| individuals.remove(id))
                .collect(),
        })
    }
}
