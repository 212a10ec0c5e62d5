//! Dragon encyclopedia reference data.
//!
//! Read-mostly records maintained through migrations; users can only bookmark them.

use crate::domain::shared::closed_set::closed_set;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

closed_set! {
    #[ts(export)]
    pub enum Rarity {
        Common => "common",
        Uncommon => "uncommon",
        Rare => "rare",
        Legendary => "legendary",
        Mythical => "mythical",
    }
}

closed_set! {
    #[ts(export)]
    pub enum SizeCategory {
        Tiny => "tiny",
        Small => "small",
        Medium => "medium",
        Large => "large",
        Huge => "huge",
        Colossal => "colossal",
    }
}

closed_set! {
    #[ts(export)]
    pub enum IntelligenceLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
        Exceptional => "exceptional",
    }
}

closed_set! {
    #[ts(export)]
    pub enum AbilityType {
        BreathWeapon => "breath_weapon",
        Physical => "physical",
        Magical => "magical",
        Special => "special",
    }
}

closed_set! {
    #[ts(export)]
    pub enum DragonStatus {
        Alive => "alive",
        Deceased => "deceased",
        Missing => "missing",
        Unknown => "unknown",
    }
}

closed_set! {
    #[ts(export)]
    pub enum Gender {
        Male => "male",
        Female => "female",
        Unknown => "unknown",
    }
}

closed_set! {
    #[ts(export)]
    pub enum AgeCategory {
        Hatchling => "hatchling",
        Juvenile => "juvenile",
        Adult => "adult",
        Elder => "elder",
        Ancient => "ancient",
    }
}

closed_set! {
    #[ts(export)]
    pub enum RelationshipType {
        Mate => "mate",
        Offspring => "offspring",
        Sibling => "sibling",
        Rival => "rival",
        Ally => "ally",
        PackMember => "pack_member",
    }
}

closed_set! {
    #[ts(export)]
    pub enum LocationType {
        Island => "island",
        Cave => "cave",
        Mountain => "mountain",
        Forest => "forest",
        Ocean => "ocean",
        Sky => "sky",
        Underground => "underground",
        Mystical => "mystical",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct DragonClass {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub characteristics: Vec<String>,
    pub color_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DragonSpecies {
    pub id: Uuid,
    pub name: String,
    pub class_id: Uuid,
    pub description: String,
    pub lore: Option<String>,
    pub rarity: Rarity,
    pub size_category: SizeCategory,
    pub habitat: Vec<String>,
    pub diet: String,
    pub temperament: String,
    pub intelligence_level: IntelligenceLevel,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DragonAbility {
    pub id: Uuid,
    pub species_id: Uuid,
    pub name: String,
    pub description: String,
    pub ability_type: AbilityType,
    pub power_level: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct DragonStats {
    pub id: Uuid,
    pub species_id: Uuid,
    pub firepower: Option<i32>,
    pub speed: Option<i32>,
    pub armor: Option<i32>,
    pub stealth: Option<i32>,
    pub venom: Option<i32>,
    pub jaw_strength: Option<i32>,
    pub wing_span_meters: Option<f64>,
    pub length_meters: Option<f64>,
    pub weight_kg: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DragonIndividual {
    pub id: Uuid,
    pub name: String,
    pub species_id: Uuid,
    pub description: Option<String>,
    pub status: DragonStatus,
    pub gender: Option<Gender>,
    pub age_category: Option<AgeCategory>,
    pub rider_name: Option<String>,
    pub location: Option<String>,
    pub first_appearance: Option<String>,
    pub special_traits: Vec<String>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DragonRelationship {
    pub id: Uuid,
    pub dragon1_id: Uuid,
    pub dragon2_id: Uuid,
    pub relationship_type: RelationshipType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DragonLocation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location_type: LocationType,
    pub climate: Option<String>,
    pub dangers: Vec<String>,
    pub notable_species: Vec<String>,
    pub coordinates: Option<String>,
    pub image_url: Option<String>,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A species with its class, abilities and stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDetail {
    #[serde(flatten)]
    pub species: DragonSpecies,
    pub dragon_class: DragonClass,
    pub abilities: Vec<DragonAbility>,
    pub stats: Option<DragonStats>,
    pub is_favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDetail {
    #[serde(flatten)]
    pub relationship: DragonRelationship,
    pub related_dragon: DragonIndividual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualDetail {
    #[serde(flatten)]
    pub individual: DragonIndividual,
    pub species: SpeciesDetail,
    /// Outgoing relationships; only loaded for single-individual reads.
    pub relationships: Vec<RelationshipDetail>,
    pub is_favorited: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesFilter {
    pub class_id: Option<Uuid>,
    pub rarity: Option<Rarity>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IndividualFilter {
    pub featured: Option<bool>,
    pub species_id: Option<Uuid>,
    pub search: Option<String>,
}

/// What a favorite bookmarks: one species or one individual, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FavoriteTarget {
    Species(Uuid),
    Individual(Uuid),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Favorites {
    pub species: Vec<SpeciesDetail>,
    pub individuals: Vec<IndividualDetail>,
}

/// Case-insensitive substring match over name and description, as the search box
/// and the `search` filters use it.
pub fn matches_search(search: &str, name: &str, description: Option<&str>) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&needle)
        || description.is_some_and(|d| d.to_lowercase().contains(&needle))
}
