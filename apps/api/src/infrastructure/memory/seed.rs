//! Starter encyclopedia for the memory backend. Ids match the SQL seed migration.

use super::MemoryStore;
use crate::domain::dragon::entity::{
    AbilityType, AgeCategory, DragonAbility, DragonClass, DragonIndividual, DragonLocation,
    DragonRelationship, DragonSpecies, DragonStats, DragonStatus, Gender, IntelligenceLevel,
    LocationType, Rarity, RelationshipType, SizeCategory,
};
use chrono::Utc;
use uuid::Uuid;

pub const STRIKE_CLASS_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8000_000000000001);
pub const BOULDER_CLASS_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8000_000000000002);
pub const NIGHT_FURY_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8001_000000000001);
pub const GRONCKLE_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8001_000000000002);
pub const TOOTHLESS_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8004_000000000001);
pub const MEATLUG_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8004_000000000002);
pub const BERK_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8006_000000000001);
pub const HIDDEN_WORLD_ID: Uuid = Uuid::from_u128(0x0190f000_0000_7000_8006_000000000002);

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl MemoryStore {
    pub async fn seed_encyclopedia(&self) {
        let now = Utc::now();

        for (id, name, description, traits, color) in [
            (
                STRIKE_CLASS_ID,
                "Strike",
                "Lightning-fast dragons with unmatched reflexes.",
                &["speed", "precision", "intelligence"][..],
                "#1e3a8a",
            ),
            (
                BOULDER_CLASS_ID,
                "Boulder",
                "Heavily armoured dragons that eat rock.",
                &["armor", "endurance"][..],
                "#78716c",
            ),
        ] {
            self.insert_class(DragonClass {
                id,
                name: name.into(),
                description: description.into(),
                characteristics: strings(traits),
                color_code: Some(color.into()),
                created_at: now,
                updated_at: now,
            })
            .await;
        }

        self.insert_species(
            DragonSpecies {
                id: NIGHT_FURY_ID,
                name: "Night Fury".into(),
                class_id: STRIKE_CLASS_ID,
                description: "The unholy offspring of lightning and death itself.".into(),
                lore: Some("Never engage. Hide and pray it does not find you.".into()),
                rarity: Rarity::Legendary,
                size_category: SizeCategory::Medium,
                habitat: strings(&["cliffs", "coves"]),
                diet: "Fish".into(),
                temperament: "Reclusive but loyal".into(),
                intelligence_level: IntelligenceLevel::Exceptional,
                image_url: None,
                created_at: now,
                updated_at: now,
            },
            vec![DragonAbility {
                id: Uuid::from_u128(0x0190f000_0000_7000_8002_000000000001),
                species_id: NIGHT_FURY_ID,
                name: "Plasma Blast".into(),
                description: "Concussive bolts of purple plasma.".into(),
                ability_type: AbilityType::BreathWeapon,
                power_level: Some(10),
                created_at: now,
            }],
            Some(DragonStats {
                id: Uuid::from_u128(0x0190f000_0000_7000_8003_000000000001),
                species_id: NIGHT_FURY_ID,
                firepower: Some(15),
                speed: Some(20),
                armor: Some(18),
                stealth: Some(20),
                venom: Some(0),
                jaw_strength: Some(8),
                wing_span_meters: Some(14.0),
                length_meters: Some(8.0),
                weight_kg: Some(800.0),
                created_at: now,
                updated_at: now,
            }),
        )
        .await;

        self.insert_species(
            DragonSpecies {
                id: GRONCKLE_ID,
                name: "Gronckle".into(),
                class_id: BOULDER_CLASS_ID,
                description: "A slow, stubborn dragon that spits molten lava rocks.".into(),
                lore: None,
                rarity: Rarity::Common,
                size_category: SizeCategory::Small,
                habitat: strings(&["quarries", "caves"]),
                diet: "Rocks".into(),
                temperament: "Docile".into(),
                intelligence_level: IntelligenceLevel::Low,
                image_url: None,
                created_at: now,
                updated_at: now,
            },
            vec![DragonAbility {
                id: Uuid::from_u128(0x0190f000_0000_7000_8002_000000000003),
                species_id: GRONCKLE_ID,
                name: "Lava Blast".into(),
                description: "Spits rocks melted in its gut.".into(),
                ability_type: AbilityType::BreathWeapon,
                power_level: Some(6),
                created_at: now,
            }],
            None,
        )
        .await;

        self.insert_individual(DragonIndividual {
            id: TOOTHLESS_ID,
            name: "Toothless".into(),
            species_id: NIGHT_FURY_ID,
            description: Some("The last known Night Fury and alpha of all dragons.".into()),
            status: DragonStatus::Alive,
            gender: Some(Gender::Male),
            age_category: Some(AgeCategory::Adult),
            rider_name: Some("Hiccup".into()),
            location: Some("New Berk".into()),
            first_appearance: Some("First flight over the cove".into()),
            special_traits: strings(&["prosthetic tail fin", "retractable teeth"]),
            image_url: None,
            is_featured: true,
            created_at: now,
            updated_at: now,
        })
        .await;

        self.insert_individual(DragonIndividual {
            id: MEATLUG_ID,
            name: "Meatlug".into(),
            species_id: GRONCKLE_ID,
            description: Some("A gentle Gronckle devoted to her rider.".into()),
            status: DragonStatus::Alive,
            gender: Some(Gender::Female),
            age_category: Some(AgeCategory::Adult),
            rider_name: Some("Fishlegs".into()),
            location: Some("Berk".into()),
            first_appearance: Some("Dragon training arena".into()),
            special_traits: strings(&["iron-laced gronckle iron"]),
            image_url: None,
            is_featured: false,
            created_at: now,
            updated_at: now,
        })
        .await;

        self.insert_relationship(DragonRelationship {
            id: Uuid::from_u128(0x0190f000_0000_7000_8005_000000000001),
            dragon1_id: TOOTHLESS_ID,
            dragon2_id: MEATLUG_ID,
            relationship_type: RelationshipType::PackMember,
            description: Some("Flew together in the Berk academy.".into()),
            created_at: now,
        })
        .await;

        for (id, name, description, location_type, hidden) in [
            (
                BERK_ID,
                "Berk",
                "A rugged Viking island twelve days north of Hopeless.",
                LocationType::Island,
                false,
            ),
            (
                HIDDEN_WORLD_ID,
                "Hidden World",
                "The ancestral home of dragons beneath the edge of the world.",
                LocationType::Underground,
                true,
            ),
        ] {
            self.insert_location(DragonLocation {
                id,
                name: name.into(),
                description: description.into(),
                location_type,
                climate: None,
                dangers: Vec::new(),
                notable_species: strings(&["Night Fury"]),
                coordinates: None,
                image_url: None,
                is_hidden: hidden,
                created_at: now,
                updated_at: now,
            })
            .await;
        }
    }
}
