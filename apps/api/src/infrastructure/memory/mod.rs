//! In-process store backend.
//!
//! All state sits behind one `tokio::sync::Mutex`, so every repository call is a
//! single serialized unit: a vote's lookup, write, recount and write-back cannot
//! interleave with another vote. Used by `STORAGE_BACKEND=memory` and the
//! integration tests.

mod comments;
mod dragons;
mod posts;
mod profiles;
pub mod seed;
mod votes;

use crate::domain::{
    comment::entity::Comment,
    dragon::entity::{
        DragonAbility, DragonClass, DragonIndividual, DragonLocation, DragonRelationship,
        DragonSpecies, DragonStats, FavoriteTarget,
    },
    post::entity::Post,
    profile::entity::Profile,
    vote::entity::Vote,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct AccountRecord {
    email: String,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct FavoriteRecord {
    user_id: Uuid,
    target: FavoriteTarget,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<Uuid, AccountRecord>,
    profiles: HashMap<Uuid, Profile>,
    follows: HashSet<(Uuid, Uuid)>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    votes: HashMap<Uuid, Vote>,
    classes: HashMap<Uuid, DragonClass>,
    species: HashMap<Uuid, DragonSpecies>,
    abilities: Vec<DragonAbility>,
    stats: HashMap<Uuid, DragonStats>,
    individuals: HashMap<Uuid, DragonIndividual>,
    relationships: Vec<DragonRelationship>,
    locations: HashMap<Uuid, DragonLocation>,
    favorites: Vec<FavoriteRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_class(&self, class: DragonClass) {
        self.state.lock().await.classes.insert(class.id, class);
    }

    pub async fn insert_species(
        &self,
        species: DragonSpecies,
        abilities: Vec<DragonAbility>,
        stats: Option<DragonStats>,
    ) {
        let mut state = self.state.lock().await;
        state.abilities.retain(|a| a.species_id != species.id);
        state.abilities.extend(abilities);
        match stats {
            Some(stats) => {
                state.stats.insert(species.id, stats);
            }
            None => {
                state.stats.remove(&species.id);
            }
        }
        state.species.insert(species.id, species);
    }

    pub async fn insert_individual(&self, individual: DragonIndividual) {
        self.state
            .lock()
            .await
            .individuals
            .insert(individual.id, individual);
    }

    pub async fn insert_relationship(&self, relationship: DragonRelationship) {
        self.state.lock().await.relationships.push(relationship);
    }

    pub async fn insert_location(&self, location: DragonLocation) {
        self.state.lock().await.locations.insert(location.id, location);
    }
}
