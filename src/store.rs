//! Repositories for elections and vote records.
//!
//! The service owns one of each and is the only writer; the in-memory
//! versions below keep plain collections and no shared state.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Election, VoteRecord};

pub trait ElectionRepository: Send {
    fn insert(&mut self, election: Election);

    fn get(&self, id: &Uuid) -> Option<&Election>;

    fn get_mut(&mut self, id: &Uuid) -> Option<&mut Election>;

    /// All elections in insertion order.
    fn list(&self) -> Vec<&Election>;

    fn clear(&mut self);
}

pub trait VoteRepository: Send {
    fn insert(&mut self, vote: VoteRecord);

    fn get(&self, id: &Uuid) -> Option<&VoteRecord>;

    fn list(&self) -> Vec<&VoteRecord>;
}

#[derive(Debug, Default)]
pub struct MemoryElectionStore {
    order: Vec<Uuid>,
    elections: HashMap<Uuid, Election>,
}

impl MemoryElectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElectionRepository for MemoryElectionStore {
    fn insert(&mut self, election: Election) {
        let id = election.id;
        if self.elections.insert(id, election).is_none() {
            self.order.push(id);
        }
    }

    fn get(&self, id: &Uuid) -> Option<&Election> {
        self.elections.get(id)
    }

    fn get_mut(&mut self, id: &Uuid) -> Option<&mut Election> {
        self.elections.get_mut(id)
    }

    fn list(&self) -> Vec<&Election> {
        self.order.iter().filter_map(|id| self.elections.get(id)).collect()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.elections.clear();
    }
}

#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    votes: Vec<VoteRecord>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteRepository for MemoryVoteStore {
    fn insert(&mut self, vote: VoteRecord) {
        self.votes.push(vote);
    }

    fn get(&self, id: &Uuid) -> Option<&VoteRecord> {
        self.votes.iter().find(|v| &v.id == id)
    }

    fn list(&self) -> Vec<&VoteRecord> {
        self.votes.iter().collect()
    }
}
