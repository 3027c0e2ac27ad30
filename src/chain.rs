use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::block::Block;

pub const GENESIS_DATA: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Append-only, hash-linked log of blocks rooted at a fixed genesis block.
///
/// `append` is the only mutating operation; callers sharing a chain across
/// tasks must serialize it (see `api::AppState`).
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Self {
        Chain {
            blocks: vec![Self::create_genesis()],
        }
    }

    /// Genesis is pinned to the Unix epoch so every process starts from the
    /// same block and the same hash.
    pub fn create_genesis() -> Block {
        Block::new(
            0,
            DateTime::<Utc>::default(),
            Value::String(GENESIS_DATA.to_string()),
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    pub fn latest(&self) -> &Block {
        // never empty: genesis is pushed in new()
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn append(&mut self, data: Value) -> &Block {
        let block = Block::new(
            self.blocks.len() as u64,
            Utc::now(),
            data,
            self.latest().hash().to_string(),
        );
        self.blocks.push(block);
        self.latest()
    }

    pub fn validate(&self) -> bool {
        self.first_invalid().is_none()
    }

    /// Index of the first block breaking link or content integrity.
    pub fn first_invalid(&self) -> Option<u64> {
        self.blocks
            .windows(2)
            .find(|pair| {
                let (previous, current) = (&pair[0], &pair[1]);
                current.hash() != current.recompute() || current.previous_hash() != previous.hash()
            })
            .map(|pair| pair[1].index())
    }

    pub fn find_by_hash(&self, hash: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.hash() == hash)
    }

    /// Non-genesis blocks whose payload satisfies `predicate`, in chain order.
    pub fn filter_by_predicate<F>(&self, predicate: F) -> Vec<&Block>
    where
        F: Fn(&Value) -> bool,
    {
        self.blocks
            .iter()
            .filter(|block| block.index() != 0 && predicate(block.data()))
            .collect()
    }

    pub fn has_voted_in_election(&self, election_id: &str, voter_id: &str) -> bool {
        self.blocks.iter().skip(1).any(|block| {
            field_eq(block.data(), "electionId", election_id) && field_eq(block.data(), "voterId", voter_id)
        })
    }

    pub fn votes_for_election(&self, election_id: &str) -> Vec<&Block> {
        self.filter_by_predicate(|data| field_eq(data, "electionId", election_id))
    }

    pub fn votes_by_voter(&self, voter_id: &str) -> Vec<&Block> {
        self.filter_by_predicate(|data| field_eq(data, "voterId", voter_id))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    #[cfg(test)]
    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

fn field_eq(data: &Value, key: &str, expected: &str) -> bool {
    data.get(key).and_then(Value::as_str) == Some(expected)
}
