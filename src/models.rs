use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload appended to the chain for every accepted vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    pub election_id: String,
    pub voter_id: String,
    pub candidate: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub candidates: Vec<String>,
    pub created_by: String,
    pub is_active: bool,
    pub is_completed: bool,
    pub vote_count: BTreeMap<String, u64>,
    pub voter_list: Vec<String>,
}

impl Election {
    pub fn new(
        id: Uuid,
        title: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        candidates: Vec<String>,
        created_by: String,
    ) -> Self {
        let vote_count = candidates.iter().map(|c| (c.clone(), 0)).collect();
        Election {
            id,
            title,
            description,
            start_date,
            end_date,
            candidates,
            created_by,
            is_active: false,
            is_completed: false,
            vote_count,
            voter_list: Vec::new(),
        }
    }

    pub fn activate(&mut self) {
        self.activate_at(Utc::now());
    }

    /// Opens the election only when `now` falls inside its window; otherwise a no-op.
    pub fn activate_at(&mut self, now: DateTime<Utc>) {
        if self.start_date <= now && now <= self.end_date {
            self.is_active = true;
            self.is_completed = false;
        }
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.is_completed = true;
    }

    pub fn add_vote(&mut self, candidate: &str) -> bool {
        match self.vote_count.get_mut(candidate) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn record_voter(&mut self, voter_id: &str) {
        self.voter_list.push(voter_id.to_string());
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.voter_list.iter().any(|v| v == voter_id)
    }

    pub fn results(&self) -> &BTreeMap<String, u64> {
        &self.vote_count
    }

    pub fn total_votes(&self) -> u64 {
        self.vote_count.values().sum()
    }
}

/// Body of `POST /api/elections`. Every field is optional on the wire so a
/// missing one is reported by the service rather than the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewElection {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub candidates: Option<Vec<String>>,
    pub created_by: Option<String>,
}

/// Body of `POST /api/votes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVote {
    /// Kept as text; an id that does not parse is simply an unknown election.
    pub election_id: String,
    pub voter_id: String,
    pub candidate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub id: Uuid,
    pub election_id: Uuid,
    pub voter_id: String,
    pub candidate: String,
    pub timestamp: DateTime<Utc>,
    pub blockchain_hash: String,
}

impl VoteRecord {
    pub fn verify_integrity(&self, expected_hash: &str) -> bool {
        self.blockchain_hash == expected_hash
    }
}
