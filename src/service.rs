use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::chain::Chain;
use crate::errors::VotingError;
use crate::models::{CastVote, Election, NewElection, VotePayload, VoteRecord};
use crate::store::{ElectionRepository, MemoryElectionStore, MemoryVoteStore, VoteRepository};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    pub election_id: Uuid,
    pub results: BTreeMap<String, u64>,
    pub total_votes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteVerification {
    pub vote_id: Uuid,
    pub blockchain_hash: String,
    pub is_verified: bool,
    pub block_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerification {
    pub election_id: Uuid,
    pub blockchain_votes: usize,
    pub is_chain_valid: bool,
    /// Vote receipts stored for the election.
    pub recorded_votes: usize,
    /// Receipts whose hash is not on the chain, or whose block no longer hashes to it.
    pub unanchored_votes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub index: u64,
    pub election_id: String,
    pub voter_id: String,
    pub candidate: String,
    pub hash: String,
}

/// Owns the vote chain and the repositories. Every write goes through here,
/// so holding `&mut VotingService` is what serializes appends.
pub struct VotingService {
    chain: Chain,
    elections: Box<dyn ElectionRepository>,
    votes: Box<dyn VoteRepository>,
}

impl VotingService {
    pub fn new(elections: Box<dyn ElectionRepository>, votes: Box<dyn VoteRepository>) -> Self {
        VotingService {
            chain: Chain::new(),
            elections,
            votes,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryElectionStore::new()),
            Box::new(MemoryVoteStore::new()),
        )
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn create_election(&mut self, new: NewElection) -> Result<Election, VotingError> {
        let NewElection {
            title,
            description,
            start_date,
            end_date,
            candidates,
            created_by,
        } = new;
        let (Some(title), Some(description), Some(start_date), Some(end_date), Some(candidates)) =
            (non_blank(title), non_blank(description), start_date, end_date, candidates)
        else {
            return Err(missing_fields());
        };
        let candidates = validate_candidates(candidates)?;
        if start_date > end_date {
            return Err(VotingError::Validation(
                "Start date must not be after end date".into(),
            ));
        }

        let election = Election::new(
            Uuid::new_v4(),
            title,
            description,
            start_date,
            end_date,
            candidates,
            non_blank(created_by).unwrap_or_else(|| "admin".to_string()),
        );
        info!("created election {} ({})", election.id, election.title);
        self.elections.insert(election.clone());
        Ok(election)
    }

    pub fn elections(&self) -> Vec<Election> {
        self.elections.list().into_iter().cloned().collect()
    }

    pub fn election(&self, id: &Uuid) -> Result<Election, VotingError> {
        self.elections
            .get(id)
            .cloned()
            .ok_or(VotingError::NotFound("Election"))
    }

    pub fn activate_election(&mut self, id: &Uuid) -> Result<Election, VotingError> {
        let election = self.election_mut(id)?;
        election.activate();
        if election.is_active {
            info!("election {} activated", id);
        } else {
            debug!("election {} outside its voting window, left inactive", id);
        }
        Ok(election.clone())
    }

    pub fn deactivate_election(&mut self, id: &Uuid) -> Result<Election, VotingError> {
        let election = self.election_mut(id)?;
        election.deactivate();
        info!("election {} closed", id);
        Ok(election.clone())
    }

    pub fn cast_vote(&mut self, vote: CastVote) -> Result<VoteRecord, VotingError> {
        if vote.voter_id.trim().is_empty() {
            return Err(VotingError::Validation("Voter id is required".into()));
        }
        let election_id =
            Uuid::parse_str(vote.election_id.trim()).map_err(|_| VotingError::NotFound("Election"))?;
        let election_key = election_id.to_string();
        let election = self
            .elections
            .get(&election_id)
            .ok_or(VotingError::NotFound("Election"))?;

        if !election.is_active {
            debug!("vote rejected: election {} not active", election_id);
            return Err(VotingError::ElectionInactive);
        }
        if election.has_voted(&vote.voter_id)
            || self.chain.has_voted_in_election(&election_key, &vote.voter_id)
        {
            debug!("vote rejected: {} already voted in {}", vote.voter_id, election_id);
            return Err(VotingError::AlreadyVoted);
        }
        if !election.candidates.contains(&vote.candidate) {
            debug!("vote rejected: unknown candidate {:?}", vote.candidate);
            return Err(VotingError::InvalidCandidate);
        }

        let timestamp = Utc::now();
        let payload = serde_json::to_value(VotePayload {
            election_id: election_key,
            voter_id: vote.voter_id.clone(),
            candidate: vote.candidate.clone(),
            timestamp,
        })?;

        let election = self.election_mut(&election_id)?;
        election.add_vote(&vote.candidate);
        election.record_voter(&vote.voter_id);

        let block = self.chain.append(payload);
        info!("vote recorded in block {} ({})", block.index(), block.hash());

        let record = VoteRecord {
            id: Uuid::new_v4(),
            election_id,
            voter_id: vote.voter_id,
            candidate: vote.candidate,
            timestamp,
            blockchain_hash: block.hash().to_string(),
        };
        self.votes.insert(record.clone());
        Ok(record)
    }

    pub fn results(&self, election_id: &Uuid) -> Result<ElectionResults, VotingError> {
        let election = self
            .elections
            .get(election_id)
            .ok_or(VotingError::NotFound("Election"))?;
        Ok(ElectionResults {
            election_id: election.id,
            results: election.results().clone(),
            total_votes: election.total_votes(),
        })
    }

    pub fn verify_vote(&self, vote_id: &Uuid) -> Result<VoteVerification, VotingError> {
        let vote = self.votes.get(vote_id).ok_or(VotingError::NotFound("Vote"))?;
        // a block whose contents no longer hash to the receipt does not verify
        let block = self
            .chain
            .find_by_hash(&vote.blockchain_hash)
            .filter(|block| vote.verify_integrity(&block.recompute()));
        Ok(VoteVerification {
            vote_id: vote.id,
            blockchain_hash: vote.blockchain_hash.clone(),
            is_verified: block.is_some(),
            block_data: block.map(|b| b.data().clone()),
        })
    }

    pub fn chain_verification(&self, election_id: &Uuid) -> Result<ChainVerification, VotingError> {
        let election = self
            .elections
            .get(election_id)
            .ok_or(VotingError::NotFound("Election"))?;
        let is_chain_valid = match self.chain.first_invalid() {
            Some(index) => {
                warn!("vote chain integrity check failed at block {}", index);
                false
            }
            None => true,
        };
        let receipts: Vec<&VoteRecord> = self
            .votes
            .list()
            .into_iter()
            .filter(|vote| vote.election_id == election.id)
            .collect();
        let unanchored_votes = receipts
            .iter()
            .filter(|vote| {
                self.chain
                    .find_by_hash(&vote.blockchain_hash)
                    .map_or(true, |block| !vote.verify_integrity(&block.recompute()))
            })
            .count();
        if unanchored_votes > 0 {
            warn!("{} vote receipts of election {} do not match the chain", unanchored_votes, election.id);
        }
        Ok(ChainVerification {
            election_id: election.id,
            blockchain_votes: self.chain.votes_for_election(&election.id.to_string()).len(),
            is_chain_valid,
            recorded_votes: receipts.len(),
            unanchored_votes,
        })
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.chain
            .filter_by_predicate(|_| true)
            .into_iter()
            .filter_map(|block| {
                let payload: VotePayload = serde_json::from_value(block.data().clone()).ok()?;
                Some(HistoryEntry {
                    index: block.index(),
                    election_id: payload.election_id,
                    voter_id: payload.voter_id,
                    candidate: payload.candidate,
                    hash: block.hash().to_string(),
                })
            })
            .collect()
    }

    pub fn clear_elections(&mut self) {
        self.elections.clear();
    }

    fn election_mut(&mut self, id: &Uuid) -> Result<&mut Election, VotingError> {
        self.elections
            .get_mut(id)
            .ok_or(VotingError::NotFound("Election"))
    }
}

impl Default for VotingService {
    fn default() -> Self {
        Self::in_memory()
    }
}

const MISSING_FIELDS: &str =
    "Title, description, start date, end date, and at least 2 candidates are required";

fn missing_fields() -> VotingError {
    VotingError::Validation(MISSING_FIELDS.into())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_candidates(candidates: Vec<String>) -> Result<Vec<String>, VotingError> {
    if candidates.len() < 2 {
        return Err(missing_fields());
    }
    let candidates: Vec<String> = candidates.iter().map(|c| c.trim().to_string()).collect();
    if candidates.iter().any(|c| c.is_empty()) {
        return Err(VotingError::Validation("Candidate names must not be empty".into()));
    }
    let mut seen = HashSet::new();
    if !candidates.iter().all(|c| seen.insert(c.as_str())) {
        return Err(VotingError::Validation("Candidate names must be unique".into()));
    }
    Ok(candidates)
}
