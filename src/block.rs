use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// One entry of the vote log. Fields are fixed at construction; `hash` covers
/// all of them, so any later change to the stored values shows up as a
/// mismatch against [`Block::recompute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    index: u64,
    timestamp: DateTime<Utc>,
    data: Value,
    previous_hash: String,
    hash: String,
}

impl Block {
    pub fn new(index: u64, timestamp: DateTime<Utc>, data: Value, previous_hash: String) -> Self {
        let hash = calculate_hash(index, &timestamp, &data, &previous_hash);
        Block {
            index,
            timestamp,
            data,
            previous_hash,
            hash,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Digest of the block's current field values. Does not touch the stored hash.
    pub fn recompute(&self) -> String {
        calculate_hash(self.index, &self.timestamp, &self.data, &self.previous_hash)
    }

    #[cfg(test)]
    pub(crate) fn data_mut(&mut self) -> &mut Value {
        &mut self.data
    }

    #[cfg(test)]
    pub(crate) fn set_previous_hash(&mut self, previous_hash: &str) {
        self.previous_hash = previous_hash.to_string();
    }
}

// Each field goes in as a big-endian u64 length followed by its bytes, so no
// two distinct field tuples share an encoding. `Value`'s Display is compact
// JSON with sorted object keys, so equal payloads always hash the same.
fn calculate_hash(index: u64, timestamp: &DateTime<Utc>, data: &Value, previous_hash: &str) -> String {
    let mut hasher = Sha256::new();
    for field in [
        index.to_string(),
        previous_hash.to_string(),
        timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        data.to_string(),
    ] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
