//! Logbook export of the current pairing
//!
//! The pairing is sent to the logbook as a single JSON object:
//!
//! ```json
//! {"task":"Memory","solution":[["A","B"],["C","D"]]}
//! ```
//!
//! Only decoded values are exported; photo references never leave the app.

use serde::{Deserialize, Serialize};

use super::data::Pair;

/// Task name the logbook files Memory solutions under
pub const DEFAULT_TASK: &str = "Memory";

/// One logbook submission
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogbookEntry {
    /// Task identifier
    pub task: String,
    /// Decoded values of each pair, in pairing order
    pub solution: Vec<[String; 2]>,
}

impl LogbookEntry {
    /// Build the entry for a sequence of pairs
    pub fn from_pairs(task: &str, pairs: &[Pair]) -> Self {
        Self {
            task: task.to_string(),
            solution: pairs
                .iter()
                .map(|pair| {
                    let (first, second) = pair.values();
                    [first.to_string(), second.to_string()]
                })
                .collect(),
        }
    }

    /// Convert to the JSON text handed to the logbook
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse JSON text back into an entry
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Encode the pairs as the default logbook payload.
///
/// Deterministic: the same pairs in the same order give the same text.
pub fn encode(task: &str, pairs: &[Pair]) -> Result<String, serde_json::Error> {
    LogbookEntry::from_pairs(task, pairs).to_json()
}
