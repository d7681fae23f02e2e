// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Call-history arrangement for display.
//!
//! The server returns one record per exchange, so the same participant
//! shows up many times. How that is presented is an explicit choice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::CallHistory;

/// How repeated participants are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryDisplay {
    /// Only the first record per participant.
    #[default]
    First,
    /// Every record, grouped under its participant.
    All,
}

impl HistoryDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryDisplay::First => "first",
            HistoryDisplay::All => "all",
        }
    }
}

impl fmt::Display for HistoryDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HistoryDisplay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "first" => Ok(HistoryDisplay::First),
            "all" => Ok(HistoryDisplay::All),
            _ => Err(Error::InvalidHistoryDisplay(s.to_string())),
        }
    }
}

/// Records of one participant, in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryGroup {
    pub participant_id: String,
    pub participant_name: String,
    pub calls: Vec<CallHistory>,
}

/// Groups records by participant, in order of first appearance.
pub fn arrange(records: &[CallHistory], display: HistoryDisplay) -> Vec<HistoryGroup> {
    let mut groups: Vec<HistoryGroup> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|g| g.participant_id == record.participant_id)
        {
            Some(group) => {
                if display == HistoryDisplay::All {
                    group.calls.push(record.clone());
                }
            }
            None => groups.push(HistoryGroup {
                participant_id: record.participant_id.clone(),
                participant_name: record.participant_name.clone(),
                calls: vec![record.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
