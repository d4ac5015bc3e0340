//! Small identifier newtypes shared across the engine.
use derive_more::{Display, From, Into};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Identifier for a [`crate::model::Match`], unique within its tournament.
///
/// Assigned by the generator in creation order starting at 1. The wire
/// format is a numeric string (`"1"`, `"2"`, ...) per the on-disk schema,
/// even though the value is stored and compared as an integer internally.
#[derive(Debug, Display, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, From, Into)]
pub struct MatchId(u32);

impl MatchId {
    pub fn new(n: u32) -> Self {
        MatchId(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Serialize for MatchId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u32::from_str(&s)
            .map(MatchId)
            .map_err(serde::de::Error::custom)
    }
}

/// Opaque short id for a tournament, e.g. `"a1b2c3d4"`.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(String);

impl TournamentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate a new random short id, an 8-character slice of a UUIDv4.
    pub fn generate() -> Self {
        let full = uuid::Uuid::new_v4().simple().to_string();
        TournamentId(full[..8].to_string())
    }
}
