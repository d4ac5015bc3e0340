//! The tournament aggregate and its matches.
//!
//! Fields mirror the on-disk JSON schema verbatim (see [`crate::error`] for
//! the failure modes and `crate::ops` for the operations that mutate this
//! data). Sum types keep their string tags on the wire via `serde(rename_all
//! = "...")` so existing blobs stay readable.
use serde::{Deserialize, Serialize};

use crate::ids::{MatchId, TournamentId};

/// Sentinel opponent/winner value for a bye.
pub const BYE: &str = "BYE";

/// Single- or double-elimination.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Single,
    Double,
}

/// Which sub-bracket a match belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bracket {
    Winners,
    Losers,
    Finals,
}

/// How a dependency edge's source match feeds the slot: the match's winner
/// or its loser (losers only feed the losers bracket and the grand final).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Winner,
    Loser,
}

/// Scheduling lifecycle of a match.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Scheduled,
    Finished,
}

/// One set's points, `(p1, p2)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub p1: i32,
    pub p2: i32,
}

impl SetScore {
    pub fn new(p1: i32, p2: i32) -> Self {
        Self { p1, p2 }
    }
}

/// A dependency edge feeding one of a match's slots.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: MatchId,
    #[serde(rename = "type")]
    pub kind: SourceType,
}

/// One bracket node.
///
/// `p1`/`p2`/`winner` hold either a team name, the [`BYE`] sentinel, or are
/// absent (`None`) while unresolved. `source_p1`/`source_p2` point back at
/// the predecessor match feeding each slot; `next_win`/`next_loss` point
/// forward, established once by the generator and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub bracket: Bracket,
    pub round: u32,

    pub number: Option<u32>,

    pub p1: Option<String>,
    pub p2: Option<String>,
    pub winner: Option<String>,

    pub source_p1: Option<Source>,
    pub source_p2: Option<Source>,
    pub next_win: Option<MatchId>,
    pub next_loss: Option<MatchId>,

    pub sets: Vec<SetScore>,
    pub p1_sets: u32,
    pub p2_sets: u32,

    pub court: Option<String>,
    pub time: Option<String>,
    pub timestamp: Option<String>,
    pub status: Status,

    #[serde(default = "default_label")]
    pub p1_label: String,
    #[serde(default = "default_label")]
    pub p2_label: String,
    #[serde(default)]
    pub criticality: u32,
}

fn default_label() -> String {
    "TBD".to_string()
}

impl Match {
    pub(crate) fn new(id: MatchId, bracket: Bracket, round: u32) -> Self {
        Self {
            id,
            bracket,
            round,
            number: None,
            p1: None,
            p2: None,
            winner: None,
            source_p1: None,
            source_p2: None,
            next_win: None,
            next_loss: None,
            sets: Vec::new(),
            p1_sets: 0,
            p2_sets: 0,
            court: None,
            time: None,
            timestamp: None,
            status: Status::Pending,
            p1_label: default_label(),
            p2_label: default_label(),
            criticality: 0,
        }
    }

    /// A match is a *ghost* once a bye has decided it: never scheduled or
    /// displayed with a number.
    pub fn is_ghost(&self) -> bool {
        self.winner.as_deref() == Some(BYE)
            || self.p1.as_deref() == Some(BYE)
            || self.p2.as_deref() == Some(BYE)
    }
}

impl Tournament {
    /// Non-ghost matches ordered by `(timestamp, court)`, the view a caller
    /// displays as "the schedule" rather than the raw match list.
    pub fn schedule(&self) -> Vec<Match> {
        let mut visible: Vec<Match> = self
            .matches
            .iter()
            .filter(|m| !m.is_ghost())
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.court.cmp(&b.court))
        });
        visible
    }
}

/// The aggregate root: one tournament's settings, teams, courts and matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub code: String,
    pub format: Format,
    pub date: String,
    pub start_time: String,
    pub match_duration: u32,
    pub teams: Vec<String>,
    pub courts: Vec<String>,
    pub matches: Vec<Match>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TournamentCreate;
    use chrono::NaiveDate;

    #[test]
    fn schedule_omits_ghosts_and_is_time_ordered() {
        let request = TournamentCreate {
            name: "Test Cup".to_string(),
            date: "2026-07-30".to_string(),
            code: "secret".to_string(),
            format: Format::Double,
            courts: "C1, C2".to_string(),
            duration: 20,
            start_time: "09:00".to_string(),
            teams: "A\nB\nC".to_string(),
        };
        let now = NaiveDate::from_ymd_opt(2026, 7, 30)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let tournament = crate::ops::create(request, now).unwrap();

        let schedule = tournament.schedule();
        assert!(schedule.iter().all(|m| !m.is_ghost()));
        assert!(schedule.len() < tournament.matches.len());
        assert!(schedule.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
