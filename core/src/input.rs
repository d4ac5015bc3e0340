//! Validated input records for the create/update-settings operations.
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::Format;

/// The raw shape submitted by a client for both `create` and
/// `update_settings`. `teams` and `courts` arrive as delimited strings (the
/// way a plain textarea/input would submit them) and are split and trimmed
/// by [`TournamentSettings::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentCreate {
    pub name: String,
    pub date: String,
    pub code: String,
    pub format: Format,
    /// Comma-separated court names.
    pub courts: String,
    pub duration: u32,
    pub start_time: String,
    /// Newline-separated team names.
    pub teams: String,
}

/// A [`TournamentCreate`] after validation: split, trimmed, and checked
/// against the invariants `teams`/`courts` non-empty and unique, `duration
/// >= 1`, `start_time` matching `HH:MM`.
#[derive(Debug, Clone)]
pub struct TournamentSettings {
    pub name: String,
    pub date: String,
    pub code: String,
    pub format: Format,
    pub courts: Vec<String>,
    pub duration: u32,
    pub start_time: String,
    pub teams: Vec<String>,
}

impl TournamentCreate {
    pub fn validate(self) -> Result<TournamentSettings, EngineError> {
        let teams: Vec<String> = self
            .teams
            .split('\n')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let courts: Vec<String> = self
            .courts
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if teams.len() < 2 {
            return Err(EngineError::InvalidInput(
                "tournament needs at least 2 teams".to_string(),
            ));
        }
        if has_duplicates(&teams) {
            return Err(EngineError::InvalidInput(
                "team names must be unique".to_string(),
            ));
        }
        if courts.is_empty() {
            return Err(EngineError::InvalidInput(
                "tournament needs at least 1 court".to_string(),
            ));
        }
        if has_duplicates(&courts) {
            return Err(EngineError::InvalidInput(
                "court names must be unique".to_string(),
            ));
        }
        if self.duration < 1 {
            return Err(EngineError::InvalidInput(
                "match duration must be at least 1 minute".to_string(),
            ));
        }
        if !is_valid_hhmm(&self.start_time) {
            return Err(EngineError::InvalidInput(
                "start_time must be in HH:MM form".to_string(),
            ));
        }

        Ok(TournamentSettings {
            name: self.name,
            date: self.date,
            code: self.code,
            format: self.format,
            courts,
            duration: self.duration,
            start_time: self.start_time,
            teams,
        })
    }
}

fn has_duplicates(items: &[String]) -> bool {
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if a == b {
                return true;
            }
        }
    }
    false
}

fn is_valid_hhmm(s: &str) -> bool {
    let Some((h, m)) = s.split_once(':') else {
        return false;
    };
    let (Ok(h), Ok(m)) = (h.parse::<u32>(), m.parse::<u32>()) else {
        return false;
    };
    h < 24 && m < 60 && h.to_string().len() <= 2 && m.to_string().len() <= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TournamentCreate {
        TournamentCreate {
            name: "Summer Smash".to_string(),
            date: "2026-07-30".to_string(),
            code: "secret".to_string(),
            format: Format::Double,
            courts: "C1, C2".to_string(),
            duration: 30,
            start_time: "09:00".to_string(),
            teams: "A\nB\nC".to_string(),
        }
    }

    #[test]
    fn splits_and_trims_teams_and_courts() {
        let settings = base().validate().unwrap();
        assert_eq!(settings.teams, vec!["A", "B", "C"]);
        assert_eq!(settings.courts, vec!["C1", "C2"]);
    }

    #[test]
    fn rejects_single_team() {
        let mut create = base();
        create.teams = "A\n".to_string();
        assert!(matches!(
            create.validate(),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_bad_start_time() {
        let mut create = base();
        create.start_time = "9h00".to_string();
        assert!(matches!(
            create.validate(),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_duplicate_teams() {
        let mut create = base();
        create.teams = "A\nA\nB".to_string();
        assert!(matches!(
            create.validate(),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
