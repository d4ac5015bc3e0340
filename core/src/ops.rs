//! Pure orchestration: wires the generator, resolver and scheduler into the
//! operations a caller (the HTTP layer) actually needs. No I/O here — the
//! tournament is handed in and out by value, and `now` is always a caller
//! argument so these functions stay deterministic and cheap to test.
use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::generator::generate;
use crate::ids::MatchId;
use crate::input::TournamentCreate;
use crate::model::{SetScore, Status, Tournament};
use crate::resolver::resolve;
use crate::scheduler::schedule;

/// Re-run resolve + schedule and leave the tournament at a fixed point.
/// Every mutating operation below ends by calling this.
fn settle(tournament: &mut Tournament, now: NaiveDateTime) {
    resolve(&mut tournament.matches);
    schedule(tournament, now);
}

/// Build a brand-new tournament from validated settings: generate the
/// bracket skeleton, then settle it (seeds with a bye auto-advance and get
/// scheduled immediately).
pub fn create(request: TournamentCreate, now: NaiveDateTime) -> Result<Tournament, EngineError> {
    let settings = request.validate()?;
    let matches = generate(&settings.teams, settings.format);
    let mut tournament = Tournament {
        id: crate::ids::TournamentId::generate(),
        name: settings.name,
        code: settings.code,
        format: settings.format,
        date: settings.date,
        start_time: settings.start_time,
        match_duration: settings.duration,
        teams: settings.teams,
        courts: settings.courts,
        matches,
    };
    settle(&mut tournament, now);
    Ok(tournament)
}

/// Replace an existing tournament's settings and re-settle it. Regenerates
/// the bracket from scratch (discarding all results) iff `teams` or
/// `format` differ from the stored values; otherwise the existing matches
/// are kept and only re-scheduled.
pub fn update_settings(
    tournament: &mut Tournament,
    request: TournamentCreate,
    now: NaiveDateTime,
) -> Result<(), EngineError> {
    let settings = request.validate()?;

    if settings.teams != tournament.teams || settings.format != tournament.format {
        tournament.teams = settings.teams;
        tournament.format = settings.format;
        tournament.matches = generate(&tournament.teams, tournament.format);
    }

    tournament.name = settings.name;
    tournament.code = settings.code;
    tournament.date = settings.date;
    tournament.courts = settings.courts;
    tournament.match_duration = settings.duration;
    tournament.start_time = settings.start_time;
    settle(tournament, now);
    Ok(())
}

/// Report the final set scores for one match, require admin or the
/// matching report code, and re-settle the tournament. `clear` resets the
/// match to `Pending` with no result regardless of its prior state, instead
/// of recording `sets`.
#[allow(clippy::too_many_arguments)]
pub fn report_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    sets: Vec<SetScore>,
    is_admin: bool,
    code: &str,
    clear: bool,
    now: NaiveDateTime,
) -> Result<(), EngineError> {
    if !is_admin && code.trim() != tournament.code.trim() {
        return Err(EngineError::InvalidCode);
    }

    let m = tournament
        .matches
        .iter_mut()
        .find(|m| m.id == match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;

    if clear {
        m.winner = None;
        m.status = Status::Pending;
        m.sets.clear();
        m.p1_sets = 0;
        m.p2_sets = 0;
        settle(tournament, now);
        return Ok(());
    }

    if m.p1.is_none() || m.p2.is_none() {
        return Err(EngineError::InvalidInput(
            "match has no opponents yet".to_string(),
        ));
    }

    let p1_sets = sets.iter().filter(|s| s.p1 > s.p2).count() as u32;
    let p2_sets = sets.iter().filter(|s| s.p2 > s.p1).count() as u32;

    let winner = match p1_sets.cmp(&p2_sets) {
        std::cmp::Ordering::Greater => m.p1.clone(),
        std::cmp::Ordering::Less => m.p2.clone(),
        std::cmp::Ordering::Equal => {
            let p1_points: i32 = sets.iter().map(|s| s.p1).sum();
            let p2_points: i32 = sets.iter().map(|s| s.p2).sum();
            match p1_points.cmp(&p2_points) {
                std::cmp::Ordering::Greater => m.p1.clone(),
                std::cmp::Ordering::Less => m.p2.clone(),
                std::cmp::Ordering::Equal => return Err(EngineError::Tied),
            }
        }
    };

    m.sets = sets;
    m.p1_sets = p1_sets;
    m.p2_sets = p2_sets;
    m.winner = winner;
    m.status = Status::Finished;

    settle(tournament, now);
    Ok(())
}
