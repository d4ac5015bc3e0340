//! Critical-path depth and greedy earliest-free-court list scheduling
//! (§4.3).
use std::collections::HashMap;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::ids::MatchId;
use crate::model::{Match, Status, Tournament};

const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_FMT: &str = "%H:%M";

/// Schedule every pending match onto a court/time slot, given the wall
/// clock reading `now` (read exactly once, at entry, by the caller).
pub fn schedule(tournament: &mut Tournament, now: NaiveDateTime) {
    assign_criticality(&mut tournament.matches);

    let Some(start_time) = NaiveTime::parse_from_str(&tournament.start_time, TIME_FMT).ok()
    else {
        // Validated on input; a malformed start_time at this point means the
        // stored blob predates validation. Leave scheduling untouched rather
        // than panic on persisted data.
        return;
    };
    let start = now.date().and_time(start_time);
    let duration = TimeDelta::minutes(tournament.match_duration as i64);

    let mut finish_times: HashMap<MatchId, NaiveDateTime> = HashMap::new();
    let mut court_timers: Vec<(String, NaiveDateTime)> = tournament
        .courts
        .iter()
        .map(|c| (c.clone(), start))
        .collect();
    let mut unscheduled: Vec<MatchId> = Vec::new();

    for m in tournament.matches.iter_mut() {
        if m.is_ghost() {
            finish_times.insert(m.id, start);
            m.status = Status::Finished;
        } else if matches!(m.status, Status::Finished) {
            let finish = m
                .timestamp
                .as_deref()
                .and_then(|ts| NaiveDateTime::parse_from_str(ts, TIMESTAMP_FMT).ok())
                .unwrap_or(start)
                + duration;
            finish_times.insert(m.id, finish);
        } else {
            m.time = None;
            m.timestamp = None;
            m.court = None;
            m.status = Status::Pending;
            unscheduled.push(m.id);
        }
    }

    for m in tournament.matches.iter() {
        if matches!(m.status, Status::Finished) {
            if let Some(court) = &m.court {
                if let Some(&finish) = finish_times.get(&m.id) {
                    if let Some(slot) = court_timers.iter_mut().find(|(c, _)| c == court) {
                        if finish > slot.1 {
                            slot.1 = finish;
                        }
                    }
                }
            }
        }
    }

    let by_id: HashMap<MatchId, usize> = tournament
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, i))
        .collect();

    let ready_time = |id: Option<MatchId>, finish_times: &HashMap<MatchId, NaiveDateTime>| -> NaiveDateTime {
        match id {
            None => start,
            Some(id) => *finish_times.get(&id).unwrap_or(&start),
        }
    };

    let mut loop_budget = tournament.matches.len() * 2;
    while !unscheduled.is_empty() && loop_budget > 0 {
        loop_budget -= 1;

        let Some((best_idx, &(_, current))) = court_timers
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, t))| *t)
        else {
            break;
        };
        let current = current;

        let mut ready: Vec<MatchId> = unscheduled
            .iter()
            .copied()
            .filter(|&id| {
                let m = &tournament.matches[by_id[&id]];
                let p1_ready = ready_time(m.source_p1.map(|s| s.id), &finish_times);
                let p2_ready = ready_time(m.source_p2.map(|s| s.id), &finish_times);
                p1_ready.max(p2_ready) <= current
            })
            .collect();

        if !ready.is_empty() {
            ready.sort_by_key(|&id| {
                let m = &tournament.matches[by_id[&id]];
                (std::cmp::Reverse(m.criticality), m.round, m.id)
            });
            let chosen = ready[0];
            let chosen_idx = by_id[&chosen];
            let court_name = court_timers[best_idx].0.clone();
            let finish = current + duration;

            let m = &mut tournament.matches[chosen_idx];
            m.court = Some(court_name);
            m.time = Some(current.format(TIME_FMT).to_string());
            m.timestamp = Some(current.format(TIMESTAMP_FMT).to_string());
            m.status = Status::Scheduled;

            finish_times.insert(chosen, finish);
            court_timers[best_idx].1 = finish;
            unscheduled.retain(|&id| id != chosen);
        } else {
            let mut next_wake: Option<NaiveDateTime> = None;
            for &id in &unscheduled {
                let m = &tournament.matches[by_id[&id]];
                let p1_ready = ready_time(m.source_p1.map(|s| s.id), &finish_times);
                let p2_ready = ready_time(m.source_p2.map(|s| s.id), &finish_times);
                let r = p1_ready.max(p2_ready);
                if r > current && next_wake.map(|w| r < w).unwrap_or(true) {
                    next_wake = Some(r);
                }
            }
            match next_wake {
                Some(wake) => court_timers[best_idx].1 = wake,
                None => break,
            }
        }
    }
}

/// `depth(m) = 1 + max(depth(next_win), depth(next_loss))`, missing
/// successors contributing 0. Memoized DFS since the graph is a DAG.
fn assign_criticality(matches: &mut [Match]) {
    let by_id: HashMap<MatchId, usize> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, i))
        .collect();
    let next_win: Vec<Option<MatchId>> = matches.iter().map(|m| m.next_win).collect();
    let next_loss: Vec<Option<MatchId>> = matches.iter().map(|m| m.next_loss).collect();

    let mut depth_cache: HashMap<MatchId, u32> = HashMap::new();

    fn depth_of(
        id: MatchId,
        by_id: &HashMap<MatchId, usize>,
        next_win: &[Option<MatchId>],
        next_loss: &[Option<MatchId>],
        cache: &mut HashMap<MatchId, u32>,
    ) -> u32 {
        if let Some(&d) = cache.get(&id) {
            return d;
        }
        let Some(&idx) = by_id.get(&id) else {
            return 0;
        };
        let win_depth = match next_win[idx] {
            Some(target) => depth_of(target, by_id, next_win, next_loss, cache),
            None => 0,
        };
        let loss_depth = match next_loss[idx] {
            Some(target) => depth_of(target, by_id, next_win, next_loss, cache),
            None => 0,
        };
        let d = 1 + win_depth.max(loss_depth);
        cache.insert(id, d);
        d
    }

    let ids: Vec<MatchId> = matches.iter().map(|m| m.id).collect();
    for id in ids {
        let d = depth_of(id, &by_id, &next_win, &next_loss, &mut depth_cache);
        let idx = by_id[&id];
        matches[idx].criticality = d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::model::Format;
    use crate::resolver::resolve;
    use chrono::NaiveDate;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| ((b'A' + i as u8) as char).to_string()).collect()
    }

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 7, 30)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn tournament(teams: Vec<String>, courts: Vec<String>, format: Format) -> Tournament {
        let matches = generate(&teams, format);
        Tournament {
            id: crate::ids::TournamentId::generate(),
            name: "Test".to_string(),
            code: "code".to_string(),
            format,
            date: "2026-07-30".to_string(),
            start_time: "09:00".to_string(),
            match_duration: 30,
            teams,
            courts,
            matches,
        }
    }

    #[test]
    fn two_team_single_elim_gets_one_court_assignment() {
        let mut t = tournament(names(2), vec!["C1".to_string()], Format::Single);
        resolve(&mut t.matches);
        schedule(&mut t, fixed_now());
        assert_eq!(t.matches.len(), 1);
        assert_eq!(t.matches[0].court.as_deref(), Some("C1"));
        assert_eq!(t.matches[0].time.as_deref(), Some("09:00"));
    }

    #[test]
    fn wb_round_one_is_scheduled_before_lb_round_one() {
        let mut t = tournament(
            names(4),
            vec!["C1".to_string(), "C2".to_string()],
            Format::Double,
        );
        resolve(&mut t.matches);
        schedule(&mut t, fixed_now());

        let wb1: Vec<&Match> = t
            .matches
            .iter()
            .filter(|m| matches!(m.bracket, crate::model::Bracket::Winners) && m.round == 1)
            .collect();
        let lb1: Vec<&Match> = t
            .matches
            .iter()
            .filter(|m| matches!(m.bracket, crate::model::Bracket::Losers) && m.round == 1)
            .collect();
        let wb_times: Vec<&str> = wb1.iter().filter_map(|m| m.timestamp.as_deref()).collect();
        let lb_times: Vec<&str> = lb1.iter().filter_map(|m| m.timestamp.as_deref()).collect();
        for wt in &wb_times {
            for lt in &lb_times {
                assert!(wt <= lt, "expected WB-R1 ({wt}) to schedule no later than LB-R1 ({lt})");
            }
        }
    }

    #[test]
    fn no_court_double_books_overlapping_intervals() {
        let mut t = tournament(
            names(8),
            vec!["C1".to_string(), "C2".to_string()],
            Format::Double,
        );
        resolve(&mut t.matches);
        schedule(&mut t, fixed_now());

        let mut by_court: HashMap<String, Vec<NaiveDateTime>> = HashMap::new();
        for m in &t.matches {
            if let (Some(court), Some(ts)) = (&m.court, &m.timestamp) {
                let dt = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FMT).unwrap();
                by_court.entry(court.clone()).or_default().push(dt);
            }
        }
        let duration = TimeDelta::minutes(30);
        for times in by_court.values_mut() {
            times.sort();
            for w in times.windows(2) {
                assert!(w[1] >= w[0] + duration, "overlapping assignment on same court");
            }
        }
    }
}
