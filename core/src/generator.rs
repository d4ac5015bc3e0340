//! Bracket topology generation (§4.1).
//!
//! Builds the immutable match skeleton — ids, bracket placement, dependency
//! edges and seeded round-1 slots — from a team list and a format. Never
//! touches `status`, `winner`, or scheduling fields beyond their defaults;
//! that is the resolver's and scheduler's job.
use crate::ids::MatchId;
use crate::model::{Bracket, Match, SourceType, BYE};

/// Expand `[1, 2]` into a top-heavy seeding of `size` slots by repeated
/// doubling, then map each seed number to a team name or [`BYE`].
fn seeded_positions(size: usize, teams: &[String]) -> Vec<String> {
    let mut seeds = vec![1usize, 2];
    while seeds.len() < size {
        let len = seeds.len();
        let mut next = Vec::with_capacity(len * 2);
        for &s in &seeds {
            next.push(s);
            next.push(2 * len + 1 - s);
        }
        seeds = next;
    }
    seeds
        .into_iter()
        .map(|seed| {
            if seed <= teams.len() {
                teams[seed - 1].clone()
            } else {
                BYE.to_string()
            }
        })
        .collect()
}

/// A small builder that hands out sequential [`MatchId`]s and keeps the
/// flat match list the rest of this module indexes into.
struct Builder {
    matches: Vec<Match>,
    next_id: u32,
}

impl Builder {
    fn new() -> Self {
        Self {
            matches: Vec::new(),
            next_id: 1,
        }
    }

    fn create(&mut self, bracket: Bracket, round: u32) -> usize {
        let id = MatchId::new(self.next_id);
        self.next_id += 1;
        self.matches.push(Match::new(id, bracket, round));
        self.matches.len() - 1
    }

    fn id_of(&self, idx: usize) -> MatchId {
        self.matches[idx].id
    }
}

/// Build the match list for `(teams, format)`. `teams.len() >= 2` is the
/// caller's responsibility ([`crate::input::TournamentCreate::validate`]
/// enforces it before this is ever called).
pub fn generate(teams: &[String], format: crate::model::Format) -> Vec<Match> {
    let count = teams.len();
    let size = count.next_power_of_two();
    let power = size.trailing_zeros();
    let seeded = seeded_positions(size, teams);

    let mut b = Builder::new();

    // Winners bracket: round r has size / 2^r matches, r = 1..=power.
    let wb_rounds = power;
    let mut wb: Vec<Vec<usize>> = Vec::with_capacity(wb_rounds as usize + 1);
    wb.push(Vec::new()); // unused index 0, rounds are 1-based
    for r in 1..=wb_rounds {
        let n = size >> r;
        let round_matches = (0..n).map(|_| b.create(Bracket::Winners, r)).collect();
        wb.push(round_matches);
    }

    for r in 1..wb_rounds {
        for (i, &m_idx) in wb[r as usize].iter().enumerate() {
            let parent_idx = wb[(r + 1) as usize][i / 2];
            let parent_id = b.id_of(parent_idx);
            let m_id = b.id_of(m_idx);
            b.matches[m_idx].next_win = Some(parent_id);
            if i % 2 == 0 {
                b.matches[parent_idx].source_p1 = Some(crate::model::Source {
                    id: m_id,
                    kind: SourceType::Winner,
                });
            } else {
                b.matches[parent_idx].source_p2 = Some(crate::model::Source {
                    id: m_id,
                    kind: SourceType::Winner,
                });
            }
        }
    }

    for (i, &m_idx) in wb[1].iter().enumerate() {
        b.matches[m_idx].p1 = Some(seeded[i * 2].clone());
        b.matches[m_idx].p2 = Some(seeded[i * 2 + 1].clone());
    }

    if matches!(format, crate::model::Format::Double) && size >= 4 {
        let lb_rounds = (wb_rounds - 1) * 2;
        let mut lb: Vec<Vec<usize>> = Vec::with_capacity(lb_rounds as usize + 1);
        lb.push(Vec::new());
        let mut current_count = size / 4;
        for r in 1..=lb_rounds {
            let round_matches = (0..current_count)
                .map(|_| b.create(Bracket::Losers, r))
                .collect();
            lb.push(round_matches);
            if r % 2 == 0 {
                current_count /= 2;
            }
        }

        for r in 1..lb_rounds {
            for (i, &m_idx) in lb[r as usize].iter().enumerate() {
                let odd = r % 2 != 0;
                let target_idx = if odd {
                    lb[(r + 1) as usize][i]
                } else {
                    lb[(r + 1) as usize][i / 2]
                };
                let target_id = b.id_of(target_idx);
                let m_id = b.id_of(m_idx);
                b.matches[m_idx].next_win = Some(target_id);
                let source = crate::model::Source {
                    id: m_id,
                    kind: SourceType::Winner,
                };
                if odd {
                    b.matches[target_idx].source_p1 = Some(source);
                } else if i % 2 == 0 {
                    b.matches[target_idx].source_p1 = Some(source);
                } else {
                    b.matches[target_idx].source_p2 = Some(source);
                }
            }
        }

        for r in 1..wb_rounds {
            let drop_round = if r == 1 { 1 } else { (r - 1) * 2 };
            let lb_layer = &lb[drop_round as usize];
            for (i, &wb_idx) in wb[r as usize].iter().enumerate() {
                let target_idx = if r == 1 {
                    lb_layer[i / 2]
                } else if i < lb_layer.len() {
                    lb_layer[i]
                } else {
                    *lb_layer.last().expect("losers round is non-empty")
                };
                let target_id = b.id_of(target_idx);
                let wb_id = b.id_of(wb_idx);
                b.matches[wb_idx].next_loss = Some(target_id);
                let source = crate::model::Source {
                    id: wb_id,
                    kind: SourceType::Loser,
                };
                let use_p1 = r == 1 && i % 2 == 0;
                if use_p1 {
                    b.matches[target_idx].source_p1 = Some(source);
                } else {
                    b.matches[target_idx].source_p2 = Some(source);
                }
            }
        }

        let wb_final_idx = wb[wb_rounds as usize][0];
        let lb_final_idx = lb[lb_rounds as usize][0];
        let wb_final_id = b.id_of(wb_final_idx);
        let lb_final_id = b.id_of(lb_final_idx);

        b.matches[wb_final_idx].next_loss = Some(lb_final_id);
        b.matches[lb_final_idx].source_p2 = Some(crate::model::Source {
            id: wb_final_id,
            kind: SourceType::Loser,
        });

        let final_idx = b.create(Bracket::Finals, 1);
        let final_id = b.id_of(final_idx);
        b.matches[wb_final_idx].next_win = Some(final_id);
        b.matches[lb_final_idx].next_win = Some(final_id);
        b.matches[final_idx].source_p1 = Some(crate::model::Source {
            id: wb_final_id,
            kind: SourceType::Winner,
        });
        b.matches[final_idx].source_p2 = Some(crate::model::Source {
            id: lb_final_id,
            kind: SourceType::Winner,
        });
    }

    b.matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Format;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| ((b'A' + i as u8) as char).to_string()).collect()
    }

    #[test]
    fn two_teams_single_elim_is_one_match() {
        let matches = generate(&names(2), Format::Single);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].p1.as_deref(), Some("A"));
        assert_eq!(matches[0].p2.as_deref(), Some("B"));
    }

    #[test]
    fn three_teams_double_elim_has_one_bye() {
        let matches = generate(&names(3), Format::Double);
        let byes = matches
            .iter()
            .filter(|m| m.p1.as_deref() == Some(BYE) || m.p2.as_deref() == Some(BYE))
            .count();
        assert_eq!(byes, 1);
    }

    #[test]
    fn four_teams_double_elim_has_seven_matches() {
        let matches = generate(&names(4), Format::Double);
        assert_eq!(matches.len(), 7);
        let finals = matches
            .iter()
            .filter(|m| matches!(m.bracket, Bracket::Finals))
            .count();
        assert_eq!(finals, 1);
    }

    #[test]
    fn eight_teams_double_elim_topology() {
        let matches = generate(&names(8), Format::Double);
        // wb: 4+2+1 = 7, lb: rounds = 2*(3-1) = 4, sizes 2,2,1,1 = 6, + final = 14
        assert_eq!(matches.len(), 14);
    }

    #[test]
    fn single_elim_never_creates_losers_bracket() {
        let matches = generate(&names(8), Format::Single);
        assert!(matches.iter().all(|m| !matches!(m.bracket, Bracket::Losers)));
        assert!(matches.iter().all(|m| !matches!(m.bracket, Bracket::Finals)));
    }

    #[test]
    fn dependency_edges_are_dual() {
        let matches = generate(&names(4), Format::Double);
        let by_id = |id: MatchId| matches.iter().find(|m| m.id == id).unwrap();
        for m in &matches {
            if let Some(target) = m.next_win {
                let t = by_id(target);
                let points_back = t.source_p1.map(|s| s.id) == Some(m.id)
                    || t.source_p2.map(|s| s.id) == Some(m.id);
                assert!(points_back, "match {:?} next_win not reciprocated", m.id);
            }
            if let Some(target) = m.next_loss {
                let t = by_id(target);
                let points_back = t.source_p1.map(|s| s.id) == Some(m.id)
                    || t.source_p2.map(|s| s.id) == Some(m.id);
                assert!(points_back, "match {:?} next_loss not reciprocated", m.id);
            }
        }
    }
}
