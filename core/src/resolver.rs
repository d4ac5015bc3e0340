//! Fixed-point slot propagation, bye collapsing, display numbering, and
//! recursive TBD labels (§4.2).
use std::collections::HashMap;

use crate::ids::MatchId;
use crate::model::{Match, Source, SourceType, Status, BYE};

const MAX_SWEEPS: u32 = 20;
const MAX_LABEL_DEPTH: u32 = 10;

/// Bring `matches` to a fixed point: every slot, the display `number`, and
/// both labels are consistent with the current `winner` values.
pub fn resolve(matches: &mut [Match]) {
    for _ in 0..MAX_SWEEPS {
        let snapshot: HashMap<MatchId, (Option<String>, Option<String>, Option<String>)> =
            matches
                .iter()
                .map(|m| (m.id, (m.p1.clone(), m.p2.clone(), m.winner.clone())))
                .collect();

        let mut changed = false;
        for m in matches.iter_mut() {
            apply_sweep(m, &snapshot, &mut changed);
        }
        if !changed {
            break;
        }
    }

    assign_display_numbers(matches);
    assign_labels(matches);
}

type Snapshot = HashMap<MatchId, (Option<String>, Option<String>, Option<String>)>;

fn apply_sweep(m: &mut Match, snapshot: &Snapshot, changed: &mut bool) {
    if let Some(source) = m.source_p1 {
        let resolved = resolve_slot(source, snapshot);
        if resolved != m.p1 {
            m.p1 = resolved;
            *changed = true;
        }
    }
    if let Some(source) = m.source_p2 {
        let resolved = resolve_slot(source, snapshot);
        if resolved != m.p2 {
            m.p2 = resolved;
            *changed = true;
        }
    }

    if matches!(m.status, Status::Finished) && m.winner.as_deref() != Some(BYE) {
        let slot_missing = m.p1.is_none() || m.p2.is_none();
        let winner_off_slots = m.winner.is_some() && m.winner != m.p1 && m.winner != m.p2;
        if slot_missing || winner_off_slots {
            m.winner = None;
            m.status = Status::Pending;
            m.sets.clear();
            m.p1_sets = 0;
            m.p2_sets = 0;
            *changed = true;
        }
    }

    if m.winner.is_none() && (m.p1.as_deref() == Some(BYE) || m.p2.as_deref() == Some(BYE)) {
        let winner = if m.p1.as_deref() == Some(BYE) && m.p2.as_deref() == Some(BYE) {
            BYE.to_string()
        } else if m.p1.as_deref() == Some(BYE) {
            m.p2.clone().unwrap()
        } else {
            m.p1.clone().unwrap()
        };
        m.winner = Some(winner);
        m.status = Status::Finished;
        *changed = true;
    }
}

fn resolve_slot(source: Source, snapshot: &Snapshot) -> Option<String> {
    let (src_p1, src_p2, src_winner) = snapshot.get(&source.id)?.clone();
    match source.kind {
        SourceType::Winner => src_winner,
        SourceType::Loser => match src_winner {
            None => None,
            Some(w) if w == BYE => Some(BYE.to_string()),
            Some(w) => {
                if Some(&w) == src_p2.as_ref() {
                    src_p1
                } else {
                    src_p2
                }
            }
        },
    }
}

fn assign_display_numbers(matches: &mut [Match]) {
    let mut ordered: Vec<usize> = (0..matches.len()).collect();
    ordered.sort_by_key(|&i| matches[i].id);

    let mut counter = 1u32;
    for idx in ordered {
        if matches[idx].is_ghost() {
            matches[idx].number = None;
        } else {
            matches[idx].number = Some(counter);
            counter += 1;
        }
    }
}

fn assign_labels(matches: &mut [Match]) {
    let by_id: HashMap<MatchId, Match> = matches.iter().map(|m| (m.id, m.clone())).collect();
    for m in matches.iter_mut() {
        m.p1_label = label_for(m.source_p1, &by_id, 0);
        m.p2_label = label_for(m.source_p2, &by_id, 0);
    }
}

fn label_for(source: Option<Source>, by_id: &HashMap<MatchId, Match>, depth: u32) -> String {
    let Some(source) = source else {
        return "TBD".to_string();
    };
    if depth > MAX_LABEL_DEPTH {
        return "TBD".to_string();
    }
    let Some(src) = by_id.get(&source.id) else {
        return "TBD".to_string();
    };
    if let Some(number) = src.number {
        let kind = match source.kind {
            SourceType::Winner => "Winner",
            SourceType::Loser => "Loser",
        };
        return format!("{kind} of #{number}");
    }
    match source.kind {
        SourceType::Winner => {
            let skip = if src.p2.as_deref() == Some(BYE) {
                src.source_p1
            } else {
                src.source_p2
            };
            label_for(skip, by_id, depth + 1)
        }
        SourceType::Loser => BYE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::model::Format;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| ((b'A' + i as u8) as char).to_string()).collect()
    }

    #[test]
    fn bye_matches_auto_advance_and_become_ghosts() {
        let mut matches = generate(&names(3), Format::Double);
        resolve(&mut matches);
        let ghost = matches.iter().find(|m| m.is_ghost()).unwrap();
        assert_eq!(ghost.winner.as_deref(), Some("B"));
        assert!(ghost.number.is_none());
    }

    #[test]
    fn display_numbers_skip_ghosts_and_have_no_gaps() {
        let mut matches = generate(&names(3), Format::Double);
        resolve(&mut matches);
        let mut numbers: Vec<u32> = matches.iter().filter_map(|m| m.number).collect();
        numbers.sort_unstable();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn labels_reference_winner_of_display_number() {
        let mut matches = generate(&names(4), Format::Double);
        resolve(&mut matches);
        let final_match = matches
            .iter()
            .find(|m| matches!(m.bracket, crate::model::Bracket::Finals))
            .unwrap();
        assert!(final_match.p1_label.starts_with("Winner of #"));
    }

    #[test]
    fn invalidation_resets_finished_match_when_slot_changes() {
        let mut matches = generate(&names(4), Format::Double);
        resolve(&mut matches);
        // Play WB round 1, match 1: first seed (p1) beats fourth seed.
        let m1 = matches.iter_mut().find(|m| m.id.get() == 1).unwrap();
        let winner = m1.p1.clone().unwrap();
        m1.winner = Some(winner);
        m1.status = Status::Finished;
        resolve(&mut matches);

        // WB final should now have p1 resolved from match 1's winner.
        let wb_final = matches
            .iter()
            .find(|m| matches!(m.bracket, crate::model::Bracket::Winners) && m.round == 2)
            .unwrap();
        assert!(wb_final.p1.is_some());

        // Flip match 1's winner to the other team: downstream must invalidate.
        let m1 = matches.iter_mut().find(|m| m.id.get() == 1).unwrap();
        let other = m1.p2.clone().unwrap();
        m1.winner = Some(other);
        resolve(&mut matches);

        let wb_final = matches
            .iter()
            .find(|m| matches!(m.bracket, crate::model::Bracket::Winners) && m.round == 2)
            .unwrap();
        assert!(matches!(wb_final.status, Status::Pending));
    }
}
