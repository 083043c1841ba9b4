//! Wound bonus from earlier attacks on the same defender.

use crate::state::{Coord, Turn, Unit};

/// Bonus `B` an attack at `attacker` gets against `defender` in `turn`.
///
/// Records from earlier turns are ignored, since the defender is only
/// refreshed in its owner's turn. Each recorded attack this turn contributes:
/// - `+1` if the current attack is ranged (distance >= 2)
/// - `+1` if the recorded attack was ranged
/// - `+1` if the recorded attacker stands next to the current attacker
/// - `+3` if the two attackers are on opposite sides of the defender
/// - `+2` otherwise
pub fn wound_bonus(defender: &Unit, attacker: Coord, turn: Turn) -> i32 {
    let origin = defender.coord;
    let current_is_ranged = attacker.distance(origin) >= 2;

    defender
        .attack_history
        .iter()
        .filter(|record| record.turn == turn)
        .map(|record| {
            let previous = record.attacker();
            if current_is_ranged || record.is_ranged || previous.is_adjacent(attacker) {
                1
            } else if previous - origin == -(attacker - origin) {
                3
            } else {
                2
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AttackRecord;

    fn defender(history: &[(i32, i32, bool)]) -> Unit {
        let mut unit = Unit::new(Coord::ORIGIN, 2, 1, 10);
        unit.attack_history = history
            .iter()
            .map(|&(q, r, is_ranged)| AttackRecord {
                q,
                r,
                is_ranged,
                turn: 1,
            })
            .collect();
        unit
    }

    #[test]
    fn reference_table() {
        assert_eq!(wound_bonus(&defender(&[]), Coord::new(1, 0), 1), 0);
        assert_eq!(wound_bonus(&defender(&[(3, 0, true)]), Coord::new(2, 0), 1), 1);
        assert_eq!(wound_bonus(&defender(&[(3, 0, true)]), Coord::new(1, 0), 1), 1);
        assert_eq!(wound_bonus(&defender(&[(1, 0, false)]), Coord::new(-1, 0), 1), 3);
    }

    #[test]
    fn adjacent_and_flanking_attackers() {
        // (1,0) and (1,-1) touch each other.
        assert_eq!(wound_bonus(&defender(&[(1, 0, false)]), Coord::new(1, -1), 1), 1);
        // (1,0) and (-1,1) are two apart but not opposite.
        assert_eq!(wound_bonus(&defender(&[(1, 0, false)]), Coord::new(-1, 1), 1), 2);
        assert_eq!(
            wound_bonus(&defender(&[(1, 0, false), (0, 1, false)]), Coord::new(-1, 0), 1),
            3 + 2
        );
    }

    #[test]
    fn attacks_from_earlier_turns_do_not_count() {
        let stale = defender(&[(1, 0, false)]);
        assert_eq!(wound_bonus(&stale, Coord::new(-1, 0), 1), 3);
        assert_eq!(wound_bonus(&stale, Coord::new(-1, 0), 2), 0);
    }
}
