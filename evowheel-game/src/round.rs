//! Round resolution: how a drawn environment changes creature health.
//!
//! Resolution is pure; the session commits the computed deltas. Creatures
//! carrying the affected trait lose one health, everyone else is unchanged
//! (the earlier +1 bonus for unaffected creatures is retired).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::Environment;
use crate::creature::Creature;

/// Health change applied to a creature carrying the affected trait.
pub const AFFECTED_HEALTH_DELTA: i32 = -1;

/// Per-creature result of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub creature_id: u8,
    /// Whether the creature carries the environment's affected trait.
    pub affected: bool,
    pub health_delta: i32,
    pub new_health: i32,
    /// True when this round took the creature from alive to dead.
    pub died: bool,
}

/// Outcome list for a roster; rosters hold at most four creatures.
pub type RoundOutcomes = SmallVec<[RoundOutcome; 4]>;

/// Compute outcomes for every creature passed in, without mutating anything.
///
/// Callers decide which creatures participate; the session passes only the
/// living part of the roster.
#[must_use]
pub fn resolve_round(roster: &[Creature], environment: &Environment) -> RoundOutcomes {
    roster
        .iter()
        .map(|creature| {
            let affected = creature.has_trait(environment.affects);
            let health_delta = if affected { AFFECTED_HEALTH_DELTA } else { 0 };
            let new_health = creature.health() + health_delta;
            RoundOutcome {
                creature_id: creature.id,
                affected,
                health_delta,
                new_health,
                died: new_health <= 0 && creature.is_alive(),
            }
        })
        .collect()
}
