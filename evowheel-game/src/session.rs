//! Game session state machine: one playthrough from main menu to game over.
//!
//! Every transition is guarded by a pure predicate over the current phase;
//! an out-of-order call returns an error and leaves the session untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::catalog::{Catalog, Environment, TraitCategory, TraitOptionId};
use crate::creature::Creature;
use crate::round::{RoundOutcomes, resolve_round};
use crate::wheel::{self, WheelRng};

const LOG_SESSION_START: &str = "log.session.start";
const LOG_ROSTER_CREATED: &str = "log.roster.created";
const LOG_CREATURE_CONFIRMED: &str = "log.creature.confirmed";
const LOG_WHEEL_SPUN: &str = "log.wheel.spun";
const LOG_ROUND_RESOLVED: &str = "log.round.resolved";
const LOG_GAME_OVER: &str = "log.game-over";
const LOG_SESSION_RESTART: &str = "log.session.restart";

/// Smallest roster the game supports.
pub const MIN_ROSTER_SIZE: usize = 2;
/// Largest roster the game supports.
pub const MAX_ROSTER_SIZE: usize = 4;

/// Phase of the playthrough. Transitions are driven by explicit player
/// actions; presentation pacing never gates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    MainMenu,
    RosterSizeSelect,
    TraitAssignment {
        creature_index: usize,
    },
    Play,
    WheelSpin,
    Resolution,
    GameOver,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainMenu => "main_menu",
            Self::RosterSizeSelect => "roster_size_select",
            Self::TraitAssignment { .. } => "trait_assignment",
            Self::Play => "play",
            Self::WheelSpin => "wheel_spin",
            Self::Resolution => "resolution",
            Self::GameOver => "game_over",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a session action violates its guard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{action} is not legal during {phase}")]
    Phase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("roster size {requested} outside {MIN_ROSTER_SIZE}..={MAX_ROSTER_SIZE}")]
    RosterSize { requested: usize },
    #[error("trait option {id} does not exist in the catalog")]
    UnknownOption { id: TraitOptionId },
    #[error("trait option {id} belongs to {actual}, not {requested}")]
    OptionCategory {
        id: TraitOptionId,
        requested: TraitCategory,
        actual: TraitCategory,
    },
    #[error("creature {creature} still has unselected trait slots")]
    NotFullySpecified { creature: u8 },
    #[error("creature index {index} out of range")]
    NoCreature { index: usize },
    #[error("round already resolved; continue instead")]
    RoundAlreadyResolved,
    #[error("round not resolved yet")]
    RoundNotResolved,
}

/// One playthrough: owns the roster, the current phase, and the drawn
/// environment. Discarded wholesale on restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    catalog: Catalog,
    phase: GamePhase,
    roster: Vec<Creature>,
    current_environment: Option<Environment>,
    last_outcomes: RoundOutcomes,
    round_resolved: bool,
    logs: Vec<String>,
}

impl GameSession {
    /// Create a session at the main menu over a validated catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            phase: GamePhase::MainMenu,
            roster: Vec::new(),
            current_environment: None,
            last_outcomes: RoundOutcomes::new(),
            round_resolved: false,
            logs: Vec::new(),
        }
    }

    /// Leave the main menu for roster size selection.
    ///
    /// # Errors
    ///
    /// Returns an error when not at the main menu.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_phase("start", GamePhase::MainMenu)?;
        self.phase = GamePhase::RosterSizeSelect;
        self.push_log(LOG_SESSION_START);
        Ok(())
    }

    /// Create a fresh roster of `size` creatures and begin trait assignment.
    ///
    /// # Errors
    ///
    /// Returns an error when not selecting a roster size, or when `size`
    /// falls outside the supported range.
    pub fn choose_roster_size(&mut self, size: usize) -> Result<(), SessionError> {
        self.expect_phase("choose_roster_size", GamePhase::RosterSizeSelect)?;
        if !(MIN_ROSTER_SIZE..=MAX_ROSTER_SIZE).contains(&size) {
            return Err(SessionError::RosterSize { requested: size });
        }
        self.roster = (0..size).map(|id| Creature::new(id as u8)).collect();
        self.phase = GamePhase::TraitAssignment { creature_index: 0 };
        self.push_log(LOG_ROSTER_CREATED);
        Ok(())
    }

    /// Select a trait option for the creature currently being assembled.
    /// Re-selection before confirmation is always allowed.
    ///
    /// # Errors
    ///
    /// Returns an error when not assigning traits, when the option id is
    /// unknown, or when the option belongs to a different category.
    pub fn set_trait(
        &mut self,
        category: TraitCategory,
        id: TraitOptionId,
    ) -> Result<(), SessionError> {
        let GamePhase::TraitAssignment { creature_index } = self.phase else {
            return Err(SessionError::Phase {
                action: "set_trait",
                phase: self.phase,
            });
        };
        let option = self
            .catalog
            .option(id)
            .ok_or(SessionError::UnknownOption { id })?;
        if option.category != category {
            return Err(SessionError::OptionCategory {
                id,
                requested: category,
                actual: option.category,
            });
        }
        let creature = self
            .roster
            .get_mut(creature_index)
            .ok_or(SessionError::NoCreature {
                index: creature_index,
            })?;
        creature.set_trait(category, id);
        Ok(())
    }

    /// Confirm the current creature and advance to the next one, or to play
    /// once the whole roster is assembled.
    ///
    /// # Errors
    ///
    /// Returns an error when not assigning traits, or when the current
    /// creature still has empty trait slots.
    pub fn confirm_creature(&mut self) -> Result<(), SessionError> {
        let GamePhase::TraitAssignment { creature_index } = self.phase else {
            return Err(SessionError::Phase {
                action: "confirm_creature",
                phase: self.phase,
            });
        };
        let creature = self
            .roster
            .get(creature_index)
            .ok_or(SessionError::NoCreature {
                index: creature_index,
            })?;
        if !creature.is_fully_specified() {
            return Err(SessionError::NotFullySpecified {
                creature: creature.id,
            });
        }
        self.push_log(LOG_CREATURE_CONFIRMED);
        let next = creature_index + 1;
        self.phase = if next < self.roster.len() {
            GamePhase::TraitAssignment {
                creature_index: next,
            }
        } else {
            GamePhase::Play
        };
        Ok(())
    }

    /// Rename a creature. Legal whenever the roster exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the index is out of range.
    pub fn rename_creature(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), SessionError> {
        let creature = self
            .roster
            .get_mut(index)
            .ok_or(SessionError::NoCreature { index })?;
        creature.rename(name);
        Ok(())
    }

    /// Player triggers the wheel from the play screen.
    ///
    /// # Errors
    ///
    /// Returns an error when not in play.
    pub fn begin_spin(&mut self) -> Result<(), SessionError> {
        self.expect_phase("begin_spin", GamePhase::Play)?;
        self.phase = GamePhase::WheelSpin;
        Ok(())
    }

    /// Complete the spin: record the drawn environment and move to
    /// resolution. The draw is immediate; any spin animation is
    /// presentation pacing.
    ///
    /// # Errors
    ///
    /// Returns an error when no spin is underway.
    pub fn complete_spin(&mut self, rng: &mut dyn WheelRng) -> Result<&Environment, SessionError> {
        self.expect_phase("complete_spin", GamePhase::WheelSpin)?;
        let drawn = wheel::spin(&self.catalog, rng).clone();
        self.last_outcomes = RoundOutcomes::new();
        self.round_resolved = false;
        self.phase = GamePhase::Resolution;
        self.push_log(LOG_WHEEL_SPUN);
        Ok(&*self.current_environment.insert(drawn))
    }

    /// Apply the drawn environment to the living part of the roster and
    /// return the per-creature outcomes. Callable once per round.
    ///
    /// # Errors
    ///
    /// Returns an error when not resolving, or when this round was already
    /// resolved.
    pub fn resolve_round(&mut self) -> Result<RoundOutcomes, SessionError> {
        self.expect_phase("resolve_round", GamePhase::Resolution)?;
        if self.round_resolved {
            return Err(SessionError::RoundAlreadyResolved);
        }
        let Some(environment) = self.current_environment.clone() else {
            return Err(SessionError::Phase {
                action: "resolve_round",
                phase: self.phase,
            });
        };
        // Dead creatures sit out the round entirely.
        let participants: Vec<Creature> = self
            .roster
            .iter()
            .filter(|creature| creature.is_alive())
            .cloned()
            .collect();
        let outcomes = resolve_round(&participants, &environment);
        for outcome in &outcomes {
            if let Some(creature) = self
                .roster
                .iter_mut()
                .find(|creature| creature.id == outcome.creature_id)
            {
                creature.apply_health_delta(outcome.health_delta);
            }
        }
        self.last_outcomes = outcomes.clone();
        self.round_resolved = true;
        self.push_log(LOG_ROUND_RESOLVED);
        Ok(outcomes)
    }

    /// Player confirms the round result: back to play, or game over when
    /// nothing is left alive.
    ///
    /// # Errors
    ///
    /// Returns an error when not resolving, or before the round was
    /// resolved.
    pub fn continue_after_round(&mut self) -> Result<GamePhase, SessionError> {
        self.expect_phase("continue_after_round", GamePhase::Resolution)?;
        if !self.round_resolved {
            return Err(SessionError::RoundNotResolved);
        }
        self.phase = if self.alive_creatures().next().is_some() {
            GamePhase::Play
        } else {
            self.push_log(LOG_GAME_OVER);
            GamePhase::GameOver
        };
        Ok(self.phase)
    }

    /// Discard the playthrough and return to the main menu. Safe from any
    /// phase.
    pub fn restart(&mut self) {
        self.phase = GamePhase::MainMenu;
        self.roster.clear();
        self.current_environment = None;
        self.last_outcomes = RoundOutcomes::new();
        self.round_resolved = false;
        self.logs.clear();
        self.push_log(LOG_SESSION_RESTART);
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn roster(&self) -> &[Creature] {
        &self.roster
    }

    /// The creature whose trait-assignment turn it is, if any.
    #[must_use]
    pub fn current_creature(&self) -> Option<&Creature> {
        match self.phase {
            GamePhase::TraitAssignment { creature_index } => self.roster.get(creature_index),
            _ => None,
        }
    }

    #[must_use]
    pub const fn current_environment(&self) -> Option<&Environment> {
        self.current_environment.as_ref()
    }

    /// Creatures with health above zero, in roster order.
    pub fn alive_creatures(&self) -> impl Iterator<Item = &Creature> {
        self.roster.iter().filter(|creature| creature.is_alive())
    }

    /// Outcomes of the most recently resolved round.
    #[must_use]
    pub const fn last_outcomes(&self) -> &RoundOutcomes {
        &self.last_outcomes
    }

    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn expect_phase(&self, action: &'static str, want: GamePhase) -> Result<(), SessionError> {
        if self.phase == want {
            Ok(())
        } else {
            Err(SessionError::Phase {
                action,
                phase: self.phase,
            })
        }
    }

    fn push_log(&mut self, key: &str) {
        self.logs.push(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIndex(usize);

    impl WheelRng for FixedIndex {
        fn pick_index(&mut self, _segments: usize) -> usize {
            self.0
        }
    }

    fn session() -> GameSession {
        GameSession::new(Catalog::default_catalog())
    }

    fn assign_all(session: &mut GameSession, ids: [char; 4]) {
        for (category, id) in TraitCategory::ALL.into_iter().zip(ids) {
            session.set_trait(category, TraitOptionId(id)).unwrap();
        }
    }

    #[test]
    fn start_moves_to_roster_size_select() {
        let mut session = session();
        assert_eq!(session.phase(), GamePhase::MainMenu);
        session.start().unwrap();
        assert_eq!(session.phase(), GamePhase::RosterSizeSelect);
        assert_eq!(
            session.start(),
            Err(SessionError::Phase {
                action: "start",
                phase: GamePhase::RosterSizeSelect,
            })
        );
    }

    #[test]
    fn roster_size_is_bounded() {
        let mut session = session();
        session.start().unwrap();
        assert_eq!(
            session.choose_roster_size(1),
            Err(SessionError::RosterSize { requested: 1 })
        );
        assert_eq!(
            session.choose_roster_size(5),
            Err(SessionError::RosterSize { requested: 5 })
        );
        assert_eq!(session.phase(), GamePhase::RosterSizeSelect);

        session.choose_roster_size(3).unwrap();
        assert_eq!(session.roster().len(), 3);
        assert_eq!(session.phase(), GamePhase::TraitAssignment { creature_index: 0 });
        let ids: Vec<u8> = session.roster().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn set_trait_validates_option_and_category() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();

        assert_eq!(
            session.set_trait(TraitCategory::Eyes, TraitOptionId('Z')),
            Err(SessionError::UnknownOption {
                id: TraitOptionId('Z')
            })
        );
        assert_eq!(
            session.set_trait(TraitCategory::Eyes, TraitOptionId('C')),
            Err(SessionError::OptionCategory {
                id: TraitOptionId('C'),
                requested: TraitCategory::Eyes,
                actual: TraitCategory::Limbs,
            })
        );
        session
            .set_trait(TraitCategory::Eyes, TraitOptionId('A'))
            .unwrap();
        session
            .set_trait(TraitCategory::Eyes, TraitOptionId('B'))
            .unwrap();
        assert_eq!(
            session.current_creature().unwrap().trait_for(TraitCategory::Eyes),
            Some(TraitOptionId('B'))
        );
    }

    #[test]
    fn confirm_rejects_partially_specified_creature() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        session.set_trait(TraitCategory::Eyes, TraitOptionId('A')).unwrap();
        session.set_trait(TraitCategory::Limbs, TraitOptionId('C')).unwrap();
        session.set_trait(TraitCategory::Body, TraitOptionId('E')).unwrap();

        assert_eq!(
            session.confirm_creature(),
            Err(SessionError::NotFullySpecified { creature: 0 })
        );
        assert_eq!(session.phase(), GamePhase::TraitAssignment { creature_index: 0 });
        assert!(!session.current_creature().unwrap().is_fully_specified());
    }

    #[test]
    fn confirming_the_last_creature_enters_play() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        assign_all(&mut session, ['A', 'C', 'E', 'G']);
        session.confirm_creature().unwrap();
        assert_eq!(session.phase(), GamePhase::TraitAssignment { creature_index: 1 });
        assign_all(&mut session, ['B', 'D', 'F', 'H']);
        session.confirm_creature().unwrap();
        assert_eq!(session.phase(), GamePhase::Play);
        assert!(session.current_creature().is_none());
    }

    #[test]
    fn spin_records_the_drawn_environment() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        assign_all(&mut session, ['A', 'C', 'E', 'G']);
        session.confirm_creature().unwrap();
        assign_all(&mut session, ['B', 'D', 'F', 'H']);
        session.confirm_creature().unwrap();

        assert_eq!(
            session.complete_spin(&mut FixedIndex(0)),
            Err(SessionError::Phase {
                action: "complete_spin",
                phase: GamePhase::Play,
            })
        );
        session.begin_spin().unwrap();
        let drawn = session.complete_spin(&mut FixedIndex(2)).unwrap().clone();
        assert_eq!(drawn.name, "Flood");
        assert_eq!(session.phase(), GamePhase::Resolution);
        assert_eq!(session.current_environment(), Some(&drawn));
    }

    #[test]
    fn resolve_round_is_single_shot() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        assign_all(&mut session, ['A', 'C', 'E', 'G']);
        session.confirm_creature().unwrap();
        assign_all(&mut session, ['B', 'D', 'F', 'H']);
        session.confirm_creature().unwrap();
        session.begin_spin().unwrap();
        session.complete_spin(&mut FixedIndex(0)).unwrap();

        let outcomes = session.resolve_round().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(session.resolve_round(), Err(SessionError::RoundAlreadyResolved));
        assert_eq!(session.roster()[0].health(), 1);
        assert_eq!(session.roster()[1].health(), 2);
        assert_eq!(session.last_outcomes(), &outcomes);
    }

    #[test]
    fn continue_requires_a_resolved_round() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        assign_all(&mut session, ['A', 'C', 'E', 'G']);
        session.confirm_creature().unwrap();
        assign_all(&mut session, ['B', 'D', 'F', 'H']);
        session.confirm_creature().unwrap();
        session.begin_spin().unwrap();
        session.complete_spin(&mut FixedIndex(0)).unwrap();

        assert_eq!(
            session.continue_after_round(),
            Err(SessionError::RoundNotResolved)
        );
        session.resolve_round().unwrap();
        assert_eq!(session.continue_after_round(), Ok(GamePhase::Play));
    }

    #[test]
    fn rename_is_guarded_by_roster_bounds() {
        let mut session = session();
        assert_eq!(
            session.rename_creature(0, "Spike"),
            Err(SessionError::NoCreature { index: 0 })
        );
        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        session.rename_creature(1, "Fern").unwrap();
        assert_eq!(session.roster()[1].name, "Fern");
    }

    #[test]
    fn restart_is_safe_from_any_phase() {
        let mut session = session();
        session.start().unwrap();
        session.choose_roster_size(4).unwrap();
        session.restart();
        assert_eq!(session.phase(), GamePhase::MainMenu);
        assert!(session.roster().is_empty());
        assert!(session.current_environment().is_none());
        assert!(session.last_outcomes().is_empty());

        session.start().unwrap();
        session.choose_roster_size(2).unwrap();
        for creature in session.roster() {
            assert_eq!(creature.health(), crate::creature::BASE_HEALTH);
            assert!(!creature.is_fully_specified());
        }
    }

    #[test]
    fn phase_labels_are_stable() {
        assert_eq!(GamePhase::MainMenu.as_str(), "main_menu");
        assert_eq!(
            GamePhase::TraitAssignment { creature_index: 2 }.as_str(),
            "trait_assignment"
        );
        assert_eq!(GamePhase::GameOver.to_string(), "game_over");
    }
}
