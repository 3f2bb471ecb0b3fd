//! Events returned alongside every new state
//!
//! Each mutator returns a `Transition`: the next snapshot plus everything
//! that happened on the way, in order. Observers drain the event list
//! instead of polling a single effect slot, so splash hits and counter-fire
//! from the same attack are all reported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{Player, Position, Timestamp, UnitId};
use crate::game::nation::NationSkill;
use crate::game::state::GameState;
use crate::game::unit_type::UnitType;

/// Visual effect category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectKind {
    Attack,
    Explosion,
}

/// Snapshot-level record of the most recent combat effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    pub position: Position,
    pub damage: i32,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    UnitDeployed {
        unit: UnitId,
        unit_type: UnitType,
        player: Player,
        at: Position,
        cost: u32,
        /// Set when the unit was placed straight into a carrier
        carrier: Option<UnitId>,
    },
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
        cost: u32,
    },
    UnitLaunched {
        unit: UnitId,
        carrier: UnitId,
        to: Position,
    },
    UnitEmbarked {
        unit: UnitId,
        carrier: UnitId,
    },
    /// A land unit waded into the sea and is stuck for the turn
    UnitStranded {
        unit: UnitId,
        at: Position,
    },
    UnitAttacked {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        effect: Effect,
    },
    BaseAttacked {
        attacker: UnitId,
        owner: Player,
        damage: i32,
        remaining_hp: i32,
        effect: Effect,
    },
    SplashHit {
        attacker: UnitId,
        defender: UnitId,
        damage: i32,
        effect: Effect,
    },
    CounterFire {
        anti_air: UnitId,
        target: UnitId,
        damage: i32,
        effect: Effect,
    },
    UnitDestroyed {
        unit: UnitId,
        at: Position,
    },
    TurnStarted {
        player: Player,
        turn: u32,
        income: u32,
    },
    SkillActivated {
        player: Player,
        skill: NationSkill,
    },
    UnitSpawned {
        unit: UnitId,
        unit_type: UnitType,
        at: Position,
    },
    UnitsReinforced {
        player: Player,
        count: usize,
    },
    FundsGranted {
        player: Player,
        amount: u32,
    },
    GameOver {
        winner: Player,
    },
}

impl GameEvent {
    /// Short stable name, used for tallies
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::UnitDeployed { .. } => "unit_deployed",
            GameEvent::UnitMoved { .. } => "unit_moved",
            GameEvent::UnitLaunched { .. } => "unit_launched",
            GameEvent::UnitEmbarked { .. } => "unit_embarked",
            GameEvent::UnitStranded { .. } => "unit_stranded",
            GameEvent::UnitAttacked { .. } => "unit_attacked",
            GameEvent::BaseAttacked { .. } => "base_attacked",
            GameEvent::SplashHit { .. } => "splash_hit",
            GameEvent::CounterFire { .. } => "counter_fire",
            GameEvent::UnitDestroyed { .. } => "unit_destroyed",
            GameEvent::TurnStarted { .. } => "turn_started",
            GameEvent::SkillActivated { .. } => "skill_activated",
            GameEvent::UnitSpawned { .. } => "unit_spawned",
            GameEvent::UnitsReinforced { .. } => "units_reinforced",
            GameEvent::FundsGranted { .. } => "funds_granted",
            GameEvent::GameOver { .. } => "game_over",
        }
    }

    /// The visual effect this event carries, if any
    pub fn effect(&self) -> Option<Effect> {
        match self {
            GameEvent::UnitAttacked { effect, .. }
            | GameEvent::BaseAttacked { effect, .. }
            | GameEvent::SplashHit { effect, .. }
            | GameEvent::CounterFire { effect, .. } => Some(*effect),
            _ => None,
        }
    }
}

/// Result of a mutator: the new snapshot and what happened
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Transition {
    pub fn new(state: GameState, events: Vec<GameEvent>) -> Self {
        Self { state, events }
    }

    /// A rejected action: the input snapshot, untouched
    pub fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    /// Chain another mutator, accumulating events
    pub fn then(mut self, f: impl FnOnce(&GameState) -> Transition) -> Self {
        let next = f(&self.state);
        self.state = next.state;
        self.events.extend(next.events);
        self
    }
}

/// Append-only log for a whole match
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }

    /// Occurrences per event name, sorted by name
    pub fn tally(&self) -> BTreeMap<&'static str, usize> {
        let mut tally = BTreeMap::new();
        for event in &self.events {
            *tally.entry(event.name()).or_insert(0) += 1;
        }
        tally
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
