//! Turn-phase state machine driving one controlled team.
//!
//! Every [`TurnPhaseController::step`] reads the manager's phase and issues at
//! most one command, so a single step never spans more than one phase
//! transition.

use std::collections::HashSet;

use game_core::{Ability, GameManager, Phase, Position, RuleSet, TeamId, UnitTypeId};
use tracing::{debug, info, warn};

use super::abilities::AbilityIndex;
use super::action::{Action, InFlight, OperationKind, Stage};
use super::context::RobotContext;
use super::fallback::{Decision, FallbackChain};
use super::generator::ActionCandidateGenerator;
use super::recruit::RecruitmentPlanner;
use super::scoring::{preferred_action, preferred_standby_position};
use super::threat::ThreatMap;
use crate::api::{Result, RuntimeError};

/// What a single step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    /// A unit was selected for activation.
    Selected(Position),
    /// A unit was bought at the given castle.
    Recruited {
        unit_type: UnitTypeId,
        position: Position,
    },
    /// An action was computed for the selected unit; nothing was issued yet.
    Planned(Action),
    /// The selected unit moved to its action's origin.
    Moved(Position),
    /// The pending action's command was issued.
    Acted(OperationKind),
    /// The unit relocated after acting.
    Repositioned(Position),
    TurnEnded,
    /// The phase required nothing from the engine.
    Idle(Phase),
}

/// Owns the engine state for the controlled team across steps.
pub struct TurnPhaseController {
    team: TeamId,
    prepared: bool,
    pending: Option<InFlight>,
    threats: ThreatMap,
    assigned: HashSet<Position>,
    abilities: AbilityIndex,
    fallback: FallbackChain,
}

impl TurnPhaseController {
    pub fn new() -> Self {
        Self {
            team: TeamId::default(),
            prepared: false,
            pending: None,
            threats: ThreatMap::default(),
            assigned: HashSet::new(),
            abilities: AbilityIndex::default(),
            fallback: FallbackChain::standard(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackChain) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn pending(&self) -> Option<&InFlight> {
        self.pending.as_ref()
    }

    pub fn threats(&self) -> &ThreatMap {
        &self.threats
    }

    pub fn assigned(&self) -> &HashSet<Position> {
        &self.assigned
    }

    /// Resets all engine state and indexes the recruitable catalog.
    pub fn initialize(&mut self, rules: &RuleSet) {
        self.prepared = false;
        self.pending = None;
        self.assigned.clear();
        self.threats.clear();
        self.abilities.rebuild(rules);
    }

    /// Drops the in-flight action and forces a fresh preparation next step.
    pub fn abort(&mut self) {
        self.prepared = false;
        self.pending = None;
    }

    /// Advances the controlled team by one command.
    pub fn step(&mut self, manager: &mut dyn GameManager) -> Result<StepOutcome> {
        if !self.prepared {
            self.prepare(&*manager);
        }
        match manager.phase() {
            Phase::Select => self.select(manager),
            Phase::Move => self.move_unit(manager),
            Phase::Act => self.act(manager),
            Phase::Remove => self.remove(manager),
            phase => Ok(StepOutcome::Idle(phase)),
        }
    }

    fn prepare(&mut self, manager: &dyn GameManager) {
        self.team = manager.current_team();
        self.pending = None;
        self.assigned.clear();
        if self.abilities.is_empty() {
            self.abilities.rebuild(manager.rules());
        }
        self.threats = ThreatMap::build(manager, self.team);
        self.prepared = true;
        info!(
            team = %self.team,
            threatened = self.threats.len(),
            "turn prepared"
        );
    }

    fn context<'a>(&'a self, manager: &'a dyn GameManager) -> RobotContext<'a> {
        RobotContext {
            manager,
            team: self.team,
            threats: &self.threats,
            assigned: &self.assigned,
            abilities: &self.abilities,
        }
    }

    // ========================================================================
    // SELECT
    // ========================================================================

    fn select(&mut self, manager: &mut dyn GameManager) -> Result<StepOutcome> {
        self.pending = None;

        if let Some(position) = self.next_unit(&*manager) {
            manager.select(position)?;
            debug!(team = %self.team, %position, "unit selected");
            return Ok(StepOutcome::Selected(position));
        }

        match RecruitmentPlanner::plan(&self.context(&*manager)) {
            Some((unit_type, position)) => {
                manager.buy_unit(unit_type, position)?;
                debug!(team = %self.team, unit_type = unit_type.0, %position, "unit recruited");
                Ok(StepOutcome::Recruited {
                    unit_type,
                    position,
                })
            }
            None => self.finish(manager),
        }
    }

    /// Refresher, healer, castle garrison, then roster order.
    fn next_unit(&self, manager: &dyn GameManager) -> Option<Position> {
        let board = manager.board();
        let ready: Vec<_> = board.units_of(self.team).filter(|unit| !unit.standby).collect();
        let with = |ability: Ability| {
            ready
                .iter()
                .find(|unit| unit.has_ability(ability))
                .map(|unit| unit.position)
        };

        with(Ability::RefreshAura)
            .or_else(|| with(Ability::Healer))
            .or_else(|| {
                board
                    .castle_positions_of(self.team)
                    .into_iter()
                    .find(|&castle| {
                        board
                            .unit_at(castle)
                            .is_some_and(|unit| unit.team == self.team && !unit.standby)
                    })
            })
            .or_else(|| ready.first().map(|unit| unit.position))
    }

    fn finish(&mut self, manager: &mut dyn GameManager) -> Result<StepOutcome> {
        manager.end_turn()?;
        self.prepared = false;
        info!(team = %self.team, "turn ended");
        Ok(StepOutcome::TurnEnded)
    }

    // ========================================================================
    // MOVE
    // ========================================================================

    fn move_unit(&mut self, manager: &mut dyn GameManager) -> Result<StepOutcome> {
        if self.pending.is_none() {
            let decision = self.calculate(&*manager)?;
            self.submit(decision);
            return Ok(StepOutcome::Planned(decision.action));
        }
        match self.pending.as_mut() {
            Some(flight) if !flight.is_moved() => {
                let origin = flight.action.origin();
                manager.move_to(origin)?;
                flight.stage = Stage::Moved;
                Ok(StepOutcome::Moved(origin))
            }
            _ => Ok(StepOutcome::Idle(Phase::Move)),
        }
    }

    /// Best candidate for the selected unit, or a repositioning fallback.
    fn calculate(&self, manager: &dyn GameManager) -> Result<Decision> {
        let unit = manager.selected_unit().ok_or(RuntimeError::NoSelectedUnit)?;
        let ctx = self.context(manager);

        if unit.is_static() {
            return Ok(Decision::new(ActionCandidateGenerator::static_action(
                &ctx, unit,
            )));
        }

        let movable = manager.positions().movable_positions(manager.board(), unit);
        let candidates = ActionCandidateGenerator::generate(&ctx, unit, &movable);
        match preferred_action(&ctx, unit, &candidates) {
            Some((action, _)) => Ok(Decision::new(action)),
            None => {
                if !candidates.is_empty() {
                    warn!(
                        unit = %unit.id,
                        candidates = candidates.len(),
                        "no candidate scored above zero"
                    );
                }
                Ok(self.fallback.decide(&ctx, unit, &movable))
            }
        }
    }

    fn submit(&mut self, decision: Decision) {
        let action = decision.action;
        if let Some(objective) = decision.claim {
            self.assigned.insert(objective);
        }
        if action.kind() == OperationKind::Repair {
            self.assigned.insert(action.origin());
        }
        debug!(team = %self.team, %action, "action submitted");
        self.pending = Some(InFlight::new(action));
    }

    // ========================================================================
    // ACT / REMOVE
    // ========================================================================

    fn act(&mut self, manager: &mut dyn GameManager) -> Result<StepOutcome> {
        let Some(flight) = self.pending.as_mut() else {
            // The action was dropped by an aborted step; end the activation.
            warn!(team = %self.team, "no pending action in act phase; holding position");
            manager.standby()?;
            return Ok(StepOutcome::Acted(OperationKind::Standby));
        };
        if flight.is_acted() {
            return Ok(StepOutcome::Idle(Phase::Act));
        }

        let action = flight.action;
        let target = action.target();
        match action.kind() {
            OperationKind::Occupy => manager.occupy()?,
            OperationKind::Repair => manager.repair()?,
            OperationKind::Attack => manager.attack(target)?,
            OperationKind::Heal => manager.heal(target)?,
            OperationKind::Summon => manager.summon(target)?,
            OperationKind::Standby => manager.standby()?,
        }
        flight.stage = Stage::Acted;
        Ok(StepOutcome::Acted(action.kind()))
    }

    fn remove(&mut self, manager: &mut dyn GameManager) -> Result<StepOutcome> {
        let target = {
            let unit = manager.selected_unit().ok_or(RuntimeError::NoSelectedUnit)?;
            let movable = manager.positions().movable_positions(manager.board(), unit);
            preferred_standby_position(&self.context(&*manager), unit, &movable)
        };
        manager.move_to(target)?;
        debug!(team = %self.team, position = %target, "unit repositioned");
        Ok(StepOutcome::Repositioned(target))
    }
}

impl Default for TurnPhaseController {
    fn default() -> Self {
        Self::new()
    }
}
