use tracing::{debug, info};

use super::{GameManager, Phase};
use crate::config::GameConfig;
use crate::env::{
    CombatEvaluator, GridPositionGenerator, PositionGenerator, RuleSet, StandardCombat,
};
use crate::error::CommandError;
use crate::state::{
    Ability, Board, Player, Position, StatusKind, TeamId, Tile, TileKind, Unit, UnitId,
    UnitTypeId,
};

/// Reference [`GameManager`] over the grid position generator and the
/// standard combat rules.
///
/// Players take turns in the order they were given. A unit activation runs
/// Select → Move → Act → Select, with an extra Remove stage for hit-and-run
/// units that survive their attack.
#[derive(Clone, Debug)]
pub struct BattleManager {
    board: Board,
    rules: RuleSet,
    config: GameConfig,
    players: Vec<Player>,
    current: usize,
    turn: u32,
    phase: Phase,
    selected: Option<UnitId>,
    positions: GridPositionGenerator,
    combat: StandardCombat,
}

impl BattleManager {
    pub fn new(board: Board, rules: RuleSet, players: Vec<Player>, config: GameConfig) -> Self {
        Self {
            board,
            rules,
            config,
            players,
            current: 0,
            turn: 1,
            phase: Phase::Select,
            selected: None,
            positions: GridPositionGenerator::new(),
            combat: StandardCombat::new(),
        }
    }

    /// Round counter, incremented each time play wraps to the first player.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn player_mut(&mut self, team: TeamId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.team == team)
    }

    /// Places a unit of the given catalog type for `team`.
    pub fn deploy(
        &mut self,
        unit_type: UnitTypeId,
        team: TeamId,
        position: Position,
    ) -> Result<UnitId, CommandError> {
        if !self.board.contains(position) {
            return Err(CommandError::OutOfBounds(position));
        }
        if self.board.is_occupied(position) {
            return Err(CommandError::InvalidTarget(position));
        }
        let sample = self
            .rules
            .sample(unit_type)
            .ok_or(CommandError::UnknownUnitType(unit_type))?;
        let id = self.board.next_unit_id();
        self.board.add_unit(sample.spawn(id, team, position));
        Ok(id)
    }

    /// Surviving alliance once every other alliance has been wiped out.
    pub fn winner(&self) -> Option<u8> {
        if self.phase != Phase::GameOver {
            return None;
        }
        self.board.units().first().and_then(|unit| {
            self.player(unit.team).map(|player| player.alliance)
        })
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), CommandError> {
        if self.phase == Phase::GameOver {
            return Err(CommandError::GameOver);
        }
        if self.phase != expected {
            return Err(CommandError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn selected(&self) -> Result<Unit, CommandError> {
        self.selected
            .and_then(|id| self.board.unit(id))
            .cloned()
            .ok_or(CommandError::NoSelectedUnit)
    }

    /// Closes the selected unit's activation.
    fn finish_activation(&mut self, id: UnitId) {
        if let Some(unit) = self.board.unit_mut(id) {
            unit.standby = true;
        }
        self.selected = None;
        self.phase = Phase::Select;
    }

    fn kill(&mut self, id: UnitId) {
        if let Some(unit) = self.board.remove_unit(id) {
            debug!(unit = %unit.id, position = %unit.position, "unit destroyed");
            if !unit.has_ability(Ability::Undead) {
                self.board.add_tomb(unit.position);
            }
        }
    }

    fn check_game_over(&mut self) {
        let mut alliances = self
            .board
            .units()
            .iter()
            .filter_map(|unit| self.player(unit.team).map(|player| player.alliance));
        let Some(first) = alliances.next() else {
            self.phase = Phase::GameOver;
            return;
        };
        if alliances.all(|alliance| alliance == first) {
            info!(alliance = first, "battle decided");
            self.phase = Phase::GameOver;
        }
    }

    fn income(&self, team: TeamId) -> i32 {
        let castles = self.board.castle_positions_of(team).len() as i32;
        let villages = self
            .board
            .village_positions()
            .into_iter()
            .filter(|&position| self.board.tile(position).and_then(|tile| tile.team) == Some(team))
            .count() as i32;
        castles * self.config.castle_income + villages * self.config.village_income
    }

    /// Upkeep for the team whose turn begins: income, terrain heal, poison.
    fn begin_turn(&mut self, team: TeamId) {
        let income = self.income(team);
        if let Some(player) = self.player_mut(team) {
            player.gold += income;
        }

        let poison = self.config.poison_damage;
        let heals: Vec<(UnitId, i32)> = self
            .board
            .units_of(team)
            .map(|unit| {
                let heal = self
                    .board
                    .tile(unit.position)
                    .map(|tile| self.combat.terrain_heal(unit, tile))
                    .unwrap_or(0);
                (unit.id, heal)
            })
            .collect();

        for (id, heal) in heals {
            if let Some(unit) = self.board.unit_mut(id) {
                unit.standby = false;
                if unit.status == Some(StatusKind::Poisoned) {
                    // Poison never kills on its own.
                    unit.current_hp = (unit.current_hp - poison).max(1);
                } else {
                    unit.change_current_hp(heal);
                }
                unit.status = None;
            }
        }
        info!(%team, gold = self.gold(team), income, "turn started");
    }
}

impl GameManager for BattleManager {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn current_team(&self) -> TeamId {
        self.players
            .get(self.current)
            .map(|player| player.team)
            .unwrap_or_default()
    }

    fn selected_unit(&self) -> Option<&Unit> {
        self.selected.and_then(|id| self.board.unit(id))
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn positions(&self) -> &dyn PositionGenerator {
        &self.positions
    }

    fn combat(&self) -> &dyn CombatEvaluator {
        &self.combat
    }

    fn player(&self, team: TeamId) -> Option<&Player> {
        self.players.iter().find(|player| player.team == team)
    }

    fn select(&mut self, position: Position) -> Result<(), CommandError> {
        self.expect_phase(Phase::Select)?;
        let team = self.current_team();
        let unit = self
            .board
            .unit_at(position)
            .filter(|unit| unit.team == team && !unit.standby)
            .ok_or(CommandError::NotSelectable { team, position })?;
        debug!(unit = %unit.id, %position, "unit selected");
        self.selected = Some(unit.id);
        self.phase = Phase::Move;
        Ok(())
    }

    fn move_to(&mut self, position: Position) -> Result<(), CommandError> {
        if self.phase != Phase::Remove {
            self.expect_phase(Phase::Move)?;
        }
        let unit = self.selected()?;
        if !self
            .positions
            .movable_positions(&self.board, &unit)
            .contains(&position)
        {
            return Err(CommandError::Unreachable(position));
        }
        if let Some(live) = self.board.unit_mut(unit.id) {
            live.position = position;
        }
        if self.phase == Phase::Remove {
            self.finish_activation(unit.id);
        } else {
            self.phase = Phase::Act;
        }
        Ok(())
    }

    fn occupy(&mut self) -> Result<(), CommandError> {
        self.expect_phase(Phase::Act)?;
        let unit = self.selected()?;
        if !self.can_occupy(&unit, unit.position) {
            return Err(CommandError::InvalidTarget(unit.position));
        }
        self.board.set_owner(unit.position, Some(unit.team));
        debug!(unit = %unit.id, position = %unit.position, "structure occupied");
        self.finish_activation(unit.id);
        Ok(())
    }

    fn repair(&mut self) -> Result<(), CommandError> {
        self.expect_phase(Phase::Act)?;
        let unit = self.selected()?;
        if !self.can_repair(&unit, unit.position) {
            return Err(CommandError::InvalidTarget(unit.position));
        }
        self.board
            .set_tile(unit.position, Tile::new(TileKind::Village));
        self.finish_activation(unit.id);
        Ok(())
    }

    fn attack(&mut self, target: Position) -> Result<(), CommandError> {
        self.expect_phase(Phase::Act)?;
        let attacker = self.selected()?;
        if !attacker.in_attack_range(attacker.position.distance(target)) {
            return Err(CommandError::InvalidTarget(target));
        }

        match self.board.unit_at(target).cloned() {
            Some(mut defender) if self.is_enemy(attacker.team, defender.team) => {
                let mut attacker = attacker;
                let damage = self.combat.damage(&self.board, &attacker, &defender);
                defender.change_current_hp(-damage);
                if defender.status.is_none() {
                    self.combat.attach_attack_status(&attacker, &mut defender);
                }
                debug!(attacker = %attacker.id, defender = %defender.id, damage, "attack resolved");

                if self.can_counter(&attacker, &defender) {
                    let counter = self.combat.damage(&self.board, &defender, &attacker);
                    attacker.change_current_hp(-counter);
                    if attacker.status.is_none() {
                        self.combat.attach_attack_status(&defender, &mut attacker);
                    }
                    debug!(unit = %defender.id, damage = counter, "counter attack");
                }

                for snapshot in [&defender, &attacker] {
                    if let Some(live) = self.board.unit_mut(snapshot.id) {
                        live.current_hp = snapshot.current_hp;
                        live.status = snapshot.status;
                    }
                }
                if defender.is_dead() {
                    self.kill(defender.id);
                }
                if attacker.is_dead() {
                    self.kill(attacker.id);
                    self.selected = None;
                    self.phase = Phase::Select;
                } else if attacker.has_ability(Ability::HitAndRun) {
                    self.phase = Phase::Remove;
                } else {
                    self.finish_activation(attacker.id);
                }
                self.check_game_over();
                Ok(())
            }
            Some(_) => Err(CommandError::InvalidTarget(target)),
            None => {
                let razable = attacker.has_ability(Ability::Destroyer)
                    && self
                        .board
                        .tile(target)
                        .is_some_and(|tile| {
                            tile.is_village() && self.is_enemy_owner(attacker.team, tile.team)
                        });
                if !razable {
                    return Err(CommandError::InvalidTarget(target));
                }
                self.board.set_tile(target, Tile::new(TileKind::Ruins));
                debug!(unit = %attacker.id, position = %target, "village razed");
                self.finish_activation(attacker.id);
                Ok(())
            }
        }
    }

    fn heal(&mut self, target: Position) -> Result<(), CommandError> {
        self.expect_phase(Phase::Act)?;
        let healer = self.selected()?;
        let patient = self
            .board
            .unit_at(target)
            .cloned()
            .ok_or(CommandError::InvalidTarget(target))?;
        if !self.can_heal(&healer, &patient) {
            return Err(CommandError::InvalidTarget(target));
        }
        let amount = self.config.heal_amount;
        if let Some(live) = self.board.unit_mut(patient.id) {
            live.change_current_hp(amount);
        }
        self.finish_activation(healer.id);
        Ok(())
    }

    fn summon(&mut self, target: Position) -> Result<(), CommandError> {
        self.expect_phase(Phase::Act)?;
        let necromancer = self.selected()?;
        let skeleton = self
            .rules
            .skeleton_type()
            .and_then(|type_id| self.rules.sample(type_id))
            .cloned();
        let valid = necromancer.has_ability(Ability::Necromancer)
            && self.board.is_tomb(target)
            && !self.board.is_occupied(target)
            && necromancer.in_attack_range(necromancer.position.distance(target));
        let Some(skeleton) = skeleton.filter(|_| valid) else {
            return Err(CommandError::InvalidTarget(target));
        };

        let id = self.board.next_unit_id();
        let mut raised = skeleton.spawn(id, necromancer.team, target);
        raised.standby = true;
        self.board.remove_tomb(target);
        self.board.add_unit(raised);
        self.finish_activation(necromancer.id);
        Ok(())
    }

    fn standby(&mut self) -> Result<(), CommandError> {
        self.expect_phase(Phase::Act)?;
        let unit = self.selected()?;
        self.finish_activation(unit.id);
        Ok(())
    }

    fn end_turn(&mut self) -> Result<(), CommandError> {
        self.expect_phase(Phase::Select)?;
        if self.players.is_empty() {
            return Err(CommandError::GameOver);
        }
        let ended = self.current_team();
        self.current = (self.current + 1) % self.players.len();
        if self.current == 0 {
            self.turn += 1;
        }
        self.selected = None;
        info!(team = %ended, turn = self.turn, "turn ended");
        let next = self.current_team();
        self.begin_turn(next);
        Ok(())
    }

    fn buy_unit(&mut self, unit_type: UnitTypeId, castle: Position) -> Result<(), CommandError> {
        self.expect_phase(Phase::Select)?;
        let team = self.current_team();
        if !self.rules.is_available(unit_type) {
            return Err(CommandError::UnknownUnitType(unit_type));
        }
        if !self.can_buy(unit_type, team, castle) {
            return Err(CommandError::CannotBuy {
                team,
                unit_type,
                position: castle,
            });
        }
        let spawn = self
            .spawn_position(team, castle)
            .ok_or(CommandError::CannotBuy {
                team,
                unit_type,
                position: castle,
            })?;
        let price = self.unit_price(unit_type, team);
        let sample = self
            .rules
            .sample(unit_type)
            .ok_or(CommandError::UnknownUnitType(unit_type))?;

        let id = self.board.next_unit_id();
        let mut recruit = sample.spawn(id, team, spawn);
        recruit.standby = true;
        self.board.add_unit(recruit);
        if let Some(player) = self.player_mut(team) {
            player.gold -= price;
        }
        debug!(%team, unit = %id, ?unit_type, position = %spawn, price, "unit recruited");
        Ok(())
    }
}
