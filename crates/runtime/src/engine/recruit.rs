//! Recruitment decisions made once no unit is left to activate.

use game_core::{Ability, AttackType, Position, Unit, UnitTypeId};
use tracing::debug;

use super::context::RobotContext;
use super::scoring::mobility;

/// Ability wishes checked in priority order.
const ABILITY_PRIORITY: [Ability; 5] = [
    Ability::Conqueror,
    Ability::Necromancer,
    Ability::Healer,
    Ability::RefreshAura,
    Ability::Marksman,
];

const CONQUEROR_TARGET: usize = 4;
const MARKSMAN_TARGET: usize = 2;
const UNHEALTHY_THRESHOLD: usize = 5;

/// Averages over the enemy roster that shape the shopping list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyProfile {
    pub physical_defence: i32,
    pub magic_defence: i32,
    /// Average mobility plus one; recruits should out-range the enemy.
    pub mobility_floor: i32,
}

impl EnemyProfile {
    pub fn survey(ctx: &RobotContext<'_>) -> Self {
        let mut count = 0;
        let (mut physical, mut magic, mut reach) = (0, 0, 0);
        for unit in ctx.board().units() {
            if ctx.is_enemy(Some(unit)) {
                count += 1;
                physical += unit.physical_defence;
                magic += unit.magic_defence;
                reach += mobility(unit);
            }
        }
        let average = |total: i32| if count > 0 { total / count } else { 0 };
        Self {
            physical_defence: average(physical),
            magic_defence: average(magic),
            mobility_floor: average(reach) + 1,
        }
    }

    /// Attack channel the enemy defends worse against; ties go physical.
    pub fn preferred_attack_type(&self) -> AttackType {
        if self.physical_defence <= self.magic_defence {
            AttackType::Physical
        } else {
            AttackType::Magic
        }
    }
}

/// Chooses what to buy and where.
pub struct RecruitmentPlanner;

impl RecruitmentPlanner {
    /// Unit type and castle for the next purchase, or `None` when nothing
    /// should or can be bought.
    ///
    /// A returned pair always passes the manager's purchase check, so its
    /// price never exceeds the team's gold.
    pub fn plan(ctx: &RobotContext<'_>) -> Option<(UnitTypeId, Position)> {
        let castle = Self::recruit_position(ctx)?;
        let manager = ctx.manager;
        let rules = manager.rules();

        let commander_type = rules.commander_type();
        if !manager.is_commander_alive(ctx.team)
            && manager.unit_price(commander_type, ctx.team) <= ctx.gold()
        {
            return Self::checked(ctx, commander_type, castle);
        }

        let profile = EnemyProfile::survey(ctx);
        let ability = Self::preferred_ability(ctx);
        let unit_type = Self::preferred_recruitment(ctx, castle, &profile, ability)?;
        debug!(
            team = %ctx.team,
            ?ability,
            attack_type = %profile.preferred_attack_type(),
            mobility_floor = profile.mobility_floor,
            unit_type = unit_type.0,
            position = %castle,
            "recruitment chosen"
        );
        Self::checked(ctx, unit_type, castle)
    }

    fn checked(
        ctx: &RobotContext<'_>,
        unit_type: UnitTypeId,
        castle: Position,
    ) -> Option<(UnitTypeId, Position)> {
        ctx.manager
            .can_buy(unit_type, ctx.team, castle)
            .then_some((unit_type, castle))
    }

    /// Own castle that is empty or garrisoned by the own commander.
    fn is_castle_available(ctx: &RobotContext<'_>, position: Position) -> bool {
        let board = ctx.board();
        ctx.is_my_castle(board.tile(position))
            && board
                .unit_at(position)
                .is_none_or(|unit| ctx.is_my_commander(unit))
    }

    /// First threatened available castle, else the available castle farthest
    /// from the enemy on average (ties keep the earlier castle).
    pub fn recruit_position(ctx: &RobotContext<'_>) -> Option<Position> {
        let mut preferred: Option<(Position, i32)> = None;
        for castle in ctx.board().castle_positions_of(ctx.team) {
            if !Self::is_castle_available(ctx, castle) {
                continue;
            }
            if ctx.is_threatened(castle) {
                return Some(castle);
            }
            let distance = ctx.average_enemy_distance(castle);
            match preferred {
                Some((_, best)) if distance <= best => {}
                _ => preferred = Some((castle, distance)),
            }
        }
        preferred.map(|(castle, _)| castle)
    }

    /// Highest-priority ability the roster is missing, if any.
    pub fn preferred_ability(ctx: &RobotContext<'_>) -> Option<Ability> {
        let (manager, team) = (ctx.manager, ctx.team);
        let board = ctx.board();
        let allies = move || {
            board
                .units()
                .iter()
                .filter(move |unit| manager.is_ally(team, unit.team))
        };
        let allied_with = |ability: Ability| {
            allies()
                .filter(|unit| unit.has_ability(ability))
                .count()
        };
        let recruitable = |ability: Ability| ctx.abilities.contains(ability);

        ABILITY_PRIORITY.into_iter().find(|&ability| match ability {
            Ability::Conqueror => allied_with(ability) < CONQUEROR_TARGET,
            Ability::Necromancer => {
                board.tombs().len() > 1 && allied_with(ability) == 0 && recruitable(ability)
            }
            Ability::Healer => allied_with(ability) == 0 && recruitable(ability),
            Ability::RefreshAura => {
                allies().filter(|unit| is_unhealthy(unit)).count() >= UNHEALTHY_THRESHOLD
                    && allied_with(ability) == 0
                    && recruitable(ability)
            }
            Ability::Marksman => {
                let enemy_air = board
                    .units()
                    .iter()
                    .any(|unit| ctx.is_enemy(Some(unit)) && unit.has_ability(Ability::AirForce));
                enemy_air && allied_with(ability) < MARKSMAN_TARGET && recruitable(ability)
            }
            _ => false,
        })
    }

    /// Unit type to buy at `castle` before the purchase check.
    pub fn preferred_recruitment(
        ctx: &RobotContext<'_>,
        castle: Position,
        profile: &EnemyProfile,
        ability: Option<Ability>,
    ) -> Option<UnitTypeId> {
        let rules = ctx.manager.rules();
        let available = rules.available_units();

        if ctx.board().unit_at(castle).is_none()
            && ctx.is_threatened(castle)
            && ctx.gold() < ctx.second_cheapest_unit_price()
        {
            debug!(team = %ctx.team, position = %castle, "emergency recruitment");
            return available.first().copied();
        }

        match ability.filter(|&ability| ctx.abilities.contains(ability)) {
            Some(ability) => {
                Self::with_ability(ctx, ctx.abilities.types_with(ability), profile.mobility_floor)
            }
            None => Self::strongest_affordable(ctx, available, profile),
        }
    }

    /// Sample a unit type would be recruited as; the commander type resolves
    /// to this team's commander. `None` while that commander still lives.
    fn candidate(ctx: &RobotContext<'_>, unit_type: UnitTypeId) -> Option<Unit> {
        let manager = ctx.manager;
        if manager.rules().is_commander_type(unit_type) {
            if manager.is_commander_alive(ctx.team) {
                return None;
            }
            return manager.commander_of(ctx.team);
        }
        manager.rules().sample(unit_type).cloned()
    }

    /// First type with the ability, upgraded once to the first one that
    /// reaches the mobility floor.
    fn with_ability(
        ctx: &RobotContext<'_>,
        types: &[UnitTypeId],
        mobility_floor: i32,
    ) -> Option<UnitTypeId> {
        let mut preferred = None;
        let mut floor_reached = false;
        for &unit_type in types {
            let Some(sample) = Self::candidate(ctx, unit_type) else {
                continue;
            };
            let reaches = mobility(&sample) >= mobility_floor;
            if preferred.is_none() || (!floor_reached && reaches) {
                preferred = Some(unit_type);
                floor_reached = reaches;
            }
        }
        preferred
    }

    /// Most expensive affordable type of the preferred attack channel that
    /// reaches the mobility floor.
    fn strongest_affordable(
        ctx: &RobotContext<'_>,
        available: &[UnitTypeId],
        profile: &EnemyProfile,
    ) -> Option<UnitTypeId> {
        let gold = ctx.gold();
        let attack_type = profile.preferred_attack_type();
        let mut preferred = None;
        let mut max_price = i32::MIN;
        for &unit_type in available {
            let Some(sample) = Self::candidate(ctx, unit_type) else {
                continue;
            };
            if sample.attack_type == attack_type
                && sample.price <= gold
                && mobility(&sample) >= profile.mobility_floor
                && sample.price > max_price
            {
                max_price = sample.price;
                preferred = Some(unit_type);
            }
        }
        preferred
    }
}

/// Damaged or carrying a harmful status.
fn is_unhealthy(unit: &Unit) -> bool {
    unit.current_hp < unit.max_hp || unit.status.is_some_and(|status| status.is_debuff())
}
