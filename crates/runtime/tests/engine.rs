use std::collections::HashSet;

use game_core::{
    Ability, BattleManager, Board, GameConfig, GameManager, Phase, Player, Position, RuleSet,
    TeamId, UnitTypeId,
};
use runtime::engine::scoring::{action_score, attack_exchange_score, standby_score};
use runtime::engine::{AbilityIndex, RobotContext};
use runtime::{Action, OperationKind, StepOutcome, ThreatMap, TurnPhaseController};

const RED: TeamId = TeamId(0);
const BLUE: TeamId = TeamId(1);

fn battle(rows: &[&str], gold: i32) -> BattleManager {
    let board = Board::from_rows(rows).expect("valid board");
    let players = vec![Player::new(RED, 0, gold), Player::new(BLUE, 1, gold)];
    BattleManager::new(board, RuleSet::standard(), players, GameConfig::default())
}

/// Runs `f` with a red context built the way the controller prepares a turn.
fn with_red_ctx<R>(game: &BattleManager, f: impl FnOnce(&RobotContext<'_>) -> R) -> R {
    let threats = ThreatMap::build(game, RED);
    let abilities = AbilityIndex::build(game.rules());
    let assigned = HashSet::new();
    let ctx = RobotContext {
        manager: game,
        team: RED,
        threats: &threats,
        assigned: &assigned,
        abilities: &abilities,
    };
    f(&ctx)
}

fn step(controller: &mut TurnPhaseController, game: &mut BattleManager) -> StepOutcome {
    controller.step(game).expect("step succeeds")
}

#[test]
fn unit_without_candidates_stands_by() {
    let mut game = battle(&[".........."], 0);
    game.deploy(UnitTypeId(1), RED, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(1), BLUE, Position::new(9, 0)).unwrap();
    let mut controller = TurnPhaseController::new();

    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Selected(Position::new(0, 0))
    );
    let StepOutcome::Planned(action) = step(&mut controller, &mut game) else {
        panic!("expected a planned action");
    };
    assert_eq!(action.kind(), OperationKind::Standby);
    assert!(controller.threats().is_empty());
}

#[test]
fn counter_attacks_lower_the_exchange_score() {
    let mut game = battle(&["....."], 0);
    game.deploy(UnitTypeId(0), RED, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(4), BLUE, Position::new(1, 0)).unwrap();

    with_red_ctx(&game, |ctx| {
        let board = ctx.board();
        let attacker = board.unit_at(Position::new(0, 0)).unwrap();
        let defender = board.unit_at(Position::new(1, 0)).unwrap();

        let mut helpless = defender.clone();
        helpless.abilities.push(Ability::HeavyMachine);

        let countered = attack_exchange_score(ctx, attacker, defender);
        let free = attack_exchange_score(ctx, attacker, &helpless);
        assert!(countered < free);
    });
}

#[test]
fn standby_score_is_pure() {
    let mut game = battle(&["C.V..", ".....", "....."], 0);
    game.board_mut().set_owner(Position::new(0, 0), Some(RED));
    game.deploy(UnitTypeId(6), RED, Position::new(1, 1)).unwrap();
    game.deploy(UnitTypeId(0), RED, Position::new(2, 1)).unwrap();
    game.deploy(UnitTypeId(4), BLUE, Position::new(4, 2)).unwrap();

    with_red_ctx(&game, |ctx| {
        let unit = ctx.board().unit_at(Position::new(1, 1)).unwrap();
        for position in ctx.board().positions() {
            assert_eq!(
                standby_score(ctx, unit, position),
                standby_score(ctx, unit, position)
            );
        }
    });
}

#[test]
fn killing_blow_is_planned_and_ends_the_battle() {
    let mut game = battle(&["......"], 0);
    game.deploy(UnitTypeId(0), RED, Position::new(0, 0)).unwrap();
    let victim = game.deploy(UnitTypeId(1), BLUE, Position::new(1, 0)).unwrap();
    {
        let victim = game.board_mut().unit_mut(victim).unwrap();
        victim.current_hp = 10;
        victim.price = 200;
    }

    let attack = Action::new(
        Position::new(0, 0),
        Position::new(1, 0),
        OperationKind::Attack,
    );
    with_red_ctx(&game, |ctx| {
        let unit = ctx.board().unit_at(Position::new(0, 0)).unwrap();
        let positional = standby_score(ctx, unit, Position::new(0, 0));
        // Kill value 200 * 10 plus the price bonus 200 / 20; no counter.
        assert_eq!(action_score(ctx, unit, &attack) - positional, 2010);
    });

    let mut controller = TurnPhaseController::new();
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Selected(Position::new(0, 0))
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Planned(attack)
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Moved(Position::new(0, 0))
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Acted(OperationKind::Attack)
    );
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Idle(Phase::GameOver)
    );
}

#[test]
fn idle_roster_recruits_at_the_castle() {
    let mut game = battle(&["C.........", ".........."], 150);
    game.board_mut().set_owner(Position::new(0, 0), Some(RED));
    let commander = game.deploy(UnitTypeId(4), RED, Position::new(1, 1)).unwrap();
    game.board_mut().unit_mut(commander).unwrap().standby = true;
    game.deploy(UnitTypeId(1), BLUE, Position::new(9, 1)).unwrap();

    let mut controller = TurnPhaseController::new();
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Recruited {
            unit_type: UnitTypeId(0),
            position: Position::new(0, 0),
        }
    );
    assert_eq!(game.gold(RED), 0);
    assert!(game.board().unit_at(Position::new(0, 0)).unwrap().standby);

    // Nothing left to activate or afford.
    assert_eq!(step(&mut controller, &mut game), StepOutcome::TurnEnded);
}

#[test]
fn threatened_castle_garrison_holds_its_ground() {
    let mut game = battle(&["C~~~", "~~~~", "~~~."], 0);
    game.board_mut().set_owner(Position::new(0, 0), Some(RED));
    game.deploy(UnitTypeId(1), RED, Position::new(0, 0)).unwrap();
    let raider = game.deploy(UnitTypeId(4), BLUE, Position::new(3, 2)).unwrap();
    game.board_mut()
        .unit_mut(raider)
        .unwrap()
        .abilities
        .push(Ability::AirForce);

    let mut controller = TurnPhaseController::new();
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Selected(Position::new(0, 0))
    );
    assert!(controller.threats().is_threatened(Position::new(0, 0)));
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Planned(Action::standby(Position::new(0, 0)))
    );
}

#[test]
fn full_turn_hands_play_to_the_next_team() {
    let mut game = battle(&["........", "........"], 0);
    game.deploy(UnitTypeId(1), RED, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(4), BLUE, Position::new(7, 1)).unwrap();

    let mut controller = TurnPhaseController::new();
    let mut ended = false;
    for _ in 0..10 {
        if step(&mut controller, &mut game) == StepOutcome::TurnEnded {
            ended = true;
            break;
        }
    }
    assert!(ended, "turn never ended");
    assert!(!controller.is_prepared());
    assert_eq!(game.current_team(), BLUE);
    assert_eq!(game.phase(), Phase::Select);
}

#[test]
fn act_phase_without_pending_action_stands_by() {
    let mut game = battle(&["....."], 0);
    game.deploy(UnitTypeId(0), RED, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(0), BLUE, Position::new(4, 0)).unwrap();
    game.select(Position::new(0, 0)).unwrap();
    game.move_to(Position::new(1, 0)).unwrap();

    let mut controller = TurnPhaseController::new();
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Acted(OperationKind::Standby)
    );
    assert_eq!(game.phase(), Phase::Select);
    assert!(game.board().unit_at(Position::new(1, 0)).unwrap().standby);
}

#[test]
fn hit_and_run_units_reposition_after_attacking() {
    let mut game = battle(&["......", "......"], 0);
    game.deploy(UnitTypeId(9), RED, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(6), BLUE, Position::new(3, 0)).unwrap();

    let mut controller = TurnPhaseController::new();
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Selected(Position::new(0, 0))
    );
    let StepOutcome::Planned(action) = step(&mut controller, &mut game) else {
        panic!("expected a planned action");
    };
    assert_eq!(action.kind(), OperationKind::Attack);
    assert_eq!(action.target(), Position::new(3, 0));
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Moved(action.origin())
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Acted(OperationKind::Attack)
    );
    assert_eq!(game.phase(), Phase::Remove);

    let StepOutcome::Repositioned(position) = step(&mut controller, &mut game) else {
        panic!("expected a repositioning");
    };
    assert_eq!(game.phase(), Phase::Select);
    let raider = game.board().unit_at(position).unwrap();
    assert_eq!(raider.team, RED);
    assert!(raider.standby);
}

#[test]
fn repair_claims_its_origin_for_the_turn() {
    let mut game = battle(&["R....", "....."], 0);
    game.deploy(UnitTypeId(7), RED, Position::new(1, 0)).unwrap();
    game.deploy(UnitTypeId(0), BLUE, Position::new(4, 1)).unwrap();

    let mut controller = TurnPhaseController::new();
    step(&mut controller, &mut game);
    let StepOutcome::Planned(action) = step(&mut controller, &mut game) else {
        panic!("expected a planned action");
    };
    assert_eq!(
        action,
        Action::new(Position::new(0, 0), Position::new(0, 0), OperationKind::Repair)
    );
    assert!(controller.assigned().contains(&Position::new(0, 0)));
}

#[test]
fn static_units_fire_without_moving() {
    let mut game = battle(&["....."], 0);
    let turret = game.deploy(UnitTypeId(1), RED, Position::new(2, 0)).unwrap();
    game.board_mut().unit_mut(turret).unwrap().movement_point = 0;
    game.deploy(UnitTypeId(0), BLUE, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(0), BLUE, Position::new(4, 0)).unwrap();
    let mut controller = TurnPhaseController::new();

    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Selected(Position::new(2, 0))
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Planned(Action::new(
            Position::new(2, 0),
            Position::new(0, 0),
            OperationKind::Attack
        ))
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Moved(Position::new(2, 0))
    );
    assert_eq!(
        step(&mut controller, &mut game),
        StepOutcome::Acted(OperationKind::Attack)
    );
    let target = game.board().unit_at(Position::new(0, 0)).unwrap();
    assert!(target.current_hp < target.max_hp);
}
