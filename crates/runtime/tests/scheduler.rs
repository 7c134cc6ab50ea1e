use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use game_core::{
    BattleManager, Board, CombatEvaluator, CommandError, GameConfig, GameManager, Phase, Player,
    Position, PositionGenerator, RuleSet, TeamId, Unit, UnitTypeId,
};
use runtime::{Robot, RobotConfig, RuntimeError, SharedManager};

const RED: TeamId = TeamId(0);
const BLUE: TeamId = TeamId(1);

fn battle() -> BattleManager {
    let board = Board::from_rows(&["........", "........"]).expect("valid board");
    let players = vec![Player::new(RED, 0, 0), Player::new(BLUE, 1, 0)];
    let mut game = BattleManager::new(board, RuleSet::standard(), players, GameConfig::default());
    game.deploy(UnitTypeId(1), RED, Position::new(0, 0)).unwrap();
    game.deploy(UnitTypeId(0), RED, Position::new(0, 1)).unwrap();
    game.deploy(UnitTypeId(4), BLUE, Position::new(7, 1)).unwrap();
    game
}

fn skirmish() -> SharedManager<BattleManager> {
    Arc::new(Mutex::new(battle()))
}

fn config(settle_delay: Duration) -> RobotConfig {
    RobotConfig {
        settle_delay,
        ..RobotConfig::default()
    }
}

async fn wait_until_idle(robot: &Robot) {
    let handle = robot.handle();
    for _ in 0..1000 {
        if !handle.is_calculating() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("step never finished");
}

#[tokio::test]
async fn requested_steps_play_out_a_whole_turn() {
    let manager = skirmish();
    let robot = Robot::spawn(Arc::clone(&manager), config(Duration::ZERO));
    let handle = robot.handle();
    handle.initialize_for_turn().await.unwrap();

    for _ in 0..50 {
        if handle.metrics().turns_ended >= 1 {
            break;
        }
        assert!(handle.request_step().await.unwrap());
        wait_until_idle(&robot).await;
    }

    let metrics = handle.metrics();
    assert_eq!(metrics.turns_ended, 1);
    assert_eq!(metrics.steps_failed, 0);
    assert_eq!(metrics.actions_submitted, 2);
    assert!(metrics.steps_completed >= 9);
    assert_eq!(manager.lock().unwrap().current_team(), BLUE);

    robot.shutdown().await.unwrap();
}

#[tokio::test]
async fn requests_are_dropped_while_a_step_is_in_flight() {
    let robot = Robot::spawn(skirmish(), config(Duration::from_secs(10)));
    let handle = robot.handle();

    assert!(handle.request_step().await.unwrap());
    assert!(!handle.request_step().await.unwrap());
    assert!(handle.is_calculating());

    robot.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_abandons_a_settling_step() {
    let manager = skirmish();
    let robot = Robot::spawn(Arc::clone(&manager), config(Duration::from_secs(10)));
    let handle = robot.handle();

    assert!(handle.request_step().await.unwrap());
    robot.shutdown().await.unwrap();

    assert!(!handle.is_calculating());
    assert_eq!(handle.metrics().steps_completed, 0);
    let game = manager.lock().unwrap();
    assert_eq!(game.phase(), Phase::Select);
    assert!(game.selected_unit().is_none());
    drop(game);

    assert!(matches!(
        handle.request_step().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
    assert!(!handle.is_calculating());
}

#[tokio::test]
async fn host_poisoned_lock_fails_steps_until_cleared() {
    let manager = skirmish();
    let poisoner = Arc::clone(&manager);
    let _ = thread::spawn(move || {
        let _guard = poisoner.lock().unwrap();
        panic!("host crashed while holding the game");
    })
    .join();

    let robot = Robot::spawn(Arc::clone(&manager), config(Duration::ZERO));
    let handle = robot.handle();

    assert!(matches!(
        handle.initialize_for_turn().await,
        Err(RuntimeError::ManagerPoisoned)
    ));

    assert!(handle.request_step().await.unwrap());
    wait_until_idle(&robot).await;

    let metrics = handle.metrics();
    assert_eq!(metrics.steps_failed, 1);
    assert_eq!(metrics.steps_completed, 0);
    assert!(!handle.is_calculating());

    manager.clear_poison();
    handle.initialize_for_turn().await.unwrap();
    assert!(handle.request_step().await.unwrap());
    wait_until_idle(&robot).await;
    assert_eq!(handle.metrics().steps_completed, 1);

    robot.shutdown().await.unwrap();
}

/// Forwards to a [`BattleManager`] but panics on the first phase query.
struct Flaky {
    inner: BattleManager,
    tripped: AtomicBool,
}

impl GameManager for Flaky {
    fn phase(&self) -> Phase {
        if !self.tripped.swap(true, Ordering::Relaxed) {
            panic!("transient fault in phase query");
        }
        self.inner.phase()
    }

    fn current_team(&self) -> TeamId {
        self.inner.current_team()
    }

    fn selected_unit(&self) -> Option<&Unit> {
        self.inner.selected_unit()
    }

    fn board(&self) -> &Board {
        self.inner.board()
    }

    fn rules(&self) -> &RuleSet {
        self.inner.rules()
    }

    fn positions(&self) -> &dyn PositionGenerator {
        self.inner.positions()
    }

    fn combat(&self) -> &dyn CombatEvaluator {
        self.inner.combat()
    }

    fn player(&self, team: TeamId) -> Option<&Player> {
        self.inner.player(team)
    }

    fn select(&mut self, position: Position) -> Result<(), CommandError> {
        self.inner.select(position)
    }

    fn move_to(&mut self, position: Position) -> Result<(), CommandError> {
        self.inner.move_to(position)
    }

    fn occupy(&mut self) -> Result<(), CommandError> {
        self.inner.occupy()
    }

    fn repair(&mut self) -> Result<(), CommandError> {
        self.inner.repair()
    }

    fn attack(&mut self, target: Position) -> Result<(), CommandError> {
        self.inner.attack(target)
    }

    fn heal(&mut self, target: Position) -> Result<(), CommandError> {
        self.inner.heal(target)
    }

    fn summon(&mut self, target: Position) -> Result<(), CommandError> {
        self.inner.summon(target)
    }

    fn standby(&mut self) -> Result<(), CommandError> {
        self.inner.standby()
    }

    fn end_turn(&mut self) -> Result<(), CommandError> {
        self.inner.end_turn()
    }

    fn buy_unit(&mut self, unit_type: UnitTypeId, castle: Position) -> Result<(), CommandError> {
        self.inner.buy_unit(unit_type, castle)
    }
}

#[tokio::test]
async fn robot_recovers_after_a_panicking_step() {
    let manager = Arc::new(Mutex::new(Flaky {
        inner: battle(),
        tripped: AtomicBool::new(false),
    }));
    let robot = Robot::spawn(Arc::clone(&manager), config(Duration::ZERO));
    let handle = robot.handle();
    handle.initialize_for_turn().await.unwrap();

    for _ in 0..5 {
        assert!(handle.request_step().await.unwrap());
        wait_until_idle(&robot).await;
    }

    let metrics = handle.metrics();
    assert_eq!(metrics.steps_failed, 1);
    assert_eq!(metrics.steps_completed, 4);
    assert!(!manager.is_poisoned());
    assert_eq!(manager.lock().unwrap().current_team(), RED);

    robot.shutdown().await.unwrap();
}
