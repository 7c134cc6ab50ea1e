//! Built-in skirmish map.

use anyhow::Result;
use game_core::{
    BattleManager, Board, GameConfig, Player, Position, RuleSet, TeamId, UnitTypeId,
};

pub const RED: TeamId = TeamId(0);
pub const BLUE: TeamId = TeamId(1);

const STARTING_GOLD: i32 = 300;

const MAP: [&str; 8] = [
    "C...f....V..",
    "..ff..h.....",
    ".V....hh..V.",
    "....~~~~....",
    "....~~~~R...",
    ".V..hh....V.",
    ".....h..ff..",
    "..V.....f..C",
];

/// Two commanders and a conqueror each, facing off across a lake.
pub fn skirmish() -> Result<BattleManager> {
    let mut board = Board::from_rows(&MAP)?;
    let red_castle = Position::new(0, 0);
    let blue_castle = Position::new(11, 7);
    board.set_owner(red_castle, Some(RED));
    board.set_owner(blue_castle, Some(BLUE));

    let players = vec![
        Player::new(RED, 0, STARTING_GOLD),
        Player::new(BLUE, 1, STARTING_GOLD),
    ];
    let rules = RuleSet::standard();
    let commander = rules.commander_type();
    let mut game = BattleManager::new(board, rules, players, GameConfig::default());

    game.deploy(commander, RED, red_castle)?;
    game.deploy(UnitTypeId(0), RED, Position::new(1, 1))?;
    game.deploy(commander, BLUE, blue_castle)?;
    game.deploy(UnitTypeId(0), BLUE, Position::new(10, 6))?;
    Ok(game)
}
