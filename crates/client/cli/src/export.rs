//! JSON export of the final match state.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use game_core::{BattleManager, Board, GameManager, Player};
use runtime::MetricsSnapshot;
use serde::Serialize;

#[derive(Serialize)]
struct MatchSummary<'a> {
    turn: u32,
    winner: Option<u8>,
    players: &'a [Player],
    board: &'a Board,
    metrics: MetricsSnapshot,
}

pub fn write_summary(path: &Path, game: &BattleManager, metrics: MetricsSnapshot) -> Result<()> {
    let summary = MatchSummary {
        turn: game.turn(),
        winner: game.winner(),
        players: game.players(),
        board: game.board(),
        metrics,
    };
    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
