//! Board: tile grid, unit roster and tomb overlay.

use super::types::{Position, TeamId, Tile, TileKind, Unit, UnitId};

/// Failure while building a board from its text notation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("unknown tile symbol '{symbol}' at {position}")]
    UnknownSymbol { symbol: char, position: Position },

    #[error("row {row} has width {width}, expected {expected}")]
    RaggedRow {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("board must have at least one row and one column")]
    Empty,
}

/// Mutable battlefield owned by the game manager.
///
/// Units are kept in roster order (insertion order); that order is observable
/// through [`Board::units`] and decides which unit the robot activates first.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    units: Vec<Unit>,
    tombs: Vec<Position>,
}

impl Board {
    /// Creates a board filled with plains.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
            units: Vec::new(),
            tombs: Vec::new(),
        }
    }

    /// Builds a board from one string per row, one symbol per tile.
    ///
    /// Symbols: `.` plains, `=` road, `f` forest, `h` hill, `m` mountain,
    /// `~` water, `C` castle, `V` village, `R` ruins. Structures start neutral.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let expected = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if expected == 0 {
            return Err(BoardError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != expected {
                return Err(BoardError::RaggedRow {
                    row: y,
                    width,
                    expected,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let kind = TileKind::from_symbol(symbol).ok_or(BoardError::UnknownSymbol {
                    symbol,
                    position: Position::new(x as i32, y as i32),
                })?;
                tiles.push(Tile::new(kind));
            }
        }

        Ok(Self {
            width: expected as i32,
            height: rows.len() as i32,
            tiles,
            units: Vec::new(),
            tombs: Vec::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| (position.y * self.width + position.x) as usize)
    }

    // ========================================================================
    // Tiles
    // ========================================================================

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    pub fn set_tile(&mut self, position: Position, tile: Tile) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = tile;
        }
    }

    /// Assigns ownership of the structure at `position`.
    pub fn set_owner(&mut self, position: Position, team: Option<TeamId>) {
        if let Some(index) = self.index(position) {
            self.tiles[index].team = team;
        }
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Castle positions in row-major order.
    pub fn castle_positions(&self) -> Vec<Position> {
        self.positions_where(|tile| tile.is_castle())
    }

    /// Castle positions owned by `team`, row-major.
    pub fn castle_positions_of(&self, team: TeamId) -> Vec<Position> {
        self.positions_where(|tile| tile.is_castle() && tile.team == Some(team))
    }

    /// Village positions in row-major order.
    pub fn village_positions(&self) -> Vec<Position> {
        self.positions_where(|tile| tile.is_village())
    }

    fn positions_where(&self, predicate: impl Fn(&Tile) -> bool) -> Vec<Position> {
        self.positions()
            .filter(|&position| self.tile(position).is_some_and(&predicate))
            .collect()
    }

    // ========================================================================
    // Tombs
    // ========================================================================

    pub fn tombs(&self) -> &[Position] {
        &self.tombs
    }

    pub fn is_tomb(&self, position: Position) -> bool {
        self.tombs.contains(&position)
    }

    pub fn add_tomb(&mut self, position: Position) {
        if self.contains(position) && !self.is_tomb(position) {
            self.tombs.push(position);
        }
    }

    pub fn remove_tomb(&mut self, position: Position) {
        self.tombs.retain(|&tomb| tomb != position);
    }

    // ========================================================================
    // Units
    // ========================================================================

    /// Every unit on the board in roster order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Units of a single team in roster order.
    pub fn units_of(&self, team: TeamId) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |unit| unit.team == team)
    }

    pub fn unit_at(&self, position: Position) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.position == position)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.unit_at(position).is_some()
    }

    /// Adds a unit at the end of the roster.
    pub fn add_unit(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|unit| unit.id == id)?;
        Some(self.units.remove(index))
    }

    /// Next free unit id (one past the highest id ever placed on this board).
    pub fn next_unit_id(&self) -> UnitId {
        UnitId(self.units.iter().map(|unit| unit.id.0 + 1).max().unwrap_or(1))
    }
}
