use super::TeamId;

/// Terrain class of a board tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    #[default]
    Plains,
    Road,
    Forest,
    Hill,
    Mountain,
    Water,
    Castle,
    Village,
    /// Razed village awaiting repair.
    Ruins,
}

impl TileKind {
    /// Parses the single-character board notation used by [`crate::Board::from_rows`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            '.' => TileKind::Plains,
            '=' => TileKind::Road,
            'f' => TileKind::Forest,
            'h' => TileKind::Hill,
            'm' => TileKind::Mountain,
            '~' => TileKind::Water,
            'C' => TileKind::Castle,
            'V' => TileKind::Village,
            'R' => TileKind::Ruins,
            _ => return None,
        })
    }
}

/// A board tile: terrain plus the owning team for capturable structures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub kind: TileKind,
    pub team: Option<TeamId>,
}

impl Tile {
    pub const fn new(kind: TileKind) -> Self {
        Self { kind, team: None }
    }

    pub const fn owned(kind: TileKind, team: TeamId) -> Self {
        Self {
            kind,
            team: Some(team),
        }
    }

    pub fn is_castle(&self) -> bool {
        self.kind == TileKind::Castle
    }

    pub fn is_village(&self) -> bool {
        self.kind == TileKind::Village
    }

    pub fn is_repairable(&self) -> bool {
        self.kind == TileKind::Ruins
    }
}
