use super::TeamId;

/// A participant in the battle.
///
/// Teams sharing an `alliance` value are allies; every other pairing is hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub team: TeamId,
    pub alliance: u8,
    pub gold: i32,
}

impl Player {
    pub const fn new(team: TeamId, alliance: u8, gold: i32) -> Self {
        Self {
            team,
            alliance,
            gold,
        }
    }
}
