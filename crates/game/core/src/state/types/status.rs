/// Status condition attached to a unit.
///
/// A unit carries at most one status at a time; a status lasts until the
/// owning team's next turn starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    Poisoned,
    Blinded,
    Slowed,
    Inspired,
}

impl StatusKind {
    /// Returns true for harmful conditions.
    pub const fn is_debuff(self) -> bool {
        matches!(
            self,
            StatusKind::Poisoned | StatusKind::Blinded | StatusKind::Slowed
        )
    }
}

