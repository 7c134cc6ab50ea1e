/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Gold granted at turn start for every castle the team owns.
    pub castle_income: i32,
    /// Gold granted at turn start for every village the team owns.
    pub village_income: i32,
    /// Hit points restored by a single heal command.
    pub heal_amount: i32,
    /// Damage applied by poison when the poisoned unit's team starts its turn.
    pub poison_damage: i32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_ABILITIES: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CASTLE_INCOME: i32 = 100;
    pub const DEFAULT_VILLAGE_INCOME: i32 = 50;
    pub const DEFAULT_HEAL_AMOUNT: i32 = 40;
    pub const DEFAULT_POISON_DAMAGE: i32 = 10;

    pub fn new() -> Self {
        Self {
            castle_income: Self::DEFAULT_CASTLE_INCOME,
            village_income: Self::DEFAULT_VILLAGE_INCOME,
            heal_amount: Self::DEFAULT_HEAL_AMOUNT,
            poison_damage: Self::DEFAULT_POISON_DAMAGE,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
