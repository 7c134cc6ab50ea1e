//! Unit abilities.
//!
//! Abilities are declared per unit type in the rule set's catalog and copied
//! onto every unit of that type. They drive both the rules (who may occupy a
//! castle, who can raise the dead) and the robot's heuristics.

/// A capability or trait carried by a unit type.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Ability {
    /// Leader of a side; captures castles and may be recruited again after death.
    Commander,
    /// Captures villages.
    Conqueror,
    /// Restores hit points of allies within attack range.
    Healer,
    /// Raises undead from tombs.
    Necromancer,
    /// Risen dead; thrives on tombs.
    Undead,
    /// Repairs ruins back into villages.
    Repairer,
    /// Razes empty enemy villages into ruins.
    Destroyer,
    /// Bonus damage against air units.
    Marksman,
    /// Flies over any terrain.
    AirForce,
    /// Crawls through rough terrain.
    Crawler,
    /// Siege engine that may only fire from the tile it starts the turn on.
    HeavyMachine,
    /// Scores purely on impact, ignoring positional safety.
    Charger,
    /// Relocates again after attacking.
    HitAndRun,
    /// Attacks poison their target.
    Poisoner,
    /// Attacks blind their target.
    Blinder,
    /// Slows nearby enemies.
    SlowingAura,
    /// Inspires nearby allies.
    AttackAura,
    /// Heals and cleanses nearby allies.
    RefreshAura,
}

impl Ability {
    /// Returns true for abilities projecting an effect on surrounding units.
    pub const fn is_aura(self) -> bool {
        matches!(
            self,
            Ability::SlowingAura | Ability::AttackAura | Ability::RefreshAura
        )
    }
}
