//! Unit catalog and recruitment rules.

use std::collections::BTreeMap;

use crate::state::{Ability, AttackType, Unit, UnitTypeId};

/// Recruitable unit types plus the samples every unit is stamped from.
///
/// `available_units` is sorted by ascending price (ties by type id), so index
/// 0 is always the cheapest recruit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleSet {
    samples: BTreeMap<UnitTypeId, Unit>,
    available: Vec<UnitTypeId>,
    commander: UnitTypeId,
    skeleton: Option<UnitTypeId>,
}

impl RuleSet {
    /// Builds a rule set where every sample is recruitable.
    pub fn new(samples: impl IntoIterator<Item = Unit>, commander: UnitTypeId) -> Self {
        let samples: BTreeMap<_, _> = samples
            .into_iter()
            .map(|sample| (sample.type_id, sample))
            .collect();
        let mut rules = Self {
            available: Vec::new(),
            samples,
            commander,
            skeleton: None,
        };
        rules.rebuild_available();
        rules
    }

    /// Registers the summonable type. It is removed from the recruit list.
    pub fn with_skeleton(mut self, skeleton: Unit) -> Self {
        let type_id = skeleton.type_id;
        self.samples.insert(type_id, skeleton);
        self.skeleton = Some(type_id);
        self.rebuild_available();
        self
    }

    fn rebuild_available(&mut self) {
        let mut available: Vec<_> = self
            .samples
            .values()
            .filter(|sample| Some(sample.type_id) != self.skeleton)
            .map(|sample| (sample.price, sample.type_id))
            .collect();
        available.sort();
        self.available = available.into_iter().map(|(_, id)| id).collect();
    }

    pub fn available_units(&self) -> &[UnitTypeId] {
        &self.available
    }

    pub fn is_available(&self, type_id: UnitTypeId) -> bool {
        self.available.contains(&type_id)
    }

    pub fn sample(&self, type_id: UnitTypeId) -> Option<&Unit> {
        self.samples.get(&type_id)
    }

    pub fn commander_type(&self) -> UnitTypeId {
        self.commander
    }

    pub fn is_commander_type(&self, type_id: UnitTypeId) -> bool {
        type_id == self.commander
    }

    pub fn skeleton_type(&self) -> Option<UnitTypeId> {
        self.skeleton
    }

    /// Built-in catalog used by the skirmish demo and the tests.
    pub fn standard() -> Self {
        use Ability::*;
        use AttackType::*;

        let samples = [
            Unit::new(UnitTypeId(0))
                .with_abilities(&[Conqueror])
                .with_attack(50, Physical)
                .with_defence(5, 0)
                .with_price(150),
            Unit::new(UnitTypeId(1))
                .with_abilities(&[Marksman])
                .with_attack(50, Physical)
                .with_defence(5, 10)
                .with_range(1, 2)
                .with_price(250),
            Unit::new(UnitTypeId(2))
                .with_abilities(&[Healer])
                .with_attack(30, Magic)
                .with_defence(5, 15)
                .with_range(1, 2)
                .with_price(300),
            Unit::new(UnitTypeId(3))
                .with_abilities(&[Necromancer])
                .with_attack(45, Magic)
                .with_defence(5, 20)
                .with_range(1, 2)
                .with_price(400),
            Unit::new(UnitTypeId(4))
                .with_abilities(&[Commander])
                .with_attack(60, Physical)
                .with_defence(15, 15)
                .with_price(400),
            Unit::new(UnitTypeId(5))
                .with_abilities(&[Poisoner, Crawler])
                .with_attack(55, Physical)
                .with_defence(10, 5)
                .with_movement(6)
                .with_price(500),
            Unit::new(UnitTypeId(6))
                .with_abilities(&[SlowingAura, RefreshAura])
                .with_attack(40, Magic)
                .with_defence(5, 25)
                .with_price(550),
            Unit::new(UnitTypeId(7))
                .with_abilities(&[Destroyer, Repairer])
                .with_attack(65, Physical)
                .with_defence(30, 10)
                .with_movement(4)
                .with_price(600),
            Unit::new(UnitTypeId(8))
                .with_abilities(&[HeavyMachine])
                .with_attack(75, Physical)
                .with_defence(10, 10)
                .with_movement(4)
                .with_range(2, 4)
                .with_price(700),
            Unit::new(UnitTypeId(9))
                .with_abilities(&[AirForce, Charger, HitAndRun])
                .with_attack(70, Magic)
                .with_defence(20, 20)
                .with_movement(7)
                .with_price(1000),
        ];
        let skeleton = Unit::new(UnitTypeId(10))
            .with_abilities(&[Undead])
            .with_attack(45, Physical)
            .with_defence(10, 5)
            .with_price(0);

        Self::new(samples, UnitTypeId(4)).with_skeleton(skeleton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_units_are_sorted_by_price() {
        let rules = RuleSet::standard();
        let prices: Vec<_> = rules
            .available_units()
            .iter()
            .filter_map(|&id| rules.sample(id).map(|sample| sample.price))
            .collect();
        let mut sorted = prices.clone();
        sorted.sort();
        assert_eq!(prices, sorted);
        assert_eq!(rules.available_units()[0], UnitTypeId(0));
    }

    #[test]
    fn skeleton_is_not_recruitable() {
        let rules = RuleSet::standard();
        let skeleton = rules.skeleton_type().unwrap();
        assert!(!rules.is_available(skeleton));
        assert!(rules.sample(skeleton).is_some());
    }
}
