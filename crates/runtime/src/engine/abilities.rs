//! Ability → recruitable unit types lookup.

use std::collections::BTreeMap;

use game_core::{Ability, RuleSet, UnitTypeId};

/// Which recruitable unit types carry each ability.
///
/// Rebuilt wholesale from the rule set; never patched incrementally. Type ids
/// under each ability keep the rule set's ascending-price order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityIndex {
    types: BTreeMap<Ability, Vec<UnitTypeId>>,
}

impl AbilityIndex {
    pub fn build(rules: &RuleSet) -> Self {
        let mut types: BTreeMap<Ability, Vec<UnitTypeId>> = BTreeMap::new();
        for &type_id in rules.available_units() {
            let Some(sample) = rules.sample(type_id) else {
                continue;
            };
            for &ability in &sample.abilities {
                let entry = types.entry(ability).or_default();
                if !entry.contains(&type_id) {
                    entry.push(type_id);
                }
            }
        }
        Self { types }
    }

    /// Discards the current contents and indexes `rules` again.
    pub fn rebuild(&mut self, rules: &RuleSet) {
        *self = Self::build(rules);
    }

    pub fn contains(&self, ability: Ability) -> bool {
        self.types.contains_key(&ability)
    }

    pub fn types_with(&self, ability: Ability) -> &[UnitTypeId] {
        self.types.get(&ability).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_listed_under_each_of_its_abilities() {
        let rules = RuleSet::standard();
        let index = AbilityIndex::build(&rules);

        for &type_id in rules.available_units() {
            let sample = rules.sample(type_id).unwrap();
            for &ability in &sample.abilities {
                assert!(index.types_with(ability).contains(&type_id));
            }
        }
    }

    #[test]
    fn summon_only_abilities_are_absent() {
        let index = AbilityIndex::build(&RuleSet::standard());
        assert!(!index.contains(Ability::Undead));
        assert!(index.contains(Ability::Healer));
    }
}
