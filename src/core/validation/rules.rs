//! Rule set the validation engine checks against

use crate::config::RulesConfig;
use crate::core::models::Slot;
use std::collections::BTreeMap;

/// A fixed set of course ids with an exact selection count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactCountRule {
    /// Category label used in messages
    pub label: String,
    /// Member course ids, in configured order
    pub course_ids: Vec<String>,
    /// Required number of selected members
    pub count: usize,
}

/// A fixed set of course ids with an upper bound on selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxCountRule {
    /// Category label used in messages
    pub label: String,
    /// Member course ids, in configured order
    pub course_ids: Vec<String>,
    /// Maximum number of selected members
    pub max: usize,
}

/// Everything the engine needs besides catalog, groups and selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Reserved name of the school-designated group
    pub mandatory_group: String,
    /// Whether the student identifier must be filled in
    pub require_student_id: bool,
    /// Required credit total per validated slot
    pub required_hours: BTreeMap<Slot, u32>,
    /// Exact-count category; disabled when it has no members
    pub exact_category: ExactCountRule,
    /// Max-count category; disabled when it has no members
    pub max_category: MaxCountRule,
}

impl RuleSet {
    /// Build a rule set from the `[rules]` config section
    ///
    /// # Errors
    /// Returns an error if a `required_hours` key is not a valid slot key.
    pub fn from_config(config: &RulesConfig) -> Result<Self, String> {
        let required_hours = config
            .required_hours
            .iter()
            .map(|(key, hours)| key.parse::<Slot>().map(|slot| (slot, *hours)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            mandatory_group: config.mandatory_group.clone(),
            require_student_id: config.require_student_id,
            required_hours,
            exact_category: config
                .exact_category
                .as_ref()
                .map_or_else(ExactCountRule::default, |exact| ExactCountRule {
                    label: exact.label.clone(),
                    course_ids: exact.course_ids.clone(),
                    count: exact.count,
                }),
            max_category: config
                .max_category
                .as_ref()
                .map_or_else(MaxCountRule::default, |max| MaxCountRule {
                    label: max.label.clone(),
                    course_ids: max.course_ids.clone(),
                    max: max.max,
                }),
        })
    }

    /// Validated slots, ascending
    #[must_use]
    pub fn slots(&self) -> Vec<Slot> {
        self.required_hours.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_from_default_config() {
        let rules = RuleSet::from_config(&Config::from_defaults().rules).unwrap();

        assert_eq!(rules.slots().len(), 4);
        assert_eq!(rules.required_hours[&Slot::new(2, 1)], 29);
        assert_eq!(rules.exact_category.count, 2);
        assert_eq!(rules.max_category.max, 3);
        assert!(rules.require_student_id);
    }

    #[test]
    fn test_empty_category_from_config_is_disabled() {
        let config = Config::from_toml(
            "[rules.required_hours]\nY2S1 = 29\n\n[rules.exact_category]\nlabel = \"Art/Music\"\ncourse_ids = []\ncount = 2\n",
        )
        .unwrap();
        let rules = RuleSet::from_config(&config.rules).unwrap();

        assert!(rules.exact_category.course_ids.is_empty());
        assert_eq!(rules.max_category, MaxCountRule::default());
    }

    #[test]
    fn test_bad_slot_key() {
        let mut config = Config::from_defaults().rules;
        config.required_hours.insert("second-year".to_string(), 10);
        assert!(RuleSet::from_config(&config).is_err());
    }
}
