//! Course groups and the group classifier

use super::{Course, Slot};
use crate::core::catalog::Catalog;
use crate::warn;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A named category of courses within one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group name as it appears in the catalog
    pub name: String,
    /// Member course ids, in catalog order
    pub course_ids: Vec<String>,
    /// Exact number of members that must be selected (0 for mandatory groups)
    pub quota: usize,
    /// Whether this is the reserved school-designated group
    pub mandatory: bool,
}

impl Group {
    /// Number of members present in `selected`
    #[must_use]
    pub fn selected_count<F>(&self, is_selected: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.course_ids
            .iter()
            .filter(|id| is_selected(id.as_str()))
            .count()
    }
}

/// Groups of one slot keyed by group name
pub type SlotGroups = BTreeMap<String, Group>;

/// Classify the courses of one slot into groups.
///
/// A group is mandatory iff its name equals `mandatory_group`; mandatory groups
/// carry quota 0. Every other group takes its quota from its first member.
pub fn classify<'a, I>(courses: I, mandatory_group: &str) -> SlotGroups
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut groups = SlotGroups::new();

    for course in courses {
        let group = groups.entry(course.group.clone()).or_insert_with(|| {
            let mandatory = course.group == mandatory_group;
            Group {
                name: course.group.clone(),
                course_ids: Vec::new(),
                quota: if mandatory { 0 } else { course.group_quota },
                mandatory,
            }
        });

        // Quota uniformity is a catalog precondition; the first member wins
        if !group.mandatory && course.group_quota != group.quota {
            warn!(
                "Course {} declares quota {} for group \"{}\" in {}, keeping {}",
                course.id,
                course.group_quota,
                group.name,
                course.slot(),
                group.quota
            );
        }
        group.course_ids.push(course.id.clone());
    }

    groups
}

/// Group structure of the whole catalog, rebuilt whenever the catalog is loaded
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    slots: BTreeMap<Slot, SlotGroups>,
}

impl GroupIndex {
    /// Classify every slot of `catalog`
    #[must_use]
    pub fn build(catalog: &Catalog, mandatory_group: &str) -> Self {
        let slots = catalog
            .partition()
            .into_iter()
            .map(|(slot, courses)| (slot, classify(courses, mandatory_group)))
            .collect();
        Self { slots }
    }

    /// Groups of a slot, if the catalog offers anything there
    #[must_use]
    pub fn slot(&self, slot: Slot) -> Option<&SlotGroups> {
        self.slots.get(&slot)
    }

    /// Look up a single group
    #[must_use]
    pub fn group(&self, slot: Slot, name: &str) -> Option<&Group> {
        self.slots.get(&slot).and_then(|groups| groups.get(name))
    }

    /// Groups of a slot in display order: mandatory first, then natural name order
    #[must_use]
    pub fn display_order(&self, slot: Slot) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self
            .slots
            .get(&slot)
            .map(|groups| groups.values().collect())
            .unwrap_or_default();
        groups.sort_by(|a, b| {
            b.mandatory
                .cmp(&a.mandatory)
                .then_with(|| natural_cmp(&a.name, &b.name))
        });
        groups
    }
}

/// Case-insensitive comparison treating digit runs as numbers ("Group 2" < "Group 10")
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_number(&mut left);
                let rn = take_number(&mut right);
                let ord = ln
                    .trim_start_matches('0')
                    .len()
                    .cmp(&rn.trim_start_matches('0').len())
                    .then_with(|| ln.trim_start_matches('0').cmp(rn.trim_start_matches('0')));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}
