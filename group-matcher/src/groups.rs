use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::dsu::Dsu;

/// One equivalence class of records. Members are record indices in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    members: Vec<usize>,
}

impl Group {
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Smallest record index in the group.
    pub fn first(&self) -> Option<usize> {
        self.members.first().copied()
    }

    /// Larger groups first, then the group holding the earliest record.
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        other
            .len()
            .cmp(&self.len())
            .then_with(|| self.first().cmp(&other.first()))
    }
}

/// The final partition of all records, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    groups: Vec<Group>,
    multi_member: usize,
}

impl Grouping {
    /// Walks every element of `dsu` and collects the resulting groups.
    ///
    /// Groups are first gathered in the order their representatives are met while
    /// scanning indices `0..n`, then sorted by size descending with ties broken by
    /// the smallest member. Every multi-member group therefore precedes every
    /// singleton.
    pub fn extract(dsu: &mut Dsu) -> Self {
        let mut by_root: IndexMap<usize, Vec<usize>> = IndexMap::with_capacity(dsu.num_sets());
        for i in 0..dsu.len() {
            by_root.entry(dsu.find(i)).or_default().push(i);
        }

        let mut groups = by_root
            .into_values()
            .map(|members| Group { members })
            .collect::<Vec<_>>();
        groups.sort_by(Group::canonical_cmp);

        let multi_member = groups.iter().filter(|g| !g.is_singleton()).count();

        Self {
            groups,
            multi_member,
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups with more than one member.
    pub fn multi_member_count(&self) -> usize {
        self.multi_member
    }

    /// Position of the first singleton group, or the number of groups if there is none.
    pub fn first_singleton(&self) -> usize {
        self.groups
            .iter()
            .position(Group::is_singleton)
            .unwrap_or(self.groups.len())
    }
}
