//! Member attribute groups
//!
//! Members are declared in groups; every member of a group shares the
//! group's attribute set and the group covers a contiguous run of member
//! positions. The position → group table is built on first lookup.

use once_cell::sync::OnceCell;

use crate::attr::{AttrSet, EMPTY_ATTRS};

/// One declaration group: `len` consecutive members sharing `attrs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrGroup {
    /// Number of members in the group
    pub len: usize,
    /// Attributes shared by those members
    pub attrs: AttrSet,
}

impl AttrGroup {
    /// Create a group
    pub fn new(len: usize, attrs: impl Into<AttrSet>) -> Self {
        Self {
            len,
            attrs: attrs.into(),
        }
    }
}

/// Attribute groups of one type plus the cached flat lookup
#[derive(Debug, Default)]
pub struct MemberGroups {
    groups: Box<[AttrGroup]>,
    flat: OnceCell<Box<[u32]>>,
}

impl MemberGroups {
    /// Wrap the groups of a type
    pub fn new(groups: Vec<AttrGroup>) -> Self {
        Self {
            groups: groups.into_boxed_slice(),
            flat: OnceCell::new(),
        }
    }

    /// Total number of members covered by the groups
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|group| group.len).sum()
    }

    /// The groups in declaration order
    pub fn groups(&self) -> &[AttrGroup] {
        &self.groups
    }

    fn flat(&self) -> &[u32] {
        self.flat.get_or_init(|| {
            let mut flat = Vec::with_capacity(self.member_count());
            for (group_index, group) in self.groups.iter().enumerate() {
                flat.extend(std::iter::repeat(group_index as u32).take(group.len));
            }
            flat.into_boxed_slice()
        })
    }

    /// Group of the member at `index`
    pub fn group_of(&self, index: usize) -> Option<usize> {
        self.flat().get(index).map(|&group| group as usize)
    }

    /// Attributes of the member at `index`; empty when out of range
    pub fn attrs_of(&self, index: usize) -> &AttrSet {
        match self.group_of(index) {
            Some(group) => &self.groups[group].attrs,
            None => &EMPTY_ATTRS,
        }
    }
}
