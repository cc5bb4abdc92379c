//! Name Index
//!
//! Sorted `(name, position)` tables translating a member or base name back
//! to its position in the declared order. A table is built once per
//! {type, facet} the first time that facet is searched by name; building
//! is where duplicate names are detected.

use std::fmt;

use crate::error::{ReflError, Result};

/// The four name-indexed facets of a reflected type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameFacet {
    /// Member (field) names
    Members,
    /// Direct non-virtual bases
    Bases,
    /// All virtual bases, direct and indirect
    VirtualBases,
    /// Direct bases followed by all virtual bases
    CombinedBases,
}

impl NameFacet {
    /// All facets, in lookup-table order
    pub const ALL: [NameFacet; 4] = [
        NameFacet::Members,
        NameFacet::Bases,
        NameFacet::VirtualBases,
        NameFacet::CombinedBases,
    ];

    pub(crate) fn slot(self) -> usize {
        match self {
            NameFacet::Members => 0,
            NameFacet::Bases => 1,
            NameFacet::VirtualBases => 2,
            NameFacet::CombinedBases => 3,
        }
    }
}

impl fmt::Display for NameFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameFacet::Members => "member",
            NameFacet::Bases => "base",
            NameFacet::VirtualBases => "virtual base",
            NameFacet::CombinedBases => "combined base",
        })
    }
}

/// Immutable sorted lookup table for one facet of one type
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Box<[(&'static str, usize)]>,
}

impl NameIndex {
    /// Build an index over `names`, numbered in iteration order.
    ///
    /// `type_name` and `facet` only label the error when two names collide.
    pub fn build<I>(type_name: &'static str, facet: NameFacet, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'static str>,
    {
        let mut entries: Vec<(&'static str, usize)> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (name, index))
            .collect();

        // `str` ordering is a raw byte comparison.
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(ReflError::DuplicateName {
                type_name,
                facet,
                name: pair[0].0,
            });
        }

        Ok(Self {
            entries: entries.into_boxed_slice(),
        })
    }

    /// Position of `name` in the declared order
    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|(entry, _)| (*entry).cmp(name))
            .ok()
            .map(|found| self.entries[found].1)
    }

    /// Number of indexed names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, position)` pairs in sorted name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.entries.iter().copied()
    }
}
