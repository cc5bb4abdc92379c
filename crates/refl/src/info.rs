//! Type descriptors
//!
//! A [`TypeInfo`] is the merged, immutable view of everything known about
//! one type. It is assembled once, on first use, from the embedded and
//! external sources of the type and lives for the rest of the process.
//!
//! Derived facts are computed lazily on the descriptor itself and cached:
//! resolved base descriptors, the full virtual base list, and one
//! [`NameIndex`] per [`NameFacet`]. Each cache is built by exactly one
//! thread; readers after that never lock.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::OnceCell;

use crate::attr::{AttrSet, Attribute};
use crate::error::{ReflError, Result};
use crate::groups::{AttrGroup, MemberGroups};
use crate::hierarchy::{self, InheritanceGraph};
use crate::index::{NameFacet, NameIndex};
use crate::member::Member;
use crate::registry;
use crate::source::{ErasedMembers, ErasedSource};

/// Identity of a reflected type
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    /// Key of the type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// TypeId of the type
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Rust type name, as reported by `std::any::type_name`
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Inheritance edges as recorded in the process-wide registry
pub(crate) struct RegistryGraph;

impl InheritanceGraph for RegistryGraph {
    type Node = TypeKey;

    fn bases(&self, node: TypeKey) -> &[TypeKey] {
        registry::base_info(node).base_keys()
    }

    fn virtual_bases(&self, node: TypeKey) -> &[TypeKey] {
        registry::base_info(node).direct_virtual_base_keys()
    }
}

fn resolve_all(keys: impl IntoIterator<Item = TypeKey>) -> Box<[&'static TypeInfo]> {
    keys.into_iter().map(registry::base_info).collect()
}

/// Merged reflection metadata of one type
pub struct TypeInfo {
    key: TypeKey,
    name: Option<&'static str>,
    class_attrs: AttrSet,
    base_keys: Box<[TypeKey]>,
    direct_virtual_base_keys: Box<[TypeKey]>,
    members: Option<ErasedMembers>,
    groups: MemberGroups,
    member_names: Option<Box<[&'static str]>>,

    bases: OnceCell<Box<[&'static TypeInfo]>>,
    direct_virtual_bases: OnceCell<Box<[&'static TypeInfo]>>,
    virtual_bases: OnceCell<Box<[&'static TypeInfo]>>,
    combined_bases: OnceCell<Box<[&'static TypeInfo]>>,
    indices: [OnceCell<Result<NameIndex>>; 4],
}

impl TypeInfo {
    /// Merge the two sources of a type, embedded facets first.
    pub(crate) fn assemble(
        key: TypeKey,
        embedded: Option<ErasedSource>,
        external: Option<ErasedSource>,
    ) -> Result<Self> {
        let mut embedded = embedded.unwrap_or_else(|| ErasedSource::empty(key));
        let mut external = external.unwrap_or_else(|| ErasedSource::empty(key));

        let name = embedded.name.take().or(external.name.take());
        let class_attrs = embedded
            .class_attrs
            .take()
            .or(external.class_attrs.take())
            .unwrap_or_default();
        let bases = embedded
            .bases
            .take()
            .or(external.bases.take())
            .unwrap_or_default();
        let virtual_bases = embedded
            .virtual_bases
            .take()
            .or(external.virtual_bases.take())
            .unwrap_or_default();
        let members = embedded.members.take().or(external.members.take());
        let groups = embedded.groups.take().or(external.groups.take());
        let names = embedded.names.take().or(external.names.take());

        let count = members.as_ref().map_or(0, |members| members.count);
        if let Some(groups) = &groups {
            let grouped: usize = groups.iter().map(|group| group.len).sum();
            if grouped != count {
                return Err(ReflError::FacetMismatch {
                    type_name: key.type_name(),
                    detail: format!("attribute groups cover {grouped} members, {count} declared"),
                });
            }
        }
        if let Some(names) = &names {
            if names.len() != count {
                return Err(ReflError::FacetMismatch {
                    type_name: key.type_name(),
                    detail: format!("{} member names for {count} members", names.len()),
                });
            }
        }

        Ok(Self {
            key,
            name,
            class_attrs,
            base_keys: bases.into_boxed_slice(),
            direct_virtual_base_keys: virtual_bases.into_boxed_slice(),
            members,
            groups: MemberGroups::new(groups.unwrap_or_default()),
            member_names: names.map(Vec::into_boxed_slice),
            bases: OnceCell::new(),
            direct_virtual_bases: OnceCell::new(),
            virtual_bases: OnceCell::new(),
            combined_bases: OnceCell::new(),
            indices: Default::default(),
        })
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Key of the described type
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// TypeId of the described type
    pub fn type_id(&self) -> TypeId {
        self.key.type_id()
    }

    /// Rust type name of the described type
    pub fn type_name(&self) -> &'static str {
        self.key.type_name()
    }

    /// Reflected class name, if declared
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Check if a class name is declared
    pub fn name_known(&self) -> bool {
        self.name.is_some()
    }

    /// Class attributes; empty if none are declared
    pub fn class_attrs(&self) -> &AttrSet {
        &self.class_attrs
    }

    /// Check if the class carries the attribute `A`
    pub fn has_class_attr<A: Attribute>(&self) -> bool {
        self.class_attrs.contains::<A>()
    }

    // ========================================================================
    // Bases
    // ========================================================================

    /// Keys of the direct non-virtual bases
    pub fn base_keys(&self) -> &[TypeKey] {
        &self.base_keys
    }

    /// Keys of the direct virtual bases
    pub fn direct_virtual_base_keys(&self) -> &[TypeKey] {
        &self.direct_virtual_base_keys
    }

    /// Direct non-virtual bases, in declaration order
    pub fn bases(&self) -> &[&'static TypeInfo] {
        self.bases
            .get_or_init(|| resolve_all(self.base_keys.iter().copied()))
    }

    /// Direct virtual bases, in declaration order
    pub fn direct_virtual_bases(&self) -> &[&'static TypeInfo] {
        self.direct_virtual_bases
            .get_or_init(|| resolve_all(self.direct_virtual_base_keys.iter().copied()))
    }

    /// All virtual bases, direct or inherited, each exactly once
    pub fn virtual_bases(&self) -> &[&'static TypeInfo] {
        self.virtual_bases.get_or_init(|| {
            let keys = hierarchy::collect_virtual_bases(&RegistryGraph, self.key);
            tracing::debug!(
                type_name = self.type_name(),
                count = keys.len(),
                "resolved virtual bases"
            );
            resolve_all(keys)
        })
    }

    /// Direct bases followed by all virtual bases.
    ///
    /// The two halves are concatenated as is; a name shared between them
    /// is reported by [`combined_base_index`](Self::combined_base_index).
    pub fn combined_bases(&self) -> &[&'static TypeInfo] {
        self.combined_bases.get_or_init(|| {
            self.bases()
                .iter()
                .chain(self.virtual_bases())
                .copied()
                .collect()
        })
    }

    /// Check if `base` is a transitive base of this type
    pub fn derives_from(&self, base: TypeKey) -> bool {
        hierarchy::ancestors(&RegistryGraph, self.key).contains(&base)
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Check if member accessors are declared
    pub fn members_known(&self) -> bool {
        self.members.is_some()
    }

    /// Number of members; zero if members are not declared
    pub fn member_count(&self) -> usize {
        self.members.as_ref().map_or(0, |members| members.count)
    }

    /// Typed member accessors, or `None` if `T` is not the described type
    /// or its members are not declared
    pub fn members<T: 'static>(&self) -> Option<&[Member<T>]> {
        let members = self.members.as_ref()?;
        members
            .table
            .downcast_ref::<Vec<Member<T>>>()
            .map(Vec::as_slice)
    }

    /// Type of the member at `index`
    pub fn member_type(&self, index: usize) -> Option<TypeKey> {
        self.members.as_ref()?.field_types.get(index).copied()
    }

    /// Check if member names are tracked
    pub fn member_names_known(&self) -> bool {
        self.member_names.is_some()
    }

    /// Name of the member at `index`; `None` out of range or when untracked
    pub fn member_name(&self, index: usize) -> Option<&'static str> {
        self.member_names.as_ref()?.get(index).copied()
    }

    /// Attributes of the member at `index`; empty out of range
    pub fn member_attrs(&self, index: usize) -> &AttrSet {
        self.groups.attrs_of(index)
    }

    /// Check if the member at `index` carries the attribute `A`
    pub fn has_member_attr<A: Attribute>(&self, index: usize) -> bool {
        self.member_attrs(index).contains::<A>()
    }

    /// Declaration group of the member at `index`
    pub fn member_group(&self, index: usize) -> Option<usize> {
        self.groups.group_of(index)
    }

    /// Member attribute groups in declaration order
    pub fn member_groups(&self) -> &[AttrGroup] {
        self.groups.groups()
    }

    // ========================================================================
    // Lookup by name
    // ========================================================================

    fn base_names(
        &self,
        facet: NameFacet,
        bases: &[&'static TypeInfo],
    ) -> Result<Vec<&'static str>> {
        bases
            .iter()
            .map(|base| {
                base.name().ok_or(ReflError::UnnamedBase {
                    type_name: self.type_name(),
                    facet,
                    base: base.type_name(),
                })
            })
            .collect()
    }

    fn build_index(&self, facet: NameFacet) -> Result<NameIndex> {
        let names = match facet {
            NameFacet::Members => self.member_names.as_deref().unwrap_or_default().to_vec(),
            NameFacet::Bases => self.base_names(facet, self.bases())?,
            NameFacet::VirtualBases => self.base_names(facet, self.virtual_bases())?,
            NameFacet::CombinedBases => self.base_names(facet, self.combined_bases())?,
        };
        NameIndex::build(self.type_name(), facet, names)
    }

    /// The name index of `facet`, built on first use
    pub fn try_index(&self, facet: NameFacet) -> Result<&NameIndex> {
        self.indices[facet.slot()]
            .get_or_init(|| {
                let index = self.build_index(facet);
                match &index {
                    Ok(index) => tracing::debug!(
                        type_name = self.type_name(),
                        %facet,
                        entries = index.len(),
                        "built name index"
                    ),
                    Err(err) => tracing::warn!(%err, "invalid reflection metadata"),
                }
                index
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The name index of `facet`.
    ///
    /// # Panics
    ///
    /// Panics if the facet holds a duplicate or unnamed entry.
    pub fn index(&self, facet: NameFacet) -> &NameIndex {
        self.try_index(facet).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Position of the member named `name`
    pub fn try_member_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.try_index(NameFacet::Members)?.get(name))
    }

    /// Position of the member named `name`; always `None` when member
    /// names are not tracked
    ///
    /// # Panics
    ///
    /// Panics if two members share a name.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.index(NameFacet::Members).get(name)
    }

    /// Position of the direct base named `name`
    pub fn try_base_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.try_index(NameFacet::Bases)?.get(name))
    }

    /// Position of the direct base named `name` in [`bases`](Self::bases)
    pub fn base_index(&self, name: &str) -> Option<usize> {
        self.index(NameFacet::Bases).get(name)
    }

    /// Position of the virtual base named `name`
    pub fn try_virtual_base_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.try_index(NameFacet::VirtualBases)?.get(name))
    }

    /// Position of the virtual base named `name` in
    /// [`virtual_bases`](Self::virtual_bases)
    pub fn virtual_base_index(&self, name: &str) -> Option<usize> {
        self.index(NameFacet::VirtualBases).get(name)
    }

    /// Position of the base named `name` in the combined list
    pub fn try_combined_base_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.try_index(NameFacet::CombinedBases)?.get(name))
    }

    /// Position of the base named `name` in
    /// [`combined_bases`](Self::combined_bases)
    ///
    /// # Panics
    ///
    /// Panics if a direct base and a virtual base share a name.
    pub fn combined_base_index(&self, name: &str) -> Option<usize> {
        self.index(NameFacet::CombinedBases).get(name)
    }

    /// Build every name index now, reporting the first invalid facet.
    ///
    /// Intended for startup smoke tests; regular lookups build indices
    /// lazily and panic instead.
    pub fn validate(&self) -> Result<()> {
        for facet in NameFacet::ALL {
            self.try_index(facet)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name())
            .field("name", &self.name)
            .field("class_attrs", &self.class_attrs)
            .field("bases", &self.base_keys)
            .field("virtual_bases", &self.direct_virtual_base_keys)
            .field("member_count", &self.member_count())
            .field("member_names", &self.member_names)
            .finish()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeInfo {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{FieldAttrs, Optional};
    use crate::field;
    use crate::source::Source;

    struct Vec2 {
        x: f32,
        y: f32,
    }

    fn vec2_source() -> ErasedSource {
        Source::<Vec2>::new()
            .name("Vec2")
            .decl(FieldAttrs::new(), [field!(Vec2, x)])
            .decl(FieldAttrs::new().with::<Optional>(), [field!(Vec2, y)])
            .erase()
            .unwrap()
    }

    #[test]
    fn test_assemble_embedded_only() {
        let info = TypeInfo::assemble(TypeKey::of::<Vec2>(), Some(vec2_source()), None).unwrap();

        assert_eq!(info.name(), Some("Vec2"));
        assert_eq!(info.member_count(), 2);
        assert_eq!(info.member_name(1), Some("y"));
        assert_eq!(info.member_name(2), None);
        assert!(info.has_member_attr::<Optional>(1));
        assert!(!info.has_member_attr::<Optional>(0));
        assert_eq!(info.member_type(0), Some(TypeKey::of::<f32>()));
        assert_eq!(info.member_index("x"), Some(0));
        assert_eq!(info.member_index("z"), None);
    }

    #[test]
    fn test_embedded_wins_per_facet() {
        let external = Source::<Vec2>::new()
            .name("ExternalVec2")
            .class_attrs(crate::attr::ClassAttrs::new().with::<Optional>())
            .erase()
            .unwrap();
        let info =
            TypeInfo::assemble(TypeKey::of::<Vec2>(), Some(vec2_source()), Some(external)).unwrap();

        assert_eq!(info.name(), Some("Vec2"));
        assert!(info.has_class_attr::<Optional>());
    }

    #[test]
    fn test_empty_defaults() {
        let info = TypeInfo::assemble(TypeKey::of::<Vec2>(), None, None).unwrap();

        assert_eq!(info.name(), None);
        assert!(info.class_attrs().is_empty());
        assert!(info.base_keys().is_empty());
        assert!(!info.members_known());
        assert_eq!(info.member_count(), 0);
        assert!(info.members::<Vec2>().is_none());
        assert!(info.member_attrs(0).is_empty());
        assert_eq!(info.member_index("x"), None);
    }

    #[test]
    fn test_cross_source_mismatch() {
        let external = Source::<Vec2>::new()
            .member_groups(vec![AttrGroup::new(3, FieldAttrs::new())])
            .erase()
            .unwrap();
        let err = TypeInfo::assemble(TypeKey::of::<Vec2>(), Some(vec2_source()), Some(external));
        // Embedded groups win, so the external groups are ignored.
        assert!(err.is_ok());

        let embedded = Source::<Vec2>::new()
            .member_groups(vec![AttrGroup::new(3, FieldAttrs::new())])
            .erase()
            .unwrap();
        let external = vec2_source();
        let err = TypeInfo::assemble(TypeKey::of::<Vec2>(), Some(embedded), Some(external))
            .err()
            .unwrap();
        assert!(matches!(err, ReflError::FacetMismatch { .. }));
    }

    #[test]
    fn test_typed_members() {
        let info = TypeInfo::assemble(TypeKey::of::<Vec2>(), Some(vec2_source()), None).unwrap();
        let members = info.members::<Vec2>().unwrap();
        let v = Vec2 { x: 3.0, y: 4.0 };

        assert_eq!(members[1].get_as::<f32>(&v), Some(&4.0));
        assert!(info.members::<String>().is_none());
    }
}
