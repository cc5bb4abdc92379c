//! Reflection configuration errors
//!
//! Every error here describes a mistake in how a type was declared or
//! registered. None of them depend on runtime input, so the infallible
//! query functions turn them into panics; the `try_` variants hand them
//! back for startup checks.

use thiserror::Error;

use crate::index::NameFacet;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ReflError>;

/// Errors raised while registering or resolving reflection metadata
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReflError {
    /// Two entries of one name-indexed facet share a name
    #[error("Duplicate {facet} name `{name}` in reflected type {type_name}")]
    DuplicateName {
        /// Rust type name of the reflected type
        type_name: &'static str,
        /// Facet that holds the duplicate
        facet: NameFacet,
        /// The repeated name
        name: &'static str,
    },

    /// A base listed in a name-indexed facet has no reflected name
    #[error("Name of {facet} {base} of reflected type {type_name} is not known")]
    UnnamedBase {
        /// Rust type name of the reflected type
        type_name: &'static str,
        /// Facet that holds the base
        facet: NameFacet,
        /// Rust type name of the unnamed base
        base: &'static str,
    },

    /// Attribute group sizes do not add up to the member count of one source
    #[error("Attribute groups of {type_name} cover {grouped} members, but {members} are declared")]
    GroupSizeMismatch {
        /// Rust type name of the reflected type
        type_name: &'static str,
        /// Sum of the group sizes
        grouped: usize,
        /// Declared member count
        members: usize,
    },

    /// Facets merged from the embedded and external sources disagree
    #[error("Member facets of {type_name} disagree: {detail}")]
    FacetMismatch {
        /// Rust type name of the reflected type
        type_name: &'static str,
        /// Which facets disagree and how
        detail: String,
    },

    /// An external source was registered twice for the same type
    #[error("External metadata for {type_name} is already registered")]
    AlreadyRegistered {
        /// Rust type name of the reflected type
        type_name: &'static str,
    },

    /// A source was registered after the descriptor of the type was built
    #[error("Metadata for {type_name} was already resolved; register sources before first use")]
    AlreadyResolved {
        /// Rust type name of the reflected type
        type_name: &'static str,
    },

    /// `configure` was called after the registry started
    #[error("Registry is already configured")]
    AlreadyConfigured,
}
