//! Process-wide type registry
//!
//! Sources are registered per type and stay pending until the type is
//! first queried. The first query assembles the [`TypeInfo`], leaks it,
//! and caches it for the rest of the process; every later query returns
//! the same `&'static TypeInfo`. A type nobody registered resolves to a
//! descriptor with every facet at its neutral default.
//!
//! Types deriving `Reflect` are collected at registry start, so they need
//! no explicit registration unless autoloading is turned off through
//! [`configure`].

use std::any::{Any, TypeId};
use std::sync::LazyLock;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::RegistryConfig;
use crate::error::{ReflError, Result};
use crate::info::{TypeInfo, TypeKey};
use crate::source::{Embedded, ErasedSource, Reflect, Source};

static CONFIG: OnceCell<RegistryConfig> = OnceCell::new();

static REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| Registry::new(CONFIG.get_or_init(RegistryConfig::default).clone()));

/// Sources not yet merged into a descriptor
#[derive(Default)]
struct Pending {
    embedded: FxHashMap<TypeId, Embedded>,
    external: FxHashMap<TypeId, ErasedSource>,
    /// Types whose embedded source was ever registered
    embedded_seen: FxHashSet<TypeId>,
    known: FxHashMap<TypeId, TypeKey>,
    /// Registration order of `known`
    order: Vec<TypeKey>,
}

impl Pending {
    fn note(&mut self, key: TypeKey) {
        if self.known.insert(key.type_id(), key).is_none() {
            self.order.push(key);
        }
    }
}

/// Resolution outcome of one type, built once and cached with its failure
type Slot = OnceCell<Result<&'static TypeInfo>>;

/// Registry state; locks are always taken `slots` first, then `pending`.
///
/// Neither lock is held while a descriptor is built, so embedded sources
/// may query other types.
struct Registry {
    config: RegistryConfig,
    pending: Mutex<Pending>,
    slots: RwLock<FxHashMap<TypeId, &'static Slot>>,
}

impl Registry {
    fn new(config: RegistryConfig) -> Self {
        let mut pending = Pending::default();
        if config.autoload_embedded {
            for entry in inventory::iter::<Embedded> {
                let key = entry.key();
                pending.embedded.insert(key.type_id(), *entry);
                pending.embedded_seen.insert(key.type_id());
                pending.note(key);
            }
            tracing::debug!(count = pending.order.len(), "collected embedded sources");
        }

        Registry {
            config,
            pending: Mutex::new(pending),
            slots: RwLock::new(FxHashMap::default()),
        }
    }

    fn register_embedded(&self, entry: Embedded) -> Result<()> {
        let key = entry.key();
        let id = key.type_id();

        let slots = self.slots.read();
        let mut pending = self.pending.lock();
        if pending.embedded_seen.contains(&id) {
            return Ok(());
        }
        if slots.contains_key(&id) {
            return Err(ReflError::AlreadyResolved {
                type_name: key.type_name(),
            });
        }

        pending.embedded.insert(id, entry);
        pending.embedded_seen.insert(id);
        pending.note(key);
        tracing::debug!(type_name = key.type_name(), "registered embedded source");
        Ok(())
    }

    fn register_external(&self, source: ErasedSource) -> Result<()> {
        let key = source.key;
        let id = key.type_id();

        let slots = self.slots.read();
        let mut pending = self.pending.lock();
        if slots.contains_key(&id) {
            return Err(ReflError::AlreadyResolved {
                type_name: key.type_name(),
            });
        }
        if pending.external.contains_key(&id) {
            return Err(ReflError::AlreadyRegistered {
                type_name: key.type_name(),
            });
        }

        pending.external.insert(id, source);
        pending.note(key);
        tracing::debug!(type_name = key.type_name(), "registered external source");
        Ok(())
    }

    /// Slot of `id`, created on first request
    fn slot(&self, id: TypeId) -> &'static Slot {
        if let Some(slot) = self.slots.read().get(&id) {
            return *slot;
        }
        *self
            .slots
            .write()
            .entry(id)
            .or_insert_with(|| -> &'static Slot { Box::leak(Box::new(OnceCell::new())) })
    }

    /// Descriptor of `key`, built by exactly one caller.
    ///
    /// Concurrent callers for the same type wait on its slot; building it
    /// from its own embedded source deadlocks.
    fn resolve(&self, key: TypeKey) -> Result<&'static TypeInfo> {
        self.slot(key.type_id())
            .get_or_init(|| self.build(key))
            .clone()
    }

    fn build(&self, key: TypeKey) -> Result<&'static TypeInfo> {
        let id = key.type_id();
        let (embedded, external) = {
            let mut pending = self.pending.lock();
            (pending.embedded.remove(&id), pending.external.remove(&id))
        };

        let assembled = embedded
            .map(|entry| entry.source())
            .transpose()
            .and_then(|embedded| TypeInfo::assemble(key, embedded, external));

        match assembled {
            Ok(info) => {
                let info: &'static TypeInfo = Box::leak(Box::new(info));
                tracing::debug!(
                    type_name = key.type_name(),
                    name = info.name(),
                    members = info.member_count(),
                    "resolved type descriptor"
                );
                Ok(info)
            }
            Err(err) => {
                tracing::warn!(%err, "invalid reflection metadata");
                Err(err)
            }
        }
    }

    fn known_key(&self, id: TypeId) -> Option<TypeKey> {
        self.pending.lock().known.get(&id).copied()
    }

    fn registered(&self) -> Vec<TypeKey> {
        self.pending.lock().order.clone()
    }
}

/// Install the registry configuration.
///
/// Must run before anything else touches the registry; fails with
/// [`ReflError::AlreadyConfigured`] afterwards, or when called twice.
pub fn configure(config: RegistryConfig) -> Result<()> {
    CONFIG.set(config).map_err(|_| ReflError::AlreadyConfigured)
}

/// Active registry configuration
pub fn config() -> &'static RegistryConfig {
    &REGISTRY.config
}

/// Register the embedded source of `T`.
///
/// Idempotent. Only needed for generic types and when autoloading is off;
/// every other `#[derive(Reflect)]` type is collected automatically.
pub fn register<T: Reflect>() -> Result<()> {
    REGISTRY.register_embedded(Embedded::new::<T>())
}

/// Register an external source for `T`, for types that cannot carry an
/// embedded one.
///
/// Its facets fill in whatever the embedded source leaves out.
pub fn register_external<T: 'static>(source: Source<T>) -> Result<()> {
    let source = source.erase()?;
    REGISTRY.register_external(source)
}

/// Descriptor of the type identified by `key`
pub fn try_type_info_by_key(key: TypeKey) -> Result<&'static TypeInfo> {
    let info = REGISTRY.resolve(key)?;
    if REGISTRY.config.eager_validation {
        info.validate()?;
    }
    Ok(info)
}

/// Descriptor of the type identified by `key`, without eager validation.
///
/// Used while walking inheritance edges, where validating a base could
/// re-enter the descriptor still being built.
pub(crate) fn base_info(key: TypeKey) -> &'static TypeInfo {
    REGISTRY.resolve(key).unwrap_or_else(|err| panic!("{err}"))
}

/// Descriptor of `T`
pub fn try_type_info<T: ?Sized + 'static>() -> Result<&'static TypeInfo> {
    try_type_info_by_key(TypeKey::of::<T>())
}

/// Descriptor of the type identified by `key`.
///
/// # Panics
///
/// Panics if the sources of the type are inconsistent.
pub fn type_info_by_key(key: TypeKey) -> &'static TypeInfo {
    try_type_info_by_key(key).unwrap_or_else(|err| panic!("{err}"))
}

/// Descriptor of `T`.
///
/// # Panics
///
/// Panics if the sources of `T` are inconsistent.
pub fn type_info<T: ?Sized + 'static>() -> &'static TypeInfo {
    type_info_by_key(TypeKey::of::<T>())
}

/// Every type with a registered source, in registration order
pub fn registered_types() -> Vec<TypeKey> {
    REGISTRY.registered()
}

/// Registered types deriving from `B`, ordered by reflected name.
///
/// Types whose own metadata is inconsistent are left out.
pub fn subtypes_of<B: ?Sized + 'static>() -> Vec<&'static TypeInfo> {
    let base = TypeKey::of::<B>();
    let mut found: Vec<_> = registered_types()
        .into_iter()
        .filter(|key| *key != base)
        .filter_map(|key| match try_type_info_by_key(key) {
            Ok(info) => Some(info),
            Err(err) => {
                tracing::warn!(%err, "skipping type in subtype listing");
                None
            }
        })
        .filter(|info| info.derives_from(base))
        .collect();
    found.sort_by_key(|info| (info.name(), info.type_name()));
    found
}

/// Descriptor of the concrete type behind `value`, if that type has a
/// registered source
pub fn dynamic_type_info(value: &dyn Any) -> Option<&'static TypeInfo> {
    let key = REGISTRY.known_key(Any::type_id(value))?;
    Some(type_info_by_key(key))
}
