//! # Singleton Registry
//!
//! A process-wide, type-keyed registry guaranteeing at most one live
//! instance per type.
//!
//! - The first [`SingletonRegistry::get_or_init`] call for a type runs its
//!   initializer; every later call returns the stored instance and ignores
//!   its own initializer (and therefore its construction arguments).
//! - Each concrete type gets its own slot, so two singleton types never see
//!   each other's state.
//! - Slots are never emptied. Once initialized, an instance lives for the
//!   rest of the process.
//!
//! Types opting into the pattern implement [`Singleton`]. Their constructor
//! takes a [`ConstructToken`], which only this module can create, so the
//! registry is the only way to obtain an instance:
//!
//! ```compile_fail
//! use omega_core::kernel::singleton::{ConstructToken, Singleton};
//!
//! struct Clock;
//! impl Singleton for Clock {
//!     type Args = ();
//!     fn construct(_: (), _: ConstructToken) -> Self { Clock }
//! }
//!
//! let second = Clock::construct((), ConstructToken(()));
//! ```
//!
//! Duplication is ruled out by the type system: singleton types do not
//! implement `Clone`, and cloning an [`Instance`] handle copies the handle,
//! not the instance.
//!
//! ```compile_fail
//! use omega_core::kernel::singleton::{ConstructToken, Singleton};
//!
//! struct Clock;
//! impl Singleton for Clock {
//!     type Args = ();
//!     fn construct(_: (), _: ConstructToken) -> Self { Clock }
//! }
//!
//! let clock = Clock::instance(());
//! let duplicate: Clock = (*clock).clone();
//! ```
//!
//! Serialization is refused at runtime: [`Instance`] implements serde's
//! `Serialize` and `Deserialize`, and both always fail with a
//! [`SingletonViolation`].
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Misuse of a singleton-pattern type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SingletonViolation {
    #[error("serialize attempted on singleton '{type_name}'")]
    SerializeAttempted { type_name: &'static str },

    #[error("deserialize attempted on singleton '{type_name}'")]
    DeserializeAttempted { type_name: &'static str },

    #[error("singleton '{type_name}' already has an instance")]
    AlreadyRegistered { type_name: &'static str },
}

impl SingletonViolation {
    /// Name of the type the violation concerns.
    pub fn type_name(&self) -> &'static str {
        match self {
            SingletonViolation::SerializeAttempted { type_name }
            | SingletonViolation::DeserializeAttempted { type_name }
            | SingletonViolation::AlreadyRegistered { type_name } => type_name,
        }
    }
}

/// Proof that a constructor call comes from the registry.
///
/// The field is private; code outside this module cannot build one.
pub struct ConstructToken(());

/// Handle to the registered instance of `T`.
pub struct Instance<T>(Arc<T>);

impl<T> Instance<T> {
    /// Whether two handles point at the same instance.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T> Clone for Instance<T> {
    fn clone(&self) -> Self {
        Instance(Arc::clone(&self.0))
    }
}

impl<T> Deref for Instance<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Instance").field(&*self.0).finish()
    }
}

impl<T> Serialize for Instance<T> {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom(
            SingletonViolation::SerializeAttempted {
                type_name: type_name::<T>(),
            },
        ))
    }
}

impl<'de, T> Deserialize<'de> for Instance<T> {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(serde::de::Error::custom(
            SingletonViolation::DeserializeAttempted {
                type_name: type_name::<T>(),
            },
        ))
    }
}

type Slot = Arc<OnceLock<Arc<dyn Any + Send + Sync>>>;

/// Type-keyed registry of singleton instances.
///
/// The map lock is only held to find a type's slot; initializers run outside
/// it, so one singleton's constructor may obtain another singleton. An
/// initializer that asks for its own type deadlocks.
#[derive(Default)]
pub struct SingletonRegistry {
    slots: Mutex<HashMap<TypeId, Slot>>,
}

static GLOBAL_REGISTRY: OnceLock<SingletonRegistry> = OnceLock::new();

impl SingletonRegistry {
    /// Create an empty, independent registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`Singleton::instance`].
    pub fn global() -> &'static SingletonRegistry {
        GLOBAL_REGISTRY.get_or_init(SingletonRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot<T: Any>(&self) -> Slot {
        self.lock().entry(TypeId::of::<T>()).or_default().clone()
    }

    fn downcast<T: Any + Send + Sync>(value: Arc<dyn Any + Send + Sync>) -> Instance<T> {
        Instance(
            Arc::downcast::<T>(value)
                .unwrap_or_else(|_| unreachable!("singleton slot is keyed by its value's TypeId")),
        )
    }

    /// Return the instance of `T`, running `init` only if there is none yet.
    pub fn get_or_init<T, F>(&self, init: F) -> Instance<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let value = self
            .slot::<T>()
            .get_or_init(|| {
                log::debug!("Constructing singleton {}", type_name::<T>());
                Arc::new(init()) as Arc<dyn Any + Send + Sync>
            })
            .clone();
        Self::downcast(value)
    }

    /// Store `value` as the instance of `T`.
    ///
    /// Fails if `T` already has an instance; the existing one is kept.
    pub fn register<T>(&self, value: T) -> Result<Instance<T>, SingletonViolation>
    where
        T: Any + Send + Sync,
    {
        let value = Arc::new(value);
        self.slot::<T>()
            .set(value.clone() as Arc<dyn Any + Send + Sync>)
            .map_err(|_| SingletonViolation::AlreadyRegistered {
                type_name: type_name::<T>(),
            })?;
        log::debug!("Registered singleton {}", type_name::<T>());
        Ok(Instance(value))
    }

    /// The instance of `T`, if one has been created.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Instance<T>> {
        let slot = self.lock().get(&TypeId::of::<T>()).cloned()?;
        slot.get().cloned().map(Self::downcast::<T>)
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Number of initialized instances.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("instances", &self.len())
            .finish()
    }
}

/// A type with at most one instance per registry.
pub trait Singleton: Any + Send + Sync + Sized {
    /// Construction arguments. Only the first `instance` call's arguments
    /// are ever used.
    type Args;

    /// Build the instance. Called by the registry, at most once per registry.
    fn construct(args: Self::Args, token: ConstructToken) -> Self;

    /// The instance in the process-wide registry.
    fn instance(args: Self::Args) -> Instance<Self> {
        Self::instance_in(SingletonRegistry::global(), args)
    }

    /// The instance in `registry`.
    fn instance_in(registry: &SingletonRegistry, args: Self::Args) -> Instance<Self> {
        registry.get_or_init(|| Self::construct(args, ConstructToken(())))
    }
}
