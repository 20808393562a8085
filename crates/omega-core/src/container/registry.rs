use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::container::error::ContainerError;
use crate::kernel::error::Result;

type SharedAny = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> Result<SharedAny> + Send + Sync>;

#[derive(Clone)]
enum Binding {
    /// A ready value, returned as-is on every resolve.
    Instance(SharedAny),
    /// Factory invoked on every resolve.
    Transient(Factory),
    /// Factory invoked once; the result replaces the binding.
    Shared(Factory),
}

struct Entry {
    type_name: &'static str,
    binding: Binding,
}

/// Service container keyed by the *concrete* type's `TypeId`.
///
/// All methods take `&self`; the maps sit behind `RwLock`s so the container
/// can be shared with route handlers while shared bindings are resolved
/// lazily. Locks are never held while a factory runs, so factories may
/// resolve other services.
#[derive(Default)]
pub struct Container {
    bindings: RwLock<HashMap<TypeId, Entry>>,
    aliases: RwLock<HashMap<String, TypeId>>,
}

impl Container {
    /// Create a new empty container
    pub fn new() -> Self {
        Self::default()
    }

    fn read_bindings(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Entry>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bindings(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Entry>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert<T: Any>(&self, binding: Binding) {
        let previous = self.write_bindings().insert(
            TypeId::of::<T>(),
            Entry {
                type_name: type_name::<T>(),
                binding,
            },
        );
        if previous.is_some() {
            log::debug!("Replaced container binding for {}", type_name::<T>());
        }
    }

    /// Register an existing instance. Later resolves return this exact `Arc`.
    pub fn instance<T>(&self, value: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        self.insert::<T>(Binding::Instance(value));
    }

    /// Register a factory that builds a fresh value on every resolve.
    pub fn bind<T, F>(&self, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert::<T>(Binding::Transient(Arc::new(move |c: &Container| {
            factory(c).map(|value| Arc::new(value) as SharedAny)
        })));
    }

    /// Register a factory that runs on first resolve; the value is cached.
    pub fn singleton<T, F>(&self, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.insert::<T>(Binding::Shared(Arc::new(move |c: &Container| {
            factory(c).map(|value| Arc::new(value) as SharedAny)
        })));
    }

    /// Make the binding for `T` reachable under `name` as well.
    pub fn alias<T: Any>(&self, name: impl Into<String>) {
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), TypeId::of::<T>());
    }

    /// Resolve the service registered for `T`.
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let type_id = TypeId::of::<T>();
        let binding = self
            .read_bindings()
            .get(&type_id)
            .map(|entry| entry.binding.clone())
            .ok_or(ContainerError::NotBound {
                type_name: type_name::<T>(),
            })?;

        let value = match binding {
            Binding::Instance(value) => value,
            Binding::Transient(factory) => factory(self)?,
            Binding::Shared(factory) => {
                let mut value = factory(self)?;
                let mut bindings = self.write_bindings();
                if let Some(entry) = bindings.get_mut(&type_id) {
                    match &entry.binding {
                        Binding::Shared(_) => entry.binding = Binding::Instance(value.clone()),
                        // Another resolve finished first; keep its value.
                        Binding::Instance(existing) => value = existing.clone(),
                        Binding::Transient(_) => {}
                    }
                }
                value
            }
        };

        Arc::downcast::<T>(value).map_err(|_| {
            ContainerError::TypeMismatch {
                expected: type_name::<T>(),
            }
            .into()
        })
    }

    /// Resolve through an alias registered with [`Container::alias`].
    pub fn resolve_alias<T>(&self, name: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let target = self
            .aliases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .ok_or_else(|| ContainerError::AliasNotFound(name.to_string()))?;
        if target != TypeId::of::<T>() {
            return Err(ContainerError::TypeMismatch {
                expected: type_name::<T>(),
            }
            .into());
        }
        self.resolve::<T>()
    }

    /// Whether a binding exists for `T`.
    pub fn has<T: Any>(&self) -> bool {
        self.read_bindings().contains_key(&TypeId::of::<T>())
    }

    /// Remove the binding for `T` and every alias pointing at it.
    pub fn forget<T: Any>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, target| *target != type_id);
        self.write_bindings().remove(&type_id).is_some()
    }

    /// Type names of all bindings, sorted.
    pub fn bound_type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .read_bindings()
            .values()
            .map(|entry| entry.type_name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.read_bindings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all bindings and aliases.
    pub fn clear(&self) {
        self.write_bindings().clear();
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bound_type_names())
            .finish_non_exhaustive()
    }
}
