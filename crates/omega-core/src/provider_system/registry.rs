use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::kernel::error::Result;
use crate::provider_system::error::ProviderError;
use crate::provider_system::list::load_provider_names;
use crate::provider_system::traits::ServiceProvider;

/// Fallible constructor for a provider.
pub type ProviderFactory = Arc<dyn Fn() -> Result<Box<dyn ServiceProvider>> + Send + Sync>;

/// A named provider factory, ready to be constructed during bind.
#[derive(Clone)]
pub struct ProviderEntry {
    name: String,
    factory: ProviderFactory,
}

impl ProviderEntry {
    pub fn new(name: impl Into<String>, factory: ProviderFactory) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construct the provider.
    pub fn construct(&self) -> Result<Box<dyn ServiceProvider>> {
        (self.factory)()
    }
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn boxed_factory<P, F>(factory: F) -> ProviderFactory
where
    P: ServiceProvider + 'static,
    F: Fn() -> Result<P> + Send + Sync + 'static,
{
    Arc::new(move || factory().map(|p| Box::new(p) as Box<dyn ServiceProvider>))
}

/// Ordered provider list plus the catalog used to resolve names from the
/// provider list file.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    explicit: Vec<ProviderEntry>,
    catalog: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the explicit list.
    pub fn register<P, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        P: ServiceProvider + 'static,
        F: Fn() -> Result<P> + Send + Sync + 'static,
    {
        self.explicit.push(ProviderEntry::new(name, boxed_factory(factory)));
        self
    }

    /// Append a provider constructed with `Default`, named after its type.
    pub fn register_default<P>(&mut self) -> &mut Self
    where
        P: ServiceProvider + Default + 'static,
    {
        self.register(type_name::<P>(), || Ok(P::default()))
    }

    /// Make a provider available to the provider list file under `name`.
    pub fn catalog<P, F>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        P: ServiceProvider + 'static,
        F: Fn() -> Result<P> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.catalog.contains_key(&name) {
            return Err(ProviderError::DuplicateCatalogEntry(name).into());
        }
        self.catalog.insert(name, boxed_factory(factory));
        Ok(())
    }

    /// Names in the explicit list, in order.
    pub fn explicit_names(&self) -> Vec<&str> {
        self.explicit.iter().map(ProviderEntry::name).collect()
    }

    /// Catalog names, sorted.
    pub fn catalog_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.catalog.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The full ordered provider sequence for a bootstrap: explicit entries
    /// first, then the names from the provider list in `config_dir`.
    pub fn resolve_entries(&self, config_dir: &Path) -> Result<Vec<ProviderEntry>> {
        let mut entries = self.explicit.clone();
        for name in load_provider_names(config_dir)? {
            let factory = self.catalog.get(&name).cloned().ok_or_else(|| {
                ProviderError::UnknownProvider {
                    name: name.clone(),
                    path: config_dir.to_path_buf(),
                }
            })?;
            entries.push(ProviderEntry::new(name, factory));
        }
        Ok(entries)
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("explicit", &self.explicit_names())
            .field("catalog", &self.catalog_names())
            .finish()
    }
}
