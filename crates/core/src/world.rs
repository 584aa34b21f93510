//! The World: an ordered catalog of host types eligible for by-name reference.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{SortKey, TypeConfiguration};
use crate::error::{Error, Result};
use crate::shape::{HostType, TypePath};

/// A registered host type with its assigned name and configuration.
#[derive(Debug, Clone)]
pub struct Entry {
    host: HostType,
    name: String,
    config: TypeConfiguration,
    doc: Option<String>,
}

impl Entry {
    pub fn host(&self) -> &HostType {
        &self.host
    }

    /// The name the type is emitted and referenced under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TypeConfiguration {
        &self.config
    }

    /// Caller-supplied documentation, falling back to the host type's own.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref().or_else(|| self.host.doc())
    }
}

impl SortKey<Entry> {
    /// Order entries alphabetically by assigned name.
    pub fn by_name() -> Self {
        Self::new(|entry: &Entry| entry.name.clone())
    }
}

/// Position of an entry in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(usize);

impl EntryHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Optional registration parameters.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: Option<String>,
    pub config: TypeConfiguration,
    pub doc: Option<String>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: TypeConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Registry of host types, keyed by qualified path, in registration order.
#[derive(Debug, Clone, Default)]
pub struct World {
    entries: IndexMap<String, Entry>,
    /// Assigned name -> path of the type holding it.
    names: HashMap<String, String>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `host` under its intrinsic name with the default configuration.
    pub fn register(&mut self, host: HostType) -> Result<EntryHandle> {
        self.register_with(host, Registration::default())
    }

    /// Register `host` with an explicit name, configuration or doc.
    ///
    /// Registering the same host type again is a no-op returning the existing
    /// handle. A name already held by a different host type is an error.
    pub fn register_with(&mut self, host: HostType, registration: Registration) -> Result<EntryHandle> {
        registration.config.validate()?;

        if let Some(index) = self.entries.get_index_of(host.path()) {
            debug!(path = %host.path(), "Type already registered.");
            return Ok(EntryHandle(index));
        }

        let name = registration
            .name
            .unwrap_or_else(|| host.name().to_string());
        if let Some(existing) = self.names.get(&name) {
            return Err(Error::NameCollision {
                name,
                existing: existing.clone(),
                incoming: host.path().to_string(),
            });
        }

        debug!(path = %host.path(), name = %name, "Registered type.");
        self.names.insert(name.clone(), host.path().to_string());
        let (index, _) = self.entries.insert_full(
            host.path().to_string(),
            Entry {
                host,
                name,
                config: registration.config,
                doc: registration.doc,
            },
        );
        Ok(EntryHandle(index))
    }

    /// Register several host types with default settings, stopping at the first error.
    pub fn register_many<I>(&mut self, hosts: I) -> Result<Vec<EntryHandle>>
    where
        I: IntoIterator<Item = HostType>,
    {
        hosts.into_iter().map(|host| self.register(host)).collect()
    }

    /// The name assigned to a registered host type.
    pub fn lookup_name<P: TypePath + ?Sized>(&self, host: &P) -> Result<&str> {
        self.name_of(host.type_path())
            .ok_or_else(|| Error::UnknownType {
                path: host.type_path().to_string(),
            })
    }

    pub(crate) fn name_of(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(Entry::name)
    }

    /// Whether some registered type holds `name`.
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn contains<P: TypePath + ?Sized>(&self, host: &P) -> bool {
        self.entries.contains_key(host.type_path())
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&Entry> {
        self.entries.get_index(handle.0).map(|(_, entry)| entry)
    }

    /// Look up an entry by the path of its host type.
    pub fn entry<P: TypePath + ?Sized>(&self, host: &P) -> Option<&Entry> {
        self.entries.get(host.type_path())
    }

    /// Entries in registration order, or stably sorted by `order_by`.
    pub fn iterate(&self, order_by: Option<&SortKey<Entry>>) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        if let Some(key) = order_by {
            entries.sort_by_cached_key(|entry| key.key(entry));
        }
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
