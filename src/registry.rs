//! Interpreter state per open buffer.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use tracing::debug;

use crate::engine::{Engine, EngineBuilder, EngineConfig};
use crate::traits::TextBuffer;

/// Owns one [`Engine`] per buffer id.
///
/// Hosts call [`Registry::attach`] when a buffer is loaded or created,
/// [`Registry::engine`] to route keys, and [`Registry::detach`] when the
/// buffer closes.
#[derive(Debug)]
pub struct Registry<Id> {
    config: EngineConfig,
    engines: HashMap<Id, Engine>,
}

impl<Id: Eq + Hash + std::fmt::Debug> Default for Registry<Id> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<Id: Eq + Hash + std::fmt::Debug> Registry<Id> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            engines: HashMap::new(),
        }
    }

    /// Start interpreting keys for `id`, replacing any earlier engine.
    pub fn attach<B: TextBuffer + ?Sized>(&mut self, id: Id, buffer: &mut B) -> &mut Engine {
        debug!(target: "vim.registry", ?id, "attach");
        let engine = EngineBuilder::default().config(self.config.clone()).build();
        engine.announce(buffer);
        match self.engines.entry(id) {
            Entry::Occupied(mut slot) => {
                slot.insert(engine);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(engine),
        }
    }

    /// The engine for `id`. Buffers that were never attached get an
    /// insert-only engine.
    pub fn engine(&mut self, id: Id) -> &mut Engine {
        self.engines.entry(id).or_insert_with(Engine::insert_only)
    }

    pub fn get(&self, id: &Id) -> Option<&Engine> {
        self.engines.get(id)
    }

    pub fn get_mut(&mut self, id: &Id) -> Option<&mut Engine> {
        self.engines.get_mut(id)
    }

    /// Drop the engine of a closed buffer.
    pub fn detach(&mut self, id: &Id) -> Option<Engine> {
        debug!(target: "vim.registry", ?id, "detach");
        self.engines.remove(id)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
