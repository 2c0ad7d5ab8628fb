//! Correlation Registry
//!
//! The registry is the sole shared mutable resource of the bridge: a
//! mutex-guarded map from correlation id to registered sink. One-shot entries
//! back pending call results and in-flight constructions; persistent entries
//! back host callbacks the runtime may fire at arbitrary times.
//!
//! # Invariants
//!
//! - A minted id lives in exactly one entry until it is resolved or removed
//! - Resolving a one-shot entry removes it atomically; it fires at most once
//! - Persistent entries survive arbitrarily many resolutions until they are
//!   explicitly replaced or the registry is cleared

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use jsbridge_common::{BridgeError, CorrelationId, Result};

/// One-shot completion sink. Receives the delivered payload parameters.
pub type OneShotSink = Box<dyn FnOnce(Vec<Value>) + Send + 'static>;

/// Persistent no-argument callback.
pub type RunnableSink = Arc<dyn Fn() + Send + Sync + 'static>;

/// Persistent one-argument callback.
pub type ConsumerSink = Arc<dyn Fn(Value) + Send + Sync + 'static>;

/// A persistent host callback, tagged by the shape it expects.
pub enum PersistentSink {
    /// Fires with no payload parameter
    Runnable(RunnableSink),
    /// Fires with exactly one payload parameter
    Consumer(ConsumerSink),
}

/// Kind of a live registration, for inspection without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    OneShot,
    PersistentNoArg,
    PersistentOneArg,
}

enum Registration {
    OneShot(OneShotSink),
    Runnable(RunnableSink),
    Consumer(ConsumerSink),
}

impl Registration {
    fn kind(&self) -> RegistrationKind {
        match self {
            Registration::OneShot(_) => RegistrationKind::OneShot,
            Registration::Runnable(_) => RegistrationKind::PersistentNoArg,
            Registration::Consumer(_) => RegistrationKind::PersistentOneArg,
        }
    }
}

/// A sink ready to run, produced by [`CallbackRegistry::resolve`].
///
/// For one-shot entries this owns the sink (the registry entry is already
/// gone); for persistent entries it holds a clone and the entry remains.
pub enum Firing {
    OneShot(OneShotSink),
    Runnable(RunnableSink),
    Consumer(ConsumerSink),
}

impl Firing {
    pub fn kind(&self) -> RegistrationKind {
        match self {
            Firing::OneShot(_) => RegistrationKind::OneShot,
            Firing::Runnable(_) => RegistrationKind::PersistentNoArg,
            Firing::Consumer(_) => RegistrationKind::PersistentOneArg,
        }
    }

    /// Runs the sink with the delivered parameters.
    ///
    /// The parameter count is checked against the sink's declared shape:
    /// runnables take exactly zero, consumers exactly one, one-shot sinks at
    /// most one.
    pub fn run(self, mut params: Vec<Value>) -> Result<()> {
        match self {
            Firing::OneShot(sink) => {
                if params.len() > 1 {
                    return Err(BridgeError::Arity {
                        expected: 1,
                        got: params.len(),
                    });
                }
                sink(params);
                Ok(())
            }
            Firing::Runnable(sink) => {
                if !params.is_empty() {
                    return Err(BridgeError::Arity {
                        expected: 0,
                        got: params.len(),
                    });
                }
                sink();
                Ok(())
            }
            Firing::Consumer(sink) => {
                if params.len() != 1 {
                    return Err(BridgeError::Arity {
                        expected: 1,
                        got: params.len(),
                    });
                }
                sink(params.pop().expect("params has exactly one element"));
                Ok(())
            }
        }
    }
}

/// Thread-safe store of one-shot and persistent registrations.
pub struct CallbackRegistry {
    entries: Mutex<HashMap<CorrelationId, Registration>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        CallbackRegistry {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a one-shot completion sink and returns a freshly minted id.
    pub fn register_one_shot(&self, sink: OneShotSink) -> CorrelationId {
        let id = CorrelationId::mint();
        self.entries
            .lock()
            .unwrap()
            .insert(id, Registration::OneShot(sink));
        id
    }

    /// Registers a persistent callback and returns a freshly minted id.
    pub fn register_persistent(&self, sink: PersistentSink) -> CorrelationId {
        let id = CorrelationId::mint();
        let registration = match sink {
            PersistentSink::Runnable(f) => Registration::Runnable(f),
            PersistentSink::Consumer(f) => Registration::Consumer(f),
        };
        self.entries.lock().unwrap().insert(id, registration);
        id
    }

    /// Replaces the persistent registration under `id`.
    ///
    /// Returns `false` (and leaves the map untouched) when `id` is unknown or
    /// names a one-shot entry.
    pub fn replace_persistent(&self, id: CorrelationId, sink: PersistentSink) -> bool {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(&id) {
            Some(Registration::Runnable(_)) | Some(Registration::Consumer(_)) => {
                let registration = match sink {
                    PersistentSink::Runnable(f) => Registration::Runnable(f),
                    PersistentSink::Consumer(f) => Registration::Consumer(f),
                };
                entries.insert(id, registration);
                true
            }
            _ => false,
        }
    }

    /// Looks up `id` and produces its [`Firing`].
    ///
    /// One-shot entries are removed atomically; persistent entries stay put
    /// and a clone of the sink is returned. Unknown ids yield `None` - the
    /// caller logs and answers the channel negatively, never treats this as
    /// fatal.
    pub fn resolve(&self, id: &CorrelationId) -> Option<Firing> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(id) {
            Some(Registration::OneShot(_)) => match entries.remove(id) {
                Some(Registration::OneShot(sink)) => Some(Firing::OneShot(sink)),
                _ => None,
            },
            Some(Registration::Runnable(f)) => Some(Firing::Runnable(Arc::clone(f))),
            Some(Registration::Consumer(f)) => Some(Firing::Consumer(Arc::clone(f))),
            None => None,
        }
    }

    /// Peeks at the kind of the registration under `id` without touching it.
    pub fn get(&self, id: &CorrelationId) -> Option<RegistrationKind> {
        self.entries.lock().unwrap().get(id).map(Registration::kind)
    }

    /// Removes the registration under `id`. Returns whether one existed.
    pub fn remove(&self, id: &CorrelationId) -> bool {
        self.entries.lock().unwrap().remove(id).is_some()
    }

    pub fn contains(&self, id: &CorrelationId) -> bool {
        self.entries.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Drops every registration. Used when the bridge is torn down.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
