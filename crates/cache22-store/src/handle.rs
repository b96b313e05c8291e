use std::sync::{Arc, RwLock};

use crate::config::IsolationMode;
use crate::namespace::Namespace;

/// Access to a namespace under one of the [`IsolationMode`]s.
///
/// The server keeps one handle as the master and gives each connection
/// [`NamespaceHandle::attach`]. With `Snapshot`, the attached handle starts
/// as a shared `Arc` of the master and clones it on its first write, so the
/// connection sees the store as it was at accept time and nobody else ever
/// sees its writes. With `Shared`, every handle points at the same locked
/// namespace.
#[derive(Clone, Debug)]
pub enum NamespaceHandle {
    Snapshot(Arc<Namespace>),
    Shared(Arc<RwLock<Namespace>>),
}

impl NamespaceHandle {
    pub fn new(namespace: Namespace, mode: IsolationMode) -> Self {
        match mode {
            IsolationMode::Snapshot => Self::Snapshot(Arc::new(namespace)),
            IsolationMode::Shared => Self::Shared(Arc::new(RwLock::new(namespace))),
        }
    }

    pub fn mode(&self) -> IsolationMode {
        match self {
            Self::Snapshot(_) => IsolationMode::Snapshot,
            Self::Shared(_) => IsolationMode::Shared,
        }
    }

    /// A handle for one new connection.
    pub fn attach(&self) -> Self {
        self.clone()
    }

    /// Run `f` against the namespace.
    pub fn read<R>(&self, f: impl FnOnce(&Namespace) -> R) -> R {
        match self {
            Self::Snapshot(ns) => f(ns.as_ref()),
            Self::Shared(lock) => {
                let guard = lock.read().expect("namespace lock poisoned");
                f(&*guard)
            }
        }
    }

    /// Run `f` against the namespace with write access.
    ///
    /// For a snapshot this detaches from every other holder of the same
    /// snapshot before `f` runs.
    pub fn write<R>(&mut self, f: impl FnOnce(&mut Namespace) -> R) -> R {
        match self {
            Self::Snapshot(ns) => f(Arc::make_mut(ns)),
            Self::Shared(lock) => {
                let mut guard = lock.write().expect("namespace lock poisoned");
                f(&mut *guard)
            }
        }
    }
}

impl Default for NamespaceHandle {
    fn default() -> Self {
        Self::new(Namespace::new(), IsolationMode::default())
    }
}
