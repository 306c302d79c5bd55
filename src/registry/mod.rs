//! The concurrent set of registered processors.
//!
//! A [`ProcessorRegistry`] owns the processors of one
//! [`Dispatcher`](crate::Dispatcher). It can be replaced wholesale, grown,
//! shrunk by [`ProcessorHandle`] and snapshotted, all from any number of
//! threads at once.
//!
//! Every mutation takes the write lock for its whole duration. [`get`] only
//! holds the read lock while copying the entries, so processors always run
//! with no lock held and a slow processor never blocks registration.
//!
//! Entries are an unordered set: removal swaps the last entry into the freed
//! slot, and callers must not rely on the order of a snapshot.
//!
//! [`get`]: ProcessorRegistry::get
//!
//! ```rust
//! use errproc::{Error, Processor, registry::ProcessorRegistry};
//!
//! let registry = ProcessorRegistry::new();
//! let handles = registry.add([Processor::named("log", |_: &Error| {})]);
//! assert_eq!(registry.len(), 1);
//!
//! registry.remove(&handles);
//! assert!(registry.is_empty());
//! ```

mod lock;

use alloc::vec::Vec;
use core::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use self::lock::RegistryLock;
use crate::Processor;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Identifies one registration of a processor.
///
/// Handles are unique for the lifetime of the process and are never reused,
/// so removing a stale handle can never remove somebody else's entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessorHandle(u64);

impl ProcessorHandle {
    fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// The numeric id behind the handle.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProcessorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry {
    handle: ProcessorHandle,
    processor: Processor,
}

fn entries_from<I>(processors: I) -> Vec<Entry>
where
    I: IntoIterator,
    I::Item: Into<Processor>,
{
    processors
        .into_iter()
        .map(|processor| Entry {
            handle: ProcessorHandle::next(),
            processor: processor.into(),
        })
        .collect()
}

/// A thread-safe, unordered set of registered processors.
pub struct ProcessorRegistry {
    entries: RegistryLock<Vec<Entry>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: RegistryLock::new(Vec::new()),
        }
    }

    /// Discards every registered processor and installs `processors` in one
    /// step.
    ///
    /// Concurrent readers see either the previous set or the new one, never a
    /// mix. Each item becomes its own entry, duplicates included. Handles of
    /// the discarded entries become stale and removing them is a no-op.
    pub fn replace_all<I>(&self, processors: I)
    where
        I: IntoIterator,
        I::Item: Into<Processor>,
    {
        let entries = entries_from(processors);
        let previous = core::mem::replace(&mut *self.entries.write(), entries);
        // The write guard is released above; old processors drop unlocked.
        drop(previous);
    }

    /// Adds `processors` to the set and returns one handle per processor, in
    /// argument order.
    ///
    /// Nothing is deduplicated: adding the same processor twice yields two
    /// independent entries.
    pub fn add<I>(&self, processors: I) -> Vec<ProcessorHandle>
    where
        I: IntoIterator,
        I::Item: Into<Processor>,
    {
        let mut entries = entries_from(processors);
        let handles = entries.iter().map(|entry| entry.handle).collect();
        if !entries.is_empty() {
            self.entries.write().append(&mut entries);
        }
        handles
    }

    /// Removes the entries behind `handles`.
    ///
    /// Handles that are not registered (already removed, discarded by
    /// [`replace_all`](Self::replace_all), or repeated within `handles`) are
    /// ignored.
    ///
    /// Every call first indexes the whole registry, O(n) in the number of
    /// registered entries. Each handle is then removed in O(1) by swapping the
    /// last entry into its slot, so registration order is not preserved.
    pub fn remove(&self, handles: &[ProcessorHandle]) {
        if handles.is_empty() {
            return;
        }

        let mut removed = Vec::new();
        {
            let mut entries = self.entries.write();
            let mut index: HashMap<ProcessorHandle, usize, FxBuildHasher> =
                HashMap::with_capacity_and_hasher(entries.len(), FxBuildHasher);
            for (position, entry) in entries.iter().enumerate() {
                index.insert(entry.handle, position);
            }

            for handle in handles {
                let Some(position) = index.remove(handle) else {
                    continue;
                };
                removed.push(entries.swap_remove(position));
                if let Some(moved) = entries.get(position) {
                    index.insert(moved.handle, position);
                }
            }
        }
        drop(removed);
    }

    /// Returns a copy of the registered processors.
    ///
    /// The snapshot is independent of the registry: later mutations do not
    /// show up in it, and iterating it holds no lock.
    #[must_use]
    pub fn get(&self) -> Vec<Processor> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.processor.clone())
            .collect()
    }

    /// The number of registered processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no processor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether `handle` refers to a registered entry.
    #[must_use]
    pub fn contains(&self, handle: ProcessorHandle) -> bool {
        self.entries
            .read()
            .iter()
            .any(|entry| entry.handle == handle)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_map()
            .entries(
                entries
                    .iter()
                    .map(|entry| (entry.handle, entry.processor.name())),
            )
            .finish()
    }
}
