#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// Read-write lock guarding a registry's entry list.
///
/// Backed by [`std::sync::RwLock`] when the `std` feature is enabled and by
/// [`spin::RwLock`] otherwise. A poisoned std lock is recovered by taking the
/// inner value: every critical section leaves the list in a valid state.
#[repr(transparent)]
pub(crate) struct RegistryLock<T>(impl_::RwLock<T>);

pub(crate) type RegistryReadGuard<'a, T> = impl_::RwLockReadGuard<'a, T>;
pub(crate) type RegistryWriteGuard<'a, T> = impl_::RwLockWriteGuard<'a, T>;

impl<T> RegistryLock<T> {
    #[must_use]
    pub(crate) const fn new(value: T) -> Self {
        Self(impl_::RwLock::new(value))
    }

    #[inline]
    pub(crate) fn read(&self) -> RegistryReadGuard<'_, T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        #[cfg(feature = "std")]
        let guard = self.0.read().unwrap_or_else(impl_::PoisonError::into_inner);

        guard
    }

    #[inline]
    pub(crate) fn write(&self) -> RegistryWriteGuard<'_, T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.write();

        #[cfg(feature = "std")]
        let guard = self.0.write().unwrap_or_else(impl_::PoisonError::into_inner);

        guard
    }
}
