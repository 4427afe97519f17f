use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` shares a value of type `T` between the thread that owns the
/// scene state and the background pipeline workers. Workers only ever take
/// read guards; mutation happens on the owning thread.
///
/// The lock is a `parking_lot::RwLock`, so there is no poisoning to handle: a
/// job that panics while holding a guard releases it during unwinding and the
/// resource stays usable.
///
/// # Examples
///
/// ```
/// use voxel_world::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let shared = counter.clone();
///
/// std::thread::spawn(move || *shared.get_mut() += 1)
///     .join()
///     .unwrap();
///
/// assert_eq!(*counter.get(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard. Multiple readers may hold one at the same time.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read()
    }

    /// Returns an exclusive write guard, blocking until all readers are gone.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write()
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
