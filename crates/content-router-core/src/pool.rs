//! Object pooling for allocation-free steady-state dispatch.
//!
//! A [`Pool`] keeps a free-list of idle instances of one type and hands them
//! out on demand, constructing new ones through its factory only when the
//! list is empty. Every poolable type implements [`Reset`]; the pool invokes
//! it at *release* time, so an acquired instance is always logically empty.
//!
//! Pools are owned values — construct one and pass it where it is needed.
//! There are no process-wide singletons.
//!
//! # Thread Safety
//!
//! `Pool` is `Send + Sync` and safe for unsynchronized concurrent use. The
//! free-list is guarded by a `parking_lot::Mutex`; acquire and release take
//! the lock only long enough to pop or push one entry.

use parking_lot::Mutex;

use crate::buffer::Buffer;

/// The reset contract for poolable types.
///
/// Resetting must return the instance to its logically empty state while
/// retaining whatever allocations make reuse worthwhile. The pool calls
/// this on every [`release`](Pool::release), never on acquire.
pub trait Reset {
    /// Returns the instance to its logically empty state.
    fn reset(&mut self);
}

impl Reset for Buffer {
    fn reset(&mut self) {
        Buffer::reset(self);
    }
}

/// A concurrency-safe free-list of reusable instances.
///
/// Acquisition never fails and never blocks on exhaustion: when the
/// free-list is empty, the factory constructs a fresh instance.
///
/// # Example
///
/// ```
/// use content_router_core::{Buffer, Pool};
///
/// let pool = Pool::new(Buffer::new);
///
/// let mut buf = pool.acquire();
/// buf.write_str("payload");
/// pool.release(buf);
///
/// // The released instance comes back logically empty.
/// let buf = pool.acquire();
/// assert!(buf.is_empty());
/// ```
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    factory: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T: Reset> Pool<T> {
    /// Creates a pool that constructs new instances with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            idle: Mutex::new(Vec::new()),
            factory: Box::new(factory),
        }
    }

    /// Takes an idle instance, or constructs a fresh one if none is idle.
    ///
    /// The returned instance is logically empty: released instances were
    /// reset on the way in, and fresh instances start empty by
    /// construction.
    pub fn acquire(&self) -> T {
        if let Some(obj) = self.idle.lock().pop() {
            return obj;
        }
        (self.factory)()
    }

    /// Resets `obj` and returns it to the free-list.
    pub fn release(&self, mut obj: T) {
        obj.reset();
        self.idle.lock().push(obj);
    }

    /// Returns a best-effort count of idle instances.
    ///
    /// Advisory only: the count may be stale by the time it is read under
    /// concurrent acquire/release traffic. Intended for monitoring, never
    /// for correctness decisions.
    pub fn size(&self) -> usize {
        self.idle.lock().len()
    }
}

impl<T> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle.lock().len())
            .finish_non_exhaustive()
    }
}

/// A buffer pool with the acquire/release surface the router exposes.
///
/// Thin wrapper over [`Pool<Buffer>`]; exists so the router can hand
/// callers a buffer source without exposing pooling generics.
pub struct BufferManager {
    pool: Pool<Buffer>,
}

impl BufferManager {
    /// Creates a manager backed by a fresh buffer pool.
    pub fn new() -> Self {
        Self {
            pool: Pool::new(Buffer::new),
        }
    }

    /// Takes an empty buffer from the pool.
    pub fn acquire(&self) -> Buffer {
        self.pool.acquire()
    }

    /// Resets `buf` and returns it to the pool.
    pub fn release(&self, buf: Buffer) {
        self.pool.release(buf);
    }

    /// Returns a best-effort count of idle buffers. Advisory only.
    pub fn size(&self) -> usize {
        self.pool.size()
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BufferManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferManager")
            .field("idle", &self.pool.size())
            .finish()
    }
}
