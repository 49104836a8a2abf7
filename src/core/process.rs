//! Process-wide services consumed when building log events
//!
//! - process epoch (captured once, read-only afterwards)
//! - wall clock
//! - thread identity (small sequential ids, cached per thread)
//! - fiber identity (logical task id within a thread, 0 if none)

use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
    static CURRENT_FIBER: Cell<u64> = const { Cell::new(0) };
}

/// Capture the process epoch.
///
/// Only the first call has an effect; later calls return the instant that
/// was recorded then. Calling this early in `main` makes elapsed times
/// relative to startup rather than to the first log event.
pub fn init() -> Instant {
    *PROCESS_START.get_or_init(Instant::now)
}

/// Milliseconds elapsed since the process epoch
pub fn elapsed_ms() -> u64 {
    let elapsed = init().elapsed().as_millis();
    u64::try_from(elapsed).unwrap_or(u64::MAX)
}

pub fn now_wallclock() -> DateTime<Utc> {
    Utc::now()
}

/// Id of the calling OS thread.
///
/// Ids are assigned on first use, starting at 1, and stay stable for the
/// lifetime of the thread.
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        let cached = cache.get();
        if cached != 0 {
            return cached;
        }
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        cache.set(id);
        id
    })
}

/// Name of the calling thread, if it has one
pub fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Fiber id of the calling thread (0 when no fiber has been entered)
pub fn current_fiber_id() -> u64 {
    CURRENT_FIBER.with(Cell::get)
}

/// Mark the calling thread as running fiber `id` until the guard drops.
///
/// Guards nest: dropping one restores the id that was current when it was
/// created.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::core::process;
///
/// assert_eq!(process::current_fiber_id(), 0);
/// {
///     let _fiber = process::enter_fiber(7);
///     assert_eq!(process::current_fiber_id(), 7);
/// }
/// assert_eq!(process::current_fiber_id(), 0);
/// ```
#[must_use = "the fiber id is reset when the guard is dropped"]
pub fn enter_fiber(id: u64) -> FiberGuard {
    let previous = CURRENT_FIBER.with(|current| current.replace(id));
    FiberGuard {
        previous,
        _not_send: std::marker::PhantomData,
    }
}

/// RAII guard returned by [`enter_fiber`]
pub struct FiberGuard {
    previous: u64,
    // The guard restores a thread-local, so it must stay on its thread.
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Drop for FiberGuard {
    fn drop(&mut self) {
        CURRENT_FIBER.with(|current| current.set(self.previous));
    }
}
