//! Owned references to provider-side objects
//!
//! Every non-null reference the provider hands back is wrapped in a
//! [`JavaObjectHandle`] that releases it exactly once: explicitly through
//! [`JavaObjectHandle::release`], or on drop as the backstop for every
//! early-return and error path. The provider is multi-VM-aware, so the
//! owning VM id travels with the handle and accompanies every call on it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sink for provider-side reference releases.
///
/// Implemented by the dispatch client (which forwards to the provider's
/// release export) and by test providers. Release is best-effort: failures
/// are invisible to the caller and implementations must not panic — this
/// runs on drop paths.
pub trait ObjectReleaser: Send + Sync {
    /// Release one provider reference. Called at most once per handle.
    fn release_object(&self, vm_id: i32, raw: u64);
}

/// An owned reference to a provider-side object, scoped to one VM.
///
/// Uniquely owned by whichever component holds it; passing it to a
/// dispatch call borrows it for the call's duration only. A zero raw
/// value is the provider's "no object" sentinel and is never released.
///
/// Using a handle after [`release`](Self::release) is a caller bug and
/// panics rather than silently reaching the provider with a dangling
/// reference.
pub struct JavaObjectHandle {
    vm_id: i32,
    raw: u64,
    released: AtomicBool,
    releaser: Option<Arc<dyn ObjectReleaser>>,
}

impl JavaObjectHandle {
    /// Wrap a raw provider reference. A zero `raw` yields the null handle
    /// and retains no releaser.
    pub fn wrap(vm_id: i32, raw: u64, releaser: Arc<dyn ObjectReleaser>) -> Self {
        JavaObjectHandle {
            vm_id,
            raw,
            released: AtomicBool::new(false),
            releaser: if raw == 0 { None } else { Some(releaser) },
        }
    }

    /// The null handle: the provider's "no object" sentinel.
    pub fn null(vm_id: i32) -> Self {
        JavaObjectHandle {
            vm_id,
            raw: 0,
            released: AtomicBool::new(false),
            releaser: None,
        }
    }

    /// The VM instance this handle belongs to.
    pub fn vm_id(&self) -> i32 {
        self.vm_id
    }

    /// Whether this is the "no object" sentinel.
    pub fn is_null(&self) -> bool {
        self.raw == 0
    }

    /// Whether the underlying reference has already been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// The raw reference value, for the duration of one dispatch call.
    ///
    /// # Panics
    ///
    /// Panics if the handle has been released — the reference would be
    /// dangling on the provider side.
    pub fn raw(&self) -> u64 {
        assert!(
            !self.is_released(),
            "released accessibility object handle used in a provider call (vm {})",
            self.vm_id
        );
        self.raw
    }

    /// Release the provider-side reference.
    ///
    /// Idempotent: the first call forwards to the provider, later calls
    /// are no-ops and never reach it. Null handles are no-ops entirely.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(releaser) = &self.releaser {
            releaser.release_object(self.vm_id, self.raw);
        }
    }
}

impl Drop for JavaObjectHandle {
    fn drop(&mut self) {
        // Backstop for handles never explicitly released; shares the
        // exactly-once guard with `release`.
        self.release();
    }
}

impl fmt::Debug for JavaObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaObjectHandle")
            .field("vm_id", &self.vm_id)
            .field("raw", &format_args!("{:#x}", self.raw))
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Ledger {
        releases: Mutex<Vec<(i32, u64)>>,
    }

    impl Ledger {
        fn new() -> Arc<Self> {
            Arc::new(Ledger {
                releases: Mutex::new(Vec::new()),
            })
        }
    }

    impl ObjectReleaser for Ledger {
        fn release_object(&self, vm_id: i32, raw: u64) {
            self.releases.lock().push((vm_id, raw));
        }
    }

    #[test]
    fn test_release_exactly_once() {
        let ledger = Ledger::new();
        let handle = JavaObjectHandle::wrap(7, 0x1234, ledger.clone());

        handle.release();
        handle.release();
        drop(handle);

        assert_eq!(&*ledger.releases.lock(), &[(7, 0x1234)]);
    }

    #[test]
    fn test_drop_releases() {
        let ledger = Ledger::new();
        {
            let _handle = JavaObjectHandle::wrap(3, 42, ledger.clone());
        }
        assert_eq!(&*ledger.releases.lock(), &[(3, 42)]);
    }

    #[test]
    fn test_null_handle_never_releases() {
        let ledger = Ledger::new();
        {
            let handle = JavaObjectHandle::wrap(1, 0, ledger.clone());
            assert!(handle.is_null());
            handle.release();
        }
        {
            let handle = JavaObjectHandle::null(1);
            assert!(handle.is_null());
        }
        assert!(ledger.releases.lock().is_empty());
    }

    #[test]
    #[should_panic(expected = "released accessibility object handle")]
    fn test_use_after_release_panics() {
        let ledger = Ledger::new();
        let handle = JavaObjectHandle::wrap(1, 99, ledger);
        handle.release();
        let _ = handle.raw();
    }

    #[test]
    fn test_vm_id_travels_with_handle() {
        let ledger = Ledger::new();
        let handle = JavaObjectHandle::wrap(12, 5, ledger.clone());
        assert_eq!(handle.vm_id(), 12);
        drop(handle);
        assert_eq!(ledger.releases.lock()[0].0, 12);
    }
}
