//! Allocation accounting. A counting [`GlobalAlloc`] delegating to the
//! system allocator; the binary (and the criterion bench) install it with
//! `#[global_allocator]`. Without installation the counters just stay at
//! zero, which keeps library unit tests independent of it.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

/// Tracks live and peak heap bytes across the process.
pub struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let current = ALLOCATED.fetch_add(layout.size(), Ordering::SeqCst) + layout.size();

        let mut peak = PEAK_ALLOCATED.load(Ordering::SeqCst);
        while current > peak {
            match PEAK_ALLOCATED.compare_exchange_weak(
                peak,
                current,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }

        // SAFETY: delegating to the system allocator with the same layout.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        ALLOCATED.fetch_sub(layout.size(), Ordering::SeqCst);
        // SAFETY: same ptr and layout we were handed.
        unsafe { System.dealloc(ptr, layout) }
    }
}

/// Live heap bytes right now.
pub fn current_allocated() -> usize {
    ALLOCATED.load(Ordering::SeqCst)
}

/// Peak live heap bytes since the last [`reset_peak`].
pub fn peak_allocated() -> usize {
    PEAK_ALLOCATED.load(Ordering::SeqCst)
}

/// Restart peak tracking from the current live figure. Live accounting is
/// never reset; bytes still allocated stay counted.
pub fn reset_peak() {
    PEAK_ALLOCATED.store(ALLOCATED.load(Ordering::SeqCst), Ordering::SeqCst);
}
