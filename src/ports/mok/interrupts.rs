//! Mock global interrupt flag with critical section nesting.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

static INTERRUPTS_ENABLED: AtomicBool = AtomicBool::new(false);
static CRITICAL_DEPTH: AtomicU8 = AtomicU8::new(0);
static SAVED_FLAG: AtomicBool = AtomicBool::new(false);

pub fn enter_critical() {
    if CRITICAL_DEPTH.fetch_add(1, Ordering::SeqCst) == 0 {
        SAVED_FLAG.store(INTERRUPTS_ENABLED.swap(false, Ordering::SeqCst), Ordering::SeqCst);
    }
}

pub fn exit_critical() {
    debug_assert!(CRITICAL_DEPTH.load(Ordering::SeqCst) > 0, "unbalanced critical exit");
    if CRITICAL_DEPTH.fetch_sub(1, Ordering::SeqCst) == 1 {
        INTERRUPTS_ENABLED.store(SAVED_FLAG.load(Ordering::SeqCst), Ordering::SeqCst);
    }
}

pub fn enable_interrupts() {
    INTERRUPTS_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_interrupts() {
    INTERRUPTS_ENABLED.store(false, Ordering::SeqCst);
}

/// Observe the mock interrupt flag.
pub fn interrupts_enabled() -> bool {
    INTERRUPTS_ENABLED.load(Ordering::SeqCst)
}

/// Observe the critical section nesting depth.
pub fn critical_depth() -> u8 {
    CRITICAL_DEPTH.load(Ordering::SeqCst)
}
