//! The resource manager.
//!
//! Resources gate scheduling instead of blocking their acquirers. Every task
//! that touches a resource declares it in its descriptor at configuration
//! time; while any declared task occupies the resource, the scheduler refuses
//! to run every other task that declared it, whatever their priorities. The
//! occupying task itself never blocks. Tasks with no overlapping declaration
//! preempt as usual.
//!
//! Acquires by the same task may nest as long as the releases are strictly
//! stacked. A task must release everything it holds before waiting on an
//! event; the kernel cannot tell a violation apart from a legitimate hold by
//! another task, so that rule is only checkable by inspection.

use crate::task_manager::task::{ResourceMask, RESOURCE_NONE};
use crate::task_manager::{critical, scheduler};
use portable_atomic::{AtomicU8, Ordering};

/// Bitwise union of the required-resources masks of every task currently
/// inside at least one resource section.
static RESOURCES_OCCUPIED: AtomicU8 = AtomicU8::new(RESOURCE_NONE);

pub(crate) fn occupied_mask() -> ResourceMask {
    RESOURCES_OCCUPIED.load(Ordering::SeqCst)
}

/// Snapshot of the currently occupied resources.
pub fn resources_occupied() -> ResourceMask {
    occupied_mask()
}

pub(crate) fn reset_occupied() {
    RESOURCES_OCCUPIED.store(RESOURCE_NONE, Ordering::SeqCst);
}

/// Occupy the resources in `mask`.
///
/// Never blocks: exclusion comes from the scheduler refusing to run
/// conflicting tasks while the bits are set.
pub fn acquire_resources(mask: ResourceMask) {
    critical(|| {
        RESOURCES_OCCUPIED.fetch_or(mask, Ordering::SeqCst);
    });
}

/// Release the resources in `mask` and force a reschedule: a higher-priority
/// task gated on one of these bits may have become runnable and must preempt
/// right away.
pub fn release_resources(mask: ResourceMask) {
    critical(|| {
        debug_assert!(
            RESOURCES_OCCUPIED.load(Ordering::SeqCst) & mask == mask,
            "releasing a resource that is not occupied"
        );
        RESOURCES_OCCUPIED.fetch_and(!mask, Ordering::SeqCst);
        scheduler::force_schedule();
    });
}
