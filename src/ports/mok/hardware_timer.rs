//! Mock tick sources. A hosted build has no ticking hardware; tests drive
//! the kernel clock by calling the tick entry points directly.

/// Mok hardware timer setup.
pub fn setup_hardware_timers() {}

/// Serve a forced reschedule by running the scheduler inline. On hardware
/// the same request is served by the next scheduler tick interrupt.
pub fn force_schedule() {
    crate::task_manager::scheduler::schedule();
}
