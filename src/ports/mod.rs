//! Hardware abstraction the kernel runs on.
//!
//! Exactly one port is compiled in, selected by target architecture: the AVR
//! port drives real ATmega328P timers and interrupt hardware, every other
//! target gets the mock port so the crate builds and its test suite runs on
//! the host.

use crate::task_manager::task::TaskDescriptor;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "avr")] {
        pub mod avr;
        /// The port compiled into this build.
        pub type Port = avr::Avr;
    } else {
        pub mod mok;
        /// The port compiled into this build.
        pub type Port = mok::Mok;
    }
}

/// Operations a port supplies to the kernel.
pub trait PortTrait {
    /// Configure and start the scheduler tick and application tick timers.
    /// Interrupts are still globally disabled when this runs.
    fn setup_hardware_timers();

    /// Make the scheduler tick fire as soon as interrupts allow.
    fn force_schedule();

    /// Enter a critical section: save the global interrupt flag and disable.
    /// Nests; only the outermost exit restores the saved flag.
    fn enter_critical();

    /// Leave a critical section.
    fn exit_critical();

    /// Set the global interrupt enable flag.
    fn enable_interrupts();

    /// Clear the global interrupt enable flag.
    fn disable_interrupts();

    /// Build the first stack frame of a task, so that restoring from its
    /// descriptor lands at the entry function with interrupts enabled and a
    /// zeroed register file.
    fn init_task_stack(task: &TaskDescriptor);

    /// Sleep until the next interrupt.
    fn idle();

    /// Stop the processor for good.
    fn halt() -> !;
}
