pub mod hardware_timer;
pub mod interrupts;

use crate::ports::PortTrait;
use crate::task_manager::task::TaskDescriptor;

/// PortTrait implementation for the Mok platform.
///
/// Backs every non-AVR build. Context switching is a no-op and a forced
/// reschedule runs the scheduler inline, so kernel state transitions are
/// observable synchronously from host tests.
pub struct Mok;

impl PortTrait for Mok {
    fn setup_hardware_timers() {
        hardware_timer::setup_hardware_timers();
    }

    fn force_schedule() {
        hardware_timer::force_schedule();
    }

    fn enter_critical() {
        interrupts::enter_critical();
    }

    fn exit_critical() {
        interrupts::exit_critical();
    }

    fn enable_interrupts() {
        interrupts::enable_interrupts();
    }

    fn disable_interrupts() {
        interrupts::disable_interrupts();
    }

    fn init_task_stack(task: &TaskDescriptor) {
        // No frame to build without a context switcher; the descriptor just
        // points at its untouched stack top.
        task.set_saved_sp(task.stack_top());
    }

    fn idle() {
        core::hint::spin_loop();
    }

    fn halt() -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}
