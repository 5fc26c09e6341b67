pub mod context;
pub mod hardware_timer;
pub mod interrupts;

use crate::ports::PortTrait;
use crate::task_manager::task::TaskDescriptor;

/// PortTrait implementation for the ATmega328P.
pub struct Avr;

impl PortTrait for Avr {
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
        context::init_task_stack(task);
    }

    fn idle() {
        avr_device::asm::sleep();
    }

    fn halt() -> ! {
        interrupts::disable_interrupts();
        loop {
            avr_device::asm::sleep();
        }
    }
}
