//! Global interrupt flag control and critical section nesting.

/// Interrupt enable bit in the status register.
const SREG_I_BIT: u8 = 0x80;

/// Nesting depth of the active critical section. Single-writer: interrupts
/// are disabled from the first enter to the last exit.
static mut CRITICAL_DEPTH: u8 = 0;

/// Status register as it was before the outermost enter.
static mut SAVED_SREG: u8 = 0;

fn read_sreg() -> u8 {
    let sreg: u8;
    // SAFETY: reading the status register has no side effects.
    unsafe { core::arch::asm!("in {0}, 0x3F", out(reg) sreg) };
    sreg
}

pub fn enter_critical() {
    let sreg = read_sreg();
    avr_device::interrupt::disable();
    // SAFETY: interrupts are off, so the statics have a single writer.
    unsafe {
        if CRITICAL_DEPTH == 0 {
            SAVED_SREG = sreg;
        }
        CRITICAL_DEPTH += 1;
    }
}

pub fn exit_critical() {
    // SAFETY: still inside the critical section entered above.
    unsafe {
        debug_assert!(CRITICAL_DEPTH > 0, "unbalanced critical exit");
        CRITICAL_DEPTH -= 1;
        if CRITICAL_DEPTH == 0 && SAVED_SREG & SREG_I_BIT != 0 {
            avr_device::interrupt::enable();
        }
    }
}

pub fn enable_interrupts() {
    // SAFETY: the kernel enables interrupts only once its tables are
    // consistent.
    unsafe { avr_device::interrupt::enable() };
}

pub fn disable_interrupts() {
    avr_device::interrupt::disable();
}
