//! The context switcher.
//!
//! Two register sequences with one contract: `save_context!` parks the full
//! register file, status register and stack pointer of the interrupted task
//! on that task's own stack and records the stack pointer in the first field
//! of the descriptor behind [`CURRENT_TASK`]; `restore_context!` reverses
//! the exact layout from whatever descriptor [`CURRENT_TASK`] names by then.
//! Whoever runs between the two (the scheduler, usually) picks the task.
//!
//! Both tick interrupts are naked: the sequences above are the only prologue
//! and epilogue, and the closing `reti` re-enables interrupts on the way out.
//! Because interrupt entry clears the interrupt flag before the save reads
//! the status register, every parked frame carries a disabled flag and the
//! enable always comes from `reti`.
//!
//! [`CURRENT_TASK`]: crate::task_manager::CURRENT_TASK

use crate::task_manager::task::TaskDescriptor;

/// Park the running task's context on its stack, then write the resulting
/// stack pointer into offset zero of `{current_task}`.
macro_rules! save_context {
    () => {
        concat!(
            "push r0\n",
            "in r0, 0x3F\n",
            "cli\n",
            "push r0\n",
            "push r1\n",
            "clr r1\n",
            "push r2\n",
            "push r3\n",
            "push r4\n",
            "push r5\n",
            "push r6\n",
            "push r7\n",
            "push r8\n",
            "push r9\n",
            "push r10\n",
            "push r11\n",
            "push r12\n",
            "push r13\n",
            "push r14\n",
            "push r15\n",
            "push r16\n",
            "push r17\n",
            "push r18\n",
            "push r19\n",
            "push r20\n",
            "push r21\n",
            "push r22\n",
            "push r23\n",
            "push r24\n",
            "push r25\n",
            "push r26\n",
            "push r27\n",
            "push r28\n",
            "push r29\n",
            "push r30\n",
            "push r31\n",
            "lds r26, {current_task}\n",
            "lds r27, {current_task}+1\n",
            "in r0, 0x3D\n",
            "st x+, r0\n",
            "in r0, 0x3E\n",
            "st x+, r0\n",
        )
    };
}

/// Install the stack pointer found at offset zero of `{current_task}` and
/// unpark the context stored above it.
macro_rules! restore_context {
    () => {
        concat!(
            "lds r26, {current_task}\n",
            "lds r27, {current_task}+1\n",
            "ld r28, x+\n",
            "out 0x3D, r28\n",
            "ld r29, x+\n",
            "out 0x3E, r29\n",
            "pop r31\n",
            "pop r30\n",
            "pop r29\n",
            "pop r28\n",
            "pop r27\n",
            "pop r26\n",
            "pop r25\n",
            "pop r24\n",
            "pop r23\n",
            "pop r22\n",
            "pop r21\n",
            "pop r20\n",
            "pop r19\n",
            "pop r18\n",
            "pop r17\n",
            "pop r16\n",
            "pop r15\n",
            "pop r14\n",
            "pop r13\n",
            "pop r12\n",
            "pop r11\n",
            "pop r10\n",
            "pop r9\n",
            "pop r8\n",
            "pop r7\n",
            "pop r6\n",
            "pop r5\n",
            "pop r4\n",
            "pop r3\n",
            "pop r2\n",
            "pop r1\n",
            "pop r0\n",
            "out 0x3F, r0\n",
            "pop r0\n",
        )
    };
}

/// Scheduler tick: Timer1 overflow. Saves the interrupted task, reloads the
/// timer, advances the kernel clock, runs the scheduler and returns into
/// whichever task it chose.
#[no_mangle]
#[unsafe(naked)]
pub unsafe extern "C" fn __vector_13() {
    core::arch::naked_asm!(
        save_context!(),
        // Reload Timer1; the next overflow lands in 50 ms. High byte first,
        // the hardware latches the 16-bit write through it.
        "ldi r24, 0x3C",
        "sts 0x85, r24",
        "ldi r24, 0xB0",
        "sts 0x84, r24",
        "call {tick}",
        restore_context!(),
        "reti",
        current_task = sym crate::task_manager::CURRENT_TASK,
        tick = sym crate::task_manager::scheduler::scheduler_tick,
    )
}

/// Application tick: Timer2 overflow. Saves the interrupted task, advances
/// every software timer and returns. No direct reschedule here; an expiring
/// timer that wakes a higher-priority task forces one through `set_event`.
#[no_mangle]
#[unsafe(naked)]
pub unsafe extern "C" fn __vector_9() {
    core::arch::naked_asm!(
        save_context!(),
        "call {tick}",
        restore_context!(),
        "reti",
        current_task = sym crate::task_manager::CURRENT_TASK,
        tick = sym crate::timer::tick_all_timers,
    )
}

/// A helper for pushing bytes into a descending AVR stack.
struct StackPusher(*mut u8);

impl StackPusher {
    /// The pointer itself is never written, only the bytes below it. The
    /// caller guarantees room for everything pushed.
    unsafe fn new(stack_top: *mut u8) -> StackPusher {
        StackPusher(stack_top)
    }

    fn push(&mut self, value: u8) {
        // SAFETY: space below the start pointer was guaranteed at creation.
        unsafe {
            self.0 = self.0.offset(-1);
            self.0.write_volatile(value);
        }
    }

    fn current(&self) -> *mut u8 {
        self.0
    }
}

/// Build the first stack frame of a task: the frame `save_context!` would
/// have written had the task been interrupted right at its entry, with a
/// zeroed register file. The first `reti` through it sets the interrupt
/// flag and lands at the entry function.
pub fn init_task_stack(task: &TaskDescriptor) {
    let entry = task.entry() as usize as u16;
    // SAFETY: descriptor construction enforces room for one saved context.
    let mut pusher = unsafe { StackPusher::new(task.stack_top()) };

    // Return address, low byte pushed first, the way call does it.
    pusher.push((entry & 0xFF) as u8);
    pusher.push((entry >> 8) as u8);

    // r0, the status register image, then r1 to r31.
    for _ in 0..33 {
        pusher.push(0);
    }

    // The stack pointer rests one byte below the last pushed value.
    task.set_saved_sp(pusher.current().wrapping_sub(1));
}
