//! Task management core: the configured task and timer tables, the kernel
//! globals the context switcher works through, and system startup/shutdown.
//!
//! # Architecture
//!
//! The kernel owns three pieces of process-wide state:
//!
//! - the task table and timer table, registered once by [`init_os`] and
//!   structurally immutable afterwards,
//! - the current-task index, naming the descriptor in `Running` state,
//! - [`CURRENT_TASK`], the pointer the context-switch code dereferences to
//!   find the saved stack pointer of whatever should run next.
//!
//! During the startup window no task is `Running`: [`CURRENT_TASK`] refers to
//! a main pseudo-descriptor whose only job is to give the first context save
//! a slot for the startup stack pointer. The first scheduler tick switches
//! into the first real task and the pseudo-descriptor is never resumed.
//!
//! Every mutation of kernel state happens inside the port's interrupt gate;
//! the [`critical`] helper keeps the enter/exit pairing honest.

pub mod scheduler;
pub mod task;

use crate::ports::{Port, PortTrait};
use crate::timer::TimerDescriptor;
use portable_atomic::{AtomicPtr, AtomicU8, Ordering};
use task::{TaskDescriptor, TaskId};

/// The descriptor the startup stack pointer is parked in.
static MAIN_CONTEXT: TaskDescriptor = TaskDescriptor::main_context();

/// Pointer to the descriptor of the task the processor should be running.
///
/// The context switcher reads the saved stack pointer through this at offset
/// zero, so it must always refer to a live [`TaskDescriptor`]. The scheduler
/// is the only writer after startup.
pub static CURRENT_TASK: AtomicPtr<TaskDescriptor> =
    AtomicPtr::new(&MAIN_CONTEXT as *const TaskDescriptor as *mut TaskDescriptor);

/// Index of the `Running` task within the configured table.
static CURRENT_INDEX: AtomicU8 = AtomicU8::new(0);

struct KernelConfig {
    tasks: &'static [TaskDescriptor],
    timers: &'static [TimerDescriptor],
}

/// Tables configured by the application. Written once per [`init_os`] call,
/// read from task and interrupt context afterwards.
static mut CONFIG: KernelConfig = KernelConfig {
    tasks: &[],
    timers: &[],
};

pub(crate) fn tasks() -> &'static [TaskDescriptor] {
    unsafe { CONFIG.tasks }
}

pub(crate) fn timers() -> &'static [TimerDescriptor] {
    unsafe { CONFIG.timers }
}

/// Run `f` with interrupts disabled. Critical sections nest; the prior
/// interrupt flag is restored when the outermost section exits.
pub(crate) fn critical<R>(f: impl FnOnce() -> R) -> R {
    Port::enter_critical();
    let result = f();
    Port::exit_critical();
    result
}

/// Index of the task currently considered `Running`.
pub fn current_task_id() -> TaskId {
    CURRENT_INDEX.load(Ordering::SeqCst)
}

/// Descriptor of the task currently considered `Running`. Before [`init_os`]
/// the main pseudo-descriptor stands in.
pub(crate) fn current_task() -> &'static TaskDescriptor {
    let index = CURRENT_INDEX.load(Ordering::SeqCst) as usize;
    tasks().get(index).unwrap_or(&MAIN_CONTEXT)
}

pub(crate) fn set_current(index: usize) {
    let task = &tasks()[index];
    CURRENT_INDEX.store(index as TaskId, Ordering::SeqCst);
    CURRENT_TASK.store(
        task as *const TaskDescriptor as *mut TaskDescriptor,
        Ordering::SeqCst,
    );
}

fn priorities_unique(tasks: &[TaskDescriptor]) -> bool {
    for (index, task) in tasks.iter().enumerate() {
        for other in &tasks[index + 1..] {
            if task.priority() == other.priority() {
                return false;
            }
        }
    }
    true
}

/// Register the task and timer tables.
///
/// The first table entry must be the idle task at the lowest priority, and
/// priorities must be pairwise distinct. Called by [`start_os`]; also public
/// so a hosted build can configure the kernel and drive it without starting
/// hardware timers.
pub fn init_os(tasks: &'static [TaskDescriptor], timers: &'static [TimerDescriptor]) {
    debug_assert!(!tasks.is_empty(), "a task table needs at least an idle task");
    debug_assert!(priorities_unique(tasks), "task priorities must be distinct");
    critical(|| {
        unsafe {
            CONFIG = KernelConfig { tasks, timers };
        }
        CURRENT_INDEX.store(0, Ordering::SeqCst);
        CURRENT_TASK.store(
            &MAIN_CONTEXT as *const TaskDescriptor as *mut TaskDescriptor,
            Ordering::SeqCst,
        );
        crate::resource::reset_occupied();
        crate::timer::reset_tick_counter();
    });
    log::debug!(
        "registered {} tasks and {} timers",
        tasks.len(),
        timers.len()
    );
}

/// Initialise the kernel and hand the processor over to it.
///
/// Builds the first stack frame of every task, starts the tick timers,
/// enables interrupts and sleeps. The scheduler takes over at the first tick
/// and this call never returns; its context is parked in the main
/// pseudo-descriptor for good.
pub fn start_os(tasks: &'static [TaskDescriptor], timers: &'static [TimerDescriptor]) -> ! {
    init_os(tasks, timers);
    for (index, task) in tasks.iter().enumerate() {
        Port::init_task_stack(task);
        log::debug!("task {} stack frame built at {:p}", index, task.stack_top());
    }
    log::info!("starting with {} tasks", tasks.len());
    Port::setup_hardware_timers();
    Port::enable_interrupts();
    loop {
        Port::idle();
    }
}

/// Stop the operating system for good, e.g. for an emergency off.
///
/// All interrupts are disabled first, so no tick can schedule anything
/// afterwards.
pub fn shutdown_os() -> ! {
    Port::disable_interrupts();
    log::info!("halted");
    Port::halt()
}

/// Enter a critical section: global interrupts are disabled until the
/// matching [`exit_critical`]. Sections nest.
pub fn enter_critical() {
    Port::enter_critical();
}

/// Leave a critical section, restoring the interrupt flag saved by the
/// outermost [`enter_critical`].
pub fn exit_critical() {
    Port::exit_critical();
}

/// Set the global interrupt enable flag.
pub fn enable_interrupts() {
    Port::enable_interrupts();
}

/// Clear the global interrupt enable flag.
pub fn disable_interrupts() {
    Port::disable_interrupts();
}
