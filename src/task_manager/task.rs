//! Task descriptors, task states and task stacks.

use core::cell::UnsafeCell;
use portable_atomic::{AtomicPtr, AtomicU8, Ordering};

/// Task identifier: an index into the task table configured by the application.
pub type TaskId = u8;

/// Scheduling priority. Unique per task, higher wins, the idle task is 0.
pub type TaskPriority = u8;

/// One-hot event bits. Each bit is meaningful per task.
pub type EventMask = u8;

/// One-hot resource bits. Each bit is meaningful process-wide.
pub type ResourceMask = u8;

/// The empty event mask.
pub const EVENT_NONE: EventMask = 0;

/// The empty resource mask.
pub const RESOURCE_NONE: ResourceMask = 0;

/// Type of a task entry function. Tasks run forever on their own stack.
pub type TaskEntryFn = fn() -> !;

/// Bytes one parked context occupies on a task stack: 32 registers, the
/// status register and a two byte return address.
pub const SIZE_SAVED_CONTEXT: usize = 35;

/// Smallest stack a task can be configured with.
pub const TASK_STACK_SIZE_MIN: usize = SIZE_SAVED_CONTEXT;

/// Pattern task stacks are filled with at construction. A lowest stack byte
/// that no longer holds it means the stack has been overrun.
const STACK_FILL: u8 = 0xA5;

/// States a task can be in.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskState {
    /// Runnable and waiting to be picked by the scheduler.
    Ready = 0,
    /// Currently executing. At most one task is in this state.
    Running = 1,
    /// Blocked until one of the awaited events is posted.
    Waiting = 2,
}

impl TaskState {
    pub(crate) fn from_raw(raw: u8) -> TaskState {
        match raw {
            0 => TaskState::Ready,
            1 => TaskState::Running,
            _ => TaskState::Waiting,
        }
    }
}

/// A task stack of `LEN` bytes, statically owned by the application.
///
/// Stacks grow downwards. The whole buffer is filled with a known pattern so
/// an overrun is detectable by inspecting the far end.
pub struct TaskStack<const LEN: usize> {
    contents: UnsafeCell<[u8; LEN]>,
}

impl<const LEN: usize> TaskStack<LEN> {
    /// Create a new stack. `LEN` must leave room for at least one saved
    /// context.
    pub const fn new() -> Self {
        assert!(LEN >= TASK_STACK_SIZE_MIN);
        Self {
            contents: UnsafeCell::new([STACK_FILL; LEN]),
        }
    }

    /// Address one past the highest stack byte. The first frame is built
    /// downwards from here.
    pub const fn top(&self) -> *mut u8 {
        // SAFETY: pointing one past the buffer is allowed; the byte at the
        // returned address is never written, only the bytes below it.
        unsafe { (self.contents.get() as *mut u8).add(LEN) }
    }

    /// True while the lowest stack byte still holds the fill pattern.
    pub fn is_canary_intact(&self) -> bool {
        // SAFETY: reads the first byte of the buffer this object owns.
        unsafe { (self.contents.get() as *const u8).read_volatile() == STACK_FILL }
    }
}

// SAFETY: the stack only hands out raw pointers into itself; all access to
// the buffer goes through the task that owns the stack.
unsafe impl<const LEN: usize> Sync for TaskStack<LEN> {}

impl<const LEN: usize> Default for TaskStack<LEN> {
    fn default() -> Self {
        TaskStack::new()
    }
}

/// Describes one task. One descriptor per task, allocated statically by the
/// application and never destroyed.
///
/// The saved stack pointer must stay the first field: the context switcher
/// reaches it by dereferencing the current-task pointer at offset zero.
#[repr(C)]
pub struct TaskDescriptor {
    /// Saved stack pointer, the kernel's sole handle to the parked context.
    saved_sp: AtomicPtr<u8>,
    /// Current [`TaskState`], stored raw.
    state: AtomicU8,
    /// Events that have arrived for this task.
    pending: AtomicU8,
    /// Events the task has declared it waits for. Sticky until the task
    /// clears what it consumed.
    awaited: AtomicU8,
    /// Resources this task touches. Fixed at configuration time.
    required_resources: ResourceMask,
    /// Unique scheduling priority.
    priority: TaskPriority,
    /// Function the first context restore lands in.
    entry: TaskEntryFn,
    /// Upper end of the task's stack, where the first frame is built.
    stack_top: *mut u8,
}

/// The context switcher depends on this layout.
const _: () = assert!(core::mem::offset_of!(TaskDescriptor, saved_sp) == 0);

impl TaskDescriptor {
    /// Create a task descriptor bound to its entry function and stack.
    ///
    /// Every task starts out `Ready` with no events pending or awaited.
    pub const fn new<const N: usize>(
        entry: TaskEntryFn,
        stack: &'static TaskStack<N>,
        priority: TaskPriority,
        required_resources: ResourceMask,
    ) -> TaskDescriptor {
        TaskDescriptor {
            saved_sp: AtomicPtr::new(core::ptr::null_mut()),
            state: AtomicU8::new(TaskState::Ready as u8),
            pending: AtomicU8::new(EVENT_NONE),
            awaited: AtomicU8::new(EVENT_NONE),
            required_resources,
            priority,
            entry,
            stack_top: stack.top(),
        }
    }

    /// The descriptor the current-task pointer refers to before the first
    /// context switch. It only exists so the first save has a slot to park
    /// the startup stack pointer in.
    pub(crate) const fn main_context() -> TaskDescriptor {
        TaskDescriptor {
            saved_sp: AtomicPtr::new(core::ptr::null_mut()),
            state: AtomicU8::new(TaskState::Ready as u8),
            pending: AtomicU8::new(EVENT_NONE),
            awaited: AtomicU8::new(EVENT_NONE),
            required_resources: RESOURCE_NONE,
            priority: 0,
            entry: main_context_entry,
            stack_top: core::ptr::null_mut(),
        }
    }

    /// Current state of the task.
    pub fn state(&self) -> TaskState {
        TaskState::from_raw(self.state.load(Ordering::SeqCst))
    }

    pub(crate) fn set_state(&self, state: TaskState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Snapshot of the events pending for this task.
    pub fn pending_events(&self) -> EventMask {
        self.pending.load(Ordering::SeqCst)
    }

    /// Snapshot of the events this task waits for.
    pub fn awaited_events(&self) -> EventMask {
        self.awaited.load(Ordering::SeqCst)
    }

    pub(crate) fn post_events(&self, mask: EventMask) {
        self.pending.fetch_or(mask, Ordering::SeqCst);
    }

    pub(crate) fn retract_events(&self, mask: EventMask) {
        self.pending.fetch_and(!mask, Ordering::SeqCst);
    }

    pub(crate) fn install_awaited(&self, mask: EventMask) {
        self.awaited.fetch_or(mask, Ordering::SeqCst);
    }

    /// The scheduling priority this task was configured with.
    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// The resources this task declared interest in.
    pub fn required_resources(&self) -> ResourceMask {
        self.required_resources
    }

    pub(crate) fn entry(&self) -> TaskEntryFn {
        self.entry
    }

    pub(crate) fn stack_top(&self) -> *mut u8 {
        self.stack_top
    }

    /// Record where the task's context is parked. The pointer must address a
    /// full saved context on this task's stack; the next restore through this
    /// descriptor resumes from it.
    pub(crate) fn set_saved_sp(&self, stack_pointer: *mut u8) {
        self.saved_sp.store(stack_pointer, Ordering::SeqCst);
    }
}

// SAFETY: all mutable fields are atomics; the raw stack pointers are fixed at
// construction and point into a `TaskStack` that outlives the descriptor.
unsafe impl Sync for TaskDescriptor {}

/// Entry of the main pseudo-task. Its context is parked at the first switch
/// and never restored, so this does not run.
fn main_context_entry() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
