#[cfg(test)]
mod kernel_tests {
    use keros::{TaskDescriptor, TaskStack, TaskState, TimerDescriptor, RESOURCE_NONE};
    use sequential_test::sequential;

    fn parked() -> ! {
        loop {
            std::hint::spin_loop();
        }
    }

    const EVENT_E1: keros::EventMask = 0x01;
    const EVENT_E2: keros::EventMask = 0x02;

    #[test]
    #[sequential]
    /// Critical sections nest: the interrupt flag saved by the outermost
    /// enter is only restored by the matching exit.
    fn test_critical_sections_nest() {
        use keros::ports::mok::interrupts;

        keros::enable_interrupts();
        assert!(interrupts::interrupts_enabled());

        keros::enter_critical();
        keros::enter_critical();
        assert!(!interrupts::interrupts_enabled());
        assert_eq!(interrupts::critical_depth(), 2);

        keros::exit_critical();
        assert!(!interrupts::interrupts_enabled());

        keros::exit_critical();
        assert_eq!(interrupts::critical_depth(), 0);
        assert!(interrupts::interrupts_enabled());

        keros::disable_interrupts();
        assert!(!interrupts::interrupts_enabled());
    }

    #[test]
    #[sequential]
    /// A critical section entered with interrupts already disabled restores
    /// that disabled state on exit.
    fn test_critical_section_preserves_disabled_flag() {
        use keros::ports::mok::interrupts;

        keros::disable_interrupts();
        keros::enter_critical();
        keros::exit_critical();
        assert!(!interrupts::interrupts_enabled());
    }

    #[test]
    #[sequential]
    /// An input event and timer ticks landing back to back: both waiters
    /// wake, the higher priority one runs, the other stays ready.
    fn test_interleaved_event_and_timer_ticks() {
        static IDLE_STACK: TaskStack<64> = TaskStack::new();
        static A_STACK: TaskStack<64> = TaskStack::new();
        static B_STACK: TaskStack<64> = TaskStack::new();
        static TASKS: [TaskDescriptor; 3] = [
            TaskDescriptor::new(parked, &IDLE_STACK, 0, RESOURCE_NONE),
            TaskDescriptor::new(parked, &A_STACK, 3, RESOURCE_NONE),
            TaskDescriptor::new(parked, &B_STACK, 2, RESOURCE_NONE),
        ];
        static TIMERS: [TimerDescriptor; 1] = [TimerDescriptor::new(2, EVENT_E2)];
        keros::init_os(&TASKS, &TIMERS);
        keros::force_schedule();
        assert_eq!(keros::current_task_id(), 1);

        // A blocks first, handing the processor to B; then B blocks too and
        // the idle task is all that is left.
        let waiter_a = std::thread::spawn(|| {
            keros::wait_events(EVENT_E1);
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(keros::current_task_id(), 2);
        let waiter_b = std::thread::spawn(|| {
            keros::wait_events(EVENT_E2);
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(keros::current_task_id(), 0);

        // Timer for B armed, then the input event for A sneaks in between
        // two application ticks.
        keros::set_timer(0, 2);
        keros::tick_all_timers();
        keros::set_event(1, EVENT_E1);
        assert_eq!(keros::current_task_id(), 1);
        keros::tick_all_timers();

        // The timer expiry woke B, but A outranks it.
        waiter_a.join().unwrap();
        waiter_b.join().unwrap();
        assert_eq!(keros::current_task_id(), 1);
        assert_eq!(TASKS[1].state(), TaskState::Running);
        assert_eq!(TASKS[2].state(), TaskState::Ready);
        assert_eq!(TASKS[2].pending_events(), EVENT_E2);
    }

    #[test]
    #[sequential]
    /// Stacks report an intact canary until something tramples them.
    fn test_stack_canary_intact_after_setup() {
        static IDLE_STACK: TaskStack<64> = TaskStack::new();
        static A_STACK: TaskStack<64> = TaskStack::new();
        static TASKS: [TaskDescriptor; 2] = [
            TaskDescriptor::new(parked, &IDLE_STACK, 0, RESOURCE_NONE),
            TaskDescriptor::new(parked, &A_STACK, 3, RESOURCE_NONE),
        ];
        keros::init_os(&TASKS, &[]);
        keros::force_schedule();

        assert!(IDLE_STACK.is_canary_intact());
        assert!(A_STACK.is_canary_intact());
    }
}
