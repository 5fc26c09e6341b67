#[cfg(test)]
mod resource_tests {
    use keros::{TaskDescriptor, TaskStack, TaskState, RESOURCE_NONE};
    use sequential_test::sequential;

    fn parked() -> ! {
        loop {
            std::hint::spin_loop();
        }
    }

    const EVENT_E1: keros::EventMask = 0x01;
    const RESOURCE_R: keros::ResourceMask = 0x01;
    const RESOURCE_R1: keros::ResourceMask = 0x02;
    const RESOURCE_R2: keros::ResourceMask = 0x04;

    #[test]
    #[sequential]
    /// Acquire followed by release leaves the occupied mask unchanged, and
    /// nested acquires released in stacked order never expose an
    /// intermediate state with the outer resource free.
    fn test_nested_acquire_release_round_trip() {
        static IDLE_STACK: TaskStack<64> = TaskStack::new();
        static A_STACK: TaskStack<64> = TaskStack::new();
        static TASKS: [TaskDescriptor; 2] = [
            TaskDescriptor::new(parked, &IDLE_STACK, 0, RESOURCE_NONE),
            TaskDescriptor::new(parked, &A_STACK, 3, RESOURCE_R1 | RESOURCE_R2),
        ];
        keros::init_os(&TASKS, &[]);
        keros::force_schedule();

        let before = keros::resources_occupied();
        keros::acquire_resources(RESOURCE_R1);
        assert_eq!(keros::resources_occupied(), RESOURCE_R1);
        keros::acquire_resources(RESOURCE_R2);
        assert_eq!(keros::resources_occupied(), RESOURCE_R1 | RESOURCE_R2);

        // Stacked release: the outer resource stays occupied throughout.
        keros::release_resources(RESOURCE_R2);
        assert_eq!(keros::resources_occupied(), RESOURCE_R1);
        keros::release_resources(RESOURCE_R1);
        assert_eq!(keros::resources_occupied(), before);

        assert_eq!(keros::current_task_id(), 1);
        assert_eq!(TASKS[1].state(), TaskState::Running);
    }

    #[test]
    #[sequential]
    /// Scenario: B(2) holds R and A(3) declares it. A's wake leaves it Ready
    /// but unscheduled until B releases; the release preempts B at once.
    fn test_resource_ceiling_blocks_higher_priority() {
        static IDLE_STACK: TaskStack<64> = TaskStack::new();
        static A_STACK: TaskStack<64> = TaskStack::new();
        static B_STACK: TaskStack<64> = TaskStack::new();
        static TASKS: [TaskDescriptor; 3] = [
            TaskDescriptor::new(parked, &IDLE_STACK, 0, RESOURCE_NONE),
            TaskDescriptor::new(parked, &A_STACK, 3, RESOURCE_R),
            TaskDescriptor::new(parked, &B_STACK, 2, RESOURCE_R),
        ];
        keros::init_os(&TASKS, &[]);
        keros::force_schedule();
        assert_eq!(keros::current_task_id(), 1);

        let waiter = std::thread::spawn(|| {
            // Runs as task A.
            keros::wait_events(EVENT_E1);
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(keros::current_task_id(), 2);

        // B enters its resource section, then A's event arrives.
        keros::acquire_resources(RESOURCE_R);
        keros::set_event(1, EVENT_E1);

        // A is runnable but gated: it declared R and R is occupied.
        assert_eq!(TASKS[1].state(), TaskState::Ready);
        assert_eq!(keros::current_task_id(), 2);
        assert_eq!(TASKS[2].state(), TaskState::Running);

        // Releasing forces the reschedule that lets A through.
        keros::release_resources(RESOURCE_R);
        waiter.join().unwrap();
        assert_eq!(keros::current_task_id(), 1);
        assert_eq!(TASKS[1].state(), TaskState::Running);
        assert_eq!(TASKS[2].state(), TaskState::Ready);
    }

    #[test]
    #[sequential]
    /// Tasks with no overlapping declaration are not gated: the ceiling only
    /// binds declared tasks.
    fn test_undeclared_task_ignores_occupied_resource() {
        static IDLE_STACK: TaskStack<64> = TaskStack::new();
        static A_STACK: TaskStack<64> = TaskStack::new();
        static B_STACK: TaskStack<64> = TaskStack::new();
        static TASKS: [TaskDescriptor; 3] = [
            TaskDescriptor::new(parked, &IDLE_STACK, 0, RESOURCE_NONE),
            TaskDescriptor::new(parked, &A_STACK, 3, RESOURCE_NONE),
            TaskDescriptor::new(parked, &B_STACK, 2, RESOURCE_R),
        ];
        keros::init_os(&TASKS, &[]);
        keros::force_schedule();
        assert_eq!(keros::current_task_id(), 1);

        let waiter = std::thread::spawn(|| {
            keros::wait_events(EVENT_E1);
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(keros::current_task_id(), 2);

        // B occupies R; A never declared it, so A's wake preempts anyway.
        keros::acquire_resources(RESOURCE_R);
        keros::set_event(1, EVENT_E1);
        waiter.join().unwrap();
        assert_eq!(keros::current_task_id(), 1);
        assert_eq!(TASKS[2].state(), TaskState::Ready);

        keros::release_resources(RESOURCE_R);
    }
}
