//! Tick sources: Timer1 drives the scheduler tick, Timer2 the application
//! tick.

use avr_device::atmega328p::Peripherals;

/// Milliseconds between two scheduler ticks.
pub const SCHED_TICK_MS: u32 = 50;

/// Milliseconds between two application ticks.
pub const APP_TICK_MS: u32 = 4;

/// Timer1 reload for a 50 ms overflow at a prescaler of 8 on a 16 MHz part.
pub(crate) const SCHED_TICK_RELOAD: u16 = 0x3CB0;

/// Configure both tick timers. Runs during start-up with interrupts still
/// globally disabled; the first tick lands once they are enabled.
pub fn setup_hardware_timers() {
    // SAFETY: the kernel owns both timers from here on.
    let dp = unsafe { Peripherals::steal() };

    // Timer1, prescaler 8. The low prescaler keeps the forced-reschedule
    // latency short: a forced tick advances the counter to the top and the
    // overflow fires within one timer step.
    dp.TC1.tccr1a.write(|w| unsafe { w.bits(0) });
    dp.TC1.tccr1b.write(|w| w.cs1().prescale_8());
    dp.TC1.tccr1c.write(|w| unsafe { w.bits(0) });
    dp.TC1.tcnt1.write(|w| unsafe { w.bits(SCHED_TICK_RELOAD) });
    dp.TC1.timsk1.write(|w| w.toie1().set_bit());

    // Timer2, prescaler 32, overflows about every 4 ms.
    dp.TC2.tccr2a.write(|w| unsafe { w.bits(0) });
    dp.TC2.tccr2b.write(|w| w.cs2().prescale_32());
    dp.TC2.tcnt2.write(|w| unsafe { w.bits(0) });
    dp.TC2.timsk2.write(|w| w.toie2().set_bit());

    log::debug!(
        "tick timers armed: scheduler {} ms, application {} ms",
        SCHED_TICK_MS,
        APP_TICK_MS
    );
}

/// Make the scheduler tick fire as soon as interrupts allow by advancing
/// Timer1 to the top of its range.
pub fn force_schedule() {
    // SAFETY: a 16-bit counter write; the kernel owns Timer1.
    let dp = unsafe { Peripherals::steal() };
    dp.TC1.tcnt1.write(|w| unsafe { w.bits(u16::MAX) });
}
