//! The timers of the chip, the clock deciding when the cpu and the timers
//! run and the worker that calls the driver at a fixed interval.
use {
    crate::SettingsError,
    num_traits::{PrimInt, Unsigned},
    std::{
        sync::{
            mpsc::{self, RecvTimeoutError, SyncSender},
            Arc,
        },
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
};

/// Represents a timer inside of the chip infrastructure, it will count
/// down to zero from whatever number it was given, one step per
/// [`tick`](Timer::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timer<T> {
    value: T,
}

impl<T> Timer<T>
where
    T: PrimInt + Unsigned,
{
    /// Will create a new timer with the given value.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> T {
        self.value
    }

    /// Will count down by one, a timer at zero stays at zero.
    pub fn tick(&mut self) {
        if self.value > T::zero() {
            self.value = self.value - T::one();
        }
    }
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The events the [`Clock`](Clock) schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// A single interpreter cycle is due.
    Cycle,
    /// A single timer tick is due.
    Tick,
}

/// Keeps the instruction clock and the timer clock apart.
///
/// Both run from the same elapsed wall time, but every clock counts its own
/// events, so the timers decay at their fixed rate no matter how many
/// instructions are executed in between.
#[derive(Debug, Clone)]
pub struct Clock {
    cpu_hertz: u128,
    timer_hertz: u128,
    /// nanoseconds since the last normalization
    elapsed: u128,
    cycles: u128,
    ticks: u128,
}

impl Clock {
    /// Both rates have to be at least one hertz, a clock that never fires is
    /// refused.
    pub fn new(cpu_hertz: u64, timer_hertz: u64) -> Result<Self, SettingsError> {
        if cpu_hertz == 0 {
            return Err(SettingsError::ZeroHertz { clock: "cpu" });
        }
        if timer_hertz == 0 {
            return Err(SettingsError::ZeroHertz { clock: "timer" });
        }

        Ok(Self {
            cpu_hertz: cpu_hertz as u128,
            timer_hertz: timer_hertz as u128,
            elapsed: 0,
            cycles: 0,
            ticks: 0,
        })
    }

    /// Moves the clock forward by `elapsed` and returns every event that became
    /// due, in the order they are due. Events sharing the same instant put the
    /// tick first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ClockEvent> {
        self.elapsed += elapsed.as_nanos();

        let cycles_due = self.elapsed * self.cpu_hertz / NANOS_PER_SECOND;
        let ticks_due = self.elapsed * self.timer_hertz / NANOS_PER_SECOND;

        let pending = (cycles_due - self.cycles) + (ticks_due - self.ticks);
        let mut events = Vec::with_capacity(pending as usize);

        while self.cycles < cycles_due || self.ticks < ticks_due {
            // cycle `c` is due at c / cpu_hertz, tick `t` at t / timer_hertz
            let cycle_first = self.cycles < cycles_due
                && (self.ticks >= ticks_due
                    || (self.cycles + 1) * self.timer_hertz < (self.ticks + 1) * self.cpu_hertz);

            if cycle_first {
                self.cycles += 1;
                events.push(ClockEvent::Cycle);
            } else {
                self.ticks += 1;
                events.push(ClockEvent::Tick);
            }
        }

        // full seconds are done with, so the counters can start over
        while self.elapsed >= NANOS_PER_SECOND
            && self.cycles >= self.cpu_hertz
            && self.ticks >= self.timer_hertz
        {
            self.elapsed -= NANOS_PER_SECOND;
            self.cycles -= self.cpu_hertz;
            self.ticks -= self.timer_hertz;
        }

        events
    }
}

/// Something that runs a callback over and over again, with the given
/// interval in between.
pub trait TimedWorker {
    fn new() -> Self;

    fn start<T>(&mut self, callback: T, interval: Duration)
    where
        T: Send + FnMut() + 'static;

    fn stop(&mut self);

    fn is_alive(&self) -> bool;
}

/// Is the internal worker, that exists on the
/// second thread.
pub struct Worker {
    /// Contains the actual thread, that is running.
    thread: Option<JoinHandle<()>>,
    /// Contains the sync sender used to gracefully shutdown the thread.
    shutdown: Option<SyncSender<()>>,
    /// Counts the references held by running threads, there is never more
    /// then one.
    alive: Arc<()>,
}

impl TimedWorker for Worker {
    /// Will initialize the new worker.
    fn new() -> Self {
        Self {
            thread: None,
            shutdown: None,
            alive: Arc::new(()),
        }
    }

    /// Will start the worker that will run the callback function
    /// all interval.
    /// Attention the worker assumes the callback will finish
    /// faster then the interval.
    fn start<T>(&mut self, mut callback: T, interval: Duration)
    where
        T: Send + FnMut() + 'static,
    {
        self.stop();

        let (send, recv) = mpsc::sync_channel::<()>(1);
        let alive = self.alive.clone();
        let thread = thread::spawn(move || {
            let _alive = alive;
            let mut timeout = interval;
            loop {
                match recv.recv_timeout(timeout) {
                    Err(RecvTimeoutError::Timeout) => {
                        let start = Instant::now();

                        callback();

                        // make sure the system will at most wait the interval
                        timeout = interval.checked_sub(start.elapsed()).unwrap_or_default();
                    }
                    Ok(_) | Err(_) => break, // shutdown
                }
            }
        });

        self.thread = Some(thread);
        self.shutdown = Some(send);
    }

    /// Will stop the worker.
    fn stop(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            // the thread might already be gone, in which case there is no one to tell
            let _ = sender.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("The worker thread panicked.");
            }
        }
    }

    /// Checks if the thread is alive.
    fn is_alive(&self) -> bool {
        Arc::strong_count(&self.alive) > 1
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{cpu, timer};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_timer_stops_at_zero() {
        let mut timer = Timer::new(2u8);
        for expected in [1, 0, 0, 0].iter() {
            timer.tick();
            assert_eq!(timer.get_value(), *expected);
        }
        timer.set_value(u8::MAX);
        timer.tick();
        assert_eq!(timer.get_value(), u8::MAX - 1);
    }

    #[test]
    fn test_clock_one_second() {
        let mut clock = Clock::new(cpu::HERTZ, timer::HERTZ).unwrap();
        let events = clock.advance(Duration::from_secs(1));

        let cycles = events.iter().filter(|e| **e == ClockEvent::Cycle).count();
        let ticks = events.iter().filter(|e| **e == ClockEvent::Tick).count();

        assert_eq!(cycles as u64, cpu::HERTZ);
        assert_eq!(ticks as u64, timer::HERTZ);
    }

    #[test]
    fn test_clock_ticks_independent_of_cpu_rate() {
        for &hertz in [1u64, 60, 500, 700, 1000].iter() {
            let mut clock = Clock::new(hertz, timer::HERTZ).unwrap();
            let mut ticks = 0;
            // many small steps to make sure no remainder is lost on the way
            for _ in 0..1000 {
                ticks += clock
                    .advance(Duration::from_millis(3))
                    .into_iter()
                    .filter(|e| *e == ClockEvent::Tick)
                    .count();
            }
            // 3 seconds
            assert_eq!(ticks as u64, 3 * timer::HERTZ, "cpu at {} Hz", hertz);
        }
    }

    #[test]
    fn test_clock_interleaves_in_order() {
        let mut clock = Clock::new(120, 60).unwrap();
        let events = clock.advance(Duration::from_millis(50));
        // cycles at 8.3ms, 16.6ms, 25ms, 33.3ms, 41.6ms, 50ms
        // ticks at 16.6ms, 33.3ms, 50ms
        use ClockEvent::*;
        assert_eq!(
            events,
            vec![Cycle, Tick, Cycle, Cycle, Tick, Cycle, Cycle, Tick, Cycle]
        );
    }

    #[test]
    fn test_clock_no_events_before_first_period() {
        let mut clock = Clock::new(cpu::HERTZ, timer::HERTZ).unwrap();
        assert!(clock.advance(Duration::from_micros(100)).is_empty());
        assert_eq!(clock.advance(Duration::from_micros(1900)), vec![ClockEvent::Cycle]);
    }

    #[test]
    fn test_clock_refuses_zero_hertz() {
        assert_eq!(
            Err(SettingsError::ZeroHertz { clock: "cpu" }),
            Clock::new(0, timer::HERTZ).map(|_| ())
        );
        assert_eq!(
            Err(SettingsError::ZeroHertz { clock: "timer" }),
            Clock::new(cpu::HERTZ, 0).map(|_| ())
        );
    }

    #[test]
    fn test_worker() {
        let counter = Arc::new(AtomicUsize::new(0));
        let ccounter = counter.clone();

        let mut worker = Worker::new();
        assert!(!worker.is_alive());

        worker.start(
            move || {
                ccounter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(1),
        );
        assert!(worker.is_alive());

        std::thread::sleep(Duration::from_millis(100));
        worker.stop();

        assert!(!worker.is_alive());
        assert!(counter.load(Ordering::SeqCst) > 0);
    }
}
