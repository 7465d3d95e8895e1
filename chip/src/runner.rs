//! Drives a [`ChipSet`](crate::chip8::ChipSet) in real time, the instruction
//! clock and the timer clock are kept apart by the [`Clock`](crate::timer::Clock).
use std::{
    sync::mpsc::{self, Receiver},
    time::{Duration, Instant},
};

use crate::{
    chip8::ChipSet,
    definitions::{cpu, timer},
    devices::{DisplayCommands, KeyboardCommands, RunState, SoundCommands},
    timer::{Clock, ClockEvent, TimedWorker},
    ProcessError, SettingsError,
};

/// The rates the machine runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// instructions per second
    pub cpu_hertz: u64,
    /// timer decrements per second
    pub timer_hertz: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cpu_hertz: cpu::HERTZ,
            timer_hertz: timer::HERTZ,
        }
    }
}

/// A chipset wired up to its devices.
pub struct Machine<D, K, S> {
    chip: ChipSet,
    clock: Clock,
    display: D,
    keyboard: K,
    sound: S,
    /// the last state handed to the sound device
    tone: bool,
}

impl<D, K, S> Machine<D, K, S>
where
    D: DisplayCommands,
    K: KeyboardCommands,
    S: SoundCommands,
{
    /// Wires the chip up to its devices, fails if one of the rates is zero.
    pub fn new(
        chip: ChipSet,
        settings: Settings,
        display: D,
        keyboard: K,
        sound: S,
    ) -> Result<Self, SettingsError> {
        log::debug!("Creating a machine with {:?}", settings);
        Ok(Self {
            chip,
            clock: Clock::new(settings.cpu_hertz, settings.timer_hertz)?,
            display,
            keyboard,
            sound,
            tone: false,
        })
    }

    /// Moves the machine forward by the elapsed wall time.
    ///
    /// While the machine is paused the elapsed time is dropped, so neither the
    /// program nor the timers move on. The frame is handed to the display
    /// whenever it changed, even if the interpreter faulted on the way.
    pub fn update(&mut self, elapsed: Duration) -> Result<RunState, ProcessError> {
        let run_state = self.keyboard.get_run_state();
        self.chip.set_run_state(run_state);

        if run_state != RunState::Running {
            self.set_tone(false);
            return Ok(run_state);
        }

        self.chip.set_keyboard(&self.keyboard.get_keyboard());

        let result = self.run_events(elapsed);

        if self.chip.display_changed() {
            self.display.display(self.chip.get_display());
            self.chip.clear_display_changed();
        }
        self.set_tone(self.chip.get_sound_timer() > 0);

        result.map(|_| run_state)
    }

    fn run_events(&mut self, elapsed: Duration) -> Result<(), ProcessError> {
        for event in self.clock.advance(elapsed) {
            match event {
                ClockEvent::Cycle => {
                    self.chip.next()?;
                }
                ClockEvent::Tick => self.chip.tick_timers(),
            }
        }
        Ok(())
    }

    fn set_tone(&mut self, on: bool) {
        if self.tone != on {
            self.tone = on;
            self.sound.set_tone(on);
        }
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn into_chip(self) -> ChipSet {
        self.chip
    }
}

/// How a machine driven by [`run`](run) came to an end.
pub enum Exit {
    /// The keyboard asked to quit.
    Quit(ChipSet),
    /// The interpreter halted on a fault.
    Fault(ChipSet, ProcessError),
}

/// Will drive the machine on a worker, that calls it every interval. Once the
/// machine quits or faults, the chipset is handed back through the receiver
/// and the worker idles until it is stopped.
pub fn run<W, D, K, S>(machine: Machine<D, K, S>, interval: Duration) -> (W, Receiver<Exit>)
where
    W: TimedWorker,
    D: DisplayCommands + Send + 'static,
    K: KeyboardCommands + Send + 'static,
    S: SoundCommands + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let mut machine = Some(machine);
    let mut last = Instant::now();

    let callback = move || {
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        let result = match machine.as_mut() {
            Some(running) => running.update(elapsed),
            None => return,
        };

        let exit = match result {
            Ok(RunState::Quit) => machine.take().map(|done| Exit::Quit(done.into_chip())),
            Ok(_) => None,
            Err(err) => machine
                .take()
                .map(|done| Exit::Fault(done.into_chip(), err)),
        };

        if let Some(exit) = exit {
            log::info!("The machine stopped");
            if sender.send(exit).is_err() {
                log::warn!("Nobody is waiting for the machine to stop");
            }
        }
    };

    let mut worker = W::new();
    worker.start(callback, interval);
    (worker, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        definitions::{display, keyboard},
        devices::{MockDisplayCommands, MockKeyboardCommands, MockSoundCommands},
        resources::Rom,
        timer::Worker,
        StackError,
    };
    use mockall::predicate::eq;

    fn chip(program: &[u8]) -> ChipSet {
        ChipSet::new(Rom::new("RUNNER", program)).unwrap()
    }

    fn mock_keyboard(run_state: RunState) -> MockKeyboardCommands {
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_get_run_state().return_const(run_state);
        keyboard
            .expect_get_keyboard()
            .return_const([false; keyboard::SIZE]);
        keyboard
    }

    /// clear, draw the `0` glyph of the font and loop
    const DRAW_PROGRAM: [u8; 8] = [0x00, 0xE0, 0xA0, 0x50, 0xD0, 0x15, 0x12, 0x06];

    #[test]
    fn test_update_runs_and_renders() {
        let mut display = MockDisplayCommands::new();
        display
            .expect_display()
            .withf(|pixels| {
                pixels.len() == display::HEIGHT && pixels.iter().all(|row| row.len() == display::WIDTH)
            })
            .times(1)
            .return_const(());
        let mut sound = MockSoundCommands::new();
        sound.expect_set_tone().times(0);

        let mut machine = Machine::new(
            chip(&DRAW_PROGRAM),
            Settings::default(),
            display,
            mock_keyboard(RunState::Running),
            sound,
        )
        .unwrap();

        // 10 cycles at 500 hertz
        assert_eq!(Ok(RunState::Running), machine.update(Duration::from_millis(20)));
        assert_eq!(machine.chip().get_program_counter(), 0x206);
        assert!(!machine.chip().display_changed());
        assert!(machine.chip().get_display()[0][..4].iter().all(|pixel| *pixel));
    }

    #[test]
    fn test_zero_hertz_is_refused() {
        let settings = Settings {
            cpu_hertz: 0,
            ..Settings::default()
        };
        let machine = Machine::new(
            chip(&DRAW_PROGRAM),
            settings,
            MockDisplayCommands::new(),
            MockKeyboardCommands::new(),
            MockSoundCommands::new(),
        );
        assert_eq!(
            Some(SettingsError::ZeroHertz { clock: "cpu" }),
            machine.err()
        );
    }

    #[test]
    fn test_paused_machine_is_frozen() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut sound = MockSoundCommands::new();
        sound.expect_set_tone().times(0);

        let mut machine = Machine::new(
            chip(&DRAW_PROGRAM),
            Settings::default(),
            display,
            mock_keyboard(RunState::Paused),
            sound,
        )
        .unwrap();

        for _ in 0..10 {
            assert_eq!(Ok(RunState::Paused), machine.update(Duration::from_secs(1)));
        }
        assert_eq!(machine.chip().get_program_counter(), 0x200);
        assert_eq!(machine.chip().get_run_state(), RunState::Paused);
    }

    #[test]
    fn test_sound_follows_the_timer() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut sound = MockSoundCommands::new();
        sound
            .expect_set_tone()
            .with(eq(true))
            .times(1)
            .return_const(());
        sound
            .expect_set_tone()
            .with(eq(false))
            .times(1)
            .return_const(());

        // V0 = 2, sound timer = V0, loop
        let program = [0x60, 0x02, 0xF0, 0x18, 0x12, 0x04];
        let mut machine = Machine::new(
            chip(&program),
            Settings::default(),
            display,
            mock_keyboard(RunState::Running),
            sound,
        )
        .unwrap();

        // no timer tick is due yet
        assert_eq!(Ok(RunState::Running), machine.update(Duration::from_millis(10)));
        assert_eq!(machine.chip().get_sound_timer(), 2);

        // three ticks at 16.6ms, 33.3ms and 50ms
        assert_eq!(Ok(RunState::Running), machine.update(Duration::from_millis(40)));
        assert_eq!(machine.chip().get_sound_timer(), 0);
    }

    #[test]
    fn test_fault_is_reported() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(0);
        let mut sound = MockSoundCommands::new();
        sound.expect_set_tone().times(0);

        let mut machine = Machine::new(
            chip(&[0x00, 0xEE]),
            Settings::default(),
            display,
            mock_keyboard(RunState::Running),
            sound,
        )
        .unwrap();

        let fault = ProcessError::Stack(StackError::Empty);
        assert_eq!(Err(fault.clone()), machine.update(Duration::from_millis(2)));
        assert_eq!(Err(fault.clone()), machine.update(Duration::from_millis(2)));
        assert_eq!(machine.into_chip().get_fault(), Some(&fault));
    }

    #[test]
    fn test_run_until_quit() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().return_const(());
        let mut sound = MockSoundCommands::new();
        sound.expect_set_tone().return_const(());

        let machine = Machine::new(
            chip(&DRAW_PROGRAM),
            Settings::default(),
            display,
            mock_keyboard(RunState::Quit),
            sound,
        )
        .unwrap();

        let (mut worker, receiver): (Worker, _) = run(machine, Duration::from_millis(1));
        let exit = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("the machine quits right away");
        worker.stop();

        match exit {
            Exit::Quit(chip) => assert_eq!(chip.get_program_counter(), 0x200),
            Exit::Fault(_, err) => panic!("unexpected fault {}", err),
        }
    }

    #[test]
    fn test_run_until_fault() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().return_const(());
        let mut sound = MockSoundCommands::new();
        sound.expect_set_tone().return_const(());

        let machine = Machine::new(
            chip(&[0x00, 0xEE]),
            Settings::default(),
            display,
            mock_keyboard(RunState::Running),
            sound,
        )
        .unwrap();

        let (mut worker, receiver): (Worker, _) = run(machine, Duration::from_millis(1));
        let exit = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("the machine faults on the first instruction");
        worker.stop();

        match exit {
            Exit::Fault(chip, err) => {
                assert_eq!(err, ProcessError::Stack(StackError::Empty));
                assert_eq!(chip.get_fault(), Some(&err));
            }
            Exit::Quit(_) => panic!("the machine should have faulted"),
        }
    }
}
