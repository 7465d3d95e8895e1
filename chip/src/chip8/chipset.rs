use std::{
    convert::TryFrom,
    ops::Range,
    time::{SystemTime, UNIX_EPOCH},
};

use {
    crate::{
        definitions::{cpu, display, keyboard, memory},
        devices::{Keyboard, RunState},
        opcode::{self, ChipOpcodes, Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep},
        resources::Rom,
        timer::Timer,
        MemoryError, OpcodeError, ProcessError, StackError,
    },
    rand::{rngs::StdRng, RngCore, SeedableRng},
    tinyvec::ArrayVec,
};

/// The call stack, its length is the stack pointer.
pub(super) type Stack = ArrayVec<[u16; cpu::stack::SIZE]>;

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// the loaded program, kept around to be able to reset
    pub(super) rom: Rom,
    /// all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - Reserved for the interpreter
    /// - `0x050-0x09F` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index register `I`. Additions wrap at 16 bits, an index pointing
    /// outside of the memory only faults once it is used to access the memory.
    pub(super) index_register: u16,
    /// The program counter has the address of the next instruction to be fetched.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; here `16` levels are used.
    pub(super) stack: Stack,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) delay_timer: Timer<u8>,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    /// Counts down at 60 hertz, until it reaches 0.
    pub(super) sound_timer: Timer<u8>,
    /// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
    /// `(64 x 32)`, stored row by row.
    pub(super) display: Vec<Vec<bool>>,
    /// Set whenever the display was altered, cleared by the renderer.
    pub(super) display_changed: bool,
    /// The hex keypad as last written by the input device.
    pub(super) keyboard: Keyboard,
    /// Only written by the input device, enforced by the driver.
    pub(super) run_state: RunState,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// The fault that halted the machine.
    pub(super) fault: Option<ProcessError>,
}

/// Seed for the random number generator, taken from the system clock.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_nanos() as u64)
        .unwrap_or_default()
}

impl ChipSet {
    /// will create a new chipset object, with a random number generator seeded
    /// from the current time.
    pub fn new(rom: Rom) -> Result<Self, ProcessError> {
        Self::with_rng(rom, Box::new(StdRng::seed_from_u64(time_seed())))
    }

    /// will create a new chipset object that draws its random numbers from the
    /// given generator.
    pub fn with_rng(rom: Rom, rng: Box<dyn RngCore + Send>) -> Result<Self, ProcessError> {
        let len = rom.get_data().len();
        if len > cpu::PROGRAM_SIZE {
            return Err(ProcessError::RomTooLarge {
                name: rom.get_name().to_string(),
                len,
                max: cpu::PROGRAM_SIZE,
            });
        }

        let mut chip = Self {
            rom,
            opcode: 0,
            memory: vec![0; memory::SIZE],
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER as u16,
            stack: Stack::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            display: vec![vec![false; display::WIDTH]; display::HEIGHT],
            display_changed: false,
            keyboard: Keyboard::new(),
            run_state: RunState::Running,
            rng,
            fault: None,
        };
        chip.initialize();

        log::info!("Loaded the rom '{}' with {} bytes", chip.rom.get_name(), len);
        Ok(chip)
    }

    /// Zeroes the whole state, then writes the fonts and the program into memory.
    fn initialize(&mut self) {
        // initialize all the memory with 0
        self.memory.iter_mut().for_each(|byte| *byte = 0);

        // load fonts
        let fonts = display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len());
        self.memory[fonts].copy_from_slice(&display::fontset::FONTSET);

        // write the rom data into memory
        let data = self.rom.get_data();
        self.memory[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + data.len())]
            .copy_from_slice(data);

        self.opcode = 0;
        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER as u16;
        self.stack.clear();
        self.delay_timer.set_value(0);
        self.sound_timer.set_value(0);
        for row in self.display.iter_mut() {
            row.iter_mut().for_each(|pixel| *pixel = false);
        }
        self.display_changed = false;
        self.keyboard = Keyboard::new();
        self.run_state = RunState::Running;
        self.fault = None;
    }

    /// Puts the machine back into the state it was right after loading the rom,
    /// this also clears any fault. The random number generator is not reseeded.
    pub fn reset(&mut self) {
        log::info!("Resetting the chipset with the rom '{}'", self.rom.get_name());
        self.initialize();
        // the renderer still shows the old frame
        self.display_changed = true;
    }

    /// will get the next opcode from memory and move the program counter past it
    pub(super) fn set_opcode(&mut self) -> Result<(), OpcodeError> {
        // will build the opcode given from the pointer
        self.opcode = opcode::build_opcode(&self.memory, self.program_counter as usize)?;
        self.program_counter += memory::opcodes::SIZE as u16;
        Ok(())
    }

    /// will advance the program by a single step
    ///
    /// An unknown opcode is skipped. Any error halts the machine, all further
    /// calls return the same error until either [`reset`](ChipSet::reset) starts
    /// the program over, or [`clear_fault`](ChipSet::clear_fault) lets it carry on
    /// from where it halted.
    ///
    /// This is the only way to run an instruction, the opcode table itself is
    /// not reachable from outside of the crate.
    /// ```compile_fail
    /// use vm::opcode::ChipOpcodes;
    /// ```
    pub fn next(&mut self) -> Result<Operation, ProcessError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        self.cycle().map_err(|err| {
            log::error!(
                "Halting at {:#06X} after {:#06X}: {}",
                self.program_counter,
                self.opcode,
                err
            );
            self.fault = Some(err.clone());
            err
        })
    }

    /// Drops the stored fault and lets the program carry on with the current
    /// state, returns the fault that was dropped.
    ///
    /// The program counter already moved past an instruction that faulted while
    /// running, so the program continues with the one after it. A fault of the
    /// fetch itself will come up again on the next step.
    pub fn clear_fault(&mut self) -> Option<ProcessError> {
        let fault = self.fault.take();
        if let Some(fault) = &fault {
            log::info!(
                "Continuing at {:#06X} after the fault: {}",
                self.program_counter,
                fault
            );
        }
        fault
    }

    fn cycle(&mut self) -> Result<Operation, ProcessError> {
        // get next opcode
        self.set_opcode()?;

        match Instruction::try_from(self.opcode) {
            Ok(instruction) => {
                log::debug!(
                    "{:#06X}: {:#06X} {:?}",
                    self.program_counter as usize - memory::opcodes::SIZE,
                    self.opcode,
                    instruction
                );
                self.execute(instruction)
            }
            Err(OpcodeError::InvalidOpcode(opcode)) => {
                log::warn!(
                    "Skipping the unsupported opcode {:#06X} at {:#06X}",
                    opcode,
                    self.program_counter as usize - memory::opcodes::SIZE
                );
                Ok(Operation::None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Counts both timers down by one, called at 60 hertz.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Will write keyboard data into internal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_mult(keys);
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) {
        self.keyboard.set_key(key, to)
    }

    /// Will toggle the given key
    pub fn toggle_key(&mut self, key: usize) {
        self.keyboard.toggle_key(key)
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool; keyboard::SIZE] {
        self.keyboard.get_keys()
    }

    pub fn get_run_state(&self) -> RunState {
        self.run_state
    }

    pub fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// Will return a immutable slice of the current display configuration
    pub fn get_display(&self) -> &[Vec<bool>] {
        &self.display[..]
    }

    /// If the display was altered since the flag was cleared last.
    pub fn display_changed(&self) -> bool {
        self.display_changed
    }

    pub fn clear_display_changed(&mut self) {
        self.display_changed = false;
    }

    pub fn get_program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    pub fn get_registers(&self) -> &[u8; cpu::register::SIZE] {
        &self.registers
    }

    /// The amount of return addresses on the stack.
    pub fn get_stack_pointer(&self) -> usize {
        self.stack.len()
    }

    pub fn get_memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn get_name(&self) -> &str {
        self.rom.get_name()
    }

    /// The fault the machine halted on, if any.
    pub fn get_fault(&self) -> Option<&ProcessError> {
        self.fault.as_ref()
    }

    /// Will push the pointer to the stack
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        // try_push hands the value back if there is no room left
        match self.stack.try_push(pointer) {
            None => Ok(()),
            Some(_) => Err(StackError::Full),
        }
    }

    /// Will pop from the stack
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    /// The memory range `from..from + len`, if it lies completely inside of the memory.
    pub(super) fn memory_range(&self, from: usize, len: usize) -> Result<Range<usize>, MemoryError> {
        let to = from + len;
        if to <= self.memory.len() {
            Ok(from..to)
        } else {
            Err(MemoryError::OutOfBounds { address: from, len })
        }
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), MemoryError> {
        self.program_counter = step.apply(self.program_counter as usize)? as u16;
        Ok(())
    }
}
