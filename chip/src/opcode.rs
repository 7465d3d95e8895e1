//! Opcode abstractions, decoding and the dispatch table.
use std::convert::TryFrom;

use crate::{definitions::memory, MemoryError, OpcodeError, ProcessError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a nibble
const NIBBLE: u16 = 0x4;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use vm::opcode::*;
/// # use vm::OpcodeError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let pointer = 3;
/// # let err = OpcodeError::MemoryInvalid { pointer, len: SPLIT_OPCODE.len() };
/// # assert_eq!(Err(err), build_opcode(&SPLIT_OPCODE, pointer));
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        })
    }
}

/// Extractors for the fields an opcode of the form `TXYN` is made of.
pub trait OpcodeTrait {
    /// The opcode class, the top nibble `T`.
    fn t(&self) -> u8;

    /// The second nibble `X`, always a register index.
    fn x(&self) -> usize;

    /// The third nibble `Y`, always a register index.
    fn y(&self) -> usize;

    /// The last nibble `N`, a 4-bit immediate.
    fn n(&self) -> usize;

    /// The low byte `NN`, an 8-bit immediate.
    fn nn(&self) -> u8;

    /// The low three nibbles `NNN`, a 12-bit address.
    fn nnn(&self) -> u16;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use vm::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * NIBBLE)) as u8
    }

    /// # Example
    /// ```rust
    /// # use vm::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> (2 * NIBBLE)) as usize
    }

    /// # Example
    /// ```rust
    /// # use vm::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.y(), 0xD);
    /// ```
    fn y(&self) -> usize {
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        ((self & MASK) >> NIBBLE) as usize
    }

    fn n(&self) -> usize {
        (self & OPCODE_MASK_000F) as usize
    }

    /// # Example
    /// ```rust
    /// # use vm::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.nn(), 0xDA);
    /// ```
    fn nn(&self) -> u8 {
        (self & OPCODE_MASK_00FF) as u8
    }

    /// # Example
    /// ```rust
    /// # use vm::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }
}

/// All the operand fields of a fetched opcode, decoded once so that
/// the operations never have to derive them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub t: u8,
    pub x: usize,
    pub y: usize,
    pub n: usize,
    pub nn: u8,
    pub nnn: u16,
}

impl From<Opcode> for Operands {
    fn from(opcode: Opcode) -> Self {
        Self {
            t: opcode.t(),
            x: opcode.x(),
            y: opcode.y(),
            n: opcode.n(),
            nn: opcode.nn(),
            nnn: opcode.nnn(),
        }
    }
}

/// Every operation class the interpreter knows, with the operands it needs.
///
/// `0NNN` (calling a machine code routine of the host) is not supported and
/// decodes like any other unknown opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `1NNN`
    Jump { nnn: u16 },
    /// `2NNN`
    Call { nnn: u16 },
    /// `3XNN`
    SkipEqImm { x: usize, nn: u8 },
    /// `4XNN`
    SkipNeqImm { x: usize, nn: u8 },
    /// `5XY0`
    SkipEqReg { x: usize, y: usize },
    /// `6XNN`
    LoadImm { x: usize, nn: u8 },
    /// `7XNN`
    AddImm { x: usize, nn: u8 },
    /// `8XY0`
    Assign { x: usize, y: usize },
    /// `8XY1`
    Or { x: usize, y: usize },
    /// `8XY2`
    And { x: usize, y: usize },
    /// `8XY3`
    Xor { x: usize, y: usize },
    /// `8XY4`
    AddReg { x: usize, y: usize },
    /// `8XY5`
    SubReg { x: usize, y: usize },
    /// `8XY6`
    ShiftRight { x: usize },
    /// `8XY7`
    SubnReg { x: usize, y: usize },
    /// `8XYE`
    ShiftLeft { x: usize },
    /// `9XY0`
    SkipNeqReg { x: usize, y: usize },
    /// `ANNN`
    SetIndex { nnn: u16 },
    /// `BNNN`
    JumpOffset { nnn: u16 },
    /// `CXNN`
    Random { x: usize, nn: u8 },
    /// `DXYN`
    Draw { x: usize, y: usize, n: usize },
    /// `EX9E`
    SkipKeyPressed { x: usize },
    /// `EXA1`
    SkipKeyNotPressed { x: usize },
    /// `FX07`
    GetDelayTimer { x: usize },
    /// `FX0A`
    WaitKey { x: usize },
    /// `FX15`
    SetDelayTimer { x: usize },
    /// `FX18`
    SetSoundTimer { x: usize },
    /// `FX1E`
    AddToIndex { x: usize },
    /// `FX29`
    FontCharAddress { x: usize },
    /// `FX33`
    StoreBcd { x: usize },
    /// `FX55`
    StoreRegisters { x: usize },
    /// `FX65`
    LoadRegisters { x: usize },
}

impl Operands {
    /// Maps the operands onto the operation class they belong to, `None` if
    /// there is no such class.
    pub fn instruction(&self) -> Option<Instruction> {
        use Instruction::*;

        let Operands { t, x, y, n, nn, nnn } = *self;
        let instruction = match (t, n, nn) {
            (0x0, _, _) if nnn == 0x0E0 => Clear,
            (0x0, _, _) if nnn == 0x0EE => Return,
            (0x1, _, _) => Jump { nnn },
            (0x2, _, _) => Call { nnn },
            (0x3, _, _) => SkipEqImm { x, nn },
            (0x4, _, _) => SkipNeqImm { x, nn },
            (0x5, 0x0, _) => SkipEqReg { x, y },
            (0x6, _, _) => LoadImm { x, nn },
            (0x7, _, _) => AddImm { x, nn },
            (0x8, 0x0, _) => Assign { x, y },
            (0x8, 0x1, _) => Or { x, y },
            (0x8, 0x2, _) => And { x, y },
            (0x8, 0x3, _) => Xor { x, y },
            (0x8, 0x4, _) => AddReg { x, y },
            (0x8, 0x5, _) => SubReg { x, y },
            (0x8, 0x6, _) => ShiftRight { x },
            (0x8, 0x7, _) => SubnReg { x, y },
            (0x8, 0xE, _) => ShiftLeft { x },
            (0x9, 0x0, _) => SkipNeqReg { x, y },
            (0xA, _, _) => SetIndex { nnn },
            (0xB, _, _) => JumpOffset { nnn },
            (0xC, _, _) => Random { x, nn },
            (0xD, _, _) => Draw { x, y, n },
            (0xE, _, 0x9E) => SkipKeyPressed { x },
            (0xE, _, 0xA1) => SkipKeyNotPressed { x },
            (0xF, _, 0x07) => GetDelayTimer { x },
            (0xF, _, 0x0A) => WaitKey { x },
            (0xF, _, 0x15) => SetDelayTimer { x },
            (0xF, _, 0x18) => SetSoundTimer { x },
            (0xF, _, 0x1E) => AddToIndex { x },
            (0xF, _, 0x29) => FontCharAddress { x },
            (0xF, _, 0x33) => StoreBcd { x },
            (0xF, _, 0x55) => StoreRegisters { x },
            (0xF, _, 0x65) => LoadRegisters { x },
            _ => return None,
        };
        Some(instruction)
    }
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        Operands::from(value)
            .instruction()
            .ok_or(OpcodeError::InvalidOpcode(value))
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program counter movement an operation requests, on top of
/// the advance every fetch already did.
pub enum ProgramCounterStep {
    /// Keep the advance of the fetch, continue with the next instruction
    Next,
    /// Will skip the next instruction
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(usize),
    /// Will undo the advance of the fetch, so the same instruction is fetched again
    Repeat,
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use vm::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Applies the step to a program counter that already points past the
    /// current instruction. A step that would leave the address space of the
    /// program counter is an out of bounds error.
    ///
    /// # Example
    /// ```rust
    /// # use vm::{opcode::ProgramCounterStep, MemoryError};
    /// assert_eq!(ProgramCounterStep::Skip.apply(0x202), Ok(0x204));
    /// assert_eq!(ProgramCounterStep::Repeat.apply(0x202), Ok(0x200));
    /// assert_eq!(ProgramCounterStep::Jump(0x300).apply(0x202), Ok(0x300));
    /// assert_eq!(
    ///     ProgramCounterStep::Repeat.apply(0x000),
    ///     Err(MemoryError::OutOfBounds { address: 0x000, len: 2 })
    /// );
    /// ```
    #[inline]
    pub fn apply(&self, pointer: usize) -> Result<usize, MemoryError> {
        let to = match *self {
            ProgramCounterStep::Next => Some(pointer),
            ProgramCounterStep::Skip => pointer.checked_add(memory::opcodes::SIZE),
            ProgramCounterStep::Jump(to) => Some(to),
            ProgramCounterStep::Repeat => pointer.checked_sub(memory::opcodes::SIZE),
        };

        // the program counter is 16 bit wide
        to.filter(|to| *to <= u16::MAX as usize)
            .ok_or(MemoryError::OutOfBounds {
                address: pointer,
                len: memory::opcodes::SIZE,
            })
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub(crate) trait ProgramCounter {
    /// will move the program counter by the given step.
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), MemoryError>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents a command from the interpreter up to the driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The interpreter is blocked until a key is pressed.
    Wait,
    /// The display changed and has to be redrawn.
    Draw,
}

/// The opcode table, every [`Instruction`](Instruction) maps to exactly one handler.
///
/// This trait requires the implementation of the [`ProgramCounter`](ProgramCounter) trait, as
/// the step every handler returns is applied through it.
///
/// The table is internal to the crate, instructions only ever run through
/// [`ChipSet::next`](crate::chip8::ChipSet::next), which keeps a halted machine halted.
pub(crate) trait ChipOpcodes: ProgramCounter {
    /// Will run a single decoded instruction.
    fn execute(&mut self, instruction: Instruction) -> Result<Operation, ProcessError> {
        use Instruction::*;

        let mut operation = Operation::None;
        let step_op = |(step, op): (ProgramCounterStep, Operation)| {
            operation = op;
            step
        };

        let step = match instruction {
            Clear => self.clear().map(step_op),
            Return => self.ret(),
            Jump { nnn } => self.jump(nnn),
            Call { nnn } => self.call(nnn),
            SkipEqImm { x, nn } => self.skip_eq_imm(x, nn),
            SkipNeqImm { x, nn } => self.skip_neq_imm(x, nn),
            SkipEqReg { x, y } => self.skip_eq_reg(x, y),
            LoadImm { x, nn } => self.load_imm(x, nn),
            AddImm { x, nn } => self.add_imm(x, nn),
            Assign { x, y } => self.assign(x, y),
            Or { x, y } => self.or(x, y),
            And { x, y } => self.and(x, y),
            Xor { x, y } => self.xor(x, y),
            AddReg { x, y } => self.add_reg(x, y),
            SubReg { x, y } => self.sub_reg(x, y),
            ShiftRight { x } => self.shift_right(x),
            SubnReg { x, y } => self.subn_reg(x, y),
            ShiftLeft { x } => self.shift_left(x),
            SkipNeqReg { x, y } => self.skip_neq_reg(x, y),
            SetIndex { nnn } => self.set_index(nnn),
            JumpOffset { nnn } => self.jump_offset(nnn),
            Random { x, nn } => self.random(x, nn),
            Draw { x, y, n } => self.draw(x, y, n).map(step_op),
            SkipKeyPressed { x } => self.skip_key_pressed(x),
            SkipKeyNotPressed { x } => self.skip_key_not_pressed(x),
            GetDelayTimer { x } => self.get_delay_timer_into(x),
            WaitKey { x } => self.wait_key(x).map(step_op),
            SetDelayTimer { x } => self.set_delay_timer_from(x),
            SetSoundTimer { x } => self.set_sound_timer_from(x),
            AddToIndex { x } => self.add_to_index(x),
            FontCharAddress { x } => self.font_char_address(x),
            StoreBcd { x } => self.store_bcd(x),
            StoreRegisters { x } => self.store_registers(x),
            LoadRegisters { x } => self.load_registers(x),
        }?;

        self.step(step)?;
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    fn clear(&mut self) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn ret(&mut self) -> Result<ProgramCounterStep, ProcessError>;

    /// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
    fn jump(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn call(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XNN` - Cond     - `if(Vx==NN)`          - Skips the next instruction if `VX` equals `NN`.
    fn skip_eq_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `4XNN` - Cond     - `if(Vx!=NN)`          - Skips the next instruction if `VX` doesn't equal `NN`.
    fn skip_neq_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    fn skip_eq_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `6XNN` - Const    - `Vx = NN`             - Sets `VX` to `NN`.
    fn load_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `7XNN` - Const    - `Vx += NN`            - Adds `NN` to `VX`. (Carry flag is not changed)
    fn add_imm(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    fn assign(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Sets `VX` to `VX` or `VY`.
    fn or(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Sets `VX` to `VX` and `VY`.
    fn and(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Sets `VX` to `VX` xor `VY`.
    fn xor(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY4` - Math     - `Vx += Vy`            - Adds `VY` to `VX`. `VF` is set to `1` when there's a carry, and to `0` when there isn't.
    fn add_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY5` - Math     - `Vx -= Vy`            - `VY` is subtracted from `VX`. `VF` is set to `1` when `VX > VY`, and to `0` otherwise.
    fn sub_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY6` - BitOp    - `Vx>>=1`              - Stores the least significant bit of `VX` in `VF` and then shifts `VX` to the right by `1`.
    fn shift_right(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - Sets `VX` to `VY` minus `VX`. `VF` is set to `1` when `VY >= VX`, and to `0` otherwise.
    fn subn_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `8XYE` - BitOp    - `Vx<<=1`              - Stores the most significant bit of `VX` in `VF` and then shifts `VX` to the left by `1`.
    fn shift_left(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn skip_neq_reg(&mut self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn set_index(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn jump_offset(&mut self, nnn: u16) -> Result<ProgramCounterStep, ProcessError>;

    /// - `CXNN` - Rand     - `Vx=rand()&NN`        - Sets `VX` to a random byte and `NN`.
    fn random(&mut self, x: usize, nn: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Draws a sprite at coordinate `(VX, VY)` that has a width of `8` pixels and a height of `N` pixels. `VF` is set to `1` if any screen pixels are flipped from set to unset.
    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: usize,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    fn skip_key_pressed(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn skip_key_not_pressed(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    fn get_delay_timer_into(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - A key press is awaited, and then stored in `VX`.
    fn wait_key(&mut self, x: usize) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    fn set_delay_timer_from(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    fn set_sound_timer_from(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX1E` - MEM      - `I +=Vx`              - Adds `VX` to `I`. `VF` is not affected.
    fn add_to_index(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`   - Sets `I` to the location of the font glyph for the character in `VX`.
    fn font_char_address(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX33` - BCD      - `246 / 100 => 2` `246 / 10 => 24 % 10 => 4` `246 % 10 => 6` - Stores the [binary-coded decimal](https://en.wikipedia.org/wiki/Binary-coded_decimal) representation of `VX` at `I`, `I+1` and `I+2`.
    fn store_bcd(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`. `I` itself is left unmodified.
    fn store_registers(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` (including `VX`) with values from memory starting at address `I`. `I` itself is left unmodified.
    fn load_registers(&mut self, x: usize) -> Result<ProgramCounterStep, ProcessError>;
}
