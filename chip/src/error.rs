use thiserror::Error;

use crate::opcode::Opcode;

/// Every fault a single interpreter call can end in.
///
/// A fault is sticky, the chipset will hand out the same error until it is
/// reset.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Invalid memory access '{0}'.")]
    Memory(#[from] MemoryError),
    #[error("The rom '{name}' with {len} bytes does not fit into the program space of {max} bytes.")]
    RomTooLarge {
        name: String,
        len: usize,
        max: usize,
    },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("Pointer location invalid there can not be an opcode at {pointer}, if data len is {len}")]
    MemoryInvalid { pointer: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum MemoryError {
    #[error("Memory access at {address:#06X} with a length of {len} is out of bounds.")]
    OutOfBounds { address: usize, len: usize },
}

/// The rates a machine is driven with.
#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum SettingsError {
    #[error("The {clock} clock needs a rate of at least one hertz.")]
    ZeroHertz { clock: &'static str },
}
