use thiserror::Error;

/// Everything that can go wrong while loading or running a ROM.
///
/// Errors from `Chip8::step` are fatal for that machine; its state is unspecified afterwards.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("stack overflow: call with all return slots in use")]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),

    #[error("key {0:#X} is not on the keypad")]
    InvalidKey(u8),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
