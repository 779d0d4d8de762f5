//! A headless CHIP-8 interpreter.
//!
//! The crate owns the machine and its instruction set only. Loading ROM files, drawing
//! the frame buffer, reading the host keyboard and beeping are left to whatever drives
//! [`Chip8`]:
//!
//! ```
//! use emu8::Chip8;
//!
//! // CLS; JP 0x202
//! let mut chip8 = Chip8::new(&[0x00, 0xE0, 0x12, 0x02]).unwrap();
//! for _ in 0..8 {
//!     chip8.step().unwrap();
//! }
//! assert_eq!(chip8.pc(), 0x202);
//! assert!(chip8.get_frame().is_some());
//! ```

pub use chip8::Chip8;
pub use constants::{CLOCK_SPEED, TIMER_FREQUENCY};
pub use error::{Chip8Error, Result};
pub use opcode::Opcode;
pub use state::FrameBuffer;

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod state;
