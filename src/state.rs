use rand::rngs::StdRng;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE,
    PROGRAM_START, SPRITE_SHEET, STACK_DEPTH,
};
use crate::error::{Chip8Error, Result};

/// The framebuffer is a flat row-major grid; pixel (x, y) lives at `y * DISPLAY_WIDTH + x`
pub type FrameBuffer = [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT];

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the next free slot on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down by whoever drives the machine
///
/// ## Memory
/// - 12 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the font sprite sheet
///     - 0x200.. holds the ROM
/// - 64x32 frame buffer
///
/// ## Input
/// - 16 key snapshot written by the driver before each cycle
#[derive(Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; KEY_COUNT],
    pub rng: StdRng,
}

impl State {
    /// Power-on state: everything zeroed except the font and the program counter
    pub fn new(rng: StdRng) -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = FONT_START as usize;
        memory[font_start..font_start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            rng,
        }
    }

    /// Copies a ROM into program memory
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// `len` bytes of memory starting at `addr`, failing on the first address past the end
    pub fn read(&self, addr: usize, len: usize) -> Result<&[u8]> {
        check_range(addr, len)?;
        Ok(&self.memory[addr..addr + len])
    }

    /// Mutable counterpart of `read`
    pub fn write(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        check_range(addr, len)?;
        Ok(&mut self.memory[addr..addr + len])
    }
}

fn check_range(addr: usize, len: usize) -> Result<()> {
    if addr + len > MEMORY_SIZE {
        let address = addr.max(MEMORY_SIZE);
        return Err(Chip8Error::OutOfBounds { address });
    }
    Ok(())
}
