/// Total addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are copied into memory starting here; everything below is reserved for the interpreter
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Where the hexadecimal font sprites live in reserved memory
pub const FONT_START: u16 = 0x050;

/// Each font glyph is 8 pixels wide and 5 rows tall
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Display dimensions in pixels
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 12;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Nanoseconds per CPU cycle for a driver running the interpreter at 500Hz
pub const CLOCK_SPEED: u64 = 1_000_000_000 / 500;

/// Rate at which a driver should call `Chip8::tick_timers`
pub const TIMER_FREQUENCY: u32 = 60;

/// # Sprite Sheet
/// The standard hexadecimal font; glyph `d` starts at `FONT_START + d * FONT_GLYPH_SIZE`.
///
/// Each glyph is drawn with the high nibble of 5 bytes, e.g. `0`:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
