use std::fmt;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MEMORY_SIZE};
use crate::error::{Chip8Error, Result};
use crate::instruction::from_op;
use crate::opcode::Opcode;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `rom` it was built from, so it can be reset
///
/// Supplies interfaces for:
/// - advancing the CPU one instruction at a time
/// - pressing and releasing keys
/// - reading, setting and counting down its timers
/// - inspecting its frame buffer for rendering by some display
///
/// It never keeps time itself: whoever drives it decides how often to `step` and
/// how often to `tick_timers`.
pub struct Chip8 {
    state: State,
    rom: Vec<u8>,
}

impl Chip8 {
    /// Builds a machine with `rom` loaded at 0x200 and an entropy-seeded random source
    pub fn new(rom: &[u8]) -> Result<Self> {
        Chip8::with_rng(rom, StdRng::from_entropy())
    }

    /// Like `new`, but `Cxkk` draws from a generator seeded with `seed`
    pub fn with_seed(rom: &[u8], seed: u64) -> Result<Self> {
        Chip8::with_rng(rom, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rom: &[u8], rng: StdRng) -> Result<Self> {
        let mut state = State::new(rng);
        state.load_rom(rom)?;
        debug!("loaded {} byte ROM", rom.len());
        Ok(Chip8 {
            state,
            rom: rom.to_vec(),
        })
    }

    /// Returns to the power-on state with the same ROM; the random source carries on
    pub fn reset(&mut self) -> Result<()> {
        let mut state = State::new(self.state.rng.clone());
        state.load_rom(&self.rom)?;
        self.state = state;
        Ok(())
    }

    /// Advances the CPU by a single cycle
    /// - fetches the opcode at the pc
    /// - moves the pc past it
    /// - decodes and executes it
    ///
    /// Any error leaves the machine unusable; stop stepping it.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let result = self.cycle();
        if let Err(e) = &result {
            warn!("execution stopped at {:04X}: {}", pc, e);
        }
        result
    }

    fn cycle(&mut self) -> Result<()> {
        let op = self.get_op()?;
        trace!(
            "{} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        self.state.pc += 0x2;
        let operation = from_op(op)?;
        operation(op, &mut self.state)
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<Opcode> {
        let bytes = self.state.read(self.state.pc as usize, 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit keypad index of the key that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        *self.key_mut(key)? = true;
        Ok(())
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit keypad index of the key that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        *self.key_mut(key)? = false;
        Ok(())
    }

    fn key_mut(&mut self, key: u8) -> Result<&mut bool> {
        self.state
            .pressed_keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey(key))
    }

    /// Replaces the whole keypad snapshot
    pub fn set_keypad(&mut self, keys: [bool; KEY_COUNT]) {
        self.state.pressed_keys = keys;
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.state
            .pressed_keys
            .get(key as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.state.delay_timer = value;
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.state.sound_timer = value;
    }

    /// Counts both timers down by one, stopping at zero.
    /// Meant to be called at `TIMER_FREQUENCY` regardless of how fast the CPU runs.
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// The driver should be making noise while this holds
    pub fn is_beeping(&self) -> bool {
        self.state.sound_timer != 0
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether the pixel at (x, y) is lit; anything off screen is dark
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.state.frame_buffer[y * DISPLAY_WIDTH + x]
    }

    /// Returns the FrameBuffer if the display should be redrawn, and unsets the draw flag
    pub fn get_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.state.v
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.state.memory
    }
}

impl fmt::Debug for Chip8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Chip8")
            .field("v", &format!("{:02x?}", self.state.v))
            .field("pc", &format!("{:04x}", self.state.pc))
            .field("i", &format!("{:04x}", self.state.i))
            .field("sp", &self.state.sp)
            .field("stack", &format!("{:04x?}", &self.state.stack[..self.state.sp as usize]))
            .field("dt", &format!("{:02x}", self.state.delay_timer))
            .field("st", &format!("{:02x}", self.state.sound_timer))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_ROM_SIZE;

    fn chip8(rom: &[u8]) -> Chip8 {
        Chip8::with_seed(rom, 1).unwrap()
    }

    #[test]
    fn test_chip8_gets_op() {
        let chip8 = chip8(&[0xAA, 0xBB]);
        assert_eq!(chip8.get_op().unwrap(), Opcode(0xAABB));
    }

    #[test]
    fn test_new_zeroes_everything_but_pc() {
        let chip8 = chip8(&[0x00, 0xE0]);
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.i(), 0);
        assert_eq!(chip8.sp(), 0);
        assert_eq!(chip8.registers(), &[0; 16]);
        assert_eq!((chip8.delay_timer(), chip8.sound_timer()), (0, 0));
        assert_eq!(chip8.memory()[0x200..0x202], [0x00, 0xE0]);
    }

    #[test]
    fn test_accepts_largest_rom() {
        assert!(Chip8::new(&[0; MAX_ROM_SIZE]).is_ok());
    }

    #[test]
    fn test_rejects_oversized_rom() {
        match Chip8::new(&[0; MAX_ROM_SIZE + 1]) {
            Err(Chip8Error::RomTooLarge { size, max_size }) => {
                assert_eq!((size, max_size), (3585, 3584));
            }
            other => panic!("expected RomTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_step_advances_pc() {
        // insert a cls opcode so there is something defined to run
        let mut chip8 = chip8(&[0x00, 0xE0]);
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x202);
    }

    #[test]
    fn test_step_reports_unknown_opcode() {
        let mut chip8 = chip8(&[0x0F, 0xFF]);
        assert_eq!(chip8.step().unwrap_err(), Chip8Error::UnknownOpcode(0x0FFF));
    }

    #[test]
    fn test_step_fails_fetching_past_memory() {
        // JP 0xFFF leaves only one byte to fetch
        let mut chip8 = chip8(&[0x1F, 0xFF]);
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0xFFF);
        assert_eq!(
            chip8.step().unwrap_err(),
            Chip8Error::OutOfBounds { address: 0x1000 }
        );
    }

    #[test]
    fn test_call_then_return_resumes_after_call() {
        // 0x200 CALL 0x206
        // 0x202 JP 0x202
        // 0x204 (padding)
        // 0x206 RET
        let mut chip8 = chip8(&[0x22, 0x06, 0x12, 0x02, 0x00, 0x00, 0x00, 0xEE]);
        chip8.step().unwrap();
        assert_eq!((chip8.pc(), chip8.sp()), (0x206, 1));
        chip8.step().unwrap();
        assert_eq!((chip8.pc(), chip8.sp()), (0x202, 0));
    }

    #[test]
    fn test_key_press_and_release() {
        let mut chip8 = chip8(&[]);
        chip8.key_press(0xA).unwrap();
        assert!(chip8.is_key_pressed(0xA));
        chip8.key_release(0xA).unwrap();
        assert!(!chip8.is_key_pressed(0xA));
    }

    #[test]
    fn test_key_outside_keypad_is_rejected() {
        let mut chip8 = chip8(&[]);
        assert_eq!(chip8.key_press(0x10).unwrap_err(), Chip8Error::InvalidKey(0x10));
        assert!(!chip8.is_key_pressed(0x10));
    }

    #[test]
    fn test_key_snapshot_drives_skip() {
        // 0x200 LD V1, 0x5
        // 0x202 SKP V1
        let mut chip8 = chip8(&[0x61, 0x05, 0xE1, 0x9E]);
        let mut keys = [false; KEY_COUNT];
        keys[0x5] = true;
        chip8.set_keypad(keys);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.pc(), 0x206);
    }

    #[test]
    fn test_tick_timers_stops_at_zero() {
        let mut chip8 = chip8(&[]);
        chip8.set_delay_timer(2);
        chip8.set_sound_timer(1);
        assert!(chip8.is_beeping());
        chip8.tick_timers();
        assert_eq!((chip8.delay_timer(), chip8.sound_timer()), (1, 0));
        assert!(!chip8.is_beeping());
        chip8.tick_timers();
        chip8.tick_timers();
        assert_eq!((chip8.delay_timer(), chip8.sound_timer()), (0, 0));
    }

    #[test]
    fn test_step_never_ticks_timers() {
        let mut chip8 = chip8(&[0x00, 0xE0]);
        chip8.set_delay_timer(5);
        chip8.step().unwrap();
        assert_eq!(chip8.delay_timer(), 5);
    }

    #[test]
    fn test_get_frame_only_after_draw() {
        let mut chip8 = chip8(&[0x00, 0xE0]);
        assert!(chip8.get_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_some());
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_pixel_off_screen_is_dark() {
        let chip8 = chip8(&[]);
        assert!(!chip8.pixel(DISPLAY_WIDTH, 0));
        assert!(!chip8.pixel(0, DISPLAY_HEIGHT));
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        // 0x200 LD V3, 0x99
        // 0x202 CALL 0x200
        let mut chip8 = chip8(&[0x63, 0x99, 0x22, 0x00]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.reset().unwrap();
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.sp(), 0);
        assert_eq!(chip8.registers()[0x3], 0);
        assert_eq!(chip8.memory()[0x200..0x204], [0x63, 0x99, 0x22, 0x00]);
    }

    #[test]
    fn test_debug_shows_registers_in_hex() {
        let chip8 = chip8(&[]);
        let debug = format!("{:?}", chip8);
        assert!(debug.contains("pc: \"0200\""));
    }
}
