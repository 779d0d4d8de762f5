//! One function per instruction.
//!
//! Every operation runs after the program counter has already been moved past the
//! instruction, so skips add another 2 and jumps overwrite it outright.

use rand::Rng;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START, STACK_DEPTH,
};
use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;
use crate::state::State;

const VF: usize = 0xF;

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc += 0x2;
    }
}

/// clear
pub fn clr(_op: Opcode, state: &mut State) -> Result<()> {
    state.frame_buffer.iter_mut().for_each(|p| *p = false);
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(_op: Opcode, state: &mut State) -> Result<()> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow);
    }
    state.sp -= 1;
    state.pc = state.stack[state.sp as usize];
    Ok(())
}

/// PC = addr
pub fn jump(op: Opcode, state: &mut State) -> Result<()> {
    state.pc = op.nnn();
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(op: Opcode, state: &mut State) -> Result<()> {
    if state.sp as usize >= STACK_DEPTH {
        return Err(Chip8Error::StackOverflow);
    }
    state.stack[state.sp as usize] = state.pc;
    state.sp += 1;
    state.pc = op.nnn();
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(op: Opcode, state: &mut State) -> Result<()> {
    let eq = state.v[op.x()] == op.nn();
    skip_if(state, eq);
    Ok(())
}

/// if Vx != kk then pc += 2
pub fn skne(op: Opcode, state: &mut State) -> Result<()> {
    let ne = state.v[op.x()] != op.nn();
    skip_if(state, ne);
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre(op: Opcode, state: &mut State) -> Result<()> {
    let eq = state.v[op.x()] == state.v[op.y()];
    skip_if(state, eq);
    Ok(())
}

/// Vx = kk
pub fn load(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] = op.nn();
    Ok(())
}

/// Vx += kk
/// Overflow wraps and is dropped; VF is left alone
pub fn add(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.nn());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] = state.v[op.y()];
    Ok(())
}

/// Vx |= Vy
pub fn or(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(())
}

/// Vx &= Vy
pub fn and(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(())
}

/// Vx += Vy; VF = overflow
pub fn addr(op: Opcode, state: &mut State) -> Result<()> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[VF] = over as u8;
    Ok(())
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(op: Opcode, state: &mut State) -> Result<()> {
    let (x, y) = (state.v[op.x()], state.v[op.y()]);
    state.v[op.x()] = x.wrapping_sub(y);
    state.v[VF] = (x > y) as u8;
    Ok(())
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(op: Opcode, state: &mut State) -> Result<()> {
    let x = state.v[op.x()];
    state.v[op.x()] = x >> 1;
    state.v[VF] = x & 0x1;
    Ok(())
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(op: Opcode, state: &mut State) -> Result<()> {
    let (x, y) = (state.v[op.x()], state.v[op.y()]);
    state.v[op.x()] = y.wrapping_sub(x);
    state.v[VF] = (y > x) as u8;
    Ok(())
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(op: Opcode, state: &mut State) -> Result<()> {
    let x = state.v[op.x()];
    state.v[op.x()] = x << 1;
    state.v[VF] = x >> 7;
    Ok(())
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: Opcode, state: &mut State) -> Result<()> {
    let ne = state.v[op.x()] != state.v[op.y()];
    skip_if(state, ne);
    Ok(())
}

/// I = addr
pub fn loadi(op: Opcode, state: &mut State) -> Result<()> {
    state.i = op.nnn();
    Ok(())
}

/// PC = V0 + addr
/// The result may land past the end of memory, which the next fetch reports
pub fn jumpi(op: Opcode, state: &mut State) -> Result<()> {
    state.pc = op.nnn() + u16::from(state.v[0x0]);
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rand(op: Opcode, state: &mut State) -> Result<()> {
    let rand_byte: u8 = state.rng.gen();
    state.v[op.x()] = rand_byte & op.nn();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite at memory I..I+n onto the FrameBuffer.
///
/// Only the origin wraps around the screen; pixels that would land past the right or
/// bottom edge are dropped. VF is set if any pixel was erased.
pub fn draw(op: Opcode, state: &mut State) -> Result<()> {
    let origin_x = state.v[op.x()] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[op.y()] as usize % DISPLAY_HEIGHT;
    let rows = op.n() as usize;

    let mut sprite = [0u8; 0xF];
    sprite[..rows].copy_from_slice(state.read(state.i as usize, rows)?);

    let mut collision = false;
    for (row, &byte) in sprite[..rows].iter().enumerate() {
        let y = origin_y + row;
        if y >= DISPLAY_HEIGHT {
            break;
        }
        for bit in 0..8 {
            let x = origin_x + bit;
            if x >= DISPLAY_WIDTH {
                break;
            }
            if (byte >> (7 - bit)) & 0x1 == 0 {
                continue;
            }
            let pixel = &mut state.frame_buffer[y * DISPLAY_WIDTH + x];
            collision |= *pixel;
            *pixel = !*pixel;
        }
    }

    state.v[VF] = collision as u8;
    state.draw_flag = true;
    Ok(())
}

/// Keys are 4 bits wide; only the low nibble of Vx selects one
fn key_in(op: Opcode, state: &State) -> bool {
    state.pressed_keys[(state.v[op.x()] & 0xF) as usize]
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: Opcode, state: &mut State) -> Result<()> {
    let pressed = key_in(op, state);
    skip_if(state, pressed);
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: Opcode, state: &mut State) -> Result<()> {
    let pressed = key_in(op, state);
    skip_if(state, !pressed);
    Ok(())
}

/// Vx = DT
pub fn moved(op: Opcode, state: &mut State) -> Result<()> {
    state.v[op.x()] = state.delay_timer;
    Ok(())
}

/// await keypress for Vx
/// With nothing pressed the program counter is wound back so this runs again next cycle
pub fn keyd(op: Opcode, state: &mut State) -> Result<()> {
    match state.pressed_keys.iter().position(|&pressed| pressed) {
        Some(key) => state.v[op.x()] = key as u8,
        None => state.pc -= 0x2,
    }
    Ok(())
}

/// DT = Vx
pub fn loads(op: Opcode, state: &mut State) -> Result<()> {
    state.delay_timer = state.v[op.x()];
    Ok(())
}

/// ST = Vx
pub fn ld(op: Opcode, state: &mut State) -> Result<()> {
    state.sound_timer = state.v[op.x()];
    Ok(())
}

/// I += Vx
pub fn addi(op: Opcode, state: &mut State) -> Result<()> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    Ok(())
}

/// I = address of the font glyph for the low nibble of Vx
pub fn ldspr(op: Opcode, state: &mut State) -> Result<()> {
    let digit = u16::from(state.v[op.x()] & 0xF);
    state.i = FONT_START + digit * FONT_GLYPH_SIZE;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: Opcode, state: &mut State) -> Result<()> {
    let value = state.v[op.x()];
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.write(state.i as usize, 3)?.copy_from_slice(&digits);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
/// I itself is left unchanged
pub fn stor(op: Opcode, state: &mut State) -> Result<()> {
    let count = op.x() + 1;
    let registers = state.v;
    state
        .write(state.i as usize, count)?
        .copy_from_slice(&registers[..count]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
/// I itself is left unchanged
pub fn read(op: Opcode, state: &mut State) -> Result<()> {
    let count = op.x() + 1;
    let mut loaded = [0u8; 16];
    loaded[..count].copy_from_slice(state.read(state.i as usize, count)?);
    state.v[..count].copy_from_slice(&loaded[..count]);
    Ok(())
}
