use std::fmt;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. Their behavior is cased on some
/// combination of:
/// - `(n, _, _, _)` the instruction family; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a family
/// - `(_, _, n, n)` more specific behavior within a family
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry data.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx or the upper bound of a range V0..=Vx
/// - `(_, _, n, _)` the register Vy
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Combines two consecutive memory bytes into an opcode.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from_be_bytes([high, low]))
    }

    /// The Opcode's component nibbles, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (self.family(), self.x() as u8, self.y() as u8, self.n())
    }

    /// `[f___]`
    pub fn family(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    /// `[_x__]` as a register index
    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    /// `[__y_]` as a register index
    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// `[__nn]`
    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// `[_nnn]`
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
