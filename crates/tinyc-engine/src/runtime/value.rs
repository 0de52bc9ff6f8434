//! Integer values and variable slots.

use std::fmt;

/// A tinyc value.
///
/// Every value in the language is a signed 64-bit integer. Addition and
/// subtraction wrap on overflow.
pub type Value = i64;

/// Number of variable slots (`a` through `z`).
pub const VARIABLE_COUNT: usize = 26;

/// A variable slot, identified by its letter.
///
/// The inner index is always in `0..VARIABLE_COUNT`, `0` for `a` and `25`
/// for `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(u8);

impl Variable {
    /// Returns the variable named by an ASCII letter (either case).
    pub fn from_letter(letter: char) -> Option<Self> {
        if letter.is_ascii_alphabetic() {
            Some(Self(letter.to_ascii_lowercase() as u8 - b'a'))
        } else {
            None
        }
    }

    /// Returns the variable at a slot index.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < VARIABLE_COUNT).then_some(Self(index as u8))
    }

    /// The slot index of this variable.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The lower-case letter naming this variable.
    pub fn letter(self) -> char {
        (b'a' + self.0) as char
    }

    /// Iterates over all variables in `a`..`z` order.
    pub fn all() -> impl Iterator<Item = Variable> {
        (0..VARIABLE_COUNT as u8).map(Variable)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// `a + b` with two's-complement wrap-around.
pub fn add(a: Value, b: Value) -> Value {
    a.wrapping_add(b)
}

/// `a - b` with two's-complement wrap-around.
pub fn sub(a: Value, b: Value) -> Value {
    a.wrapping_sub(b)
}

/// `a < b` as `1` or `0`.
pub fn less_than(a: Value, b: Value) -> Value {
    Value::from(a < b)
}
