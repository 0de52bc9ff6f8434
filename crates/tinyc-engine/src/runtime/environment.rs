//! Variable storage for a single run.

use std::fmt;

use super::value::{VARIABLE_COUNT, Value, Variable};

/// The 26 global variable slots of a running program.
///
/// Every slot starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    slots: [Value; VARIABLE_COUNT],
}

impl Environment {
    /// Creates an environment with every variable set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a variable's value.
    pub fn get(&self, var: Variable) -> Value {
        self.slots[var.index()]
    }

    /// Sets a variable's value.
    pub fn set(&mut self, var: Variable, value: Value) {
        self.slots[var.index()] = value;
    }

    /// Consumes the environment and produces the final report.
    pub fn into_report(self) -> Report {
        Report { slots: self.slots }
    }
}

/// The final variable state of a finished run.
///
/// Only non-zero variables are reported, in `a`..`z` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    slots: [Value; VARIABLE_COUNT],
}

impl Report {
    /// Gets the final value of a variable (zero if never assigned).
    pub fn get(&self, var: Variable) -> Value {
        self.slots[var.index()]
    }

    /// Looks a variable up by letter.
    pub fn value_of(&self, letter: char) -> Option<Value> {
        Variable::from_letter(letter).map(|var| self.get(var))
    }

    /// Iterates over the non-zero variables in `a`..`z` order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, Value)> + '_ {
        Variable::all()
            .map(|var| (var, self.get(var)))
            .filter(|(_, value)| *value != 0)
    }

    /// Returns true if every variable ended at zero.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (var, value) in self.iter() {
            writeln!(f, "{} = {}", var, value)?;
        }
        Ok(())
    }
}
