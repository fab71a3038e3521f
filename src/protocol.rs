//! Domain types exchanged by the exercises
//!
//! The generated protobuf types only carry raw fields; these types give them
//! meaning on both sides of the wire.

use std::fmt;

use crate::error::ExerciseError;

/// Arithmetic operation offered by the calculators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Symbol used when tracing an evaluation
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "·",
            Operation::Divide => "/",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "sub",
            Operation::Multiply => "mul",
            Operation::Divide => "div",
        }
    }

    /// Apply the operation. Division by zero is refused instead of yielding inf/NaN.
    pub fn apply(self, operands: Operands) -> Result<f64, ExerciseError> {
        let Operands { a, b } = operands;
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide if b == 0.0 => Err(ExerciseError::DivisionByZero { dividend: a }),
            Operation::Divide => Ok(a / b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pair of operands sent with every calculator request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Operands {
    pub a: f64,
    pub b: f64,
}

impl Operands {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

/// Result of comparing a guess with the target number
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The guess is above the target
    Higher,
    /// The guess is below the target
    Lower,
    Correct,
}

impl GuessOutcome {
    /// Status message shown to the player
    pub fn message(self) -> &'static str {
        match self {
            GuessOutcome::Higher => "Your guess is HIGHER than the target number!",
            GuessOutcome::Lower => "Your guess is LOWER than the target number!",
            GuessOutcome::Correct => "Correct",
        }
    }

    pub fn is_correct(self) -> bool {
        self == GuessOutcome::Correct
    }
}

impl fmt::Display for GuessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// Conversion helpers between our types and protobuf types
impl From<crate::pb::calculator::OperandsRequest> for Operands {
    fn from(pb: crate::pb::calculator::OperandsRequest) -> Self {
        Self { a: pb.a, b: pb.b }
    }
}

impl From<Operands> for crate::pb::calculator::OperandsRequest {
    fn from(operands: Operands) -> Self {
        Self {
            a: operands.a,
            b: operands.b,
        }
    }
}

impl From<crate::pb::calculator_pro::OperandsRequest> for Operands {
    fn from(pb: crate::pb::calculator_pro::OperandsRequest) -> Self {
        Self { a: pb.a, b: pb.b }
    }
}

impl From<Operands> for crate::pb::calculator_pro::OperandsRequest {
    fn from(operands: Operands) -> Self {
        Self {
            a: operands.a,
            b: operands.b,
        }
    }
}

impl From<GuessOutcome> for crate::pb::guessing_game::Outcome {
    fn from(outcome: GuessOutcome) -> Self {
        use crate::pb::guessing_game::Outcome;
        match outcome {
            GuessOutcome::Higher => Outcome::Higher,
            GuessOutcome::Lower => Outcome::Lower,
            GuessOutcome::Correct => Outcome::Correct,
        }
    }
}

impl GuessOutcome {
    /// Decode the wire value of an outcome; unknown or unspecified values yield `None`
    pub fn from_wire(value: i32) -> Option<Self> {
        use crate::pb::guessing_game::Outcome;
        match Outcome::try_from(value).ok()? {
            Outcome::Higher => Some(GuessOutcome::Higher),
            Outcome::Lower => Some(GuessOutcome::Lower),
            Outcome::Correct => Some(GuessOutcome::Correct),
            Outcome::Unspecified => None,
        }
    }
}
