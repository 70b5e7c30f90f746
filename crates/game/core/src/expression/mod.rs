//! Stack-based expression bytecode used by cutscene steps.
//!
//! An [`Expression`] is an opcode stream plus a parallel operand array; the
//! operand at index `i` belongs to the opcode at index `i`. Programs are
//! terminated by [`ExprOp::End`], at which point the single value left on the
//! stack is the result.
//!
//! ## Examples
//!
//! ```
//! use spellcast_core::expression::{DataType, ExprOp, Expression, VariableRef};
//!
//! // local[0] >= 3
//! let expr = Expression::builder()
//!     .load_local(VariableRef::new(DataType::Int32, 0))
//!     .literal(3)
//!     .op(ExprOp::Gte)
//!     .build();
//! assert_eq!(expr.len(), 4);
//! ```

pub mod evaluate;
pub mod variables;

pub use evaluate::evaluate;
pub use variables::{DataType, VariableBlock, VariableRef, WORD_SIZE};

use crate::error::{ErrorSeverity, GameError};

// ============================================================================
// Bytecode
// ============================================================================

/// Expression opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ExprOp {
    End,
    LoadLocal,
    LoadGlobal,
    LoadLiteral,
    And,
    Or,
    Not,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Gt,
    Gte,
}

/// Operand attached to an opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprData {
    /// Opcode takes no operand.
    #[default]
    None,
    /// Variable read by `LoadLocal` / `LoadGlobal`.
    Variable(VariableRef),
    /// Value pushed by `LoadLiteral`.
    Literal(i32),
}

/// Immutable expression program.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    ops: Vec<ExprOp>,
    data: Vec<ExprData>,
}

impl Expression {
    /// Creates an expression from parallel opcode and operand arrays.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError::LengthMismatch` when the arrays differ in
    /// length and `ExpressionError::MissingEnd` when the program is not
    /// terminated by `End`.
    pub fn new(ops: Vec<ExprOp>, data: Vec<ExprData>) -> Result<Self, ExpressionError> {
        if ops.len() != data.len() {
            return Err(ExpressionError::LengthMismatch {
                ops: ops.len(),
                data: data.len(),
            });
        }
        if ops.last() != Some(&ExprOp::End) {
            return Err(ExpressionError::MissingEnd);
        }
        Ok(Self { ops, data })
    }

    /// Expression that evaluates to a constant.
    pub fn constant(value: i32) -> Self {
        Self::builder().literal(value).build()
    }

    pub fn builder() -> ExpressionBuilder {
        ExpressionBuilder::default()
    }

    /// Number of instructions, including the terminating `End`.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[ExprOp] {
        &self.ops
    }

    pub fn data(&self) -> &[ExprData] {
        &self.data
    }

    /// Number of local words this expression touches (highest local offset + 1).
    pub fn local_words(&self) -> usize {
        self.ops
            .iter()
            .zip(&self.data)
            .filter_map(|(op, data)| match (op, data) {
                (ExprOp::LoadLocal, ExprData::Variable(var)) => Some(var.word_offset as usize + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Incremental builder for [`Expression`] programs.
///
/// Appends the terminating `End` in [`ExpressionBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct ExpressionBuilder {
    ops: Vec<ExprOp>,
    data: Vec<ExprData>,
}

impl ExpressionBuilder {
    pub fn load_local(self, var: VariableRef) -> Self {
        self.push(ExprOp::LoadLocal, ExprData::Variable(var))
    }

    pub fn load_global(self, var: VariableRef) -> Self {
        self.push(ExprOp::LoadGlobal, ExprData::Variable(var))
    }

    pub fn literal(self, value: i32) -> Self {
        self.push(ExprOp::LoadLiteral, ExprData::Literal(value))
    }

    /// Appends an operator that takes its operands from the stack.
    pub fn op(self, op: ExprOp) -> Self {
        self.push(op, ExprData::None)
    }

    pub fn build(mut self) -> Expression {
        self.ops.push(ExprOp::End);
        self.data.push(ExprData::None);
        Expression {
            ops: self.ops,
            data: self.data,
        }
    }

    fn push(mut self, op: ExprOp, data: ExprData) -> Self {
        self.ops.push(op);
        self.data.push(data);
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building or evaluating an expression.
///
/// All of these indicate malformed authored content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("opcode and operand arrays differ in length ({ops} vs {data})")]
    LengthMismatch { ops: usize, data: usize },

    #[error("expression is not terminated by END")]
    MissingEnd,

    #[error("{op} at instruction {index} has no valid operand")]
    MissingOperand { op: ExprOp, index: usize },

    #[error("stack underflow at instruction {index}")]
    StackUnderflow { index: usize },

    #[error("stack overflow at instruction {index}")]
    StackOverflow { index: usize },

    #[error("expression finished with {depth} values on the stack")]
    UnbalancedStack { depth: usize },

    #[error("division by zero at instruction {index}")]
    DivisionByZero { index: usize },

    #[error("variable word {word_offset} is outside a block of {words} words")]
    VariableOutOfBounds { word_offset: u16, words: usize },
}

impl GameError for ExpressionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "EXPR_LENGTH_MISMATCH",
            Self::MissingEnd => "EXPR_MISSING_END",
            Self::MissingOperand { .. } => "EXPR_MISSING_OPERAND",
            Self::StackUnderflow { .. } => "EXPR_STACK_UNDERFLOW",
            Self::StackOverflow { .. } => "EXPR_STACK_OVERFLOW",
            Self::UnbalancedStack { .. } => "EXPR_UNBALANCED_STACK",
            Self::DivisionByZero { .. } => "EXPR_DIVISION_BY_ZERO",
            Self::VariableOutOfBounds { .. } => "EXPR_VARIABLE_OUT_OF_BOUNDS",
        }
    }
}
