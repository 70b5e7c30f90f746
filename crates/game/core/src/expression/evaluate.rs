//! Expression evaluation.

use arrayvec::ArrayVec;

use crate::config::SpellConfig;
use crate::expression::{ExprData, ExprOp, Expression, ExpressionError, VariableBlock};

type Stack = ArrayVec<i32, { SpellConfig::MAX_EXPRESSION_STACK }>;

/// Evaluate an expression against a locals and a globals block.
///
/// Opcodes run left to right against an operand stack. Booleans are integers:
/// zero is false, anything else is true, and comparisons push 0 or 1.
/// Arithmetic wraps on overflow.
///
/// ## Error Handling
/// - `StackUnderflow` / `StackOverflow` / `UnbalancedStack` for malformed programs
/// - `DivisionByZero` when `DIV` sees a zero divisor
/// - `VariableOutOfBounds` when a load addresses a word past the block
pub fn evaluate(
    expression: &Expression,
    locals: &VariableBlock,
    globals: &VariableBlock,
) -> Result<i32, ExpressionError> {
    let mut stack = Stack::new();

    for (index, (op, data)) in expression.ops().iter().zip(expression.data()).enumerate() {
        let value = match op {
            ExprOp::End => return finish(stack, index),

            ExprOp::LoadLocal => locals.read(variable(*op, data, index)?)?,
            ExprOp::LoadGlobal => globals.read(variable(*op, data, index)?)?,
            ExprOp::LoadLiteral => match data {
                ExprData::Literal(value) => *value,
                _ => return Err(ExpressionError::MissingOperand { op: *op, index }),
            },

            ExprOp::Not => i32::from(pop(&mut stack, index)? == 0),

            binary => {
                let b = pop(&mut stack, index)?;
                let a = pop(&mut stack, index)?;
                apply_binary(*binary, a, b, index)?
            }
        };

        stack
            .try_push(value)
            .map_err(|_| ExpressionError::StackOverflow { index })?;
    }

    Err(ExpressionError::MissingEnd)
}

fn apply_binary(op: ExprOp, a: i32, b: i32, index: usize) -> Result<i32, ExpressionError> {
    let value = match op {
        ExprOp::And => i32::from(a != 0 && b != 0),
        ExprOp::Or => i32::from(a != 0 || b != 0),
        ExprOp::Add => a.wrapping_add(b),
        ExprOp::Sub => a.wrapping_sub(b),
        ExprOp::Mul => a.wrapping_mul(b),
        ExprOp::Div => {
            if b == 0 {
                return Err(ExpressionError::DivisionByZero { index });
            }
            a.wrapping_div(b)
        }
        ExprOp::Eq => i32::from(a == b),
        ExprOp::Neq => i32::from(a != b),
        ExprOp::Gt => i32::from(a > b),
        ExprOp::Gte => i32::from(a >= b),
        // loads, NOT and END are handled by the caller
        _ => unreachable!("{op} is not a binary operator"),
    };
    Ok(value)
}

fn variable(
    op: ExprOp,
    data: &ExprData,
    index: usize,
) -> Result<crate::expression::VariableRef, ExpressionError> {
    match data {
        ExprData::Variable(var) => Ok(*var),
        _ => Err(ExpressionError::MissingOperand { op, index }),
    }
}

fn pop(stack: &mut Stack, index: usize) -> Result<i32, ExpressionError> {
    stack.pop().ok_or(ExpressionError::StackUnderflow { index })
}

fn finish(mut stack: Stack, index: usize) -> Result<i32, ExpressionError> {
    match stack.len() {
        1 => Ok(stack.pop().unwrap_or_default()),
        0 => Err(ExpressionError::StackUnderflow { index }),
        depth => Err(ExpressionError::UnbalancedStack { depth }),
    }
}
