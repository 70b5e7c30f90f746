//! Word-addressed, type-tagged variable storage.
//!
//! A [`VariableBlock`] is a flat byte buffer divided into 4-byte words. Each
//! variable lives in one word; its [`DataType`] decides how many bytes of the
//! word are significant and how they are sign-extended when loaded.

use super::ExpressionError;

/// Size of one addressable word in bytes.
pub const WORD_SIZE: usize = 4;

/// Storage type of a variable slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DataType {
    /// Single byte, loaded as 0 or 1.
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer, little endian.
    Int16,
    /// Signed 32-bit integer, little endian.
    Int32,
}

impl DataType {
    /// Number of significant bytes at the start of the word.
    pub const fn size(self) -> usize {
        match self {
            DataType::Bool | DataType::Int8 => 1,
            DataType::Int16 => 2,
            DataType::Int32 => 4,
        }
    }
}

/// Address and type of a variable inside a [`VariableBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableRef {
    pub data_type: DataType,
    pub word_offset: u16,
}

impl VariableRef {
    pub const fn new(data_type: DataType, word_offset: u16) -> Self {
        Self {
            data_type,
            word_offset,
        }
    }

    /// Byte offset of the first byte of this variable.
    pub const fn byte_offset(&self) -> usize {
        self.word_offset as usize * WORD_SIZE
    }
}

/// Fixed-size block of variables, used for cutscene locals and game globals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableBlock {
    bytes: Vec<u8>,
}

impl VariableBlock {
    /// Creates a zeroed block holding `word_count` words.
    pub fn new(word_count: usize) -> Self {
        Self {
            bytes: vec![0; word_count * WORD_SIZE],
        }
    }

    /// Number of addressable words.
    pub fn word_count(&self) -> usize {
        self.bytes.len() / WORD_SIZE
    }

    /// Zeroes every variable.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Loads a variable, sign-extending it to `i32`.
    pub fn read(&self, var: VariableRef) -> Result<i32, ExpressionError> {
        let word = self.word(var)?;
        let value = match var.data_type {
            DataType::Bool => i32::from(word[0] != 0),
            DataType::Int8 => i32::from(word[0] as i8),
            DataType::Int16 => i32::from(i16::from_le_bytes([word[0], word[1]])),
            DataType::Int32 => i32::from_le_bytes([word[0], word[1], word[2], word[3]]),
        };
        Ok(value)
    }

    /// Stores a variable, truncating `value` to the declared type.
    ///
    /// Bytes of the word beyond the type's size are left untouched.
    pub fn write(&mut self, var: VariableRef, value: i32) -> Result<(), ExpressionError> {
        let words = self.word_count();
        let start = var.byte_offset();
        let Some(word) = self.bytes.get_mut(start..start + WORD_SIZE) else {
            return Err(ExpressionError::VariableOutOfBounds {
                word_offset: var.word_offset,
                words,
            });
        };

        match var.data_type {
            DataType::Bool => word[0] = u8::from(value != 0),
            DataType::Int8 => word[0] = value as i8 as u8,
            DataType::Int16 => word[..2].copy_from_slice(&(value as i16).to_le_bytes()),
            DataType::Int32 => word.copy_from_slice(&value.to_le_bytes()),
        }
        Ok(())
    }

    fn word(&self, var: VariableRef) -> Result<&[u8], ExpressionError> {
        let start = var.byte_offset();
        self.bytes
            .get(start..start + WORD_SIZE)
            .ok_or(ExpressionError::VariableOutOfBounds {
                word_offset: var.word_offset,
                words: self.word_count(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_types_sign_extend() {
        let mut block = VariableBlock::new(3);
        block.write(VariableRef::new(DataType::Int8, 0), -3).unwrap();
        block.write(VariableRef::new(DataType::Int16, 1), -300).unwrap();
        block.write(VariableRef::new(DataType::Bool, 2), 42).unwrap();

        assert_eq!(block.read(VariableRef::new(DataType::Int8, 0)).unwrap(), -3);
        assert_eq!(block.read(VariableRef::new(DataType::Int16, 1)).unwrap(), -300);
        assert_eq!(block.read(VariableRef::new(DataType::Bool, 2)).unwrap(), 1);
    }

    #[test]
    fn int16_truncates_on_store() {
        let mut block = VariableBlock::new(1);
        let var = VariableRef::new(DataType::Int16, 0);
        block.write(var, 0x0001_0005).unwrap();
        assert_eq!(block.read(var).unwrap(), 5);
    }

    #[test]
    fn access_past_the_end_is_rejected() {
        let mut block = VariableBlock::new(2);
        let var = VariableRef::new(DataType::Int32, 2);
        assert_eq!(
            block.read(var),
            Err(ExpressionError::VariableOutOfBounds {
                word_offset: 2,
                words: 2
            })
        );
        assert!(block.write(var, 1).is_err());
    }
}
