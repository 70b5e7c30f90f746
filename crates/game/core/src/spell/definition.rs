//! Authored spell grids.
//!
//! A spell is a small grid of symbols. Casting starts at column 0, row 0; a
//! running symbol may chain to the cell to its right (primary event) or to the
//! cell diagonally down-right (secondary event) when that cell is not blank.

use crate::spell::SpellError;
use crate::types::ElementType;

/// Effect variant a symbol runs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SymbolKind {
    #[default]
    Blank,
    Projectile,
    Fire,
    Explosion,
    Push,
    Recast,
}

/// One cell of a spell grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSymbol {
    pub kind: SymbolKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: ElementType,
}

impl SpellSymbol {
    pub const BLANK: Self = Self {
        kind: SymbolKind::Blank,
        element: ElementType::None,
    };

    pub const fn new(kind: SymbolKind, element: ElementType) -> Self {
        Self { kind, element }
    }

    pub const fn is_blank(&self) -> bool {
        matches!(self.kind, SymbolKind::Blank)
    }
}

/// Immutable spell definition shared by every slot running one of its symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spell {
    cols: u8,
    rows: u8,
    /// Row-major, `rows * cols` entries.
    symbols: Vec<SpellSymbol>,
}

impl Spell {
    /// Largest grid dimension; chaining adds one to a coordinate, which must
    /// not overflow `u8`.
    pub const MAX_DIMENSION: usize = 32;

    /// Builds a spell from rows of symbols. Short rows are padded with blanks.
    ///
    /// # Errors
    ///
    /// Returns `SpellError::Empty` for a grid without columns or rows and
    /// `SpellError::GridTooLarge` when a dimension exceeds [`Spell::MAX_DIMENSION`].
    pub fn from_rows(rows: Vec<Vec<SpellSymbol>>) -> Result<Self, SpellError> {
        let row_count = rows.len();
        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);

        if row_count == 0 || col_count == 0 {
            return Err(SpellError::Empty);
        }
        if row_count > Self::MAX_DIMENSION || col_count > Self::MAX_DIMENSION {
            return Err(SpellError::GridTooLarge {
                cols: col_count,
                rows: row_count,
            });
        }

        let mut symbols = Vec::with_capacity(row_count * col_count);
        for mut row in rows {
            row.resize(col_count, SpellSymbol::BLANK);
            symbols.extend(row);
        }

        Ok(Self {
            cols: col_count as u8,
            rows: row_count as u8,
            symbols,
        })
    }

    /// Single-row spell, one symbol per column.
    pub fn chain(symbols: impl IntoIterator<Item = SpellSymbol>) -> Result<Self, SpellError> {
        Self::from_rows(vec![symbols.into_iter().collect()])
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Symbol at `(col, row)`; cells outside the grid are blank.
    pub fn symbol(&self, col: u8, row: u8) -> SpellSymbol {
        if col >= self.cols || row >= self.rows {
            return SpellSymbol::BLANK;
        }
        self.symbols[row as usize * self.cols as usize + col as usize]
    }

    /// True when the cell to the right of `(col, row)` holds a symbol.
    pub fn has_primary_event(&self, col: u8, row: u8) -> bool {
        !self.symbol(col.saturating_add(1), row).is_blank()
    }

    /// True when the cell down-right of `(col, row)` holds a symbol.
    pub fn has_secondary_event(&self, col: u8, row: u8) -> bool {
        !self
            .symbol(col.saturating_add(1), row.saturating_add(1))
            .is_blank()
    }
}
