use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::UnknownShapeError;

/// Number of blocks in every shape.
pub const SHAPE_CELLS: usize = 4;

/// Tallest extent of any shape, in rows.
///
/// A single placement touches at most this many rows.
pub const MAX_SHAPE_HEIGHT: usize = 3;

/// Position of one block relative to the shape's local origin.
///
/// The origin is the bottom-left corner of the shape's bounding box: `row` counts upward from
/// the shape's lowest row and `column` counts rightward from its leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellOffset {
    pub row: usize,
    pub column: usize,
}

impl CellOffset {
    const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Enum representing the type of shape.
///
/// Shapes are fixed: there is no rotation, so each kind maps to exactly one block layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum ShapeKind {
    /// 2×2 square.
    Q = 0,
    /// Z-shape.
    Z = 1,
    /// S-shape.
    S = 2,
    /// T-shape, stem pointing down.
    T = 3,
    /// Horizontal 4-wide line.
    I = 4,
    /// L-shape, foot pointing right.
    L = 5,
    /// J-shape, foot pointing left.
    J = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl TryFrom<char> for ShapeKind {
    type Error = UnknownShapeError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        Self::from_char(letter).ok_or(UnknownShapeError { letter })
    }
}

impl ShapeKind {
    /// Number of shape types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::Q,
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::I,
        ShapeKind::L,
        ShapeKind::J,
    ];

    /// Returns the block offsets of this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::ShapeKind;
    ///
    /// let columns: Vec<_> = ShapeKind::I.offsets().iter().map(|o| o.column).collect();
    /// assert_eq!(columns, [0, 1, 2, 3]);
    /// assert!(ShapeKind::I.offsets().iter().all(|o| o.row == 0));
    /// ```
    #[must_use]
    pub const fn offsets(self) -> &'static [CellOffset; SHAPE_CELLS] {
        &SHAPE_OFFSETS[self as usize]
    }

    /// Number of columns spanned by the shape.
    #[must_use]
    pub fn width(self) -> usize {
        self.offsets().iter().map(|o| o.column + 1).max().unwrap_or(0)
    }

    /// Number of rows spanned by the shape.
    #[must_use]
    pub fn height(self) -> usize {
        self.offsets().iter().map(|o| o.row + 1).max().unwrap_or(0)
    }

    /// Returns the single character representation of this shape kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::Q => 'Q',
            ShapeKind::Z => 'Z',
            ShapeKind::S => 'S',
            ShapeKind::T => 'T',
            ShapeKind::I => 'I',
            ShapeKind::L => 'L',
            ShapeKind::J => 'J',
        }
    }

    /// Parses a shape kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('Q'), Some(ShapeKind::Q));
    /// assert_eq!(ShapeKind::from_char('O'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'Q' => Some(ShapeKind::Q),
            'Z' => Some(ShapeKind::Z),
            'S' => Some(ShapeKind::S),
            'T' => Some(ShapeKind::T),
            'I' => Some(ShapeKind::I),
            'L' => Some(ShapeKind::L),
            'J' => Some(ShapeKind::J),
            _ => None,
        }
    }

    /// Draws the shape top-down, `fill` for blocks and `.` for gaps, one line per row.
    #[must_use]
    pub fn render(self, fill: char) -> String {
        let (width, height) = (self.width(), self.height());
        let mut out = String::with_capacity((width + 1) * height);
        for row in (0..height).rev() {
            for column in 0..width {
                let occupied = self.offsets().contains(&CellOffset::new(row, column));
                out.push(if occupied { fill } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

const SHAPE_OFFSETS: [[CellOffset; SHAPE_CELLS]; ShapeKind::LEN] = {
    const fn c(row: usize, column: usize) -> CellOffset {
        CellOffset::new(row, column)
    }
    [
        // ##
        // ##
        [c(0, 0), c(0, 1), c(1, 0), c(1, 1)],
        // ##.
        // .##
        [c(1, 0), c(1, 1), c(0, 1), c(0, 2)],
        // .##
        // ##.
        [c(1, 1), c(1, 2), c(0, 0), c(0, 1)],
        // ###
        // .#.
        [c(1, 0), c(1, 1), c(1, 2), c(0, 1)],
        // ####
        [c(0, 0), c(0, 1), c(0, 2), c(0, 3)],
        // #.
        // #.
        // ##
        [c(2, 0), c(1, 0), c(0, 0), c(0, 1)],
        // .#
        // .#
        // ##
        [c(2, 1), c(1, 1), c(0, 0), c(0, 1)],
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_kind_char_conversion() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(ShapeKind::try_from(kind.as_char()), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_char().to_string());
        }

        assert_eq!(ShapeKind::from_char('O'), None);
        assert_eq!(ShapeKind::from_char('q'), None);
        assert_eq!(
            ShapeKind::try_from('X'),
            Err(UnknownShapeError { letter: 'X' })
        );
    }

    #[test]
    fn test_offsets_are_anchored_at_origin() {
        for kind in ShapeKind::ALL {
            let offsets = kind.offsets();
            assert!(offsets.iter().any(|o| o.row == 0), "{kind} floats");
            assert!(offsets.iter().any(|o| o.column == 0), "{kind} is shifted");
            for (i, a) in offsets.iter().enumerate() {
                for b in &offsets[i + 1..] {
                    assert_ne!(a, b, "{kind} has duplicate blocks");
                }
            }
        }
    }

    #[test]
    fn test_shape_dimensions() {
        let dims: Vec<_> = ShapeKind::ALL
            .iter()
            .map(|k| (k.as_char(), k.width(), k.height()))
            .collect();
        assert_eq!(
            dims,
            [
                ('Q', 2, 2),
                ('Z', 3, 2),
                ('S', 3, 2),
                ('T', 3, 2),
                ('I', 4, 1),
                ('L', 2, 3),
                ('J', 2, 3),
            ]
        );
        assert!(ShapeKind::ALL.iter().all(|k| k.height() <= MAX_SHAPE_HEIGHT));
    }

    #[test]
    fn test_render() {
        assert_eq!(ShapeKind::Z.render('Z'), "ZZ.\n.ZZ\n");
        assert_eq!(ShapeKind::S.render('#'), ".##\n##.\n");
        assert_eq!(ShapeKind::T.render('#'), "###\n.#.\n");
        assert_eq!(ShapeKind::L.render('L'), "L.\nL.\nLL\n");
        assert_eq!(ShapeKind::J.render('J'), ".J\n.J\nJJ\n");
        assert_eq!(ShapeKind::I.render('I'), "IIII\n");
    }

    #[test]
    fn test_shape_kind_serialization() {
        let serialized = serde_json::to_string(&ShapeKind::T).unwrap();
        assert_eq!(serialized, "\"T\"");
        let deserialized: ShapeKind = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, ShapeKind::T);
    }
}
