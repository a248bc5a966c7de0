use std::iter;

use super::grid::RowRemap;

const WORD_BITS: usize = u64::BITS as usize;

#[inline]
const fn split(row: usize) -> (usize, u64) {
    (row / WORD_BITS, 1 << (row % WORD_BITS))
}

/// Occupancy of a single grid column, one bit per row.
///
/// Bit `r % 64` of word `r / 64` is set when row `r` is occupied. The word vector grows on demand
/// and never ends in a zero word, so the highest occupied row is found in constant time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBits {
    words: Vec<u64>,
}

impl ColumnBits {
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Checks if the cell at `row` is occupied.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, row: usize) -> bool {
        let (index, bit) = split(row);
        self.words.get(index).is_some_and(|word| word & bit != 0)
    }

    /// Marks `row` as occupied, returning `false` if it already was.
    pub fn occupy(&mut self, row: usize) -> bool {
        let (index, bit) = split(row);
        if index >= self.words.len() {
            self.words.resize(index + 1, 0);
        }
        let word = &mut self.words[index];
        let was_vacant = *word & bit == 0;
        *word |= bit;
        was_vacant
    }

    fn clear_bit(&mut self, row: usize) -> bool {
        let (index, bit) = split(row);
        let Some(word) = self.words.get_mut(index) else {
            return false;
        };
        let was_occupied = *word & bit != 0;
        *word &= !bit;
        was_occupied
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }

    /// Returns the highest occupied row, or `None` if the column is empty.
    #[must_use]
    pub fn top(&self) -> Option<usize> {
        let last = *self.words.last()?;
        let bit = WORD_BITS - 1 - last.leading_zeros() as usize;
        Some((self.words.len() - 1) * WORD_BITS + bit)
    }

    /// One past the highest occupied row, or 0 if the column is empty.
    #[must_use]
    pub fn height(&self) -> usize {
        self.top().map_or(0, |row| row + 1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of occupied cells in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Returns the lowest occupied row at or above `from`.
    #[must_use]
    pub fn next_occupied(&self, from: usize) -> Option<usize> {
        let mut index = from / WORD_BITS;
        let mut word = *self.words.get(index)? & (!0 << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(index * WORD_BITS + word.trailing_zeros() as usize);
            }
            index += 1;
            word = *self.words.get(index)?;
        }
    }

    /// Iterates occupied rows at or above `from`, in ascending order.
    pub fn occupied_rows_from(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.next_occupied(from);
        iter::from_fn(move || {
            let row = next?;
            next = self.next_occupied(row + 1);
            Some(row)
        })
    }

    /// Iterates all occupied rows in ascending order.
    pub fn occupied_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.occupied_rows_from(0)
    }

    /// Removes the cleared rows and moves every remaining block to its remapped row.
    ///
    /// Rows below the lowest cleared row are left untouched. Blocks are visited bottom-up, and
    /// a remapped row is never above its original one, so a block is never written over a
    /// block that has not been moved yet.
    pub fn compact(&mut self, remap: &RowRemap) {
        let mut from = remap.lowest_cleared();
        while let Some(row) = self.next_occupied(from) {
            self.clear_bit(row);
            if let Some(new_row) = remap.map(row) {
                self.occupy(new_row);
            }
            from = row + 1;
        }
        self.trim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_of(rows: &[usize]) -> ColumnBits {
        let mut column = ColumnBits::new();
        for &row in rows {
            column.occupy(row);
        }
        column
    }

    #[test]
    fn test_occupy() {
        let mut column = ColumnBits::new();
        assert!(column.is_empty());
        assert_eq!(column.len(), 0);
        assert_eq!(column.top(), None);
        assert_eq!(column.height(), 0);

        assert!(column.occupy(3));
        assert!(!column.occupy(3));
        assert!(column.is_occupied(3));
        assert!(!column.is_occupied(2));
        assert!(!column.is_occupied(1000));
        assert_eq!(column.height(), 4);

        assert!(column.occupy(130));
        assert_eq!(column.top(), Some(130));
        assert_eq!(column.len(), 2);
        assert_eq!(column, column_of(&[130, 3]));
    }

    #[test]
    fn test_word_boundaries() {
        let column = column_of(&[63, 64, 127, 128]);
        assert_eq!(column.top(), Some(128));
        assert_eq!(column.occupied_rows().collect::<Vec<_>>(), [63, 64, 127, 128]);
        assert_eq!(column.next_occupied(65), Some(127));
        assert_eq!(column.next_occupied(129), None);
        assert_eq!(column.next_occupied(10_000), None);
    }

    #[test]
    fn test_occupied_rows_from() {
        let column = column_of(&[0, 2, 5, 70]);
        assert_eq!(column.occupied_rows_from(3).collect::<Vec<_>>(), [5, 70]);
        assert_eq!(column.occupied_rows_from(0).count(), 4);
        assert_eq!(column.occupied_rows_from(71).next(), None);
    }

    #[test]
    fn test_compact_adjacent_rows() {
        let mut column = column_of(&[0, 1, 2, 3, 4]);
        let remap = RowRemap::new([1, 2]).unwrap();
        column.compact(&remap);
        assert_eq!(column.occupied_rows().collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn test_compact_non_adjacent_rows() {
        let mut column = column_of(&[0, 1, 3, 4, 6, 9]);
        let remap = RowRemap::new([1, 4]).unwrap();
        column.compact(&remap);
        // 0 -> 0, 3 -> 2, 6 -> 4, 9 -> 7
        assert_eq!(column.occupied_rows().collect::<Vec<_>>(), [0, 2, 4, 7]);
        assert_eq!(column.top(), Some(7));
    }

    #[test]
    fn test_compact_shrinks_across_words() {
        let mut column = column_of(&[64, 65]);
        let remap = RowRemap::new([0, 1]).unwrap();
        column.compact(&remap);
        assert_eq!(column.occupied_rows().collect::<Vec<_>>(), [62, 63]);
        assert_eq!(column.words.len(), 1);
        assert_eq!(column.len(), 2);

        let mut column = column_of(&[64]);
        column.compact(&RowRemap::new([64]).unwrap());
        assert!(column.is_empty());
        assert!(column.words.is_empty());
        assert_eq!(column, ColumnBits::new());
    }
}
