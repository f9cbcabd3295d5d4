use crate::cells::Coordinate;
use crate::units::{ColumnsCount, RowsCount};

/// Row-major iteration over every coordinate of a maze.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    columns: ColumnsCount,
}

impl CellIter {
    pub(crate) fn new(rows: RowsCount, columns: ColumnsCount) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: rows.0 * columns.0,
            columns,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Coordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_coordinate(self.current_cell_number, self.columns);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Iteration over whole rows of coordinates, northmost row first.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_row: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RowIter {
    pub(crate) fn new(rows: RowsCount, columns: ColumnsCount) -> RowIter {
        RowIter {
            current_row: 0,
            rows,
            columns,
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<Coordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let RowsCount(count) = self.rows;
        if self.current_row < count {
            let ColumnsCount(length) = self.columns;
            let row = self.current_row as isize;
            let coords = (0..length)
                .map(|col| Coordinate::new(row, col as isize))
                .collect();
            self.current_row += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows.0 - self.current_row;
        (remaining, Some(remaining))
    }
}

#[inline]
pub(crate) fn index_to_coordinate(index: usize, columns: ColumnsCount) -> Coordinate {
    let ColumnsCount(width) = columns;
    Coordinate::new((index / width) as isize, (index % width) as isize)
}
