//! 8x8 board, footprints, and greedy movement.

use std::collections::HashMap;

use thiserror::Error;

use crate::event::Side;
use crate::seed::seeded_random;

pub const BOARD_WIDTH: i32 = 8;
pub const BOARD_HEIGHT: i32 = 8;

/// A board cell, ordered row-major so movement tie-breaks are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Footprint of a creature in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("position ({0}, {1}) invalid for footprint {2}x{3}")]
    OutOfBounds(i32, i32, i32, i32),
    #[error("cell ({0}, {1}) already occupied")]
    Occupied(i32, i32),
    #[error("move of distance {distance} exceeds movement range {movement_range}")]
    OutOfRange { distance: i32, movement_range: i32 },
}

/// Tracks which side occupies each cell. The engine owns the creature
/// records themselves; the grid only answers placement queries.
#[derive(Debug, Default, Clone)]
pub struct Grid {
    cells: HashMap<Position, Side>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_position(&self, position: Position, size: Size) -> bool {
        position.row >= 0
            && position.col >= 0
            && position.row + size.rows <= BOARD_HEIGHT
            && position.col + size.cols <= BOARD_WIDTH
    }

    /// All cells covered by a footprint anchored at `position`.
    pub fn occupied_cells(position: Position, size: Size) -> Vec<Position> {
        let mut cells = Vec::with_capacity((size.rows * size.cols) as usize);
        for dr in 0..size.rows {
            for dc in 0..size.cols {
                cells.push(Position::new(position.row + dr, position.col + dc));
            }
        }
        cells
    }

    pub fn place(&mut self, side: Side, position: Position, size: Size) -> Result<(), GridError> {
        if !self.is_valid_position(position, size) {
            return Err(GridError::OutOfBounds(
                position.row,
                position.col,
                size.rows,
                size.cols,
            ));
        }
        let cells = Self::occupied_cells(position, size);
        for cell in &cells {
            if let Some(occupant) = self.cells.get(cell) {
                if *occupant != side {
                    return Err(GridError::Occupied(cell.row, cell.col));
                }
            }
        }
        for cell in cells {
            self.cells.insert(cell, side);
        }
        Ok(())
    }

    pub fn remove(&mut self, side: Side, position: Position, size: Size) {
        for cell in Self::occupied_cells(position, size) {
            if self.cells.get(&cell) == Some(&side) {
                self.cells.remove(&cell);
            }
        }
    }

    /// Relocates a footprint, validating range, bounds, and occupancy.
    pub fn move_creature(
        &mut self,
        side: Side,
        from: Position,
        size: Size,
        target: Position,
        movement_range: i32,
    ) -> Result<(), GridError> {
        let distance = Self::distance(from, target);
        if distance > movement_range {
            return Err(GridError::OutOfRange {
                distance,
                movement_range,
            });
        }
        if !self.is_valid_position(target, size) {
            return Err(GridError::OutOfBounds(
                target.row,
                target.col,
                size.rows,
                size.cols,
            ));
        }
        for cell in Self::occupied_cells(target, size) {
            if let Some(occupant) = self.cells.get(&cell) {
                if *occupant != side {
                    return Err(GridError::Occupied(cell.row, cell.col));
                }
            }
        }
        self.remove(side, from, size);
        self.place(side, target, size)
    }

    /// Chebyshev distance between two cells.
    pub fn distance(a: Position, b: Position) -> i32 {
        (a.row - b.row).abs().max((a.col - b.col).abs())
    }

    /// True when any pair of cells from the two footprints touches.
    pub fn footprints_adjacent(pos_a: Position, size_a: Size, pos_b: Position, size_b: Size) -> bool {
        for cell_a in Self::occupied_cells(pos_a, size_a) {
            for cell_b in Self::occupied_cells(pos_b, size_b) {
                if Self::distance(cell_a, cell_b) <= 1 {
                    return true;
                }
            }
        }
        false
    }

    fn is_position_free(&self, position: Position, size: Size, exclude: Side) -> bool {
        if !self.is_valid_position(position, size) {
            return false;
        }
        Self::occupied_cells(position, size)
            .iter()
            .all(|cell| match self.cells.get(cell) {
                None => true,
                Some(occupant) => *occupant == exclude,
            })
    }

    /// Greedy single step that minimizes distance to `target`.
    ///
    /// Scans every offset within the movement range and keeps the
    /// reachable free anchor with the smallest target distance; exact
    /// ties go to the lexicographically smaller position. Staying put
    /// is the fallback.
    pub fn path_toward(
        &self,
        side: Side,
        position: Position,
        size: Size,
        movement_range: i32,
        target: Position,
    ) -> Position {
        let mut best_pos = position;
        let mut best_dist = Self::distance(position, target);
        for dr in -movement_range..=movement_range {
            for dc in -movement_range..=movement_range {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let candidate = Position::new(position.row + dr, position.col + dc);
                if !self.is_position_free(candidate, size, side) {
                    continue;
                }
                let dist = Self::distance(candidate, target);
                if dist < best_dist || (dist == best_dist && candidate < best_pos) {
                    best_dist = dist;
                    best_pos = candidate;
                }
            }
        }
        best_pos
    }

    /// Greedy single step that maximizes distance from `enemy`.
    pub fn path_away(
        &self,
        side: Side,
        position: Position,
        size: Size,
        movement_range: i32,
        enemy: Position,
    ) -> Position {
        let mut best_pos = position;
        let mut best_dist = Self::distance(position, enemy);
        for dr in -movement_range..=movement_range {
            for dc in -movement_range..=movement_range {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let candidate = Position::new(position.row + dr, position.col + dc);
                if !self.is_position_free(candidate, size, side) {
                    continue;
                }
                let dist = Self::distance(candidate, enemy);
                if dist > best_dist || (dist == best_dist && candidate < best_pos) {
                    best_dist = dist;
                    best_pos = candidate;
                }
            }
        }
        best_pos
    }

    /// Deterministic spawn anchor: seeded column, side-pinned row.
    ///
    /// Side A holds the top edge (row 0 for multi-row footprints, row 1
    /// otherwise), side B anchors flush against the bottom edge.
    pub fn starting_position(&self, side: Side, size: Size, seed: u64) -> Position {
        let max_col = BOARD_WIDTH - size.cols;
        let col_f = seeded_random((seed & 0xFFFF_FFFF) as u32, 0.0, max_col as f64 + 0.999);
        let col = (col_f as i32).clamp(0, max_col);
        let row = match side {
            Side::A => {
                if size.rows >= 2 {
                    0
                } else {
                    1.min(BOARD_HEIGHT - size.rows)
                }
            }
            Side::B => BOARD_HEIGHT - size.rows,
        };
        Position::new(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_validation() {
        let grid = Grid::new();
        assert!(grid.is_valid_position(Position::new(0, 0), Size::new(1, 1)));
        assert!(grid.is_valid_position(Position::new(6, 6), Size::new(2, 2)));
        assert!(!grid.is_valid_position(Position::new(7, 7), Size::new(2, 2)));
        assert!(!grid.is_valid_position(Position::new(-1, 0), Size::new(1, 1)));
        assert!(!grid.is_valid_position(Position::new(0, 7), Size::new(1, 2)));
    }

    #[test]
    fn occupied_cells_cover_footprint() {
        let cells = Grid::occupied_cells(Position::new(2, 3), Size::new(2, 2));
        assert_eq!(
            cells,
            vec![
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(3, 3),
                Position::new(3, 4),
            ]
        );
    }

    #[test]
    fn placement_rejects_overlap() {
        let mut grid = Grid::new();
        grid.place(Side::A, Position::new(0, 0), Size::new(2, 2)).unwrap();
        let err = grid
            .place(Side::B, Position::new(1, 1), Size::new(1, 1))
            .unwrap_err();
        assert_eq!(err, GridError::Occupied(1, 1));
        // Re-placing a side over its own cells is allowed.
        grid.place(Side::A, Position::new(0, 0), Size::new(2, 2)).unwrap();
    }

    #[test]
    fn placement_rejects_out_of_bounds() {
        let mut grid = Grid::new();
        assert!(grid
            .place(Side::A, Position::new(7, 0), Size::new(2, 1))
            .is_err());
    }

    #[test]
    fn move_creature_validates_range() {
        let mut grid = Grid::new();
        grid.place(Side::A, Position::new(0, 0), Size::new(1, 1)).unwrap();
        let err = grid
            .move_creature(Side::A, Position::new(0, 0), Size::new(1, 1), Position::new(4, 4), 2)
            .unwrap_err();
        assert!(matches!(err, GridError::OutOfRange { distance: 4, .. }));
        grid.move_creature(Side::A, Position::new(0, 0), Size::new(1, 1), Position::new(2, 2), 2)
            .unwrap();
    }

    #[test]
    fn chebyshev_distance() {
        assert_eq!(Grid::distance(Position::new(0, 0), Position::new(3, 1)), 3);
        assert_eq!(Grid::distance(Position::new(2, 2), Position::new(2, 2)), 0);
        assert_eq!(Grid::distance(Position::new(5, 1), Position::new(1, 7)), 6);
    }

    #[test]
    fn footprint_adjacency() {
        // 2x2 at (1,3) vs 2x2 at (2,1): (2,3) and (2,2) touch.
        assert!(Grid::footprints_adjacent(
            Position::new(1, 3),
            Size::new(2, 2),
            Position::new(2, 1),
            Size::new(2, 2),
        ));
        assert!(!Grid::footprints_adjacent(
            Position::new(0, 0),
            Size::new(1, 1),
            Position::new(0, 2),
            Size::new(1, 1),
        ));
    }

    // Pathing baselines from the reference implementation.
    #[test]
    fn path_toward_prefers_smallest_tied_anchor() {
        let mut grid = Grid::new();
        grid.place(Side::A, Position::new(4, 4), Size::new(1, 1)).unwrap();
        let step = grid.path_toward(Side::A, Position::new(4, 4), Size::new(1, 1), 2, Position::new(0, 0));
        assert_eq!(step, Position::new(2, 2));

        // Equidistant candidates resolve lexicographically.
        let step = grid.path_toward(Side::A, Position::new(4, 4), Size::new(1, 1), 2, Position::new(4, 0));
        assert_eq!(step, Position::new(2, 2));
    }

    #[test]
    fn path_toward_skips_occupied_cells() {
        let mut grid = Grid::new();
        grid.place(Side::A, Position::new(4, 4), Size::new(1, 1)).unwrap();
        grid.place(Side::B, Position::new(2, 2), Size::new(1, 1)).unwrap();
        let step = grid.path_toward(Side::A, Position::new(4, 4), Size::new(1, 1), 2, Position::new(0, 0));
        assert_eq!(step, Position::new(2, 3));
    }

    #[test]
    fn path_away_maximizes_distance() {
        let mut grid = Grid::new();
        grid.place(Side::A, Position::new(4, 4), Size::new(1, 1)).unwrap();
        let step = grid.path_away(Side::A, Position::new(4, 4), Size::new(1, 1), 2, Position::new(0, 0));
        assert_eq!(step, Position::new(2, 6));
    }

    #[test]
    fn path_stays_put_when_already_at_target() {
        let mut grid = Grid::new();
        grid.place(Side::A, Position::new(4, 4), Size::new(1, 1)).unwrap();
        let step = grid.path_toward(Side::A, Position::new(4, 4), Size::new(1, 1), 2, Position::new(4, 4));
        assert_eq!(step, Position::new(4, 4));
    }

    // Spawn baselines from the reference implementation.
    #[test]
    fn starting_positions_pin_rows_by_side() {
        let grid = Grid::new();
        assert_eq!(
            grid.starting_position(Side::A, Size::new(1, 1), 42),
            Position::new(1, 5)
        );
        assert_eq!(
            grid.starting_position(Side::A, Size::new(2, 1), 42),
            Position::new(0, 5)
        );
        assert_eq!(
            grid.starting_position(Side::A, Size::new(2, 2), 42),
            Position::new(0, 4)
        );
        assert_eq!(
            grid.starting_position(Side::A, Size::new(3, 2), 42),
            Position::new(0, 4)
        );
        assert_eq!(
            grid.starting_position(Side::B, Size::new(1, 1), 42),
            Position::new(7, 5)
        );
        assert_eq!(
            grid.starting_position(Side::B, Size::new(2, 2), 42),
            Position::new(6, 4)
        );
        assert_eq!(
            grid.starting_position(Side::B, Size::new(3, 2), 42),
            Position::new(5, 4)
        );
    }

    #[test]
    fn starting_columns_follow_seed() {
        let grid = Grid::new();
        assert_eq!(
            grid.starting_position(Side::A, Size::new(1, 1), 7),
            Position::new(1, 0)
        );
        assert_eq!(
            grid.starting_position(Side::B, Size::new(3, 2), 123_456_789),
            Position::new(5, 5)
        );
    }
}
