//! Rigid occupancy matrix
//!
//! Every cell counts the rigid occupants (border walls, platform tiles, the
//! perk tile) currently claiming it. It is the single collision oracle.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::error::{GameError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigidMatrix {
    columns: i32,
    lines: i32,
    cells: Vec<u8>,
}

impl RigidMatrix {
    /// Create a matrix with the border walls already occupied
    pub fn new(columns: i32, lines: i32) -> Self {
        let size = (columns.max(0) * lines.max(0)) as usize;
        let mut matrix = Self {
            columns,
            lines,
            cells: vec![0; size],
        };
        for x in 0..columns {
            for y in 0..lines {
                if matrix.is_border(IVec2::new(x, y)) {
                    matrix.cells[(y * columns + x) as usize] = 1;
                }
            }
        }
        matrix
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn lines(&self) -> i32 {
        self.lines
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.columns || y >= self.lines {
            None
        } else {
            Some((y * self.columns + x) as usize)
        }
    }

    /// Cell count; cells outside the grid read as occupied
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(1, |i| self.cells[i])
    }

    pub fn is_solid(&self, cell: IVec2) -> bool {
        self.get(cell.x, cell.y) >= 1
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        self.index(cell.x, cell.y).is_some()
    }

    /// First or last row or column
    pub fn is_border(&self, cell: IVec2) -> bool {
        self.contains(cell)
            && (cell.x == 0
                || cell.y == 0
                || cell.x == self.columns - 1
                || cell.y == self.lines - 1)
    }

    /// Walls stop shoves: border cells and anything outside the grid
    pub fn is_wall(&self, cell: IVec2) -> bool {
        !self.contains(cell) || self.is_border(cell)
    }

    /// Add a signed delta to one cell. Cells outside the grid are clipped.
    pub fn modify_point(&mut self, x: i32, y: i32, delta: i32) -> Result<()> {
        let Some(i) = self.index(x, y) else {
            return Ok(());
        };
        let value = i32::from(self.cells[i]) + delta;
        if value < 0 {
            return Err(GameError::MatrixUnderflow { x, y });
        }
        self.cells[i] = u8::try_from(value).map_err(|_| GameError::MatrixOverflow { x, y })?;
        Ok(())
    }

    /// Apply a delta to every cell of the platform's current footprint
    pub fn modify_platform(&mut self, platform: &Platform, delta: i32) -> Result<()> {
        for cell in platform.cells() {
            self.modify_point(cell.x, cell.y, delta)?;
        }
        Ok(())
    }

    /// Number of border cells, each counted once
    pub fn border_count(&self) -> u64 {
        if self.columns < 2 || self.lines < 2 {
            return (self.columns.max(0) * self.lines.max(0)) as u64;
        }
        (2 * self.columns + 2 * self.lines - 4) as u64
    }

    /// Sum of all cell counts
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borders_are_occupied() {
        let matrix = RigidMatrix::new(20, 10);
        assert_eq!(matrix.get(0, 0), 1);
        assert_eq!(matrix.get(19, 5), 1);
        assert_eq!(matrix.get(7, 9), 1);
        assert_eq!(matrix.get(7, 0), 1);
        assert_eq!(matrix.get(1, 1), 0);
        assert_eq!(matrix.get(18, 8), 0);
        assert_eq!(matrix.total(), matrix.border_count());
        assert_eq!(matrix.border_count(), 56);
    }

    #[test]
    fn test_outside_reads_as_occupied() {
        let matrix = RigidMatrix::new(20, 10);
        assert!(matrix.is_solid(IVec2::new(-1, 4)));
        assert!(matrix.is_solid(IVec2::new(20, 4)));
        assert!(matrix.is_solid(IVec2::new(4, 10)));
        assert!(matrix.is_wall(IVec2::new(20, 4)));
        assert!(matrix.is_wall(IVec2::new(0, 4)));
        assert!(!matrix.is_wall(IVec2::new(1, 4)));
    }

    #[test]
    fn test_modify_point_rejects_underflow() {
        let mut matrix = RigidMatrix::new(20, 10);
        matrix.modify_point(3, 3, 2).expect("increment");
        assert_eq!(matrix.get(3, 3), 2);
        matrix.modify_point(3, 3, -2).expect("decrement");
        assert_eq!(matrix.get(3, 3), 0);
        assert!(matches!(
            matrix.modify_point(3, 3, -1),
            Err(GameError::MatrixUnderflow { x: 3, y: 3 })
        ));
        assert_eq!(matrix.get(3, 3), 0);
    }

    #[test]
    fn test_modify_point_rejects_overflow() {
        let mut matrix = RigidMatrix::new(20, 10);
        matrix.modify_point(3, 3, 255).expect("fill");
        assert!(matches!(
            matrix.modify_point(3, 3, 1),
            Err(GameError::MatrixOverflow { .. })
        ));
    }

    #[test]
    fn test_modify_outside_is_clipped() {
        let mut matrix = RigidMatrix::new(20, 10);
        let before = matrix.total();
        matrix.modify_point(25, 3, 1).expect("clipped");
        matrix.modify_point(-1, 3, -1).expect("clipped");
        assert_eq!(matrix.total(), before);
    }

    #[test]
    fn test_modify_platform_pairs_cancel() {
        let mut matrix = RigidMatrix::new(20, 10);
        let platform = Platform::new(4, 5, 3, 0, 0);
        matrix.modify_platform(&platform, 1).expect("occupy");
        assert_eq!(matrix.get(3, 5), 0);
        assert_eq!(matrix.get(4, 5), 1);
        assert_eq!(matrix.get(6, 5), 1);
        assert_eq!(matrix.get(7, 5), 0);
        assert_eq!(matrix.total(), matrix.border_count() + 3);

        matrix.modify_platform(&platform, -1).expect("vacate");
        assert_eq!(matrix.total(), matrix.border_count());
    }
}
