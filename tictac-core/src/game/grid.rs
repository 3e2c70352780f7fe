//! The 3x3 playing grid

use core::fmt;

use heapless::Vec;

use crate::config::PointerTarget;
use crate::motion::Position;
use crate::storage::Lane;

/// Grid rows and columns
pub const GRID_SIZE: u8 = 3;

/// Number of grid cells
pub const GRID_CELLS: usize = 9;

/// Content of a grid cell or lane slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cell {
    #[default]
    Empty,
    Player,
    Robot,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Owner of the brick in this cell
    pub fn side(&self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Player => Some(Side::Player),
            Cell::Robot => Some(Side::Robot),
        }
    }
}

/// One of the two opponents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Player,
    Robot,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Player => Side::Robot,
            Side::Robot => Side::Player,
        }
    }

    /// Grid content for a brick of this side
    pub fn cell(&self) -> Cell {
        match self {
            Side::Player => Cell::Player,
            Side::Robot => Cell::Robot,
        }
    }

    /// Storage lane holding this side's bricks
    pub fn lane(&self) -> Lane {
        match self {
            Side::Player => Lane::Player,
            Side::Robot => Lane::Robot,
        }
    }

    /// Pointer target aimed at this side
    pub fn pointer(&self) -> PointerTarget {
        match self {
            Side::Player => PointerTarget::Player,
            Side::Robot => PointerTarget::Robot,
        }
    }
}

/// A cell of the playing grid, row 0 is the far side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridCell {
    pub row: u8,
    pub col: u8,
}

impl GridCell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Board position of this grid cell
    ///
    /// The grid sits one line and one column in from the board corner.
    pub fn board_position(&self) -> Position {
        Position::new(self.row + 1, self.col + 1)
    }

    /// All grid cells in row-major order
    pub fn all() -> impl Iterator<Item = GridCell> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| GridCell::new(row, col)))
    }
}

/// Tried to place a brick on an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellOccupied(pub GridCell);

impl fmt::Display for CellOccupied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell ({}, {}) is already occupied", self.0.row, self.0.col)
    }
}

/// Winning lines: rows, columns, then both diagonals
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

/// Playing grid
///
/// Cells only ever go from empty to occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Grid {
    cells: [[Cell; 3]; 3],
}

impl Grid {
    pub const fn new() -> Self {
        Self {
            cells: [[Cell::Empty; 3]; 3],
        }
    }

    pub const fn from_cells(cells: [[Cell; 3]; 3]) -> Self {
        Self { cells }
    }

    pub fn get(&self, cell: GridCell) -> Cell {
        self.cells[cell.row as usize][cell.col as usize]
    }

    /// Mark a cell as taken by `side`
    pub fn place(&mut self, cell: GridCell, side: Side) -> Result<(), CellOccupied> {
        let slot = &mut self.cells[cell.row as usize][cell.col as usize];
        if !slot.is_empty() {
            return Err(CellOccupied(cell));
        }
        *slot = side.cell();
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<GridCell, GRID_CELLS> {
        GridCell::all().filter(|&cell| self.get(cell).is_empty()).collect()
    }

    /// Occupied cells in row-major order
    pub fn occupied_cells(&self) -> Vec<GridCell, GRID_CELLS> {
        GridCell::all().filter(|&cell| !self.get(cell).is_empty()).collect()
    }

    /// Side owning a complete line, if any
    pub fn winner(&self) -> Option<Side> {
        LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
            if a == b && b == c {
                a.side()
            } else {
                None
            }
        })
    }
}

/// Check for three equal, non-empty cells in a row, column or diagonal
pub fn victory(grid: &Grid) -> bool {
    grid.winner().is_some()
}
