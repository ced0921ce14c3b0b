/// Module grid storage and finder-eye masking.
///
/// A [`ModuleGrid`] is the boolean matrix an external QR encoder produces:
/// `true` for dark modules, `false` for light ones. The grid convention
/// includes the symbol's one-module quiet ring, so a version-1 symbol
/// (21×21 modules) arrives as a 23×23 grid. Grids are immutable; the eye
/// mask needed by path generation is a derived copy, never an in-place edit.
use thiserror::Error;

/// Modules covered by one finder-eye bounding box, measured from the grid
/// corner: 1 quiet-ring module + the 7×7 finder pattern + 1 separator module.
pub const EYE_SPAN: usize = 9;

/// Error type for module grid construction from externally supplied bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The flat bit vector does not hold `dimension * dimension` modules.
    #[error("expected {expected} modules for a {dimension}x{dimension} grid, got {found}")]
    SizeMismatch {
        dimension: usize,
        expected: usize,
        found: usize,
    },
    /// A row's length differs from the number of rows.
    #[error("row {row} has {found} modules, expected {expected} for a square grid")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// An immutable n×n matrix of boolean modules.
///
/// # Creation
///
/// - From an encoder's flat output: [`ModuleGrid::from_bits`].
/// - From row vectors: [`ModuleGrid::from_rows`].
/// - Programmatically: [`ModuleGrid::from_fn`].
///
/// # Example
///
/// ```rust
/// use qrpath::grid::ModuleGrid;
///
/// let grid = ModuleGrid::from_fn(5, |row, col| row == col);
/// assert_eq!(grid.value_at(2, 2), true);
/// assert_eq!(grid.value_at(2, 3), false);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleGrid {
    dimension: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Creates a grid from a flat row-major bit vector.
    ///
    /// # Arguments
    ///
    /// * `dimension` - The side length of the square grid.
    /// * `modules` - Row-major module values, `dimension * dimension` of them.
    ///
    /// # Returns
    ///
    /// A `Result` containing the grid, or [`GridError::SizeMismatch`] if the
    /// vector length does not match the dimension.
    pub fn from_bits(dimension: usize, modules: Vec<bool>) -> Result<Self, GridError> {
        let expected = dimension * dimension;
        if modules.len() != expected {
            return Err(GridError::SizeMismatch {
                dimension,
                expected,
                found: modules.len(),
            });
        }
        Ok(Self { dimension, modules })
    }

    /// Creates a grid from row vectors, checking that the matrix is square.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, GridError> {
        let dimension = rows.len();
        let mut modules = Vec::with_capacity(dimension * dimension);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != dimension {
                return Err(GridError::NotSquare {
                    row,
                    expected: dimension,
                    found: cells.len(),
                });
            }
            modules.extend_from_slice(cells);
        }
        Ok(Self { dimension, modules })
    }

    /// Creates a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(dimension: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut modules = Vec::with_capacity(dimension * dimension);
        for row in 0..dimension {
            for col in 0..dimension {
                modules.push(f(row, col));
            }
        }
        Self { dimension, modules }
    }

    /// Returns the side length of the grid in modules.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the module at the given coordinates.
    ///
    /// Bounds are a caller contract: `row` and `col` must be in
    /// `[0, dimension)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range.
    pub fn value_at(&self, row: usize, col: usize) -> bool {
        assert!(
            row < self.dimension && col < self.dimension,
            "module coordinates out of range"
        );
        self.modules[row * self.dimension + col]
    }

    /// Returns `true` if the cell lies inside one of the three finder-eye
    /// bounding boxes (top-left, top-right, bottom-left corners).
    pub fn is_eye_region(&self, row: usize, col: usize) -> bool {
        let span = EYE_SPAN.min(self.dimension);
        if row < span {
            if col < span {
                return true;
            }
            if col >= self.dimension - span {
                return true;
            }
        } else if row >= self.dimension - span && col < span {
            return true;
        }
        false
    }

    /// Returns a copy of the grid with every finder-eye cell forced to
    /// `invert`; all other cells pass through unchanged.
    ///
    /// Path generation uses this so the eyes are never drawn by ordinary
    /// module passes: `invert = false` removes them from the dark pass, and
    /// `invert = true` makes them uniformly dark so the light pass skips them
    /// as well. The source grid is not modified.
    pub fn masked(&self, invert: bool) -> ModuleGrid {
        ModuleGrid::from_fn(self.dimension, |row, col| {
            if self.is_eye_region(row, col) {
                invert
            } else {
                self.value_at(row, col)
            }
        })
    }
}
