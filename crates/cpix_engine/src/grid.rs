//! Persistent cell grid.
//!
//! Rows are reference counted and shared between snapshots. A write copies
//! only the rows it changes, so an unchanged row keeps its identity across
//! snapshots and the diff can skip it by pointer comparison.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Cpix, EngineError, Result};

type Row = Arc<Vec<Cpix>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Arc<Vec<Row>>,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(0, 0)
    }
}

impl Grid {
    /// All cells empty. The zero row is shared until written.
    pub fn new(width: usize, height: usize) -> Self {
        let row: Row = Arc::new(vec![Cpix::EMPTY; width]);
        Self {
            width,
            height,
            rows: Arc::new(vec![row; height]),
        }
    }

    /// # Errors
    ///
    /// [`EngineError::GeometryMismatch`] if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Cpix>>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(EngineError::geometry(format!("row {y} has {} cells, expected {width}", row.len())));
        }
        Ok(Self {
            width,
            height: rows.len(),
            rows: Arc::new(rows.into_iter().map(Arc::new).collect()),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cpix> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn row(&self, y: usize) -> &[Cpix] {
        &self.rows[y]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cpix]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cpix)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, cpix)| (x, y, *cpix)))
    }

    pub fn to_rows(&self) -> Vec<Vec<Cpix>> {
        self.rows.iter().map(|row| row.to_vec()).collect()
    }

    /// True if both grids are the same snapshot.
    pub fn ptr_eq(&self, other: &Grid) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }

    /// True if row `y` is shared between both grids.
    pub fn row_ptr_eq(&self, other: &Grid, y: usize) -> bool {
        match (self.rows.get(y), other.rows.get(y)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// New grid of the given size holding the overlapping top-left content.
    /// Rows that keep their width are shared with `self`.
    ///
    /// # Errors
    ///
    /// [`EngineError::GeometryMismatch`] if a source row doesn't match the grid width.
    pub fn resize(&self, width: usize, height: usize) -> Result<Grid> {
        let copy_width = self.width.min(width);
        let mut rows = Vec::with_capacity(height);
        for y in 0..height {
            let Some(old) = self.rows.get(y) else {
                break;
            };
            if old.len() != self.width {
                return Err(EngineError::geometry(format!(
                    "row {y} has {} cells, grid width is {}",
                    old.len(),
                    self.width
                )));
            }
            if width == self.width {
                rows.push(old.clone());
            } else {
                let mut row = vec![Cpix::EMPTY; width];
                row[..copy_width].copy_from_slice(&old[..copy_width]);
                rows.push(Arc::new(row));
            }
        }
        if rows.len() < height {
            let empty: Row = Arc::new(vec![Cpix::EMPTY; width]);
            rows.resize(height, empty);
        }
        Ok(Grid {
            width,
            height,
            rows: Arc::new(rows),
        })
    }

    /// Writes `patch` with its top-left cell at `(x0, y0)`.
    ///
    /// `resolve` maps the current cell and the patch cell to the new value.
    /// Cells outside the grid are skipped. Only rows with a changed cell are
    /// copied; if nothing changes the returned grid is `self`.
    ///
    /// # Errors
    ///
    /// Propagates the first error of `resolve`; `self` is never touched.
    pub fn write_region<P, F>(&self, x0: i32, y0: i32, patch: &[Vec<P>], mut resolve: F) -> Result<Grid>
    where
        F: FnMut(Cpix, &P) -> Result<Cpix>,
    {
        let mut next = self.clone();
        let mut changed = false;
        let rows = Arc::make_mut(&mut next.rows);

        for (py, patch_row) in patch.iter().enumerate() {
            let y = y0 as i64 + py as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            let y = y as usize;
            for (px, cell) in patch_row.iter().enumerate() {
                let x = x0 as i64 + px as i64;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                let x = x as usize;
                let current = rows[y][x];
                let value = resolve(current, cell)?;
                if value != current {
                    Arc::make_mut(&mut rows[y])[x] = value;
                    changed = true;
                }
            }
        }

        Ok(if changed { next } else { self.clone() })
    }

    /// Applies `f` to every cell, copying only rows that change.
    /// Returns the new grid and the number of changed cells.
    pub fn map_cells<F>(&self, mut f: F) -> (Grid, usize)
    where
        F: FnMut(Cpix) -> Cpix,
    {
        let mut next = self.clone();
        let mut count = 0;
        let rows = Arc::make_mut(&mut next.rows);
        for row in rows.iter_mut() {
            for x in 0..row.len() {
                let value = f(row[x]);
                if value != row[x] {
                    Arc::make_mut(row)[x] = value;
                    count += 1;
                }
            }
        }
        if count == 0 { (self.clone(), 0) } else { (next, count) }
    }

    /// Copies a rectangle clipped to the grid.
    pub fn copy_region(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<Vec<Cpix>> {
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        if x >= x_end || y >= y_end {
            return Vec::new();
        }
        (y..y_end).map(|y| self.rows[y][x..x_end].to_vec()).collect()
    }

    pub fn flipped_horizontal(&self) -> Grid {
        let rows = self
            .rows
            .iter()
            .map(|row| Arc::new(row.iter().rev().copied().collect::<Vec<_>>()))
            .collect();
        Grid {
            width: self.width,
            height: self.height,
            rows: Arc::new(rows),
        }
    }

    pub fn flipped_vertical(&self) -> Grid {
        Grid {
            width: self.width,
            height: self.height,
            rows: Arc::new(self.rows.iter().rev().cloned().collect()),
        }
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|row| row.as_slice()))
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<Cpix>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
