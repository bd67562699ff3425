//! Grid map loading and solidity queries.
//!
//! Cells are indexed `[y][x]`. Anything outside the grid is solid, so rays and
//! the player are always stopped at the map edge.
use std::fs;
use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::math::{Segment, Vec2};

pub const OPEN: u8 = 0;
pub const SOLID: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    cell_size: f64,
    width: usize,
    cells: Vec<Vec<u8>>,
}

fn check_cell_size(cell_size: f64) -> Result<()> {
    if cell_size > 0.0 && cell_size.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidCellSize(cell_size))
    }
}

impl GridMap {
    /// Builds a map from raw 0/1 rows. Rows must all have the same length.
    pub fn from_rows(cell_size: f64, cells: Vec<Vec<u8>>) -> Result<Self> {
        check_cell_size(cell_size)?;
        let width = cells.first().map(|r| r.len()).unwrap_or(0);
        for (row, r) in cells.iter().enumerate() {
            if r.len() != width {
                return Err(Error::RaggedMap {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            if let Some((col, &value)) = r.iter().enumerate().find(|&(_, &v)| v > SOLID) {
                return Err(Error::InvalidCell { row, col, value });
            }
        }
        Ok(Self {
            cell_size,
            width,
            cells,
        })
    }

    /// Parses a text maze. `' '`, `'.'`, `'0'` and tabs are open, every other
    /// character is a wall. Blank lines are skipped and short rows are padded
    /// with wall cells.
    pub fn parse(cell_size: f64, text: &str) -> Result<Self> {
        check_cell_size(cell_size)?;
        let mut grid: Vec<Vec<u8>> = Vec::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .chars()
                .map(|ch| match ch {
                    ' ' | '.' | '0' | '\t' => OPEN,
                    _ => SOLID,
                })
                .collect();
            grid.push(row);
        }

        let maxw = grid.iter().map(|r| r.len()).max().unwrap_or(0);
        for r in &mut grid {
            r.resize(maxw, SOLID);
        }
        Self::from_rows(cell_size, grid)
    }

    pub fn load(path: impl AsRef<Path>, cell_size: f64) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::parse(cell_size, &text)?;
        info!(
            path = %path.display(),
            width = map.width(),
            height = map.height(),
            "map loaded"
        );
        Ok(map)
    }

    /// Random map with a solid border. Cell (1,1), the spawn, and its right
    /// neighbour always stay open.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        cell_size: f64,
        density: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let mut cells = vec![vec![SOLID; width]; height];
        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                let spawn = y == 1 && (x == 1 || x == 2);
                if !border && (spawn || !rng.gen_bool(density)) {
                    *cell = OPEN;
                }
            }
        }
        Self::from_rows(cell_size, cells)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Out-of-bounds cells are solid.
    pub fn is_solid(&self, cx: i64, cy: i64) -> bool {
        if cx < 0 || cy < 0 {
            return true;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        match self.cells.get(cy).and_then(|row| row.get(cx)) {
            Some(&c) => c == SOLID,
            None => true,
        }
    }

    #[inline]
    pub fn cell_of(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        let (cx, cy) = self.cell_of(p);
        self.is_solid(cx, cy)
    }

    pub fn cell_center(&self, cx: i64, cy: i64) -> Vec2 {
        Vec2::new(
            (cx as f64 + 0.5) * self.cell_size,
            (cy as f64 + 0.5) * self.cell_size,
        )
    }

    /// Every edge between an open cell and a solid (or out-of-bounds)
    /// neighbour, row-major. Used both for top-down drawing and collision.
    pub fn boundary_edges(&self) -> Vec<Segment> {
        let s = self.cell_size;
        let mut edges = Vec::new();
        for cy in 0..self.height() as i64 {
            for cx in 0..self.width as i64 {
                if self.is_solid(cx, cy) {
                    continue;
                }
                let x0 = cx as f64 * s;
                let y0 = cy as f64 * s;
                let (x1, y1) = (x0 + s, y0 + s);
                if self.is_solid(cx, cy - 1) {
                    edges.push(Segment::new(Vec2::new(x0, y0), Vec2::new(x1, y0)));
                }
                if self.is_solid(cx + 1, cy) {
                    edges.push(Segment::new(Vec2::new(x1, y0), Vec2::new(x1, y1)));
                }
                if self.is_solid(cx, cy + 1) {
                    edges.push(Segment::new(Vec2::new(x0, y1), Vec2::new(x1, y1)));
                }
                if self.is_solid(cx - 1, cy) {
                    edges.push(Segment::new(Vec2::new(x0, y0), Vec2::new(x0, y1)));
                }
            }
        }
        edges
    }
}
