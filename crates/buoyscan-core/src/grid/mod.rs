//! Dense row-major 2-D grids
//!
//! Images, masks and relevance maps all share the same storage so that
//! dimension checks and pixel addressing behave identically across stages.

pub mod hsv;

pub use hsv::Hsv;

use crate::error::{Result, ScanError};
use std::ops::Index;

/// Upper bound of a relevance map (the floor is 0)
pub const RELEVANCE_CEILING: u8 = u8::MAX;

/// Query or training image in HSV space
pub type HsvImage = Grid<Hsv>;

/// Boolean object/background mask
pub type Mask = Grid<bool>;

/// Single-channel relevance scores in `0..=RELEVANCE_CEILING`
pub type RelevanceMap = Grid<u8>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap row-major data, checking that it covers `width * height` cells
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(ScanError::InvalidConfig(format!(
                "grid of {}x{} needs {} cells, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(self.offset(x, y))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut T> {
        if x < self.width && y < self.height {
            let offset = self.offset(x, y);
            self.data.get_mut(offset)
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Apply `f` to every cell, keeping the dimensions
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Fail with `DimensionMismatch` unless `other` has the same width and height
    pub fn ensure_same_size<U>(&self, other: &Grid<U>) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(ScanError::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl<T> Index<(u32, u32)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (u32, u32)) -> &T {
        &self.data[self.offset(x, y)]
    }
}

impl Grid<bool> {
    /// Number of cells marked as object
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&set| set).count()
    }

    /// Fraction of cells marked as object (0.0 for an empty grid)
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            0.0
        } else {
            self.count_set() as f64 / self.data.len() as f64
        }
    }

    /// View the mask as a relevance map (object at the ceiling, background at 0)
    pub fn to_relevance(&self) -> Grid<u8> {
        self.map(|&set| if set { RELEVANCE_CEILING } else { 0 })
    }
}
