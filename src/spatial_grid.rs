/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It buckets agent indices into uniform square cells keyed by
 * floor(position / cell_size), so a neighbor query only has to visit the
 * handful of cells around an agent instead of the whole population.
 *
 * The grid never owns agents: buckets hold indices into the simulation's
 * agent vector. It is rebuilt from scratch every tick, never patched.
 */

use std::collections::HashMap;

use nannou::prelude::*;

pub type Cell = (i32, i32);

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialGrid {
    pub cell_size: f32,
    buckets: HashMap<Cell, Vec<usize>>,
    len: usize,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    // Bucket every position by its cell. Index `i` in the result refers to
    // `positions[i]`.
    pub fn build<I>(positions: I, cell_size: f32) -> Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut grid = Self::new(cell_size);
        for (i, position) in positions.into_iter().enumerate() {
            grid.insert(i, position);
        }
        grid
    }

    // Convert world coordinates to a cell coordinate
    #[inline]
    pub fn cell_of(&self, position: Vec2) -> Cell {
        // Out-of-world positions still land in a (possibly sparse) cell
        let grid_x = (position.x / self.cell_size).floor() as i32;
        let grid_y = (position.y / self.cell_size).floor() as i32;
        (grid_x, grid_y)
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
        self.len = 0;
    }

    // Insert an agent index into the grid
    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec2) {
        let cell = self.cell_of(position);
        self.buckets.entry(cell).or_default().push(index);
        self.len += 1;
    }

    // Union of the buckets in the `(2r + 1)²` window centred on `cell`.
    // Order is bucket-insertion order, scanning the window column by column.
    pub fn query(&self, cell: Cell, radius_in_cells: i32) -> Vec<usize> {
        let (grid_x, grid_y) = cell;
        let mut result = Vec::new();

        for dx in -radius_in_cells..=radius_in_cells {
            for dy in -radius_in_cells..=radius_in_cells {
                if let Some(bucket) = self.buckets.get(&(grid_x.saturating_add(dx), grid_y.saturating_add(dy))) {
                    result.extend_from_slice(bucket);
                }
            }
        }

        result
    }

    // Indices in the window around the cell containing `position`
    #[inline]
    pub fn neighbors(&self, position: Vec2, radius_in_cells: i32) -> Vec<usize> {
        self.query(self.cell_of(position), radius_in_cells)
    }

    pub fn bucket(&self, cell: Cell) -> &[usize] {
        self.buckets.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    // Number of agents inserted since the last clear
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.buckets.values().filter(|bucket| !bucket.is_empty()).count()
    }
}
