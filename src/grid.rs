//! Uniform spatial partition grid for neighbor queries.

use glam::Vec2;

/// The eight compass directions, in precomputed-neighbor order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North = 0,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];
}

/// One partition cell: bounds, precomputed neighbors and current members
#[derive(Debug, Clone)]
pub struct Cell {
    /// Row-major cell id
    pub id: usize,
    /// Top-left corner in world units
    pub min: Vec2,
    /// Cell width and height in world units
    pub extent: Vec2,
    /// Compass neighbors, `None` where the neighbor falls outside the grid
    pub neighbors: [Option<usize>; 8],
    /// Store indices of entities currently in this cell
    pub members: Vec<usize>,
}

impl Cell {
    #[inline]
    pub fn neighbor(&self, dir: Compass) -> Option<usize> {
        self.neighbors[dir as usize]
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.extent * 0.5
    }
}

/// Uniform grid over the simulation area.
///
/// Maps positions to row-major cell ids; positions outside the bounds map
/// to no cell at all. Member lists are cleared and rebuilt once per tick,
/// so a cell's contents reflect the start of the tick during interaction
/// resolution. Neighbor ids are precomputed at construction but the
/// interaction pass only ever consults an entity's own cell; widening the
/// scan to neighbors changes interaction resolution and is not a drop-in
/// optimization.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    width: f32,
    height: f32,
    grid_width: usize,
    grid_height: usize,
    cells: Vec<Cell>,
}

/// Row-major cell id for a position, `None` when outside the bounds
fn locate(width: f32, height: f32, grid_width: usize, grid_height: usize, x: f32, y: f32) -> Option<usize> {
    if x < 0.0 || y < 0.0 || x >= width || y >= height {
        return None;
    }
    let col = ((x / width) * grid_width as f32) as usize;
    let row = ((y / height) * grid_height as f32) as usize;
    Some(row * grid_width + col)
}

impl SpatialIndex {
    /// Create the grid and precompute every cell's compass neighbors
    pub fn new(width: f32, height: f32, grid_width: usize, grid_height: usize) -> Self {
        let extent = Vec2::new(width / grid_width as f32, height / grid_height as f32);
        let probe = |x: f32, y: f32| locate(width, height, grid_width, grid_height, x, y);

        let mut cells = Vec::with_capacity(grid_width * grid_height);
        for row in 0..grid_height {
            for col in 0..grid_width {
                let min = Vec2::new(col as f32 * extent.x, row as f32 * extent.y);
                let c = min + extent * 0.5;
                let neighbors = [
                    probe(c.x, c.y - extent.y),
                    probe(c.x + extent.x, c.y - extent.y),
                    probe(c.x + extent.x, c.y),
                    probe(c.x + extent.x, c.y + extent.y),
                    probe(c.x, c.y + extent.y),
                    probe(c.x - extent.x, c.y + extent.y),
                    probe(c.x - extent.x, c.y),
                    probe(c.x - extent.x, c.y - extent.y),
                ];
                cells.push(Cell {
                    id: cells.len(),
                    min,
                    extent,
                    neighbors,
                    members: Vec::new(),
                });
            }
        }

        Self {
            width,
            height,
            grid_width,
            grid_height,
            cells,
        }
    }

    /// Cell id containing (x, y), or `None` outside the bounds
    #[inline]
    pub fn cell_id(&self, x: f32, y: f32) -> Option<usize> {
        locate(self.width, self.height, self.grid_width, self.grid_height, x, y)
    }

    pub fn cell(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Clear all member lists
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.members.clear();
        }
    }

    /// Record an entity index in the given cell
    #[inline]
    pub fn insert(&mut self, cell_id: usize, entity_index: usize) {
        if let Some(cell) = self.cells.get_mut(cell_id) {
            cell.members.push(entity_index);
        }
    }

    /// Entity indices currently in a cell; empty for an unknown id
    #[inline]
    pub fn members(&self, cell_id: usize) -> &[usize] {
        match self.cells.get(cell_id) {
            Some(cell) => &cell.members,
            None => &[],
        }
    }

    /// Per-cell occupant counts, for grid-overlay debugging
    pub fn occupancy(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().map(|c| (c.id, c.members.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex {
        SpatialIndex::new(800.0, 600.0, 10, 8)
    }

    #[test]
    fn test_cell_id_row_major() {
        let index = index();
        assert_eq!(index.cell_id(0.0, 0.0), Some(0));
        assert_eq!(index.cell_id(799.0, 0.0), Some(9));
        assert_eq!(index.cell_id(0.0, 599.0), Some(70));
        assert_eq!(index.cell_id(799.0, 599.0), Some(79));
        // one cell is 80x75 world units
        assert_eq!(index.cell_id(85.0, 80.0), Some(11));
    }

    #[test]
    fn test_out_of_bounds_is_unindexed() {
        let index = index();
        assert_eq!(index.cell_id(-1.0, 10.0), None);
        assert_eq!(index.cell_id(10.0, -1.0), None);
        assert_eq!(index.cell_id(800.0, 10.0), None);
        assert_eq!(index.cell_id(10.0, 600.0), None);
    }

    #[test]
    fn test_cell_id_idempotent() {
        let index = index();
        for &(x, y) in &[(0.5, 0.5), (400.0, 300.0), (799.9, 599.9), (-3.0, 5.0)] {
            assert_eq!(index.cell_id(x, y), index.cell_id(x, y));
        }
    }

    #[test]
    fn test_corner_neighbors() {
        let index = index();
        let cell = index.cell(0).unwrap();
        assert_eq!(cell.neighbor(Compass::North), None);
        assert_eq!(cell.neighbor(Compass::NorthEast), None);
        assert_eq!(cell.neighbor(Compass::NorthWest), None);
        assert_eq!(cell.neighbor(Compass::West), None);
        assert_eq!(cell.neighbor(Compass::SouthWest), None);
        assert_eq!(cell.neighbor(Compass::East), Some(1));
        assert_eq!(cell.neighbor(Compass::South), Some(10));
        assert_eq!(cell.neighbor(Compass::SouthEast), Some(11));
    }

    #[test]
    fn test_interior_neighbors() {
        let index = index();
        let cell = index.cell(11).unwrap();
        assert_eq!(cell.neighbor(Compass::North), Some(1));
        assert_eq!(cell.neighbor(Compass::NorthEast), Some(2));
        assert_eq!(cell.neighbor(Compass::East), Some(12));
        assert_eq!(cell.neighbor(Compass::SouthEast), Some(22));
        assert_eq!(cell.neighbor(Compass::South), Some(21));
        assert_eq!(cell.neighbor(Compass::SouthWest), Some(20));
        assert_eq!(cell.neighbor(Compass::West), Some(10));
        assert_eq!(cell.neighbor(Compass::NorthWest), Some(0));
    }

    #[test]
    fn test_insert_members_clear() {
        let mut index = index();
        index.insert(5, 0);
        index.insert(5, 3);
        index.insert(6, 1);

        assert_eq!(index.members(5), &[0, 3]);
        assert_eq!(index.members(6), &[1]);
        assert!(index.members(9999).is_empty());

        index.clear();
        assert!(index.members(5).is_empty());
        assert!(index.members(6).is_empty());
    }

    #[test]
    fn test_occupancy_counts() {
        let mut index = index();
        index.insert(0, 7);
        index.insert(0, 8);

        let counts: Vec<(usize, usize)> = index.occupancy().collect();
        assert_eq!(counts.len(), 80);
        assert_eq!(counts[0], (0, 2));
        assert_eq!(counts[1], (1, 0));
    }
}
