//! The hex map: per-cell population, terrain, region and survey state.
//!
//! The map is owned and loaded elsewhere; the power engine only reads it
//! through [`HexGrid::cell_at`] and [`HexGrid::populated_cells`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CornerCoordinate, HexCoordinate};

/// Ground type of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Forest,
    Hills,
    Mountains,
    Desert,
    Water,
}

/// A single map cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCell {
    /// Population tier, 0 (empty) through 5 (metropolis).
    pub population: u8,
    pub terrain: Option<Terrain>,
    pub region_name: Option<String>,
    /// Set by the survey subsystem once the cell's resources are known.
    #[serde(default)]
    pub surveyed: bool,
}

impl MapCell {
    /// An empty cell in the given region.
    pub fn in_region(region: impl Into<String>) -> Self {
        Self {
            region_name: Some(region.into()),
            ..Self::default()
        }
    }

    /// Builder: set the population tier.
    pub fn with_population(mut self, tier: u8) -> Self {
        self.population = tier;
        self
    }

    /// Builder: set the terrain.
    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = Some(terrain);
        self
    }

    /// Builder: mark the cell as surveyed.
    pub fn surveyed(mut self) -> Self {
        self.surveyed = true;
        self
    }

    pub fn is_populated(&self) -> bool {
        self.population > 0
    }
}

/// All known map cells keyed by coordinate.
///
/// Iteration is in coordinate order, so anything derived from the map is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexGrid {
    cells: BTreeMap<HexCoordinate, MapCell>,
}

impl HexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell. Returns the previous cell, if any.
    pub fn insert(&mut self, hex: HexCoordinate, cell: MapCell) -> Option<MapCell> {
        self.cells.insert(hex, cell)
    }

    /// Look up a cell.
    pub fn cell_at(&self, hex: &HexCoordinate) -> Option<&MapCell> {
        self.cells.get(hex)
    }

    pub fn cell_at_mut(&mut self, hex: &HexCoordinate) -> Option<&mut MapCell> {
        self.cells.get_mut(hex)
    }

    pub fn contains(&self, hex: &HexCoordinate) -> bool {
        self.cells.contains_key(hex)
    }

    /// All cells, in coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = (&HexCoordinate, &MapCell)> {
        self.cells.iter()
    }

    /// Cells with a population tier above zero, in coordinate order.
    pub fn populated_cells(&self) -> impl Iterator<Item = (&HexCoordinate, &MapCell)> {
        self.cells.iter().filter(|(_, cell)| cell.is_populated())
    }

    /// On-map cells meeting at a corner.
    pub fn cells_at_corner(
        &self,
        corner: &CornerCoordinate,
    ) -> impl Iterator<Item = (HexCoordinate, &MapCell)> {
        corner
            .adjacent_hexes()
            .into_iter()
            .filter_map(|hex| self.cells.get(&hex).map(|cell| (hex, cell)))
    }

    /// Number of cells on the map.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(HexCoordinate, MapCell)> for HexGrid {
    fn from_iter<I: IntoIterator<Item = (HexCoordinate, MapCell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(q: i32, r: i32) -> HexCoordinate {
        HexCoordinate::new(q, r)
    }

    #[test]
    fn cell_lookup() {
        let mut grid = HexGrid::new();
        assert!(grid.is_empty());
        grid.insert(hex(0, 0), MapCell::in_region("Valley").with_population(2));

        let cell = grid.cell_at(&hex(0, 0)).unwrap();
        assert_eq!(cell.population, 2);
        assert_eq!(cell.region_name.as_deref(), Some("Valley"));
        assert!(!cell.surveyed);
        assert!(grid.cell_at(&hex(1, 0)).is_none());
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn insert_replaces_existing_cell() {
        let mut grid = HexGrid::new();
        grid.insert(hex(2, 2), MapCell::default());
        let previous = grid.insert(hex(2, 2), MapCell::default().with_population(4));
        assert_eq!(previous, Some(MapCell::default()));
        assert_eq!(grid.cell_at(&hex(2, 2)).unwrap().population, 4);
    }

    #[test]
    fn populated_cells_skip_empty_tiers() {
        let grid: HexGrid = [
            (hex(0, 0), MapCell::default()),
            (hex(1, 0), MapCell::default().with_population(1)),
            (hex(-1, 0), MapCell::default().with_population(5)),
        ]
        .into_iter()
        .collect();

        let populated: Vec<HexCoordinate> = grid.populated_cells().map(|(h, _)| *h).collect();
        // Coordinate order: (-1,0) before (1,0).
        assert_eq!(populated, vec![hex(-1, 0), hex(1, 0)]);
    }

    #[test]
    fn cells_at_corner_only_returns_cells_on_the_map() {
        let corner = CornerCoordinate::north(hex(0, 0));
        let mut grid = HexGrid::new();
        assert_eq!(grid.cells_at_corner(&corner).count(), 0);

        grid.insert(hex(0, -1), MapCell::in_region("North"));
        grid.insert(hex(5, 5), MapCell::in_region("Far"));
        let found: Vec<HexCoordinate> = grid.cells_at_corner(&corner).map(|(h, _)| h).collect();
        assert_eq!(found, vec![hex(0, -1)]);
    }

    #[test]
    fn builders_compose() {
        let cell = MapCell::in_region("Coast")
            .with_population(3)
            .with_terrain(Terrain::Hills)
            .surveyed();
        assert!(cell.is_populated());
        assert!(cell.surveyed);
        assert_eq!(cell.terrain, Some(Terrain::Hills));
    }
}
