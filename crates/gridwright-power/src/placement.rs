//! Placement validation for new plants and poles.
//!
//! Rule violations are returned as values. A rejected placement always
//! carries the specific [`PlacementRejection`] that failed first.

use gridwright_core::entity::BuildableKind;
use gridwright_core::id::PlayerId;
use gridwright_spatial::{CornerCoordinate, HexCoordinate, HexGrid, MapCell};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::view::PowerSnapshot;

/// Why a placement was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementRejection {
    #[error("plants need a hex and poles need a corner")]
    MissingCoordinates,
    #[error("location is not on the map")]
    NotInRegion,
    #[error("location must be in region {required}")]
    RequiredRegionMismatch { required: String },
    #[error("location has not been surveyed")]
    NotSurveyed,
    #[error("location is already occupied")]
    Occupied,
    #[error("a power plant must be placed first")]
    MustPlacePowerPlantFirst,
    #[error("location is not connected to the player's grid")]
    NotConnectedToGrid,
}

/// Verdict on a placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    pub valid: bool,
    pub reason: Option<PlacementRejection>,
}

impl PlacementOutcome {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: PlacementRejection) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

impl From<Result<(), PlacementRejection>> for PlacementOutcome {
    fn from(result: Result<(), PlacementRejection>) -> Self {
        match result {
            Ok(()) => Self::accepted(),
            Err(reason) => Self::rejected(reason),
        }
    }
}

/// A proposed buildable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub kind: BuildableKind,
    pub player: PlayerId,
    pub hex: Option<HexCoordinate>,
    pub corner: Option<CornerCoordinate>,
    /// Region the blueprint is restricted to, if any.
    pub required_region: Option<String>,
    pub requires_survey: bool,
}

impl PlacementRequest {
    pub fn plant(player: PlayerId, hex: HexCoordinate) -> Self {
        Self {
            kind: BuildableKind::PowerPlant,
            player,
            hex: Some(hex),
            corner: None,
            required_region: None,
            requires_survey: false,
        }
    }

    pub fn pole(player: PlayerId, corner: CornerCoordinate) -> Self {
        Self {
            kind: BuildableKind::PowerPole,
            player,
            hex: None,
            corner: Some(corner),
            required_region: None,
            requires_survey: false,
        }
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.required_region = Some(region.into());
        self
    }

    pub fn requiring_survey(mut self) -> Self {
        self.requires_survey = true;
        self
    }
}

/// Where a validated request lands.
enum Site {
    Hex(HexCoordinate),
    Corner(CornerCoordinate),
}

/// Check a request against the map and the player's current grids.
pub fn validate_buildable_placement(
    request: &PlacementRequest,
    snapshot: &PowerSnapshot,
    grids: &[Grid],
    hex_grid: &HexGrid,
) -> PlacementOutcome {
    check(request, snapshot, grids, hex_grid).into()
}

fn check(
    request: &PlacementRequest,
    snapshot: &PowerSnapshot,
    grids: &[Grid],
    hex_grid: &HexGrid,
) -> Result<(), PlacementRejection> {
    let site = match (request.kind, request.hex, request.corner) {
        (BuildableKind::PowerPlant, Some(hex), _) => Site::Hex(hex),
        (BuildableKind::PowerPole, _, Some(corner)) => Site::Corner(corner),
        _ => return Err(PlacementRejection::MissingCoordinates),
    };

    let cells: Vec<&MapCell> = match &site {
        Site::Hex(hex) => hex_grid.cell_at(hex).into_iter().collect(),
        Site::Corner(corner) => hex_grid.cells_at_corner(corner).map(|(_, c)| c).collect(),
    };
    if cells.is_empty() {
        return Err(PlacementRejection::NotInRegion);
    }
    if let Some(required) = &request.required_region {
        if cells
            .iter()
            .any(|c| c.region_name.as_deref() != Some(required.as_str()))
        {
            return Err(PlacementRejection::RequiredRegionMismatch {
                required: required.clone(),
            });
        }
    }
    if request.requires_survey && cells.iter().any(|c| !c.surveyed) {
        return Err(PlacementRejection::NotSurveyed);
    }
    let occupied = match &site {
        Site::Hex(hex) => !snapshot.network.plants_at(hex).is_empty(),
        Site::Corner(corner) => snapshot.network.pole_at(corner).is_some(),
    };
    if occupied {
        return Err(PlacementRejection::Occupied);
    }

    let player = request.player;
    let owns_plant = snapshot.plants.iter().any(|p| p.owner == Some(player));
    if matches!(site, Site::Hex(_)) && !owns_plant {
        return Ok(());
    }

    let player_grids: Vec<&Grid> = grids
        .iter()
        .filter(|g| grid_has_owner(g, snapshot, player))
        .collect();
    if player_grids.is_empty() {
        return Err(PlacementRejection::MustPlacePowerPlantFirst);
    }

    let connected = match site {
        Site::Corner(corner) => {
            let near_own_pole = snapshot
                .poles
                .iter()
                .any(|p| p.owner == Some(player) && p.corner.is_adjacent_to(&corner));
            let near_own_plant = snapshot
                .plants
                .iter()
                .any(|p| p.owner == Some(player) && corner.touches(&p.hex));
            near_own_pole || near_own_plant
        }
        Site::Hex(hex) => snapshot
            .network
            .poles_touching(&hex)
            .iter()
            .any(|&pole| player_grids.iter().any(|g| g.contains_pole(pole))),
    };
    if connected {
        Ok(())
    } else {
        Err(PlacementRejection::NotConnectedToGrid)
    }
}

/// Whether the player owns any plant or pole in the grid.
fn grid_has_owner(grid: &Grid, snapshot: &PowerSnapshot, player: PlayerId) -> bool {
    let owned = Some(player);
    grid.plant_ids
        .iter()
        .any(|&id| snapshot.plant(id).is_some_and(|p| p.owner == owned))
        || grid
            .pole_ids
            .iter()
            .any(|&id| snapshot.pole(id).is_some_and(|p| p.owner == owned))
}

// ===========================================================================
// Tests
// ===========================================================================
