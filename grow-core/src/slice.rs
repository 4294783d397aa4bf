use std::f64::consts::TAU;

use glam::DQuat;

use crate::{
    bank::{CellParams, SliceParams},
    cell::{Cell, CellState},
    context::GrowthContext,
    error::{GrowthError, Result},
    param::Param,
    types::{CellId, Vector3, rotation_toward},
};

/// Where and how a new slice is laid down.
#[derive(Debug, Clone, Copy)]
pub struct SlicePlacement {
    pub ring: usize,
    pub center: Vector3,
    pub orientation: Vector3,
    /// Multiplier applied to every cell's sampled radial growth rate.
    pub growth_multiplier: f64,
}

/// One cross-sectional ring of cells along a branch.
///
/// The center is frozen at creation; the cells keep moving independently
/// on every [`Slice::advance`].
#[derive(Debug, Clone)]
pub struct Slice {
    pub cells: Vec<Cell>,
    pub center: Vector3,
    pub orientation: Vector3,
    pub rotation: DQuat,
    pub radii: (f64, f64),
    pub radial_ease: Param,
    pub away_ease: Param,
}

impl Slice {
    /// Lays `placement.ring` cells evenly around an ellipse facing
    /// `placement.orientation`, then links them with the context's ring
    /// kernel.
    ///
    /// `growth_rate` is sampled once per cell, in ring order.
    pub fn new(
        placement: SlicePlacement,
        params: SliceParams,
        cell_params: &CellParams,
        growth_rate: &mut Param,
        ctx: &mut GrowthContext,
    ) -> Result<Self> {
        if placement.ring < 3 {
            return Err(GrowthError::degenerate(format!(
                "slice ring of {} cells",
                placement.ring
            )));
        }

        let SliceParams {
            radii,
            mut radial_ease,
            mut away_ease,
        } = params;
        let rotation = rotation_toward(placement.orientation);
        let step = TAU / placement.ring as f64;

        let mut cells = Vec::with_capacity(placement.ring);
        for i in 0..placement.ring {
            let a = i as f64 * step;
            let flat = Vector3::new(a.sin() * radii.0, a.cos() * radii.1, 0.0);
            let pos = rotation * flat + placement.center;

            let mut cell = Cell::new(pos, placement.center, cell_params, ctx);
            cell.radial_rate = growth_rate.sample(ctx) * placement.growth_multiplier;
            cell.cohesion_gain = radial_ease.sample(ctx);
            cell.repulsion_gain = away_ease.sample(ctx);
            cells.push(cell);
        }

        let mut slice = Self {
            cells,
            center: placement.center,
            orientation: placement.orientation,
            rotation,
            radii,
            radial_ease,
            away_ease,
        };
        slice.link(&ctx.ring_kernel);
        Ok(slice)
    }

    /// Links each cell to `(i + k) mod n` for every kernel offset `k`.
    ///
    /// Offsets that are a multiple of the ring size would link a cell to
    /// itself and are skipped.
    pub fn link(&mut self, kernel: &[isize]) {
        let n = self.cells.len() as isize;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            for &k in kernel {
                if k.rem_euclid(n) == 0 {
                    continue;
                }
                let j = (i as isize + k).rem_euclid(n) as CellId;
                cell.neighbors.push(j);
            }
        }
    }

    /// Advances every cell one tick.
    ///
    /// All cells grow against the same committed snapshot before any of
    /// them commits.
    pub fn advance(&mut self, ctx: &mut GrowthContext) {
        let snapshot: Vec<CellState> = self.cells.iter().map(Cell::state).collect();
        for cell in &mut self.cells {
            cell.grow(&snapshot, ctx);
        }
        for cell in &mut self.cells {
            cell.commit();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> (SliceParams, CellParams, Param) {
        (
            SliceParams {
                radii: (1.0, 1.0),
                radial_ease: Param::new(1.0),
                away_ease: Param::new(1.0),
            },
            CellParams {
                min_distance: Param::new(0.001),
                cohesion_ease: Param::new(0.05),
                repulsion_ease: Param::new(0.01),
            },
            Param::new(3.0),
        )
    }

    fn slice(ring: usize, center: Vector3, orientation: Vector3) -> Result<Slice> {
        let mut ctx = GrowthContext::seeded("slice");
        let (sp, cp, mut rate) = params();
        Slice::new(
            SlicePlacement {
                ring,
                center,
                orientation,
                growth_multiplier: 1.0,
            },
            sp,
            &cp,
            &mut rate,
            &mut ctx,
        )
    }

    #[test]
    fn ring_below_three_is_degenerate() {
        let err = slice(2, Vector3::ZERO, Vector3::Z).unwrap_err();
        assert!(matches!(err, GrowthError::DegenerateGeometry(_)));
    }

    #[test]
    fn cells_lie_on_ring_around_center() {
        let center = Vector3::new(1.0, -2.0, 0.5);
        let s = slice(8, center, Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(s.len(), 8);
        for c in &s.cells {
            let r = c.origin - center;
            assert!((r.length() - 1.0).abs() < 1e-12);
            // Ring plane is perpendicular to the orientation.
            assert!(r.dot(Vector3::new(1.0, 1.0, 0.0).normalize()).abs() < 1e-12);
        }
    }

    #[test]
    fn ring_links_wrap_around() {
        let s = slice(5, Vector3::ZERO, Vector3::Z).unwrap();
        assert_eq!(s.cells[0].neighbors, vec![4, 1]);
        assert_eq!(s.cells[4].neighbors, vec![3, 0]);
    }

    #[test]
    fn offsets_wrapping_onto_self_are_skipped() {
        let mut s = slice(5, Vector3::ZERO, Vector3::Z).unwrap();
        for c in &mut s.cells {
            c.neighbors.clear();
        }
        s.link(&[-5, -1, 1, 5, 10]);
        assert_eq!(s.cells[0].neighbors, vec![4, 1]);
        for (i, c) in s.cells.iter().enumerate() {
            assert!(!c.neighbors.contains(&i));
        }
    }

    #[test]
    fn growth_rate_is_sampled_once_per_cell() {
        let mut ctx = GrowthContext::seeded("slice");
        let (sp, cp, mut rate) = params();
        Slice::new(
            SlicePlacement {
                ring: 6,
                center: Vector3::ZERO,
                orientation: Vector3::Z,
                growth_multiplier: 2.0,
            },
            sp,
            &cp,
            &mut rate,
            &mut ctx,
        )
        .map(|s| assert!(s.cells.iter().all(|c| c.radial_rate == 6.0)))
        .unwrap();
        assert_eq!(rate.count(), 6);
    }

    #[test]
    fn advance_reads_only_prior_tick_state() {
        let mut ctx = GrowthContext::seeded("slice-advance");
        let mut s = slice(6, Vector3::ZERO, Vector3::Z).unwrap();

        // Replay the same tick by hand against the pre-tick snapshot.
        let snapshot: Vec<CellState> = s.cells.iter().map(Cell::state).collect();
        let mut expected = s.cells.clone();
        let mut replay = ctx.clone();
        for c in &mut expected {
            c.grow(&snapshot, &mut replay);
        }

        s.advance(&mut ctx);
        for (got, want) in s.cells.iter().zip(&expected) {
            assert_eq!(got.location, want.next_location);
            assert_eq!(got.velocity, want.next_velocity);
        }
    }
}
