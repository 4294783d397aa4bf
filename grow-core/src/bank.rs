//! The parameter bank ("DNA") and typed views over its tuples.
//!
//! The bank maps a subsystem name to an ordered tuple of [`Param`]s. Tips,
//! slices and cells copy the params they need at construction time, so
//! evolving one tip's speed never perturbs a sibling. A few params are read
//! through the bank directly and advance organism-wide; see
//! [`crate::tip::Tip`].

use std::collections::BTreeMap;

use crate::{
    context::{GrowthContext, seed_from_namespace},
    error::{GrowthError, Result},
    param::Param,
};

/// Bank key of the per-tip branching tuple.
pub const BRANCH: &str = "branch";
/// Bank key of the per-slice tuple.
pub const SLICE: &str = "slice";
/// Bank key of the per-cell tuple.
pub const CELL: &str = "cell";

/// Slot indices of the [`BRANCH`] tuple.
pub mod branch {
    pub const PERIOD: usize = 0;
    pub const COUNT: usize = 1;
    pub const PHASE_OFFSET: usize = 2;
    pub const SPEED_RATIO: usize = 3;
    pub const INCLINATION: usize = 4;
    pub const RADIUS_RATIO: usize = 5;
    pub const BIFURCATION_STOP: usize = 6;
    pub const GROWTH_STOP: usize = 7;
    pub const MAX_GENERATION: usize = 8;
    pub const SPEED: usize = 9;
    pub const SPEED_DECAY: usize = 10;
    pub const PHOTOLOCATE: usize = 11;
    pub const GEOLOCATE: usize = 12;
    pub const LEN: usize = 13;
}

/// Slot indices of the [`SLICE`] tuple.
pub mod slice {
    pub const RADIUS_X: usize = 0;
    pub const RADIUS_Y: usize = 1;
    pub const GROWTH_X: usize = 2;
    pub const GROWTH_Y: usize = 3;
    pub const GROWTH_MULTIPLIER: usize = 4;
    pub const RADIAL_EASE: usize = 5;
    pub const AWAY_EASE: usize = 6;
    pub const LEN: usize = 7;
}

/// Slot indices of the [`CELL`] tuple.
pub mod cell {
    pub const GROWTH_RATE: usize = 0;
    pub const RESOLUTION: usize = 1;
    pub const MIN_DISTANCE: usize = 2;
    pub const COHESION_EASE: usize = 3;
    pub const REPULSION_EASE: usize = 4;
    pub const LEN: usize = 5;
}

/// Named groups of params shared by every agent of one organism.
#[derive(Debug, Clone)]
pub struct ParameterBank {
    namespace: String,
    data: BTreeMap<String, Vec<Param>>,
}

impl ParameterBank {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            data: BTreeMap::new(),
        }
    }

    /// Namespace the organism's random stream is seeded from.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// RNG seed derived from [`Self::namespace`].
    pub fn seed(&self) -> [u8; 32] {
        seed_from_namespace(&self.namespace)
    }

    /// Stores (or overwrites) the tuple registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, params: Vec<Param>) -> &[Param] {
        let name = name.into();
        self.data.insert(name.clone(), params);
        &self.data[&name]
    }

    pub fn lookup(&self, name: &str) -> Result<&[Param]> {
        self.data
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GrowthError::key_not_found(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Result<&mut [Param]> {
        self.data
            .get_mut(name)
            .map(Vec::as_mut_slice)
            .ok_or_else(|| GrowthError::key_not_found(name))
    }

    /// Samples every param of a tuple once, in order.
    pub fn advance(&mut self, name: &str, ctx: &mut GrowthContext) -> Result<Vec<f64>> {
        Ok(self
            .lookup_mut(name)?
            .iter_mut()
            .map(|p| p.sample(ctx))
            .collect())
    }

    /// Seed values of a tuple, ignoring all sampling so far.
    pub fn seeds(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.lookup(name)?.iter().map(Param::peek_seed).collect())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

fn expect_len(name: &str, params: &[Param], len: usize) -> Result<()> {
    if params.len() != len {
        return Err(GrowthError::config(format!(
            "bank tuple `{name}` has {} params, expected {len}",
            params.len()
        )));
    }
    Ok(())
}

/// A tip's private copy of the branching tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchParams {
    pub period: Param,
    pub count: Param,
    pub phase_offset: Param,
    pub speed_ratio: Param,
    pub inclination: Param,
    pub radius_ratio: Param,
    pub bifurcation_stop: Param,
    pub growth_stop: Param,
    pub max_generation: Param,
    pub speed: Param,
    pub speed_decay: Param,
    pub photolocate: Param,
    pub geolocate: Param,
}

impl BranchParams {
    /// Copies every slot of a [`BRANCH`] tuple, continuing its phase.
    pub fn from_bank(params: &[Param]) -> Result<Self> {
        expect_len(BRANCH, params, branch::LEN)?;
        let p = |i: usize| params[i].copy(true);
        Ok(Self {
            period: p(branch::PERIOD),
            count: p(branch::COUNT),
            phase_offset: p(branch::PHASE_OFFSET),
            speed_ratio: p(branch::SPEED_RATIO),
            inclination: p(branch::INCLINATION),
            radius_ratio: p(branch::RADIUS_RATIO),
            bifurcation_stop: p(branch::BIFURCATION_STOP),
            growth_stop: p(branch::GROWTH_STOP),
            max_generation: p(branch::MAX_GENERATION),
            speed: p(branch::SPEED),
            speed_decay: p(branch::SPEED_DECAY),
            photolocate: p(branch::PHOTOLOCATE),
            geolocate: p(branch::GEOLOCATE),
        })
    }

    /// Copies of every param, continuing their phase, for a child tip.
    pub fn inherit(&self) -> Self {
        Self {
            period: self.period.copy(true),
            count: self.count.copy(true),
            phase_offset: self.phase_offset.copy(true),
            speed_ratio: self.speed_ratio.copy(true),
            inclination: self.inclination.copy(true),
            radius_ratio: self.radius_ratio.copy(true),
            bifurcation_stop: self.bifurcation_stop.copy(true),
            growth_stop: self.growth_stop.copy(true),
            max_generation: self.max_generation.copy(true),
            speed: self.speed.copy(true),
            speed_decay: self.speed_decay.copy(true),
            photolocate: self.photolocate.copy(true),
            geolocate: self.geolocate.copy(true),
        }
    }

    /// Advances every bifurcation-related param once. Speed is left alone.
    pub fn drift(&mut self, ctx: &mut GrowthContext) {
        self.period.sample(ctx);
        self.count.sample(ctx);
        self.phase_offset.sample(ctx);
        self.speed_ratio.sample(ctx);
        self.inclination.sample(ctx);
        self.radius_ratio.sample(ctx);
        self.bifurcation_stop.sample(ctx);
        self.growth_stop.sample(ctx);
        self.max_generation.sample(ctx);
        self.speed_decay.sample(ctx);
        self.photolocate.sample(ctx);
        self.geolocate.sample(ctx);
    }
}

/// A slice's private copies of the [`SLICE`] ease params.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceParams {
    /// Ellipse radii the ring is laid out on (seed values of the radius slots).
    pub radii: (f64, f64),
    pub radial_ease: Param,
    pub away_ease: Param,
}

impl SliceParams {
    pub fn from_bank(params: &[Param]) -> Result<Self> {
        expect_len(SLICE, params, slice::LEN)?;
        Ok(Self {
            radii: (
                params[slice::RADIUS_X].peek_seed(),
                params[slice::RADIUS_Y].peek_seed(),
            ),
            radial_ease: params[slice::RADIAL_EASE].copy(true),
            away_ease: params[slice::AWAY_EASE].copy(true),
        })
    }
}

/// Templates each new cell copies its own params from.
#[derive(Debug, Clone, PartialEq)]
pub struct CellParams {
    pub min_distance: Param,
    pub cohesion_ease: Param,
    pub repulsion_ease: Param,
}

impl CellParams {
    pub fn from_bank(params: &[Param]) -> Result<Self> {
        expect_len(CELL, params, cell::LEN)?;
        Ok(Self {
            min_distance: params[cell::MIN_DISTANCE].copy(true),
            cohesion_ease: params[cell::COHESION_EASE].copy(true),
            repulsion_ease: params[cell::REPULSION_EASE].copy(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrowthConfig;

    fn default_bank() -> ParameterBank {
        let cfg = GrowthConfig::default();
        let mut bank = ParameterBank::new("bank-tests");
        cfg.presets.register_into(&mut bank).unwrap();
        bank
    }

    #[test]
    fn lookup_of_unregistered_name_fails() {
        let bank = ParameterBank::new("GrowF");
        let err = bank.lookup("branch").unwrap_err();
        assert!(matches!(err, GrowthError::KeyNotFound(k) if k == "branch"));
    }

    #[test]
    fn register_overwrites_existing_tuple() {
        let mut bank = ParameterBank::new("GrowF");
        bank.register("cell", vec![Param::new(1.0)]);
        let stored = bank.register("cell", vec![Param::new(2.0), Param::new(3.0)]);
        assert_eq!(stored.len(), 2);
        assert_eq!(bank.lookup("cell").unwrap()[0].value(), 2.0);
    }

    #[test]
    fn advance_samples_each_param_once() {
        let mut bank = default_bank();
        let mut ctx = GrowthContext::seeded("bank-tests");
        bank.advance(BRANCH, &mut ctx).unwrap();
        assert!(bank.lookup(BRANCH).unwrap().iter().all(|p| p.count() == 1));
    }

    #[test]
    fn seeds_survive_advancing() {
        let mut bank = default_bank();
        let mut ctx = GrowthContext::seeded("bank-tests");
        let before = bank.seeds(BRANCH).unwrap();
        bank.advance(BRANCH, &mut ctx).unwrap();
        assert_eq!(bank.seeds(BRANCH).unwrap(), before);
    }

    #[test]
    fn branch_params_reject_short_tuple() {
        let err = BranchParams::from_bank(&[Param::new(1.0)]).unwrap_err();
        assert!(matches!(err, GrowthError::Config(_)));
    }

    #[test]
    fn branch_drift_leaves_speed_untouched() {
        let bank = default_bank();
        let mut ctx = GrowthContext::seeded("bank-tests");
        let mut bp = BranchParams::from_bank(bank.lookup(BRANCH).unwrap()).unwrap();
        bp.drift(&mut ctx);
        assert_eq!(bp.speed.count(), 0);
        assert_eq!(bp.period.count(), 1);
        assert_eq!(bp.geolocate.count(), 1);
    }

    #[test]
    fn slice_params_take_radius_seeds() {
        let bank = default_bank();
        let sp = SliceParams::from_bank(bank.lookup(SLICE).unwrap()).unwrap();
        assert_eq!(sp.radii, (0.01, 0.01));
    }

    #[test]
    fn seed_depends_on_namespace() {
        assert_ne!(ParameterBank::new("a").seed(), ParameterBank::new("b").seed());
    }
}
