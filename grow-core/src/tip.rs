//! Growth points that trace branch centerlines.
//!
//! A [`Tip`] moves along its direction vector, lays down one [`Slice`] per
//! growing tick and periodically bifurcates. Shoots and roots share the
//! same state machine and differ only in their [`Tropism`] signs.

use std::f64::consts::TAU;

use glam::DQuat;

use crate::{
    bank::{self, BranchParams, CellParams, ParameterBank, SliceParams},
    context::GrowthContext,
    error::{GrowthError, Result},
    slice::{Slice, SlicePlacement},
    types::{TipId, Vector3, rotation_toward},
};

/// Steering signs: `+1` blends toward an axis, `-1` away from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tropism {
    pub light: f64,
    pub gravity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipKind {
    /// Toward light, away from gravity.
    Shoot,
    /// Away from light, toward gravity.
    Root,
}

impl TipKind {
    pub fn tropism(self) -> Tropism {
        match self {
            TipKind::Shoot => Tropism {
                light: 1.0,
                gravity: -1.0,
            },
            TipKind::Root => Tropism {
                light: -1.0,
                gravity: 1.0,
            },
        }
    }
}

/// Everything needed to place a new tip.
#[derive(Debug, Clone)]
pub struct TipSeed {
    pub kind: TipKind,
    pub parent: Option<TipId>,
    pub location: Vector3,
    pub direction: Vector3,
    pub params: BranchParams,
    pub phase: f64,
    pub generation: u32,
}

#[derive(Debug, Clone)]
pub struct Tip {
    pub kind: TipKind,
    pub parent: Option<TipId>,
    pub location: Vector3,
    pub last_location: Vector3,
    pub direction: Vector3,
    pub rotation: DQuat,
    /// Accumulated bifurcation phase, in turns.
    pub phase: f64,
    pub generation: u32,
    pub age: u32,
    pub bifurcation_count: u32,
    pub params: BranchParams,
    /// One slice per growing tick since birth, plus the one laid at birth.
    pub branch: Vec<Slice>,
}

impl Tip {
    /// Places a tip and lays its first slice.
    ///
    /// Fails with [`GrowthError::DegenerateGeometry`] when the inherited
    /// bifurcation period is `<= 0` or the count is `< 1`.
    pub fn new(seed: TipSeed, bank: &mut ParameterBank, ctx: &mut GrowthContext) -> Result<Self> {
        check_period(seed.params.period.value())?;
        check_count(seed.params.count.value())?;
        let mut tip = Self {
            kind: seed.kind,
            parent: seed.parent,
            location: seed.location,
            last_location: seed.location,
            direction: seed.direction,
            rotation: rotation_toward(seed.direction),
            phase: seed.phase,
            generation: seed.generation,
            age: 0,
            bifurcation_count: 0,
            params: seed.params,
            branch: Vec::new(),
        };
        tip.new_slice(bank, ctx)?;
        Ok(tip)
    }

    /// Appends a slice at the current location and direction.
    ///
    /// Ring resolution, cell growth rate and the slice growth multiplier are
    /// sampled straight from the bank, so they advance organism-wide.
    fn new_slice(&mut self, dna: &mut ParameterBank, ctx: &mut GrowthContext) -> Result<()> {
        let slice_params = SliceParams::from_bank(dna.lookup(bank::SLICE)?)?;
        let cell_params = CellParams::from_bank(dna.lookup(bank::CELL)?)?;

        let ring = dna.lookup_mut(bank::CELL)?[bank::cell::RESOLUTION].sample(ctx);
        let growth_multiplier =
            dna.lookup_mut(bank::SLICE)?[bank::slice::GROWTH_MULTIPLIER].sample(ctx);
        let growth_rate = &mut dna.lookup_mut(bank::CELL)?[bank::cell::GROWTH_RATE];

        let slice = Slice::new(
            SlicePlacement {
                ring: ring as usize,
                center: self.location,
                orientation: self.direction,
                growth_multiplier,
            },
            slice_params,
            &cell_params,
            growth_rate,
            ctx,
        )?;
        self.branch.push(slice);
        Ok(())
    }

    pub fn can_grow(&self) -> bool {
        let stop = self.params.growth_stop.value();
        stop == 0.0 || (self.age as f64) < stop
    }

    pub fn can_bifurcate(&self) -> bool {
        let stop = self.params.bifurcation_stop.value();
        let max_gen = self.params.max_generation.value();
        let counter = stop == 0.0 || (self.bifurcation_count as f64) < stop;
        let generation = max_gen == 0.0 || (self.generation as f64) < max_gen;
        counter && generation
    }

    /// Ages the cells of every slice this tip has ever laid.
    pub fn advance_branch(&mut self, ctx: &mut GrowthContext) {
        for slice in &mut self.branch {
            slice.advance(ctx);
        }
    }

    fn steer(&mut self, ctx: &mut GrowthContext) {
        let tropism = self.kind.tropism();

        let light = ctx.light_axis * tropism.light;
        let ratio = self.params.photolocate.sample(ctx);
        self.direction = self.direction.lerp(light, ratio);

        let gravity = ctx.gravity_axis * tropism.gravity;
        let ratio = self.params.geolocate.sample(ctx);
        self.direction = self.direction.lerp(gravity, ratio);
    }

    /// Advances this tip one tick.
    ///
    /// Returns the absolute spawn points of new child tips when the tip
    /// bifurcates on this tick.
    pub fn tick(
        &mut self,
        dna: &mut ParameterBank,
        ctx: &mut GrowthContext,
    ) -> Result<Option<Vec<Vector3>>> {
        self.advance_branch(ctx);

        if self.can_grow() {
            self.steer(ctx);

            self.last_location = self.location;
            self.location += self.direction * self.params.speed.sample(ctx);
            self.rotation = rotation_toward(self.direction);
            self.new_slice(dna, ctx)?;
        }

        self.age += 1;
        self.bifurcate(ctx)
    }

    fn bifurcate(&mut self, ctx: &mut GrowthContext) -> Result<Option<Vec<Vector3>>> {
        if !self.can_bifurcate() {
            return Ok(None);
        }
        let period = self.params.period.value();
        check_period(period)?;
        if (self.age as f64) % period != 0.0 {
            return Ok(None);
        }

        let targets = self.bifurcation_targets()?;
        self.phase += self.params.phase_offset.value();
        self.bifurcation_count += 1;
        self.params.drift(ctx);

        tracing::debug!(
            generation = self.generation,
            age = self.age,
            children = targets.len(),
            "tip bifurcated"
        );
        Ok(Some(targets))
    }

    /// Evenly spaced spawn points around the current direction.
    ///
    /// Each unit offset sits on the ring perpendicular to the direction,
    /// rotated by the accumulated phase, then blended toward the direction
    /// by the inclination.
    pub fn bifurcation_targets(&self) -> Result<Vec<Vector3>> {
        let count = self.params.count.value();
        check_count(count)?;
        let n = count as usize;
        let spacing = TAU / n as f64;
        let offset = TAU * self.phase;
        let inclination = self.params.inclination.value();

        Ok((0..n)
            .map(|i| {
                let a = spacing * i as f64 + offset;
                let around = self.rotation * Vector3::new(a.sin(), a.cos(), 0.0);
                around.lerp(self.direction, inclination) + self.location
            })
            .collect())
    }
}

fn check_period(period: f64) -> Result<()> {
    if period <= 0.0 {
        return Err(GrowthError::degenerate(format!("bifurcation period {period}")));
    }
    Ok(())
}

fn check_count(count: f64) -> Result<()> {
    if count < 1.0 {
        return Err(GrowthError::degenerate(format!("bifurcation count {count}")));
    }
    Ok(())
}
