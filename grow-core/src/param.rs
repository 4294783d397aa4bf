//! Self-advancing scalar parameters.
//!
//! A [`Param`] is the atomic unit of tunable growth behaviour. Each call to
//! [`Param::sample`] runs the next entry of its step sequence (round-robin)
//! and stores the result as the new value. Most oscillators key off the call
//! counter rather than the current value, so the counter advances on every
//! sample even when the value is held.

use serde::{Deserialize, Serialize};

use crate::{
    context::GrowthContext,
    error::{GrowthError, Result},
};

/// Named oscillator functions a [`Param`] can step through.
///
/// `Square` duplicates `Sin` and `BumpY` duplicates `Bump`; both pairs are
/// kept formula-for-formula so existing presets grow the same shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wave {
    None,
    Rat,
    Random,
    RandomInt,
    Sin,
    Sin1,
    Sin2,
    Square,
    SquareY,
    Spike,
    SpikeY,
    Bump,
    BumpY,
    Log,
    Rlog,
    Cos,
    Cos1,
}

/// One entry of a step sequence: an oscillator or a literal value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Const(f64),
    Wave(Wave),
}

impl From<Wave> for Step {
    fn from(w: Wave) -> Self {
        Step::Wave(w)
    }
}

impl From<f64> for Step {
    fn from(c: f64) -> Self {
        Step::Const(c)
    }
}

/// Inclusive value range an oscillator maps its `[0, 1]` output onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Maps a unit value onto `[min, max]`.
    #[inline]
    pub fn map(&self, unit: f64) -> f64 {
        unit * (self.max - self.min) + self.min
    }
}

impl Wave {
    /// Evaluates this oscillator against the current state of `p`.
    pub fn eval(self, p: &Param, bounds: Bounds, ctx: &mut GrowthContext) -> f64 {
        let phase = p.count as f64 * p.freq;
        match self {
            Wave::None => p.value,
            Wave::Rat => p.value * p.freq,
            Wave::Random => bounds.map(ctx.random()),
            Wave::RandomInt => bounds.map(ctx.random()).floor(),
            Wave::Sin | Wave::Square => bounds.map((phase.sin() + 1.0) * 0.5),
            Wave::SquareY => bounds.map((phase.cos() + 1.0) * 0.5),
            Wave::Sin1 | Wave::Rlog => bounds.map((p.value - bounds.min).sin() + 1.0),
            Wave::Sin2 => bounds.map((p.count as f64 * p.value).sin() + 1.0),
            Wave::Spike => bounds.map(1.0 - phase.sin().abs()),
            Wave::SpikeY => bounds.map(1.0 - phase.cos().abs()),
            Wave::Bump | Wave::BumpY => bounds.map(phase.sin().abs()),
            Wave::Log => bounds.map((p.value - bounds.min).ln()),
            Wave::Cos => bounds.map((p.value * p.freq).cos() + 1.0),
            Wave::Cos1 => bounds.map((p.value - bounds.min).cos() + 1.0),
        }
    }
}

/// A stateful scalar evolved by its step sequence each time it is sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    value: f64,
    seed: f64,
    bounds: Option<Bounds>,
    steps: Vec<Step>,
    freq: f64,
    count: u64,
    cursor: usize,
}

impl Param {
    /// Unbounded parameter: sampling never changes its value.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            seed: value,
            bounds: None,
            steps: Vec::new(),
            freq: 1.0,
            count: 0,
            cursor: 0,
        }
    }

    /// Bounded parameter driven by `steps`, cycled round-robin.
    ///
    /// Fails with [`GrowthError::Config`] when `min > max` or `steps` is empty.
    pub fn bounded(
        value: f64,
        min: f64,
        max: f64,
        steps: impl Into<Vec<Step>>,
        freq: f64,
    ) -> Result<Self> {
        let steps = steps.into();
        if min > max {
            return Err(GrowthError::config(format!(
                "param bounds inverted: min {min} > max {max}"
            )));
        }
        if steps.is_empty() {
            return Err(GrowthError::config("bounded param has no steps"));
        }
        Ok(Self {
            value,
            seed: value,
            bounds: Some(Bounds { min, max }),
            steps,
            freq,
            count: 0,
            cursor: 0,
        })
    }

    /// Advances the parameter one step and returns its new value.
    pub fn sample(&mut self, ctx: &mut GrowthContext) -> f64 {
        if ctx.params_live
            && let Some(bounds) = self.bounds
        {
            self.value = self.next_step(bounds, ctx);
        }
        self.count += 1;
        self.value
    }

    fn next_step(&mut self, bounds: Bounds, ctx: &mut GrowthContext) -> f64 {
        let out = match self.steps[self.cursor] {
            Step::Const(c) => c,
            Step::Wave(w) => w.eval(self, bounds, ctx),
        };
        self.cursor = (self.cursor + 1) % self.steps.len();
        out
    }

    /// Independent copy restarting from the seed value.
    ///
    /// With `inherit_count` the copy keeps this param's counter and step
    /// cursor, so it continues the same phase instead of restarting it.
    pub fn copy(&self, inherit_count: bool) -> Self {
        let mut p = Self {
            value: self.seed,
            seed: self.seed,
            bounds: self.bounds,
            steps: self.steps.clone(),
            freq: self.freq,
            count: 0,
            cursor: 0,
        };
        if inherit_count {
            p.count = self.count;
            p.cursor = self.cursor;
        }
        p
    }

    /// The immutable value this parameter was created with.
    #[inline]
    pub fn peek_seed(&self) -> f64 {
        self.seed
    }

    /// Current value, without advancing.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    #[inline]
    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}
