//! Run configuration and the default growth presets.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.
//!
//! ## Example `growf.toml`
//!
//! ```toml
//! seed = "GrowF"
//! steps = 20
//! params_live = true
//! ring_kernel = [-1, 1]
//! light_axis = [0.5, 0.5, 1.0]
//! ```
//!
//! A `presets.branch`, `presets.slice` or `presets.cell` array replaces the
//! whole default tuple, so an override lists every entry of it. Each entry
//! looks like `{ value = 3.0, min = 0.5, max = 8.0, steps = ["square", "none"], freq = 8.0 }`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    bank::{self, ParameterBank},
    error::{GrowthError, Result},
    param::{Param, Step, Wave},
    types::Vector3,
};

fn default_freq() -> f64 {
    1.0
}

/// Serializable description of one [`Param`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParamPreset {
    pub value: f64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default = "default_freq")]
    pub freq: f64,
}

impl ParamPreset {
    /// A value that never changes.
    pub fn fixed(value: f64) -> Self {
        Self {
            value,
            min: None,
            max: None,
            steps: Vec::new(),
            freq: 1.0,
        }
    }

    pub fn ranged(value: f64, min: f64, max: f64, steps: &[Step], freq: f64) -> Self {
        Self {
            value,
            min: Some(min),
            max: Some(max),
            steps: steps.to_vec(),
            freq,
        }
    }

    fn wave(value: f64, min: f64, max: f64, wave: Wave, freq: f64) -> Self {
        Self::ranged(value, min, max, &[Step::Wave(wave)], freq)
    }

    /// Smallest of the start value, the lower bound and any constant step.
    fn lowest(&self) -> f64 {
        self.steps
            .iter()
            .filter_map(|s| match s {
                Step::Const(c) => Some(*c),
                Step::Wave(_) => None,
            })
            .chain(self.min)
            .fold(self.value, f64::min)
    }

    pub fn build(&self) -> Result<Param> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                Param::bounded(self.value, min, max, self.steps.clone(), self.freq)
            }
            (None, None) => Ok(Param::new(self.value)),
            _ => Err(GrowthError::config(format!(
                "param preset {} sets only one of min/max",
                self.value
            ))),
        }
    }
}

/// Default tuples for the three bank entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Presets {
    pub branch: Vec<ParamPreset>,
    pub slice: Vec<ParamPreset>,
    pub cell: Vec<ParamPreset>,
}

impl Default for Presets {
    fn default() -> Self {
        use Wave as W;
        let p = ParamPreset::wave;
        Self {
            branch: vec![
                p(2.0, 3.0, 8.0, W::Bump, 10.0),  // bifurcation period
                ParamPreset::ranged(1.0, 1.0, 4.0, &[Step::Const(2.0)], 1.0), // bifurcation count
                p(0.15, 0.0, 0.5, W::None, 1.0),  // phase offset
                p(0.718, 0.9, 1.0, W::None, 1.0), // child speed ratio
                p(0.5, 0.0, 0.9, W::Sin, 3.0),    // child inclination
                p(0.3, 0.0, 0.8, W::None, 1.0),   // child radius ratio
                p(0.0, 5.0, 12.0, W::None, 1.0),  // stop bifurcating at age
                p(0.0, 0.0, 20.0, W::None, 1.0),  // stop growing at age
                p(4.0, 3.0, 20.0, W::None, 1.0),  // max generation
                p(0.25, 0.1, 2.0, W::None, 1.0),  // speed
                p(0.98, 0.618, 1.11, W::None, 5.0), // speed decay
                p(0.04, -0.2, 0.2, W::None, 10.0), // photolocate ratio
                p(0.02, 0.02, 0.02, W::None, 10.0), // geolocate ratio
            ],
            slice: vec![
                ParamPreset::ranged(0.01, 0.005, 0.05, &[Step::Wave(W::Square), Step::Wave(W::None)], 100.0),
                p(0.01, 0.005, 0.05, W::SquareY, 3.0),
                p(1.0, 1.0, 5.0, W::Square, 100.0),
                p(1.0, 1.0, 5.0, W::SquareY, 100.0),
                p(1.0, 1.0, 2.0, W::None, 100.0), // radial growth multiplier
                p(1.0, 0.1, 2.0, W::None, 0.5),   // radial ease
                p(1.0, 0.1, 2.0, W::None, 0.5),   // away ease
            ],
            cell: vec![
                ParamPreset::ranged(3.0, 0.5, 8.0, &[Step::Wave(W::Square), Step::Wave(W::None)], 8.0),
                ParamPreset::fixed(24.0), // ring resolution
                p(0.001, 0.001, 0.002, W::None, 1.0),
                p(0.05, 0.01, 0.8, W::None, 3.0),
                p(0.01, 0.01, 0.2, W::None, 3.0),
            ],
        }
    }
}

impl Presets {
    fn build_tuple(name: &str, presets: &[ParamPreset], len: usize) -> Result<Vec<Param>> {
        if presets.len() != len {
            return Err(GrowthError::config(format!(
                "preset `{name}` has {} entries, expected {len}",
                presets.len()
            )));
        }
        presets.iter().map(ParamPreset::build).collect()
    }

    /// Rejects bifurcation presets that can reach a period `<= 0` or a count
    /// `< 1`, so degenerate branching fails before any tip is grown.
    fn check_branching(&self) -> Result<()> {
        let (Some(period), Some(count)) = (
            self.branch.get(bank::branch::PERIOD),
            self.branch.get(bank::branch::COUNT),
        ) else {
            return Ok(());
        };
        if period.lowest() <= 0.0 {
            return Err(GrowthError::config(format!(
                "bifurcation period preset can reach {}",
                period.lowest()
            )));
        }
        if count.lowest() < 1.0 {
            return Err(GrowthError::config(format!(
                "bifurcation count preset can reach {}",
                count.lowest()
            )));
        }
        Ok(())
    }

    /// Builds all three tuples and registers them in `bank`.
    pub fn register_into(&self, target: &mut ParameterBank) -> Result<()> {
        let branch = Self::build_tuple(bank::BRANCH, &self.branch, bank::branch::LEN)?;
        let slice = Self::build_tuple(bank::SLICE, &self.slice, bank::slice::LEN)?;
        let cell = Self::build_tuple(bank::CELL, &self.cell, bank::cell::LEN)?;
        target.register(bank::BRANCH, branch);
        target.register(bank::SLICE, slice);
        target.register(bank::CELL, cell);
        Ok(())
    }
}

/// Construction-time settings for one organism run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GrowthConfig {
    /// Namespace the random stream is seeded from.
    pub seed: String,
    pub steps: usize,
    pub params_live: bool,
    pub ring_kernel: Vec<isize>,
    pub start_direction: Vector3,
    pub light_axis: Vector3,
    pub gravity_axis: Vector3,
    pub presets: Presets,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            seed: "GrowF".to_owned(),
            steps: 10,
            params_live: true,
            ring_kernel: vec![-1, 1],
            start_direction: Vector3::Z,
            light_axis: Vector3::new(0.5, 0.5, 1.0),
            gravity_axis: Vector3::new(0.0, 0.0, -1.0),
            presets: Presets::default(),
        }
    }
}

impl GrowthConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ring_kernel.is_empty() {
            return Err(GrowthError::config("ring kernel is empty"));
        }
        if self.ring_kernel.contains(&0) {
            return Err(GrowthError::config("ring kernel links a cell to itself"));
        }
        if let Some(k) = self.ring_kernel.iter().find(|k| !self.ring_kernel.contains(&-**k)) {
            return Err(GrowthError::config(format!(
                "ring kernel offset {k} has no mirror offset"
            )));
        }
        if self.start_direction.length_squared() == 0.0 {
            return Err(GrowthError::config("start direction is zero"));
        }
        let mut scratch = ParameterBank::new(self.seed.clone());
        self.presets.register_into(&mut scratch)?;
        self.presets.check_branching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        GrowthConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = GrowthConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GrowthConfig::default());
    }

    #[test]
    fn toml_overrides_scalar_fields() {
        let cfg = GrowthConfig::from_toml_str(
            r#"
            seed = "Fern"
            steps = 25
            params_live = false
            ring_kernel = [-2, -1, 1, 2]
            light_axis = [0.0, 1.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, "Fern");
        assert_eq!(cfg.steps, 25);
        assert!(!cfg.params_live);
        assert_eq!(cfg.ring_kernel, vec![-2, -1, 1, 2]);
        assert_eq!(cfg.light_axis, Vector3::Y);
        assert_eq!(cfg.presets, Presets::default());
    }

    #[test]
    fn zero_kernel_offset_is_rejected() {
        let cfg = GrowthConfig {
            ring_kernel: vec![-1, 0, 1],
            ..GrowthConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));
    }

    #[test]
    fn asymmetric_kernel_is_rejected() {
        let cfg = GrowthConfig {
            ring_kernel: vec![-1, 1, 2],
            ..GrowthConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));
    }

    #[test]
    fn count_preset_that_can_drop_below_one_is_rejected() {
        // Starts at 1 but its constant step would set the count to 0.
        let mut cfg = GrowthConfig::default();
        cfg.presets.branch[bank::branch::COUNT] =
            ParamPreset::ranged(1.0, 0.0, 4.0, &[Step::Const(0.0)], 1.0);
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));

        // Lower bound below 1 is enough on its own.
        cfg.presets.branch[bank::branch::COUNT] =
            ParamPreset::ranged(2.0, 0.5, 4.0, &[Step::Wave(Wave::Random)], 1.0);
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));

        cfg.presets.branch[bank::branch::COUNT] = ParamPreset::fixed(0.0);
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));
    }

    #[test]
    fn non_positive_period_preset_is_rejected() {
        let mut cfg = GrowthConfig::default();
        cfg.presets.branch[bank::branch::PERIOD] = ParamPreset::fixed(0.0);
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));

        cfg.presets.branch[bank::branch::PERIOD] =
            ParamPreset::ranged(2.0, 0.0, 8.0, &[Step::Wave(Wave::Bump)], 10.0);
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));
    }

    #[test]
    fn short_preset_tuple_is_rejected() {
        let mut cfg = GrowthConfig::default();
        cfg.presets.cell.pop();
        assert!(matches!(cfg.validate(), Err(GrowthError::Config(_))));
    }

    #[test]
    fn half_bounded_preset_is_rejected() {
        let preset = ParamPreset {
            value: 1.0,
            min: Some(0.0),
            max: None,
            steps: vec![],
            freq: 1.0,
        };
        assert!(preset.build().is_err());
    }

    #[test]
    fn malformed_toml_is_a_toml_error() {
        let err = GrowthConfig::from_toml_str("steps = \"many\"").unwrap_err();
        assert!(matches!(err, GrowthError::Toml(_)));
    }

    #[test]
    fn default_presets_match_bank_lengths() {
        let p = Presets::default();
        assert_eq!(p.branch.len(), bank::branch::LEN);
        assert_eq!(p.slice.len(), bank::slice::LEN);
        assert_eq!(p.cell.len(), bank::cell::LEN);
    }
}
