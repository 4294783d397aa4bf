//! The growth loop and mesh emission.
//!
//! A run looks like:
//! 1. [`Organism::begin`]: reseed the random stream, register the bank
//!    presets and plant the root shoot.
//! 2. [`Organism::grow`]: tick every tip once per step, appending
//!    bifurcation children to the tip list as they appear.
//! 3. [`Organism::emit_mesh`]: walk the tip/slice/cell history into a
//!    [`MeshSink`].
//!
//! [`Organism::make`] runs all three.

use crate::{
    bank::{self, BranchParams, ParameterBank},
    config::GrowthConfig,
    context::GrowthContext,
    error::Result,
    mesh::MeshSink,
    tip::{Tip, TipKind, TipSeed},
    types::{TipId, Vector3},
};

/// Owner of the parameter bank and every tip ever grown.
#[derive(Debug, Clone)]
pub struct Organism {
    /// Validated in [`Organism::new`] and never mutated afterwards.
    config: GrowthConfig,
    pub dna: ParameterBank,
    /// Root first, then children in order of birth.
    pub tips: Vec<Tip>,
    /// Number of completed growth steps.
    pub age: u32,
    /// Running estimate of how many cells have been laid.
    pub cell_count: f64,
    ctx: GrowthContext,
}

impl Organism {
    /// Creates an empty organism. Call [`Organism::begin`] before growing.
    pub fn new(config: GrowthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dna: ParameterBank::new(config.seed.clone()),
            ctx: GrowthContext::from_config(&config),
            tips: Vec::new(),
            age: 0,
            cell_count: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn context(&self) -> &GrowthContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GrowthContext {
        &mut self.ctx
    }

    /// Restarts the run: fresh bank and random stream, one root shoot at the
    /// origin pointing along the configured start direction.
    pub fn begin(&mut self) -> Result<()> {
        self.dna = ParameterBank::new(self.config.seed.clone());
        self.ctx = GrowthContext::from_config(&self.config);
        self.config.presets.register_into(&mut self.dna)?;

        self.tips.clear();
        self.age = 0;
        self.cell_count = self.dna.lookup(bank::CELL)?[bank::cell::RESOLUTION].value();

        let params = BranchParams::from_bank(self.dna.lookup(bank::BRANCH)?)?;
        self.add_tip(TipSeed {
            kind: TipKind::Shoot,
            parent: None,
            location: Vector3::ZERO,
            direction: self.config.start_direction.normalize(),
            params,
            phase: 0.0,
            generation: 0,
        })?;
        Ok(())
    }

    /// Plants an extra tip, e.g. a root alongside the default shoot.
    pub fn add_tip(&mut self, seed: TipSeed) -> Result<TipId> {
        let tip = Tip::new(seed, &mut self.dna, &mut self.ctx)?;
        self.tips.push(tip);
        Ok(self.tips.len() - 1)
    }

    /// Runs `steps` growth steps.
    pub fn grow(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// One growth step over every tip, including tips born during it.
    pub fn step(&mut self) -> Result<()> {
        let mut i = 0;
        while i < self.tips.len() {
            let spawned = self.tips[i].tick(&mut self.dna, &mut self.ctx)?;
            self.cell_count +=
                self.dna.lookup_mut(bank::CELL)?[bank::cell::RESOLUTION].sample(&mut self.ctx);

            if let Some(targets) = spawned {
                self.dna.advance(bank::BRANCH, &mut self.ctx)?;
                self.spawn_children(i, &targets)?;
            }
            i += 1;
        }
        self.age += 1;
        Ok(())
    }

    /// Adds one shoot per spawn point, starting from the parent's previous
    /// location and heading from its current location toward the point.
    fn spawn_children(&mut self, parent: TipId, targets: &[Vector3]) -> Result<()> {
        let p = &self.tips[parent];
        let origin = p.last_location;
        let from = p.location;
        let phase = p.phase;
        let generation = p.generation + 1;
        let params = p.params.clone();

        for &target in targets {
            let child = TipSeed {
                kind: TipKind::Shoot,
                parent: Some(parent),
                location: origin,
                direction: (target - from).normalize_or_zero(),
                params: params.inherit(),
                phase,
                generation,
            };
            let id = self.add_tip(child)?;
            tracing::debug!(parent, id, generation, "spawned tip");
        }
        Ok(())
    }

    /// Total number of slices across all tips.
    pub fn slice_count(&self) -> usize {
        self.tips.iter().map(|t| t.branch.len()).sum()
    }

    /// Exact number of cells across all slices.
    pub fn total_cells(&self) -> usize {
        self.tips
            .iter()
            .flat_map(|t| &t.branch)
            .map(|s| s.len())
            .sum()
    }

    /// Emits the skeleton and the stitched cell surface into `sink`.
    ///
    /// Per tip: one skeleton vertex (edged to the parent's), then one vertex
    /// row per slice. Consecutive rows of the same tip are joined with quads;
    /// a child's first row is never joined to its parent's rows.
    pub fn emit_mesh<S: MeshSink>(&self, sink: &mut S) {
        let mut skeleton: Vec<S::Vertex> = Vec::with_capacity(self.tips.len());

        for (id, tip) in self.tips.iter().enumerate() {
            let v = sink.new_vertex(tip.location);
            if let Some(p) = tip.parent
                && let Some(&pv) = skeleton.get(p)
            {
                sink.new_edge(v, pv);
            }
            skeleton.push(v);

            let mut prev_row: Vec<S::Vertex> = Vec::new();
            for (si, slice) in tip.branch.iter().enumerate() {
                let row: Vec<S::Vertex> = slice
                    .cells
                    .iter()
                    .map(|c| sink.new_vertex(c.location))
                    .collect();
                if si > 0 {
                    if row.len() == prev_row.len() {
                        stitch(sink, &prev_row, &row);
                    } else {
                        tracing::warn!(
                            tip = id,
                            slice = si,
                            prev = prev_row.len(),
                            cur = row.len(),
                            "ring sizes differ, slices left unstitched"
                        );
                    }
                }
                prev_row = row;
            }
        }
    }

    /// Restarts, grows `steps` steps and emits the result.
    pub fn make<S: MeshSink>(&mut self, steps: usize, sink: &mut S) -> Result<()> {
        self.begin()?;
        self.grow(steps)?;
        self.emit_mesh(sink);
        tracing::info!(
            tips = self.tips.len(),
            cells = self.cell_count,
            slices = self.slice_count(),
            "organism grown"
        );
        Ok(())
    }
}

/// Quads between two equally sized rows, wrapping at the ring seam.
fn stitch<S: MeshSink>(sink: &mut S, prev: &[S::Vertex], row: &[S::Vertex]) {
    let n = row.len();
    for i in 1..n {
        sink.new_face([row[i], row[i - 1], prev[i - 1], prev[i]]);
    }
    sink.new_face([row[0], row[n - 1], prev[n - 1], prev[0]]);
}
