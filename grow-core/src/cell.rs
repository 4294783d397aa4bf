use crate::{
    bank::CellParams,
    context::GrowthContext,
    param::Param,
    types::{CellId, Vector3},
};

/// Committed location and velocity of a cell, as seen by its neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    pub location: Vector3,
    pub velocity: Vector3,
}

/// A lattice point on a slice ring.
///
/// Updates are double-buffered: [`Cell::grow`] only writes the staged
/// `next_*` fields, and [`Cell::commit`] publishes them.
#[derive(Debug, Clone)]
pub struct Cell {
    pub origin: Vector3,
    /// Birth offset from the slice center.
    pub origin_vector: Vector3,
    pub location: Vector3,
    pub velocity: Vector3,
    pub next_location: Vector3,
    pub next_velocity: Vector3,
    pub age: u32,
    /// Ring neighbours, as indices into the owning slice's cells.
    pub neighbors: Vec<CellId>,
    pub min_distance: Param,
    pub cohesion_ease: Param,
    pub repulsion_ease: Param,
    /// Slice-level gain on the cohesion term.
    pub cohesion_gain: f64,
    /// Slice-level gain on the repulsion term.
    pub repulsion_gain: f64,
    pub radial_rate: f64,
}

impl Cell {
    /// Creates a cell at `position` and draws its initial velocity.
    pub fn new(
        position: Vector3,
        center: Vector3,
        params: &CellParams,
        ctx: &mut GrowthContext,
    ) -> Self {
        let velocity = ctx.random_vector(0.06);
        Self {
            origin: position,
            origin_vector: position - center,
            location: position,
            velocity,
            next_location: position,
            next_velocity: Vector3::ZERO,
            age: 0,
            neighbors: Vec::new(),
            min_distance: params.min_distance.copy(true),
            cohesion_ease: params.cohesion_ease.copy(true),
            repulsion_ease: params.repulsion_ease.copy(true),
            cohesion_gain: 1.0,
            repulsion_gain: 1.0,
            radial_rate: 5.0,
        }
    }

    #[inline]
    pub fn state(&self) -> CellState {
        CellState {
            location: self.location,
            velocity: self.velocity,
        }
    }

    /// Computes the staged next state from the committed `ring` snapshot.
    ///
    /// The sequence is fixed: ease params, multiplicative jitter, radial
    /// outgrowth (which overwrites the jittered velocity), then the boids
    /// terms. Reordering changes the random stream and the result.
    pub fn grow(&mut self, ring: &[CellState], ctx: &mut GrowthContext) {
        self.cohesion_ease.sample(ctx);
        self.repulsion_ease.sample(ctx);

        self.jitter(ctx);
        self.grow_radial();
        self.flock(ring);

        self.next_location = self.location + self.next_velocity;
        self.age += 1;
    }

    fn jitter(&mut self, ctx: &mut GrowthContext) {
        self.next_velocity *= ctx.random_vector(0.2);
    }

    fn grow_radial(&mut self) {
        let decay = 1.0 / (self.age as f64 + 1.0);
        self.next_velocity = self.origin_vector * decay * self.radial_rate;
    }

    /// Boids cohesion plus the per-neighbour "away" pull.
    ///
    /// The away term adds `(neighbor - self) * ease`, which draws the cell
    /// toward each neighbour. The velocity sum starts from this cell's own
    /// velocity and is divided by the neighbour count.
    fn flock(&mut self, ring: &[CellState]) {
        if self.neighbors.is_empty() {
            return;
        }
        let away = self.repulsion_ease.value() * self.repulsion_gain;
        let mut velocity_sum = self.velocity;
        for &n in &self.neighbors {
            let other = ring[n];
            velocity_sum += other.velocity;
            self.next_velocity += (other.location - self.location) * away;
        }
        let average = velocity_sum / self.neighbors.len() as f64;
        self.next_velocity += average * self.cohesion_ease.value() * self.cohesion_gain;
    }

    /// Publishes the staged location and velocity.
    #[inline]
    pub fn commit(&mut self) {
        self.location = self.next_location;
        self.velocity = self.next_velocity;
    }
}
