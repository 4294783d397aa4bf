use glam::{DQuat, DVec3};

/// Position, velocity and direction type used throughout the simulation.
pub type Vector3 = DVec3;

/// Identifier for a tip in [`crate::organism::Organism::tips`].
///
/// This is an index into the organism's tip list, and is only meaningful
/// within the lifetime of a given `Organism` instance.
pub type TipId = usize;

/// Identifier for a cell within its owning [`crate::slice::Slice`].
pub type CellId = usize;

/// Reference "up" axis that a slice's unrotated ring is laid out around.
pub const UP: Vector3 = DVec3::Z;

/// Minimal rotation mapping [`UP`] onto `direction`.
///
/// A zero direction has no orientation and maps to the identity.
pub fn rotation_toward(direction: Vector3) -> DQuat {
    let to = direction.normalize_or_zero();
    if to == DVec3::ZERO {
        DQuat::IDENTITY
    } else {
        DQuat::from_rotation_arc(UP, to)
    }
}
