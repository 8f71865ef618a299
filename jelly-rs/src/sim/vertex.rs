use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::mesh::RestMesh;

/// Per-vertex simulation state, struct-of-arrays. Every array has one
/// entry per rest vertex and index `i` always refers to the same physical
/// vertex across all of them.
#[derive(Clone, Debug)]
pub struct VertexSet {
    pub rest: Vec<Vec3>,
    pub working: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub is_top: Vec<bool>,
    pub seeds: Vec<u32>,
    pub jitter_directions: Vec<Vec3>,
    /// Arithmetic mean of the rest positions. The reference point for the
    /// stretch and wave terms, not the transform pivot.
    pub center: Vec3,
}

impl VertexSet {
    /// Seeds and jitter directions come from an RNG keyed by the object's
    /// identity, so the same object gets the same per-vertex phase on
    /// every run.
    pub fn from_rest(mesh: &RestMesh, object_seed: u64) -> Self {
        let rest = mesh.positions.clone();
        let count = rest.len();

        let mut rng = StdRng::seed_from_u64(object_seed);
        let mut is_top = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        let mut jitter_directions = Vec::with_capacity(count);

        for position in &rest {
            seeds.push(rng.gen_range(0..10_000));
            is_top.push(position.y > 0.0);
            let direction = Vec3::new(
                rng.gen::<f32>() * 2.0 - 1.0,
                rng.gen::<f32>() * 2.0 - 1.0,
                rng.gen::<f32>() * 2.0 - 1.0,
            );
            jitter_directions.push(direction.normalize_or_zero());
        }

        let center = rest.iter().copied().sum::<Vec3>() / count as f32;

        VertexSet {
            working: rest.clone(),
            velocities: vec![Vec3::ZERO; count],
            rest,
            is_top,
            seeds,
            jitter_directions,
            center,
        }
    }

    pub fn len(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Largest distance of any working position from its rest position.
    pub fn max_displacement(&self) -> f32 {
        self.rest
            .iter()
            .zip(&self.working)
            .map(|(rest, working)| rest.distance(*working))
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_share_one_length() {
        let mesh = RestMesh::subdivided_cube(1.0, 3);
        let set = VertexSet::from_rest(&mesh, 7);
        assert_eq!(set.working.len(), set.rest.len());
        assert_eq!(set.velocities.len(), set.rest.len());
        assert_eq!(set.is_top.len(), set.rest.len());
        assert_eq!(set.seeds.len(), set.rest.len());
        assert_eq!(set.jitter_directions.len(), set.rest.len());
    }

    #[test]
    fn initialization_is_reproducible() {
        let mesh = RestMesh::subdivided_cube(1.0, 3);
        let a = VertexSet::from_rest(&mesh, 42);
        let b = VertexSet::from_rest(&mesh, 42);
        assert_eq!(a.seeds, b.seeds);
        assert_eq!(a.jitter_directions, b.jitter_directions);

        let c = VertexSet::from_rest(&mesh, 43);
        assert_ne!(a.seeds, c.seeds);
    }

    #[test]
    fn seeds_stay_in_range_and_directions_are_unit() {
        let mesh = RestMesh::subdivided_cube(1.0, 4);
        let set = VertexSet::from_rest(&mesh, 0);
        for seed in &set.seeds {
            assert!(*seed < 10_000);
        }
        for direction in &set.jitter_directions {
            assert!((direction.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn center_is_the_mean_not_the_pivot() {
        let mesh = RestMesh::new(
            vec![
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(2.0, 1.0, 0.0),
                Vec3::new(4.0, 1.0, 6.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        let set = VertexSet::from_rest(&mesh, 0);
        assert_eq!(set.center, Vec3::new(2.0, 1.0, 2.0));
    }

    #[test]
    fn top_classification_follows_rest_y_sign() {
        let mesh = RestMesh::subdivided_cube(1.0, 2);
        let set = VertexSet::from_rest(&mesh, 0);
        for (position, is_top) in set.rest.iter().zip(&set.is_top) {
            assert_eq!(*is_top, position.y > 0.0);
        }
    }
}
