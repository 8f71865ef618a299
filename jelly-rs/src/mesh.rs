use glam::Vec3;

use crate::JellyError;

/// The undeformed mesh template. Shared between bodies, never mutated;
/// each body clones the positions it needs at attach time.
#[derive(Clone, Debug)]
pub struct RestMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl RestMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, JellyError> {
        if positions.is_empty() {
            return Err(JellyError::EmptyMesh);
        }
        Ok(RestMesh { positions, indices })
    }

    /// Axis-aligned cube centered on the origin, each face an
    /// `segments` x `segments` quad grid. Face edges are not welded, which
    /// keeps the generator simple and the face normals crisp.
    pub fn subdivided_cube(half_extent: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let side = segments + 1;

        // (normal, u axis, v axis) per face
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];

        let mut positions = Vec::with_capacity(faces.len() * (side * side) as usize);
        let mut indices = Vec::with_capacity(faces.len() * (segments * segments * 6) as usize);

        for (normal, u_axis, v_axis) in faces {
            let base = positions.len() as u32;
            for v in 0..side {
                for u in 0..side {
                    let fu = u as f32 / segments as f32 * 2.0 - 1.0;
                    let fv = v as f32 / segments as f32 * 2.0 - 1.0;
                    positions.push((normal + u_axis * fu + v_axis * fv) * half_extent);
                }
            }
            for v in 0..segments {
                for u in 0..segments {
                    let corner = base + v * side + u;
                    indices.extend_from_slice(&[
                        corner,
                        corner + 1,
                        corner + side,
                        corner + 1,
                        corner + side + 1,
                        corner + side,
                    ]);
                }
            }
        }

        RestMesh { positions, indices }
    }
}

/// The renderable side of a body: committed vertex positions plus the
/// geometry derived from them. The host uploads this after draining the
/// dirty flag; the simulation never touches GPU resources.
#[derive(Clone, Debug)]
pub struct DeformedMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    bounds_min: Vec3,
    bounds_max: Vec3,
    dirty: bool,
}

impl DeformedMesh {
    pub fn from_rest(mesh: &RestMesh) -> Self {
        let mut deformed = DeformedMesh {
            positions: mesh.positions.clone(),
            normals: vec![Vec3::ZERO; mesh.positions.len()],
            indices: mesh.indices.clone(),
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::ZERO,
            dirty: false,
        };
        deformed.recalculate_normals();
        deformed.recalculate_bounds();
        deformed
    }

    /// Writes the working vertex buffer in and recomputes normals and
    /// bounds. A length mismatch can only come from a corrupted attach, so
    /// it is surfaced as a fatal error.
    pub fn commit(&mut self, working: &[Vec3]) -> Result<(), JellyError> {
        if working.len() != self.positions.len() {
            return Err(JellyError::VertexCountMismatch {
                expected: self.positions.len(),
                actual: working.len(),
            });
        }
        self.positions.copy_from_slice(working);
        self.recalculate_normals();
        self.recalculate_bounds();
        self.dirty = true;
        Ok(())
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bounds_min, self.bounds_max)
    }

    pub fn bounds_center(&self) -> Vec3 {
        (self.bounds_min + self.bounds_max) * 0.5
    }

    /// True once per commit; the renderer drains this to know when to
    /// re-upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    // Area-weighted vertex normals: accumulating the raw cross product per
    // triangle weighs large triangles more, which is what we want for a
    // mesh that squashes and stretches.
    fn recalculate_normals(&mut self) {
        self.normals.fill(Vec3::ZERO);
        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    fn recalculate_bounds(&mut self) {
        let mut min = self.positions[0];
        let mut max = self.positions[0];
        for position in &self.positions[1..] {
            min = min.min(*position);
            max = max.max(*position);
        }
        self.bounds_min = min;
        self.bounds_max = max;
    }
}
