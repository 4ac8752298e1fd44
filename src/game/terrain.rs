//! Procedural terrain: a regular grid displaced by a smooth height
//! function, with analytic-by-difference normals.

use aster_graph::MeshData;

/// Texture repeats across the whole terrain patch.
const TEXTURE_TILES: f32 = 16.0;

fn height_at(x: f32, z: f32, amplitude: f32) -> f32 {
    amplitude * ((x * 0.35).sin() * (z * 0.35).cos() + 0.4 * (x * 0.9 + z * 0.6).sin())
}

/// Builds a `(grid + 1)²`-vertex terrain patch spanning `extent` world units
/// on each side, centred on the origin in the xz plane.
pub fn generate(grid: u32, extent: f32, amplitude: f32) -> MeshData {
    let mut data = MeshData::default();
    let step = extent / grid as f32;
    let half = extent / 2.0;
    let eps = step * 0.5;

    for row in 0..=grid {
        let z = row as f32 * step - half;
        for col in 0..=grid {
            let x = col as f32 * step - half;
            data.positions
                .extend_from_slice(&[x, height_at(x, z, amplitude), z]);
            data.tex_coords.extend_from_slice(&[
                col as f32 / grid as f32 * TEXTURE_TILES,
                row as f32 / grid as f32 * TEXTURE_TILES,
            ]);

            // Central difference of the height field.
            let dx = height_at(x - eps, z, amplitude) - height_at(x + eps, z, amplitude);
            let dz = height_at(x, z - eps, amplitude) - height_at(x, z + eps, amplitude);
            let len = (dx * dx + 4.0 * eps * eps + dz * dz).sqrt();
            data.normals
                .extend_from_slice(&[dx / len, 2.0 * eps / len, dz / len]);
        }
    }

    let stride = grid + 1;
    for row in 0..grid {
        for col in 0..grid {
            let a = row * stride + col;
            let b = a + stride;
            data.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_expected_counts_and_validates() {
        let data = generate(16, 20.0, 1.0);
        assert_eq!(data.vertex_count(), 17 * 17);
        assert_eq!(data.indices.len() as u32, 16 * 16 * 6);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn normals_are_unit_length_and_point_up() {
        let data = generate(8, 10.0, 0.5);
        for normal in data.normals.chunks(3) {
            let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
            assert!(normal[1] > 0.0);
        }
    }

    #[test]
    fn flat_terrain_has_vertical_normals() {
        let data = generate(4, 8.0, 0.0);
        for normal in data.normals.chunks(3) {
            assert!((normal[1] - 1.0).abs() < 1e-6);
        }
    }
}
