//! Procedural geometry and pixel data for the demo. Everything the demo
//! draws is generated here; no asset files are required.

use std::f32::consts::PI;

use aster_graph::MeshData;

/// Unit cube centred on the origin with per-face normals.
pub fn cube() -> MeshData {
    // (face normal, four corners in CCW order)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [0.5, -0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [0.5, 0.5, -0.5],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [0.5, -0.5, 0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, -0.5],
                [0.5, 0.5, 0.5],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [-0.5, -0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-0.5, 0.5, 0.5],
                [0.5, 0.5, 0.5],
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, -0.5, 0.5],
                [-0.5, -0.5, 0.5],
            ],
        ),
    ];

    let mut data = MeshData::default();
    for (normal, corners) in faces {
        let base = data.vertex_count() as u32;
        for (i, corner) in corners.iter().enumerate() {
            data.positions.extend_from_slice(corner);
            data.normals.extend_from_slice(&normal);
            let (u, v) = match i {
                0 => (0.0, 1.0),
                1 => (1.0, 1.0),
                2 => (1.0, 0.0),
                _ => (0.0, 0.0),
            };
            data.tex_coords.extend_from_slice(&[u, v]);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

/// Flat arrow for the compass, roughly unit-sized, pointing towards -y
/// (screen up once drawn with a top-left origin).
pub fn compass_arrow() -> MeshData {
    MeshData {
        positions: vec![
            0.0, -0.5, 0.0, // tip
            -0.35, 0.2, 0.0, //
            0.35, 0.2, 0.0, //
            -0.1, 0.2, 0.0, // tail
            0.1, 0.2, 0.0, //
            -0.1, 0.5, 0.0, //
            0.1, 0.5, 0.0,
        ],
        tex_coords: vec![0.5; 14],
        normals: vec![0.0, 0.0, 1.0].repeat(7),
        indices: vec![0, 1, 2, 3, 5, 6, 3, 6, 4],
    }
}

/// UV sphere used as the sky dome. The texture v coordinate runs from the
/// zenith (0) to the nadir (1) so a vertical gradient maps onto altitude.
pub fn sky_dome(radius: f32, slices: u32, stacks: u32) -> MeshData {
    let mut data = MeshData::default();
    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * 2.0 * PI;
            let x = radius * phi.sin() * theta.cos();
            let y = radius * phi.cos();
            let z = radius * phi.sin() * theta.sin();
            data.positions.extend_from_slice(&[x, y, z]);
            data.tex_coords.extend_from_slice(&[u, v]);
            // Normals point inward; the dome is viewed from inside.
            data.normals
                .extend_from_slice(&[-x / radius, -y / radius, -z / radius]);
        }
    }
    let stride = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * stride + slice;
            let b = a + stride;
            data.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    data
}

/// Two-tone checkerboard, RGBA8.
pub fn checkerboard_pixels(width: u32, height: u32, tile: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let dark = ((x / tile) + (y / tile)) % 2 == 0;
            if dark {
                pixels.extend_from_slice(&[0x3a, 0x5f, 0x3a, 0xff]);
            } else {
                pixels.extend_from_slice(&[0x8f, 0xb5, 0x8f, 0xff]);
            }
        }
    }
    pixels
}

/// Vertical sky gradient: deep blue at the zenith blending to a pale
/// horizon, mirrored for the lower half of the dome.
pub fn sky_gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let zenith = [0x2e_u8, 0x5c, 0xb8];
    let horizon = [0xcf_u8, 0xe4, 0xf7];
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        // 0 at top and bottom rows, 1 at the equator.
        let altitude = 1.0 - ((y as f32 / (height - 1).max(1) as f32) * 2.0 - 1.0).abs();
        for _ in 0..width {
            for c in 0..3 {
                let value = zenith[c] as f32 + (horizon[c] as f32 - zenith[c] as f32) * altitude;
                pixels.push(value as u8);
            }
            pixels.push(0xff);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_valid_with_face_normals() {
        let data = cube();
        assert!(data.validate().is_ok());
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.indices.len(), 36);
    }

    #[test]
    fn compass_arrow_is_valid() {
        assert!(compass_arrow().validate().is_ok());
    }

    #[test]
    fn sky_dome_is_valid_and_closed() {
        let data = sky_dome(1.0, 12, 8);
        assert!(data.validate().is_ok());
        assert_eq!(data.vertex_count(), 13 * 9);
        assert_eq!(data.indices.len() as u32, 12 * 8 * 6);
    }

    #[test]
    fn pixel_buffers_have_rgba_stride() {
        assert_eq!(checkerboard_pixels(8, 4, 2).len(), 8 * 4 * 4);
        assert_eq!(sky_gradient_pixels(4, 16).len(), 4 * 16 * 4);
    }
}
