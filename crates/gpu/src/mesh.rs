use foundation::math::{GLOBE_RADIUS, lat_lng_to_point, tangent_basis};
use scene::globe::GlobePoint;

/// Clip-space quad vertex for the reveal program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

/// Two triangles spanning clip space `-1..1`.
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// UV sphere of `radius` around the origin, indexed as a triangle list.
pub fn sphere_mesh(
    radius: f32,
    lat_segments: u32,
    lon_segments: u32,
) -> (Vec<MeshVertex>, Vec<u16>) {
    let lat_segments = lat_segments.clamp(3, 255);
    // u16 indices.
    let lon_segments = lon_segments.clamp(3, 65_535 / (lat_segments + 1) - 1);

    let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
    for lat in 0..=lat_segments {
        let theta = lat as f32 / lat_segments as f32 * std::f32::consts::PI;
        let (sin_t, cos_t) = theta.sin_cos();

        for lon in 0..=lon_segments {
            let phi = lon as f32 / lon_segments as f32 * std::f32::consts::TAU;
            let (sin_p, cos_p) = phi.sin_cos();

            let n = [sin_t * cos_p, cos_t, sin_t * sin_p];
            vertices.push(MeshVertex {
                position: n.map(|c| c * radius),
                normal: n,
            });
        }
    }

    let stride = lon_segments + 1;
    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            indices.extend([i0, i2, i1, i1, i2, i3].map(|i| i as u16));
        }
    }

    (vertices, indices)
}

/// Markers sit this far above the surface to stay clear of the globe's depth.
pub const MARKER_LIFT: f64 = 0.2;

/// One tangent quad per point, `size` degrees across, colored `color_at(0)`.
pub fn marker_mesh(points: &[GlobePoint]) -> Vec<MarkerVertex> {
    let mut out = Vec::with_capacity(points.len() * 6);
    for point in points {
        let coord = point.lat_lng();
        let center = lat_lng_to_point(coord, GLOBE_RADIUS + MARKER_LIFT);
        let (east, north) = tangent_basis(coord);
        let half = GLOBE_RADIUS * (point.size / 2.0).to_radians();
        let (e, n) = (east.scale(half), north.scale(half));

        let corners = [center - e - n, center + e - n, center + e + n, center - e + n];
        let color = point.color_at(0.0).to_f32_array();
        for i in [0, 1, 2, 0, 2, 3] {
            out.push(MarkerVertex {
                position: corners[i].to_f32_array(),
                color,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{FULLSCREEN_QUAD, marker_mesh, sphere_mesh};
    use foundation::color::Rgb;
    use pretty_assertions::assert_eq;
    use scene::globe::GlobePoint;

    #[test]
    fn quad_covers_clip_space() {
        let xs: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let (vertices, indices) = sphere_mesh(100.0, 16, 32);
        assert_eq!(vertices.len(), 17 * 33);
        assert_eq!(indices.len(), 16 * 32 * 6);
        for v in &vertices {
            let [x, y, z] = v.position;
            assert!(((x * x + y * y + z * z).sqrt() - 100.0).abs() < 1e-3);
        }
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn oversized_sphere_still_fits_u16() {
        let (vertices, indices) = sphere_mesh(1.0, 255, 1024);
        assert!(vertices.len() <= 65_536);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn markers_are_colored_quads_above_the_surface() {
        let points = vec![GlobePoint {
            size: 1.0,
            order: 0,
            color: Rgb::new(255, 0, 0),
            lat: 10.0,
            lng: 20.0,
        }];
        let mesh = marker_mesh(&points);
        assert_eq!(mesh.len(), 6);
        for v in &mesh {
            assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
            let [x, y, z] = v.position;
            assert!((x * x + y * y + z * z).sqrt() > 100.0);
        }
    }
}
