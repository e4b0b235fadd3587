use super::Vec3;

/// Radius of the rendered globe, in scene units.
pub const GLOBE_RADIUS: f64 = 100.0;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Converts a lat/lng pair to a point on a sphere of `radius` centred at the
/// origin, with +Y through the north pole and (0, 0) on the +Z axis.
pub fn lat_lng_to_point(coord: LatLng, radius: f64) -> Vec3 {
    let phi = (90.0 - coord.lat).to_radians();
    let theta = (90.0 - coord.lng).to_radians();

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// East and north unit vectors of the tangent plane at `coord`.
///
/// At the poles east is undefined; an arbitrary but stable basis is returned.
pub fn tangent_basis(coord: LatLng) -> (Vec3, Vec3) {
    let normal = lat_lng_to_point(coord, 1.0);
    let mut east = Vec3::Y.cross(normal);
    if east.length() < 1e-9 {
        east = Vec3::new(1.0, 0.0, 0.0);
    }
    let east = east.normalized();
    let north = normal.cross(east).normalized();
    (east, north)
}

#[cfg(test)]
mod tests {
    use super::{GLOBE_RADIUS, LatLng, lat_lng_to_point, tangent_basis};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_positive_z() {
        let p = lat_lng_to_point(LatLng::new(0.0, 0.0), GLOBE_RADIUS);
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
        assert_close(p.z, GLOBE_RADIUS, 1e-9);
    }

    #[test]
    fn north_pole_maps_to_positive_y() {
        let p = lat_lng_to_point(LatLng::new(90.0, 45.0), 2.0);
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, 2.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
    }

    #[test]
    fn ninety_east_maps_to_positive_x() {
        let p = lat_lng_to_point(LatLng::new(0.0, 90.0), 1.0);
        assert_close(p.x, 1.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
    }

    #[test]
    fn points_lie_on_the_sphere() {
        for (lat, lng) in [(10.0, 20.0), (-33.9, 151.2), (51.5, -0.1), (-90.0, 0.0)] {
            let p = lat_lng_to_point(LatLng::new(lat, lng), GLOBE_RADIUS);
            assert_close(p.length(), GLOBE_RADIUS, 1e-9);
        }
    }

    #[test]
    fn tangent_basis_is_orthonormal() {
        for (lat, lng) in [(0.0, 0.0), (45.0, 120.0), (90.0, 0.0)] {
            let coord = LatLng::new(lat, lng);
            let normal = lat_lng_to_point(coord, 1.0);
            let (east, north) = tangent_basis(coord);
            assert_close(east.length(), 1.0, 1e-9);
            assert_close(north.length(), 1.0, 1e-9);
            assert_close(east.dot(north), 0.0, 1e-9);
            assert_close(east.dot(normal), 0.0, 1e-9);
        }
    }
}
