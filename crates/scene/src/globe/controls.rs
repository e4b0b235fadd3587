use std::f64::consts::PI;

use foundation::math::{LatLng, Vec3, lat_lng_to_point};

use super::camera::{CAMERA_Z, PerspectiveCamera};

pub const MIN_POLAR_ANGLE: f64 = PI / 3.5;
pub const MAX_POLAR_ANGLE: f64 = PI - PI / 3.0;

/// Drag-to-rotate camera controls orbiting the origin at a fixed distance.
///
/// Angles are spherical around +Y: `theta` is the azimuth measured from +Z
/// towards +X, `phi` the polar angle from +Y. Pan and zoom are not supported.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    pub rotate_speed: f64,
    delta_theta: f64,
    delta_phi: f64,
    drag: Option<(f64, f64)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            min_distance: CAMERA_Z,
            max_distance: CAMERA_Z,
            min_polar_angle: MIN_POLAR_ANGLE,
            max_polar_angle: MAX_POLAR_ANGLE,
            auto_rotate: true,
            auto_rotate_speed: 1.0,
            rotate_speed: 1.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            drag: None,
        }
    }
}

fn spherical(offset: Vec3) -> (f64, f64, f64) {
    let radius = offset.length();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let theta = offset.x.atan2(offset.z);
    let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
    (radius, theta, phi)
}

fn from_spherical(radius: f64, theta: f64, phi: f64) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

impl OrbitControls {
    pub fn new(auto_rotate: bool, auto_rotate_speed: f64) -> Self {
        Self {
            auto_rotate,
            auto_rotate_speed,
            ..Self::default()
        }
    }

    /// Azimuth step applied on every update while auto-rotating; speed 1 is
    /// one revolution per minute at 60 updates per second.
    pub fn auto_rotation_angle(&self) -> f64 {
        2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed
    }

    pub fn rotate_left(&mut self, angle: f64) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f64) {
        self.delta_phi -= angle;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag = Some((x, y));
    }

    /// Both axes rotate by a full turn per `client_height` pixels dragged.
    pub fn pointer_move(&mut self, x: f64, y: f64, client_height: f64) {
        let Some((last_x, last_y)) = self.drag else {
            return;
        };
        let height = client_height.max(1.0);
        self.rotate_left(2.0 * PI * (x - last_x) / height * self.rotate_speed);
        self.rotate_up(2.0 * PI * (y - last_y) / height * self.rotate_speed);
        self.drag = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Places the camera above `coord`, clamped to the polar limits.
    pub fn look_at_lat_lng(&mut self, camera: &mut PerspectiveCamera, coord: LatLng) {
        let distance = (camera.position - camera.target).length();
        let (_, theta, phi) = spherical(lat_lng_to_point(coord, 1.0));
        let phi = phi.clamp(self.min_polar_angle, self.max_polar_angle);
        let radius = distance.clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + from_spherical(radius, theta, phi);
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
    }

    /// Applies pending rotation (and one auto-rotation step) to `camera`.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let (radius, mut theta, mut phi) = spherical(camera.position - camera.target);

        if self.auto_rotate && !self.is_dragging() {
            self.rotate_left(self.auto_rotation_angle());
        }

        theta += self.delta_theta;
        phi = (phi + self.delta_phi).clamp(self.min_polar_angle, self.max_polar_angle);
        let radius = radius.clamp(self.min_distance, self.max_distance);

        camera.position = camera.target + from_spherical(radius, theta, phi);
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_POLAR_ANGLE, MIN_POLAR_ANGLE, OrbitControls, spherical};
    use crate::globe::camera::PerspectiveCamera;
    use foundation::math::LatLng;
    use std::f64::consts::PI;

    fn angles(camera: &PerspectiveCamera) -> (f64, f64, f64) {
        spherical(camera.position - camera.target)
    }

    #[test]
    fn first_update_clamps_the_polar_angle_and_keeps_distance() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new(false, 1.0);
        controls.update(&mut camera);
        let (radius, theta, phi) = angles(&camera);
        assert!((radius - 300.0).abs() < 1e-9);
        assert!(theta.abs() < 1e-12);
        // Starting at the equator (phi = pi/2) is already inside the limits.
        assert!((phi - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn auto_rotation_turns_once_per_minute() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        for _ in 0..1800 {
            controls.update(&mut camera);
        }
        // Half a minute at 60 updates per second: opposite side of the globe.
        let (_, theta, _) = angles(&camera);
        assert!((theta.abs() - PI).abs() < 1e-6, "theta {theta}");
    }

    #[test]
    fn auto_rotation_is_westward_and_scales_with_speed() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new(true, 2.0);
        controls.update(&mut camera);
        let (_, theta, _) = angles(&camera);
        assert!((theta + 2.0 * PI / 1800.0).abs() < 1e-12);
    }

    #[test]
    fn drag_rotates_and_respects_polar_limits() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new(false, 1.0);

        controls.pointer_move(50.0, 0.0, 500.0);
        controls.update(&mut camera);
        assert!(angles(&camera).1.abs() < 1e-12, "move without press is ignored");

        controls.pointer_down(0.0, 0.0);
        controls.pointer_move(-125.0, 0.0, 500.0);
        controls.update(&mut camera);
        assert!((angles(&camera).1 - PI / 2.0).abs() < 1e-9);

        controls.pointer_move(-125.0, 10_000.0, 500.0);
        controls.update(&mut camera);
        assert!((angles(&camera).2 - MIN_POLAR_ANGLE).abs() < 1e-9);

        controls.pointer_move(-125.0, -10_000.0, 500.0);
        controls.update(&mut camera);
        assert!((angles(&camera).2 - MAX_POLAR_ANGLE).abs() < 1e-9);

        controls.pointer_up();
        assert!(!controls.is_dragging());
    }

    #[test]
    fn dragging_pauses_auto_rotation() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.pointer_down(10.0, 10.0);
        controls.update(&mut camera);
        assert!(angles(&camera).1.abs() < 1e-12);
    }

    #[test]
    fn initial_position_faces_the_coordinate() {
        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.look_at_lat_lng(&mut camera, LatLng::new(0.0, 90.0));
        let (radius, theta, phi) = angles(&camera);
        assert!((radius - 300.0).abs() < 1e-9);
        assert!((theta - PI / 2.0).abs() < 1e-9);
        assert!((phi - PI / 2.0).abs() < 1e-9);

        // The north pole is beyond the polar limit.
        controls.look_at_lat_lng(&mut camera, LatLng::new(90.0, 0.0));
        assert!((angles(&camera).2 - MIN_POLAR_ANGLE).abs() < 1e-9);
    }
}
