//! Auto-rotating lit globe with markers at arc endpoints.

pub mod arcs;
pub mod camera;
pub mod config;
pub mod controls;
pub mod lights;

pub use arcs::*;
pub use camera::{Mat4, PerspectiveCamera};
pub use config::*;
pub use controls::OrbitControls;
pub use lights::*;

use tracing::debug;

use crate::error::GlobeError;
use crate::viewport::SurfaceSize;

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeState {
    pub config: GlobeConfig,
    pub arcs: Vec<Arc>,
    pub points: Vec<GlobePoint>,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub lights: GlobeLights,
    pub material: GlobeMaterial,
    pub atmosphere: Option<Atmosphere>,
    /// Current drawing-surface size.
    pub size: SurfaceSize,
}

impl GlobeState {
    /// Builds the scene for a canvas of `canvas` client size. The camera keeps
    /// its initial aspect until the first resize.
    pub fn new(
        config: GlobeConfig,
        arcs: Vec<Arc>,
        canvas: SurfaceSize,
    ) -> Result<Self, GlobeError> {
        config.validate()?;
        let points = build_points(&arcs, config.point_size)?;

        let mut camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::new(config.auto_rotate, config.auto_rotate_speed);
        if let Some(position) = config.initial_position {
            controls.look_at_lat_lng(&mut camera, position);
        }

        debug!(points = points.len(), arcs = arcs.len(), "globe scene built");
        Ok(Self {
            lights: GlobeLights::from_config(&config),
            material: config.material(),
            atmosphere: config.atmosphere(),
            config,
            arcs,
            points,
            camera,
            controls,
            size: canvas,
        })
    }

    /// Replaces the arc list and rebuilds every point. On error the previous
    /// arcs and points are kept.
    pub fn set_arcs(&mut self, arcs: Vec<Arc>) -> Result<(), GlobeError> {
        self.points = build_points(&arcs, self.config.point_size)?;
        self.arcs = arcs;
        Ok(())
    }

    /// Applies a resize and returns the new surface size.
    ///
    /// With [`ResizeBasis::Window`] the window dimensions drive both the
    /// camera aspect and the surface, even though the canvas may be smaller.
    pub fn resize(&mut self, window: SurfaceSize, container: SurfaceSize) -> SurfaceSize {
        let size = match self.config.resize_basis {
            ResizeBasis::Window => window,
            ResizeBasis::Container => container,
        };
        self.camera.set_aspect(size.aspect());
        self.size = size;
        size
    }

    /// One frame of control state: auto-rotation plus any pending drag.
    pub fn advance(&mut self) {
        self.controls.update(&mut self.camera);
    }

    pub fn view_proj(&self) -> Mat4 {
        self.camera.view_proj()
    }
}

#[cfg(test)]
mod tests {
    use super::{Arc, GlobeConfig, GlobeState, ResizeBasis};
    use crate::error::GlobeError;
    use crate::viewport::SurfaceSize;
    use foundation::math::LatLng;
    use pretty_assertions::assert_eq;

    fn arcs() -> Vec<Arc> {
        vec![Arc {
            order: 1,
            start_lat: -19.885592,
            start_lng: -43.951191,
            end_lat: -22.9068,
            end_lng: -43.1729,
            arc_alt: 0.1,
            color: "#06b6d4".to_string(),
        }]
    }

    #[test]
    fn new_scene_keeps_initial_aspect() {
        let state = GlobeState::new(
            GlobeConfig::default(),
            arcs(),
            SurfaceSize::from_measured(600.0, 600.0),
        )
        .unwrap();
        assert_eq!(state.points.len(), 2);
        assert_eq!(state.camera.aspect, 1.2);
        assert_eq!(state.size, SurfaceSize::from_measured(600.0, 600.0));
    }

    #[test]
    fn window_resize_uses_window_dimensions_by_default() {
        let mut state =
            GlobeState::new(GlobeConfig::default(), arcs(), SurfaceSize::from_measured(600.0, 600.0))
                .unwrap();
        let window = SurfaceSize::from_measured(1600.0, 800.0);
        let container = SurfaceSize::from_measured(600.0, 600.0);
        assert_eq!(state.resize(window, container), window);
        assert_eq!(state.camera.aspect, 2.0);

        state.config.resize_basis = ResizeBasis::Container;
        assert_eq!(state.resize(window, container), container);
        assert_eq!(state.camera.aspect, 1.0);
    }

    #[test]
    fn failed_data_update_keeps_previous_points() {
        let mut state = GlobeState::new(
            GlobeConfig::default(),
            arcs(),
            SurfaceSize::from_measured(10.0, 10.0),
        )
        .unwrap();
        let mut bad = arcs();
        bad[0].color = "#12345".to_string();
        assert!(matches!(
            state.set_arcs(bad),
            Err(GlobeError::InvalidColor { order: 1, .. })
        ));
        assert_eq!(state.points.len(), 2);
        assert_eq!(state.arcs, arcs());

        state.set_arcs(Vec::new()).unwrap();
        assert!(state.points.is_empty());
    }

    #[test]
    fn initial_position_orients_the_camera() {
        let config = GlobeConfig {
            initial_position: Some(LatLng::new(0.0, 90.0)),
            auto_rotate: false,
            ..GlobeConfig::default()
        };
        let mut state =
            GlobeState::new(config, arcs(), SurfaceSize::from_measured(10.0, 10.0)).unwrap();
        assert!((state.camera.position.x - 300.0).abs() < 1e-9);
        state.advance();
        assert!((state.camera.position.x - 300.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GlobeConfig {
            point_size: f64::INFINITY,
            ..GlobeConfig::default()
        };
        assert!(matches!(
            GlobeState::new(config, arcs(), SurfaceSize::from_measured(1.0, 1.0)),
            Err(GlobeError::Config(_))
        ));
    }
}
