use std::collections::HashSet;

use foundation::color::{Rgb, Rgba, hex_to_rgb};
use foundation::math::{GLOBE_RADIUS, LatLng, Vec3, lat_lng_to_point};
use serde::{Deserialize, Serialize};

use crate::error::GlobeError;

/// Directed connection between two geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub order: i64,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    #[serde(default)]
    pub arc_alt: f64,
    pub color: String,
}

impl Arc {
    pub fn start(&self) -> LatLng {
        LatLng::new(self.start_lat, self.start_lng)
    }

    pub fn end(&self) -> LatLng {
        LatLng::new(self.end_lat, self.end_lng)
    }
}

pub fn arcs_from_json(json: &str) -> Result<Vec<Arc>, GlobeError> {
    Ok(serde_json::from_str(json)?)
}

/// A marker derived from an arc endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobePoint {
    pub size: f64,
    pub order: i64,
    pub color: Rgb,
    pub lat: f64,
    pub lng: f64,
}

impl GlobePoint {
    /// Marker color faded by `t` (0 fully visible, 1 fully faded).
    pub fn color_at(&self, t: f64) -> Rgba {
        self.color.faded(t)
    }

    pub fn css_at(&self, t: f64) -> String {
        self.color_at(t).to_css()
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Position on the globe surface.
    pub fn position(&self) -> Vec3 {
        lat_lng_to_point(self.lat_lng(), GLOBE_RADIUS)
    }
}

// IEEE equality on both axes, so 0.0 and -0.0 share a key.
fn coord_key(coord: LatLng) -> (u64, u64) {
    let bits = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    (bits(coord.lat), bits(coord.lng))
}

/// Start and end point of every arc, in input order, with exact duplicates
/// (by lat/lng) collapsed onto the first occurrence.
pub fn build_points(arcs: &[Arc], point_size: f64) -> Result<Vec<GlobePoint>, GlobeError> {
    let mut seen = HashSet::with_capacity(arcs.len() * 2);
    let mut points = Vec::with_capacity(arcs.len() * 2);

    for arc in arcs {
        let color = hex_to_rgb(&arc.color).ok_or_else(|| GlobeError::InvalidColor {
            order: arc.order,
            value: arc.color.clone(),
        })?;

        for coord in [arc.start(), arc.end()] {
            if !coord.is_finite() {
                return Err(GlobeError::NonFiniteCoordinate { order: arc.order });
            }
            if seen.insert(coord_key(coord)) {
                points.push(GlobePoint {
                    size: point_size,
                    order: arc.order,
                    color,
                    lat: coord.lat,
                    lng: coord.lng,
                });
            }
        }
    }

    Ok(points)
}
