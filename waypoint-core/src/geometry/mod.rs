//! Geometry primitives used while parsing survey data and routing
//!
//! Survey data stores positions as `(lat, lon)`; `geo` types use
//! `x = lon, y = lat` and the helpers here convert between the two.

mod spatial_index;

use geo::{Contains, Coord, Distance, Euclidean, Haversine, LineString, Point, Polygon};

pub use spatial_index::{NodeSpatialIndex, PolygonSpatialIndex};

/// Axis-aligned bounding box in `(lat, lon)` corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ne: (f64, f64),
    pub sw: (f64, f64),
}

impl BoundingBox {
    pub fn from_vertices(vertices: &[(f64, f64)]) -> Option<Self> {
        let (&(lat, lon), rest) = vertices.split_first()?;
        let init = Self {
            ne: (lat, lon),
            sw: (lat, lon),
        };
        Some(rest.iter().fold(init, |bbox, &(lat, lon)| Self {
            ne: (bbox.ne.0.max(lat), bbox.ne.1.max(lon)),
            sw: (bbox.sw.0.min(lat), bbox.sw.1.min(lon)),
        }))
    }

    /// Inclusive test, used as a fast reject before exact containment
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.sw.0 && lat <= self.ne.0 && lon >= self.sw.1 && lon <= self.ne.1
    }

    /// Corners as `[lon, lat]` arrays, lower corner first
    pub(crate) fn corners(&self) -> ([f64; 2], [f64; 2]) {
        ([self.sw.1, self.sw.0], [self.ne.1, self.ne.0])
    }
}

/// Converts a `(lat, lon)` ring to a `geo` polygon. The ring is closed if needed.
pub fn ring_to_polygon(vertices: &[(f64, f64)]) -> Polygon<f64> {
    let exterior: LineString<f64> = vertices
        .iter()
        .map(|&(lat, lon)| Coord { x: lon, y: lat })
        .collect();
    Polygon::new(exterior, vec![])
}

/// Strict point-in-polygon test, points on the boundary are outside
pub fn point_in_ring(shape: &Polygon<f64>, lat: f64, lon: f64) -> bool {
    shape.contains(&Point::new(lon, lat))
}

/// Euclidean distance in degrees, adequate at room scale
pub fn planar_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Euclidean.distance(a, b)
}

/// Great-circle distance in metres
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_from_ring() {
        let bbox = BoundingBox::from_vertices(&[(1.0, 5.0), (3.0, 2.0), (2.0, 4.0)]).unwrap();
        assert_eq!(bbox.ne, (3.0, 5.0));
        assert_eq!(bbox.sw, (1.0, 2.0));
        assert!(bbox.contains(3.0, 2.0));
        assert!(!bbox.contains(3.1, 2.0));
        assert!(BoundingBox::from_vertices(&[]).is_none());
    }

    #[test]
    fn ring_uses_lon_as_x() {
        // Tall thin rectangle: 10 degrees of latitude, 1 of longitude
        let shape = ring_to_polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]);
        assert!(point_in_ring(&shape, 9.0, 0.5));
        assert!(!point_in_ring(&shape, 0.5, 9.0));
    }

    #[test]
    fn distances() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-12);

        // One degree of latitude is roughly 111 km
        let metres = haversine_distance(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((metres - 111_195.0).abs() < 100.0);
    }
}
