//! Road network components - nodes and arcs

use geo::{LineString, Point};

use crate::{Error, Meters, Seconds};

/// Road graph node (an intersection or a waypoint)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// External (e.g. OSM) ID of the node
    pub id: i64,
    /// Node coordinates
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn new(id: i64, geometry: Point<f64>) -> Self {
        Self { id, geometry }
    }
}

/// Directed road graph arc (street segment).
///
/// Several arcs may connect the same ordered pair of nodes, so an arc is
/// always addressed by its own [`ArcId`](crate::ArcId) and never by its
/// endpoints.
#[derive(Debug, Clone)]
pub struct RoadArc {
    length: Meters,
    minimum_travel_time: Seconds,
    /// Optional geometry for visualization
    pub geometry: Option<LineString<f64>>,
}

impl RoadArc {
    /// Creates an arc whose free-flow travel time is derived from the speed
    /// limit (km/h).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for a negative or non-finite length, or
    /// a speed limit that is not strictly positive.
    pub fn new(length: Meters, speed_limit: f64) -> Result<Self, Error> {
        if !(speed_limit.is_finite() && speed_limit > 0.0) {
            return Err(Error::InvalidData(format!(
                "Speed limit must be positive, got {speed_limit}"
            )));
        }
        Self::with_travel_time(length, length * 3600.0 / (speed_limit * 1000.0))
    }

    /// Creates an arc with an explicit free-flow travel time in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if either value is negative or not finite.
    pub fn with_travel_time(length: Meters, minimum_travel_time: Seconds) -> Result<Self, Error> {
        if !(length.is_finite() && length >= 0.0) {
            return Err(Error::InvalidData(format!(
                "Arc length must be a non-negative number of meters, got {length}"
            )));
        }
        if !(minimum_travel_time.is_finite() && minimum_travel_time >= 0.0) {
            return Err(Error::InvalidData(format!(
                "Arc travel time must be a non-negative number of seconds, got {minimum_travel_time}"
            )));
        }
        Ok(Self {
            length,
            minimum_travel_time,
            geometry: None,
        })
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: LineString<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Length in meters
    pub fn length(&self) -> Meters {
        self.length
    }

    /// Time to travel the arc at its speed limit, in seconds
    pub fn minimum_travel_time(&self) -> Seconds {
        self.minimum_travel_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_time_is_derived_from_speed_limit() {
        let arc = RoadArc::new(1000.0, 36.0).unwrap();
        assert!((arc.minimum_travel_time() - 100.0).abs() < 1e-9);
        assert_eq!(arc.length(), 1000.0);
    }

    #[test]
    fn rejects_invalid_attributes() {
        assert!(matches!(RoadArc::new(10.0, 0.0), Err(Error::InvalidData(_))));
        assert!(matches!(RoadArc::new(-1.0, 50.0), Err(Error::InvalidData(_))));
        assert!(matches!(
            RoadArc::with_travel_time(10.0, f64::NAN),
            Err(Error::InvalidData(_))
        ));
        assert!(RoadArc::with_travel_time(0.0, 0.0).is_ok());
    }
}
