use geo::Point;

use crate::error::CoverageError;

/// Continental France. Coverage data only exists inside this box, so
/// anything outside it gets rejected before the resolver runs.
pub const FRANCE: Region = Region {
    min_lat: 41.59101,
    max_lat: 51.03457,
    min_lon: -4.65,
    max_lon: 9.45,
};

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Region {
    /// Strict interior check. Points exactly on an edge do not count.
    pub fn contains(&self, point: Point) -> bool {
        point.y() > self.min_lat
            && point.y() < self.max_lat
            && point.x() > self.min_lon
            && point.x() < self.max_lon
    }

    /// Checks a geocoding result: `None` means the address could not be
    /// found, out-of-box points are unsupported.
    pub fn validate(&self, point: Option<Point>) -> Result<Point, CoverageError> {
        let point = point.ok_or(CoverageError::AddressNotFound)?;
        if !self.contains(point) {
            return Err(CoverageError::OutOfRegion);
        }
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_points_pass() {
        // Dijon and Toulouse
        assert!(FRANCE.contains(Point::new(5.0392644, 47.3113753)));
        assert!(FRANCE.contains(Point::new(1.457871, 43.6120665)));
    }

    #[test]
    fn edges_and_exterior_fail() {
        // Barcelona
        assert!(!FRANCE.contains(Point::new(2.154007, 41.390205)));
        // every edge is excluded
        assert!(!FRANCE.contains(Point::new(5.0, 41.59101)));
        assert!(!FRANCE.contains(Point::new(5.0, 51.03457)));
        assert!(!FRANCE.contains(Point::new(-4.65, 47.0)));
        assert!(!FRANCE.contains(Point::new(9.45, 47.0)));
    }

    #[test]
    fn validate_maps_failures() {
        assert_eq!(FRANCE.validate(None), Err(CoverageError::AddressNotFound));
        assert_eq!(
            FRANCE.validate(Some(Point::new(2.154007, 41.390205))),
            Err(CoverageError::OutOfRegion)
        );
        let p = Point::new(5.0392644, 47.3113753);
        assert_eq!(FRANCE.validate(Some(p)), Ok(p));
    }
}
