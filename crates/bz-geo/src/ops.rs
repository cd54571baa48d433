//! Polygon operations on top of the `geo` crate.

use geo::{Area, BooleanOps, BoundingRect, Buffer, Contains, Geometry, MultiPolygon, Point, Rect};

use crate::error::GeoError;

/// Name of a geometry's variant, for error messages.
#[must_use]
pub const fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Whether the geometry belongs to the line family.
#[must_use]
pub const fn is_lineal(geometry: &Geometry<f64>) -> bool {
    matches!(
        geometry,
        Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_)
    )
}

/// View an areal geometry as a multipolygon.
///
/// # Errors
///
/// Returns [`GeoError::UnexpectedGeometry`] for points, lines, and collections.
pub fn as_multipolygon(geometry: &Geometry<f64>) -> Result<MultiPolygon<f64>, GeoError> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon.clone()])),
        Geometry::MultiPolygon(multi) => Ok(multi.clone()),
        Geometry::Rect(rect) => Ok(MultiPolygon::new(vec![rect.to_polygon()])),
        Geometry::Triangle(triangle) => Ok(MultiPolygon::new(vec![triangle.to_polygon()])),
        other => Err(GeoError::UnexpectedGeometry {
            found: geometry_name(other),
            expected: "Polygon",
        }),
    }
}

/// The points of a point or multipoint geometry.
///
/// # Errors
///
/// Returns [`GeoError::UnexpectedGeometry`] for any other geometry.
pub fn as_points(geometry: &Geometry<f64>) -> Result<Vec<Point<f64>>, GeoError> {
    match geometry {
        Geometry::Point(point) => Ok(vec![*point]),
        Geometry::MultiPoint(multi) => Ok(multi.0.clone()),
        other => Err(GeoError::UnexpectedGeometry {
            found: geometry_name(other),
            expected: "Point",
        }),
    }
}

#[must_use]
pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

#[must_use]
pub fn area(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.unsigned_area()
}

/// Buffer a line geometry into a corridor of `distance` on each side.
///
/// # Errors
///
/// Returns [`GeoError::UnexpectedGeometry`] for non-line input.
pub fn buffer(geometry: &Geometry<f64>, distance: f64) -> Result<MultiPolygon<f64>, GeoError> {
    match geometry {
        Geometry::Line(line) => Ok(line.buffer(distance)),
        Geometry::LineString(line) => Ok(line.buffer(distance)),
        Geometry::MultiLineString(lines) => Ok(lines.buffer(distance)),
        other => Err(GeoError::UnexpectedGeometry {
            found: geometry_name(other),
            expected: "LineString",
        }),
    }
}

/// Union a group of parts into one multipolygon.
#[must_use]
pub fn dissolve(parts: &[MultiPolygon<f64>]) -> MultiPolygon<f64> {
    parts
        .iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, part| acc.union(part))
}

/// Strict containment; points on the boundary are not counted.
#[must_use]
pub fn contains_point(polygon: &MultiPolygon<f64>, point: &Point<f64>) -> bool {
    polygon.contains(point)
}

#[must_use]
pub fn envelope(geometry: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    geometry.bounding_rect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon};
    use rstest::rstest;

    fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + side, y: y),
            (x: x + side, y: y + side),
            (x: x, y: y + side),
        ]])
    }

    #[test]
    fn intersection_area_of_offset_squares() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        let overlap = intersection(&a, &b);
        assert!((area(&overlap) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_squares_have_empty_intersection() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        assert!(area(&intersection(&a, &b)).abs() < f64::EPSILON);
    }

    #[test]
    fn buffered_line_is_a_corridor() {
        let line = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)]);
        let corridor = buffer(&line, 15.0).unwrap();
        // 100 x 30 rectangle plus two half-disc caps of radius 15.
        let expected = 100.0 * 30.0 + std::f64::consts::PI * 15.0 * 15.0;
        assert!((area(&corridor) - expected).abs() / expected < 0.01);
    }

    #[test]
    fn buffer_rejects_polygons() {
        let polygon = Geometry::MultiPolygon(square(0.0, 0.0, 1.0));
        assert!(matches!(
            buffer(&polygon, 15.0),
            Err(GeoError::UnexpectedGeometry { found: "MultiPolygon", .. })
        ));
    }

    #[test]
    fn dissolve_merges_adjacent_parts() {
        let merged = dissolve(&[square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0)]);
        assert!((area(&merged) - 2.0).abs() < 1e-9);
        assert!(dissolve(&[]).0.is_empty());
    }

    #[rstest]
    #[case(point!(x: 0.5, y: 0.5), true)]
    #[case(point!(x: 1.0, y: 0.5), false)]
    #[case(point!(x: 2.0, y: 2.0), false)]
    fn point_containment_is_strict(#[case] p: Point<f64>, #[case] inside: bool) {
        assert_eq!(contains_point(&square(0.0, 0.0, 1.0), &p), inside);
    }

    #[test]
    fn line_is_not_areal() {
        let line = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]);
        assert!(is_lineal(&line));
        assert!(as_multipolygon(&line).is_err());
        assert!(as_points(&line).is_err());
    }
}
