//! Field boundary geometry
//!
//! Reduces a field polygon to the single coordinate used to look up weather.
//! Latitude plays the role of x and longitude of y throughout.

use rust_decimal::Decimal;

use crate::types::GpsCoordinates;

/// Areas below this (in squared degrees) are treated as degenerate
pub fn area_epsilon() -> Decimal {
    Decimal::new(1, 12)
}

/// Signed area of the closed polygon (shoelace formula)
///
/// Positive for counter-clockwise traversal in (latitude, longitude) space.
pub fn signed_area(vertices: &[GpsCoordinates]) -> Decimal {
    edges(vertices)
        .map(|(a, b)| cross(a, b))
        .sum::<Decimal>()
        / Decimal::from(2)
}

/// Centroid of a field polygon
///
/// Returns `None` for an empty vertex list. Collinear, single-point or
/// otherwise zero-area input resolves to the first vertex.
pub fn polygon_centroid(vertices: &[GpsCoordinates]) -> Option<GpsCoordinates> {
    let first = *vertices.first()?;

    let area = signed_area(vertices);
    if area.abs() < area_epsilon() {
        return Some(first);
    }

    let (sum_x, sum_y) = edges(vertices).fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(sum_x, sum_y), (a, b)| {
            let f = cross(a, b);
            (
                sum_x + (a.latitude + b.latitude) * f,
                sum_y + (a.longitude + b.longitude) * f,
            )
        },
    );

    let factor = Decimal::from(6) * area;
    Some(GpsCoordinates::new(sum_x / factor, sum_y / factor))
}

/// Consecutive vertex pairs, wrapping the last vertex back to the first
fn edges<'a>(
    vertices: &'a [GpsCoordinates],
) -> impl Iterator<Item = (&'a GpsCoordinates, &'a GpsCoordinates)> + 'a {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
}

fn cross(a: &GpsCoordinates, b: &GpsCoordinates) -> Decimal {
    a.latitude * b.longitude - b.latitude * a.longitude
}
