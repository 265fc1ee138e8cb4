use thiserror::Error;

use crate::rtstruct::ContourSet;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid pixel spacing {0}x{1}")]
    InvalidSpacing(f64, f64),
}

/// Match a slice against the contour set and convert the matched points to
/// pixel offsets.
///
/// A slice matches the plane whose quantized Z equals the slice's Z exactly;
/// there is no tolerance or nearest-neighbor fallback. Every point of every
/// contour on the matched plane is flattened into one list, so polygon
/// boundaries between contours sharing a plane are not preserved.
///
/// Offsets are `round((patient - origin) / spacing)` per axis, with the
/// slice's patient position as origin. A slice with no matching plane yields
/// an empty list.
///
/// # Errors
///
/// Fails when either spacing component is zero or not finite.
pub fn map_to_pixels(
    contours: &ContourSet,
    position: [f64; 3],
    spacing: [f64; 2],
) -> Result<Vec<(i32, i32)>, GeometryError> {
    let [x_spacing, y_spacing] = spacing;
    if x_spacing == 0.0 || y_spacing == 0.0 || !x_spacing.is_finite() || !y_spacing.is_finite() {
        return Err(GeometryError::InvalidSpacing(x_spacing, y_spacing));
    }

    let Some(points) = contours.points_at(position[2]) else {
        return Ok(Vec::new());
    };

    Ok(points
        .iter()
        .map(|&[x, y, _]| {
            (
                ((x - position[0]) / x_spacing).round() as i32,
                ((y - position[1]) / y_spacing).round() as i32,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn single_plane_set(z: f64, points: Vec<[f64; 3]>) -> ContourSet {
        let mut planes = BTreeMap::new();
        planes.insert(ContourSet::plane_key(z), points);
        ContourSet::from_planes(planes, [255, 0, 0])
    }

    #[test]
    fn converts_matched_points_to_pixel_offsets() {
        let set = single_plane_set(1.0, vec![[10.0, 10.0, 1.0], [20.0, 10.0, 1.0]]);
        let points = map_to_pixels(&set, [0.0, 0.0, 1.0], [1.0, 1.0]).unwrap();
        assert_eq!(points, vec![(10, 10), (20, 10)]);
    }

    #[test]
    fn spacing_and_origin_are_applied_per_axis() {
        let set = single_plane_set(0.0, vec![[4.0, -6.0, 0.0]]);
        let points = map_to_pixels(&set, [-1.0, 2.0, 0.0], [0.5, 2.0]).unwrap();
        assert_eq!(points, vec![(10, -4)]);
    }

    #[test]
    fn offsets_are_rounded_not_truncated() {
        let set = single_plane_set(0.0, vec![[1.6, 1.4, 0.0]]);
        let points = map_to_pixels(&set, [0.0, 0.0, 0.0], [1.0, 1.0]).unwrap();
        assert_eq!(points, vec![(2, 1)]);
    }

    #[test]
    fn z_within_quantization_precision_matches() {
        let set = single_plane_set(1.0, vec![[10.0, 10.0, 1.0]]);
        let points = map_to_pixels(&set, [0.0, 0.0, 1.004], [1.0, 1.0]).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn z_beyond_quantization_precision_yields_empty_list() {
        let set = single_plane_set(1.0, vec![[10.0, 10.0, 1.0]]);
        let points = map_to_pixels(&set, [0.0, 0.0, 1.011], [1.0, 1.0]).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn zero_spacing_fails() {
        let set = single_plane_set(1.0, vec![[10.0, 10.0, 1.0]]);
        assert!(matches!(
            map_to_pixels(&set, [0.0, 0.0, 1.0], [0.0, 1.0]),
            Err(GeometryError::InvalidSpacing(..))
        ));
        assert!(matches!(
            map_to_pixels(&set, [0.0, 0.0, 1.0], [1.0, 0.0]),
            Err(GeometryError::InvalidSpacing(..))
        ));
    }
}
