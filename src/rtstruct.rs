use std::collections::BTreeMap;

use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No ROI contour sequence in dataset")]
    MissingRoiContourSequence,

    #[error("Contour item without contour data")]
    MissingContourData,

    #[error("No display color on the first ROI contour entry")]
    MissingDisplayColor,
}

/// Z grouping key, quantized to 2 decimal places of a millimeter.
///
/// The precision is a fixed contract: a slice and a contour match only when
/// their Z positions agree after rounding to 2 decimal places.
fn z_key(z: f64) -> i64 {
    (z * 100.0).round() as i64
}

/// All contour polygons of an RT Structure Set, grouped by Z plane, plus the
/// display color of the structure.
///
/// Points are patient-space (X, Y, Z) coordinates in millimeters. The Z of a
/// contour's first point determines its plane.
pub struct ContourSet {
    planes: BTreeMap<i64, Vec<[f64; 3]>>,
    color: [u8; 3],
}

impl ContourSet {
    /// Extract every contour of the dataset's ROIContourSequence.
    ///
    /// A later contour whose plane key was already seen replaces the earlier
    /// point list for that plane instead of extending it. A contour whose
    /// coordinate count is not a multiple of 3 is discarded with a warning.
    /// The display color is taken from the first ROI contour entry only.
    ///
    /// # Errors
    ///
    /// Fails when the dataset has no ROIContourSequence, a contour item
    /// carries no contour data, or the first entry has no display color.
    pub fn parse(dataset: &InMemDicomObject) -> Result<Self, ParseError> {
        let sequence = dataset
            .element(tags::ROI_CONTOUR_SEQUENCE)
            .map_err(|_| ParseError::MissingRoiContourSequence)?;
        let entries = sequence
            .items()
            .ok_or(ParseError::MissingRoiContourSequence)?;

        let mut planes: BTreeMap<i64, Vec<[f64; 3]>> = BTreeMap::new();
        for entry in entries {
            let Some(contours) = entry
                .element(tags::CONTOUR_SEQUENCE)
                .ok()
                .and_then(|element| element.items())
            else {
                continue;
            };

            for contour in contours {
                let data = contour
                    .element(tags::CONTOUR_DATA)
                    .map_err(|_| ParseError::MissingContourData)?
                    .to_multi_float64()
                    .map_err(|_| ParseError::MissingContourData)?;
                if data.is_empty() {
                    return Err(ParseError::MissingContourData);
                }
                if data.len() % 3 != 0 {
                    warn!(
                        "Discarding contour with {} coordinates (not X,Y,Z triplets)",
                        data.len()
                    );
                    continue;
                }

                let points: Vec<[f64; 3]> =
                    data.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();
                // Replaces any earlier contour on the same plane.
                planes.insert(z_key(points[0][2]), points);
            }
        }

        let color = Self::display_color(entries).ok_or(ParseError::MissingDisplayColor)?;

        Ok(ContourSet { planes, color })
    }

    /// Points of the contour(s) at the plane matching `z` exactly (after
    /// quantization), or `None` when no contour lies on that plane.
    pub fn points_at(&self, z: f64) -> Option<&[[f64; 3]]> {
        self.planes.get(&z_key(z)).map(Vec::as_slice)
    }

    /// RGB display color of the structure.
    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    /// Number of distinct Z planes carrying contours.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    fn display_color(entries: &[InMemDicomObject]) -> Option<[u8; 3]> {
        let values = entries
            .first()?
            .element(tags::ROI_DISPLAY_COLOR)
            .ok()?
            .to_multi_float64()
            .ok()?;
        match values[..] {
            [r, g, b] => Some([r as u8, g as u8, b as u8]),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_planes(planes: BTreeMap<i64, Vec<[f64; 3]>>, color: [u8; 3]) -> Self {
        ContourSet { planes, color }
    }

    #[cfg(test)]
    pub(crate) fn plane_key(z: f64) -> i64 {
        z_key(z)
    }
}
