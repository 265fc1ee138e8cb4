use std::path::{Path, PathBuf};

use dicom::object::{FileDicomObject, InMemDicomObject, open_file};
use dicom::pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption};
use dicom_dictionary_std::tags;
use ndarray::{Array2, s};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SliceReadError {
    #[error("No pixel data in file")]
    MissingPixelData,

    #[error("Missing patient position information")]
    MissingPosition,

    #[error("Missing pixel spacing information")]
    MissingSpacing,

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("Pixel data error: {0}")]
    Pixel(#[from] dicom::pixeldata::Error),
}

/// One CT cross-section read from a DICOM file. Immutable after load.
///
/// Pixel intensities are the raw modality values (Hounsfield units when the
/// file carries a rescale), before any windowing.
pub struct CtSlice {
    source: PathBuf,
    pixels: Array2<i32>,
    position: [f64; 3],
    spacing: [f64; 2],
}

impl CtSlice {
    /// Read a single CT slice from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not readable DICOM or lacks pixel
    /// data, patient position or pixel spacing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SliceReadError> {
        let path = path.as_ref();
        let object = open_file(path)?;

        if object.element(tags::PIXEL_DATA).is_err() {
            return Err(SliceReadError::MissingPixelData);
        }

        let position =
            Self::patient_position(&object).ok_or(SliceReadError::MissingPosition)?;
        let spacing = Self::pixel_spacing(&object).ok_or(SliceReadError::MissingSpacing)?;
        let pixels = Self::decode_pixels(&object)?;

        Ok(CtSlice {
            source: path.to_path_buf(),
            pixels,
            position,
            spacing,
        })
    }

    /// Path the slice was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw pixel grid in (row, column) order.
    pub fn pixels(&self) -> &Array2<i32> {
        &self.pixels
    }

    /// ImagePositionPatient (X, Y, Z) in millimeters.
    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    /// PixelSpacing in millimeters per pixel, in file order; callers use the
    /// first value as the X spacing.
    pub fn spacing(&self) -> [f64; 2] {
        self.spacing
    }

    fn patient_position(object: &FileDicomObject<InMemDicomObject>) -> Option<[f64; 3]> {
        let values = object
            .element(tags::IMAGE_POSITION_PATIENT)
            .ok()?
            .to_multi_float64()
            .ok()?;
        match values[..] {
            [x, y, z] => Some([x, y, z]),
            _ => None,
        }
    }

    fn pixel_spacing(object: &FileDicomObject<InMemDicomObject>) -> Option<[f64; 2]> {
        let values = object
            .element(tags::PIXEL_SPACING)
            .ok()?
            .to_multi_float64()
            .ok()?;
        match values[..] {
            [a, b] => Some([a, b]),
            _ => None,
        }
    }

    fn decode_pixels(
        object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Array2<i32>, dicom::pixeldata::Error> {
        let pixel_data = object.decode_pixel_data()?;
        // Identity VOI LUT: windowing is applied later by the pipeline.
        let options = ConvertOptions::new().with_voi_lut(VoiLutOption::Identity);
        Ok(pixel_data
            .to_ndarray_with_options::<i32>(&options)?
            .slice_move(s![0, .., .., 0]))
    }
}

/// Whether the dataset carries an ROIContourSequence, the attribute that
/// distinguishes an RT Structure Set from an ordinary image file.
pub fn is_rtstruct_dataset(dataset: &InMemDicomObject) -> bool {
    dataset.element(tags::ROI_CONTOUR_SEQUENCE).is_ok()
}

/// Returns true only for a readable `.dcm` file that carries an
/// ROIContourSequence. Any other path, including an unreadable file, yields
/// false.
pub fn is_rtstruct_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let has_extension = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"));

    has_extension
        && open_file(path)
            .map(|object| is_rtstruct_dataset(&object))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::value::DataSetSequence;
    use dicom::core::{DataElement, PrimitiveValue, VR};

    #[test]
    fn dataset_with_roi_contour_sequence_is_rtstruct() {
        let dataset = InMemDicomObject::from_element_iter([DataElement::new(
            tags::ROI_CONTOUR_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(Vec::<InMemDicomObject>::new()),
        )]);
        assert!(is_rtstruct_dataset(&dataset));
    }

    #[test]
    fn dataset_without_roi_contour_sequence_is_not_rtstruct() {
        let dataset = InMemDicomObject::from_element_iter([DataElement::new(
            tags::MODALITY,
            VR::CS,
            PrimitiveValue::from("CT"),
        )]);
        assert!(!is_rtstruct_dataset(&dataset));
    }

    #[test]
    fn wrong_extension_is_rejected_without_reading() {
        assert!(!is_rtstruct_file("structures.txt"));
        assert!(!is_rtstruct_file("structures"));
    }

    #[test]
    fn unreadable_dcm_path_is_rejected() {
        assert!(!is_rtstruct_file("definitely/not/a/real/file.dcm"));
    }
}
