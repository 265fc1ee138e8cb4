use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use dicom::object::open_file;
use image::RgbImage;
use log::{debug, warn};
use thiserror::Error;

use crate::mapping::{self, GeometryError};
use crate::overlay;
use crate::rtstruct::{ContourSet, ParseError};
use crate::slice::{self, CtSlice};
use crate::windowing::{self, WindowError, WindowSetting};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0} is not an RT Structure Set file")]
    NotAnRtStruct(PathBuf),

    #[error("No CT slice files found in directory")]
    NoCtSlices,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Window(#[from] WindowError),
}

/// One windowed CT slice with its overlay burned in.
pub struct RenderedFrame {
    /// File the slice was read from.
    pub source: PathBuf,
    /// Patient-space Z position of the slice in millimeters.
    pub z: f64,
    /// Windowed 8-bit 3-channel image with the contour dots drawn.
    pub image: RgbImage,
    /// Matched contour points in pixel coordinates; empty when no contour
    /// lies on this slice's plane.
    pub points: Vec<(i32, i32)>,
}

impl RenderedFrame {
    /// Persist the frame to a raster image file; the format is inferred
    /// from the path extension (PNG, TIFF, BMP, JPEG, ...).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.image.save(path)
    }
}

/// Every rendered frame of a CT directory, ascending by Z, plus the display
/// color of the overlaid structure.
pub struct LoadedSeries {
    pub frames: Vec<RenderedFrame>,
    pub color: [u8; 3],
}

/// Run the whole pipeline: parse the RT Structure Set, read every `.dcm`
/// file in `ct_dir`, match contours to slices by Z, window the pixel data
/// and burn in the overlay.
///
/// Files without the `.dcm` extension are silently skipped. A CT file that
/// fails to read is logged and skipped without failing the run. Frames are
/// returned sorted ascending by slice Z position.
///
/// # Errors
///
/// Fails when `rtstruct_path` is not an RT Structure Set, the structure set
/// does not parse, the directory holds no `.dcm` files, or a slice carries
/// invalid spacing. A failed load yields no partial result.
pub fn load_series(
    ct_dir: impl AsRef<Path>,
    rtstruct_path: impl AsRef<Path>,
    window: WindowSetting,
) -> Result<LoadedSeries, LoadError> {
    let rtstruct_path = rtstruct_path.as_ref();
    if !slice::is_rtstruct_file(rtstruct_path) {
        return Err(LoadError::NotAnRtStruct(rtstruct_path.to_path_buf()));
    }

    let dataset = open_file(rtstruct_path)?;
    let contours = ContourSet::parse(&dataset)?;
    debug!(
        "Parsed structure set with {} contour planes",
        contours.plane_count()
    );

    let paths = ct_slice_paths(ct_dir.as_ref())?;
    if paths.is_empty() {
        return Err(LoadError::NoCtSlices);
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let ct_slice = match CtSlice::open(&path) {
            Ok(ct_slice) => ct_slice,
            Err(error) => {
                warn!("Skipping {}: {error}", path.display());
                continue;
            }
        };

        let points = mapping::map_to_pixels(&contours, ct_slice.position(), ct_slice.spacing())?;
        let mut image =
            windowing::apply_window(ct_slice.pixels(), window.center(), window.width())?;
        overlay::draw_points(&mut image, &points, contours.color());

        frames.push(RenderedFrame {
            source: path,
            z: ct_slice.position()[2],
            image,
            points,
        });
    }

    frames.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(Ordering::Equal));

    Ok(LoadedSeries {
        frames,
        color: contours.color(),
    })
}

fn ct_slice_paths(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
        })
        .collect();
    // Deterministic enumeration; the final frame order is by Z anyway.
    paths.sort();
    Ok(paths)
}
