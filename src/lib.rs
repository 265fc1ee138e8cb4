//! # rtstruct-overlay
//!
//! Renders CT image slices overlaid with RT Structure Set contours.
//!
//! This crate is built on the dicom-rs ecosystem. It locates the `.dcm`
//! slice files of a CT series, parses an RT Structure Set into contour
//! polygons grouped by Z plane, matches each slice to the contours on its
//! plane by exact (2-decimal-place) Z equality, converts patient-space
//! millimeter coordinates into pixel offsets with the slice's position and
//! pixel spacing, applies center/width windowing to the raw intensities and
//! burns the matched points into the resulting 8-bit image in the
//! structure's display color.
//!
//! The pipeline is synchronous and single-threaded: [`pipeline::load_series`]
//! blocks until every slice is processed and returns the frames sorted
//! ascending by Z. Callers that need a responsive UI should run it on a
//! worker thread; that concern stays outside this crate, as do file dialogs
//! and all other presentation plumbing.
//!
//! # Examples
//!
//! Load a CT directory with its structure set, then export the first slice
//! that has contours on it:
//!
//! ```no_run
//! # use rtstruct_overlay::{pipeline::load_series, windowing::WindowSetting};
//! let series = load_series("ct", "structures.dcm", WindowSetting::default())
//!     .expect("should have loaded the CT series");
//! if let Some(frame) = series.frames.iter().find(|frame| !frame.points.is_empty()) {
//!     frame.save("result.png").expect("should have saved the frame");
//! }
//! ```

pub mod mapping;
pub mod overlay;
pub mod pipeline;
pub mod rtstruct;
pub mod slice;
pub mod windowing;
