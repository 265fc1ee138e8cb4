use image::{Rgb, RgbImage};
use ndarray::Array2;
use thiserror::Error;

/// Default window center when the caller specifies none.
pub const DEFAULT_WINDOW_CENTER: i32 = 1000;
/// Default window width when the caller specifies none.
pub const DEFAULT_WINDOW_WIDTH: i32 = 1000;

const MIN_CENTER: i32 = -1024;
const MAX_CENTER: i32 = 3095;
const MIN_WIDTH: i32 = 1;
const MAX_WIDTH: i32 = 4096;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Window width must be at least 1, got {0}")]
    InvalidWidth(i32),

    #[error("Window center {0} outside [-1024, 3095]")]
    CenterOutOfRange(i32),

    #[error("Window width {0} outside [1, 4096]")]
    WidthOutOfRange(i32),
}

/// A validated (center, width) windowing pair.
///
/// Center is bounded to [-1024, 3095] and width to [1, 4096].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSetting {
    center: i32,
    width: i32,
}

impl Default for WindowSetting {
    fn default() -> Self {
        WindowSetting {
            center: DEFAULT_WINDOW_CENTER,
            width: DEFAULT_WINDOW_WIDTH,
        }
    }
}

impl WindowSetting {
    /// Build a setting, rejecting out-of-range values.
    pub fn new(center: i32, width: i32) -> Result<Self, WindowError> {
        if !(MIN_CENTER..=MAX_CENTER).contains(&center) {
            return Err(WindowError::CenterOutOfRange(center));
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(WindowError::WidthOutOfRange(width));
        }
        Ok(WindowSetting { center, width })
    }

    /// Build a setting, saturating out-of-range values into bounds. Suited
    /// to incremental adjustments driven by user input.
    pub fn clamped(center: i32, width: i32) -> Self {
        WindowSetting {
            center: center.clamp(MIN_CENTER, MAX_CENTER),
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
        }
    }

    pub fn center(&self) -> i32 {
        self.center
    }

    pub fn width(&self) -> i32 {
        self.width
    }
}

/// Remap raw CT intensities to a displayable 3-channel 8-bit image.
///
/// Each pixel becomes `clamp(p - (center - width/2), 0, width-1) * 256 /
/// width`, truncated to u8, with the gray value replicated across the three
/// channels. Output dimensions equal the input grid's.
///
/// # Errors
///
/// Fails with [`WindowError::InvalidWidth`] when `width` is below 1.
pub fn apply_window(
    pixels: &Array2<i32>,
    center: i32,
    width: i32,
) -> Result<RgbImage, WindowError> {
    if width < MIN_WIDTH {
        return Err(WindowError::InvalidWidth(width));
    }

    let floor = f64::from(center) - f64::from(width) / 2.0;
    let span = f64::from(width);
    let (rows, cols) = pixels.dim();

    Ok(RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let raw = f64::from(pixels[[y as usize, x as usize]]);
        let clipped = (raw - floor).clamp(0.0, span - 1.0);
        let value = (clipped * 256.0 / span) as u8;
        Rgb([value, value, value])
    }))
}
