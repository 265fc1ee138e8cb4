use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

// Small filled disc, roughly 4 px wide.
const DOT_RADIUS: i32 = 2;

/// Burn the matched contour points into the windowed image.
///
/// Each point becomes a filled dot in the structure's display color. Points
/// outside the image bounds are clipped by the drawing routine, not an
/// error.
pub fn draw_points(image: &mut RgbImage, points: &[(i32, i32)], color: [u8; 3]) {
    for &(x, y) in points {
        draw_filled_circle_mut(image, (x, y), DOT_RADIUS, Rgb(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_drawn_in_the_given_color() {
        let mut image = RgbImage::new(32, 32);
        draw_points(&mut image, &[(10, 10)], [255, 0, 0]);
        assert_eq!(image.get_pixel(10, 10), &Rgb([255, 0, 0]));
        // Dot has some width.
        assert_eq!(image.get_pixel(11, 10), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(10, 11), &Rgb([255, 0, 0]));
    }

    #[test]
    fn pixels_away_from_points_are_untouched() {
        let mut image = RgbImage::new(32, 32);
        draw_points(&mut image, &[(10, 10)], [255, 0, 0]);
        assert_eq!(image.get_pixel(20, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn out_of_bounds_points_are_ignored() {
        let mut image = RgbImage::new(8, 8);
        draw_points(&mut image, &[(-5, -5), (100, 100)], [255, 0, 0]);
        assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
