// Math utilities and helper functions

use glam::{IVec2, Vec2};

/// Clamp a value between min and max
///
/// Unlike `f32::clamp` this never panics when `min > max`; the lower bound
/// wins, which is what pan clamping wants when the sheet is smaller than the
/// viewport.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value > max {
        if max < min {
            min
        } else {
            max
        }
    } else if value < min {
        min
    } else {
        value
    }
}

/// Wrap a value into `[0, size)` (toroidal space)
pub fn wrap(value: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs
    if wrapped >= size {
        0.0
    } else {
        wrapped
    }
}

/// Wrap both axes of a point into a `[0, size)` field
pub fn wrap_point(point: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(wrap(point.x, size.x), wrap(point.y, size.y))
}

/// Turn digital axes (-1, 0, 1) into a unit vector; zero stays zero
pub fn normalize_axes(axes: IVec2) -> Vec2 {
    axes.as_vec2().normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_inverted_bounds_prefers_min() {
        assert_eq!(clamp(30.0, 0.0, -20.0), 0.0);
        assert_eq!(clamp(-30.0, 0.0, -20.0), 0.0);
    }

    #[test]
    fn test_wrap() {
        assert_relative_eq!(wrap(5.0, 10.0), 5.0);
        assert_relative_eq!(wrap(10.0, 10.0), 0.0);
        assert_relative_eq!(wrap(-1.0, 10.0), 9.0);
        assert_relative_eq!(wrap(10.9, 10.0), 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_wrap_never_reaches_size() {
        let w = wrap(-1e-9, 640.0);
        assert!((0.0..640.0).contains(&w));
    }

    #[test]
    fn test_normalize_axes() {
        assert_eq!(normalize_axes(IVec2::ZERO), Vec2::ZERO);
        assert_eq!(normalize_axes(IVec2::new(1, 0)), Vec2::X);

        let diagonal = normalize_axes(IVec2::new(-1, 1));
        assert_relative_eq!(diagonal.length(), 1.0, epsilon = 1e-6);
        assert!(diagonal.x < 0.0 && diagonal.y > 0.0);
    }
}
