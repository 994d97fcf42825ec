//! Slider scaling and colour wheel conversion

use alloc::string::String;
use core::f64::consts::PI;
use core::fmt::Write;

use heapless::Vec;

use crate::error::CoreError;

/// Map `value` linearly from `from` onto `to`
///
/// Callers truncate the result, so 50 on a 0-100 slider becomes 127 on a
/// 0-255 scale.
pub fn scale_value(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let (from_min, from_max) = from;
    let (to_min, to_max) = to;
    to_min + (value - from_min) * (to_max - to_min) / (from_max - from_min)
}

/// Convert a colour wheel touch to RGB
///
/// `x` and `y` are pixel coordinates on a wheel `wheel` pixels wide. The
/// angle around the centre is the hue and the distance from it the
/// saturation; touches outside the circle are white.
pub fn wheel_to_rgb(x: f64, y: f64, wheel: f64) -> [u8; 3] {
    let radius = wheel / 2.0;
    let nx = libm::round((x - radius) / radius * 100.0) / 100.0;
    let ny = libm::round((radius - y) / radius * 100.0) / 100.0;

    let distance = libm::sqrt(nx * nx + ny * ny);
    let saturation = if distance > 1.0 { 0.0 } else { distance };

    let mut degrees = libm::fmod(libm::atan2(ny, nx) * 180.0 / PI, 360.0);
    if degrees < 0.0 {
        degrees += 360.0;
    }

    let (r, g, b) = hsv_to_rgb(degrees / 360.0, saturation, 1.0);
    [to_channel(r), to_channel(g), to_channel(b)]
}

fn to_channel(value: f64) -> u8 {
    libm::round(value * 255.0).clamp(0.0, 255.0) as u8
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0) as i32;
    let f = h * 6.0 - sector as f64;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Parse the panel's `x|y|wheel` value into an RGB triple
pub fn parse_wheel_value(value: &str) -> Result<[u8; 3], CoreError> {
    let mut parts: Vec<f64, 3> = Vec::new();
    for token in value.split('|') {
        let number = token.trim().parse::<f64>().map_err(|_| CoreError::MalformedValue)?;
        parts.push(number).map_err(|_| CoreError::MalformedValue)?;
    }
    match parts.as_slice() {
        [x, y, wheel] if *wheel > 0.0 => Ok(wheel_to_rgb(*x, *y, *wheel)),
        _ => Err(CoreError::MalformedValue),
    }
}

/// Format as the backend's list literal, e.g. `[255,0,0]`
pub fn format_rgb(rgb: [u8; 3]) -> String {
    let mut out = String::with_capacity(13);
    let _ = write!(out, "[{},{},{}]", rgb[0], rgb[1], rgb[2]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_scaling_truncates() {
        assert_eq!(scale_value(50.0, (0.0, 100.0), (0.0, 255.0)) as i32, 127);
        assert_eq!(scale_value(0.0, (0.0, 100.0), (0.0, 255.0)) as i32, 0);
        assert_eq!(scale_value(100.0, (0.0, 100.0), (0.0, 255.0)) as i32, 255);
    }

    #[test]
    fn test_mired_scaling_hits_endpoints() {
        assert_eq!(scale_value(0.0, (0.0, 100.0), (153.0, 500.0)) as i32, 153);
        assert_eq!(scale_value(100.0, (0.0, 100.0), (153.0, 500.0)) as i32, 500);
    }

    #[test]
    fn test_wheel_centre_is_white() {
        assert_eq!(wheel_to_rgb(80.0, 80.0, 160.0), [255, 255, 255]);
    }

    #[test]
    fn test_wheel_right_edge_is_red() {
        assert_eq!(wheel_to_rgb(160.0, 80.0, 160.0), [255, 0, 0]);
    }

    #[test]
    fn test_wheel_top_edge() {
        assert_eq!(wheel_to_rgb(80.0, 0.0, 160.0), [128, 255, 0]);
    }

    #[test]
    fn test_wheel_outside_circle_is_white() {
        assert_eq!(wheel_to_rgb(160.0, 0.0, 160.0), [255, 255, 255]);
    }

    #[test]
    fn test_parse_wheel_value() {
        assert_eq!(parse_wheel_value("160|80|160"), Ok([255, 0, 0]));
        assert_eq!(parse_wheel_value("160|80"), Err(CoreError::MalformedValue));
        assert_eq!(parse_wheel_value("1|2|3|4"), Err(CoreError::MalformedValue));
        assert_eq!(parse_wheel_value("a|2|3"), Err(CoreError::MalformedValue));
        assert_eq!(parse_wheel_value("1|2|0"), Err(CoreError::MalformedValue));
    }

    #[test]
    fn test_format_rgb() {
        assert_eq!(format_rgb([255, 0, 12]), "[255,0,12]");
    }
}
