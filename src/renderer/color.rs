/// Selects which color palette to use for field rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorMap {
    /// Cool-warm diverging: blue -> light blue -> grey -> salmon -> red (for pressure).
    CoolWarm,
}

/// Cool-warm diverging stops (Moreland), sampled at quarter points.
pub(crate) const COOL_WARM_STOPS: [(f64, f64, f64); 5] = [
    (59.0, 76.0, 192.0),   // deep blue            (0.00)
    (141.0, 176.0, 254.0), // light blue           (0.25)
    (221.0, 221.0, 221.0), // neutral grey         (0.50)
    (244.0, 154.0, 123.0), // salmon               (0.75)
    (180.0, 4.0, 38.0),    // deep red             (1.00)
];

/// Convert a [0.0, 1.0] value to RGBA using the specified color map.
pub fn map_to_rgba(t: f64, colormap: ColorMap) -> [u8; 4] {
    let stops = match colormap {
        ColorMap::CoolWarm => &COOL_WARM_STOPS,
    };

    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let seg = t * 4.0;
    let i = (seg as usize).min(3);
    let s = seg - i as f64;

    let (r0, g0, b0) = stops[i];
    let (r1, g1, b1) = stops[i + 1];

    [
        (r0 + s * (r1 - r0)) as u8,
        (g0 + s * (g1 - g0)) as u8,
        (b0 + s * (b1 - b0)) as u8,
        255,
    ]
}

/// Map `value` from `[vmin, vmax]` onto `[0, 1]`, clamping outside the range.
pub fn normalize(value: f64, vmin: f64, vmax: f64) -> f64 {
    let span = vmax - vmin;
    if span.abs() < 1e-300 {
        return 0.5;
    }
    ((value - vmin) / span).clamp(0.0, 1.0)
}

/// Color bar layout constants.
pub(crate) const BAR_GAP: usize = 16;
pub(crate) const BAR_WIDTH: usize = 18;
pub(crate) const TICK_LEN: usize = 4;
pub(crate) const LABEL_GAP: usize = 3;
pub(crate) const LABEL_WIDTH: usize = 36;
pub(crate) const BAR_TOTAL: usize = BAR_GAP + BAR_WIDTH + TICK_LEN + LABEL_GAP + LABEL_WIDTH;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cool_warm_endpoints() {
        let lo = map_to_rgba(0.0, ColorMap::CoolWarm);
        assert_eq!(lo, [59, 76, 192, 255]);
        let hi = map_to_rgba(1.0, ColorMap::CoolWarm);
        assert_eq!(hi, [180, 4, 38, 255]);
    }

    #[test]
    fn test_cool_warm_mid_is_grey() {
        let mid = map_to_rgba(0.5, ColorMap::CoolWarm);
        assert_eq!(mid[0], mid[1], "R == G at midpoint");
        assert_eq!(mid[1], mid[2], "G == B at midpoint");
    }

    #[test]
    fn test_cool_warm_cold_is_blue_hot_is_red() {
        let cold = map_to_rgba(0.1, ColorMap::CoolWarm);
        let hot = map_to_rgba(0.9, ColorMap::CoolWarm);
        assert!(cold[2] > cold[0], "cold side should be blue: {cold:?}");
        assert!(hot[0] > hot[2], "hot side should be red: {hot:?}");
    }

    #[test]
    fn test_color_clamp() {
        assert_eq!(map_to_rgba(-1.0, ColorMap::CoolWarm), map_to_rgba(0.0, ColorMap::CoolWarm));
        assert_eq!(map_to_rgba(2.0, ColorMap::CoolWarm), map_to_rgba(1.0, ColorMap::CoolWarm));
    }

    #[test]
    fn test_nan_maps_to_midpoint() {
        assert_eq!(
            map_to_rgba(f64::NAN, ColorMap::CoolWarm),
            map_to_rgba(0.5, ColorMap::CoolWarm)
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(0.0, -0.1, 0.1), 0.5);
        assert_eq!(normalize(-0.1, -0.1, 0.1), 0.0);
        assert_eq!(normalize(0.1, -0.1, 0.1), 1.0);
        assert_eq!(normalize(5.0, -0.1, 0.1), 1.0);
        assert_eq!(normalize(-5.0, -0.1, 0.1), 0.0);
        assert_eq!(normalize(3.0, 1.0, 1.0), 0.5);
    }
}
