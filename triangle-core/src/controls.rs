use serde::{Deserialize, Serialize};

/// Range input configuration for one of the two scene parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

pub const BASE_SLIDER: SliderConfig = SliderConfig {
    min: 2.0,
    max: 10.0,
    step: 0.2,
    default: 7.0,
};

pub const HEIGHT_SLIDER: SliderConfig = SliderConfig {
    min: 2.0,
    max: 8.0,
    step: 0.2,
    default: 4.0,
};

impl SliderConfig {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Clamp into range and round onto the step grid anchored at `min`.
    /// Non-finite input falls back to the default.
    pub fn snap(&self, v: f64) -> f64 {
        if !v.is_finite() {
            return self.default;
        }
        let v = v.clamp(self.min, self.max);
        let n = ((v - self.min) / self.step).round();
        let snapped = self.min + n * self.step;
        // 0.2 is not exact in binary; strip the accumulated noise
        ((snapped * 1e6).round() / 1e6).clamp(self.min, self.max)
    }

    /// Parse the string value of an `<input type=range>` or a query param.
    pub fn parse(&self, s: &str) -> Option<f64> {
        let v = s.trim().parse::<f64>().ok()?;
        if v.is_finite() { Some(self.snap(v)) } else { None }
    }

    /// Attribute strings for the input element: (min, max, step, value).
    pub fn attrs(&self) -> [(&'static str, String); 4] {
        [
            ("min", self.min.to_string()),
            ("max", self.max.to_string()),
            ("step", self.step.to_string()),
            ("value", self.default.to_string()),
        ]
    }
}

/// Readout text for a slider value, e.g. `7.0`.
pub fn format_value(v: f64) -> String {
    format!("{:.1}", v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_lie_on_grid() {
        assert_eq!(BASE_SLIDER.snap(BASE_SLIDER.default), 7.0);
        assert_eq!(HEIGHT_SLIDER.snap(HEIGHT_SLIDER.default), 4.0);
    }

    #[test]
    fn snap_clamps_and_rounds_to_step() {
        assert_eq!(BASE_SLIDER.snap(1.0), 2.0);
        assert_eq!(BASE_SLIDER.snap(42.0), 10.0);
        assert_eq!(HEIGHT_SLIDER.snap(8.5), 8.0);
        assert_eq!(BASE_SLIDER.snap(3.31), 3.4);
        assert_eq!(BASE_SLIDER.snap(3.29), 3.2);
        assert_eq!(BASE_SLIDER.snap(f64::NAN), 7.0);
    }

    #[test]
    fn parse_accepts_slider_strings() {
        assert_eq!(BASE_SLIDER.parse("5.6"), Some(5.6));
        assert_eq!(HEIGHT_SLIDER.parse(" 2 "), Some(2.0));
        assert_eq!(BASE_SLIDER.parse("abc"), None);
        assert_eq!(BASE_SLIDER.parse("inf"), None);
    }

    #[test]
    fn readout_has_one_decimal() {
        assert_eq!(format_value(7.0), "7.0");
        assert_eq!(format_value(3.4), "3.4");
    }
}
