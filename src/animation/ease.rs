//! One-dimensional easing curves.
//!
//! Every curve shares the classic signature `(t, b, c, d) -> value` where `t` is the elapsed time,
//! `b` the start value, `c` the change in value and `d` the duration. The free functions follow the
//! curves exactly (including overshoot past `d`); [`Ease::ease`] additionally pins the endpoints.

use std::f64::consts::PI;
use std::str::FromStr;

use crate::foundation::error::{JoltError, JoltResult};

/// Default overshoot of the back curves.
pub const BACK_OVERSHOOT: f64 = 1.70158;

/// Named easing curves used by transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "easeInQuad")]
    InQuad,
    #[default]
    #[serde(rename = "easeOutQuad")]
    OutQuad,
    #[serde(rename = "easeInOutQuad")]
    InOutQuad,
    #[serde(rename = "easeInCubic")]
    InCubic,
    #[serde(rename = "easeOutCubic")]
    OutCubic,
    #[serde(rename = "easeInOutCubic")]
    InOutCubic,
    #[serde(rename = "easeInQuart")]
    InQuart,
    #[serde(rename = "easeOutQuart")]
    OutQuart,
    #[serde(rename = "easeInOutQuart")]
    InOutQuart,
    #[serde(rename = "easeInQuint")]
    InQuint,
    #[serde(rename = "easeOutQuint")]
    OutQuint,
    #[serde(rename = "easeInOutQuint")]
    InOutQuint,
    #[serde(rename = "easeInSine")]
    InSine,
    #[serde(rename = "easeOutSine")]
    OutSine,
    #[serde(rename = "easeInOutSine")]
    InOutSine,
    #[serde(rename = "easeInExpo")]
    InExpo,
    #[serde(rename = "easeOutExpo")]
    OutExpo,
    #[serde(rename = "easeInOutExpo")]
    InOutExpo,
    #[serde(rename = "easeInCirc")]
    InCirc,
    #[serde(rename = "easeOutCirc")]
    OutCirc,
    #[serde(rename = "easeInOutCirc")]
    InOutCirc,
    #[serde(rename = "easeInElastic")]
    InElastic,
    #[serde(rename = "easeOutElastic")]
    OutElastic,
    #[serde(rename = "easeInOutElastic")]
    InOutElastic,
    #[serde(rename = "easeInBack")]
    InBack,
    #[serde(rename = "easeOutBack")]
    OutBack,
    #[serde(rename = "easeInOutBack")]
    InOutBack,
    #[serde(rename = "easeInBounce")]
    InBounce,
    #[serde(rename = "easeOutBounce")]
    OutBounce,
    #[serde(rename = "easeInOutBounce")]
    InOutBounce,
}

impl Ease {
    pub const ALL: [Ease; 31] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuart,
        Ease::InOutQuart,
        Ease::InQuint,
        Ease::OutQuint,
        Ease::InOutQuint,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InExpo,
        Ease::OutExpo,
        Ease::InOutExpo,
        Ease::InCirc,
        Ease::OutCirc,
        Ease::InOutCirc,
        Ease::InElastic,
        Ease::OutElastic,
        Ease::InOutElastic,
        Ease::InBack,
        Ease::OutBack,
        Ease::InOutBack,
        Ease::InBounce,
        Ease::OutBounce,
        Ease::InOutBounce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "easeInQuad",
            Self::OutQuad => "easeOutQuad",
            Self::InOutQuad => "easeInOutQuad",
            Self::InCubic => "easeInCubic",
            Self::OutCubic => "easeOutCubic",
            Self::InOutCubic => "easeInOutCubic",
            Self::InQuart => "easeInQuart",
            Self::OutQuart => "easeOutQuart",
            Self::InOutQuart => "easeInOutQuart",
            Self::InQuint => "easeInQuint",
            Self::OutQuint => "easeOutQuint",
            Self::InOutQuint => "easeInOutQuint",
            Self::InSine => "easeInSine",
            Self::OutSine => "easeOutSine",
            Self::InOutSine => "easeInOutSine",
            Self::InExpo => "easeInExpo",
            Self::OutExpo => "easeOutExpo",
            Self::InOutExpo => "easeInOutExpo",
            Self::InCirc => "easeInCirc",
            Self::OutCirc => "easeOutCirc",
            Self::InOutCirc => "easeInOutCirc",
            Self::InElastic => "easeInElastic",
            Self::OutElastic => "easeOutElastic",
            Self::InOutElastic => "easeInOutElastic",
            Self::InBack => "easeInBack",
            Self::OutBack => "easeOutBack",
            Self::InOutBack => "easeInOutBack",
            Self::InBounce => "easeInBounce",
            Self::OutBounce => "easeOutBounce",
            Self::InOutBounce => "easeInOutBounce",
        }
    }

    /// Look up a curve by name (`"linear"`, `"easeOutQuad"`, ...). Case-insensitive.
    pub fn from_name(name: &str) -> JoltResult<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| JoltError::validation(format!("unknown easing '{wanted}'")))
    }

    /// Evaluate the curve at elapsed time `t` for start `b`, change `c` and duration `d`.
    ///
    /// `t <= 0` yields exactly `b` and `t >= d` yields exactly `b + c`.
    pub fn ease(self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t <= 0.0 {
            return b;
        }
        if t >= d {
            return b + c;
        }
        let f: fn(f64, f64, f64, f64) -> f64 = match self {
            Self::Linear => linear,
            Self::InQuad => in_quad,
            Self::OutQuad => out_quad,
            Self::InOutQuad => in_out_quad,
            Self::InCubic => in_cubic,
            Self::OutCubic => out_cubic,
            Self::InOutCubic => in_out_cubic,
            Self::InQuart => in_quart,
            Self::OutQuart => out_quart,
            Self::InOutQuart => in_out_quart,
            Self::InQuint => in_quint,
            Self::OutQuint => out_quint,
            Self::InOutQuint => in_out_quint,
            Self::InSine => in_sine,
            Self::OutSine => out_sine,
            Self::InOutSine => in_out_sine,
            Self::InExpo => in_expo,
            Self::OutExpo => out_expo,
            Self::InOutExpo => in_out_expo,
            Self::InCirc => in_circ,
            Self::OutCirc => out_circ,
            Self::InOutCirc => in_out_circ,
            Self::InElastic => in_elastic,
            Self::OutElastic => out_elastic,
            Self::InOutElastic => in_out_elastic,
            Self::InBack => in_back,
            Self::OutBack => out_back,
            Self::InOutBack => in_out_back,
            Self::InBounce => in_bounce,
            Self::OutBounce => out_bounce,
            Self::InOutBounce => in_out_bounce,
        };
        f(t, b, c, d)
    }

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        self.ease(t, 0.0, 1.0, 1.0)
    }
}

impl FromStr for Ease {
    type Err = JoltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl std::fmt::Display for Ease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

pub fn in_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

pub fn out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

pub fn in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    let t = t - 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

pub fn in_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t * t + b
}

pub fn out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

pub fn in_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t * t + 2.0) + b
}

pub fn in_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t.powi(4) + b
}

pub fn out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    -c * (t.powi(4) - 1.0) + b
}

pub fn in_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(4) + b;
    }
    let t = t - 2.0;
    -c / 2.0 * (t.powi(4) - 2.0) + b
}

pub fn in_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t.powi(5) + b
}

pub fn out_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t.powi(5) + 1.0) + b
}

pub fn in_out_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(5) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t.powi(5) + 2.0) + b
}

pub fn in_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c * (t / d * (PI / 2.0)).cos() + c + b
}

pub fn out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (t / d * (PI / 2.0)).sin() + b
}

pub fn in_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
}

// The exponential curves never reach their endpoints through `powf`, so both ends are pinned.

pub fn in_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    c * 2f64.powf(10.0 * (t / d - 1.0)) + b
}

pub fn out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == d {
        return b + c;
    }
    c * (-(2f64.powf(-10.0 * t / d)) + 1.0) + b
}

pub fn in_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
    }
    c / 2.0 * (-(2f64.powf(-10.0 * (t - 1.0))) + 2.0) + b
}

pub fn in_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * ((1.0 - t * t).sqrt() - 1.0) + b
}

pub fn out_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (1.0 - t * t).sqrt() + b
}

pub fn in_out_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b;
    }
    let t = t - 2.0;
    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
}

/// Amplitude and phase shift of an elastic curve.
///
/// An amplitude below `|c|` falls back to `c` with a quarter-period shift.
fn elastic_shape(c: f64, amplitude: Option<f64>, period: f64) -> (f64, f64) {
    match amplitude {
        Some(a) if a >= c.abs() => (a, period / (2.0 * PI) * (c / a).asin()),
        _ => (c, period / 4.0),
    }
}

pub fn in_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    in_elastic_with(t, b, c, d, None, None)
}

/// [`in_elastic`] with an explicit amplitude and period (defaults: `c` and `0.3 * d`).
pub fn in_elastic_with(
    t: f64,
    b: f64,
    c: f64,
    d: f64,
    amplitude: Option<f64>,
    period: Option<f64>,
) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = period.unwrap_or(d * 0.3);
    let (a, s) = elastic_shape(c, amplitude, p);
    let t = t - 1.0;
    -(a * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
}

pub fn out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    out_elastic_with(t, b, c, d, None, None)
}

/// [`out_elastic`] with an explicit amplitude and period (defaults: `c` and `0.3 * d`).
pub fn out_elastic_with(
    t: f64,
    b: f64,
    c: f64,
    d: f64,
    amplitude: Option<f64>,
    period: Option<f64>,
) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = period.unwrap_or(d * 0.3);
    let (a, s) = elastic_shape(c, amplitude, p);
    a * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
}

pub fn in_out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    in_out_elastic_with(t, b, c, d, None, None)
}

/// [`in_out_elastic`] with an explicit amplitude and period (defaults: `c` and `0.45 * d`).
pub fn in_out_elastic_with(
    t: f64,
    b: f64,
    c: f64,
    d: f64,
    amplitude: Option<f64>,
    period: Option<f64>,
) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d / 2.0);
    if t == 2.0 {
        return b + c;
    }
    let p = period.unwrap_or(d * (0.3 * 1.5));
    let (a, s) = elastic_shape(c, amplitude, p);
    let t = t - 1.0;
    let wave = ((t * d - s) * (2.0 * PI) / p).sin();
    if t < 0.0 {
        return -0.5 * (a * 2f64.powf(10.0 * t) * wave) + b;
    }
    a * 2f64.powf(-10.0 * t) * wave * 0.5 + c + b
}

pub fn in_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    in_back_with(t, b, c, d, BACK_OVERSHOOT)
}

/// [`in_back`] with an explicit overshoot `s`.
pub fn in_back_with(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let t = t / d;
    c * t * t * ((s + 1.0) * t - s) + b
}

pub fn out_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    out_back_with(t, b, c, d, BACK_OVERSHOOT)
}

/// [`out_back`] with an explicit overshoot `s`.
pub fn out_back_with(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
}

pub fn in_out_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    in_out_back_with(t, b, c, d, BACK_OVERSHOOT)
}

/// [`in_out_back`] with an explicit overshoot `s` (scaled by 1.525 for the in-out shape).
pub fn in_out_back_with(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let s = s * 1.525;
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
}

pub fn in_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c - out_bounce(d - t, 0.0, c, d) + b
}

pub fn out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

pub fn in_out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t < d / 2.0 {
        return in_bounce(t * 2.0, 0.0, c, d) * 0.5 + b;
    }
    out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
