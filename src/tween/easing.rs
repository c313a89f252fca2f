//! Easing curves, named the way GSAP names them (`"none"`, `"power2.out"`,
//! `"sine.inOut"`, ...).

use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// Linear. GSAP calls it `none`.
    #[default]
    None,
    /// Polynomial of degree `n + 1` (`power1` is quadratic).
    Power(u8, EaseDirection),
    Sine(EaseDirection),
    Expo(EaseDirection),
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress. Endpoints are exact.
    #[must_use]
    pub fn apply(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        if p == 0.0 || p == 1.0 {
            return p;
        }
        match self {
            Easing::None => p,
            Easing::Power(n, dir) => {
                let exp = i32::from(n) + 1;
                directed(dir, p, |x| x.powi(exp))
            }
            Easing::Sine(dir) => directed(dir, p, |x| 1.0 - (x * FRAC_PI_2).cos()),
            Easing::Expo(dir) => directed(dir, p, |x| 2.0_f32.powf(10.0 * (x - 1.0))),
        }
    }

    fn name(self) -> String {
        let dir = |d: EaseDirection| match d {
            EaseDirection::In => "in",
            EaseDirection::Out => "out",
            EaseDirection::InOut => "inOut",
        };
        match self {
            Easing::None => "none".to_string(),
            Easing::Power(n, d) => format!("power{n}.{}", dir(d)),
            Easing::Sine(d) => format!("sine.{}", dir(d)),
            Easing::Expo(d) => format!("expo.{}", dir(d)),
        }
    }
}

/// Builds the out and in-out variants from an ease-in curve.
fn directed(dir: EaseDirection, p: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match dir {
        EaseDirection::In => ease_in(p),
        EaseDirection::Out => 1.0 - ease_in(1.0 - p),
        EaseDirection::InOut => {
            if p < 0.5 {
                ease_in(p * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - p) * 2.0) / 2.0
            }
        }
    }
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Config(format!("unknown easing '{s}'"));

        if s == "none" || s == "linear" {
            return Ok(Easing::None);
        }

        // GSAP treats a bare family name as its `.out` variant.
        let (family, dir) = s.split_once('.').unwrap_or((s, "out"));
        let dir = match dir {
            "in" => EaseDirection::In,
            "out" => EaseDirection::Out,
            "inOut" => EaseDirection::InOut,
            _ => return Err(invalid()),
        };

        match family {
            "sine" => Ok(Easing::Sine(dir)),
            "expo" => Ok(Easing::Expo(dir)),
            // quad/cubic/quart are GSAP aliases for power1..power3.
            "quad" => Ok(Easing::Power(1, dir)),
            "cubic" => Ok(Easing::Power(2, dir)),
            "quart" => Ok(Easing::Power(3, dir)),
            _ => {
                let n = family
                    .strip_prefix("power")
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=4).contains(n))
                    .ok_or_else(invalid)?;
                Ok(Easing::Power(n, dir))
            }
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.name()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
