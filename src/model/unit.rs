//! Dimensional values used by style expressions (`12pt`, `50%`, `1in`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points per inch
pub const POINTS_PER_INCH: f64 = 72.0;
/// Points per millimetre
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;
/// Points per CSS pixel (96 pixels per inch)
pub const POINTS_PER_PIXEL: f64 = 72.0 / 96.0;

/// Unit kind carried by a dimensional value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Typographic points
    Point,
    /// Millimetres
    Millimetre,
    /// Centimetres
    Centimetre,
    /// Inches
    Inch,
    /// CSS pixels
    Pixel,
    /// Percentage of some reference size
    Percent,
    /// Font-relative em
    Em,
    /// Root font-relative em
    Rem,
    /// Viewport width percentage
    ViewWidth,
    /// Viewport height percentage
    ViewHeight,
}

impl UnitKind {
    /// All kinds ordered longest suffix first, so `rem` wins over `em`
    const BY_SUFFIX: [UnitKind; 10] = [
        UnitKind::Rem,
        UnitKind::Point,
        UnitKind::Millimetre,
        UnitKind::Centimetre,
        UnitKind::Inch,
        UnitKind::Pixel,
        UnitKind::Em,
        UnitKind::ViewWidth,
        UnitKind::ViewHeight,
        UnitKind::Percent,
    ];

    /// Source suffix for this unit
    pub fn suffix(self) -> &'static str {
        match self {
            UnitKind::Point => "pt",
            UnitKind::Millimetre => "mm",
            UnitKind::Centimetre => "cm",
            UnitKind::Inch => "in",
            UnitKind::Pixel => "px",
            UnitKind::Percent => "%",
            UnitKind::Em => "em",
            UnitKind::Rem => "rem",
            UnitKind::ViewWidth => "vw",
            UnitKind::ViewHeight => "vh",
        }
    }

    /// Resolve a suffix (case-insensitive) into a unit kind
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::BY_SUFFIX
            .iter()
            .copied()
            .find(|kind| kind.suffix().eq_ignore_ascii_case(suffix))
    }

    /// Longest unit suffix at the start of `text`
    pub fn match_prefix(text: &str) -> Option<Self> {
        Self::BY_SUFFIX.iter().copied().find(|kind| {
            let suffix = kind.suffix();
            text.len() >= suffix.len()
                && text.is_char_boundary(suffix.len())
                && text[..suffix.len()].eq_ignore_ascii_case(suffix)
        })
    }

    /// Points represented by one of this unit, for absolute units only
    pub fn points_per_unit(self) -> Option<f64> {
        match self {
            UnitKind::Point => Some(1.0),
            UnitKind::Millimetre => Some(POINTS_PER_MM),
            UnitKind::Centimetre => Some(POINTS_PER_MM * 10.0),
            UnitKind::Inch => Some(POINTS_PER_INCH),
            UnitKind::Pixel => Some(POINTS_PER_PIXEL),
            UnitKind::Percent
            | UnitKind::Em
            | UnitKind::Rem
            | UnitKind::ViewWidth
            | UnitKind::ViewHeight => None,
        }
    }

    /// Whether the unit has a fixed size independent of layout
    pub fn is_absolute(self) -> bool {
        self.points_per_unit().is_some()
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A magnitude with a unit kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Numeric magnitude
    pub value: f64,
    /// Unit of the magnitude
    pub kind: UnitKind,
}

impl Unit {
    pub fn new(value: f64, kind: UnitKind) -> Self {
        Self { value, kind }
    }

    pub fn points(value: f64) -> Self {
        Self::new(value, UnitKind::Point)
    }

    pub fn percent(value: f64) -> Self {
        Self::new(value, UnitKind::Percent)
    }

    /// Size in points, `None` for relative units
    pub fn to_points(&self) -> Option<f64> {
        self.kind.points_per_unit().map(|factor| self.value * factor)
    }

    /// Bring two units onto a shared kind.
    ///
    /// Matching kinds are returned as-is; two absolute kinds are expressed in points.
    pub fn align(&self, other: &Unit) -> Option<(f64, f64, UnitKind)> {
        if self.kind == other.kind {
            return Some((self.value, other.value, self.kind));
        }
        match (self.to_points(), other.to_points()) {
            (Some(left), Some(right)) => Some((left, right, UnitKind::Point)),
            _ => None,
        }
    }

    /// Apply `op` to the magnitude, keeping the kind
    pub fn map(self, op: impl FnOnce(f64) -> f64) -> Self {
        Self::new(op(self.value), self.kind)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.kind)
    }
}

/// Error returned when text does not describe a unit value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a dimensional value")]
pub struct ParseUnitError(pub String);

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let split = text
            .find(|ch: char| !(ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+')))
            .ok_or_else(|| ParseUnitError(s.to_string()))?;
        let (number, suffix) = text.split_at(split);
        let value = number
            .parse::<f64>()
            .map_err(|_| ParseUnitError(s.to_string()))?;
        let kind = UnitKind::from_suffix(suffix).ok_or_else(|| ParseUnitError(s.to_string()))?;
        Ok(Unit::new(value, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("12pt".parse::<Unit>().unwrap(), Unit::points(12.0));
        assert_eq!("50%".parse::<Unit>().unwrap(), Unit::percent(50.0));
        assert_eq!(
            "1.5rem".parse::<Unit>().unwrap(),
            Unit::new(1.5, UnitKind::Rem)
        );
        assert!("12".parse::<Unit>().is_err());
        assert!("pt".parse::<Unit>().is_err());
        assert!("12furlongs".parse::<Unit>().is_err());
    }

    #[test]
    fn test_absolute_conversion() {
        assert_eq!(Unit::new(1.0, UnitKind::Inch).to_points(), Some(72.0));
        assert_eq!(Unit::new(96.0, UnitKind::Pixel).to_points(), Some(72.0));
        assert_eq!(Unit::percent(10.0).to_points(), None);
    }

    #[test]
    fn test_align() {
        let inch = Unit::new(1.0, UnitKind::Inch);
        let pts = Unit::points(20.0);
        assert_eq!(inch.align(&pts), Some((72.0, 20.0, UnitKind::Point)));
        assert_eq!(
            Unit::percent(5.0).align(&Unit::percent(10.0)),
            Some((5.0, 10.0, UnitKind::Percent))
        );
        assert_eq!(Unit::percent(5.0).align(&pts), None);
    }

    #[test]
    fn test_match_prefix_prefers_longest() {
        assert_eq!(UnitKind::match_prefix("rem + 1"), Some(UnitKind::Rem));
        assert_eq!(UnitKind::match_prefix("em"), Some(UnitKind::Em));
        assert_eq!(UnitKind::match_prefix("x"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Unit::points(52.0).to_string(), "52pt");
        assert_eq!(Unit::percent(12.5).to_string(), "12.5%");
    }
}
