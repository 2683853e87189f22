use crate::foundation::error::{ChronomapError, ChronomapResult};

/// Calendar year in timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Year(pub i32);

impl Year {
    /// Signed distance in years from `other` to `self`.
    pub fn since(self, other: Year) -> i32 {
        self.0 - other.0
    }

    /// Shift by `delta` years.
    pub fn offset(self, delta: i32) -> Year {
        Year(self.0 + delta)
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed year span `[start, end]` in timeline space.
///
/// Whether the upper bound is treated as inclusive or exclusive at query time is a
/// property of the record's category, not of the span itself (see `Category::upper_bound`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct YearSpan {
    /// First year of validity.
    pub start: Year,
    /// Last year of validity.
    pub end: Year,
}

impl YearSpan {
    /// Create a validated span with `start <= end`.
    pub fn new(start: Year, end: Year) -> ChronomapResult<Self> {
        if start > end {
            return Err(ChronomapError::data_integrity(format!(
                "YearSpan start {start} must be <= end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of years covered, counting both endpoints.
    pub fn len_years(self) -> i32 {
        self.end.0 - self.start.0 + 1
    }

    /// Return `true` when `y` lies in `[start, end]`.
    pub fn contains(self, y: Year) -> bool {
        self.start <= y && y <= self.end
    }
}

/// Geographic position in decimal degrees.
///
/// Constructed only through [`GeoPoint::new`] or the coordinate normalizer; the scene
/// builder never assembles raw latitude/longitude pairs ad hoc.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in `[-90, 90]`.
    pub lat: f64,
    /// Longitude in `[-180, 180]`.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a validated point.
    pub fn new(lat: f64, lon: f64) -> ChronomapResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ChronomapError::data_integrity(format!(
                "latitude {lat} out of range [-90, 90]"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ChronomapError::data_integrity(format!(
                "longitude {lon} out of range [-180, 180]"
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// Straight RGB color (no alpha; alpha travels separately on directives).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Matplotlib-style grayscale shorthand: `gray(0.25)` is a dark gray.
    pub fn gray(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r: v, g: v, b: v }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Paint order for overlapping map features; higher layers paint over lower ones.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ZLayer {
    /// Explorer paths sit under everything else.
    ExplorerPath,
    /// Settlements without a founding date.
    UndatedSettlement,
    /// Dated settlements.
    Settlement,
    /// State/territory boundary lines and names.
    StateBoundary,
    /// Massacre site markers.
    Massacre,
    /// Mission/reserve markers.
    Mission,
    /// Railway line segments.
    Railway,
    /// Scrolling text panels paint over all map features.
    ScrollingText,
}

impl ZLayer {
    /// Numeric paint order.
    pub fn order(self) -> u8 {
        match self {
            Self::ExplorerPath => 1,
            Self::UndatedSettlement => 2,
            Self::Settlement => 3,
            Self::StateBoundary => 4,
            Self::Massacre => 5,
            Self::Mission => 6,
            Self::Railway => 7,
            Self::ScrollingText => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_span_rejects_inverted_bounds() {
        assert!(YearSpan::new(Year(1918), Year(1914)).is_err());
        let span = YearSpan::new(Year(1914), Year(1918)).unwrap();
        assert_eq!(span.len_years(), 5);
        assert!(span.contains(Year(1914)));
        assert!(span.contains(Year(1918)));
        assert!(!span.contains(Year(1919)));
    }

    #[test]
    fn geo_point_validates_ranges() {
        assert!(GeoPoint::new(-33.5, 151.2).is_ok());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn rgb_hex_is_lowercase_padded() {
        assert_eq!(Rgb::new(207, 33, 10).to_hex(), "#cf210a");
        assert_eq!(Rgb::new(105, 10, 3).to_hex(), "#690a03");
        assert_eq!(Rgb::gray(0.0).to_hex(), "#000000");
    }

    #[test]
    fn z_layers_are_strictly_ordered() {
        assert!(ZLayer::ExplorerPath.order() < ZLayer::Settlement.order());
        assert!(ZLayer::StateBoundary.order() < ZLayer::Massacre.order());
        assert!(ZLayer::Railway.order() < ZLayer::ScrollingText.order());
    }
}
