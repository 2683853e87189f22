use crate::foundation::core::{GeoPoint, Year};
use crate::foundation::error::{ChronomapError, ChronomapResult};
use serde_json::Value;

/// Geometry payload of one railway feature.
///
/// The source GeoJSON mixes three nesting depths under the same `coordinates` key: a
/// bare position, a line string, and a multi-line bundle. The depth dispatch is a
/// structural requirement of the input format — a named line may expand into any of the
/// three — so it lives here once instead of at every call site.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RailGeometry {
    /// Depth 1: a single `[lon, lat]` position.
    Position(GeoPoint),
    /// Depth 2: one line string.
    Path(Vec<GeoPoint>),
    /// Depth 3: a bundle of line strings.
    Bundle(Vec<Vec<GeoPoint>>),
}

impl RailGeometry {
    /// Parse a `coordinates` JSON value, dispatching on nesting depth.
    pub fn from_json(coords: &Value) -> ChronomapResult<Self> {
        match nesting_depth(coords) {
            1 => Ok(Self::Position(position(coords)?)),
            2 => Ok(Self::Path(path(coords)?)),
            3 => {
                let outer = coords
                    .as_array()
                    .ok_or_else(|| ChronomapError::data_integrity("bundle is not an array"))?;
                let mut bundle = Vec::with_capacity(outer.len());
                for part in outer {
                    bundle.push(path(part)?);
                }
                Ok(Self::Bundle(bundle))
            }
            d => Err(ChronomapError::data_integrity(format!(
                "railway coordinates with unsupported nesting depth {d}"
            ))),
        }
    }

    /// Flatten to drawable polylines. A bare position becomes a single-point polyline,
    /// matching how the source plotted it.
    pub fn polylines(&self) -> Vec<Vec<GeoPoint>> {
        match self {
            Self::Position(p) => vec![vec![*p]],
            Self::Path(path) => vec![path.clone()],
            Self::Bundle(bundle) => bundle.clone(),
        }
    }
}

/// Nesting depth of a JSON array-of-arrays; 0 for an empty array, -1 for a non-array.
/// Probes the first element only, the same way the source data was shaped.
fn nesting_depth(v: &Value) -> i32 {
    match v {
        Value::Array(items) => match items.first() {
            None => 0,
            Some(first) => {
                let inner = nesting_depth(first);
                if inner < 0 { 1 } else { 1 + inner }
            }
        },
        _ => -1,
    }
}

fn position(v: &Value) -> ChronomapResult<GeoPoint> {
    let pair = v
        .as_array()
        .ok_or_else(|| ChronomapError::data_integrity("position is not an array"))?;
    let lon = pair
        .first()
        .and_then(Value::as_f64)
        .ok_or_else(|| ChronomapError::data_integrity("position missing longitude"))?;
    let lat = pair
        .get(1)
        .and_then(Value::as_f64)
        .ok_or_else(|| ChronomapError::data_integrity("position missing latitude"))?;
    GeoPoint::new(lat, lon)
}

fn path(v: &Value) -> ChronomapResult<Vec<GeoPoint>> {
    let items = v
        .as_array()
        .ok_or_else(|| ChronomapError::data_integrity("line string is not an array"))?;
    items.iter().map(position).collect()
}

/// A named railway line: operating dates plus its geometry features.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RailwayLine {
    /// Line name (the join key between operating dates and geometry).
    pub name: String,
    /// Construction start year.
    pub commenced: Option<Year>,
    /// Opening year.
    pub opened: Option<Year>,
    /// Closure year; `None` while still operating.
    pub closed: Option<Year>,
    /// Geometry features for this line, any mix of nesting depths.
    pub segments: Vec<RailGeometry>,
}

/// All railway lines, with the three independent interval queries the frame needs.
///
/// Railways deliberately do not go through [`IntervalDataset`](super::interval::IntervalDataset):
/// each display class cuts on a different date column.
#[derive(Clone, Debug, Default)]
pub struct RailwayNetwork {
    lines: Vec<RailwayLine>,
}

impl RailwayNetwork {
    /// Wrap a set of loaded lines.
    pub fn new(lines: Vec<RailwayLine>) -> Self {
        Self { lines }
    }

    /// All lines.
    pub fn lines(&self) -> &[RailwayLine] {
        &self.lines
    }

    /// Under construction: commenced but not yet opened (and not somehow closed).
    pub fn commenced(&self, year: Year) -> Vec<&RailwayLine> {
        self.lines
            .iter()
            .filter(|l| {
                l.commenced.is_some_and(|c| c <= year)
                    && l.opened.is_none_or(|o| o > year)
                    && l.closed.is_none_or(|c| c > year)
            })
            .collect()
    }

    /// Open and operating.
    pub fn opened(&self, year: Year) -> Vec<&RailwayLine> {
        self.lines
            .iter()
            .filter(|l| l.opened.is_some_and(|o| o <= year) && l.closed.is_none_or(|c| c > year))
            .collect()
    }

    /// Closed by `year`.
    pub fn closed(&self, year: Year) -> Vec<&RailwayLine> {
        self.lines
            .iter()
            .filter(|l| l.closed.is_some_and(|c| c <= year))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn depth_dispatch_covers_all_three_levels() {
        let pos = RailGeometry::from_json(&json!([151.2, -33.8])).unwrap();
        assert_eq!(pos.polylines().len(), 1);
        assert_eq!(pos.polylines()[0].len(), 1);

        let path =
            RailGeometry::from_json(&json!([[151.2, -33.8], [150.9, -33.9]])).unwrap();
        assert_eq!(path.polylines(), vec![vec![
            GeoPoint::new(-33.8, 151.2).unwrap(),
            GeoPoint::new(-33.9, 150.9).unwrap(),
        ]]);

        let bundle = RailGeometry::from_json(&json!([
            [[151.2, -33.8], [150.9, -33.9]],
            [[145.0, -37.8], [144.9, -37.7]],
        ]))
        .unwrap();
        assert_eq!(bundle.polylines().len(), 2);
    }

    #[test]
    fn unsupported_depth_is_rejected() {
        assert!(RailGeometry::from_json(&json!(42)).is_err());
        assert!(RailGeometry::from_json(&json!([[[[151.2, -33.8]]]])).is_err());
    }

    fn line(name: &str, commenced: i32, opened: i32, closed: Option<i32>) -> RailwayLine {
        RailwayLine {
            name: name.to_owned(),
            commenced: Some(Year(commenced)),
            opened: Some(Year(opened)),
            closed: closed.map(Year),
            segments: vec![],
        }
    }

    #[test]
    fn interval_classes_are_disjoint_over_a_lifecycle() {
        let net = RailwayNetwork::new(vec![line("Main South", 1855, 1862, Some(1990))]);

        assert!(net.commenced(Year(1854)).is_empty());
        assert_eq!(net.commenced(Year(1855)).len(), 1);
        assert_eq!(net.commenced(Year(1861)).len(), 1);

        assert!(net.commenced(Year(1862)).is_empty());
        assert_eq!(net.opened(Year(1862)).len(), 1);
        assert_eq!(net.opened(Year(1989)).len(), 1);

        assert!(net.opened(Year(1990)).is_empty());
        assert_eq!(net.closed(Year(1990)).len(), 1);
        assert_eq!(net.closed(Year(2020)).len(), 1);
    }

    #[test]
    fn still_operating_line_never_closes() {
        let mut l = line("North Coast", 1905, 1915, None);
        l.closed = None;
        let net = RailwayNetwork::new(vec![l]);
        assert_eq!(net.opened(Year(2020)).len(), 1);
        assert!(net.closed(Year(2020)).is_empty());
    }
}
