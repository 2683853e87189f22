use crate::foundation::core::{GeoPoint, Year, YearSpan};

/// Upper-bound semantics of a record's validity span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UpperBound {
    /// Active through the end year: `[from, to]`.
    Inclusive,
    /// No longer active at the end year: `[from, to)`.
    Exclusive,
}

/// Record category. Carries the per-category interval semantics so query call sites
/// never re-encode them with ad hoc comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    /// Acts of parliament controlling First Nations peoples.
    Legislation,
    /// Aboriginal protection/protector boards.
    ProtectionBoard,
    /// Missions and reserves.
    Mission,
    /// Armed conflicts.
    Conflict,
    /// Massacre events.
    Massacre,
    /// Towns and cities.
    Settlement,
    /// Policy milestones.
    Milestone,
    /// State/territory boundary rulesets.
    Boundary,
    /// Explorer expeditions.
    Explorer,
    /// Defining historical moments.
    DefiningMoment,
    /// Railway lines.
    Railway,
}

impl Category {
    /// Interval semantics at the span's end year.
    ///
    /// A law "to" year X is no longer in force at year X; a conflict "to" year X is
    /// still active in year X. Missions partition into open/closed with the same
    /// exclusive upper bound as legislation.
    pub fn upper_bound(self) -> UpperBound {
        match self {
            Self::Legislation | Self::ProtectionBoard | Self::Mission => UpperBound::Exclusive,
            Self::Conflict
            | Self::Massacre
            | Self::Settlement
            | Self::Milestone
            | Self::Boundary
            | Self::Explorer
            | Self::DefiningMoment
            | Self::Railway => UpperBound::Inclusive,
        }
    }
}

/// Whether a law or board was protective or repressive in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Impact {
    /// Recognized as beneficial.
    Positive,
    /// Recognized as harmful.
    Negative,
}

/// The ten legislative jurisdictions with a fixed text anchor on the map.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Jurisdiction {
    Vic,
    Nsw,
    Wa,
    Qld,
    Sa,
    Nt,
    Act,
    Tas,
    Commonwealth,
    BritishEmpire,
}

impl Jurisdiction {
    /// All jurisdictions in stable display order.
    pub const ALL: [Jurisdiction; 10] = [
        Jurisdiction::Vic,
        Jurisdiction::Nsw,
        Jurisdiction::Wa,
        Jurisdiction::Qld,
        Jurisdiction::Sa,
        Jurisdiction::Nt,
        Jurisdiction::Act,
        Jurisdiction::Tas,
        Jurisdiction::Commonwealth,
        Jurisdiction::BritishEmpire,
    ];

    /// Fixed `(lon, lat)` anchor for this jurisdiction's legislation stack.
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Self::Vic => (141.5, -36.0),
            Self::Nsw => (141.5, -30.4),
            Self::Wa => (116.0, -23.4),
            Self::Qld => (140.0, -20.9),
            Self::Sa => (129.5, -27.9),
            Self::Nt => (129.5, -16.4),
            Self::Act => (155.5, -34.7),
            Self::Tas => (145.5, -41.2),
            Self::Commonwealth => (153.0, -12.0),
            Self::BritishEmpire => (111.0, -12.0),
        }
    }

    /// Extra downward shift applied to the stack's first entry.
    ///
    /// The ACT anchor sits over the NSW/Eden-Monaro region; pushing its stack down is a
    /// known-unresolved visual-overlap workaround, not a geometric masking solution.
    pub fn stack_offset(self) -> f64 {
        match self {
            Self::Act => -0.8,
            _ => 0.0,
        }
    }

    /// Parliament heading shown above the stack, for jurisdictions that have one.
    pub fn parliament_heading(self) -> Option<&'static str> {
        match self {
            Self::Commonwealth => Some("Commonwealth Parliament"),
            Self::BritishEmpire => Some("British Parliament"),
            _ => None,
        }
    }
}

/// A time-bounded fact: a law, a mission, a conflict, a massacre, a settlement.
///
/// `to_year: None` means "ongoing"; it is resolved exactly once, at dataset load, to the
/// animation's horizon year and never mutated afterward (see
/// [`IntervalDataset::resolve`](super::interval::IntervalDataset)).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemporalRecord {
    /// First year of validity.
    pub from_year: Year,
    /// Last year of validity; `None` until sentinel resolution.
    pub to_year: Option<Year>,
    /// Record category (drives interval semantics).
    pub category: Category,
    /// Deaths, population, or other magnitude; `None` when unknown.
    #[serde(default)]
    pub magnitude: Option<f64>,
    /// Site position; `None` for records without a mappable location.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Free-form display label.
    pub label: String,
}

impl TemporalRecord {
    /// Construct an ongoing record (open-ended until resolution).
    pub fn ongoing(from_year: Year, category: Category, label: impl Into<String>) -> Self {
        Self {
            from_year,
            to_year: None,
            category,
            magnitude: None,
            location: None,
            label: label.into(),
        }
    }

    /// Construct a record bounded on both ends.
    pub fn bounded(
        from_year: Year,
        to_year: Year,
        category: Category,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from_year,
            to_year: Some(to_year),
            category,
            magnitude: None,
            location: None,
            label: label.into(),
        }
    }
}

/// Anything with a validity interval that an [`IntervalDataset`](super::interval::IntervalDataset)
/// can query.
pub trait Temporal {
    /// First year of validity.
    fn from_year(&self) -> Year;
    /// Last year of validity; `None` means ongoing (unresolved sentinel).
    fn to_year(&self) -> Option<Year>;
    /// Category, which fixes the upper-bound semantics.
    fn category(&self) -> Category;

    /// Replace the ongoing sentinel with a concrete end year.
    ///
    /// Called exactly once per open-ended record during dataset load; implementations
    /// must not be reachable afterward.
    fn set_resolved_to(&mut self, to: Year);

    /// Resolved span, once `to_year` is known.
    fn span(&self) -> Option<YearSpan> {
        let to = self.to_year()?;
        YearSpan::new(self.from_year(), to).ok()
    }
}

impl Temporal for TemporalRecord {
    fn from_year(&self) -> Year {
        self.from_year
    }

    fn to_year(&self) -> Option<Year> {
        self.to_year
    }

    fn category(&self) -> Category {
        self.category
    }

    fn set_resolved_to(&mut self, to: Year) {
        self.to_year = Some(to);
    }
}
