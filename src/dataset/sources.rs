//! Domain record types handed to the frame engine by the loading collaborator.
//!
//! Everything here is already normalized: coordinates are decimal [`GeoPoint`]s, date
//! strings are [`Year`]s, and the only remaining sentinel is `to: None` for ongoing
//! records, resolved when the records enter an [`IntervalDataset`].

use crate::dataset::interval::IntervalDataset;
use crate::dataset::record::{Category, Impact, Jurisdiction, Temporal};
use crate::dataset::railway::RailwayNetwork;
use crate::foundation::core::{GeoPoint, Year};
use std::collections::BTreeMap;

macro_rules! impl_temporal {
    ($ty:ty, $from:ident, $to:ident, $category:expr) => {
        impl Temporal for $ty {
            fn from_year(&self) -> Year {
                self.$from
            }

            fn to_year(&self) -> Option<Year> {
                self.$to
            }

            fn category(&self) -> Category {
                $category
            }

            fn set_resolved_to(&mut self, to: Year) {
                self.$to = Some(to);
            }
        }
    };
}

/// Which map rendering a state name label belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MappingKind {
    /// The colonisation map.
    Colonisation,
    /// The legislative-controls map.
    Legislation,
}

/// A positioned state/territory name label.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StateName {
    /// Label anchor.
    pub position: GeoPoint,
    /// Display name.
    pub name: String,
    /// Which rendering the label is for.
    pub mapping: MappingKind,
}

/// Boundary geometry and labels effective over a span of years.
///
/// Exactly one ruleset should be active for any frame year; the scene builder treats
/// zero or multiple matches as a data-integrity condition and omits boundaries for the
/// frame.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BoundaryRuleset {
    /// First year the ruleset applies.
    pub effective_from: Year,
    /// Last year the ruleset applies; `None` while current.
    pub effective_to: Option<Year>,
    /// Boundary outlines.
    pub outlines: Vec<Vec<GeoPoint>>,
    /// State name labels for both renderings.
    pub names: Vec<StateName>,
}

impl_temporal!(BoundaryRuleset, effective_from, effective_to, Category::Boundary);

/// One explorer expedition with its path geometry.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ExplorerPath {
    /// Expedition start year.
    pub from: Year,
    /// Expedition end year.
    pub to: Option<Year>,
    /// Explorer name.
    pub name: String,
    /// Path line strings.
    pub paths: Vec<Vec<GeoPoint>>,
}

impl_temporal!(ExplorerPath, from, to, Category::Explorer);

/// A dated town or city.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Settlement {
    /// Founding year.
    pub founded: Year,
    /// Always `None` in practice; settlements persist to the horizon.
    pub dissolved: Option<Year>,
    /// Site position.
    pub location: GeoPoint,
    /// Present-day population, when known.
    pub population: Option<f64>,
    /// Town/city name.
    pub name: String,
}

impl_temporal!(Settlement, founded, dissolved, Category::Settlement);

/// A town or city with no recorded founding date; faded in globally over the
/// late-growth era instead of per-record.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct UndatedSettlement {
    /// Site position.
    pub location: GeoPoint,
    /// Present-day population, when known.
    pub population: Option<f64>,
    /// Town/city name.
    pub name: String,
}

/// One recorded massacre event.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MassacreSite {
    /// Event year.
    pub year: Year,
    /// Kept `None` at load; resolution pins the site to the horizon so it stays mapped.
    pub until: Option<Year>,
    /// Site position.
    pub location: GeoPoint,
    /// Victims killed.
    pub victims_dead: u32,
    /// Attackers killed.
    pub attackers_dead: u32,
    /// Aggressor description (only "Colonists" and labels starting with "Aboriginal"
    /// enter the running tally).
    pub attackers: String,
    /// Victim description.
    pub victims: String,
    /// Weapons description, when recorded.
    pub weapons: Option<String>,
    /// First Nations language group, when recorded.
    pub language_group: Option<String>,
    /// Precise date string, when recorded.
    pub known_date: Option<String>,
}

impl_temporal!(MassacreSite, year, until, Category::Massacre);

impl MassacreSite {
    /// Total dead at the site.
    pub fn number_dead(&self) -> u32 {
        self.victims_dead + self.attackers_dead
    }
}

/// A mission or reserve.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Mission {
    /// Opening year.
    pub from: Year,
    /// Closure year; `None` while still operating (resolves past the horizon).
    pub to: Option<Year>,
    /// Site position; records without resolved coordinates are never drawn.
    pub location: Option<GeoPoint>,
    /// Mission/reserve name.
    pub name: String,
}

impl_temporal!(Mission, from, to, Category::Mission);

/// An act of parliament.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LegislationAct {
    /// Year of assent.
    pub from: Year,
    /// Year of repeal; `None` while in force.
    pub to: Option<Year>,
    /// Enacting jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Recognized impact.
    pub impact: Impact,
    /// Legislation name.
    pub name: String,
}

impl_temporal!(LegislationAct, from, to, Category::Legislation);

/// An Aboriginal protection/protector board.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ProtectionBoard {
    /// Establishment year.
    pub from: Year,
    /// Abolition year; `None` while operating.
    pub to: Option<Year>,
    /// Jurisdiction the board operated in.
    pub jurisdiction: Jurisdiction,
    /// Recognized impact.
    pub impact: Impact,
    /// Board name.
    pub name: String,
}

impl_temporal!(ProtectionBoard, from, to, Category::ProtectionBoard);

/// An armed conflict.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Conflict {
    /// Conflict start year.
    pub from: Year,
    /// Conflict end year; `None` while ongoing.
    pub to: Option<Year>,
    /// Conflict name.
    pub name: String,
    /// Umbrella conflict, when part of one.
    pub parent: Option<String>,
    /// Marked as part of the Indigenous history telling; hidden in the white-history
    /// pass.
    pub indigenous_history: bool,
}

impl_temporal!(Conflict, from, to, Category::Conflict);

/// A defining moment in the national story.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DefiningMoment {
    /// Year the moment begins.
    pub from: Year,
    /// Year it ends; `None` while ongoing.
    pub to: Option<Year>,
    /// Moment text (word-wrapped at display time).
    pub text: String,
    /// Marked as part of the Indigenous history telling; hidden in the white-history
    /// pass.
    pub indigenous_history: bool,
}

impl_temporal!(DefiningMoment, from, to, Category::DefiningMoment);

/// Milestone matrix special rows, matched by event name.
pub mod milestone_rows {
    /// Row granting independence; later rows gray out per jurisdiction once reached.
    pub const INDEPENDENCE: &str = "Independence from Australia";
    /// First of the protection-era rows.
    pub const PROTECTORS: &str = "Protectors";
    /// Last of the protection-era rows.
    pub const PROTECTION_BOARDS: &str = "Protection Boards";
    /// Row whose dates gray out the protection-era rows.
    pub const PROTECTION_BOARDS_ABOLISHED: &str = "Protection Boards Abolished";
}

/// One milestone row: an event and the year each jurisdiction reached it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MilestoneRow {
    /// Event name.
    pub event: String,
    /// Year per column; `None` where the jurisdiction never reached it.
    pub years: Vec<Option<Year>>,
}

impl MilestoneRow {
    /// Earliest year in the row, if any cell is dated.
    pub fn min_year(&self) -> Option<Year> {
        self.years.iter().flatten().copied().min()
    }

    /// Latest year in the row, if any cell is dated.
    pub fn max_year(&self) -> Option<Year> {
        self.years.iter().flatten().copied().max()
    }
}

/// Milestone matrix: rows are policy milestones, columns are jurisdictions.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct MilestoneMatrix {
    /// Column display names, in matrix order.
    pub columns: Vec<String>,
    /// Milestone rows, in matrix order.
    pub rows: Vec<MilestoneRow>,
}

impl MilestoneMatrix {
    /// Index of the row with the given event name.
    pub fn row_index(&self, event: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.event == event)
    }

    /// Earliest year in column `col` across all rows.
    pub fn col_min(&self, col: usize) -> Option<Year> {
        self.rows
            .iter()
            .filter_map(|r| r.years.get(col).copied().flatten())
            .min()
    }

    /// Earliest dated cell anywhere in the matrix.
    pub fn earliest(&self) -> Option<Year> {
        self.rows.iter().filter_map(MilestoneRow::min_year).min()
    }
}

/// One year of the population census series.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct PopulationYear {
    /// Estimated Indigenous population.
    pub indigenous: u64,
    /// Estimated colonial (settler) population.
    pub colonial: u64,
    /// Estimated total population.
    pub total: u64,
    /// Indigenous share of total, in `[0, 1]`.
    pub indigenous_percentage: f64,
}

/// Per-year population totals keyed by year.
#[derive(Clone, Debug, Default)]
pub struct PopulationTable {
    by_year: BTreeMap<Year, PopulationYear>,
}

impl PopulationTable {
    /// Build from `(year, totals)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (Year, PopulationYear)>) -> Self {
        Self {
            by_year: entries.into_iter().collect(),
        }
    }

    /// Totals for `year`, if present.
    pub fn get(&self, year: Year) -> Option<&PopulationYear> {
        self.by_year.get(&year)
    }
}

/// One year of incarceration counts.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct IncarcerationYear {
    /// Aboriginal and Torres Strait Islander prisoners.
    pub indigenous: u64,
    /// Non-Indigenous prisoners.
    pub non_indigenous: u64,
}

impl IncarcerationYear {
    /// Indigenous share of the prison population, in `[0, 1]`.
    pub fn indigenous_share(&self) -> f64 {
        let total = self.indigenous + self.non_indigenous;
        if total == 0 {
            return 0.0;
        }
        self.indigenous as f64 / total as f64
    }
}

/// Yearly incarceration counts keyed by reference year.
#[derive(Clone, Debug, Default)]
pub struct IncarcerationTable {
    by_year: BTreeMap<Year, IncarcerationYear>,
}

impl IncarcerationTable {
    /// Build from `(year, counts)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (Year, IncarcerationYear)>) -> Self {
        Self {
            by_year: entries.into_iter().collect(),
        }
    }

    /// First reporting year, if any.
    pub fn earliest(&self) -> Option<Year> {
        self.by_year.keys().next().copied()
    }

    /// Counts for `year`, if present.
    pub fn get(&self, year: Year) -> Option<&IncarcerationYear> {
        self.by_year.get(&year)
    }
}

/// Deaths-in-custody totals keyed by the start of each July-June reporting year.
#[derive(Clone, Debug, Default)]
pub struct DeathsInCustodyTable {
    by_year: BTreeMap<Year, u64>,
}

impl DeathsInCustodyTable {
    /// Build from `(reporting start year, total)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (Year, u64)>) -> Self {
        Self {
            by_year: entries.into_iter().collect(),
        }
    }

    /// First reporting year, if any.
    pub fn earliest(&self) -> Option<Year> {
        self.by_year.keys().next().copied()
    }

    /// Total for the most recent reporting year at or before `year`.
    pub fn latest_on_or_before(&self, year: Year) -> Option<u64> {
        self.by_year.range(..=year).next_back().map(|(_, &v)| v)
    }

    /// Sum of totals across all reporting years at or before `year`.
    pub fn cumulative(&self, year: Year) -> u64 {
        self.by_year.range(..=year).map(|(_, &v)| v).sum()
    }
}

/// Everything the scene builder reads. Loaded once at startup, immutable for the run.
#[derive(Clone, Debug)]
pub struct FrameDatasets {
    /// Census series (required; every frame reads it).
    pub population: PopulationTable,
    /// Boundary rulesets keyed on effective-date ranges.
    pub boundaries: IntervalDataset<BoundaryRuleset>,
    /// Explorer expeditions.
    pub explorers: IntervalDataset<ExplorerPath>,
    /// Dated settlements.
    pub settlements: IntervalDataset<Settlement>,
    /// Settlements without founding dates.
    pub undated_settlements: Vec<UndatedSettlement>,
    /// Massacre sites.
    pub massacres: IntervalDataset<MassacreSite>,
    /// Railway lines and geometry.
    pub railways: RailwayNetwork,
    /// Missions and reserves.
    pub missions: IntervalDataset<Mission>,
    /// Legislation per jurisdiction.
    pub legislation: BTreeMap<Jurisdiction, IntervalDataset<LegislationAct>>,
    /// Protection boards, all jurisdictions.
    pub protection_boards: IntervalDataset<ProtectionBoard>,
    /// Armed conflicts.
    pub conflicts: IntervalDataset<Conflict>,
    /// Defining moments.
    pub defining_moments: IntervalDataset<DefiningMoment>,
    /// Policy milestone matrix.
    pub milestones: MilestoneMatrix,
    /// Incarceration counts.
    pub incarceration: IncarcerationTable,
    /// Deaths-in-custody totals.
    pub deaths_in_custody: DeathsInCustodyTable,
}

impl FrameDatasets {
    /// Datasets with nothing in them; frames built against this draw only the chrome
    /// that does not depend on records. Mostly useful in tests.
    pub fn empty(horizon: Year) -> Self {
        Self {
            population: PopulationTable::default(),
            boundaries: IntervalDataset::resolve(vec![], horizon),
            explorers: IntervalDataset::resolve(vec![], horizon),
            settlements: IntervalDataset::resolve(vec![], horizon),
            undated_settlements: vec![],
            massacres: IntervalDataset::resolve(vec![], horizon),
            railways: RailwayNetwork::default(),
            missions: IntervalDataset::resolve(vec![], horizon),
            legislation: BTreeMap::new(),
            protection_boards: IntervalDataset::resolve(vec![], horizon),
            conflicts: IntervalDataset::resolve(vec![], horizon),
            defining_moments: IntervalDataset::resolve(vec![], horizon),
            milestones: MilestoneMatrix::default(),
            incarceration: IncarcerationTable::default(),
            deaths_in_custody: DeathsInCustodyTable::default(),
        }
    }
}
