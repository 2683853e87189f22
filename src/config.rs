//! Scene and feature configuration.
//!
//! Two plain structs supplied at startup: [`SceneConfig`] fixes the timeline and the
//! encoder/pool constants, [`DisplayFlags`] selects which feature layers a frame emits.
//! Both are serde-derived so a host can ship them as JSON alongside the datasets.

use crate::foundation::core::Year;
use crate::foundation::error::{ChronomapError, ChronomapResult};

/// Timeline, memory-window and capacity constants for scene building.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    /// First year of the animation.
    pub epoch_year: Year,
    /// Last year of the animation (the horizon ongoing records resolve to).
    pub final_year: Year,
    /// Extra frames held at each end of a pass so the first and last year linger.
    pub repeat_frames: u64,
    /// Year undated settlements begin growing in.
    pub town_growth_start: Year,
    /// Years an expired conflict stays listed in the conflicts panel.
    pub conflict_memory_window: i32,
    /// Years an expired defining moment stays listed.
    pub moment_memory_window: i32,
    /// Years a finished expedition's path stays on the map.
    pub explorer_memory_window: i32,
    /// Indigenous population assumed in the year before the epoch.
    pub indigenous_population_baseline: f64,
    /// Column to wrap defining-moment text at.
    pub moment_wrap_width: usize,
    /// Column to wrap massacre narrative text at.
    pub massacre_wrap_width: usize,
    /// Fully-opaque entries held at the bottom of a scrolling panel.
    pub panel_hold_lines: usize,
    /// Fixed slot-pool capacities.
    pub pools: PoolCapacities,
}

/// Fixed capacities of the per-layer directive slot pools.
///
/// Every slot is emitted every frame (cleared slots as empty text), so these bound the
/// directive count of a frame and make the output shape year-independent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PoolCapacities {
    /// Conflict panel lines.
    pub conflict_lines: usize,
    /// Defining-moment lines retained after word wrap.
    pub moment_lines: usize,
    /// Defining-moment slot pool; oversized relative to the retained-line cap because
    /// word wrap multiplies line counts.
    pub moment_slots: usize,
    /// Massacre narrative lines retained.
    pub massacre_lines: usize,
    /// Massacre narrative slot pool.
    pub massacre_slots: usize,
    /// Milestone matrix cells.
    pub milestone_slots: usize,
    /// State/territory boundary outlines.
    pub boundary_slots: usize,
    /// State/territory name labels.
    pub state_name_slots: usize,
    /// Legislation stack entries across all jurisdictions.
    pub legislation_slots: usize,
    /// Explorer path polylines.
    pub explorer_path_slots: usize,
    /// Explorer roster labels.
    pub explorer_name_slots: usize,
    /// Railway polyline segments.
    pub railway_segment_slots: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            conflict_lines: 100,
            moment_lines: 98,
            moment_slots: (98.0_f64 * 1.7) as usize,
            massacre_lines: 95,
            massacre_slots: 96,
            milestone_slots: 169,
            boundary_slots: 10,
            state_name_slots: 15,
            legislation_slots: 10_000,
            explorer_path_slots: 40,
            explorer_name_slots: 40,
            railway_segment_slots: 20_000,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            epoch_year: Year(1766),
            final_year: Year(2020),
            repeat_frames: 1,
            town_growth_start: Year(1840),
            conflict_memory_window: 60,
            moment_memory_window: 10,
            explorer_memory_window: 70,
            indigenous_population_baseline: 750_000.0,
            moment_wrap_width: 50,
            massacre_wrap_width: 63,
            panel_hold_lines: 5,
            pools: PoolCapacities::default(),
        }
    }
}

impl SceneConfig {
    /// Number of distinct years a pass plays, inclusive of both ends.
    pub fn span_years(&self) -> i64 {
        i64::from(self.final_year.since(self.epoch_year)) + 1
    }

    /// Frames in one pass: the year span padded by a repeat block at each end.
    pub fn frames_per_pass(&self) -> u64 {
        self.span_years() as u64 + self.repeat_frames * 2
    }

    /// Check the timeline invariants the builders rely on.
    pub fn validated(self) -> ChronomapResult<Self> {
        if self.final_year <= self.epoch_year {
            return Err(ChronomapError::data_integrity(format!(
                "final year {} must be after epoch {}",
                self.final_year, self.epoch_year
            )));
        }
        if self.town_growth_start >= self.final_year {
            return Err(ChronomapError::data_integrity(format!(
                "town growth start {} must precede final year {}",
                self.town_growth_start, self.final_year
            )));
        }
        // Panel pools must hold their heading rows on top of the retained-line caps,
        // or the panels drop retained lines on every frame.
        if self.pools.massacre_slots <= self.pools.massacre_lines {
            return Err(ChronomapError::pool_exhaustion(format!(
                "massacre panel needs {} slots for its heading plus {} retained lines",
                self.pools.massacre_lines + 1,
                self.pools.massacre_lines
            )));
        }
        if self.pools.moment_slots < self.pools.moment_lines + 2 {
            return Err(ChronomapError::pool_exhaustion(format!(
                "moments panel needs {} slots for heading and spacer plus {} retained lines",
                self.pools.moment_lines + 2,
                self.pools.moment_lines
            )));
        }
        Ok(self)
    }
}

/// Feature-layer toggles.
///
/// The raw flags are independent; [`DisplayFlags::normalized`] applies the master-switch
/// dependencies (everything colonial requires `colonisation`, the Blak-history layers
/// additionally require `blak_history`, and the legal-controls view is the complement of
/// the colonisation view).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayFlags {
    pub state_boundaries: bool,
    pub colonisation: bool,
    pub blak_history: bool,
    pub explorers: bool,
    pub towns: bool,
    pub undated_towns: bool,
    pub railway_lines: bool,
    pub massacre_sites: bool,
    pub massacre_text: bool,
    pub missions: bool,
    pub deaths_in_custody: bool,
    pub incarceration_rates: bool,
    pub defining_moments: bool,
    pub conflicts: bool,
    pub milestones: bool,
    pub legislation: bool,
    pub protection_boards: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            state_boundaries: true,
            colonisation: true,
            blak_history: true,
            explorers: true,
            towns: true,
            undated_towns: true,
            railway_lines: true,
            massacre_sites: true,
            massacre_text: true,
            missions: true,
            deaths_in_custody: true,
            incarceration_rates: true,
            defining_moments: true,
            conflicts: true,
            milestones: true,
            legislation: true,
            protection_boards: true,
        }
    }
}

impl DisplayFlags {
    /// Apply the master-switch dependency chain and return the effective flags.
    ///
    /// `legislation`/`protection_boards` belong to the legal-controls view, which is only
    /// shown when the colonisation view is off.
    pub fn normalized(self) -> Self {
        let legal_controls = !self.colonisation;
        Self {
            state_boundaries: self.state_boundaries,
            colonisation: self.colonisation,
            blak_history: self.blak_history,
            explorers: self.colonisation && self.explorers,
            towns: self.colonisation && self.towns,
            undated_towns: self.colonisation && self.undated_towns,
            railway_lines: self.colonisation && self.railway_lines,
            massacre_sites: self.colonisation && self.massacre_sites && self.blak_history,
            massacre_text: self.colonisation && self.massacre_text && self.blak_history,
            missions: self.colonisation && self.missions && self.blak_history,
            deaths_in_custody: self.colonisation && self.deaths_in_custody && self.blak_history,
            incarceration_rates: self.colonisation
                && self.incarceration_rates
                && self.blak_history,
            defining_moments: self.colonisation && self.defining_moments,
            conflicts: self.colonisation && self.conflicts,
            milestones: self.milestones && self.blak_history,
            legislation: legal_controls && self.legislation,
            protection_boards: legal_controls && self.protection_boards,
        }
    }

    /// Flags with the Blak-history layers switched off, for the primary pass of a
    /// back-to-back run. The original flags are kept by the caller and restored at the
    /// pass boundary.
    pub fn without_blak_history(self) -> Self {
        Self {
            blak_history: false,
            missions: false,
            massacre_sites: false,
            massacre_text: false,
            deaths_in_custody: false,
            incarceration_rates: false,
            milestones: false,
            ..self
        }
    }
}
