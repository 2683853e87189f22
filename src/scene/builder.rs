//! Frame assembly.
//!
//! [`build_frame`] turns `(year, cursor, datasets)` into an ordered directive sequence.
//! The builder never mutates the datasets and never fails a whole frame over one bad
//! layer: a sub-feature that cannot be built is logged and omitted, and the rest of the
//! frame goes out.

use crate::config::{DisplayFlags, SceneConfig};
use crate::dataset::sources::{FrameDatasets, MassacreSite};
use crate::foundation::core::{GeoPoint, Rgb, Year, ZLayer};
use crate::foundation::error::ChronomapResult;
use crate::scene::cursor::YearCursor;
use crate::scene::directive::{DrawDirective, LineStyle, MapPos, MarkerShape, TextAnchor};
use crate::scene::panels;
use crate::scene::pool::{LineEntry, ScenePools, TextEntry};
use crate::style;

const BLACK: Rgb = Rgb::new(0, 0, 0);
const WHITE: Rgb = Rgb::new(255, 255, 255);
const BLUE: Rgb = Rgb::new(0, 0, 255);
const LIGHT_BLUE: Rgb = Rgb::new(173, 216, 230);
const PURPLE: Rgb = Rgb::new(128, 0, 128);
const GREY: Rgb = Rgb::new(128, 128, 128);
const RED: Rgb = Rgb::new(207, 33, 10);

/// First year of colonisation; the acknowledgment fades out as this year approaches.
const COLONISATION_YEAR: Year = Year(1788);
/// Start of the deaths-in-custody royal commission.
const ROYAL_COMMISSION_FROM: Year = Year(1987);
/// Release year of the royal commission report.
const ROYAL_COMMISSION_TO: Year = Year(1991);

/// Population columns of the summary block.
const POP_X1: f64 = 108.0;
const POP_X2: f64 = 119.0;
const POP_X3: f64 = 121.0;
const POP_X4: f64 = 133.0;
const POP_Y1: f64 = -40.2;
const POP_Y2: f64 = -40.7;
const POP_BAR_WIDTH: f64 = 12.0;

fn pos(p: GeoPoint) -> MapPos {
    MapPos::new(p.lon, p.lat)
}

fn group_digits(n: i64) -> String {
    let negative = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn text(pos: MapPos, text: String, color: Rgb, size: f64, alpha: f64, anchor: TextAnchor) -> DrawDirective {
    DrawDirective::Text {
        pos,
        text,
        color,
        size,
        alpha,
        anchor,
    }
}

/// Build one frame.
///
/// Flags are normalized here, so callers may hand over raw toggles. Pools are reset at
/// the top, filled by the per-layer passes, and every pool is emitted every frame —
/// unused slots as transparent ghosts, which is what keeps stale text from surviving a
/// layer that goes quiet.
pub fn build_frame(
    year: Year,
    cursor: &YearCursor,
    datasets: &FrameDatasets,
    config: &SceneConfig,
    flags: DisplayFlags,
    pools: &mut ScenePools,
) -> ChronomapResult<(Vec<DrawDirective>, YearCursor)> {
    let flags = flags.normalized();
    pools.reset_all();

    let mut out = Vec::new();

    // Fill phase: everything slot-pooled.
    if flags.state_boundaries {
        fill_boundaries(year, datasets, flags.colonisation, pools);
    }
    let explorer_roster = if flags.explorers {
        fill_explorers(year, datasets, config, pools)
    } else {
        Vec::new()
    };
    fill_explorer_roster(&explorer_roster, pools);
    if flags.railway_lines {
        fill_railways(year, datasets, pools);
    }
    if flags.legislation || flags.protection_boards {
        panels::legislation_stacks(year, datasets, flags.legislation, flags.protection_boards, pools);
    }
    if flags.milestones {
        panels::milestone_matrix_panel(year, &datasets.milestones, pools);
    }
    if flags.conflicts {
        panels::conflict_panel(year, datasets, flags.blak_history, config, pools);
    }
    if flags.defining_moments {
        panels::moments_panel(year, datasets, flags.blak_history, config, pools);
    }

    let massacre_sites = sites_through(year, datasets);
    if flags.massacre_text && !massacre_sites.is_empty() {
        let span = massacre_span(&massacre_sites, config);
        let (lines, _tally) = panels::massacre_narrative(year, &massacre_sites, span, config);
        panels::massacre_panel(&lines, config, pools);
    }

    // Emission phase: fixed order, pools interleaved with the per-marker layers.
    pools.boundaries.emit_into(&mut out);
    pools.state_names.emit_into(&mut out);
    pools.explorer_paths.emit_into(&mut out);
    pools.explorer_names.emit_into(&mut out);
    if flags.undated_towns && year >= config.town_growth_start {
        emit_undated_towns(year, datasets, config, &mut out);
    }
    if flags.towns {
        emit_towns(year, datasets, config, &mut out);
    }
    if flags.massacre_sites {
        emit_massacre_markers(year, &massacre_sites, config, &mut out);
    }
    pools.railway_segments.emit_into(&mut out);
    if flags.missions {
        emit_missions(year, datasets, &mut out);
    }
    pools.legislation.emit_into(&mut out);

    emit_acknowledgment(year, config, flags.blak_history, &mut out);
    let next_cursor = emit_population_summary(year, cursor, datasets, config, flags, &mut out);

    out.push(text(
        MapPos::new(136.5, -9.5),
        format!("Year: {year}"),
        BLUE,
        15.0,
        1.0,
        TextAnchor::Left,
    ));

    if flags.deaths_in_custody {
        emit_deaths_in_custody(year, datasets, &mut out);
    }

    pools.milestones.emit_into(&mut out);
    pools.conflicts.emit_into(&mut out);
    pools.moments.emit_into(&mut out);
    pools.massacre_lines.emit_into(&mut out);

    tracing::debug!(year = year.0, directives = out.len(), "frame built");
    Ok((out, next_cursor))
}

fn fill_boundaries(year: Year, datasets: &FrameDatasets, colonisation: bool, pools: &mut ScenePools) {
    use crate::dataset::sources::MappingKind;

    let ruleset = match datasets.boundaries.active_single(year) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(year = year.0, error = %e, "boundary lookup failed, layer omitted");
            return;
        }
    };

    for outline in &ruleset.outlines {
        let entry = LineEntry {
            points: outline.iter().copied().map(pos).collect(),
            color: Rgb::gray(0.7),
            style: LineStyle::Solid,
            width: 0.5,
            alpha: 1.0,
        };
        if !pools.boundaries.push(entry) {
            tracing::debug!("boundary slot pool exhausted");
        }
    }

    let wanted = if colonisation {
        MappingKind::Colonisation
    } else {
        MappingKind::Legislation
    };
    for name in ruleset.names.iter().filter(|n| n.mapping == wanted) {
        let entry = TextEntry {
            pos: pos(name.position),
            text: name.name.clone(),
            color: Rgb::gray(0.6),
            size: 10.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        };
        if !pools.state_names.push(entry) {
            tracing::debug!("state name slot pool exhausted");
        }
    }
}

/// Fill explorer path slots and return the roster `(label, alpha)` pairs, oldest first.
fn fill_explorers(
    year: Year,
    datasets: &FrameDatasets,
    config: &SceneConfig,
    pools: &mut ScenePools,
) -> Vec<(String, f64)> {
    let window = config.explorer_memory_window;
    let start = year.offset(-window);
    let mut roster = Vec::new();

    for exp in datasets
        .explorers
        .records()
        .iter()
        .filter(|e| e.from >= start && e.from <= year)
    {
        let Some(to) = exp.to else { continue };
        // In progress: the path firms up as publication nears. Past: linear fade from
        // memory. Otherwise the expedition completed this year and shows in full.
        let (color, alpha) = if exp.from != to && to > year {
            (GREY, 1.0 / f64::from(to.since(year)))
        } else if year > to {
            (PURPLE, style::linear_fade(year, to, window))
        } else {
            (PURPLE, 1.0)
        };

        for path in &exp.paths {
            let entry = LineEntry {
                points: path.iter().copied().map(pos).collect(),
                color,
                style: LineStyle::Dotted,
                width: 1.0,
                alpha,
            };
            if !pools.explorer_paths.push(entry) {
                tracing::debug!("explorer path slot pool exhausted");
            }
        }

        roster.push((format!("{} - {}: {}", exp.from, to, exp.name), alpha));
    }
    roster
}

/// Roster panel under the map: heading plus entries newest-first.
fn fill_explorer_roster(roster: &[(String, f64)], pools: &mut ScenePools) {
    if roster.is_empty() {
        return;
    }
    let x = 106.0;
    let mut y = -27.5;
    let heading_alpha = roster.iter().map(|(_, a)| *a).fold(0.0, f64::max);

    let heading = TextEntry {
        pos: MapPos::new(x, y),
        text: "Explorers".to_owned(),
        color: PURPLE,
        size: 10.0,
        alpha: heading_alpha,
        anchor: TextAnchor::Left,
    };
    if !pools.explorer_names.push(heading) {
        return;
    }
    y -= 0.4;

    for (label, alpha) in roster.iter().rev() {
        y -= 0.34;
        let entry = TextEntry {
            pos: MapPos::new(x, y),
            text: label.clone(),
            color: PURPLE,
            size: 7.0,
            alpha: *alpha,
            anchor: TextAnchor::Left,
        };
        if !pools.explorer_names.push(entry) {
            tracing::debug!("explorer name slot pool exhausted");
        }
    }
}

fn fill_railways(year: Year, datasets: &FrameDatasets, pools: &mut ScenePools) {
    let classes = [
        (datasets.railways.commenced(year), Rgb::gray(0.5), LineStyle::Dashed),
        (datasets.railways.opened(year), Rgb::gray(0.3), LineStyle::Solid),
        (datasets.railways.closed(year), Rgb::gray(0.6), LineStyle::Dotted),
    ];
    for (lines, color, style) in classes {
        for line in lines {
            for geometry in &line.segments {
                for polyline in geometry.polylines() {
                    let entry = LineEntry {
                        points: polyline.into_iter().map(pos).collect(),
                        color,
                        style,
                        width: 0.7,
                        alpha: 1.0,
                    };
                    if !pools.railway_segments.push(entry) {
                        tracing::debug!(line = %line.name, "railway segment slot pool exhausted");
                    }
                }
            }
        }
    }
}

fn emit_towns(year: Year, datasets: &FrameDatasets, config: &SceneConfig, out: &mut Vec<DrawDirective>) {
    for town in datasets
        .settlements
        .records()
        .iter()
        .filter(|s| s.founded >= config.epoch_year && s.founded <= year)
    {
        let age = year.since(town.founded);
        let color = style::settlement_color(age);
        let size = match town.population {
            Some(total) => {
                let grown = style::population_growth_interpolation(
                    total,
                    town.founded,
                    year,
                    config.final_year,
                );
                style::magnitude_size(Some(grown))
            }
            None => style::magnitude_size(None),
        };
        out.push(DrawDirective::Point {
            pos: pos(town.location),
            size,
            color,
            alpha: 1.0,
            layer: ZLayer::Settlement,
            marker: MarkerShape::Circle,
        });
    }
}

fn emit_undated_towns(
    year: Year,
    datasets: &FrameDatasets,
    config: &SceneConfig,
    out: &mut Vec<DrawDirective>,
) {
    let growth_span = f64::from(config.final_year.since(config.town_growth_start));
    if growth_span <= 0.0 {
        return;
    }
    let perc = 1.0 - f64::from(config.final_year.since(year)) / growth_span;

    for town in &datasets.undated_settlements {
        let size = style::magnitude_size(town.population.map(|p| p * perc));
        out.push(DrawDirective::Point {
            pos: pos(town.location),
            size,
            color: style::SETTLEMENT_BASE,
            alpha: perc,
            layer: ZLayer::UndatedSettlement,
            marker: MarkerShape::Circle,
        });
    }
}

/// Massacre sites recorded up to `year`, chronological.
fn sites_through(year: Year, datasets: &FrameDatasets) -> Vec<&MassacreSite> {
    let mut sites: Vec<&MassacreSite> = datasets
        .massacres
        .records()
        .iter()
        .filter(|s| s.year <= year)
        .collect();
    sites.sort_by_key(|s| s.year);
    sites
}

/// Years from the earliest recorded site to the animation horizon, the span the site
/// markers decay over.
fn massacre_span(sites: &[&MassacreSite], config: &SceneConfig) -> i32 {
    sites
        .first()
        .map(|s| config.final_year.since(s.year))
        .unwrap_or(0)
}

fn emit_massacre_markers(
    year: Year,
    sites: &[&MassacreSite],
    config: &SceneConfig,
    out: &mut Vec<DrawDirective>,
) {
    let span = massacre_span(sites, config);
    for site in sites {
        let color = style::severity_color(
            year,
            site.year,
            span,
            style::MASSACRE_BASE,
            style::MASSACRE_TARGET,
        );
        let alpha = style::massacre_alpha(year, site.year, span);
        out.push(DrawDirective::Point {
            pos: pos(site.location),
            size: f64::from(site.number_dead()),
            color,
            alpha,
            layer: ZLayer::Massacre,
            marker: MarkerShape::Circle,
        });
    }
}

fn emit_missions(year: Year, datasets: &FrameDatasets, out: &mut Vec<DrawDirective>) {
    // Closed missions first so open markers paint over a reopened site.
    for mission in datasets
        .missions
        .records()
        .iter()
        .filter(|m| m.to.is_some_and(|t| t <= year))
    {
        let Some(location) = mission.location else { continue };
        out.push(DrawDirective::Point {
            pos: pos(location),
            size: 10.0,
            color: LIGHT_BLUE,
            alpha: 1.0,
            layer: ZLayer::Mission,
            marker: MarkerShape::Diamond,
        });
    }
    for mission in datasets.missions.active(year) {
        let Some(location) = mission.location else { continue };
        out.push(DrawDirective::Point {
            pos: pos(location),
            size: 15.0,
            color: BLUE,
            alpha: 1.0,
            layer: ZLayer::Mission,
            marker: MarkerShape::Diamond,
        });
    }
}

/// Acknowledgment of Country (or its absence) over the pre-colonial years, fading as
/// 1788 approaches.
fn emit_acknowledgment(
    year: Year,
    config: &SceneConfig,
    blak_history: bool,
    out: &mut Vec<DrawDirective>,
) {
    if year >= COLONISATION_YEAR {
        return;
    }
    let fade_span = COLONISATION_YEAR.since(config.epoch_year) - 1;
    if fade_span <= 0 {
        return;
    }
    let alpha = 1.0 - f64::from(year.since(config.epoch_year)) / f64::from(fade_span);
    let (x, message) = if blak_history {
        (
            115.0,
            "Acknowledging the traditional owners of this land, paying respect to the \
             people, the cultures, and the elders past and present, that which has been \
             lost, and that which has survived",
        )
    } else {
        (132.5, "Terra Nullius")
    };
    out.push(text(
        MapPos::new(x, -26.0),
        message.to_owned(),
        Rgb::gray(0.1),
        10.0,
        alpha,
        TextAnchor::Left,
    ));
}

fn change_value_color(change: i64) -> Rgb {
    if change < 0 {
        RED
    } else if change == 0 {
        Rgb::gray(0.25)
    } else {
        BLACK
    }
}

fn change_label_color(change: i64) -> Rgb {
    if change == 0 { Rgb::gray(0.25) } else { BLACK }
}

/// Population readouts, percentage bars, and the incarceration block. Returns the
/// cursor for the next frame.
fn emit_population_summary(
    year: Year,
    cursor: &YearCursor,
    datasets: &FrameDatasets,
    config: &SceneConfig,
    flags: DisplayFlags,
    out: &mut Vec<DrawDirective>,
) -> YearCursor {
    let Some(pop) = datasets.population.get(year) else {
        tracing::warn!(year = year.0, "population table has no entry, summary omitted");
        return YearCursor {
            current_year: year,
            ..*cursor
        };
    };

    let at_epoch = year == config.epoch_year;
    let indigenous = pop.indigenous as i64;
    let non_indigenous = if flags.blak_history {
        pop.total as i64 - indigenous
    } else {
        pop.colonial as i64
    };

    let (indigenous_change, non_indigenous_change) = if at_epoch {
        (0, 0)
    } else {
        let ic = if flags.blak_history {
            indigenous - cursor.previous_indigenous_population
        } else {
            0
        };
        (ic, non_indigenous - cursor.previous_non_indigenous_population)
    };

    if flags.blak_history {
        out.push(text(
            MapPos::new(POP_X1, POP_Y1),
            "Est. Indigenous Population: ".to_owned(),
            BLACK,
            10.0,
            1.0,
            TextAnchor::Left,
        ));
        out.push(text(
            MapPos::new(POP_X2, POP_Y1),
            group_digits(indigenous),
            BLACK,
            10.0,
            1.0,
            TextAnchor::Right,
        ));
        out.push(text(
            MapPos::new(POP_X3, POP_Y1),
            "Est. Indigenous Population Change: ".to_owned(),
            change_label_color(indigenous_change),
            10.0,
            1.0,
            TextAnchor::Left,
        ));
        out.push(text(
            MapPos::new(POP_X4, POP_Y1),
            group_digits(indigenous_change),
            change_value_color(indigenous_change),
            10.0,
            1.0,
            TextAnchor::Right,
        ));
    }

    // The non-Indigenous row renders in both views, relabelled and shifted without the
    // Indigenous row above it.
    let (label_x, label_text, change_value_x) = if flags.blak_history {
        (POP_X1, "Est. non-Indigenous Population: ", POP_X4)
    } else {
        (113.0, "Est. Population: ", 128.0)
    };
    let current_color = if non_indigenous == 0 { Rgb::gray(0.25) } else { BLACK };
    out.push(text(
        MapPos::new(label_x, POP_Y2),
        label_text.to_owned(),
        current_color,
        10.0,
        1.0,
        TextAnchor::Left,
    ));
    out.push(text(
        MapPos::new(POP_X2, POP_Y2),
        group_digits(non_indigenous),
        current_color,
        10.0,
        1.0,
        TextAnchor::Right,
    ));
    out.push(text(
        MapPos::new(POP_X3, POP_Y2),
        if flags.blak_history {
            "Est. non-Indigenous Population Change: "
        } else {
            "Est. Population Change: "
        }
        .to_owned(),
        change_label_color(non_indigenous_change),
        10.0,
        1.0,
        TextAnchor::Left,
    ));
    out.push(text(
        MapPos::new(change_value_x, POP_Y2),
        group_digits(non_indigenous_change),
        change_value_color(non_indigenous_change),
        10.0,
        1.0,
        TextAnchor::Right,
    ));

    if flags.blak_history {
        let perc = pop.indigenous_percentage.clamp(0.0, 1.0);
        out.push(text(
            MapPos::new(POP_X3, -41.0),
            format!("Percent Indigenous Population: {:.1}%", perc * 100.0),
            Rgb::gray(0.9),
            10.0,
            1.0,
            TextAnchor::Left,
        ));
        out.push(DrawDirective::Rect {
            pos: MapPos::new(POP_X3, -42.5),
            width: POP_BAR_WIDTH,
            height: 1.0,
            color: WHITE,
            alpha: 1.0,
        });
        out.push(DrawDirective::Rect {
            pos: MapPos::new(POP_X3, -42.5),
            width: POP_BAR_WIDTH * perc,
            height: 1.0,
            color: Rgb::gray(1.0 - perc),
            alpha: 1.0,
        });

        if flags.incarceration_rates
            && datasets.incarceration.earliest().is_some_and(|e| year >= e)
        {
            emit_incarceration(year, datasets, out);
        }
    }

    YearCursor {
        current_year: year,
        previous_indigenous_population: if at_epoch {
            config.indigenous_population_baseline as i64
        } else if flags.blak_history {
            indigenous
        } else {
            cursor.previous_indigenous_population
        },
        previous_non_indigenous_population: if at_epoch { 0 } else { non_indigenous },
    }
}

fn emit_incarceration(year: Year, datasets: &FrameDatasets, out: &mut Vec<DrawDirective>) {
    let Some(counts) = datasets.incarceration.get(year) else {
        tracing::warn!(year = year.0, "incarceration table has no entry, block omitted");
        return;
    };
    let perc = counts.indigenous_share();

    out.push(text(
        MapPos::new(POP_X3, -42.9),
        format!("Percent Incarcerated that are Indigenous: {:.1}%", perc * 100.0),
        Rgb::gray(0.9),
        10.0,
        1.0,
        TextAnchor::Left,
    ));
    out.push(DrawDirective::Rect {
        pos: MapPos::new(POP_X3, -44.5),
        width: POP_BAR_WIDTH,
        height: 1.0,
        color: WHITE,
        alpha: 1.0,
    });
    out.push(DrawDirective::Rect {
        pos: MapPos::new(POP_X3, -44.5),
        width: POP_BAR_WIDTH * perc,
        height: 1.0,
        color: Rgb::gray(0.9),
        alpha: 1.0,
    });

    out.push(text(
        MapPos::new(133.5, -43.9),
        format!(
            "First Nations incarcerated in current year: {}",
            group_digits(counts.indigenous as i64)
        ),
        Rgb::gray(0.2),
        7.0,
        1.0,
        TextAnchor::Left,
    ));
    out.push(text(
        MapPos::new(133.5, -44.3),
        format!(
            "Non-Indigenous incarcerated in current year: {}",
            group_digits(counts.non_indigenous as i64)
        ),
        Rgb::gray(0.2),
        7.0,
        1.0,
        TextAnchor::Left,
    ));
}

fn emit_deaths_in_custody(year: Year, datasets: &FrameDatasets, out: &mut Vec<DrawDirective>) {
    let x = 133.5;
    let mut y = -41.5;

    if year >= ROYAL_COMMISSION_FROM {
        let alpha = if year <= ROYAL_COMMISSION_TO {
            f64::from(year.since(ROYAL_COMMISSION_FROM))
                / f64::from(ROYAL_COMMISSION_TO.since(ROYAL_COMMISSION_FROM))
        } else {
            1.0
        };
        out.push(text(
            MapPos::new(x, y),
            "1987-1991: Royal Commission Report into".to_owned(),
            Rgb::gray(0.2),
            8.0,
            alpha,
            TextAnchor::Left,
        ));
        y -= 0.4;
        out.push(text(
            MapPos::new(x, y),
            "     Aboriginal Deaths in Custody released".to_owned(),
            Rgb::gray(0.2),
            8.0,
            alpha,
            TextAnchor::Left,
        ));
    } else {
        y -= 0.4;
    }
    y -= 0.8;

    if datasets.deaths_in_custody.earliest().is_some_and(|e| year >= e) {
        let current = datasets.deaths_in_custody.latest_on_or_before(year).unwrap_or(0);
        let aggregate = datasets.deaths_in_custody.cumulative(year);
        out.push(text(
            MapPos::new(x, y),
            format!("First Nations deaths in custody in current year: {current}"),
            Rgb::gray(0.2),
            7.0,
            1.0,
            TextAnchor::Left,
        ));
        y -= 0.4;
        out.push(text(
            MapPos::new(x, y),
            format!("First Nations deaths in custody since 1980: {aggregate}"),
            Rgb::gray(0.2),
            7.0,
            1.0,
            TextAnchor::Left,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolCapacities;
    use crate::dataset::interval::IntervalDataset;
    use crate::dataset::sources::{
        PopulationTable, PopulationYear, Settlement, UndatedSettlement,
    };
    use crate::scene::fingerprint::fingerprint_scene;

    fn population_table(config: &SceneConfig) -> PopulationTable {
        let mut entries = Vec::new();
        for y in config.epoch_year.0..=config.final_year.0 {
            let colonial = if y < 1788 { 0 } else { (y - 1787) as u64 * 1000 };
            let indigenous = 750_000u64.saturating_sub((y - 1766) as u64 * 100);
            entries.push((
                Year(y),
                PopulationYear {
                    indigenous,
                    colonial,
                    total: indigenous + colonial,
                    indigenous_percentage: indigenous as f64 / (indigenous + colonial).max(1) as f64,
                },
            ));
        }
        PopulationTable::new(entries)
    }

    fn datasets(config: &SceneConfig) -> FrameDatasets {
        let mut d = FrameDatasets::empty(config.final_year);
        d.population = population_table(config);
        d
    }

    fn build(
        year: Year,
        cursor: &YearCursor,
        d: &FrameDatasets,
        config: &SceneConfig,
        flags: DisplayFlags,
    ) -> (Vec<DrawDirective>, YearCursor) {
        let mut pools = ScenePools::new(&PoolCapacities::default());
        build_frame(year, cursor, d, config, flags, &mut pools)
            .unwrap_or_else(|e| panic!("frame build failed: {e}"))
    }

    fn texts(directives: &[DrawDirective]) -> Vec<&str> {
        directives
            .iter()
            .filter_map(|d| match d {
                DrawDirective::Text { text, alpha, .. } if *alpha > 0.0 && !text.is_empty() => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn same_inputs_build_identical_frames() {
        let config = SceneConfig::default();
        let d = datasets(&config);
        let cursor = YearCursor::at_epoch(&config);
        let (a, _) = build(Year(1900), &cursor, &d, &config, DisplayFlags::default());
        let (b, _) = build(Year(1900), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(fingerprint_scene(&a), fingerprint_scene(&b));
    }

    #[test]
    fn epoch_frame_reports_zero_change() {
        let config = SceneConfig::default();
        let d = datasets(&config);
        let cursor = YearCursor::at_epoch(&config);
        let (frame, next) = build(config.epoch_year, &cursor, &d, &config, DisplayFlags::default());
        let t = texts(&frame);
        assert!(t.contains(&"Est. Indigenous Population: "));
        assert!(t.contains(&"0"), "change readouts show zero at the epoch");
        assert_eq!(next.previous_indigenous_population, 750_000);
        assert_eq!(next.previous_non_indigenous_population, 0);
    }

    #[test]
    fn population_change_tracks_the_cursor() {
        let config = SceneConfig::default();
        let d = datasets(&config);
        let cursor = YearCursor::at_epoch(&config);
        let (_, c1900) = build(Year(1900), &cursor, &d, &config, DisplayFlags::default());
        let (frame, c1901) = build(Year(1901), &c1900, &d, &config, DisplayFlags::default());
        // Indigenous falls 100/year, non-Indigenous rises 1000/year in the fixture.
        let t = texts(&frame);
        assert!(t.contains(&"-100"), "texts: {t:?}");
        assert!(t.contains(&"1,000"));
        assert_eq!(
            c1901.previous_indigenous_population,
            c1900.previous_indigenous_population - 100
        );
    }

    #[test]
    fn acknowledgment_switches_with_blak_history() {
        let config = SceneConfig::default();
        let d = datasets(&config);
        let cursor = YearCursor::at_epoch(&config);

        let (frame, _) = build(Year(1770), &cursor, &d, &config, DisplayFlags::default());
        assert!(texts(&frame).iter().any(|t| t.starts_with("Acknowledging")));

        let flags = DisplayFlags {
            blak_history: false,
            ..DisplayFlags::default()
        };
        let (frame, _) = build(Year(1770), &cursor, &d, &config, flags);
        assert!(texts(&frame).contains(&"Terra Nullius"));

        // Gone from 1788 onward.
        let (frame, _) = build(Year(1788), &cursor, &d, &config, DisplayFlags::default());
        assert!(!texts(&frame).iter().any(|t| t.starts_with("Acknowledging")));
    }

    #[test]
    fn towns_appear_only_after_founding() {
        let config = SceneConfig::default();
        let mut d = datasets(&config);
        d.settlements = IntervalDataset::resolve(
            vec![Settlement {
                founded: Year(1850),
                dissolved: None,
                location: GeoPoint::new(-33.8, 151.2).unwrap(),
                population: Some(1000.0),
                name: "Townsville".to_owned(),
            }],
            config.final_year,
        );
        let cursor = YearCursor::at_epoch(&config);

        let settlement_points = |frame: &[DrawDirective]| {
            frame
                .iter()
                .filter(|d| {
                    matches!(
                        d,
                        DrawDirective::Point {
                            layer: ZLayer::Settlement,
                            ..
                        }
                    )
                })
                .count()
        };

        let (frame, _) = build(Year(1849), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(settlement_points(&frame), 0);
        let (frame, _) = build(Year(1850), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(settlement_points(&frame), 1);
    }

    #[test]
    fn undated_towns_fade_in_over_the_growth_era() {
        let config = SceneConfig::default();
        let mut d = datasets(&config);
        d.undated_settlements = vec![UndatedSettlement {
            location: GeoPoint::new(-35.0, 149.0).unwrap(),
            population: Some(5000.0),
            name: "Queanbeyan".to_owned(),
        }];
        let cursor = YearCursor::at_epoch(&config);

        let undated_alpha = |frame: &[DrawDirective]| {
            frame.iter().find_map(|d| match d {
                DrawDirective::Point {
                    layer: ZLayer::UndatedSettlement,
                    alpha,
                    ..
                } => Some(*alpha),
                _ => None,
            })
        };

        let (frame, _) = build(Year(1839), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(undated_alpha(&frame), None, "hidden before the growth era");
        let (frame, _) = build(Year(1930), &cursor, &d, &config, DisplayFlags::default());
        let mid = undated_alpha(&frame).unwrap_or_else(|| panic!("missing at 1930"));
        let (frame, _) = build(Year(2020), &cursor, &d, &config, DisplayFlags::default());
        let end = undated_alpha(&frame).unwrap_or_else(|| panic!("missing at 2020"));
        assert!(mid > 0.0 && mid < 1.0);
        assert!((end - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missions_partition_into_open_and_closed_markers() {
        use crate::dataset::sources::Mission;
        let config = SceneConfig::default();
        let mut d = datasets(&config);
        d.missions = IntervalDataset::resolve(
            vec![
                Mission {
                    from: Year(1880),
                    to: Some(Year(1920)),
                    location: Some(GeoPoint::new(-34.0, 142.0).unwrap()),
                    name: "Closed by now".to_owned(),
                },
                Mission {
                    from: Year(1900),
                    to: None,
                    location: Some(GeoPoint::new(-30.0, 152.0).unwrap()),
                    name: "Still open".to_owned(),
                },
            ],
            config.final_year,
        );
        let cursor = YearCursor::at_epoch(&config);
        let (frame, _) = build(Year(1950), &cursor, &d, &config, DisplayFlags::default());

        let mission_sizes: Vec<f64> = frame
            .iter()
            .filter_map(|d| match d {
                DrawDirective::Point {
                    layer: ZLayer::Mission,
                    size,
                    ..
                } => Some(*size),
                _ => None,
            })
            .collect();
        assert_eq!(mission_sizes, vec![10.0, 15.0]);
    }

    #[test]
    fn legal_controls_view_swaps_layers() {
        let config = SceneConfig::default();
        let d = datasets(&config);
        let cursor = YearCursor::at_epoch(&config);
        let flags = DisplayFlags {
            colonisation: false,
            ..DisplayFlags::default()
        };
        let (frame, _) = build(Year(1900), &cursor, &d, &config, flags);
        // No settlement or massacre points in the legal-controls view.
        assert!(!frame.iter().any(|d| matches!(
            d,
            DrawDirective::Point {
                layer: ZLayer::Settlement | ZLayer::Massacre,
                ..
            }
        )));
    }

    #[test]
    fn royal_commission_fades_in_then_holds() {
        let config = SceneConfig::default();
        let mut d = datasets(&config);
        d.deaths_in_custody =
            crate::dataset::sources::DeathsInCustodyTable::new([(Year(1980), 10), (Year(1990), 12)]);
        let cursor = YearCursor::at_epoch(&config);

        let commission_alpha = |frame: &[DrawDirective]| {
            frame.iter().find_map(|dir| match dir {
                DrawDirective::Text { text, alpha, .. }
                    if text.starts_with("1987-1991") =>
                {
                    Some(*alpha)
                }
                _ => None,
            })
        };

        let (frame, _) = build(Year(1986), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(commission_alpha(&frame), None);
        let (frame, _) = build(Year(1989), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(commission_alpha(&frame), Some(0.5));
        let (frame, _) = build(Year(2000), &cursor, &d, &config, DisplayFlags::default());
        assert_eq!(commission_alpha(&frame), Some(1.0));

        // Aggregate line sums the reporting years.
        let (frame, _) = build(Year(1995), &cursor, &d, &config, DisplayFlags::default());
        assert!(texts(&frame).contains(&"First Nations deaths in custody since 1980: 22"));
    }

    #[test]
    fn thousands_grouping_handles_negatives() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(-12_345), "-12,345");
        assert_eq!(group_digits(750_000), "750,000");
    }
}
