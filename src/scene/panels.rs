//! Text-stack and scrolling-panel sub-builders.
//!
//! Each function fills a slot pool for one panel; the orchestrator decides order and
//! emits the pools. Entries never abort a frame: when a pool runs out of slots the
//! overflow is dropped (active entries were pushed first, so only the oldest expired
//! entries fall off) and a debug event is logged.

use crate::config::SceneConfig;
use crate::dataset::record::{Impact, Jurisdiction, Temporal};
use crate::dataset::sources::{milestone_rows, FrameDatasets, MassacreSite, MilestoneMatrix};
use crate::foundation::core::{Rgb, Year};
use crate::scene::directive::{MapPos, TextAnchor};
use crate::scene::pool::{word_wrap, ScenePools, TextEntry, TextPool};
use crate::style;

const RED: Rgb = Rgb::new(207, 33, 10);
const PEACEKEEPING_BLUE: Rgb = Rgb::new(91, 146, 229);
const MAGENTA: Rgb = Rgb::new(255, 0, 255);

fn push_or_log(pool: &mut TextPool, panel: &str, entry: TextEntry) {
    if !pool.push(entry) {
        tracing::debug!(panel, "slot pool exhausted, entry dropped");
    }
}

/// Per-jurisdiction legislation stacks plus active protection boards.
///
/// Each jurisdiction grows an independent vertical stack below its anchor; the
/// Commonwealth and British stacks get a parliament heading when non-empty. The ACT
/// stack is pushed further down to dodge the NSW text region (a known overlap
/// workaround, not a masking fix).
pub fn legislation_stacks(
    year: Year,
    datasets: &FrameDatasets,
    show_legislation: bool,
    show_boards: bool,
    pools: &mut ScenePools,
) {
    for jur in Jurisdiction::ALL {
        let (anchor_x, anchor_y) = jur.anchor();

        if show_legislation {
            let active: Vec<_> = datasets
                .legislation
                .get(&jur)
                .map(|ds| ds.active(year))
                .unwrap_or_default();

            if let Some(heading) = jur.parliament_heading()
                && !active.is_empty()
            {
                push_or_log(
                    &mut pools.legislation,
                    "legislation",
                    TextEntry {
                        pos: MapPos::new(anchor_x, anchor_y),
                        text: heading.to_owned(),
                        color: Rgb::gray(0.25),
                        size: 10.0,
                        alpha: 1.0,
                        anchor: TextAnchor::Left,
                    },
                );
            }

            let mut y = anchor_y - 0.2 + jur.stack_offset() - 0.25;
            for act in active {
                y -= 0.25;
                let color = match act.impact {
                    Impact::Positive => Rgb::gray(0.25),
                    Impact::Negative => RED,
                };
                push_or_log(
                    &mut pools.legislation,
                    "legislation",
                    TextEntry {
                        pos: MapPos::new(anchor_x, y),
                        text: act.name.clone(),
                        color,
                        size: 6.0,
                        alpha: 1.0,
                        anchor: TextAnchor::Left,
                    },
                );
            }
        }

        if show_boards {
            for board in datasets.protection_boards.active(year) {
                if board.jurisdiction != jur {
                    continue;
                }
                let color = match board.impact {
                    Impact::Positive => Rgb::gray(0.25),
                    Impact::Negative => MAGENTA,
                };
                push_or_log(
                    &mut pools.legislation,
                    "legislation",
                    TextEntry {
                        pos: MapPos::new(anchor_x, anchor_y),
                        text: board.name.clone(),
                        color,
                        size: 8.0,
                        alpha: 1.0,
                        anchor: TextAnchor::Left,
                    },
                );
            }
        }
    }
}

fn conflict_line(
    from: Year,
    to: Year,
    parent: Option<&str>,
    name: &str,
    active: bool,
    year: Year,
) -> String {
    let shown_to = if active { year } else { to };
    match parent {
        Some(p) => format!("{from}-{shown_to}: [{p}] {name}"),
        None => format!("{from}-{shown_to}: {name}"),
    }
}

fn conflict_color(name: &str, parent: Option<&str>) -> Rgb {
    if name == "Frontier Wars"
        || parent == Some("Frontier Wars")
        || parent == Some("Hawkesbury and Nepean Wars")
    {
        RED
    } else if name.contains("(Peacekeeping)") {
        PEACEKEEPING_BLUE
    } else {
        Rgb::gray(0.15)
    }
}

/// The conflicts panel: active conflicts, then conflicts within the veteran memory
/// window fading on the radial law.
pub fn conflict_panel(
    year: Year,
    datasets: &FrameDatasets,
    include_indigenous_history: bool,
    config: &SceneConfig,
    pools: &mut ScenePools,
) {
    let keep = |indigenous: bool| include_indigenous_history || !indigenous;

    let active: Vec<_> = datasets
        .conflicts
        .active(year)
        .into_iter()
        .filter(|c| keep(c.indigenous_history))
        .collect();
    let expired: Vec<_> = datasets
        .conflicts
        .recently_expired(year, config.conflict_memory_window)
        .into_iter()
        .filter(|c| keep(c.indigenous_history))
        .collect();

    if active.is_empty() && expired.is_empty() {
        return;
    }

    let x = 106.0;
    let top = -9.0;
    let row = 0.34;
    let mut counted = 0usize;

    push_or_log(
        &mut pools.conflicts,
        "conflicts",
        TextEntry {
            pos: MapPos::new(x, top),
            text: "Australian Conflicts".to_owned(),
            color: Rgb::gray(0.1),
            size: 10.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        },
    );
    counted += 1;
    // Spacer row under the heading.
    push_or_log(
        &mut pools.conflicts,
        "conflicts",
        TextEntry {
            pos: MapPos::new(x, top - counted as f64 * row),
            text: String::new(),
            color: Rgb::gray(0.1),
            size: 8.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        },
    );
    counted += 1;

    for c in &active {
        let Some(to) = c.to_year() else { continue };
        push_or_log(
            &mut pools.conflicts,
            "conflicts",
            TextEntry {
                pos: MapPos::new(x, top - counted as f64 * row),
                text: conflict_line(c.from, to, c.parent.as_deref(), &c.name, true, year),
                color: conflict_color(&c.name, c.parent.as_deref()),
                size: 8.0,
                alpha: 1.0,
                anchor: TextAnchor::Left,
            },
        );
        counted += 1;
    }

    for c in &expired {
        let Some(to) = c.to_year() else { continue };
        let alpha = style::age_fade(year, to, config.conflict_memory_window);
        push_or_log(
            &mut pools.conflicts,
            "conflicts",
            TextEntry {
                pos: MapPos::new(x, top - counted as f64 * row),
                text: conflict_line(c.from, to, c.parent.as_deref(), &c.name, false, year),
                color: Rgb::gray(0.3),
                size: 8.0,
                alpha,
                anchor: TextAnchor::Left,
            },
        );
        counted += 1;
    }
}

/// The defining-moments panel: word-wrapped active moments, then recently expired ones
/// fading over the citizen memory window. Past lines are truncated when actives plus
/// past exceed the retained-line cap; actives are never dropped.
pub fn moments_panel(
    year: Year,
    datasets: &FrameDatasets,
    include_indigenous_history: bool,
    config: &SceneConfig,
    pools: &mut ScenePools,
) {
    let keep = |indigenous: bool| include_indigenous_history || !indigenous;

    let active: Vec<_> = datasets
        .defining_moments
        .active(year)
        .into_iter()
        .filter(|m| keep(m.indigenous_history))
        .collect();
    let expired: Vec<_> = datasets
        .defining_moments
        .recently_expired(year, config.moment_memory_window)
        .into_iter()
        .filter(|m| keep(m.indigenous_history))
        .collect();

    if active.is_empty() && expired.is_empty() {
        return;
    }

    let x = if include_indigenous_history { 153.8 } else { 156.2 };
    let top = -11.25;
    let row = 0.34;
    let mut counted = 0usize;

    push_or_log(
        &mut pools.moments,
        "moments",
        TextEntry {
            pos: MapPos::new(x, top),
            text: "Defining Moments".to_owned(),
            color: Rgb::gray(0.15),
            size: 10.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        },
    );
    // Wider gap under the heading than between entries.
    counted += 2;
    push_or_log(
        &mut pools.moments,
        "moments",
        TextEntry {
            pos: MapPos::new(x, top - counted as f64 * row),
            text: String::new(),
            color: Rgb::gray(0.15),
            size: 7.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        },
    );
    counted += 1;

    let mut active_lines = Vec::new();
    for m in &active {
        let indent = format!("{}: ", m.from);
        for line in word_wrap(&m.text, config.moment_wrap_width, &indent, "      ") {
            active_lines.push(TextEntry {
                pos: MapPos::new(x, top - counted as f64 * row),
                text: line,
                color: Rgb::gray(0.15),
                size: 7.0,
                alpha: 1.0,
                anchor: TextAnchor::Left,
            });
            counted += 1;
        }
    }

    let mut past_lines = Vec::new();
    for m in &expired {
        let Some(to) = m.to_year() else { continue };
        let alpha = style::age_fade(year, to, config.moment_memory_window);
        let indent = format!("{}: ", m.from);
        for line in word_wrap(&m.text, config.moment_wrap_width, &indent, "      ") {
            past_lines.push(TextEntry {
                pos: MapPos::new(x, top - counted as f64 * row),
                text: line,
                color: Rgb::gray(0.3),
                size: 7.0,
                alpha,
                anchor: TextAnchor::Left,
            });
            counted += 1;
        }
    }

    // Truncate expired lines only; active lines always survive.
    let cap = config.pools.moment_lines;
    if active_lines.len() + past_lines.len() > cap {
        tracing::debug!(
            active = active_lines.len(),
            past = past_lines.len(),
            cap,
            "moment lines over cap, truncating expired tail"
        );
        past_lines.truncate(cap.saturating_sub(active_lines.len()));
    }

    for entry in active_lines.into_iter().chain(past_lines) {
        push_or_log(&mut pools.moments, "moments", entry);
    }
}

/// Running tally of attacks grouped by recognized aggressor label.
///
/// Only the two explicitly recognized labels enter the tally; sites with other
/// aggressor labels are plotted but not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MassacreTally {
    pub attacks_by_colonists: u32,
    pub colonist_attackers_dead: u32,
    pub colonist_victims_dead: u32,
    pub attacks_by_first_nations: u32,
    pub first_nations_attackers_dead: u32,
    pub first_nations_victims_dead: u32,
}

impl MassacreTally {
    /// Fold one site into the tally, if its aggressor label is recognized.
    pub fn record(&mut self, site: &MassacreSite) {
        if site.attackers == "Colonists" {
            self.attacks_by_colonists += 1;
            self.colonist_attackers_dead += site.attackers_dead;
            self.colonist_victims_dead += site.victims_dead;
        } else if site.attackers.starts_with("Aboriginal") {
            self.attacks_by_first_nations += 1;
            self.first_nations_attackers_dead += site.attackers_dead;
            self.first_nations_victims_dead += site.victims_dead;
        }
    }

    pub fn total_attacks(&self) -> u32 {
        self.attacks_by_colonists + self.attacks_by_first_nations
    }

    pub fn total_dead(&self) -> u32 {
        self.colonist_attackers_dead
            + self.colonist_victims_dead
            + self.first_nations_attackers_dead
            + self.first_nations_victims_dead
    }
}

fn group_digits(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Assemble the massacre narrative as `(line, color)` pairs in chronological order.
///
/// Each site contributes four wrapped text blocks (newest fragment first within each
/// block) separated by one blank line; years with no event contribute a blank line each,
/// so the panel scrolls at one line per year between events. The tally summary goes at
/// the end, colored like the current shade of the oldest site.
pub fn massacre_narrative(
    year: Year,
    sites: &[&MassacreSite],
    total_span: i32,
    config: &SceneConfig,
) -> (Vec<(String, Rgb)>, MassacreTally) {
    let mut lines: Vec<(String, Rgb)> = Vec::new();
    let mut tally = MassacreTally::default();

    let Some(first) = sites.first() else {
        return (lines, tally);
    };
    let mut previous_year = first.year;
    let oldest_color =
        style::severity_color(year, first.year, total_span, style::MASSACRE_BASE, style::MASSACRE_TARGET);

    let mut push_wrapped = |lines: &mut Vec<(String, Rgb)>, text: String, color: Rgb| {
        let wrapped = word_wrap(&text, config.massacre_wrap_width, "", "      ");
        for line in wrapped.into_iter().rev() {
            lines.push((line, color));
        }
    };

    for site in sites {
        let color = style::severity_color(
            year,
            site.year,
            total_span,
            style::MASSACRE_BASE,
            style::MASSACRE_TARGET,
        );

        // One blank line per quiet year between events.
        let gap = site.year.since(previous_year);
        if gap > 1 {
            for _ in 1..gap {
                lines.push((String::new(), color));
            }
        }
        previous_year = site.year;

        let known_date = site
            .known_date
            .clone()
            .unwrap_or_else(|| site.year.to_string());
        let language = site.language_group.clone().unwrap_or_default();
        let weapons = site.weapons.clone().unwrap_or_default();

        lines.push((String::new(), color));
        push_wrapped(&mut lines, format!("Attack involved {weapons}"), color);
        push_wrapped(
            &mut lines,
            format!("{} attacked {}", site.attackers, site.victims),
            color,
        );
        push_wrapped(
            &mut lines,
            format!(
                "{} dead. Attackers: {}, Victims: {}",
                site.number_dead(),
                site.attackers_dead,
                site.victims_dead
            ),
            color,
        );
        push_wrapped(&mut lines, format!("{known_date} - {language}"), color);

        tally.record(site);
    }

    // Quiet years since the last event keep the panel scrolling.
    if let Some(last) = sites.last() {
        let gap = year.since(last.year);
        for _ in 1..gap.max(1) {
            lines.push((String::new(), oldest_color));
        }
    }

    lines.push((String::new(), oldest_color));
    lines.push((String::new(), oldest_color));
    lines.push((
        format!(
            "{} attacks by First Nations; {} victims. {} attackers died",
            group_digits(tally.attacks_by_first_nations),
            group_digits(tally.first_nations_victims_dead),
            group_digits(tally.first_nations_attackers_dead)
        ),
        oldest_color,
    ));
    lines.push((
        format!(
            "{} attacks by colonists; {} victims. {} attackers died",
            group_digits(tally.attacks_by_colonists),
            group_digits(tally.colonist_victims_dead),
            group_digits(tally.colonist_attackers_dead)
        ),
        oldest_color,
    ));
    lines.push((
        format!(
            "{} identified massacre events; {} dead",
            group_digits(tally.total_attacks()),
            group_digits(tally.total_dead())
        ),
        oldest_color,
    ));

    (lines, tally)
}

/// The massacre narrative panel: heading plus the newest lines of the narrative,
/// newest at the top, with the radial tail fade dissolving the oldest retained lines.
pub fn massacre_panel(
    lines: &[(String, Rgb)],
    config: &SceneConfig,
    pools: &mut ScenePools,
) {
    let Some((_, heading_color)) = lines.first() else {
        return;
    };

    let x = 161.7;
    let top = -11.25;

    push_or_log(
        &mut pools.massacre_lines,
        "massacres",
        TextEntry {
            pos: MapPos::new(x, top),
            text: "Massacres".to_owned(),
            color: *heading_color,
            size: 10.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        },
    );

    let cap = config.pools.massacre_lines;
    let start = lines.len().saturating_sub(cap);
    let shown = &lines[start..];

    // Newest entries at the top, oldest at the bottom, fade indexed into the full
    // alpha ramp so a short list still starts near full opacity.
    let mut y = top - 0.68;
    for (offset, (text, color)) in shown.iter().rev().enumerate() {
        y -= 0.34;
        let fade_index = cap - 1 - offset.min(cap - 1);
        let alpha = style::panel_tail_fade(fade_index, cap, config.panel_hold_lines);
        push_or_log(
            &mut pools.massacre_lines,
            "massacres",
            TextEntry {
                pos: MapPos::new(x, y),
                text: text.clone(),
                color: *color,
                size: 7.0,
                alpha,
                anchor: TextAnchor::Left,
            },
        );
    }
}

/// The milestone matrix: column headers plus per-row event names and dates, with
/// independence and protection-board-abolition graying out dependent cells.
pub fn milestone_matrix_panel(year: Year, matrix: &MilestoneMatrix, pools: &mut ScenePools) {
    let Some(earliest) = matrix.earliest() else {
        return;
    };
    if year < earliest {
        return;
    }

    let init_x = 120.1;
    let init_y = -34.8;
    let init_offset = 0.1;
    let col_offset = 1.2;
    let row_offset = 0.4;
    let base = Rgb::gray(0.25);
    let grayed = Rgb::gray(0.5);

    let independence_row = matrix.row_index(milestone_rows::INDEPENDENCE);
    let protectors_row = matrix.row_index(milestone_rows::PROTECTORS);
    let board_row = matrix.row_index(milestone_rows::PROTECTION_BOARDS);
    let abolished_row = matrix.row_index(milestone_rows::PROTECTION_BOARDS_ABOLISHED);
    let abolished_max = abolished_row.and_then(|r| matrix.rows[r].max_year());

    let in_protection_band = |row: usize| match (protectors_row, board_row) {
        (Some(p), Some(b)) => row >= p && row <= b,
        _ => false,
    };

    // Column headers appear once the column has any reached milestone.
    for (col, name) in matrix.columns.iter().enumerate().skip(1) {
        if matrix.col_min(col).is_some_and(|min| year >= min) {
            push_or_log(
                &mut pools.milestones,
                "milestones",
                TextEntry {
                    pos: MapPos::new(init_x + init_offset + col as f64 * col_offset, init_y),
                    text: name.clone(),
                    color: base,
                    size: 8.0,
                    alpha: 1.0,
                    anchor: TextAnchor::Center,
                },
            );
        }
    }

    let mut counted = 0usize;
    for (row_idx, row) in matrix.rows.iter().enumerate() {
        let Some(min) = row.min_year() else { continue };
        if year < min {
            continue;
        }
        let y = init_y - row_offset * (counted + 1) as f64;

        // Event-name gray-out once the protection era has fully ended.
        let name_color = if abolished_max.is_some_and(|m| year >= m) && in_protection_band(row_idx)
        {
            grayed
        } else {
            base
        };
        push_or_log(
            &mut pools.milestones,
            "milestones",
            TextEntry {
                pos: MapPos::new(init_x, y),
                text: row.event.clone(),
                color: name_color,
                size: 8.0,
                alpha: 1.0,
                anchor: TextAnchor::Right,
            },
        );

        for (col, cell) in row.years.iter().enumerate().skip(1) {
            let Some(cell_year) = cell else { continue };
            if year < *cell_year {
                continue;
            }

            let abolished_here = abolished_row
                .and_then(|r| matrix.rows[r].years.get(col).copied().flatten())
                .is_some_and(|a| year >= a)
                || abolished_max.is_some_and(|m| year >= m);
            let independent_here = independence_row.is_some_and(|ir| {
                row_idx > ir
                    && matrix.rows[ir]
                        .years
                        .get(col)
                        .copied()
                        .flatten()
                        .is_some_and(|iy| year >= iy)
            });

            let color = if abolished_here && in_protection_band(row_idx) {
                grayed
            } else if independent_here {
                grayed
            } else {
                base
            };
            push_or_log(
                &mut pools.milestones,
                "milestones",
                TextEntry {
                    pos: MapPos::new(init_x + init_offset + col as f64 * col_offset, y),
                    text: cell_year.to_string(),
                    color,
                    size: 8.0,
                    alpha: 1.0,
                    anchor: TextAnchor::Center,
                },
            );
        }
        counted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::interval::IntervalDataset;
    use crate::dataset::sources::{Conflict, DefiningMoment, MilestoneRow};
    use crate::scene::pool::ScenePools;

    fn pools() -> ScenePools {
        ScenePools::new(&crate::config::PoolCapacities::default())
    }

    fn conflict(from: i32, to: Option<i32>, name: &str, parent: Option<&str>) -> Conflict {
        Conflict {
            from: Year(from),
            to: to.map(Year),
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            indigenous_history: false,
        }
    }

    #[test]
    fn conflict_line_formats_active_with_current_year() {
        assert_eq!(
            conflict_line(Year(1914), Year(1918), None, "First World War", true, Year(1916)),
            "1914-1916: First World War"
        );
        assert_eq!(
            conflict_line(
                Year(1916),
                Year(1916),
                Some("First World War"),
                "Battle of the Somme",
                false,
                Year(1930)
            ),
            "1916-1916: [First World War] Battle of the Somme"
        );
    }

    #[test]
    fn conflict_colors_follow_special_cases() {
        assert_eq!(conflict_color("Frontier Wars", None), RED);
        assert_eq!(conflict_color("Eumeralla Wars", Some("Frontier Wars")), RED);
        assert_eq!(
            conflict_color("Cyprus (Peacekeeping)", None),
            PEACEKEEPING_BLUE
        );
        assert_eq!(conflict_color("Second World War", None), Rgb::gray(0.15));
    }

    #[test]
    fn conflict_panel_emits_heading_actives_then_fading_past() {
        let mut datasets = FrameDatasets::empty(Year(2020));
        datasets.conflicts = IntervalDataset::resolve(
            vec![
                conflict(1914, Some(1918), "First World War", None),
                conflict(1939, Some(1945), "Second World War", None),
            ],
            Year(2020),
        );
        let mut p = pools();
        conflict_panel(Year(1940), &datasets, true, &SceneConfig::default(), &mut p);
        // Heading, spacer, WWII active, WWI fading.
        assert_eq!(p.conflicts.len(), 4);
    }

    #[test]
    fn moments_truncation_never_drops_active_lines() {
        let mut datasets = FrameDatasets::empty(Year(2020));
        let mut moments = vec![DefiningMoment {
            from: Year(1900),
            to: None,
            text: "An ongoing moment that stays".to_owned(),
            indigenous_history: false,
        }];
        // Plenty of expired records so wrapped past lines exceed the retained cap.
        for i in 0..200 {
            moments.push(DefiningMoment {
                from: Year(1900),
                to: Some(Year(1995)),
                text: format!("Expired moment number {i} with enough words to wrap over lines"),
                indigenous_history: false,
            });
        }
        datasets.defining_moments = IntervalDataset::resolve(moments, Year(2020));

        let cfg = SceneConfig::default();
        let mut p = pools();
        moments_panel(Year(1996), &datasets, true, &cfg, &mut p);
        // Heading + spacer + at most the retained-line cap.
        assert!(p.moments.len() <= cfg.pools.moment_lines + 2);
        assert!(p.moments.len() > cfg.pools.moment_lines / 2, "truncation was not exercised");
        assert!(
            p.moments
                .entries()
                .iter()
                .any(|e| e.text.contains("ongoing moment that stays")),
            "active moment must survive truncation"
        );
    }

    fn site(year: i32, attackers: &str, attackers_dead: u32, victims_dead: u32) -> MassacreSite {
        MassacreSite {
            year: Year(year),
            until: Some(Year(2020)),
            location: crate::foundation::core::GeoPoint::new(-33.0, 150.0).unwrap(),
            victims_dead,
            attackers_dead,
            attackers: attackers.to_owned(),
            victims: "Aboriginal people".to_owned(),
            weapons: Some("muskets".to_owned()),
            language_group: Some("Dharug".to_owned()),
            known_date: None,
        }
    }

    #[test]
    fn tally_counts_only_recognized_aggressors() {
        let mut tally = MassacreTally::default();
        tally.record(&site(1816, "Colonists", 0, 14));
        tally.record(&site(1838, "Aboriginal people", 2, 8));
        tally.record(&site(1840, "Unknown", 1, 5));
        assert_eq!(tally.attacks_by_colonists, 1);
        assert_eq!(tally.attacks_by_first_nations, 1);
        assert_eq!(tally.total_attacks(), 2);
        assert_eq!(tally.total_dead(), 24);
    }

    #[test]
    fn narrative_inserts_blank_lines_for_quiet_years() {
        let s1 = site(1816, "Colonists", 0, 14);
        let s2 = site(1820, "Colonists", 0, 3);
        let sites = vec![&s1, &s2];
        let (lines, tally) =
            massacre_narrative(Year(1820), &sites, 254, &SceneConfig::default());
        assert_eq!(tally.attacks_by_colonists, 2);
        // Three quiet years between 1816 and 1820.
        let blanks = lines.iter().filter(|(t, _)| t.is_empty()).count();
        assert!(blanks >= 3);
        // Summary lines close the narrative.
        let last = &lines[lines.len() - 1].0;
        assert!(last.contains("identified massacre events"));
        assert!(last.contains("2 "));
    }

    #[test]
    fn massacre_panel_caps_retained_lines() {
        let cfg = SceneConfig::default();
        let lines: Vec<(String, Rgb)> =
            (0..300).map(|i| (format!("line {i}"), RED)).collect();
        let mut p = pools();
        massacre_panel(&lines, &cfg, &mut p);
        // Heading plus the retained cap.
        assert_eq!(p.massacre_lines.len(), cfg.pools.massacre_lines + 1);
    }

    fn matrix() -> MilestoneMatrix {
        MilestoneMatrix {
            columns: vec!["Event".into(), "NSW".into(), "VIC".into()],
            rows: vec![
                MilestoneRow {
                    event: milestone_rows::PROTECTORS.into(),
                    years: vec![None, Some(Year(1881)), Some(Year(1869))],
                },
                MilestoneRow {
                    event: milestone_rows::PROTECTION_BOARDS.into(),
                    years: vec![None, Some(Year(1883)), Some(Year(1869))],
                },
                MilestoneRow {
                    event: milestone_rows::PROTECTION_BOARDS_ABOLISHED.into(),
                    years: vec![None, Some(Year(1969)), Some(Year(1957))],
                },
                MilestoneRow {
                    event: "Voting Rights".into(),
                    years: vec![None, Some(Year(1962)), Some(Year(1962))],
                },
            ],
        }
    }

    #[test]
    fn milestone_rows_hidden_before_their_first_year() {
        let mut p = pools();
        milestone_matrix_panel(Year(1850), &matrix(), &mut p);
        assert!(p.milestones.is_empty());
    }

    #[test]
    fn milestone_matrix_emits_headers_and_reached_cells() {
        let mut p = pools();
        milestone_matrix_panel(Year(1890), &matrix(), &mut p);
        // Both column headers, two visible rows, each with name + 2 dates.
        assert_eq!(p.milestones.len(), 2 + 2 * 3);
    }

    #[test]
    fn legislation_stack_headed_for_commonwealth() {
        let mut datasets = FrameDatasets::empty(Year(2020));
        let acts = vec![crate::dataset::sources::LegislationAct {
            from: Year(1901),
            to: None,
            jurisdiction: Jurisdiction::Commonwealth,
            impact: Impact::Negative,
            name: "Immigration Restriction Act".to_owned(),
        }];
        datasets
            .legislation
            .insert(Jurisdiction::Commonwealth, IntervalDataset::resolve(acts, Year(2020)));
        let mut p = pools();
        legislation_stacks(Year(1910), &datasets, true, false, &mut p);
        // Parliament heading plus the act itself.
        assert_eq!(p.legislation.len(), 2);
    }
}
