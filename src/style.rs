//! Temporal color/size encoding.
//!
//! Pure, deterministic functions mapping record age and magnitude to display color,
//! size and opacity. Nothing here touches datasets or frame state; the scene builder is
//! the only caller.

use crate::foundation::core::{Rgb, Year};

/// Marker color of a fresh massacre event (`#cf210a`).
pub const MASSACRE_BASE: Rgb = Rgb::new(207, 33, 10);
/// Marker color a massacre decays toward over the full animation span (`#690a03`).
pub const MASSACRE_TARGET: Rgb = Rgb::new(105, 10, 3);

/// Marker color of a newly founded settlement (`#fad28c`).
pub const SETTLEMENT_BASE: Rgb = Rgb::new(250, 210, 140);
/// Marker color a settlement decays toward (`#e1910a`).
pub const SETTLEMENT_TARGET: Rgb = Rgb::new(225, 145, 10);

/// Settlement channel decay schedule: years per unit drop for red, green, blue.
///
/// The three channels decay at different rates so the 230-year fade reaches the target
/// color non-uniformly, exactly as the source schedule had it.
pub const SETTLEMENT_CHANNEL_YEARS: [f64; 3] = [9.2, 3.5, 1.77];

/// Magnitude substituted when a marker's raw count is missing or not finite.
pub const DEFAULT_MAGNITUDE: f64 = 4.0;

/// Radial (quarter-circle) memory fade.
///
/// `1.0` the year a record ends, `0.0` once `memory_window` years have passed, and
/// `sqrt(1 - ((year - end)/window)^2)` in between — deliberately not linear, so entries
/// linger near full opacity and then drop away. A record that has not ended yet holds
/// `1.0`. Degenerate windows and non-finite inputs yield `0.0` rather than a panic.
pub fn age_fade(year: Year, end_year: Year, memory_window: i32) -> f64 {
    if memory_window <= 0 {
        return 0.0;
    }
    let elapsed = year.since(end_year);
    if elapsed < 0 {
        return 1.0;
    }
    if elapsed >= memory_window {
        return 0.0;
    }
    let x = f64::from(elapsed) / f64::from(memory_window);
    let fade = (1.0 - x * x).sqrt();
    if fade.is_finite() { fade } else { 0.0 }
}

/// Linear memory fade, used for explorer paths: `1 - (year - end)/window`, clamped to
/// `[0, 1]`, holding `1.0` until the record ends.
pub fn linear_fade(year: Year, end_year: Year, memory_window: i32) -> f64 {
    if memory_window <= 0 {
        return 0.0;
    }
    let elapsed = year.since(end_year);
    if elapsed <= 0 {
        return 1.0;
    }
    (1.0 - f64::from(elapsed) / f64::from(memory_window)).max(0.0)
}

/// Age-stepped color between `base` at `event_year` and `target` at
/// `event_year + total_span`.
///
/// Each channel steps independently: one unit every `span / |base - target|` years,
/// integer-truncated, clamped so the channel never crosses its target. Channels equal in
/// both colors (or a degenerate span) stay at base.
pub fn severity_color(
    current_year: Year,
    event_year: Year,
    total_span: i32,
    base: Rgb,
    target: Rgb,
) -> Rgb {
    let elapsed = f64::from(current_year.since(event_year));
    let span = f64::from(total_span);
    let channel = |b: u8, t: u8| {
        let diff = (i32::from(b) - i32::from(t)).abs();
        if diff == 0 || span <= 0.0 {
            return b;
        }
        channel_decay(b, t, elapsed, span / f64::from(diff))
    };
    Rgb::new(
        channel(base.r, target.r),
        channel(base.g, target.g),
        channel(base.b, target.b),
    )
}

/// Settlement marker color after `age_years` of growth, on the fixed three-channel
/// schedule ([`SETTLEMENT_CHANNEL_YEARS`]).
pub fn settlement_color(age_years: i32) -> Rgb {
    let age = f64::from(age_years);
    Rgb::new(
        channel_decay(SETTLEMENT_BASE.r, SETTLEMENT_TARGET.r, age, SETTLEMENT_CHANNEL_YEARS[0]),
        channel_decay(SETTLEMENT_BASE.g, SETTLEMENT_TARGET.g, age, SETTLEMENT_CHANNEL_YEARS[1]),
        channel_decay(SETTLEMENT_BASE.b, SETTLEMENT_TARGET.b, age, SETTLEMENT_CHANNEL_YEARS[2]),
    )
}

fn channel_decay(base: u8, target: u8, elapsed: f64, years_per_unit: f64) -> u8 {
    if !elapsed.is_finite() || elapsed <= 0.0 || years_per_unit <= 0.0 {
        return base;
    }
    let steps = (elapsed / years_per_unit).floor() as i32;
    if base >= target {
        (i32::from(base) - steps).max(i32::from(target)) as u8
    } else {
        (i32::from(base) + steps).min(i32::from(target)) as u8
    }
}

/// Massacre marker opacity: half-faded at the end of the animation span, never below 0.
pub fn massacre_alpha(current_year: Year, event_year: Year, total_span: i32) -> f64 {
    if total_span <= 0 {
        return 1.0;
    }
    let t = f64::from(current_year.since(event_year)) / f64::from(total_span);
    (1.0 - t / 2.0).clamp(0.0, 1.0)
}

/// Marker size for a raw count, treating the count as the volume of a sphere and
/// returning its radius. Missing or non-finite counts are mapped as
/// [`DEFAULT_MAGNITUDE`] rather than erroring; monotonic in the count.
pub fn magnitude_size(value: Option<f64>) -> f64 {
    let v = match value {
        Some(v) if v.is_finite() => v.max(0.0),
        _ => DEFAULT_MAGNITUDE,
    };
    ((6.0 * v) / std::f64::consts::PI).cbrt() / 2.0
}

/// Linear per-year population growth: 0 at `founding_year`, `total_value` at
/// `horizon_year`. A founding year equal to the horizon yields 0 (guards the
/// division), as does a founding after the current year.
pub fn population_growth_interpolation(
    total_value: f64,
    founding_year: Year,
    current_year: Year,
    horizon_year: Year,
) -> f64 {
    let span = horizon_year.since(founding_year);
    if span == 0 {
        return 0.0;
    }
    let age = current_year.since(founding_year);
    if age <= 0 {
        return 0.0;
    }
    (total_value / f64::from(span)) * f64::from(age)
}

/// Opacity ramp for the tail of a scrolling panel.
///
/// The bottom `hold` entries stay fully opaque; older entries above them fade on the
/// radial law so the oldest text dissolves at the panel top. `index` counts from the
/// oldest retained entry.
pub fn panel_tail_fade(index: usize, len: usize, hold: usize) -> f64 {
    if len <= hold || len - index <= hold {
        return 1.0;
    }
    let x = 1.0 - (index + 1) as f64 / (len - hold) as f64;
    (1.0 - x * x).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_fade_endpoints_and_monotonicity() {
        assert_eq!(age_fade(Year(1918), Year(1918), 60), 1.0);
        assert_eq!(age_fade(Year(1978), Year(1918), 60), 0.0);
        assert_eq!(age_fade(Year(1990), Year(1918), 60), 0.0);
        // Not yet ended holds full opacity.
        assert_eq!(age_fade(Year(1916), Year(1918), 60), 1.0);

        let mut prev = 1.0;
        for y in 1918..=1978 {
            let a = age_fade(Year(y), Year(1918), 60);
            assert!(a <= prev, "fade must be non-increasing at {y}");
            prev = a;
        }
    }

    #[test]
    fn age_fade_twelve_of_sixty_is_radial() {
        let a = age_fade(Year(1930), Year(1918), 60);
        let expected = (1.0f64 - (12.0 / 60.0f64).powi(2)).sqrt();
        assert!((a - expected).abs() < 1e-12);
        assert!(a > 0.97, "radial fade lingers near 1.0 early on");
    }

    #[test]
    fn age_fade_degenerate_window_is_zero() {
        assert_eq!(age_fade(Year(1930), Year(1918), 0), 0.0);
        assert_eq!(age_fade(Year(1930), Year(1918), -5), 0.0);
    }

    #[test]
    fn linear_fade_clamps() {
        assert_eq!(linear_fade(Year(1900), Year(1910), 70), 1.0);
        assert_eq!(linear_fade(Year(1910), Year(1910), 70), 1.0);
        assert!((linear_fade(Year(1945), Year(1910), 70) - 0.5).abs() < 1e-12);
        assert_eq!(linear_fade(Year(1990), Year(1910), 70), 0.0);
    }

    #[test]
    fn severity_color_steps_toward_target() {
        // Fresh event keeps the base color.
        assert_eq!(
            severity_color(Year(1830), Year(1830), 230, MASSACRE_BASE, MASSACRE_TARGET),
            MASSACRE_BASE
        );
        // A span later the target has been reached (not crossed).
        let end = severity_color(Year(2060), Year(1830), 230, MASSACRE_BASE, MASSACRE_TARGET);
        assert_eq!(end, MASSACRE_TARGET);
        // Midway every channel sits strictly between base and target.
        let mid = severity_color(Year(1945), Year(1830), 230, MASSACRE_BASE, MASSACRE_TARGET);
        assert!(mid.r < MASSACRE_BASE.r && mid.r > MASSACRE_TARGET.r);
        assert!(mid.g < MASSACRE_BASE.g && mid.g > MASSACRE_TARGET.g);
    }

    #[test]
    fn settlement_channels_decay_at_distinct_rates() {
        let c = settlement_color(23);
        // floor(23/9.2)=2, floor(23/3.5)=6, floor(23/1.77)=12
        assert_eq!(c, Rgb::new(248, 204, 128));
        // Clamped at the target far beyond the 230-year schedule.
        assert_eq!(settlement_color(10_000), SETTLEMENT_TARGET);
        assert_eq!(settlement_color(0), SETTLEMENT_BASE);
    }

    #[test]
    fn massacre_alpha_half_fades_over_span() {
        assert_eq!(massacre_alpha(Year(1830), Year(1830), 200), 1.0);
        assert!((massacre_alpha(Year(2030), Year(1830), 200) - 0.5).abs() < 1e-12);
        assert!((massacre_alpha(Year(1930), Year(1830), 200) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn magnitude_size_monotonic_with_missing_default() {
        assert_eq!(magnitude_size(Some(0.0)), 0.0);
        let small = magnitude_size(Some(100.0));
        let large = magnitude_size(Some(10_000.0));
        assert!(small < large);
        assert_eq!(magnitude_size(None), magnitude_size(Some(DEFAULT_MAGNITUDE)));
        assert_eq!(
            magnitude_size(Some(f64::NAN)),
            magnitude_size(Some(DEFAULT_MAGNITUDE))
        );
    }

    #[test]
    fn growth_interpolation_scenario() {
        // Settlement founded 1850 with population 1000 at horizon 2020.
        let at_founding =
            population_growth_interpolation(1000.0, Year(1850), Year(1850), Year(2020));
        assert_eq!(at_founding, 0.0);
        let halfway = population_growth_interpolation(1000.0, Year(1850), Year(1935), Year(2020));
        assert!((halfway - 500.0).abs() < 1e-9);
        let full = population_growth_interpolation(1000.0, Year(1850), Year(2020), Year(2020));
        assert!((full - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn growth_interpolation_guards_zero_span() {
        assert_eq!(
            population_growth_interpolation(1000.0, Year(2020), Year(2020), Year(2020)),
            0.0
        );
    }

    #[test]
    fn panel_tail_holds_bottom_entries() {
        let len = 95;
        for i in (len - 5)..len {
            assert_eq!(panel_tail_fade(i, len, 5), 1.0);
        }
        // The oldest retained entry is nearly transparent, and the ramp rises.
        let oldest = panel_tail_fade(0, len, 5);
        assert!(oldest < 0.2);
        let mut prev = 0.0;
        for i in 0..len {
            let a = panel_tail_fade(i, len, 5);
            assert!(a >= prev);
            prev = a;
        }
    }
}
