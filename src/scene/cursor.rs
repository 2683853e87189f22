use crate::config::SceneConfig;
use crate::foundation::core::Year;

/// State threaded through one animation step.
///
/// Single writer (the driver), read-only to the builder; [`build_frame`](super::builder::build_frame)
/// returns a fresh cursor instead of mutating in place, which is what makes a frame a
/// pure function of `(year, cursor, datasets)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct YearCursor {
    /// Year of the frame this cursor was produced by.
    pub current_year: Year,
    /// Indigenous population carried from the previous frame, for the change readout.
    pub previous_indigenous_population: i64,
    /// Non-Indigenous population carried from the previous frame.
    pub previous_non_indigenous_population: i64,
}

impl YearCursor {
    /// Cursor state at the start of a pass: populations at their pre-epoch baselines.
    pub fn at_epoch(config: &SceneConfig) -> Self {
        Self {
            current_year: config.epoch_year,
            previous_indigenous_population: config.indigenous_population_baseline as i64,
            previous_non_indigenous_population: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_cursor_carries_baselines() {
        let c = YearCursor::at_epoch(&SceneConfig::default());
        assert_eq!(c.current_year, Year(1766));
        assert_eq!(c.previous_indigenous_population, 750_000);
        assert_eq!(c.previous_non_indigenous_population, 0);
    }
}
