//! Animation driver.
//!
//! A [`TimelapseSession`] owns the pools and cursor and walks the frame counter through
//! one pass over the timeline, or two back to back: a colonial-history pass with the
//! Blak-history layers stripped, then a full retelling with them restored. Frames land
//! in a [`SceneSink`]; the engine never encodes video itself.

use crate::config::{DisplayFlags, SceneConfig};
use crate::dataset::sources::FrameDatasets;
use crate::foundation::core::Year;
use crate::foundation::error::ChronomapResult;
use crate::scene::builder::build_frame;
use crate::scene::cursor::YearCursor;
use crate::scene::directive::DrawDirective;
use crate::scene::pool::ScenePools;

/// How many passes the session plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimelapseMode {
    /// One pass with the configured flags.
    Single,
    /// Two passes: first without the Blak-history layers, then with them.
    BackToBack,
}

/// Which pass a frame belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PassKind {
    Primary,
    Secondary,
}

/// One built frame as delivered to the sink.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    /// Global frame index across all passes.
    pub frame_index: u64,
    /// Pass this frame belongs to.
    pub pass: PassKind,
    /// Year the frame depicts.
    pub year: Year,
    /// Ordered directive sequence.
    pub directives: Vec<DrawDirective>,
}

/// Receives frames as the session produces them.
pub trait SceneSink {
    fn accept(&mut self, frame: FrameOutput) -> ChronomapResult<()>;
}

/// Sink that buffers every frame, for tests and offline inspection.
#[derive(Debug, Default)]
pub struct InMemorySceneSink {
    frames: Vec<FrameOutput>,
}

impl InMemorySceneSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameOutput] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<FrameOutput> {
        self.frames
    }
}

impl SceneSink for InMemorySceneSink {
    fn accept(&mut self, frame: FrameOutput) -> ChronomapResult<()> {
        self.frames.push(frame);
        Ok(())
    }
}

/// Where a session currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Playing the first (or only) pass.
    PlayingPrimary,
    /// Playing the second pass of a back-to-back run.
    PlayingSecondary,
    /// Every frame has been produced.
    Done,
}

/// A frame-driven run over the timeline.
pub struct TimelapseSession {
    datasets: FrameDatasets,
    config: SceneConfig,
    flags: DisplayFlags,
    mode: TimelapseMode,
    pools: ScenePools,
    cursor: YearCursor,
    position: u64,
}

impl TimelapseSession {
    /// Create a session over validated configuration.
    pub fn new(
        datasets: FrameDatasets,
        config: SceneConfig,
        flags: DisplayFlags,
        mode: TimelapseMode,
    ) -> ChronomapResult<Self> {
        let config = config.validated()?;
        let pools = ScenePools::new(&config.pools);
        let cursor = YearCursor::at_epoch(&config);
        Ok(Self {
            datasets,
            config,
            flags,
            mode,
            pools,
            cursor,
            position: 0,
        })
    }

    /// Current progression through the run.
    pub fn state(&self) -> SessionState {
        if self.position >= self.total_frames() {
            return SessionState::Done;
        }
        match self.locate(self.position).0 {
            PassKind::Primary => SessionState::PlayingPrimary,
            PassKind::Secondary => SessionState::PlayingSecondary,
        }
    }

    /// Total frames the session will produce.
    pub fn total_frames(&self) -> u64 {
        let per_pass = self.config.frames_per_pass();
        match self.mode {
            TimelapseMode::Single => per_pass,
            TimelapseMode::BackToBack => per_pass * 2,
        }
    }

    /// Pass and in-pass frame index for a global frame index.
    fn locate(&self, frame: u64) -> (PassKind, u64) {
        let per_pass = self.config.frames_per_pass();
        match self.mode {
            TimelapseMode::Single => (PassKind::Primary, frame % per_pass),
            TimelapseMode::BackToBack => {
                if frame < per_pass {
                    (PassKind::Primary, frame)
                } else {
                    (PassKind::Secondary, (frame - per_pass) % per_pass)
                }
            }
        }
    }

    /// Year depicted at an in-pass frame index: the first and last years are held for
    /// the configured repeat block, the span plays linearly in between.
    fn year_at(&self, pass_frame: u64) -> Year {
        let repeat = self.config.repeat_frames;
        let span = self.config.span_years() as u64;
        if pass_frame <= repeat {
            self.config.epoch_year
        } else if pass_frame >= span + repeat {
            self.config.final_year
        } else {
            self.config.epoch_year.offset((pass_frame - repeat) as i32)
        }
    }

    /// Effective flags for a pass. The primary pass of a back-to-back run strips the
    /// Blak-history layers; the secondary pass forces them back on over the configured
    /// flags.
    fn pass_flags(&self, pass: PassKind) -> DisplayFlags {
        match (self.mode, pass) {
            (TimelapseMode::Single, _) => self.flags,
            (TimelapseMode::BackToBack, PassKind::Primary) => self.flags.without_blak_history(),
            (TimelapseMode::BackToBack, PassKind::Secondary) => DisplayFlags {
                blak_history: true,
                ..self.flags
            },
        }
    }

    /// Build the frame at a global index, advancing the cursor.
    ///
    /// At a pass boundary the cursor and every pool are reset, so nothing from the
    /// primary pass survives into the secondary one.
    pub fn step(&mut self, frame: u64) -> ChronomapResult<FrameOutput> {
        let (pass, pass_frame) = self.locate(frame);
        if pass_frame == 0 {
            self.cursor = YearCursor::at_epoch(&self.config);
            self.pools.reset_all();
            tracing::info!(?pass, frame, "pass started");
        }
        let year = self.year_at(pass_frame);
        let flags = self.pass_flags(pass);

        let (directives, next_cursor) = build_frame(
            year,
            &self.cursor,
            &self.datasets,
            &self.config,
            flags,
            &mut self.pools,
        )?;
        self.cursor = next_cursor;

        Ok(FrameOutput {
            frame_index: frame,
            pass,
            year,
            directives,
        })
    }

    /// Build the next frame in sequence, or `None` once the run is done.
    pub fn next_frame(&mut self) -> ChronomapResult<Option<FrameOutput>> {
        if self.state() == SessionState::Done {
            return Ok(None);
        }
        let output = self.step(self.position)?;
        self.position += 1;
        Ok(Some(output))
    }

    /// Run every remaining frame into `sink`.
    pub fn run<S: SceneSink>(&mut self, sink: &mut S) -> ChronomapResult<()> {
        let total = self.total_frames();
        tracing::info!(total, mode = ?self.mode, "timelapse run started");
        while let Some(output) = self.next_frame()? {
            sink.accept(output)?;
        }
        tracing::info!(total, "timelapse run finished");
        Ok(())
    }
}
