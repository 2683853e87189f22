//! Chronomap is a deterministic scene-building engine for historical timelapse maps.
//!
//! It turns year-indexed datasets (settlements, conflicts, legislation, expedition
//! paths, census series) into ordered draw-directive sequences, one per animation
//! frame. The public API is session-oriented:
//!
//! - Normalize raw records with [`normalize`] and load them into [`FrameDatasets`]
//! - Create a [`TimelapseSession`] over a validated [`SceneConfig`]
//! - Stream frames into a [`SceneSink`], or build single frames with [`build_frame`]
//!
//! Rendering and encoding stay outside the crate; a frame is plain data, and the same
//! `(year, cursor, datasets)` always produces the same directive sequence (checkable
//! cheaply via [`fingerprint_scene`]).
#![forbid(unsafe_code)]

pub mod config;
pub mod dataset;
pub mod foundation;
pub mod normalize;
pub mod scene;
pub mod session;
pub mod style;

pub use crate::config::{DisplayFlags, PoolCapacities, SceneConfig};
pub use crate::dataset::sources::FrameDatasets;
pub use crate::foundation::core::{GeoPoint, Rgb, Year, YearSpan, ZLayer};
pub use crate::foundation::error::{ChronomapError, ChronomapResult};
pub use crate::scene::{
    DrawDirective, SceneFingerprint, ScenePools, YearCursor, build_frame, fingerprint_scene,
};
pub use crate::session::{
    FrameOutput, InMemorySceneSink, PassKind, SceneSink, SessionState, TimelapseMode,
    TimelapseSession,
};
