//! Frame assembly: directives, slot pools, the per-layer builders, and scene
//! fingerprinting.

pub mod builder;
pub mod cursor;
pub mod directive;
pub mod fingerprint;
pub mod panels;
pub mod pool;

pub use builder::build_frame;
pub use cursor::YearCursor;
pub use directive::{DrawDirective, LineStyle, MapPos, MarkerShape, TextAnchor};
pub use fingerprint::{fingerprint_scene, SceneFingerprint};
pub use pool::ScenePools;
