//! Fixed-capacity directive slot pools.
//!
//! The renderer keeps a stable artist per slot across frames, so a slot that showed text
//! last year and shows nothing this year must still be emitted, cleared, or the stale
//! text ghosts into the output. Pools make that explicit: every slot is emitted every
//! frame, used slots with their entry and unused slots as transparent empties.

use crate::foundation::core::Rgb;
use crate::scene::directive::{DrawDirective, LineStyle, MapPos, TextAnchor};
use smallvec::SmallVec;

/// One filled text slot.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEntry {
    pub pos: MapPos,
    pub text: String,
    pub color: Rgb,
    pub size: f64,
    pub alpha: f64,
    pub anchor: TextAnchor,
}

/// Fixed pool of text slots with ghost clearing.
#[derive(Clone, Debug)]
pub struct TextPool {
    capacity: usize,
    ghost_pos: MapPos,
    entries: Vec<TextEntry>,
}

impl TextPool {
    /// Create an empty pool. `ghost_pos` is where cleared slots park.
    pub fn new(capacity: usize, ghost_pos: MapPos) -> Self {
        Self {
            capacity,
            ghost_pos,
            entries: Vec::with_capacity(capacity.min(256)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots still free this frame.
    pub fn remaining(&self) -> usize {
        self.capacity - self.entries.len()
    }

    /// Filled slots in push order.
    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    /// Drop all entries. Called at the top of every frame and at pass boundaries.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Fill the next slot. Returns `false` (dropping the entry) when the pool is full;
    /// the caller decides whether that warrants a log line.
    pub fn push(&mut self, entry: TextEntry) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Emit every slot: filled ones as text directives, the rest as cleared ghosts.
    pub fn emit_into(&self, out: &mut Vec<DrawDirective>) {
        for e in &self.entries {
            out.push(DrawDirective::Text {
                pos: e.pos,
                text: e.text.clone(),
                color: e.color,
                size: e.size,
                alpha: e.alpha,
                anchor: e.anchor,
            });
        }
        for _ in self.entries.len()..self.capacity {
            out.push(DrawDirective::ghost_text(self.ghost_pos));
        }
    }
}

/// One filled line slot.
#[derive(Clone, Debug, PartialEq)]
pub struct LineEntry {
    pub points: SmallVec<[MapPos; 4]>,
    pub color: Rgb,
    pub style: LineStyle,
    pub width: f64,
    pub alpha: f64,
}

/// Fixed pool of polyline slots with ghost clearing.
#[derive(Clone, Debug)]
pub struct LinePool {
    capacity: usize,
    layer: crate::foundation::core::ZLayer,
    entries: Vec<LineEntry>,
}

impl LinePool {
    pub fn new(capacity: usize, layer: crate::foundation::core::ZLayer) -> Self {
        Self {
            capacity,
            layer,
            entries: Vec::with_capacity(capacity.min(256)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.entries.len()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, entry: LineEntry) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn emit_into(&self, out: &mut Vec<DrawDirective>) {
        for e in &self.entries {
            out.push(DrawDirective::Line {
                points: e.points.clone(),
                color: e.color,
                style: e.style,
                width: e.width,
                alpha: e.alpha,
                layer: self.layer,
            });
        }
        for _ in self.entries.len()..self.capacity {
            out.push(DrawDirective::ghost_line(self.layer));
        }
    }
}

/// All slot pools a frame writes into, injected into the builder and reset between
/// frames (and fully, between back-to-back passes).
#[derive(Clone, Debug)]
pub struct ScenePools {
    pub conflicts: TextPool,
    pub moments: TextPool,
    pub massacre_lines: TextPool,
    pub milestones: TextPool,
    pub legislation: TextPool,
    pub state_names: TextPool,
    pub explorer_names: TextPool,
    pub boundaries: LinePool,
    pub explorer_paths: LinePool,
    pub railway_segments: LinePool,
}

impl ScenePools {
    /// Allocate pools at the configured capacities, with each panel's ghost slots
    /// parked at its anchor.
    pub fn new(caps: &crate::config::PoolCapacities) -> Self {
        use crate::foundation::core::ZLayer;
        Self {
            conflicts: TextPool::new(caps.conflict_lines, MapPos::new(106.0, -9.0)),
            moments: TextPool::new(caps.moment_slots, MapPos::new(153.0, -11.0)),
            massacre_lines: TextPool::new(caps.massacre_slots, MapPos::new(162.0, -11.0)),
            milestones: TextPool::new(caps.milestone_slots, MapPos::new(120.0, -35.0)),
            legislation: TextPool::new(caps.legislation_slots, MapPos::new(110.0, -25.0)),
            state_names: TextPool::new(caps.state_name_slots, MapPos::new(110.0, -25.0)),
            explorer_names: TextPool::new(caps.explorer_name_slots, MapPos::new(106.0, -27.5)),
            boundaries: LinePool::new(caps.boundary_slots, ZLayer::StateBoundary),
            explorer_paths: LinePool::new(caps.explorer_path_slots, ZLayer::ExplorerPath),
            railway_segments: LinePool::new(caps.railway_segment_slots, ZLayer::Railway),
        }
    }

    /// Reset every pool. Run before each frame, and again at the back-to-back pass
    /// boundary so no primary-pass state leaks into the secondary pass.
    pub fn reset_all(&mut self) {
        self.conflicts.reset();
        self.moments.reset();
        self.massacre_lines.reset();
        self.milestones.reset();
        self.legislation.reset();
        self.state_names.reset();
        self.explorer_names.reset();
        self.boundaries.reset();
        self.explorer_paths.reset();
        self.railway_segments.reset();
    }
}

/// Greedy word wrap to `width` columns, with separate first-line and continuation
/// indents. Indents count toward the width; a word that cannot fit on an otherwise
/// empty line is emitted overlong rather than split.
pub fn word_wrap(
    text: &str,
    width: usize,
    initial_indent: &str,
    subsequent_indent: &str,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::from(initial_indent);
    let mut line_has_words = false;
    for word in text.split_whitespace() {
        let sep = if line_has_words { 1 } else { 0 };
        if line_has_words && line.len() + sep + word.len() > width {
            lines.push(std::mem::replace(&mut line, String::from(subsequent_indent)));
            line_has_words = false;
        }
        if line_has_words {
            line.push(' ');
        }
        line.push_str(word);
        line_has_words = true;
    }
    if line_has_words {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolCapacities;
    use crate::foundation::core::ZLayer;

    fn entry(text: &str) -> TextEntry {
        TextEntry {
            pos: MapPos::new(106.0, -9.0),
            text: text.to_owned(),
            color: Rgb::gray(0.1),
            size: 8.0,
            alpha: 1.0,
            anchor: TextAnchor::Left,
        }
    }

    #[test]
    fn unused_slots_emit_as_cleared_ghosts() {
        let mut pool = TextPool::new(4, MapPos::new(0.0, 0.0));
        assert!(pool.push(entry("one")));
        assert!(pool.push(entry("two")));

        let mut out = Vec::new();
        pool.emit_into(&mut out);
        assert_eq!(out.len(), 4);
        match &out[2] {
            DrawDirective::Text { text, alpha, .. } => {
                assert!(text.is_empty());
                assert_eq!(*alpha, 0.0);
            }
            other => panic!("expected ghost text, got {other:?}"),
        }
    }

    #[test]
    fn full_pool_rejects_without_panicking() {
        let mut pool = TextPool::new(2, MapPos::new(0.0, 0.0));
        assert!(pool.push(entry("a")));
        assert!(pool.push(entry("b")));
        assert!(!pool.push(entry("c")));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn reset_clears_between_frames() {
        let mut pool = TextPool::new(4, MapPos::new(0.0, 0.0));
        pool.push(entry("stale"));
        pool.reset();
        assert!(pool.is_empty());
        let mut out = Vec::new();
        pool.emit_into(&mut out);
        assert_eq!(out.len(), 4, "ghosts still emitted after reset");
    }

    #[test]
    fn line_pool_emits_fixed_slot_count() {
        let mut pool = LinePool::new(3, ZLayer::Railway);
        pool.push(LineEntry {
            points: smallvec::smallvec![MapPos::new(151.0, -33.0), MapPos::new(150.0, -34.0)],
            color: Rgb::gray(0.3),
            style: LineStyle::Solid,
            width: 0.7,
            alpha: 1.0,
        });
        let mut out = Vec::new();
        pool.emit_into(&mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn scene_pools_match_configured_capacities() {
        let pools = ScenePools::new(&PoolCapacities::default());
        assert_eq!(pools.conflicts.capacity(), 100);
        assert_eq!(pools.moments.capacity(), 166);
        assert_eq!(pools.massacre_lines.capacity(), 96);
        assert_eq!(pools.railway_segments.capacity(), 20_000);
    }

    #[test]
    fn word_wrap_indents_and_respects_width() {
        let lines = word_wrap(
            "The Mabo decision overturns the doctrine of terra nullius in Australian law",
            50,
            "1992: ",
            "      ",
        );
        assert!(lines.len() >= 2);
        assert!(lines[0].starts_with("1992: "));
        assert!(lines[1].starts_with("      "));
        for line in &lines {
            assert!(line.len() <= 50, "{line:?} exceeds width");
        }
    }

    #[test]
    fn word_wrap_of_empty_text_yields_no_lines() {
        assert!(word_wrap("", 50, "1901: ", "      ").is_empty());
    }

    #[test]
    fn word_wrap_keeps_overlong_word_whole() {
        let lines = word_wrap("Woolloomooloo", 5, "", "");
        assert_eq!(lines, vec!["Woolloomooloo"]);
    }
}
