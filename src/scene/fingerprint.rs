//! Stable scene fingerprints.
//!
//! Backs the frame-idempotence guarantee: building the same year from the same cursor
//! twice must produce byte-identical directive sequences, which this hash makes cheap to
//! assert without retaining both sequences.

use crate::foundation::core::Rgb;
use crate::scene::directive::{DrawDirective, LineStyle, MapPos, MarkerShape, TextAnchor};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x43a1_92ef_0d5c_7b16;

/// Stable fingerprint of one frame's directive sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Fingerprint an ordered directive sequence. Order-sensitive: swapping two directives
/// changes the fingerprint, since paint order is part of the scene.
pub fn fingerprint_scene(directives: &[DrawDirective]) -> SceneFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(directives.len() as u32);
    for d in directives {
        write_directive(&mut h, d);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> SceneFingerprint {
        let v = self.inner.digest128();
        SceneFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_pos(h: &mut StableHasher, p: MapPos) {
    h.write_f64(p.x);
    h.write_f64(p.y);
}

fn write_rgb(h: &mut StableHasher, c: Rgb) {
    h.write_u8(c.r);
    h.write_u8(c.g);
    h.write_u8(c.b);
}

fn write_directive(h: &mut StableHasher, d: &DrawDirective) {
    match d {
        DrawDirective::Point {
            pos,
            size,
            color,
            alpha,
            layer,
            marker,
        } => {
            h.write_u8(0);
            write_pos(h, *pos);
            h.write_f64(*size);
            write_rgb(h, *color);
            h.write_f64(*alpha);
            h.write_u8(layer.order());
            h.write_u8(match marker {
                MarkerShape::Circle => 0,
                MarkerShape::Square => 1,
                MarkerShape::Diamond => 2,
                MarkerShape::Triangle => 3,
                MarkerShape::Cross => 4,
            });
        }
        DrawDirective::Line {
            points,
            color,
            style,
            width,
            alpha,
            layer,
        } => {
            h.write_u8(1);
            h.write_u32(points.len() as u32);
            for p in points {
                write_pos(h, *p);
            }
            write_rgb(h, *color);
            h.write_u8(match style {
                LineStyle::Solid => 0,
                LineStyle::Dashed => 1,
                LineStyle::Dotted => 2,
            });
            h.write_f64(*width);
            h.write_f64(*alpha);
            h.write_u8(layer.order());
        }
        DrawDirective::Text {
            pos,
            text,
            color,
            size,
            alpha,
            anchor,
        } => {
            h.write_u8(2);
            write_pos(h, *pos);
            h.write_str(text);
            write_rgb(h, *color);
            h.write_f64(*size);
            h.write_f64(*alpha);
            h.write_u8(match anchor {
                TextAnchor::Left => 0,
                TextAnchor::Center => 1,
                TextAnchor::Right => 2,
            });
        }
        DrawDirective::Rect {
            pos,
            width,
            height,
            color,
            alpha,
        } => {
            h.write_u8(3);
            write_pos(h, *pos);
            h.write_f64(*width);
            h.write_f64(*height);
            write_rgb(h, *color);
            h.write_f64(*alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::ZLayer;

    fn sample_point(alpha: f64) -> DrawDirective {
        DrawDirective::Point {
            pos: MapPos::new(151.2, -33.8),
            size: 3.0,
            color: Rgb::new(207, 33, 10),
            alpha,
            layer: ZLayer::Massacre,
            marker: MarkerShape::Circle,
        }
    }

    #[test]
    fn identical_sequences_share_a_fingerprint() {
        let a = vec![sample_point(1.0), DrawDirective::ghost_text(MapPos::new(0.0, 0.0))];
        let b = a.clone();
        assert_eq!(fingerprint_scene(&a), fingerprint_scene(&b));
    }

    #[test]
    fn alpha_change_alters_the_fingerprint() {
        assert_ne!(
            fingerprint_scene(&[sample_point(1.0)]),
            fingerprint_scene(&[sample_point(0.5)])
        );
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let a = sample_point(1.0);
        let b = DrawDirective::ghost_text(MapPos::new(0.0, 0.0));
        assert_ne!(
            fingerprint_scene(&[a.clone(), b.clone()]),
            fingerprint_scene(&[b, a])
        );
    }
}
