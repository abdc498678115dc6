use geo::Point;

/// A palette color, 1-15 (spec §3.1 "Drawing").
pub type Color = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Dot,
    Cross,
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone)]
pub enum DrawingShape {
    Line { from: Point, to: Point },
    Rectangle { from: Point, to: Point },
    Circle { center: Point, radius: u16 },
    Marker { at: Point, kind: MarkerKind },
}

/// A user-drawn annotation. `tag` groups drawings for bulk visibility
/// toggling; `expires_turn == -1` means "never expires" (invariant 6).
#[derive(Debug, Clone)]
pub struct Drawing {
    pub shape: DrawingShape,
    pub color: Color,
    pub comment: Option<String>,
    pub tag: u16,
    pub expires_turn: i32,
}

impl Drawing {
    pub const NEVER_EXPIRES: i32 = -1;

    pub fn is_expired(&self, current_turn: u32) -> bool {
        self.expires_turn != Self::NEVER_EXPIRES && (current_turn as i32) > self.expires_turn
    }

    /// `true` iff not expired and `tag` is in the visible-tag set
    /// (invariant 6).
    pub fn is_visible(&self, current_turn: u32, visible_tags: &std::collections::HashSet<u16>) -> bool {
        !self.is_expired(current_turn) && visible_tags.contains(&self.tag)
    }
}

/// An ordered collection of drawings, preserving insertion/z order.
#[derive(Debug, Clone, Default)]
pub struct Drawings {
    items: Vec<Drawing>,
}

impl Drawings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, drawing: Drawing) {
        self.items.push(drawing);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Drawing> {
        self.items.iter()
    }

    /// Purges drawings past their expiry (spec §4.3.3 step 4).
    pub fn erase_expired_drawings(&mut self, turn: u32) {
        self.items.retain(|d| !d.is_expired(turn));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_turn_inclusive_boundary() {
        let d = Drawing {
            shape: DrawingShape::Marker { at: Point::new(0, 0), kind: MarkerKind::Dot },
            color: 1,
            comment: None,
            tag: 0,
            expires_turn: 10,
        };
        assert!(!d.is_expired(10));
        assert!(d.is_expired(11));
    }

    #[test]
    fn never_expires_is_always_live() {
        let d = Drawing {
            shape: DrawingShape::Marker { at: Point::new(0, 0), kind: MarkerKind::Dot },
            color: 1,
            comment: None,
            tag: 0,
            expires_turn: Drawing::NEVER_EXPIRES,
        };
        assert!(!d.is_expired(u32::MAX));
    }
}
