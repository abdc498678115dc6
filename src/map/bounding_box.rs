use crate::map::drawing::DrawingShape;
use crate::map::universe::Universe;
use geo::Point;

/// Accumulates points and circles to determine the displayable area.
/// Half-open intervals: `min` is inclusive, `max` is exclusive.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    min: Option<Point>,
    max: Option<Point>,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

const MARKER_ASSUMED_RADIUS: i32 = 10;

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, p: Point) {
        self.min = Some(match self.min {
            Some(m) => Point::new(m.x.min(p.x), m.y.min(p.y)),
            None => p,
        });
        self.max = Some(match self.max {
            Some(m) => Point::new(m.x.max(p.x + 1), m.y.max(p.y + 1)),
            None => Point::new(p.x + 1, p.y + 1),
        });
    }

    pub fn add_circle(&mut self, center: Point, radius: i32) {
        self.add_point(center.offset(-radius, -radius));
        self.add_point(center.offset(radius, radius));
    }

    pub fn min(&self) -> Option<Point> {
        self.min
    }

    pub fn max(&self) -> Option<Point> {
        self.max
    }

    /// Iterates all object types and user drawings, accumulating their
    /// footprint (spec §4.3.4).
    pub fn add_universe(&mut self, univ: &Universe) {
        for (_, ship) in univ.ships.iter_present() {
            if let Some(p) = ship.position {
                self.add_point(p);
            }
        }
        for (_, planet) in univ.planets.iter_present() {
            if let Some(p) = planet.position {
                self.add_point(p);
            }
        }
        for (_, mf) in univ.minefields.iter_present() {
            self.add_circle(mf.center, mf.radius() as i32);
        }
        for (_, ufo) in univ.ufos.iter_present() {
            self.add_circle(ufo.position, ufo.radius as i32);
        }
        for (_, storm) in univ.ion_storms.iter_present() {
            self.add_circle(storm.center, storm.radius as i32);
        }
        for drawing in univ.drawings.iter() {
            match drawing.shape {
                DrawingShape::Line { from, to } | DrawingShape::Rectangle { from, to } => {
                    self.add_point(from);
                    self.add_point(to);
                }
                DrawingShape::Circle { center, radius } => self.add_circle(center, radius as i32),
                DrawingShape::Marker { at, .. } => self.add_circle(at, MARKER_ASSUMED_RADIUS),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_no_bounds() {
        let bb = BoundingBox::new();
        assert!(bb.min().is_none());
        assert!(bb.max().is_none());
    }

    #[test]
    fn half_open_max_is_exclusive() {
        let mut bb = BoundingBox::new();
        bb.add_point(Point::new(5, 5));
        assert_eq!(bb.min(), Some(Point::new(5, 5)));
        assert_eq!(bb.max(), Some(Point::new(6, 6)));
    }
}
