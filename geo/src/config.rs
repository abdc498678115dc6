use crate::point::Point;

/// How the map wraps at its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Flat,
    Wrapped,
    Circular,
}

/// The 9 square images a wrapped map repeats itself into, indexed by
/// `(dx, dy) in {-1, 0, 1}^2`, center image first.
const WRAP_OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Circular maps additionally show the four diagonal partial-overlap
/// images where the circle pokes into a neighboring square image.
const CIRCULAR_EXTRA_OFFSETS: [(i32, i32); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Geometric configuration of a universe: wrap mode, logical center and
/// size, and the coordinate bounds entities must be normalized into.
#[derive(Debug, Clone, Copy)]
pub struct MapConfiguration {
    pub mode: MapMode,
    pub center: Point,
    pub size: (u32, u32),
    pub min: Point,
    pub max: Point,
}

impl Default for MapConfiguration {
    fn default() -> Self {
        MapConfiguration::new(MapMode::Flat, Point::new(0, 0), (2000, 2000))
    }
}

impl MapConfiguration {
    pub fn new(mode: MapMode, center: Point, size: (u32, u32)) -> Self {
        let half_x = (size.0 / 2) as i32;
        let half_y = (size.1 / 2) as i32;
        Self {
            mode,
            center,
            size,
            min: Point::new(center.x - half_x, center.y - half_y),
            max: Point::new(center.x + half_x, center.y + half_y),
        }
    }

    fn circle_radius(&self) -> i64 {
        // the circular map's playable disc is inscribed in the square
        // of `size`; half the smaller dimension is the radius.
        (self.size.0.min(self.size.1) / 2) as i64
    }

    /// Normalize a point to its canonical image: a no-op for flat maps,
    /// modulo-wrap for wrapped maps, reflect/project for circular maps.
    pub fn canonical_location(&self, p: Point) -> Point {
        match self.mode {
            MapMode::Flat => p,
            MapMode::Wrapped => self.wrap(p),
            MapMode::Circular => self.project_into_circle(p),
        }
    }

    fn wrap(&self, p: Point) -> Point {
        let w = self.size.0 as i32;
        let h = self.size.1 as i32;
        if w == 0 || h == 0 {
            return p;
        }
        let rel_x = p.x - self.min.x;
        let rel_y = p.y - self.min.y;
        Point::new(self.min.x + rel_x.rem_euclid(w), self.min.y + rel_y.rem_euclid(h))
    }

    fn project_into_circle(&self, p: Point) -> Point {
        let radius = self.circle_radius();
        if radius == 0 {
            return p;
        }
        let dist2 = self.center.squared_distance_to(p);
        if dist2 <= radius * radius {
            return p;
        }
        let dx = (p.x - self.center.x) as f64;
        let dy = (p.y - self.center.y) as f64;
        let dist = dist2.isqrt() as f64;
        if dist == 0.0 {
            return p;
        }
        let diameter = (2 * radius) as f64;
        // walk the ray back modulo the diameter, keeping the point on
        // the disc the same way a wrapped map reduces modulo its size.
        let folded = dist.rem_euclid(diameter).min(diameter - f64::EPSILON);
        let folded = if folded > radius as f64 {
            diameter - folded
        } else {
            folded
        };
        let scale = folded / dist;
        Point::new(
            self.center.x + (dx * scale).round() as i32,
            self.center.y + (dy * scale).round() as i32,
        )
    }

    /// How many rectangular images to draw for this map's wrap mode: 1 for
    /// flat, 9 for classical wrapped, 13 for circular (9 square images
    /// plus the 4 diagonal partial-overlap images).
    pub fn num_rectangular_images(&self) -> usize {
        match self.mode {
            MapMode::Flat => 1,
            MapMode::Wrapped => WRAP_OFFSETS.len(),
            MapMode::Circular => WRAP_OFFSETS.len() + CIRCULAR_EXTRA_OFFSETS.len(),
        }
    }

    /// Translate `p` to image `image_index`, per `num_rectangular_images`'s
    /// enumeration order.
    pub fn simple_point_alias(&self, p: Point, image_index: usize) -> Point {
        let (dx, dy) = if image_index < WRAP_OFFSETS.len() {
            WRAP_OFFSETS[image_index]
        } else {
            CIRCULAR_EXTRA_OFFSETS[image_index - WRAP_OFFSETS.len()]
        };
        p.offset(dx * self.size.0 as i32, dy * self.size.1 as i32)
    }

    /// Find an aliased copy of `p` close to `near`, if any applies.
    /// `mode = 1` requests the circular "outside of circle" alias.
    /// Returns `None` when no alias is nearer than the point itself.
    pub fn point_alias(&self, p: Point, near: Point, mode: u8, is_exact_point: bool) -> Option<Point> {
        if self.mode == MapMode::Flat {
            return None;
        }
        if self.mode == MapMode::Circular && mode == 1 {
            let radius = self.circle_radius();
            if self.center.squared_distance_to(p) <= radius * radius {
                return None;
            }
        }
        let mut best: Option<(Point, i64)> = None;
        for i in 0..self.num_rectangular_images() {
            let candidate = self.simple_point_alias(p, i);
            if is_exact_point && candidate == p {
                continue;
            }
            let d = candidate.squared_distance_to(near);
            if best.map(|(_, bd)| d < bd).unwrap_or(true) {
                best = Some((candidate, d));
            }
        }
        best.map(|(pt, _)| pt)
    }

    /// Wraparound-aware squared distance between two points.
    pub fn squared_distance(&self, a: Point, b: Point) -> i64 {
        match self.mode {
            MapMode::Flat => a.squared_distance_to(b),
            MapMode::Wrapped | MapMode::Circular => (0..self.num_rectangular_images())
                .map(|i| self.simple_point_alias(a, i).squared_distance_to(b))
                .min()
                .unwrap_or_else(|| a.squared_distance_to(b)),
        }
    }
}
