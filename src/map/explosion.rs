use geo::Point;

/// Transient: explosions never survive `postprocess` into the next turn's
/// universe, they are re-derived from the result file each load.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: Option<u32>,
    pub position: Point,
    pub source_ship_id: Option<usize>,
    pub source_ship_name: Option<String>,
}
