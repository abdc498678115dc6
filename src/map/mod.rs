pub mod bounding_box;
pub mod drawing;
pub mod explosion;
pub mod indexed_vector;
pub mod ionstorm;
pub mod minefield;
pub mod objects;
pub mod planet;
pub mod postprocess;
pub mod selection;
pub mod ship;
pub mod signal;
pub mod ufo;
pub mod universe;

pub use bounding_box::BoundingBox;
pub use indexed_vector::IndexedVector;
pub use postprocess::HostConfig;
pub use selection::{SelExpr, Selections, SelectionVector};
pub use universe::Universe;
