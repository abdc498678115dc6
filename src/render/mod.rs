//! The renderer (spec §4.3.5, §6.1): traverses a `Viewport` over a
//! `Universe` and emits semantic draw events to a `RendererListener`.
//! No pixels here — only what to draw and where, in map coordinates.

pub mod listener;
pub mod renderer;
pub mod viewport;

pub use listener::{planet_flags, ship_flags, trail_flags, RendererListener, Relation, WarpWellDirection};
pub use renderer::Renderer;
pub use viewport::{options, Viewport};
