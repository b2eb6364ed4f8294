//! SVG region-coloring engine.
//!
//! The pipeline: raw SVG text -> [`svg::identify::identify`] (stable
//! `path-{n}` ids) -> [`svg::apply::apply`] (fills from a [`model::LayerMap`])
//! -> rendered markup. [`session::EditSession`] coordinates the current
//! image, color, layer map and undo stack, and persists through the
//! [`store::ProgressStore`] seam.

pub mod autoflush;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod svg {
    pub mod apply;
    pub mod identify;
}

pub use autoflush::AutoFlush;
pub use error::{SessionError, StoreError, SvgError};
pub use model::{
    ColorPalette, LayerMap, ProgressRecord, RegionId, SvgImage, UserProfile, MAX_PALETTE_COLORS,
};
pub use session::{EditSession, DEFAULT_COLOR, FLUSH_INTERVAL};
pub use store::{MemoryStore, ProgressStore};
pub use svg::apply::apply;
pub use svg::identify::identify;
