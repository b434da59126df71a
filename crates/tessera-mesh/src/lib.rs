//! Mesh topology store for the icosphere tile grid.
//!
//! A mesh buffer holds three record arrays (corners, borders and tiles) at
//! offsets fixed by the header. [`MeshStore`] owns the buffer and decodes
//! individual records on demand; [`MeshBuilder`] writes new buffers. The
//! [`progress`] module carries the checkpoint types shared by every bulk sweep
//! in the workspace.

mod builder;
mod error;
pub mod layout;
pub mod progress;
mod records;
mod store;

pub use builder::MeshBuilder;
pub use error::MeshError;
pub use layout::MeshLayout;
pub use progress::{
    DEFAULT_PROGRESS_INTERVAL, NoProgress, ProgressSink, ProgressTicker, SweepProgress, SweepStage,
};
pub use records::{Border, Corner, MeshHeader, Tile};
pub use store::MeshStore;
