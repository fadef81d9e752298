//! Codecard Model
//!
//! Defines the data contracts for rendering code cards:
//! - **Theme:** The light/dark selector and the visual parameters derived from it
//! - **Request:** The immutable settings collected by the front end and the
//!   per-file render request built from them
//!
//! Nothing here touches the filesystem or the raster libraries; the render
//! engine consumes these values.

pub mod request;
pub mod theme;

pub use request::*;
pub use theme::*;
