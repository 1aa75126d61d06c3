//! Screen scheduling and rendering.
//!
//! - [`Panel`] - dirty flag plus rate limit for one screen region
//! - [`Compositor`] - owns the screen and decides what to draw each tick
//! - `graphics` - embedded-graphics renderer for the round layout (`display` feature)

mod compositor;
mod panel;

/// embedded-graphics implementation of [`PendantDisplay`](crate::traits::PendantDisplay).
#[cfg(feature = "display")]
pub mod graphics;

pub use compositor::{Compositor, Frame, Screen};
pub use panel::Panel;

#[cfg(feature = "display")]
pub use graphics::GraphicsDisplay;
