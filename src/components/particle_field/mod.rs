//! Animated particle background component.
//!
//! Renders a field of glowing particles on an HTML canvas with:
//! - Pointer attraction or repulsion and proximity-based growth
//! - Fading links between nearby particles, optionally only the nearest few
//! - Wrap or bounce edges, chosen per configuration
//! - Click bursts of short-lived particles
//!
//! The simulation core ([`ParticleField`]) draws through the [`Surface`]
//! trait, so it runs without a browser.
//!
//! # Example
//!
//! ```ignore
//! use particle_field::{FieldConfig, ParticleFieldCanvas};
//!
//! let config = FieldConfig::constellation();
//! view! { <ParticleFieldCanvas config=config fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod frame;
mod particles;
pub mod render;
mod state;
pub mod surface;
pub mod theme;

pub use component::{ParticleFieldCanvas, scroll_fade};
pub use config::{BoundaryPolicy, BurstConfig, FieldConfig, PointerConfig, PointerMode, WaveConfig};
pub use frame::{FrameLoop, FrameScheduler};
pub use particles::{Particle, pointer_force_factor};
pub use state::{Link, ParticleField, find_links, link_opacity};
pub use surface::Surface;
pub use theme::{Color, FieldStyle, GlowStyle, LinkStyle, Palette};
