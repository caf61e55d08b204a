//! Directional sunlight for the orrery: per-body light placement and the
//! packed uniform handed to the renderer.

mod directional;
mod director;

pub use directional::{DirectionalLight, DirectionalLightUniform};
pub use director::{DEFAULT_STANDOFF, LightDirector, LightPair, SECONDARY_OFFSET};
