//! Simulation module
//!
//! Entities, physics and geometry for both demos. Pure and deterministic:
//! - One integration step per frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod light;
pub mod pendulum;
pub mod pointer;
pub mod scene;
pub mod shadow;
pub mod state;
pub mod tick;
pub mod trail;

pub use light::{LightSource, Stick};
pub use pendulum::{ForceVectors, Pendulum, StepParams, integrate, small_angle_period};
pub use pointer::{DragTarget, Pointer, PointerKind, pick_light_scene, pick_pendulum};
pub use scene::{Scene, SimulationKind};
pub use shadow::{
    LightShadows, PointShadow, ShadowExtent, ShadowQuad, cast_shadows, extended_extent,
    point_shadow,
};
pub use state::{
    LightScene, LightUpdate, PendulumScene, PendulumSceneUpdate, PendulumUpdate, StickUpdate,
    ground_for,
};
pub use tick::{TickInput, tick};
pub use trail::{Trail, TrailPoint};
