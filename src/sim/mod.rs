//! Deterministic simulation module
//!
//! Everything here is pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, passed explicitly
//! - Stable iteration order (by fish ID)
//! - Bodies couple only through forces and positions passed in and out

pub mod bait;
pub mod fish;
pub mod float;
pub mod guards;
pub mod integrator;
pub mod line;
pub mod rig;
pub mod rod;
pub mod school;
pub mod scent;
pub mod snapshot;

pub use bait::Bait;
pub use fish::{BiteType, FishAgent, FishState, dipole_profile, suck_profile};
pub use float::{FloatBody, FloatPhase, submerged_length};
pub use integrator::{PositionPhase, begin_step, end_step};
pub use line::Line;
pub use rig::{FrameInput, Rig};
pub use rod::Rod;
pub use school::create_school;
pub use scent::ScentCloud;
pub use snapshot::{FishView, Snapshot};
