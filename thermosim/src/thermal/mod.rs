mod integrator;
mod model;
mod room;

pub use integrator::{IntegrationMethod, euler_step, rk4_step};
pub use model::{Envelope, rate_of_change};
pub use room::{DEFAULT_WALL_THICKNESS_CM, Room, Wall};
