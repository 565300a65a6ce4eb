pub mod animation;
pub mod config;
pub mod error;
pub mod planner;
pub mod roulette;
pub mod segment;
pub mod session;
pub mod tick;

pub use error::WheelError;
pub use planner::{plan_spin, PointerAlignment, SpinPlanner};
pub use roulette::select_winner;
pub use segment::{Segment, SegmentList};
pub use session::{Resync, SpinPhase, SpinPlan, SpinRequest, SpinSession, Winner};
