//! Setpoint control.
//!
//! Mode handling, setpoint resolution, the publish gate, and the controller
//! that ties them to the energy and telemetry state.

mod controller;
mod gate;
mod mode;
mod resolver;
mod snapshot;

pub use controller::{ControlEvent, FanController};
pub use gate::{GateState, PublishGate, PublishReason};
pub use mode::OperatingMode;
pub use resolver::{BudgetLimits, DEFAULT_RPM_STEP, QuantStep, Resolution, SetpointResolver};
pub use snapshot::ControllerSnapshot;
