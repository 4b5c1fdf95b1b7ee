pub mod autopilot;

pub use autopilot::AutopilotMode;
