// Domain layer: page models and ports (interfaces). Only serde/chrono beyond std.

pub mod model;
pub mod ports;
