// Domain layer: data models and ports (interfaces). No regex or IO here.

pub mod model;
pub mod ports;
