// Domain layer: core models and ports (interfaces). No dependencies on the
// storage or adapter layers.

pub mod model;
pub mod ports;
