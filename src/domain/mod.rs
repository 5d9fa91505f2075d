// Domain layer: core models and ports (interfaces). No HTTP or UI code lives here.

pub mod model;
pub mod ports;
