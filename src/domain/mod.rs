// Domain layer: the host object model and the ports through which the core reaches the host.

pub mod model;
pub mod modules;
pub mod ports;
