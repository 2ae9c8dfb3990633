// Domain layer: menu and event models plus the ports (interfaces) the core depends on.

pub mod model;
pub mod ports;
