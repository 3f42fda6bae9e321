// Domain layer: entities and ports. Depends on nothing outside utils.

pub mod model;
pub mod ports;
