// Domain layer: RPC record shapes, call descriptions and the ports to external collaborators.

pub mod model;
pub mod ports;
