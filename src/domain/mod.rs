// Domain layer: core models, name handling and the Slack port. No HTTP here.

pub mod model;
pub mod names;
pub mod ports;
