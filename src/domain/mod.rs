// Domain layer: core models and ports (interfaces). No knowledge of concrete
// codecs, HTTP clients or the CLI.

pub mod form;
pub mod model;
pub mod ports;
