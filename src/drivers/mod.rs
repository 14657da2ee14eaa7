//! Hardware initialisation, interrupt capture, and task placement.

pub mod edge_source;
pub mod hw_init;
pub mod task_pin;
