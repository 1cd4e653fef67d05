//! Array values, element types and the built-in containers.

pub mod buffer;
pub mod container;
pub mod dtype;
pub mod input;
