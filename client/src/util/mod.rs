//! Small helpers shared by the state modules.

pub mod debounce;
pub mod seq;
pub mod clock;
