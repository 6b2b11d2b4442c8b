pub mod constants;
pub mod container;

pub use constants::*;
pub use container::Container;
