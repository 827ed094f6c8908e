pub mod invitation;

pub use invitation::*;
