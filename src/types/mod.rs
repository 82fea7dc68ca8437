pub mod chart;
pub mod levels;
pub mod signals;

pub use chart::*;
pub use levels::*;
pub use signals::*;
