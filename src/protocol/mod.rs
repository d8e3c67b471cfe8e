pub mod items;
pub mod segments;
pub mod sequence;

pub use items::*;
pub use segments::*;
pub use sequence::*;
