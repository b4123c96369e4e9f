pub mod indicators;
pub mod scorer;


pub use indicators::*;
pub use scorer::*;
