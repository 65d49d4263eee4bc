pub mod block;
pub mod chunk;
pub mod coord;
pub mod face;
pub mod section;
pub mod volume;
