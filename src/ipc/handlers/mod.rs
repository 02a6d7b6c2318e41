pub mod core;
pub mod grades;
pub mod grid;
pub mod persist;
pub mod roster;
