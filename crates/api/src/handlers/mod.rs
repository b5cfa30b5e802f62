pub mod estimate;
pub mod generation;
pub mod history;
pub mod styles;
