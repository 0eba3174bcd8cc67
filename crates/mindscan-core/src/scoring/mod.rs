pub mod classifier;
pub mod intensity;
pub mod table;

pub use classifier::classify_concern;
pub use intensity::score_intensity;
pub use table::{CategoryRules, CategoryTable, MAX_INTENSITY, MIN_INTENSITY};
