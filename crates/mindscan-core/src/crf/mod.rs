pub mod features;
pub mod model;

pub use model::{CrfModel, TaggedSentence};
