pub mod bio_tags;
pub mod tokenizer;
pub mod viterbi;

pub use bio_tags::{BioTag, Entity, entities_from_tags, tags_from_spans};
pub use tokenizer::{Token, Tokenizer};
pub use viterbi::ViterbiDecoder;
