//! # BIO Tags for Concern Recognition
//!
//! Defines the tag set for sequence labeling of concern phrases and the
//! conversions between character spans and per-token tags.
//! Uses the BIO (Begin-Inside-Outside) tagging scheme.

use std::fmt;

use crate::parser::tokenizer::Token;
use crate::types::Span;

/// BIO tags for labeling tokens of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BioTag {
    BeginConcern,
    InsideConcern,
    // Outside (irrelevant token)
    Outside,
}

impl BioTag {
    /// Total number of distinct tags.
    pub const NUM_TAGS: usize = 3;

    /// Get all possible tags in order.
    pub fn all_tags() -> &'static [BioTag] {
        &[BioTag::BeginConcern, BioTag::InsideConcern, BioTag::Outside]
    }

    /// Get the tag index for weight tables.
    pub fn index(&self) -> usize {
        match self {
            BioTag::BeginConcern => 0,
            BioTag::InsideConcern => 1,
            BioTag::Outside => 2,
        }
    }

    /// Get tag from index.
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(BioTag::BeginConcern),
            1 => Some(BioTag::InsideConcern),
            2 => Some(BioTag::Outside),
            _ => None,
        }
    }

    /// Check if this is an "Inside" tag.
    pub fn is_inside(&self) -> bool {
        matches!(self, BioTag::InsideConcern)
    }

    /// Whether a sequence may open with this tag.
    pub fn is_valid_start(tag: BioTag) -> bool {
        !tag.is_inside()
    }

    /// Check if transitioning from `from` tag to `to` tag is valid.
    pub fn is_valid_transition(from: BioTag, to: BioTag) -> bool {
        // I-* needs a preceding B-* or I-*
        !matches!((from, to), (BioTag::Outside, BioTag::InsideConcern))
    }
}

impl fmt::Display for BioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BioTag::BeginConcern => write!(f, "B-CONCERN"),
            BioTag::InsideConcern => write!(f, "I-CONCERN"),
            BioTag::Outside => write!(f, "O"),
        }
    }
}

/// Byte range of a recognized entity in the tokenized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
}

/// Project gold spans onto tokens.
///
/// Returns `None` when a span boundary falls inside a token or a span covers
/// no token at all; such examples cannot be expressed as BIO tags.
pub fn tags_from_spans(tokens: &[Token], spans: &[Span]) -> Option<Vec<BioTag>> {
    let mut tags = vec![BioTag::Outside; tokens.len()];

    for span in spans {
        let mut covered = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            let overlaps = token.start < span.end && span.start < token.end;
            if !overlaps {
                continue;
            }
            let inside = token.start >= span.start && token.end <= span.end;
            if !inside || tags[i] != BioTag::Outside {
                return None;
            }
            tags[i] = if covered == 0 {
                BioTag::BeginConcern
            } else {
                BioTag::InsideConcern
            };
            covered += 1;
        }
        if covered == 0 {
            return None;
        }
    }

    Some(tags)
}

/// Collect entities from a decoded tag sequence.
///
/// A stray `I-CONCERN` with no open entity starts a new one rather than
/// being dropped.
pub fn entities_from_tags(tokens: &[Token], tags: &[BioTag]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut i = 0;

    while i < tags.len().min(tokens.len()) {
        if tags[i] == BioTag::Outside {
            i += 1;
            continue;
        }

        let start_token = i;
        i += 1;
        while i < tags.len().min(tokens.len()) && tags[i].is_inside() {
            i += 1;
        }

        entities.push(Entity {
            start: tokens[start_token].start,
            end: tokens[i - 1].end,
        });
    }

    entities
}
