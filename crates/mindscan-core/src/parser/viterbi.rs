//! # Viterbi Decoding for CRF
//!
//! Implements the Viterbi algorithm for finding the most likely tag sequence
//! given emission scores and transition constraints.

use crate::error::{MindscanError, Result};
use crate::parser::bio_tags::BioTag;

/// Viterbi decoder for CRF tag sequences.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    num_tags: usize,
    valid_start: Vec<bool>,
    valid_transitions: Vec<Vec<bool>>,
}

impl ViterbiDecoder {
    /// Create a new Viterbi decoder for the BIO tag set.
    ///
    /// Forbidden transitions are pre-computed once and never scored.
    pub fn new() -> Self {
        let num_tags = BioTag::NUM_TAGS;
        let mut valid_start = vec![false; num_tags];
        let mut valid_transitions = vec![vec![false; num_tags]; num_tags];

        for &prev in BioTag::all_tags() {
            valid_start[prev.index()] = BioTag::is_valid_start(prev);
            for &curr in BioTag::all_tags() {
                valid_transitions[prev.index()][curr.index()] =
                    BioTag::is_valid_transition(prev, curr);
            }
        }

        Self {
            num_tags,
            valid_start,
            valid_transitions,
        }
    }

    /// Decode the optimal tag sequence.
    ///
    /// # Arguments
    /// * `emission_scores` - Matrix of shape [seq_len, num_tags] with emission scores
    /// * `transition_matrix` - Matrix of shape [num_tags, num_tags], indexed `[prev][curr]`
    ///
    /// # Returns
    /// The optimal tag sequence as indices.
    pub fn decode(
        &self,
        emission_scores: &[Vec<f32>],
        transition_matrix: &[Vec<f32>],
    ) -> Result<Vec<usize>> {
        let seq_len = emission_scores.len();
        if seq_len == 0 {
            return Ok(Vec::new());
        }

        if let Some(row) = emission_scores.iter().find(|row| row.len() != self.num_tags) {
            return Err(MindscanError::Decode(format!(
                "Emission score dimension mismatch: expected {}, got {}",
                self.num_tags,
                row.len()
            )));
        }
        if transition_matrix.len() != self.num_tags
            || transition_matrix.iter().any(|row| row.len() != self.num_tags)
        {
            return Err(MindscanError::Decode(format!(
                "Transition matrix must be {n}x{n}",
                n = self.num_tags
            )));
        }

        let mut dp: Vec<Vec<f32>> = vec![vec![f32::NEG_INFINITY; self.num_tags]; seq_len];
        let mut backptr: Vec<Vec<usize>> = vec![vec![0; self.num_tags]; seq_len];

        for tag in 0..self.num_tags {
            if self.valid_start[tag] {
                dp[0][tag] = emission_scores[0][tag];
            }
        }

        for pos in 1..seq_len {
            for curr_tag in 0..self.num_tags {
                let mut best_score = f32::NEG_INFINITY;
                let mut best_prev = 0;

                for prev_tag in 0..self.num_tags {
                    if !self.valid_transitions[prev_tag][curr_tag] {
                        continue;
                    }

                    let score = dp[pos - 1][prev_tag] + transition_matrix[prev_tag][curr_tag];
                    if score >= best_score {
                        best_score = score;
                        best_prev = prev_tag;
                    }
                }

                dp[pos][curr_tag] = best_score + emission_scores[pos][curr_tag];
                backptr[pos][curr_tag] = best_prev;
            }
        }

        // Ties go to the later tag, so an untrained model tags everything Outside
        let last = &dp[seq_len - 1];
        let mut best_final_tag = 0;
        for tag in 1..self.num_tags {
            if last[tag] >= last[best_final_tag] {
                best_final_tag = tag;
            }
        }

        let mut path = vec![best_final_tag];
        let mut curr_tag = best_final_tag;
        for pos in (1..seq_len).rev() {
            curr_tag = backptr[pos][curr_tag];
            path.push(curr_tag);
        }

        path.reverse();
        Ok(path)
    }
}

impl Default for ViterbiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_transitions() -> Vec<Vec<f32>> {
        vec![vec![0.0; BioTag::NUM_TAGS]; BioTag::NUM_TAGS]
    }

    #[test]
    fn test_viterbi_follows_emissions() {
        let decoder = ViterbiDecoder::new();
        // columns: B, I, O
        let emissions = vec![
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ];

        let path = decoder.decode(&emissions, &zero_transitions()).unwrap();
        assert_eq!(path, vec![2, 0, 1]);
    }

    #[test]
    fn test_viterbi_never_opens_with_inside() {
        let decoder = ViterbiDecoder::new();
        let emissions = vec![vec![0.0, 5.0, 0.0]];

        let path = decoder.decode(&emissions, &zero_transitions()).unwrap();
        assert_ne!(path[0], BioTag::InsideConcern.index());
    }

    #[test]
    fn test_viterbi_blocks_outside_to_inside() {
        let decoder = ViterbiDecoder::new();
        // Position 0 strongly O, position 1 strongly I: O -> I is forbidden.
        let emissions = vec![vec![0.0, 0.0, 10.0], vec![0.0, 3.0, 0.0]];

        let path = decoder.decode(&emissions, &zero_transitions()).unwrap();
        assert!(BioTag::is_valid_transition(
            BioTag::from_index(path[0]).unwrap(),
            BioTag::from_index(path[1]).unwrap()
        ));
    }

    #[test]
    fn test_viterbi_ties_prefer_outside() {
        let decoder = ViterbiDecoder::new();
        let emissions = vec![vec![0.0; BioTag::NUM_TAGS]; 4];

        let path = decoder.decode(&emissions, &zero_transitions()).unwrap();
        assert_eq!(path, vec![BioTag::Outside.index(); 4]);
    }

    #[test]
    fn test_viterbi_empty() {
        let decoder = ViterbiDecoder::new();
        let emissions: Vec<Vec<f32>> = vec![];

        let result = decoder.decode(&emissions, &zero_transitions()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_viterbi_dimension_mismatch() {
        let decoder = ViterbiDecoder::new();
        let emissions = vec![vec![1.0, 0.0]];

        assert!(decoder.decode(&emissions, &zero_transitions()).is_err());
    }
}
