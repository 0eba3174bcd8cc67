//! Linear-chain CRF trained with structured perceptron updates.
//!
//! Emission scores are sparse: each token feature carries one weight per BIO
//! tag. Transition scores are a dense `[prev][curr]` matrix.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use oorandom::Rand32;
use serde::{Deserialize, Serialize};

use crate::crf::features::BIAS;
use crate::error::{MindscanError, Result};
use crate::parser::bio_tags::BioTag;
use crate::parser::viterbi::ViterbiDecoder;

pub const NUM_LABELS: usize = BioTag::NUM_TAGS;

/// Bumped whenever the persisted layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// A sentence prepared for training: features per token plus gold tag indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSentence {
    pub features: Vec<Vec<String>>,
    pub gold: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrfModel {
    pub format_version: u32,
    /// Entity label the B/I tags stand for.
    pub label: String,
    pub emission_weights: HashMap<String, [f32; NUM_LABELS]>,
    pub transition: Vec<Vec<f32>>,
}

impl CrfModel {
    /// A blank model with all weights at zero.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            label: label.into(),
            emission_weights: HashMap::new(),
            transition: vec![vec![0.0f32; NUM_LABELS]; NUM_LABELS],
        }
    }

    /// Number of distinct features with learned weights.
    pub fn num_features(&self) -> usize {
        self.emission_weights.len()
    }

    pub fn emissions(&self, features: &[Vec<String>]) -> Vec<Vec<f32>> {
        features
            .iter()
            .map(|token_features| {
                let mut scores = vec![0.0f32; NUM_LABELS];
                for feature in token_features {
                    if let Some(weights) = self.emission_weights.get(feature) {
                        for (score, weight) in scores.iter_mut().zip(weights) {
                            *score += weight;
                        }
                    }
                }
                scores
            })
            .collect()
    }

    pub fn predict(&self, decoder: &ViterbiDecoder, features: &[Vec<String>]) -> Result<Vec<usize>> {
        decoder.decode(&self.emissions(features), &self.transition)
    }

    /// One perceptron step on a single sentence.
    ///
    /// Each feature except the bias is dropped with probability `dropout`
    /// before decoding; weights move toward the gold path and away from the
    /// predicted one. Returns the number of mis-tagged tokens.
    pub fn train_step(
        &mut self,
        decoder: &ViterbiDecoder,
        sentence: &TaggedSentence,
        dropout: f32,
        learning_rate: f32,
        rng: &mut Rand32,
    ) -> Result<f32> {
        if sentence.features.is_empty() {
            return Ok(0.0);
        }

        let features: Vec<Vec<String>> = if dropout > 0.0 {
            sentence
                .features
                .iter()
                .map(|token| {
                    token
                        .iter()
                        .filter(|f| f.as_str() == BIAS || rng.rand_float() >= dropout)
                        .cloned()
                        .collect()
                })
                .collect()
        } else {
            sentence.features.clone()
        };

        let preds = self.predict(decoder, &features)?;
        let gold = &sentence.gold;
        let mut loss = 0.0f32;

        for (i, (&pred, &true_label)) in preds.iter().zip(gold.iter()).enumerate() {
            if pred == true_label {
                continue;
            }
            loss += 1.0;
            for feature in &features[i] {
                let weights = self
                    .emission_weights
                    .entry(feature.clone())
                    .or_insert([0.0; NUM_LABELS]);
                weights[true_label] += learning_rate;
                weights[pred] -= learning_rate;
            }
        }

        for i in 1..gold.len().min(preds.len()) {
            let (from, to) = (preds[i - 1], preds[i]);
            let (correct_from, correct_to) = (gold[i - 1], gold[i]);

            if from != correct_from || to != correct_to {
                self.transition[from][to] -= learning_rate;
                self.transition[correct_from][correct_to] += learning_rate;
            }
        }

        Ok(loss)
    }

    /// Write the model as pretty JSON, replacing any existing file.
    ///
    /// The JSON goes to a sibling `.tmp` file first and is renamed over
    /// `path`, so a failed save leaves the previous model intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MindscanError::model_save(path, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| MindscanError::model_save(path, e))?;

        let tmp = staging_path(path);
        let written = std::fs::write(&tmp, json).and_then(|()| std::fs::rename(&tmp, path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(MindscanError::model_save(path, e));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MindscanError::model_load(path, e))?;
        let model: CrfModel =
            serde_json::from_str(&content).map_err(|e| MindscanError::model_load(path, e))?;
        model.validate().map_err(|reason| MindscanError::model_load(path, reason))?;
        Ok(model)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.format_version != FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.label.trim().is_empty() {
            return Err("model has no entity label".into());
        }
        if self.transition.len() != NUM_LABELS
            || self.transition.iter().any(|row| row.len() != NUM_LABELS)
        {
            return Err(format!("transition matrix must be {NUM_LABELS}x{NUM_LABELS}"));
        }
        if self
            .emission_weights
            .values()
            .flatten()
            .chain(self.transition.iter().flatten())
            .any(|w| !w.is_finite())
        {
            return Err("model contains non-finite weights".into());
        }
        Ok(())
    }
}

/// `model.json` -> `model.json.tmp`, next to the target.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("model"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CONCERN_LABEL;

    fn sentence() -> TaggedSentence {
        // "so stressed today" with "stressed" as the concern
        TaggedSentence {
            features: vec![
                vec![BIAS.into(), "w=so".into()],
                vec![BIAS.into(), "w=stressed".into()],
                vec![BIAS.into(), "w=today".into()],
            ],
            gold: vec![
                BioTag::Outside.index(),
                BioTag::BeginConcern.index(),
                BioTag::Outside.index(),
            ],
        }
    }

    #[test]
    fn test_blank_model() {
        let model = CrfModel::new(CONCERN_LABEL);
        assert_eq!(model.num_features(), 0);
        assert_eq!(model.transition.len(), NUM_LABELS);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_train_step_learns_sentence() {
        let decoder = ViterbiDecoder::new();
        let mut model = CrfModel::new(CONCERN_LABEL);
        let mut rng = Rand32::new(7);
        let sentence = sentence();

        let first = model.train_step(&decoder, &sentence, 0.0, 1.0, &mut rng).unwrap();
        assert!(first > 0.0);

        for _ in 0..10 {
            model.train_step(&decoder, &sentence, 0.0, 1.0, &mut rng).unwrap();
        }

        let preds = model.predict(&decoder, &sentence.features).unwrap();
        assert_eq!(preds, sentence.gold);
        let last = model.train_step(&decoder, &sentence, 0.0, 1.0, &mut rng).unwrap();
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_empty_sentence_has_no_loss() {
        let decoder = ViterbiDecoder::new();
        let mut model = CrfModel::new(CONCERN_LABEL);
        let mut rng = Rand32::new(1);
        let empty = TaggedSentence {
            features: vec![],
            gold: vec![],
        };
        assert_eq!(model.train_step(&decoder, &empty, 0.3, 1.0, &mut rng).unwrap(), 0.0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");

        let mut model = CrfModel::new(CONCERN_LABEL);
        model.emission_weights.insert("w=panic".into(), [2.0, -1.0, -1.0]);
        model.transition[2][0] = 0.5;
        model.save(&path).unwrap();

        let loaded = CrfModel::load(&path).unwrap();
        assert_eq!(loaded.label, CONCERN_LABEL);
        assert_eq!(loaded.emission_weights["w=panic"], [2.0, -1.0, -1.0]);
        assert_eq!(loaded.transition[2][0], 0.5);
    }

    #[test]
    fn test_save_replaces_existing_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        CrfModel::new(CONCERN_LABEL).save(&path).unwrap();

        let mut model = CrfModel::new(CONCERN_LABEL);
        model.emission_weights.insert("w=sad".into(), [1.0, 0.0, -1.0]);
        model.save(&path).unwrap();

        assert_eq!(CrfModel::load(&path).unwrap().num_features(), 1);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("model.json")]);
    }

    #[test]
    fn test_failed_save_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the final rename fail
        let path = dir.path().join("model.json");
        std::fs::create_dir(&path).unwrap();

        let err = CrfModel::new(CONCERN_LABEL).save(&path).unwrap_err();
        assert!(matches!(err, MindscanError::ModelSave { .. }));
        assert!(path.is_dir());
        assert!(!dir.path().join("model.json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CrfModel::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MindscanError::ModelLoad { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CrfModel::load(&path),
            Err(MindscanError::ModelLoad { .. })
        ));

        std::fs::write(
            &path,
            r#"{"format_version":1,"label":"X","emission_weights":{},"transition":[[0.0]]}"#,
        )
        .unwrap();
        assert!(matches!(
            CrfModel::load(&path),
            Err(MindscanError::ModelLoad { .. })
        ));
    }
}
