//! Narrow seams to the tokenizer, model-construction, and weight-loading
//! collaborators. None of them are implemented here; the pipeline only hands
//! them examples and surfaces their failures unchanged.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::constants::collaborators::{MODEL_CONFIG_FILENAME, MODEL_WEIGHTS_FILENAME};
use crate::data::{Example, ExampleSet};
use crate::errors::PipelineError;

/// Model construction parameters as loaded from `config.json`.
pub type ModelConfig = Map<String, Value>;

/// Converts serialized examples into model inputs.
pub trait TokenizerCollaborator {
    /// Encoded representation of one example.
    type Encoded;
    /// Encode one example.
    fn encode(&self, example: Example<'_>) -> Result<Self::Encoded, PipelineError>;
}

/// Builds a model instance from a configuration mapping.
pub trait ModelInitializer {
    type Model;
    fn initialize(&self, config: &ModelConfig) -> Result<Self::Model, PipelineError>;
}

/// Where serialized weights live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeightLocation {
    /// Weights file on the local filesystem.
    LocalPath(PathBuf),
    /// Identifier understood by a remote registry collaborator.
    Remote { repo_id: String },
}

/// Loads serialized parameters into an already-constructed model.
pub trait WeightLoader<M> {
    /// Must fail when `location` cannot be resolved.
    fn load_into(&self, model: &mut M, location: &WeightLocation) -> Result<(), PipelineError>;
}

impl ExampleSet {
    /// Encode every example in order, stopping at the first tokenizer failure.
    pub fn encode_with<T: TokenizerCollaborator>(
        &self,
        tokenizer: &T,
    ) -> Result<Vec<T::Encoded>, PipelineError> {
        self.iter().map(|example| tokenizer.encode(example)).collect()
    }
}

/// Resolve a local weights path, failing when nothing exists there.
///
/// A directory resolves to its `model_weights.pth`.
pub fn resolve_local_weights(path: &Path) -> Result<PathBuf, PipelineError> {
    let candidate = if path.is_dir() {
        path.join(MODEL_WEIGHTS_FILENAME)
    } else {
        path.to_path_buf()
    };
    if candidate.is_file() {
        info!(path = %candidate.display(), "resolved model weights");
        Ok(candidate)
    } else {
        error!(path = %candidate.display(), "weights file not found");
        Err(PipelineError::SourceUnavailable {
            source_id: candidate.display().to_string(),
            reason: "weights file not found".to_string(),
        })
    }
}

/// Read a model configuration object from `path` (or `path/config.json`).
pub fn load_model_config(path: &Path) -> Result<ModelConfig, PipelineError> {
    let path = if path.is_dir() {
        path.join(MODEL_CONFIG_FILENAME)
    } else {
        path.to_path_buf()
    };
    let unavailable = |reason: String| {
        error!(path = %path.display(), %reason, "failed loading model configuration");
        PipelineError::SourceUnavailable {
            source_id: path.display().to_string(),
            reason,
        }
    };
    let raw = fs::read_to_string(&path).map_err(|err| unavailable(err.to_string()))?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(config)) => {
            info!(path = %path.display(), keys = config.len(), "loaded model configuration");
            Ok(config)
        }
        Ok(_) => Err(unavailable("configuration is not a JSON object".to_string())),
        Err(err) => Err(unavailable(format!("invalid JSON: {err}"))),
    }
}

/// Load a configuration, build the model, and load its weights.
///
/// Collaborator failures propagate unchanged.
pub fn build_model<I, L>(
    initializer: &I,
    loader: &L,
    config_path: &Path,
    weights: &WeightLocation,
) -> Result<I::Model, PipelineError>
where
    I: ModelInitializer,
    L: WeightLoader<I::Model>,
{
    let config = load_model_config(config_path)?;
    let mut model = initializer.initialize(&config)?;
    loader.load_into(&mut model, weights)?;
    Ok(model)
}
