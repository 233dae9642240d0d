use crate::model::EntityModel;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use walkdir::WalkDir;

/// Stored form of a model, as returned by the model API.
#[derive(Debug, Deserialize)]
struct StoredModel {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_source")]
    source: EntityModel,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelFile {
    Stored(StoredModel),
    Bare(EntityModel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedModel {
    pub name: String,
    pub model: EntityModel,
}

/// Load one model. The name is the document `_id`, falling back to the file stem.
pub fn load_model(path: &Path) -> Result<NamedModel> {
    let f = File::open(path).with_context(|| format!("opening model file {}", path.display()))?;
    let parsed: ModelFile = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing model file {}", path.display()))?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
    let named = match parsed {
        ModelFile::Stored(doc) => NamedModel { name: doc.id.unwrap_or(stem), model: doc.source },
        ModelFile::Bare(model) => NamedModel { name: stem, model },
    };
    Ok(named)
}

/// Load a model file, or every `*.json` file below a directory, sorted by name.
pub fn load_models(path: &Path) -> Result<Vec<NamedModel>> {
    let mut models = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                models.push(load_model(p)?);
            }
        }
    } else {
        models.push(load_model(path)?);
    }
    models.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = models.len(), path = %path.display(), "loaded models");
    Ok(models)
}
