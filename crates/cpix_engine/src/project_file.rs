//! Project files: a whole document as JSON.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Document, EngineError, Result};

pub const PROJECT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ProjectRef<'a> {
    version: u32,
    document: &'a Document,
}

#[derive(Deserialize)]
struct Project {
    version: u32,
    document: Document,
}

impl Document {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ProjectRef {
            version: PROJECT_VERSION,
            document: self,
        })?)
    }

    /// Parses and validates a project.
    ///
    /// # Errors
    ///
    /// Malformed JSON, a newer project version or data breaking a document
    /// invariant.
    pub fn from_json(json: &str) -> Result<Document> {
        let project: Project = serde_json::from_str(json)?;
        if project.version > PROJECT_VERSION {
            return Err(EngineError::UnsupportedVersion {
                version: project.version,
                supported: PROJECT_VERSION,
            });
        }
        project.document.validate()?;
        Ok(project.document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        log::debug!("saved project {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Document> {
        let json = fs::read_to_string(path)?;
        let doc = Document::from_json(&json).map_err(|err| EngineError::ReadProject {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        log::debug!("loaded project {} with {} layers", path.display(), doc.layer_count());
        Ok(doc)
    }
}
