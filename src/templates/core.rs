use super::{error::TemplateError, types::*};
use crate::compositor::WatermarkConfig;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Named watermark configurations persisted as a single JSON document keyed
/// by template name. The whole document is read at construction and
/// rewritten through a temp-file rename on every mutation.
pub struct TemplateManager {
    store_path: PathBuf,
    templates: HashMap<String, WatermarkTemplate>,
}

impl TemplateManager {
    /// Opens the store. A missing file is an empty store; an unreadable or
    /// corrupt one is an error, so a later save cannot clobber user data.
    pub fn load(store_path: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let store_path = store_path.into();
        let templates = if store_path.exists() {
            let content = std::fs::read_to_string(&store_path)?;
            serde_json::from_str(&content)?
        } else {
            debug!(
                "Template store {:?} does not exist yet, starting empty",
                store_path
            );
            HashMap::new()
        };
        Ok(Self {
            store_path,
            templates,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Saves a template under `name`. Refuses to replace an existing one
    /// unless `overwrite` is set.
    pub fn save(
        &mut self,
        name: &str,
        config: WatermarkConfig,
        description: String,
        overwrite: bool,
    ) -> Result<(), TemplateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::InvalidConfig(
                "template name must not be empty".to_string(),
            ));
        }
        config.validate().map_err(TemplateError::InvalidConfig)?;
        if self.templates.contains_key(name) && !overwrite {
            return Err(TemplateError::AlreadyExists(name.to_string()));
        }

        let template = WatermarkTemplate {
            name: name.to_string(),
            config,
            description,
            created_at: Utc::now(),
        };
        self.templates.insert(name.to_string(), template);
        self.persist()?;
        info!("Saved template '{}'", name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&WatermarkTemplate> {
        self.templates.get(name)
    }

    pub fn delete(&mut self, name: &str) -> Result<(), TemplateError> {
        if self.templates.remove(name).is_none() {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.persist()?;
        info!("Deleted template '{}'", name);
        Ok(())
    }

    /// Summaries of every template, sorted by name.
    pub fn list(&self) -> Vec<TemplateSummary> {
        let mut summaries: Vec<TemplateSummary> = self
            .templates
            .values()
            .map(|t| TemplateSummary {
                name: t.name.clone(),
                description: t.description.clone(),
                created_at: t.created_at,
                summary: t.config_summary(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Writes one template to its own JSON file for sharing.
    pub fn export(&self, name: &str, path: &Path) -> Result<(), TemplateError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        let json = serde_json::to_string_pretty(template)?;
        std::fs::write(path, json)?;
        info!("Exported template '{}' to {:?}", name, path);
        Ok(())
    }

    /// Reads a single-template JSON file into the store and returns the
    /// imported name.
    pub fn import(&mut self, path: &Path, overwrite: bool) -> Result<String, TemplateError> {
        let content = std::fs::read_to_string(path)?;
        let template: WatermarkTemplate = serde_json::from_str(&content)?;
        if template.name.trim().is_empty() {
            return Err(TemplateError::InvalidConfig(
                "imported template has no name".to_string(),
            ));
        }
        template
            .config
            .validate()
            .map_err(TemplateError::InvalidConfig)?;
        if self.templates.contains_key(&template.name) && !overwrite {
            return Err(TemplateError::AlreadyExists(template.name.clone()));
        }

        let name = template.name.clone();
        self.templates.insert(name.clone(), template);
        self.persist()?;
        info!("Imported template '{}' from {:?}", name, path);
        Ok(name)
    }

    /// Full-document rewrite through a temp file so a crash mid-write never
    /// leaves a truncated store behind.
    fn persist(&self) -> Result<(), TemplateError> {
        if let Some(parent) = self.store_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.templates)?;
        let tmp_path = self.store_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.store_path)?;
        Ok(())
    }
}
