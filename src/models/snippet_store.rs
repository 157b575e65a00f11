use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::export;
use crate::models::storage::{SNIPPETS_KEY, StorageManager};
use crate::models::Snippet;

pub const VALIDATION_MESSAGE: &str = "Please provide both a name and code for the snippet.";

/// Ordered list of saved snippets, newest first
#[derive(Debug, Default)]
pub struct SnippetStore {
    snippets: Vec<Snippet>,
}

impl SnippetStore {
    /// Reads the persisted list once. A blob that does not parse as a list of
    /// snippets is treated as an empty list.
    pub fn load(storage: &StorageManager) -> Self {
        let snippets = match storage.get(SNIPPETS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Failed to parse saved snippets: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self { snippets }
    }

    pub fn list(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Looks a snippet up by id, then exact name, then partial name
    pub fn find(&self, name_or_id: &str) -> Option<&Snippet> {
        if let Ok(id) = Uuid::parse_str(name_or_id) {
            return self.get(id);
        }

        let name = name_or_id.to_lowercase();
        self.snippets
            .iter()
            .find(|s| s.name.to_lowercase() == name)
            .or_else(|| {
                self.snippets
                    .iter()
                    .find(|s| s.name.to_lowercase().contains(&name))
            })
    }

    /// Saves a new snippet in front of the list
    pub fn save(
        &mut self,
        storage: &mut StorageManager,
        name: &str,
        code: &str,
    ) -> Result<Uuid, String> {
        if name.trim().is_empty() || code.trim().is_empty() {
            return Err(VALIDATION_MESSAGE.to_string());
        }

        let snippet = Snippet::new(name.trim().to_string(), code.to_string());
        let snippet_id = snippet.id;

        let mut updated = Vec::with_capacity(self.snippets.len() + 1);
        updated.push(snippet);
        updated.extend(self.snippets.iter().cloned());

        self.persist(storage, updated)
            .map_err(|e| format!("Failed to save snippet: {}", e))?;

        log::info!("Saved snippet '{}' ({})", name.trim(), snippet_id);
        Ok(snippet_id)
    }

    /// Removes the snippet with `id`. Unknown ids leave the list untouched
    /// and return `Ok(false)`.
    pub fn delete(&mut self, storage: &mut StorageManager, id: Uuid) -> Result<bool, String> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let updated: Vec<_> = self
            .snippets
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();

        self.persist(storage, updated)
            .map_err(|e| format!("Failed to delete snippet: {}", e))?;

        log::info!("Deleted snippet {}", id);
        Ok(true)
    }

    /// Overwrites the code of an existing snippet and bumps its `updatedAt`
    pub fn update_code(
        &mut self,
        storage: &mut StorageManager,
        id: Uuid,
        code: &str,
    ) -> Result<(), String> {
        if code.trim().is_empty() {
            return Err(VALIDATION_MESSAGE.to_string());
        }

        let mut updated = self.snippets.clone();
        let Some(snippet) = updated.iter_mut().find(|s| s.id == id) else {
            return Err("Snippet not found".to_string());
        };
        snippet.update_code(code.to_string());

        self.persist(storage, updated)
            .map_err(|e| format!("Failed to update snippet: {}", e))
    }

    pub fn copy_to_clipboard(&self, id: Uuid) -> Result<()> {
        let snippet = self.get(id).context("Snippet not found")?;
        export::copy_to_clipboard(&snippet.code)
    }

    /// Writes the snippet's code to `<sanitized-name>.js` inside `dir`
    pub fn export_as_file(&self, id: Uuid, dir: &Path) -> Result<PathBuf> {
        let snippet = self.get(id).context("Snippet not found")?;
        fs::create_dir_all(dir).context("Failed to create export directory")?;

        let path = dir.join(snippet.export_file_name());
        fs::write(&path, &snippet.code).context("Failed to write exported snippet")?;

        Ok(path)
    }

    // The in-memory list only changes once the write has succeeded
    fn persist(&mut self, storage: &mut StorageManager, snippets: Vec<Snippet>) -> Result<()> {
        let raw = serde_json::to_string(&snippets).context("Failed to serialize snippets")?;
        storage.set(SNIPPETS_KEY, &raw)?;
        self.snippets = snippets;
        Ok(())
    }
}
