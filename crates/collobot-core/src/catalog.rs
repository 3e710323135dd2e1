use std::{fs, path::Path};

use serde::Deserialize;

use crate::{errors::Error, Result};

/// Reserved top-level key carrying catalog metadata instead of a category.
pub const METADATA_KEY: &str = "_metadata";

/// Topic shown when the upstream pipeline did not set one.
pub const DEFAULT_TOPIC: &str = "Video Content";

/// One category of collocations. Expression order is stable for the
/// lifetime of a loaded snapshot and is used for index-based addressing.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub expressions: Vec<String>,
}

/// An immutable catalog snapshot: categories in file order plus the topic
/// taken from the `_metadata` entry.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    topic: Option<String>,
    categories: Vec<(String, CategoryEntry)>,
}

impl Catalog {
    /// Parses the upstream JSON document. Every key except `_metadata`
    /// must map to `{ "name": ..., "expressions": [...] }`.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;

        let mut topic = None;
        let mut categories = Vec::new();
        for (key, value) in raw {
            if key == METADATA_KEY {
                topic = value
                    .get("topic")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                continue;
            }
            let entry: CategoryEntry = serde_json::from_value(value)?;
            categories.push((key, entry));
        }

        Ok(Self { topic, categories })
    }

    pub fn get(&self, category_id: &str) -> Option<&CategoryEntry> {
        self.categories
            .iter()
            .find(|(id, _)| id == category_id)
            .map(|(_, entry)| entry)
    }

    /// True when no categories (metadata aside) are loaded.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_TOPIC)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryEntry)> {
        self.categories
            .iter()
            .map(|(id, entry)| (id.as_str(), entry))
    }
}

/// Holds the process-wide catalog snapshot, replaced wholesale on reload.
///
/// The catalog is produced by an external pipeline and may not exist yet
/// when the bot starts; on any load failure the store falls back to an
/// empty snapshot and returns the error so the caller can decide what the
/// user sees (typically a "please wait" screen).
#[derive(Debug, Default)]
pub struct CatalogStore {
    snapshot: Catalog,
}

impl CatalogStore {
    pub fn snapshot(&self) -> &Catalog {
        &self.snapshot
    }

    /// Replaces the snapshot from a local JSON file. Returns the category
    /// count on success; on failure installs an empty catalog.
    pub fn reload_from_file(&mut self, path: &Path) -> Result<usize> {
        let loaded = fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|text| Catalog::from_json(&text));

        match loaded {
            Ok(catalog) => {
                let count = catalog.len();
                tracing::info!(categories = count, path = %path.display(), "catalog loaded");
                self.snapshot = catalog;
                Ok(count)
            }
            Err(e) => {
                self.snapshot = Catalog::default();
                Err(e)
            }
        }
    }

    /// Replaces the snapshot from a remote endpoint returning the same
    /// JSON shape. Same empty-catalog fallback as the file loader.
    pub async fn reload_from_url(&mut self, url: &str) -> Result<usize> {
        match fetch_catalog(url).await {
            Ok(catalog) => {
                let count = catalog.len();
                tracing::info!(categories = count, url, "catalog loaded from url");
                self.snapshot = catalog;
                Ok(count)
            }
            Err(e) => {
                self.snapshot = Catalog::default();
                Err(e)
            }
        }
    }
}

async fn fetch_catalog(url: &str) -> Result<Catalog> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let text = response.text().await?;
    Catalog::from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "_metadata": { "topic": "South America Travel" },
        "travel": { "name": "Travel", "expressions": ["hit the road", "off the beaten track"] },
        "food": { "name": "Food", "expressions": ["grab a bite"] }
    }"#;

    #[test]
    fn parses_categories_and_topic() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.topic(), "South America Travel");
        assert_eq!(catalog.get("travel").unwrap().expressions.len(), 2);
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn category_order_follows_the_document() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["travel", "food"]);
    }

    #[test]
    fn topic_defaults_when_metadata_is_absent() {
        let catalog =
            Catalog::from_json(r#"{"a": {"name": "A", "expressions": []}}"#).unwrap();
        assert_eq!(catalog.topic(), DEFAULT_TOPIC);
    }

    #[test]
    fn missing_file_falls_back_to_empty_catalog() {
        let mut store = CatalogStore::default();
        let err = store
            .reload_from_file(Path::new("/tmp/collobot-does-not-exist.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn malformed_file_falls_back_to_empty_catalog() {
        let path = std::path::PathBuf::from(format!(
            "/tmp/collobot-bad-catalog-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();

        let mut store = CatalogStore::default();
        let err = store.reload_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(store.snapshot().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn reload_replaces_the_previous_snapshot() {
        let path = std::path::PathBuf::from(format!(
            "/tmp/collobot-catalog-{}.json",
            std::process::id()
        ));
        fs::write(&path, SAMPLE).unwrap();

        let mut store = CatalogStore::default();
        assert_eq!(store.reload_from_file(&path).unwrap(), 2);

        // A failed reload does not keep the stale snapshot around.
        let _ = fs::remove_file(&path);
        assert!(store.reload_from_file(&path).is_err());
        assert!(store.snapshot().is_empty());
    }
}
