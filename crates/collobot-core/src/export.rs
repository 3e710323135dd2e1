use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{domain::UserKey, errors::Error, Result};

/// Machine-readable record of one save action, written next to the text
/// file for the upstream pipeline to pick up.
#[derive(Debug, Serialize)]
pub struct SelectionRecord {
    pub user_name: String,
    pub user_id: i64,
    pub topic: String,
    pub selected_expressions: Vec<String>,
    pub filename: String,
    pub timestamp: String,
}

/// Writes a user's selection to a flat text file plus a JSON sidecar.
///
/// Filenames embed the user's display name and numeric id, so two users
/// with the same name cannot clobber each other's exports.
#[derive(Clone, Debug)]
pub struct Exporter {
    cards_dir: PathBuf,
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(cards_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            cards_dir: cards_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Exports `expressions` for `user`. Returns the text filename.
    ///
    /// An empty selection is a guard error and writes nothing. I/O errors
    /// propagate to the caller; no partial-write rollback is attempted.
    pub fn export(&self, user: &UserKey, topic: &str, expressions: &[String]) -> Result<String> {
        if expressions.is_empty() {
            return Err(Error::EmptySelection);
        }

        fs::create_dir_all(&self.cards_dir)?;

        let filename = format!(
            "{}_collocations_{}_{}.txt",
            topic.to_lowercase().replace(' ', "_"),
            user.name,
            user.id.0
        );
        self.write_card(&self.cards_dir.join(&filename), user, topic, expressions)?;

        let record = SelectionRecord {
            user_name: user.name.clone(),
            user_id: user.id.0,
            topic: topic.to_string(),
            selected_expressions: expressions.to_vec(),
            filename: filename.clone(),
            timestamp: Utc::now().to_rfc3339(),
        };
        let sidecar = self
            .output_dir
            .join(format!("selection_{}_{}.json", user.name, user.id.0));
        fs::write(&sidecar, serde_json::to_string_pretty(&record)?)?;

        tracing::info!(
            user = %user.name,
            count = expressions.len(),
            filename = %filename,
            "selection exported"
        );

        Ok(filename)
    }

    fn write_card(
        &self,
        path: &Path,
        user: &UserKey,
        topic: &str,
        expressions: &[String],
    ) -> Result<()> {
        let delimiter = "=".repeat(50);

        let mut body = String::new();
        body.push_str(&format!("My B2+ {topic} Collocations - {}\n", user.name));
        body.push_str(&format!(
            "Total selected: {} expressions\n",
            expressions.len()
        ));
        body.push_str(&delimiter);
        body.push_str("\n\n");
        for (i, expression) in expressions.iter().enumerate() {
            body.push_str(&format!("{}. {expression}\n", i + 1));
        }
        body.push('\n');
        body.push_str(&delimiter);
        body.push('\n');
        body.push_str("💡 Study these before watching the video!\n");

        fs::write(path, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let root = PathBuf::from(format!("/tmp/collobot-export-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn exports_numbered_lines_and_sidecar() {
        let root = temp_root("basic");
        let exporter = Exporter::new(root.join("cards"), &root);
        let user = UserKey::new(42, "Ann");

        let expressions = vec!["pick up".to_string(), "give up".to_string()];
        let filename = exporter.export(&user, "Grammar", &expressions).unwrap();
        assert_eq!(filename, "grammar_collocations_Ann_42.txt");

        let card = fs::read_to_string(root.join("cards").join(&filename)).unwrap();
        assert!(card.contains("My B2+ Grammar Collocations - Ann"));
        assert!(card.contains("Total selected: 2 expressions"));
        assert!(card.contains("1. pick up\n2. give up\n"));
        assert!(card.contains("Study these before watching the video!"));

        let sidecar = fs::read_to_string(root.join("selection_Ann_42.json")).unwrap();
        let record: serde_json::Value = serde_json::from_str(&sidecar).unwrap();
        assert_eq!(record["user_name"], "Ann");
        assert_eq!(record["user_id"], 42);
        assert_eq!(record["topic"], "Grammar");
        assert_eq!(
            record["selected_expressions"],
            serde_json::json!(["pick up", "give up"])
        );
        assert_eq!(record["filename"], filename);
        assert!(record["timestamp"].as_str().is_some());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn multi_word_topics_are_snake_cased_in_the_filename() {
        let root = temp_root("topic");
        let exporter = Exporter::new(root.join("cards"), &root);
        let user = UserKey::new(7, "Bo");

        let filename = exporter
            .export(&user, "South America Travel", &["hit the road".to_string()])
            .unwrap();
        assert_eq!(filename, "south_america_travel_collocations_Bo_7.txt");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_selection_writes_nothing() {
        let root = temp_root("empty");
        let cards = root.join("cards");
        let exporter = Exporter::new(&cards, &root);
        let user = UserKey::new(42, "Ann");

        let err = exporter.export(&user, "Grammar", &[]).unwrap_err();
        assert!(matches!(err, Error::EmptySelection));
        assert!(!cards.exists());
        assert!(!root.join("selection_Ann_42.json").exists());

        let _ = fs::remove_dir_all(&root);
    }
}
