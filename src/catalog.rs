// src/catalog.rs

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::models::structure::{Structure, SubjectTopics};

/// Subject display name -> folder under the source-material root.
pub const SUBJECT_MAPPING: [(&str, &str); 4] = [
    ("Quantitative Aptitude", "quantitative_aptitude"),
    (
        "Quantitative Aptitude (Additional)",
        "quantitative_aptitude_additional",
    ),
    ("Reasoning Ability", "reasoning_ability"),
    ("English Language", "english_language"),
];

/// Topic files are `<topic>.txt`.
pub const TOPIC_EXTENSION: &str = ".txt";

#[derive(Debug)]
pub enum CatalogError {
    RootMissing(PathBuf),
    Io(std::io::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::RootMissing(path) => {
                write!(f, "Base folder '{}' not found.", path.display())
            }
            CatalogError::Io(e) => write!(f, "failed to read source material: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

/// Read-only view of the `source_material/<subject>/<topic>.txt` tree.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Case-insensitive lookup of a subject's folder name.
    pub fn subject_folder(subject: &str) -> Option<&'static str> {
        SUBJECT_MAPPING
            .iter()
            .find(|(display, _)| display.to_lowercase() == subject.to_lowercase())
            .map(|(_, folder)| *folder)
    }

    /// Lists every mapped subject that has at least one topic file.
    pub async fn structure(&self) -> Result<Structure, CatalogError> {
        if !tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(CatalogError::RootMissing(self.root.clone()));
        }

        let mut structure = Structure::new();
        for (display, folder) in SUBJECT_MAPPING {
            let subject_path = self.root.join(folder);
            let is_dir = tokio::fs::metadata(&subject_path)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }

            let topics = list_topics(&subject_path).await?;
            if !topics.is_empty() {
                structure.insert(display.to_string(), SubjectTopics { topics });
            }
        }

        Ok(structure)
    }

    /// Full text of a topic's source file, or `None` when the subject is
    /// unknown, the topic name is unusable, or the file can't be read.
    pub async fn load_context(&self, subject: &str, topic: &str) -> Option<String> {
        let folder = Self::subject_folder(subject)?;
        if !is_safe_topic(topic) {
            tracing::debug!("Rejecting topic name {:?}", topic);
            return None;
        }

        let path = self
            .root
            .join(folder)
            .join(format!("{}{}", topic, TOPIC_EXTENSION));

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("No source material at {}: {}", path.display(), e);
                None
            }
        }
    }
}

async fn list_topics(subject_path: &Path) -> Result<Vec<String>, CatalogError> {
    let mut topics = Vec::new();
    let mut entries = tokio::fs::read_dir(subject_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name();
        if let Some(topic) = name
            .to_str()
            .and_then(|n| n.strip_suffix(TOPIC_EXTENSION))
            .filter(|t| !t.is_empty())
        {
            topics.push(topic.to_string());
        }
    }

    topics.sort();
    Ok(topics)
}

fn is_safe_topic(topic: &str) -> bool {
    !topic.is_empty() && !topic.contains(['/', '\\']) && !topic.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("exam_forge_catalog_{}", uuid::Uuid::new_v4()))
    }

    async fn seed(root: &Path) {
        let qa = root.join("quantitative_aptitude");
        tokio::fs::create_dir_all(&qa).await.unwrap();
        tokio::fs::write(qa.join("Percentage.txt"), "Percent means per hundred.")
            .await
            .unwrap();
        tokio::fs::write(qa.join("Averages.txt"), "Sum over count.")
            .await
            .unwrap();
        tokio::fs::write(qa.join("notes.md"), "ignored").await.unwrap();
        tokio::fs::create_dir_all(qa.join("Nested.txt")).await.unwrap();

        // Present but empty: omitted from the structure.
        tokio::fs::create_dir_all(root.join("english_language"))
            .await
            .unwrap();
        // Not in the mapping.
        tokio::fs::create_dir_all(root.join("general_awareness"))
            .await
            .unwrap();
        tokio::fs::write(root.join("general_awareness/Banking.txt"), "x")
            .await
            .unwrap();
    }

    #[test]
    fn subject_lookup_ignores_case() {
        assert_eq!(
            Catalog::subject_folder("reasoning ability"),
            Some("reasoning_ability")
        );
        assert_eq!(
            Catalog::subject_folder("QUANTITATIVE APTITUDE (ADDITIONAL)"),
            Some("quantitative_aptitude_additional")
        );
        assert_eq!(Catalog::subject_folder("History"), None);
    }

    #[tokio::test]
    async fn structure_lists_sorted_topic_files() {
        let root = temp_root();
        seed(&root).await;

        let structure = Catalog::new(&root).structure().await.unwrap();

        assert_eq!(structure.len(), 1);
        assert_eq!(
            structure["Quantitative Aptitude"].topics,
            vec!["Averages".to_string(), "Percentage".to_string()]
        );

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn missing_root_is_reported() {
        let root = temp_root();
        let err = Catalog::new(&root).structure().await.unwrap_err();
        assert!(matches!(err, CatalogError::RootMissing(_)));
    }

    #[tokio::test]
    async fn context_is_loaded_for_known_subject_and_topic() {
        let root = temp_root();
        seed(&root).await;
        let catalog = Catalog::new(&root);

        assert_eq!(
            catalog
                .load_context("quantitative aptitude", "Percentage")
                .await
                .as_deref(),
            Some("Percent means per hundred.")
        );
        assert!(catalog.load_context("Quantitative Aptitude", "Missing").await.is_none());
        assert!(catalog.load_context("Unknown Subject", "Percentage").await.is_none());
        assert!(catalog
            .load_context("Quantitative Aptitude", "../quantitative_aptitude/Percentage")
            .await
            .is_none());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
