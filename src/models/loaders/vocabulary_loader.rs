use crate::error::{AppResult, ConfigError};
use crate::models::vocabulary::MarkerVocabulary;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    markers: Vec<String>,
}

/// 从 TOML 文件加载标记短语词表
///
/// 文件格式：
/// ```toml
/// markers = ["الإجابة الصحيحة", "الجواب الصحيح"]
/// ```
pub async fn load_vocabulary(path: &Path) -> AppResult<MarkerVocabulary> {
    let content = fs::read_to_string(path).await?;
    parse_vocabulary(&content).map_err(|reason| {
        ConfigError::VocabularyParseFailed {
            path: path.display().to_string(),
            reason,
        }
        .into()
    })
}

fn parse_vocabulary(content: &str) -> Result<MarkerVocabulary, String> {
    let file: VocabularyFile = toml::from_str(content).map_err(|e| e.to_string())?;
    let vocabulary = MarkerVocabulary::new(file.markers);
    if vocabulary.markers.is_empty() {
        return Err("词表为空".to_string());
    }
    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marker_list() {
        let vocab = parse_vocabulary("markers = [\"الجواب الصحيح\", \"Answer\"]").unwrap();
        assert_eq!(vocab.markers, vec!["الجوابالصحيح", "answer"]);
    }

    #[test]
    fn rejects_empty_or_malformed_files() {
        assert!(parse_vocabulary("markers = []").is_err());
        assert!(parse_vocabulary("markers = 3").is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        std::fs::write(&path, "nonsense").unwrap();

        let err = tokio_test::block_on(load_vocabulary(&path)).unwrap_err();
        assert!(err.to_string().contains("vocab.toml"));
    }
}
