use crate::document::Document;
use crate::normalize::normalize_str;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid articles directory: {0}")]
    InvalidArticlesDir(String),
    #[error("Path is outside the articles directory: {0}")]
    OutsideRoot(PathBuf),
}

/// Read a document file. The content goes through the normalizer, so any
/// readable file yields a document.
pub fn read_document(relative_path: &RelativePath, root: &Path) -> Result<Document, IoError> {
    read_document_at(&relative_path.to_path(root))
}

/// Read a document file by its full path
pub fn read_document_at(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(normalize_str(&content))
}

/// Write a document as pretty-printed JSON
pub fn write_document(
    relative_path: &RelativePath,
    root: &Path,
    document: &Document,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&absolute_path, document.to_json_pretty())?;
    Ok(())
}

/// Scan for `*.json` document files, returned relative to `root` and sorted.
pub fn scan_document_files(root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_articles_dir(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let relative = path
                .strip_prefix(root)
                .map_err(|_| IoError::OutsideRoot(path.clone()))?;
            RelativePathBuf::from_path(relative).map_err(|_| IoError::OutsideRoot(path.clone()))
        })
        .collect()
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "json"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_articles_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidArticlesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use crate::tests::{create_test_articles_dir, create_test_file};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_finds_nested_json_files_only() {
        let dir = create_test_articles_dir();
        create_test_file(&dir, "a.json", r#"{"blocks": []}"#);
        create_test_file(&dir, "notes.md", "# not a document");
        std::fs::create_dir(dir.path().join("2024")).unwrap();
        create_test_file(&dir, "2024/b.json", "{}");

        let files = scan_document_files(dir.path()).unwrap();

        assert_eq!(
            files,
            vec![RelativePathBuf::from("2024/b.json"), RelativePathBuf::from("a.json")]
        );
    }

    #[test]
    fn test_scan_invalid_directory() {
        let result = scan_document_files(Path::new("/this/path/does/not/exist"));
        assert!(matches!(result, Err(IoError::InvalidArticlesDir(_))));
    }

    #[test]
    fn test_read_document_normalizes_content() {
        let dir = create_test_articles_dir();
        create_test_file(
            &dir,
            "story.json",
            r#"{"blocks": [{"type": "paragraph", "data": {"text": "Hi"}}, {"type": "paragraph"}]}"#,
        );

        let document = read_document(RelativePath::new("story.json"), dir.path()).unwrap();

        assert_eq!(document.len(), 2);
        assert_eq!(document.blocks()[0], Block::paragraph("Hi"));
        assert!(document.blocks()[1].is_fallback());
    }

    #[test]
    fn test_read_malformed_file_yields_empty_document() {
        let dir = create_test_articles_dir();
        create_test_file(&dir, "broken.json", "{ not json");

        let document = read_document(RelativePath::new("broken.json"), dir.path()).unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_read_document_not_found() {
        let dir = create_test_articles_dir();
        let result = read_document(RelativePath::new("missing.json"), dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_document_creates_parent_directories() {
        let dir = create_test_articles_dir();
        let path = RelativePath::new("2024/06/story.json");
        let document = Document::new(vec![Block::header("Title", 2), Block::paragraph("Body")])
            .with_version("2.x");

        write_document(path, dir.path(), &document).unwrap();

        assert!(dir.path().join("2024").join("06").is_dir());
        assert_eq!(read_document(path, dir.path()).unwrap(), document);
    }
}
