use std::path::{Path, PathBuf};

use eyre::Result;
use serde::Serialize;

/// Trait for types that render one generated file
pub trait GeneratedFile {
    /// Path relative to the output directory, using `/` separators
    fn path(&self) -> String;

    /// Render the file content
    fn render(&self) -> String;

    /// How an existing file at the same path is handled
    fn overwrite(&self) -> Overwrite {
        Overwrite::Always
    }

    /// Render into an [`Artifact`]
    fn to_artifact(&self) -> Artifact {
        Artifact::new(self.path(), self.render()).with_overwrite(self.overwrite())
    }
}

/// A generated text artifact: a relative path and its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: String,
    pub content: String,
    #[serde(skip)]
    pub overwrite: Overwrite,
}

impl Artifact {
    /// Create a new artifact (default rule: always overwrite)
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite: Overwrite::Always,
        }
    }

    /// Override the overwrite rule
    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Full path of this artifact below `base`
    pub fn full_path(&self, base: &Path) -> PathBuf {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(base.to_path_buf(), |acc, part| acc.join(part))
    }

    /// Write the artifact below `base` according to its rule
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.full_path(base);

        match self.overwrite {
            Overwrite::Always => {
                write_file(&path, &self.content)?;
                Ok(WriteResult::Written)
            }
            Overwrite::IfMissing => {
                if path.exists() {
                    Ok(WriteResult::Skipped)
                } else {
                    write_file(&path, &self.content)?;
                    Ok(WriteResult::Written)
                }
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (generated code)
    #[default]
    Always,
    /// Only create if the file doesn't exist (user-edited files)
    IfMissing,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    struct Readme;

    impl GeneratedFile for Readme {
        fn path(&self) -> String {
            "docs/README.md".to_string()
        }

        fn render(&self) -> String {
            "# hello\n".to_string()
        }
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let artifact = Artifact::new("models/dto/UsersDto.java", "class UsersDto {}");

        artifact.write(temp.path()).unwrap();

        let path = temp.path().join("models").join("dto").join("UsersDto.java");
        assert_eq!(fs::read_to_string(path).unwrap(), "class UsersDto {}");
    }

    #[test]
    fn test_write_always_overwrites() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("schema.sql"), "original").unwrap();

        let result = Artifact::new("schema.sql", "updated")
            .write(temp.path())
            .unwrap();

        assert_eq!(result, WriteResult::Written);
        assert_eq!(
            fs::read_to_string(temp.path().join("schema.sql")).unwrap(),
            "updated"
        );
    }

    #[test]
    fn test_write_if_missing_skips_existing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tablegen.toml"), "original").unwrap();

        let result = Artifact::new("tablegen.toml", "should not write")
            .with_overwrite(Overwrite::IfMissing)
            .write(temp.path())
            .unwrap();

        assert_eq!(result, WriteResult::Skipped);
        assert_eq!(
            fs::read_to_string(temp.path().join("tablegen.toml")).unwrap(),
            "original"
        );
    }

    #[test]
    fn test_generated_file_to_artifact() {
        let artifact = Readme.to_artifact();
        assert_eq!(artifact.path, "docs/README.md");
        assert_eq!(artifact.content, "# hello\n");
        assert_eq!(artifact.overwrite, Overwrite::Always);
    }
}
