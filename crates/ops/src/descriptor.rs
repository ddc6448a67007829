//! Static filegroup descriptors written next to imported artifacts

use apkfetch_errors::Error;
use apkfetch_store::write_atomic;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sources {
    Glob(Vec<&'static str>),
    Files(Vec<String>),
}

/// A named `filegroup` over files below the repository directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    name: &'static str,
    file_name: String,
    sources: Sources,
}

impl BuildDescriptor {
    /// `all`: every archive and package
    #[must_use]
    pub fn packages() -> Self {
        Self {
            name: "all",
            file_name: "packages.BUILD.bazel".to_string(),
            sources: Sources::Glob(vec!["**/*.tar.gz", "**/*.apk"]),
        }
    }

    /// `indexes`: every fetched `APKINDEX` archive
    #[must_use]
    pub fn indexes() -> Self {
        Self {
            name: "indexes",
            file_name: "indexes.BUILD.bazel".to_string(),
            sources: Sources::Glob(vec!["**/APKINDEX/*.tar.gz"]),
        }
    }

    /// `keyring`: exactly the fetched key file
    #[must_use]
    pub fn keyring(key_file: &str) -> Self {
        Self {
            name: "keyring",
            file_name: format!("{key_file}.BUILD.bazel"),
            sources: Sources::Files(vec![key_file.to_string()]),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    #[must_use]
    pub fn render(&self) -> String {
        let srcs = match &self.sources {
            Sources::Glob(patterns) => format!("glob({})", quoted_list(patterns)),
            Sources::Files(files) => quoted_list(files),
        };

        let mut out = String::new();
        let _ = writeln!(out, "filegroup(");
        let _ = writeln!(out, "    name = \"{}\",", self.name);
        let _ = writeln!(out, "    srcs = {srcs},");
        let _ = writeln!(out, "    visibility = [\"//visibility:public\"],");
        let _ = writeln!(out, ")");
        out
    }

    /// Write the descriptor into `dir`, returning its path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = dir.join(&self.file_name);
        write_atomic(&path, self.render().as_bytes()).await?;
        Ok(path)
    }
}

fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_packages() {
        assert_eq!(
            BuildDescriptor::packages().render(),
            "filegroup(\n    name = \"all\",\n    srcs = glob([\"**/*.tar.gz\", \"**/*.apk\"]),\n    visibility = [\"//visibility:public\"],\n)\n"
        );
    }

    #[test]
    fn test_render_indexes_and_keyring() {
        assert!(BuildDescriptor::indexes()
            .render()
            .contains("srcs = glob([\"**/APKINDEX/*.tar.gz\"]),"));

        let keyring = BuildDescriptor::keyring("wolfi-signing.rsa.pub");
        assert_eq!(keyring.name(), "keyring");
        assert!(keyring
            .render()
            .contains("srcs = [\"wolfi-signing.rsa.pub\"],"));
    }

    #[tokio::test]
    async fn test_write_to() {
        let temp = tempfile::tempdir().unwrap();
        let path = BuildDescriptor::indexes().write_to(temp.path()).await.unwrap();
        assert_eq!(path, temp.path().join("indexes.BUILD.bazel"));
        assert!(std::fs::read_to_string(path).unwrap().starts_with("filegroup("));
    }
}
