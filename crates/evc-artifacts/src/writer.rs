use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes named files under one artifacts root. Existing files are
/// overwritten; parent directories are created on demand.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory `extra_path` below the root, created if missing.
    pub fn dir(&self, extra_path: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = self.root.join(extra_path);
        fs::create_dir_all(&dir)
            .with_context(|| format!("create artifacts dir failed: {}", dir.display()))?;
        Ok(dir)
    }

    /// Write `data` to `<root>/<extra_path>/<name>` and return that path.
    pub fn write(&self, name: &str, data: &[u8], extra_path: impl AsRef<Path>) -> Result<PathBuf> {
        self.write_chunks(name, std::iter::once(data), extra_path)
    }

    /// Like [`ArtifactWriter::write`] for data that arrives in chunks, such
    /// as a streamed archive.
    pub fn write_chunks<I, B>(&self, name: &str, chunks: I, extra_path: impl AsRef<Path>) -> Result<PathBuf>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let path = self.dir(extra_path)?.join(name);
        let mut file =
            File::create(&path).with_context(|| format!("create artifact failed: {}", path.display()))?;
        for chunk in chunks {
            file.write_all(chunk.as_ref())
                .with_context(|| format!("write artifact failed: {}", path.display()))?;
        }
        file.flush()
            .with_context(|| format!("flush artifact failed: {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_nested_dirs_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let w = ArtifactWriter::new(dir.path().join("v1"));

        let p = w.write("agent.log", b"started\n", "TestApp").unwrap();
        assert_eq!(p, dir.path().join("v1/TestApp/agent.log"));
        assert_eq!(fs::read(&p).unwrap(), b"started\n");
    }

    #[test]
    fn write_with_empty_extra_path_lands_in_root() {
        let dir = tempfile::tempdir().unwrap();
        let w = ArtifactWriter::new(dir.path());

        let p = w.write("a.log", b"x", "").unwrap();
        assert_eq!(p, dir.path().join("a.log"));
    }

    #[test]
    fn chunks_are_concatenated_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let w = ArtifactWriter::new(dir.path());

        w.write("t.tar", b"old contents", "").unwrap();
        let p = w
            .write_chunks("t.tar", vec![b"ab".to_vec(), b"cd".to_vec()], "")
            .unwrap();
        assert_eq!(fs::read(p).unwrap(), b"abcd");
    }
}
