//! Target captures come back from the container runtime as plain tar
//! streams holding the events file under its base name.

use anyhow::{Context, Result};
use evc_reconcile::{CandidateSource, CandidateStream};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Bytes of the first entry whose file name equals `member`, `None` if the
/// archive has no such entry.
pub fn read_member<R: Read>(reader: R, member: &str) -> io::Result<Option<Vec<u8>>> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let matches = entry
            .path()?
            .file_name()
            .map(|n| n == member)
            .unwrap_or(false);
        if matches {
            // The header size is not trusted: captures can be truncated.
            let mut out = Vec::new();
            entry.read_to_end(&mut out)?;
            return Ok(Some(out));
        }
    }
    Ok(None)
}

pub fn extract_member(archive: &Path, member: &str) -> Result<Vec<u8>> {
    let file =
        File::open(archive).with_context(|| format!("open archive failed: {}", archive.display()))?;
    read_member(BufReader::new(file), member)
        .with_context(|| format!("read archive failed: {}", archive.display()))?
        .with_context(|| format!("{member} not found in {}", archive.display()))
}

/// Build an uncompressed tar holding `entries` (name, contents) in order.
pub fn pack_tar(entries: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, *data)?;
    }
    builder.into_inner()
}

/// One tar member as a candidate stream. Every `open` re-reads the archive
/// from its start.
#[derive(Clone, Debug)]
pub struct ArchiveMemberSource {
    name: String,
    archive: PathBuf,
    member: String,
}

impl ArchiveMemberSource {
    pub fn new(name: impl Into<String>, archive: impl Into<PathBuf>, member: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archive: archive.into(),
            member: member.into(),
        }
    }
}

impl CandidateSource for ArchiveMemberSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> io::Result<CandidateStream> {
        let file = File::open(&self.archive)?;
        let bytes = read_member(BufReader::new(file), &self.member)?.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found in {}", self.member, self.archive.display()),
            )
        })?;
        Ok(CandidateStream::from_bytes(self.name.clone(), bytes))
    }
}
