//! Artifact plumbing for harness runs.
//!
//! - `writer`: named files under the run's artifacts directory
//! - `manifest`: run manifest + report files written after reconciliation
//! - `archive`: reading target captures out of tar streams
//! - `bundle`: the whole artifacts directory as one tar.gz

mod archive;
mod bundle;
mod manifest;
mod writer;

pub use archive::{extract_member, pack_tar, read_member, ArchiveMemberSource};
pub use bundle::bundle_tar_gz;
pub use manifest::{
    write_run_record, ArtifactList, ManifestCounts, RunManifest, RunRecordPaths,
    MANIFEST_SCHEMA_VERSION,
};
pub use writer::ArtifactWriter;
