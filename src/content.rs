//! # Content Manifest
//!
//! Before gameplay starts the client tells the server which content files it
//! loaded and their checksums. The server answers with its own list when the
//! two disagree; the client shows the difference to the user and keeps going.
//!
//! ## Wire Format (`GamePreInit` body)
//! ```text
//! [Count(u32)] { [Name(str)] [Checksum(u32)] } * Count
//! ```

use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::core::codec::{WireReader, WireWriter};
use crate::core::packet::{Guid, Packet};
use crate::error::{constants, Result, SyncError};
use crate::protocol::kinds::GAME_PREINIT;

/// One content file in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file: String,
    pub checksum: u32,
}

/// Checksum lookup for content files.
pub trait ChecksumService {
    /// Checksum of a content file, `FileNotFound` if it is absent.
    fn checksum(&self, file: &str) -> Result<u32>;
}

/// Finds content files in a list of data directories and hashes their bytes.
///
/// The checksum is the first four bytes of the SHA-256 digest, big-endian.
#[derive(Debug, Clone, Default)]
pub struct DataDirectories {
    dirs: Vec<PathBuf>,
}

impl DataDirectories {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// First directory holding `file`
    pub fn locate(&self, file: &str) -> Option<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(file))
            .find(|path| path.is_file())
    }
}

/// Content checksum of raw file bytes
pub fn checksum_bytes(data: &[u8]) -> u32 {
    let digest = Sha256::digest(data);
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

impl ChecksumService for DataDirectories {
    fn checksum(&self, file: &str) -> Result<u32> {
        let path = self
            .locate(file)
            .ok_or_else(|| SyncError::FileNotFound(PathBuf::from(file)))?;
        let data = fs::read(&path)?;
        Ok(checksum_bytes(&data))
    }
}

/// Ordered list of loaded content files with checksums.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentManifest {
    entries: Vec<ManifestEntry>,
}

impl ContentManifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Checksum every file in load order. Stops at the first missing file.
    #[instrument(skip(files, checksums), fields(files = files.len()))]
    pub fn build<S: AsRef<str>>(files: &[S], checksums: &dyn ChecksumService) -> Result<Self> {
        let mut entries = Vec::with_capacity(files.len());
        for (idx, file) in files.iter().enumerate() {
            let file = file.as_ref();
            let checksum = checksums.checksum(file)?;
            debug!(idx, file, checksum, "Content file");
            entries.push(ManifestEntry {
                file: file.to_string(),
                checksum,
            });
        }
        info!(count = entries.len(), "Content manifest built");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encode(&self, originator: Guid) -> Packet {
        let mut w = WireWriter::new();
        w.write_count(self.entries.len());
        for entry in &self.entries {
            w.write_string(&entry.file);
            w.write_u32(entry.checksum);
        }
        Packet::new(GAME_PREINIT, originator, w.finish())
    }

    pub fn decode(body: Bytes) -> Result<Self> {
        let mut r = WireReader::new(body);
        let count = r.read_count(4 + 4)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(ManifestEntry {
                file: r.read_string()?,
                checksum: r.read_u32()?,
            });
        }
        Ok(Self { entries })
    }

    /// Two-column listing of our files against the server's.
    pub fn render_diff(&self, expected: &ContentManifest) -> String {
        let mut out = format!("{}\n", constants::ERR_PLUGIN_MISMATCH);
        for (i, theirs) in expected.entries.iter().enumerate() {
            if let Some(ours) = self.entries.get(i) {
                out.push_str(&format!("{} {}", ours.file, ours.checksum));
            }
            out.push_str(&format!("\t{} {}\n", theirs.file, theirs.checksum));
        }
        out
    }

    /// Handle the server's answer to our manifest. An empty answer means the
    /// content matches; otherwise the rendered difference is returned.
    pub fn check_response(&self, packet: &Packet) -> Result<Option<String>> {
        let expected = Self::decode(packet.body.clone())?;
        if expected.is_empty() {
            debug!("Server accepted content manifest");
            return Ok(None);
        }
        let diff = self.render_diff(&expected);
        warn!(files = expected.len(), "Content files differ from server");
        Ok(Some(diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    struct Fixed(HashMap<&'static str, u32>);

    impl ChecksumService for Fixed {
        fn checksum(&self, file: &str) -> Result<u32> {
            self.0
                .get(file)
                .copied()
                .ok_or_else(|| SyncError::FileNotFound(PathBuf::from(file)))
        }
    }

    #[test]
    fn build_keeps_load_order() {
        let service = Fixed(HashMap::from([("Morrowind.esm", 0x7B6AF5B9), ("Tribunal.esm", 1)]));
        let manifest = ContentManifest::build(&["Tribunal.esm", "Morrowind.esm"], &service).unwrap();
        assert_eq!(manifest.entries()[0].file, "Tribunal.esm");
        assert_eq!(manifest.entries()[1].checksum, 0x7B6AF5B9);
    }

    #[test]
    fn missing_file_aborts_build() {
        let service = Fixed(HashMap::from([("Morrowind.esm", 1)]));
        let err = ContentManifest::build(&["Morrowind.esm", "Bloodmoon.esm"], &service).unwrap_err();
        assert!(matches!(err, SyncError::FileNotFound(p) if p == Path::new("Bloodmoon.esm")));
    }

    #[test]
    fn diff_lists_both_sides() {
        let ours = ContentManifest::new(vec![ManifestEntry {
            file: "Morrowind.esm".into(),
            checksum: 1,
        }]);
        let theirs = ContentManifest::new(vec![
            ManifestEntry {
                file: "Morrowind.esm".into(),
                checksum: 2,
            },
            ManifestEntry {
                file: "Tribunal.esm".into(),
                checksum: 3,
            },
        ]);
        let diff = ours.render_diff(&theirs);
        assert_eq!(
            diff,
            "Your plugins\tShould be\nMorrowind.esm 1\tMorrowind.esm 2\n\tTribunal.esm 3\n"
        );
    }

    #[test]
    fn data_directories_hash_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Morrowind.esm"), b"TES3").unwrap();

        let service = DataDirectories::new([dir.path()]);
        assert_eq!(service.checksum("Morrowind.esm").unwrap(), checksum_bytes(b"TES3"));
        assert!(matches!(
            service.checksum("Tribunal.esm"),
            Err(SyncError::FileNotFound(_))
        ));
    }

    #[test]
    fn empty_response_means_match() {
        let ours = ContentManifest::default();
        let reply = ContentManifest::default().encode(Guid(1));
        assert_eq!(ours.check_response(&reply).unwrap(), None);
    }
}
