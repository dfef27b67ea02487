//! Fetches the latest ROR data dump from Zenodo.
//!
//! ROR publishes every dump as a new version of one Zenodo record. The latest
//! version lists a zip archive holding the JSON dump; the archive is fetched
//! into memory and its JSON entry unpacked to the configured location.

use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{RegistryError, RegistryResult};

#[derive(Debug, Deserialize)]
struct ZenodoRecord {
    #[serde(default)]
    files: Vec<ZenodoFile>,
}

#[derive(Debug, Deserialize)]
struct ZenodoFile {
    key: String,
    links: FileLinks,
}

#[derive(Debug, Deserialize)]
struct FileLinks {
    #[serde(rename = "self")]
    download: String,
}

/// Where and how to download the dump.
pub struct DumpSource {
    record_url: String,
    agent: ureq::Agent,
}

impl DumpSource {
    pub fn new(record_url: &str, user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            record_url: record_url.to_string(),
            agent,
        }
    }

    /// Download the latest dump and unpack its JSON file to `dest`.
    pub fn fetch(&self, dest: &Path) -> RegistryResult<()> {
        let record: ZenodoRecord = self
            .agent
            .get(&self.record_url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| self.download_error(&self.record_url, e))?
            .into_json::<ZenodoRecord>()
            .map_err(|e| self.download_error(&self.record_url, e))?;

        let archive = latest_archive(&record).ok_or_else(|| RegistryError::Download {
            url: self.record_url.clone(),
            message: "record lists no zip archive".into(),
        })?;
        tracing::info!(file = %archive.key, "downloading ROR dump");

        let url = &archive.links.download;
        let mut bytes = Vec::new();
        self.agent
            .get(url)
            .call()
            .map_err(|e| self.download_error(url, e))?
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| self.download_error(url, e))?;

        let entry = unpack_dump(Cursor::new(bytes), dest)?;
        tracing::info!(entry = %entry, path = %dest.display(), "unpacked ROR dump");
        Ok(())
    }

    fn download_error(&self, url: &str, e: impl std::fmt::Display) -> RegistryError {
        RegistryError::Download {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

fn latest_archive(record: &ZenodoRecord) -> Option<&ZenodoFile> {
    record.files.iter().find(|f| f.key.ends_with(".zip"))
}

/// Unpack the JSON dump from a ROR zip archive to `dest`, returning the entry
/// name. The v2-schema file is preferred when the archive carries both.
pub fn unpack_dump<R: Read + Seek>(reader: R, dest: &Path) -> RegistryResult<String> {
    let mut archive = zip::ZipArchive::new(reader).map_err(archive_error)?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let entry = names
        .iter()
        .find(|n| n.ends_with("_schema_v2.json"))
        .or_else(|| names.iter().find(|n| n.ends_with(".json")))
        .cloned()
        .ok_or_else(|| RegistryError::Archive {
            message: "no JSON file in archive".into(),
        })?;

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    let mut tmp_name = dest.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = dest.with_file_name(tmp_name);

    {
        let mut file = archive.by_name(&entry).map_err(archive_error)?;
        let mut out = std::fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
        std::io::copy(&mut file, &mut out).map_err(|e| io_error(&tmp, e))?;
    }
    std::fs::rename(&tmp, dest).map_err(|e| io_error(dest, e))?;
    Ok(entry)
}

fn archive_error(e: zip::result::ZipError) -> RegistryError {
    RegistryError::Archive {
        message: e.to_string(),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.display().to_string(),
        source,
    }
}
