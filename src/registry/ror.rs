//! Registry backed by a local copy of the ROR data dump.
//!
//! ROR publishes its full data set as a JSON array of organization records.
//! Both the v2 schema (`names[]`, lowercase relationship types) and the v1
//! schema (`name`, capitalized types) are accepted.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RegistryError, RegistryResult};

use super::{DumpSource, Registry, RegistryRelation, ROR_NS};

const ROR_URL_PREFIX: &str = "https://ror.org/";

#[derive(Debug, Deserialize)]
struct Organization {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    names: Vec<OrganizationName>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

#[derive(Debug, Deserialize)]
struct OrganizationName {
    value: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

impl Organization {
    fn display_name(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.types.iter().any(|t| t == "ror_display"))
            .map(|n| n.value.as_str())
            .or(self.name.as_deref())
    }
}

/// Relation term for a ROR relationship type.
///
/// Unknown types are kept under the `ror` namespace so that the vocabulary
/// lookup reports them instead of silently dropping them.
fn relation_term(kind: &str) -> (&'static str, String) {
    match kind.to_ascii_lowercase().as_str() {
        "parent" => ("bfo", "0000050".into()),
        "child" => ("bfo", "0000051".into()),
        "predecessor" => ("bfo", "0000062".into()),
        "successor" => ("bfo", "0000063".into()),
        "related" => ("rdfs", "seeAlso".into()),
        other => (ROR_NS, other.to_string()),
    }
}

fn local_id(id: &str) -> &str {
    id.strip_prefix(ROR_URL_PREFIX).unwrap_or(id)
}

/// In-memory index over a ROR data dump.
#[derive(Debug, Default)]
pub struct RorDump {
    names: HashMap<String, String>,
    relations: Vec<RegistryRelation>,
}

impl RorDump {
    /// Load a dump from disk.
    pub fn open(path: &Path) -> RegistryResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let orgs: Vec<Organization> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| RegistryError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let dump = Self::from_organizations(orgs);
        tracing::info!(
            organizations = dump.names.len(),
            relations = dump.relations.len(),
            path = %path.display(),
            "loaded ROR dump"
        );
        Ok(dump)
    }

    /// Load a dump from disk, downloading the latest one to `path` first if
    /// it is not there yet.
    pub fn open_or_fetch(path: &Path, source: &DumpSource) -> RegistryResult<Self> {
        if !path.is_file() {
            tracing::info!(path = %path.display(), "no local ROR dump, fetching latest");
            source.fetch(path)?;
        }
        Self::open(path)
    }

    /// Parse a dump held in memory.
    pub fn from_json(json: &str) -> RegistryResult<Self> {
        let orgs: Vec<Organization> =
            serde_json::from_str(json).map_err(|e| RegistryError::Parse {
                path: "<memory>".into(),
                message: e.to_string(),
            })?;
        Ok(Self::from_organizations(orgs))
    }

    fn from_organizations(orgs: Vec<Organization>) -> Self {
        let mut dump = Self::default();
        for org in orgs {
            let id = local_id(&org.id).to_string();
            if let Some(name) = org.display_name() {
                dump.names.insert(id.clone(), name.to_string());
            }
            for rel in &org.relationships {
                let (relation_ns, relation_id) = relation_term(&rel.kind);
                dump.relations.push(RegistryRelation {
                    source_id: id.clone(),
                    relation_ns: relation_ns.to_string(),
                    relation_id,
                    target_ns: ROR_NS.to_string(),
                    target_id: local_id(&rel.id).to_string(),
                });
            }
        }
        dump
    }
}

impl Registry for RorDump {
    fn name(&self, id: &str) -> Option<String> {
        self.names.get(id).cloned()
    }

    fn relations(&self) -> RegistryResult<Vec<RegistryRelation>> {
        Ok(self.relations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V2_DUMP: &str = r#"[
      {
        "id": "https://ror.org/03nmefy27",
        "names": [
          {"value": "Google Ireland", "types": ["alias"], "lang": null},
          {"value": "Google (Ireland)", "types": ["ror_display", "label"], "lang": null}
        ],
        "relationships": [
          {"type": "parent", "id": "https://ror.org/00njsd438", "label": "Google (United States)"}
        ],
        "status": "active"
      },
      {
        "id": "https://ror.org/00njsd438",
        "names": [{"value": "Google (United States)", "types": ["ror_display"]}],
        "relationships": [
          {"type": "child", "id": "https://ror.org/03nmefy27", "label": "Google (Ireland)"},
          {"type": "related", "id": "https://ror.org/04xyz0000", "label": "Other"}
        ]
      }
    ]"#;

    #[test]
    fn reads_display_names() {
        let dump = RorDump::from_json(V2_DUMP).unwrap();
        assert_eq!(dump.name("03nmefy27").as_deref(), Some("Google (Ireland)"));
        assert_eq!(
            dump.name("00njsd438").as_deref(),
            Some("Google (United States)")
        );
        assert_eq!(dump.name("04xyz0000"), None);
    }

    #[test]
    fn maps_relationship_types_to_terms() {
        let dump = RorDump::from_json(V2_DUMP).unwrap();
        let relations = dump.relations().unwrap();
        assert_eq!(relations.len(), 3);
        assert_eq!(
            relations[0],
            RegistryRelation {
                source_id: "03nmefy27".into(),
                relation_ns: "bfo".into(),
                relation_id: "0000050".into(),
                target_ns: "ror".into(),
                target_id: "00njsd438".into(),
            }
        );
        assert_eq!(relations[1].relation_id, "0000051");
        assert_eq!(
            (relations[2].relation_ns.as_str(), relations[2].relation_id.as_str()),
            ("rdfs", "seeAlso")
        );
        assert!(relations.iter().all(RegistryRelation::targets_registry));
    }

    #[test]
    fn accepts_v1_schema() {
        let dump = RorDump::from_json(
            r#"[{"id": "https://ror.org/02mhbdp94", "name": "Universidad de los Andes",
                 "relationships": [{"type": "Successor", "id": "https://ror.org/01aaaaa00", "label": "X"}]}]"#,
        )
        .unwrap();
        assert_eq!(
            dump.name("02mhbdp94").as_deref(),
            Some("Universidad de los Andes")
        );
        assert_eq!(dump.relations().unwrap()[0].relation_id, "0000063");
    }

    #[test]
    fn unknown_relationship_type_is_kept() {
        let dump = RorDump::from_json(
            r#"[{"id": "https://ror.org/02mhbdp94", "name": "A",
                 "relationships": [{"type": "Sibling", "id": "https://ror.org/01aaaaa00"}]}]"#,
        )
        .unwrap();
        let rel = &dump.relations().unwrap()[0];
        assert_eq!((rel.relation_ns.as_str(), rel.relation_id.as_str()), ("ror", "sibling"));
    }

    #[test]
    fn existing_dump_is_not_refetched() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ror-data.json");
        std::fs::write(&path, V2_DUMP).unwrap();
        // Unroutable source: any download attempt would fail.
        let source = DumpSource::new(
            "http://127.0.0.1:9/records/latest",
            "test",
            std::time::Duration::from_millis(200),
        );

        let dump = RorDump::open_or_fetch(&path, &source).unwrap();
        assert_eq!(dump.name("03nmefy27").as_deref(), Some("Google (Ireland)"));
    }

    #[test]
    fn failed_fetch_is_a_download_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ror-data.json");
        let source = DumpSource::new(
            "http://127.0.0.1:9/records/latest",
            "test",
            std::time::Duration::from_millis(200),
        );

        let err = RorDump::open_or_fetch(&path, &source).unwrap_err();
        assert!(matches!(err, RegistryError::Download { .. }), "{err:?}");
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RorDump::open(Path::new("/nonexistent/ror.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}
