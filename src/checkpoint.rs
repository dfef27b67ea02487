//! Tab-separated checkpoint tables and the load-or-compute stage combinator.
//!
//! Every table starts with a header row naming its columns. Headers are
//! validated on load, so a checkpoint written by one stage can never be
//! mistaken for another stage's table.

use std::path::{Path, PathBuf};

use crate::error::{CheckpointError, CheckpointResult, ReconcileResult};
use crate::relation::TableRow;

/// Load a checkpoint table.
pub fn read<T: TableRow>(path: &Path) -> CheckpointResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|e| parse_error(path, e))?;

    let headers = reader.headers().map_err(|e| parse_error(path, e))?;
    if !headers.iter().eq(T::COLUMNS.iter().copied()) {
        return Err(CheckpointError::Columns {
            path: path.display().to_string(),
            expected: T::COLUMNS.join(", "),
            found: headers.iter().collect::<Vec<_>>().join(", "),
        });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| parse_error(path, e))
}

/// Persist a checkpoint table.
///
/// The table is written to a temporary sibling first and renamed into place,
/// so `path` only ever holds a complete table.
pub fn write<T: TableRow>(path: &Path, rows: &[T]) -> CheckpointResult<()> {
    let tmp = tmp_path(path);
    {
        let file = std::fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(T::COLUMNS)
            .map_err(|e| parse_error(&tmp, e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| parse_error(&tmp, e))?;
        }
        writer.flush().map_err(|e| io_error(&tmp, e))?;
    }
    std::fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "wrote checkpoint");
    Ok(())
}

/// Run one idempotent pipeline stage.
///
/// If `path` exists its table is loaded verbatim and `compute` is never
/// called. Otherwise `compute` runs to completion, its output is persisted to
/// `path`, and returned. There is no invalidation: delete the file to force a
/// recompute.
pub fn stage<T, F>(name: &str, path: &Path, compute: F) -> ReconcileResult<Vec<T>>
where
    T: TableRow,
    F: FnOnce() -> ReconcileResult<Vec<T>>,
{
    if path.is_file() {
        tracing::info!(stage = name, path = %path.display(), "reading cache");
        return Ok(read(path)?);
    }

    tracing::info!(stage = name, "computing");
    let rows = compute()?;
    write(path, &rows)?;
    Ok(rows)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn parse_error(path: &Path, e: csv::Error) -> CheckpointError {
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => io_error(path, source),
        _ => CheckpointError::Parse {
            path: path.display().to_string(),
            message,
        },
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CheckpointError {
    CheckpointError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::relation::{CensusRecord, PredicateRecord, RelationRecord};

    fn relation(subject: &str, subject_label: Option<&str>) -> RelationRecord {
        RelationRecord {
            subject: subject.into(),
            subject_label: subject_label.map(Into::into),
            predicate: "P749".into(),
            predicate_label: Some("parent organization".into()),
            object: "00njsd438".into(),
            object_label: Some("Google (United States)".into()),
        }
    }

    #[test]
    fn writes_header_and_tab_separated_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("3.tsv");
        write(&path, &[relation("03nmefy27", Some("Google (Ireland)"))]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "subjectROR\tsubjectLabel\tpredicate\tpredicateLabel\tobjectROR\tobjectLabel\n\
             03nmefy27\tGoogle (Ireland)\tP749\tparent organization\t00njsd438\tGoogle (United States)\n"
        );
        assert!(!dir.path().join("3.tsv.tmp").exists());
    }

    #[test]
    fn empty_table_still_has_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("5.tsv");
        write::<RelationRecord>(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "subjectROR\tsubjectLabel\tpredicate\tpredicateLabel\tobjectROR\tobjectLabel\n"
        );
        assert!(read::<RelationRecord>(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_labels_are_empty_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("3.tsv");
        let rows = vec![relation("04abcde12", None)];
        write(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("04abcde12\t\tP749"));
        assert_eq!(read::<RelationRecord>(&path).unwrap(), rows);
    }

    #[test]
    fn rejects_table_with_wrong_columns() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("2-counts.tsv");
        write(
            &path,
            &[CensusRecord {
                predicate: "P361".into(),
                count: 4,
            }],
        )
        .unwrap();

        let err = read::<PredicateRecord>(&path).unwrap_err();
        assert!(matches!(err, CheckpointError::Columns { .. }), "{err:?}");
    }

    #[test]
    fn corrupt_count_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("1-counts.tsv");
        std::fs::write(&path, "predicate\tcount\nP361\tmany\n").unwrap();

        let err = read::<CensusRecord>(&path).unwrap_err();
        assert!(matches!(err, CheckpointError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn stage_loads_existing_checkpoint_without_computing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("1-counts.tsv");
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(vec![CensusRecord {
                predicate: "P361".into(),
                count: 120,
            }])
        };

        let first = stage("census", &path, compute).unwrap();
        let second = stage("census", &path, compute).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn failed_stage_leaves_no_checkpoint() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("1-counts.tsv");
        let result = stage::<CensusRecord, _>("census", &path, || {
            Err(crate::error::QueryError::Malformed {
                message: "boom".into(),
            }
            .into())
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
