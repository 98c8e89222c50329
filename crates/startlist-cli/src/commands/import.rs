//! Import command for loading entry reception data into the local store.
//!
//! Input is JSON Lines on stdin, one entry class or participant entry per line.

use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use startlist_core::{EntryClass, ParticipantEntry};
use startlist_db::{Database, EntryClassRecord, ParticipantEntryRecord};

use crate::cli::ImportKind;

/// Imports records of `kind` from `reader`, returning how many were written.
pub fn run<R: BufRead>(reader: R, db: &mut Database, kind: ImportKind) -> Result<usize> {
    match kind {
        ImportKind::Classes => {
            let classes = parse_lines(reader, ImportClass::into_record)?;
            Ok(db.upsert_entry_classes(&classes)?)
        }
        ImportKind::Entries => {
            let entries = parse_lines(reader, ImportEntry::into_record)?;
            Ok(db.upsert_participant_entries(&entries)?)
        }
    }
}

fn parse_lines<R, T, U>(reader: R, convert: fn(T) -> Result<U>) -> Result<Vec<U>>
where
    R: BufRead,
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: T = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        let record = convert(parsed).with_context(|| format!("invalid record on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ImportClass {
    race_id: String,
    id: String,
    #[serde(default)]
    name: Option<String>,
}

impl ImportClass {
    fn into_record(self) -> Result<EntryClassRecord> {
        if self.race_id.trim().is_empty() {
            anyhow::bail!("missing race_id");
        }
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.id.clone());
        let class = EntryClass::new(&self.id, &name)?;
        Ok(EntryClassRecord {
            race_id: self.race_id,
            id: class.class_id.into(),
            name: class.name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ImportEntry {
    id: String,
    event_id: String,
    race_id: String,
    entry_class_id: String,
    participant_name: String,
    submitted_at: String,
}

impl ImportEntry {
    fn into_record(self) -> Result<ParticipantEntryRecord> {
        if self.event_id.trim().is_empty() {
            anyhow::bail!("missing event_id");
        }
        if self.race_id.trim().is_empty() {
            anyhow::bail!("missing race_id");
        }
        let submitted_at = DateTime::parse_from_rfc3339(self.submitted_at.trim())
            .with_context(|| format!("invalid submitted_at: {}", self.submitted_at))?
            .with_timezone(&Utc);
        let entry = ParticipantEntry::new(
            &self.id,
            &self.entry_class_id,
            &self.participant_name,
            submitted_at,
        )?;
        Ok(ParticipantEntryRecord {
            id: entry.entry_id().to_string(),
            event_id: self.event_id,
            race_id: self.race_id,
            entry_class_id: entry.entry_class_id().to_string(),
            participant_name: entry.participant_name().to_string(),
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn parse_classes_defaults_name_to_id() {
        let input = r#"{"race_id":"middle","id":"M21E"}
{"race_id":"middle","id":"W21E","name":"Women Elite"}"#;
        let classes = parse_lines(Cursor::new(input), ImportClass::into_record).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "M21E");
        assert_eq!(classes[1].name, "Women Elite");
    }

    #[test]
    fn parse_entries_normalizes_timestamps() {
        let input = r#"{"id":"e1","event_id":"cup","race_id":"middle","entry_class_id":"M21E","participant_name":"Ada","submitted_at":"2025-04-01T10:00:00+02:00"}"#;
        let entries = parse_lines(Cursor::new(input), ImportEntry::into_record).unwrap();
        assert_eq!(entries[0].submitted_at, "2025-04-01T08:00:00Z");
    }

    #[test]
    fn parse_entries_reports_line_of_invalid_record() {
        let input = r#"
{"id":"e1","event_id":"cup","race_id":"middle","entry_class_id":"M21E","participant_name":"Ada","submitted_at":"2025-04-01T10:00:00Z"}
{"id":"e2","event_id":"cup","race_id":"middle","entry_class_id":"M21E","participant_name":"","submitted_at":"2025-04-01T10:00:00Z"}"#;
        let err = parse_lines(Cursor::new(input), ImportEntry::into_record).unwrap_err();
        assert!(err.to_string().contains("invalid record on line 3"));
    }

    #[test]
    fn run_writes_entries_to_database() {
        let mut db = Database::open_in_memory().unwrap();
        let input = r#"{"id":"e1","event_id":"cup","race_id":"middle","entry_class_id":"M21E","participant_name":"Ada","submitted_at":"2025-04-01T10:00:00Z"}"#;

        let written = run(Cursor::new(input), &mut db, ImportKind::Entries).unwrap();
        assert_eq!(written, 1);
        assert_eq!(db.list_participant_entries("cup", "middle").unwrap().len(), 1);
    }
}
