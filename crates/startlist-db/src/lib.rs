//! Storage layer for start lists.
//!
//! Provides persistence for start list drafts and the entry reception read
//! models (entry classes, participant entries) using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Concurrent writers for the same race are serialized by `SQLite` itself: a
//! draft is always written inside one transaction.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format (e.g., `2025-05-17T10:00:00Z`),
//! always UTC. Fractional seconds are written only when present, so the text
//! is not sortable; order by parsed value.
//!
//! ## Derived Columns
//!
//! `start_list_slots.start_at` is written for downstream readers. It is not read
//! back: start instants are recomputed from the stored settings on load.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use startlist_core::{
    EntryClass, EntryClassLookup, EventId, LaneAssignment, ParticipantEntry,
    ParticipantEntryLookup, ParticipantSlot, PortError, RaceId, ScheduleSettings,
    StartListDraft, StartListError, StartListRepository, StartListStatus, ValidationError,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {row}: {timestamp}")]
    TimestampParse {
        row: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row does not form a valid start list.
    #[error("invalid stored start list for event {event_id}, race {race_id}")]
    InvalidStartList {
        event_id: String,
        race_id: String,
        #[source]
        source: StartListError,
    },
    /// A stored entry row is invalid.
    #[error("invalid stored entry {id}")]
    InvalidEntry {
        id: String,
        #[source]
        source: ValidationError,
    },
    /// A sequence number does not fit an SQLite integer.
    #[error("sequence {0} is too large to store")]
    SequenceOverflow(u64),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// An entry class row ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryClassRecord {
    pub race_id: String,
    pub id: String,
    pub name: String,
}

/// A participant entry row ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntryRecord {
    pub id: String,
    pub event_id: String,
    pub race_id: String,
    pub entry_class_id: String,
    pub participant_name: String,
    pub submitted_at: String,
}

/// One row of the start list overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartListSummary {
    pub event_id: String,
    pub race_id: String,
    pub lane_count: i64,
    pub lanes_assigned: i64,
    pub slots: i64,
    pub status: String,
    pub updated_at: String,
}

#[derive(Debug)]
struct StartListRow {
    start_at: String,
    interval_seconds: i64,
    lane_count: i64,
    status: String,
}

#[derive(Debug)]
struct SlotRow {
    sequence: i64,
    lane_number: i64,
    participant_entry_id: String,
    participant_name: String,
    entry_class_id: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            -- Read models owned by entry reception
            CREATE TABLE IF NOT EXISTS entry_classes (
                race_id TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                PRIMARY KEY (race_id, id)
            );

            -- Entry ids are unique within a race only
            CREATE TABLE IF NOT EXISTS participant_entries (
                event_id TEXT NOT NULL,
                race_id TEXT NOT NULL,
                id TEXT NOT NULL,
                entry_class_id TEXT NOT NULL,
                participant_name TEXT NOT NULL,
                submitted_at TEXT NOT NULL,
                PRIMARY KEY (event_id, race_id, id)
            );

            -- One start list per (event, race)
            -- status: 'DRAFT' or 'PUBLISHED'
            CREATE TABLE IF NOT EXISTS start_lists (
                event_id TEXT NOT NULL,
                race_id TEXT NOT NULL,
                start_at TEXT NOT NULL,
                interval_seconds INTEGER NOT NULL,
                lane_count INTEGER NOT NULL,
                status TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (event_id, race_id)
            );

            CREATE TABLE IF NOT EXISTS start_list_lanes (
                event_id TEXT NOT NULL,
                race_id TEXT NOT NULL,
                lane_number INTEGER NOT NULL,
                entry_class_id TEXT NOT NULL,
                PRIMARY KEY (event_id, race_id, lane_number),
                UNIQUE (event_id, race_id, entry_class_id),
                FOREIGN KEY (event_id, race_id)
                    REFERENCES start_lists(event_id, race_id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS start_list_slots (
                event_id TEXT NOT NULL,
                race_id TEXT NOT NULL,
                sequence INTEGER NOT NULL,
                lane_number INTEGER NOT NULL,
                participant_entry_id TEXT NOT NULL,
                participant_name TEXT NOT NULL,
                entry_class_id TEXT NOT NULL,
                start_at TEXT NOT NULL,
                PRIMARY KEY (event_id, race_id, sequence),
                FOREIGN KEY (event_id, race_id)
                    REFERENCES start_lists(event_id, race_id) ON DELETE CASCADE
            );
            ",
        )?;
        Ok(())
    }

    /// Inserts or renames entry classes.
    pub fn upsert_entry_classes(&mut self, classes: &[EntryClassRecord]) -> Result<usize, DbError> {
        if classes.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO entry_classes (race_id, id, name)
                VALUES (?, ?, ?)
                ON CONFLICT(race_id, id) DO UPDATE SET name = excluded.name
                ",
            )?;
            for class in classes {
                written += stmt.execute(params![class.race_id, class.id, class.name])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Inserts participant entries, replacing rows with the same ID in the same race.
    pub fn upsert_participant_entries(
        &mut self,
        entries: &[ParticipantEntryRecord],
    ) -> Result<usize, DbError> {
        if entries.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO participant_entries
                (event_id, race_id, id, entry_class_id, participant_name, submitted_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(event_id, race_id, id) DO UPDATE SET
                    entry_class_id = excluded.entry_class_id,
                    participant_name = excluded.participant_name,
                    submitted_at = excluded.submitted_at
                ",
            )?;
            for entry in entries {
                written += stmt.execute(params![
                    entry.event_id,
                    entry.race_id,
                    entry.id,
                    entry.entry_class_id,
                    entry.participant_name,
                    entry.submitted_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Lists entry classes of a race ordered by ID.
    pub fn list_entry_classes(&self, race_id: &str) -> Result<Vec<EntryClass>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM entry_classes WHERE race_id = ? ORDER BY id ASC")?;
        let rows = stmt.query_map([race_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut classes = Vec::new();
        for row in rows {
            let (id, name) = row?;
            let class = EntryClass::new(&id, &name)
                .map_err(|source| DbError::InvalidEntry { id, source })?;
            classes.push(class);
        }
        Ok(classes)
    }

    /// Lists participant entries of a race ordered by ID.
    pub fn list_participant_entries(
        &self,
        event_id: &str,
        race_id: &str,
    ) -> Result<Vec<ParticipantEntry>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, entry_class_id, participant_name, submitted_at
            FROM participant_entries
            WHERE event_id = ? AND race_id = ?
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([event_id, race_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        let mut entries = Vec::new();
        for row in rows {
            let (id, class_id, name, submitted_at) = row?;
            let submitted_at = parse_timestamp(&submitted_at, &id)?;
            let entry = ParticipantEntry::new(&id, &class_id, &name, submitted_at)
                .map_err(|source| DbError::InvalidEntry { id, source })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Writes a draft, replacing its lanes and slots.
    pub fn save_start_list(&self, draft: &StartListDraft) -> Result<(), DbError> {
        self.save_start_list_at(draft, Utc::now())
    }

    fn save_start_list_at(&self, draft: &StartListDraft, now: DateTime<Utc>) -> Result<(), DbError> {
        let event_id = draft.event_id().as_str();
        let race_id = draft.race_id().as_str();
        let settings = draft.settings();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "
            INSERT INTO start_lists
            (event_id, race_id, start_at, interval_seconds, lane_count, status, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(event_id, race_id) DO UPDATE SET
                start_at = excluded.start_at,
                interval_seconds = excluded.interval_seconds,
                lane_count = excluded.lane_count,
                status = excluded.status,
                updated_at = excluded.updated_at
            ",
            params![
                event_id,
                race_id,
                format_timestamp(settings.start_instant()),
                settings.interval_seconds(),
                settings.lane_count(),
                draft.status().as_str(),
                format_timestamp(now),
            ],
        )?;
        tx.execute(
            "DELETE FROM start_list_lanes WHERE event_id = ? AND race_id = ?",
            [event_id, race_id],
        )?;
        tx.execute(
            "DELETE FROM start_list_slots WHERE event_id = ? AND race_id = ?",
            [event_id, race_id],
        )?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO start_list_lanes (event_id, race_id, lane_number, entry_class_id)
                VALUES (?, ?, ?, ?)
                ",
            )?;
            for assignment in draft.lane_assignments() {
                stmt.execute(params![
                    event_id,
                    race_id,
                    assignment.lane_number(),
                    assignment.entry_class_id().as_str(),
                ])?;
            }
        }
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO start_list_slots
                (event_id, race_id, sequence, lane_number, participant_entry_id,
                 participant_name, entry_class_id, start_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for slot in draft.participant_slots() {
                let sequence = i64::try_from(slot.sequence())
                    .map_err(|_| DbError::SequenceOverflow(slot.sequence()))?;
                stmt.execute(params![
                    event_id,
                    race_id,
                    sequence,
                    slot.lane_number(),
                    slot.participant_entry_id().as_str(),
                    slot.participant_name(),
                    slot.entry_class_id().as_str(),
                    format_timestamp(slot.start_instant()),
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!(
            event_id,
            race_id,
            status = %draft.status(),
            lanes = draft.lane_assignments().len(),
            slots = draft.participant_slots().len(),
            "saved start list"
        );
        Ok(())
    }

    /// Loads a draft, or `None` when the race has no start list.
    pub fn load_start_list(
        &self,
        event_id: &str,
        race_id: &str,
    ) -> Result<Option<StartListDraft>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT start_at, interval_seconds, lane_count, status
                FROM start_lists
                WHERE event_id = ? AND race_id = ?
                ",
                [event_id, race_id],
                |row| {
                    Ok(StartListRow {
                        start_at: row.get(0)?,
                        interval_seconds: row.get(1)?,
                        lane_count: row.get(2)?,
                        status: row.get(3)?,
                    })
                },
            )
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let invalid = |source: StartListError| DbError::InvalidStartList {
            event_id: event_id.to_string(),
            race_id: race_id.to_string(),
            source,
        };
        let invalid_field = |source: ValidationError| invalid(source.into());

        let start_at = parse_timestamp(&row.start_at, &format!("start list {event_id}/{race_id}"))?;
        let settings = ScheduleSettings::configure(start_at, row.interval_seconds, row.lane_count)
            .map_err(invalid_field)?;
        let status: StartListStatus = row.status.parse().map_err(invalid_field)?;

        let mut lanes = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                "
                SELECT lane_number, entry_class_id
                FROM start_list_lanes
                WHERE event_id = ? AND race_id = ?
                ORDER BY lane_number ASC
                ",
            )?;
            let rows = stmt.query_map([event_id, race_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (lane_number, class_id) = row?;
                lanes.push(
                    LaneAssignment::assign(lane_number, &class_id, &settings)
                        .map_err(invalid_field)?,
                );
            }
        }

        let mut slots = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                "
                SELECT sequence, lane_number, participant_entry_id, participant_name, entry_class_id
                FROM start_list_slots
                WHERE event_id = ? AND race_id = ?
                ORDER BY sequence ASC
                ",
            )?;
            let rows = stmt.query_map([event_id, race_id], |row| {
                Ok(SlotRow {
                    sequence: row.get(0)?,
                    lane_number: row.get(1)?,
                    participant_entry_id: row.get(2)?,
                    participant_name: row.get(3)?,
                    entry_class_id: row.get(4)?,
                })
            })?;
            for row in rows {
                let row = row?;
                slots.push(
                    ParticipantSlot::schedule(
                        &row.participant_entry_id,
                        &row.participant_name,
                        &row.entry_class_id,
                        row.lane_number,
                        row.sequence,
                        &settings,
                    )
                    .map_err(invalid_field)?,
                );
            }
        }

        let event = EventId::new(event_id).map_err(invalid_field)?;
        let race = RaceId::new(race_id).map_err(invalid_field)?;
        let draft = StartListDraft::restore(
            event,
            race,
            settings,
            lanes,
            slots,
            status == StartListStatus::Published,
        )
        .map_err(invalid)?;
        Ok(Some(draft))
    }

    /// Lists every stored start list ordered by event then race.
    pub fn list_start_lists(&self) -> Result<Vec<StartListSummary>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT s.event_id, s.race_id, s.lane_count, s.status, s.updated_at,
                (SELECT COUNT(*) FROM start_list_lanes l
                    WHERE l.event_id = s.event_id AND l.race_id = s.race_id),
                (SELECT COUNT(*) FROM start_list_slots p
                    WHERE p.event_id = s.event_id AND p.race_id = s.race_id)
            FROM start_lists s
            ORDER BY s.event_id ASC, s.race_id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StartListSummary {
                event_id: row.get(0)?,
                race_id: row.get(1)?,
                lane_count: row.get(2)?,
                status: row.get(3)?,
                updated_at: row.get(4)?,
                lanes_assigned: row.get(5)?,
                slots: row.get(6)?,
            })
        })?;
        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Deletes a start list with its lanes and slots.
    pub fn delete_start_list(&self, event_id: &str, race_id: &str) -> Result<bool, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM start_lists WHERE event_id = ? AND race_id = ?",
            [event_id, race_id],
        )?;
        Ok(deleted > 0)
    }
}

impl StartListRepository for Database {
    fn save(&self, draft: &StartListDraft) -> Result<(), PortError> {
        Ok(self.save_start_list(draft)?)
    }

    fn find_by_event_and_race(
        &self,
        event_id: &EventId,
        race_id: &RaceId,
    ) -> Result<Option<StartListDraft>, PortError> {
        Ok(self.load_start_list(event_id.as_str(), race_id.as_str())?)
    }

    fn delete(&self, event_id: &EventId, race_id: &RaceId) -> Result<bool, PortError> {
        Ok(self.delete_start_list(event_id.as_str(), race_id.as_str())?)
    }
}

impl EntryClassLookup for Database {
    fn entry_classes(&self, race_id: &RaceId) -> Result<Vec<EntryClass>, PortError> {
        Ok(self.list_entry_classes(race_id.as_str())?)
    }
}

impl ParticipantEntryLookup for Database {
    fn participant_entries(
        &self,
        event_id: &EventId,
        race_id: &RaceId,
    ) -> Result<Vec<ParticipantEntry>, PortError> {
        Ok(self.list_participant_entries(event_id.as_str(), race_id.as_str())?)
    }
}

fn parse_timestamp(timestamp: &str, row: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            row: row.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
