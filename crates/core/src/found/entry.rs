//! Line format of the found-state log.
//!
//! ```text
//! H,<version>,<store uuid>
//! A,<item id>,<iso 8601 timestamp>
//! R,<item id>
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

use super::StoreError;
use crate::catalog::ItemId;

/// Format version written into new logs.
pub const LOG_VERSION: &str = "1";

/// One line of the found-state log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// First line of every log.
    Header { version: String, store_id: Uuid },
    /// Item marked found.
    Add {
        item_id: ItemId,
        found_at: DateTime<Utc>,
    },
    /// Item marked missing.
    Remove { item_id: ItemId },
}

impl LogEntry {
    /// Header for a brand new log.
    pub fn new_header() -> Self {
        Self::Header {
            version: LOG_VERSION.to_string(),
            store_id: Uuid::new_v4(),
        }
    }

    /// The item this entry refers to, `None` for the header.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Header { .. } => None,
            Self::Add { item_id, .. } | Self::Remove { item_id } => Some(*item_id),
        }
    }

    /// Parse a single log line. `line_no` is only used for error reporting.
    pub fn parse(line_no: usize, line: &str) -> Result<Self, StoreError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(',').collect();

        match fields.as_slice() {
            ["H", version, store_id] => {
                let store_id = Uuid::parse_str(store_id).map_err(|e| {
                    StoreError::corrupt(line_no, format!("invalid store id {:?}: {}", store_id, e))
                })?;
                Ok(Self::Header {
                    version: version.to_string(),
                    store_id,
                })
            }
            ["A", item_id, found_at] => {
                let found_at = parse_timestamp(found_at).map_err(|e| {
                    StoreError::corrupt(line_no, format!("invalid timestamp {:?}: {}", found_at, e))
                })?;
                Ok(Self::Add {
                    item_id: parse_item_id(line_no, item_id)?,
                    found_at,
                })
            }
            ["R", item_id] => Ok(Self::Remove {
                item_id: parse_item_id(line_no, item_id)?,
            }),
            _ => Err(StoreError::corrupt(
                line_no,
                format!("unrecognized entry {:?}", line),
            )),
        }
    }
}

/// RFC 3339, or an ISO 8601 date-time without offset (read as UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
}

fn parse_item_id(line_no: usize, raw: &str) -> Result<ItemId, StoreError> {
    raw.parse()
        .map_err(|_| StoreError::corrupt(line_no, format!("invalid item id {:?}", raw)))
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header { version, store_id } => write!(f, "H,{},{}", version, store_id),
            Self::Add { item_id, found_at } => write!(
                f,
                "A,{},{}",
                item_id,
                found_at.to_rfc3339_opts(SecondsFormat::Micros, true)
            ),
            Self::Remove { item_id } => write!(f, "R,{}", item_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let entry = LogEntry::parse(1, "H,1,67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        match entry {
            LogEntry::Header { version, store_id } => {
                assert_eq!(version, "1");
                assert_eq!(store_id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
            }
            other => panic!("expected header, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_and_remove() {
        let add = LogEntry::parse(2, "A,524,2024-03-01T18:22:05.123456Z").unwrap();
        assert_eq!(add.item_id(), Some(524));

        let remove = LogEntry::parse(3, "R,524\r").unwrap();
        assert_eq!(remove, LogEntry::Remove { item_id: 524 });
    }

    #[test]
    fn test_add_keeps_offset_timestamps() {
        let entry = LogEntry::parse(2, "A,7,2024-03-01T20:22:05+02:00").unwrap();
        let LogEntry::Add { found_at, .. } = entry else {
            panic!("expected add entry");
        };
        assert_eq!(found_at.to_rfc3339(), "2024-03-01T18:22:05+00:00");
    }

    #[test]
    fn test_add_accepts_timestamps_without_offset() {
        for (raw, expected) in [
            ("2024-03-01T18:22:05.123456", "2024-03-01T18:22:05.123456Z"),
            ("2024-03-01T18:22:05", "2024-03-01T18:22:05.000000Z"),
        ] {
            let entry = LogEntry::parse(2, &format!("A,5,{}", raw)).unwrap();
            assert_eq!(entry.to_string(), format!("A,5,{}", expected));
        }
    }

    #[test]
    fn test_display_matches_parse() {
        let header = LogEntry::new_header();
        assert_eq!(LogEntry::parse(1, &header.to_string()).unwrap(), header);

        let add = LogEntry::Add {
            item_id: 12,
            found_at: DateTime::parse_from_rfc3339("2024-03-01T18:22:05.5Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        assert_eq!(add.to_string(), "A,12,2024-03-01T18:22:05.500000Z");
        assert_eq!(LogEntry::Remove { item_id: 12 }.to_string(), "R,12");
    }

    #[test]
    fn test_rejects_malformed_lines() {
        for line in [
            "X,1",
            "A,1",
            "A,abc,2024-03-01T18:22:05Z",
            "A,1,yesterday",
            "R,-4",
            "R,1,extra",
            "H,1,not-a-uuid",
            "",
        ] {
            let result = LogEntry::parse(9, line);
            assert!(
                matches!(result, Err(StoreError::Corrupt { line: 9, .. })),
                "line {:?} parsed as {:?}",
                line,
                result
            );
        }
    }
}
