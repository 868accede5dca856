//! Room summaries as returned by a room directory

use super::directory::DirectoryError;
use super::types::RoomId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A room's identity plus its live member count
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub member_count: u64,
}

impl RoomSummary {
    pub fn new(id: RoomId, name: impl Into<String>, member_count: u64) -> Self {
        Self {
            id,
            name: name.into(),
            member_count,
        }
    }

    /// Normalize a raw storage row.
    ///
    /// Rejects rows with an empty id or name and negative counts, so callers
    /// never see a summary that breaks the directory contract.
    pub fn from_row(id: String, name: String, member_count: i64) -> Result<Self, DirectoryError> {
        if id.is_empty() {
            return Err(DirectoryError::DataUnavailable(
                "room row has an empty id".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(DirectoryError::DataUnavailable(format!(
                "room {} has an empty name",
                id
            )));
        }
        let member_count = u64::try_from(member_count).map_err(|_| {
            DirectoryError::DataUnavailable(format!(
                "room {} has a negative member count ({})",
                id, member_count
            ))
        })?;

        Ok(Self {
            id: RoomId(id),
            name,
            member_count,
        })
    }

    /// "1 member" or "N members"
    pub fn member_label(&self) -> String {
        if self.member_count == 1 {
            "1 member".to_string()
        } else {
            format!("{} members", self.member_count)
        }
    }

    /// Directory listing order: name ascending, id breaks ties
    pub fn listing_order(a: &RoomSummary, b: &RoomSummary) -> Ordering {
        a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_accepts_valid_row() {
        let summary = RoomSummary::from_row("r1".into(), "General".into(), 3).unwrap();
        assert_eq!(summary.id, RoomId::new("r1"));
        assert_eq!(summary.member_count, 3);
    }

    #[test]
    fn test_from_row_rejects_malformed_rows() {
        assert!(RoomSummary::from_row(String::new(), "General".into(), 1).is_err());
        assert!(RoomSummary::from_row("r1".into(), String::new(), 1).is_err());
        assert!(matches!(
            RoomSummary::from_row("r1".into(), "General".into(), -1),
            Err(DirectoryError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_member_label() {
        assert_eq!(RoomSummary::new("a".into(), "A", 0).member_label(), "0 members");
        assert_eq!(RoomSummary::new("a".into(), "A", 1).member_label(), "1 member");
        assert_eq!(RoomSummary::new("a".into(), "A", 12).member_label(), "12 members");
    }

    #[test]
    fn test_listing_order_is_total() {
        let mut rooms = vec![
            RoomSummary::new("b".into(), "general", 1),
            RoomSummary::new("c".into(), "General", 1),
            RoomSummary::new("a".into(), "general", 1),
        ];
        rooms.sort_by(RoomSummary::listing_order);

        let ids: Vec<_> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
