//! Assertions over resolved room sets

use crate::core_room::{ResolvedRoomSet, RoomSummary};
use std::collections::HashSet;

/// Assert that a listing is in directory order (name, then id)
pub fn assert_listing_order(rooms: &[RoomSummary]) {
    for pair in rooms.windows(2) {
        assert!(
            RoomSummary::listing_order(&pair[0], &pair[1]).is_lt(),
            "rooms out of order: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Assert that no room is both joined and joinable
pub fn assert_disjoint(set: &ResolvedRoomSet) {
    let joined: HashSet<_> = set.joined.iter().map(|r| &r.id).collect();
    for room in &set.joinable_public {
        assert!(
            !joined.contains(&room.id),
            "room {} listed as both joined and joinable",
            room.id
        );
    }
}

/// `(name, member_count)` pairs, for compact comparisons
pub fn names_and_counts(rooms: &[RoomSummary]) -> Vec<(&str, u64)> {
    rooms.iter().map(|r| (r.name.as_str(), r.member_count)).collect()
}
