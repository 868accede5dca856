//! Text and JSON rendering of the home view

use roomgate_core::core_room::{HomeView, RoomSummary};
use serde_json::{json, Value};
use std::fmt::Write;

const CREATE_ROOM: &str = "[Create Room]";

/// Which action a room card offers
#[derive(Clone, Copy)]
enum CardAction {
    Enter,
    Join,
}

impl CardAction {
    fn label(self) -> &'static str {
        match self {
            CardAction::Enter => "[Enter]",
            CardAction::Join => "[Join]",
        }
    }
}

pub fn render_home(view: &HomeView) -> String {
    let mut out = String::new();
    match view {
        HomeView::RedirectToLogin => {
            out.push_str("Not signed in. Redirecting to login.\n");
        }
        HomeView::Empty => {
            out.push_str("No Chat Rooms\n");
            out.push_str("Create a new chat room to get started.\n");
            let _ = writeln!(out, "  {}", CREATE_ROOM);
        }
        HomeView::Rooms(set) => {
            let sections = [
                ("Your Rooms", &set.joined, CardAction::Enter),
                ("Public Rooms", &set.joinable_public, CardAction::Join),
            ];
            let mut first = true;
            // A list with no rooms is left out entirely
            for (title, rooms, action) in sections.into_iter().filter(|(_, r, _)| !r.is_empty()) {
                if !first {
                    out.push('\n');
                }
                first = false;
                render_section(&mut out, title, rooms, action);
            }
        }
    }
    out
}

fn render_section(out: &mut String, title: &str, rooms: &[RoomSummary], action: CardAction) {
    let _ = writeln!(out, "{}  {}", title, CREATE_ROOM);
    for room in rooms {
        let _ = writeln!(
            out,
            "  {}  {}  {}  ({})",
            room.name,
            room.member_label(),
            action.label(),
            room.id
        );
    }
}

pub fn view_json(view: &HomeView) -> Value {
    match view {
        HomeView::RedirectToLogin => json!({ "state": "redirect_to_login" }),
        HomeView::Empty => json!({ "state": "empty" }),
        HomeView::Rooms(set) => json!({ "state": "rooms", "rooms": set }),
    }
}
