use crate::coerce::{split_location, to_bool, to_int};
use crate::parser::tree::Element;
use crate::tables::{RoomRow, RoomSharingDepartmentRow, RoomSharingPatternRow};

pub struct RoomRecord {
    pub room: RoomRow,
    pub pattern: Option<RoomSharingPatternRow>,
    pub departments: Vec<RoomSharingDepartmentRow>,
}

/// Extract a room definition (an element already known to carry `capacity`).
pub fn extract(el: &Element) -> RoomRecord {
    let room_id = el.attr("id").map(str::to_string);
    let (location_x, location_y) = split_location(el.attr("location"));

    let room = RoomRow {
        room_id: room_id.clone(),
        capacity: to_int(el.attr("capacity")),
        location_x,
        location_y,
        has_constraints: to_bool(el.attr("constraint")),
    };

    let Some(sharing) = el.first_child("sharing") else {
        return RoomRecord {
            room,
            pattern: None,
            departments: Vec::new(),
        };
    };

    let pattern_el = sharing.first_child("pattern");
    let value_of = |name: &str| {
        sharing
            .first_child(name)
            .and_then(|c| c.attr("value"))
            .map(str::to_string)
    };
    let pattern = RoomSharingPatternRow {
        room_id: room_id.clone(),
        unit_slots: pattern_el.and_then(|p| to_int(p.attr("unit"))),
        free_for_all_char: value_of("freeForAll"),
        not_available_char: value_of("notAvailable"),
        pattern_text: pattern_el.map(|p| p.text.as_deref().unwrap_or("").trim().to_string()),
    };

    let departments = sharing
        .children_named("department")
        .map(|d| RoomSharingDepartmentRow {
            room_id: room_id.clone(),
            digit_char: d.attr("value").map(str::to_string),
            department_id: d.attr("id").map(str::to_string),
        })
        .collect();

    RoomRecord {
        room,
        pattern: Some(pattern),
        departments,
    }
}
