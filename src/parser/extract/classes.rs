use crate::coerce::{to_bool, to_float, to_int};
use crate::parser::tree::Element;
use crate::tables::{ClassInstructorRow, ClassRoomOptionRow, ClassRow, ClassTimeOptionRow};

pub struct ClassRecord {
    pub class: ClassRow,
    pub instructors: Vec<ClassInstructorRow>,
    pub room_options: Vec<ClassRoomOptionRow>,
    pub time_options: Vec<ClassTimeOptionRow>,
}

pub fn extract(el: &Element) -> ClassRecord {
    let class_id = el.attr("id").map(str::to_string);
    let owned = |key: &str| el.attr(key).map(str::to_string);

    let class = ClassRow {
        class_id: class_id.clone(),
        offering_id: owned("offering"),
        config_id: owned("config"),
        subpart_id: owned("subpart"),
        committed: to_bool(el.attr("committed")),
        class_limit: to_int(el.attr("classLimit")),
        scheduler: to_int(el.attr("scheduler")),
        dates_mask: owned("dates"),
    };

    let instructors = el
        .children_named("instructor")
        .filter_map(Element::id)
        .map(|id| ClassInstructorRow {
            class_id: class_id.clone(),
            instructor_id: id.to_string(),
        })
        .collect();

    let room_options = el
        .children_named("room")
        .map(|r| ClassRoomOptionRow {
            class_id: class_id.clone(),
            room_id: r.attr("id").map(str::to_string),
            pref: to_float(r.attr("pref")),
        })
        .collect();

    let time_options = el
        .children_named("time")
        .map(|t| ClassTimeOptionRow {
            class_id: class_id.clone(),
            days_mask: t.attr("days").map(str::to_string),
            start_slot: to_int(t.attr("start")),
            length_slots: to_int(t.attr("length")),
            pref: to_float(t.attr("pref")),
        })
        .collect();

    ClassRecord {
        class,
        instructors,
        room_options,
        time_options,
    }
}
