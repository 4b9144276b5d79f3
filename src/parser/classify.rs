use super::tree::Element;

/// What a closed element is, decided before any extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    RoomDefinition,
    /// Room option nested in a class.
    RoomReference,
    ClassDefinition,
    /// Class mentioned by a student or constraint.
    ClassReference,
    Constraint,
    Student,
    Other,
}

impl ElementKind {
    /// Kinds reported by a tally; `Other` is never visited.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::RoomDefinition,
        ElementKind::RoomReference,
        ElementKind::ClassDefinition,
        ElementKind::ClassReference,
        ElementKind::Constraint,
        ElementKind::Student,
    ];

    /// Definitions are consumed by their handler and cleared afterwards.
    /// References stay intact until the enclosing record reads them.
    pub fn is_definition(self) -> bool {
        matches!(
            self,
            ElementKind::RoomDefinition
                | ElementKind::ClassDefinition
                | ElementKind::Constraint
                | ElementKind::Student
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ElementKind::RoomDefinition => "room definitions",
            ElementKind::RoomReference => "room references",
            ElementKind::ClassDefinition => "class definitions",
            ElementKind::ClassReference => "class references",
            ElementKind::Constraint => "constraints",
            ElementKind::Student => "students",
            ElementKind::Other => "other",
        }
    }
}

/// Tags that open a record scope in the stream walker.
pub fn is_record_tag(name: &str) -> bool {
    matches!(name, "room" | "class" | "constraint" | "student")
}

pub fn classify(el: &Element) -> ElementKind {
    match el.name.as_str() {
        "room" if el.has_attr("capacity") => ElementKind::RoomDefinition,
        "room" => ElementKind::RoomReference,
        "class" if is_class_definition(el) => ElementKind::ClassDefinition,
        "class" => ElementKind::ClassReference,
        "constraint" => ElementKind::Constraint,
        "student" => ElementKind::Student,
        _ => ElementKind::Other,
    }
}

fn is_class_definition(el: &Element) -> bool {
    el.has_attr("classLimit") || el.has_attr("offering") || el.first_child("time").is_some()
}
