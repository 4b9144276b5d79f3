use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::error::Result;

/// A row type bound to one output file.
pub trait Row: Serialize {
    const FILE: &'static str;
    const HEADER: &'static [&'static str];
}

macro_rules! row {
    ($ty:ident, $file:literal, [$($col:literal),+ $(,)?]) => {
        impl Row for $ty {
            const FILE: &'static str = $file;
            const HEADER: &'static [&'static str] = &[$($col),+];
        }
    };
}

/// `True`/`False`, empty when unknown.
fn title_case_bool<S: Serializer>(value: &Option<bool>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(true) => s.serialize_str("True"),
        Some(false) => s.serialize_str("False"),
        None => s.serialize_none(),
    }
}

// ── Rooms ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRow {
    pub room_id: Option<String>,
    pub capacity: Option<i128>,
    pub location_x: Option<i128>,
    pub location_y: Option<i128>,
    #[serde(serialize_with = "title_case_bool")]
    pub has_constraints: Option<bool>,
}
row!(RoomRow, "rooms.csv", ["room_id", "capacity", "location_x", "location_y", "has_constraints"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSharingPatternRow {
    pub room_id: Option<String>,
    pub unit_slots: Option<i128>,
    pub free_for_all_char: Option<String>,
    pub not_available_char: Option<String>,
    pub pattern_text: Option<String>,
}
row!(
    RoomSharingPatternRow,
    "room_sharing_patterns.csv",
    ["room_id", "unit_slots", "free_for_all_char", "not_available_char", "pattern_text"]
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSharingDepartmentRow {
    pub room_id: Option<String>,
    pub digit_char: Option<String>,
    pub department_id: Option<String>,
}
row!(RoomSharingDepartmentRow, "room_sharing_departments.csv", ["room_id", "digit_char", "department_id"]);

// ── Classes ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow {
    pub class_id: Option<String>,
    pub offering_id: Option<String>,
    pub config_id: Option<String>,
    pub subpart_id: Option<String>,
    #[serde(serialize_with = "title_case_bool")]
    pub committed: Option<bool>,
    pub class_limit: Option<i128>,
    pub scheduler: Option<i128>,
    pub dates_mask: Option<String>,
}
row!(
    ClassRow,
    "classes.csv",
    [
        "class_id", "offering_id", "config_id", "subpart_id",
        "committed", "class_limit", "scheduler", "dates_mask",
    ]
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassInstructorRow {
    pub class_id: Option<String>,
    pub instructor_id: String,
}
row!(ClassInstructorRow, "class_instructors.csv", ["class_id", "instructor_id"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRoomOptionRow {
    pub class_id: Option<String>,
    pub room_id: Option<String>,
    pub pref: Option<f64>,
}
row!(ClassRoomOptionRow, "class_room_options.csv", ["class_id", "room_id", "pref"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTimeOptionRow {
    pub class_id: Option<String>,
    pub days_mask: Option<String>,
    pub start_slot: Option<i128>,
    pub length_slots: Option<i128>,
    pub pref: Option<f64>,
}
row!(
    ClassTimeOptionRow,
    "class_time_options.csv",
    ["class_id", "days_mask", "start_slot", "length_slots", "pref"]
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorRow {
    pub instructor_id: String,
}
row!(InstructorRow, "instructors.csv", ["instructor_id"]);

// ── Constraints ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintRow {
    pub pk: u64,
    pub external_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub pref_raw: Option<String>,
    pub pref_numeric: Option<f64>,
}
row!(ConstraintRow, "constraints.csv", ["pk", "external_id", "type", "pref_raw", "pref_numeric"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintClassRow {
    pub constraint_pk: u64,
    pub order_index: u32,
    pub class_id: String,
}
row!(ConstraintClassRow, "constraint_classes.csv", ["constraint_pk", "order_index", "class_id"]);

// ── Students ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRow {
    pub student_id: String,
}
row!(StudentRow, "students.csv", ["student_id"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentOfferingRow {
    pub student_id: String,
    pub offering_id: Option<String>,
    pub weight: Option<f64>,
}
row!(StudentOfferingRow, "student_offerings.csv", ["student_id", "offering_id", "weight"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentClassRow {
    pub student_id: String,
    pub class_id: String,
}
row!(StudentClassRow, "student_classes.csv", ["student_id", "class_id"]);

/// Same shape as [`StudentClassRow`], different file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProhibitedClassRow {
    pub student_id: String,
    pub class_id: String,
}
row!(StudentProhibitedClassRow, "student_prohibited_classes.csv", ["student_id", "class_id"]);

// ── Sinks ──

/// One CSV file. The header is written on creation so empty tables still
/// carry their column names.
pub struct Sink<R> {
    writer: csv::Writer<File>,
    rows: usize,
    _row: PhantomData<R>,
}

impl<R: Row> Sink<R> {
    fn create(dir: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(dir.join(R::FILE))?;
        writer.write_record(R::HEADER)?;
        Ok(Self {
            writer,
            rows: 0,
            _row: PhantomData,
        })
    }

    pub fn write(&mut self, row: &R) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a R>) -> Result<()>
    where
        R: 'a,
    {
        for row in rows {
            self.write(row)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(&'static str, usize)> {
        self.writer.flush()?;
        Ok((R::FILE, self.rows))
    }
}

/// All fourteen output tables, opened together before the pass and closed
/// together after it.
pub struct Tables {
    pub rooms: Sink<RoomRow>,
    pub room_sharing_patterns: Sink<RoomSharingPatternRow>,
    pub room_sharing_departments: Sink<RoomSharingDepartmentRow>,
    pub classes: Sink<ClassRow>,
    pub class_instructors: Sink<ClassInstructorRow>,
    pub class_room_options: Sink<ClassRoomOptionRow>,
    pub class_time_options: Sink<ClassTimeOptionRow>,
    pub instructors: Sink<InstructorRow>,
    pub constraints: Sink<ConstraintRow>,
    pub constraint_classes: Sink<ConstraintClassRow>,
    pub students: Sink<StudentRow>,
    pub student_offerings: Sink<StudentOfferingRow>,
    pub student_classes: Sink<StudentClassRow>,
    pub student_prohibited_classes: Sink<StudentProhibitedClassRow>,
}

impl Tables {
    pub fn create(dir: &Path) -> Result<Self> {
        Ok(Self {
            rooms: Sink::create(dir)?,
            room_sharing_patterns: Sink::create(dir)?,
            room_sharing_departments: Sink::create(dir)?,
            classes: Sink::create(dir)?,
            class_instructors: Sink::create(dir)?,
            class_room_options: Sink::create(dir)?,
            class_time_options: Sink::create(dir)?,
            instructors: Sink::create(dir)?,
            constraints: Sink::create(dir)?,
            constraint_classes: Sink::create(dir)?,
            students: Sink::create(dir)?,
            student_offerings: Sink::create(dir)?,
            student_classes: Sink::create(dir)?,
            student_prohibited_classes: Sink::create(dir)?,
        })
    }

    /// Flush every file and report how many rows each received.
    pub fn finish(self) -> Result<TableCounts> {
        let tables = vec![
            self.rooms.finish()?,
            self.room_sharing_patterns.finish()?,
            self.room_sharing_departments.finish()?,
            self.classes.finish()?,
            self.class_instructors.finish()?,
            self.class_room_options.finish()?,
            self.class_time_options.finish()?,
            self.instructors.finish()?,
            self.constraints.finish()?,
            self.constraint_classes.finish()?,
            self.students.finish()?,
            self.student_offerings.finish()?,
            self.student_classes.finish()?,
            self.student_prohibited_classes.finish()?,
        ];
        Ok(TableCounts { tables })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCounts {
    pub tables: Vec<(&'static str, usize)>,
}

impl TableCounts {
    #[cfg(test)]
    pub fn get(&self, file: &str) -> Option<usize> {
        self.tables.iter().find(|(f, _)| *f == file).map(|(_, n)| *n)
    }

    pub fn print(&self) {
        for (file, rows) in &self.tables {
            println!("  {:<32} {:>8} rows", file, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(dir: &Path, file: &str) -> String {
        std::fs::read_to_string(dir.join(file)).unwrap()
    }

    #[test]
    fn headers_written_for_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let counts = Tables::create(dir.path()).unwrap().finish().unwrap();

        assert_eq!(counts.tables.len(), 14);
        assert!(counts.tables.iter().all(|(_, n)| *n == 0));
        assert_eq!(read(dir.path(), "rooms.csv"), "room_id,capacity,location_x,location_y,has_constraints\n");
        assert_eq!(read(dir.path(), "constraints.csv"), "pk,external_id,type,pref_raw,pref_numeric\n");
        assert_eq!(read(dir.path(), "student_prohibited_classes.csv"), "student_id,class_id\n");
    }

    #[test]
    fn booleans_title_case_and_wide_integers() {
        let dir = tempfile::tempdir().unwrap();
        let mut tables = Tables::create(dir.path()).unwrap();
        tables
            .classes
            .write(&ClassRow {
                class_id: Some("C1".into()),
                offering_id: None,
                config_id: None,
                subpart_id: None,
                committed: Some(false),
                class_limit: Some(99_999_999_999_999_999_999),
                scheduler: None,
                dates_mask: None,
            })
            .unwrap();
        tables.finish().unwrap();

        assert_eq!(
            read(dir.path(), "classes.csv").lines().nth(1),
            Some("C1,,,,False,99999999999999999999,,")
        );
    }

    #[test]
    fn nulls_are_empty_and_values_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let mut tables = Tables::create(dir.path()).unwrap();
        tables
            .rooms
            .write(&RoomRow {
                room_id: Some("R,1".into()),
                capacity: Some(30),
                location_x: None,
                location_y: None,
                has_constraints: Some(true),
            })
            .unwrap();
        tables
            .constraints
            .write(&ConstraintRow {
                pk: 1,
                external_id: Some("7".into()),
                kind: Some("SAME_ROOM".into()),
                pref_raw: Some("R".into()),
                pref_numeric: None,
            })
            .unwrap();
        let counts = tables.finish().unwrap();

        assert_eq!(counts.get("rooms.csv"), Some(1));
        assert_eq!(counts.get("constraints.csv"), Some(1));
        assert_eq!(counts.get("students.csv"), Some(0));
        assert_eq!(
            read(dir.path(), "rooms.csv"),
            "room_id,capacity,location_x,location_y,has_constraints\n\"R,1\",30,,,True\n"
        );
        assert_eq!(
            read(dir.path(), "constraints.csv"),
            "pk,external_id,type,pref_raw,pref_numeric\n1,7,SAME_ROOM,R,\n"
        );
    }
}
