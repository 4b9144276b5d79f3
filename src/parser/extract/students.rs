use crate::coerce::to_float;
use crate::parser::tree::Element;
use crate::tables::{StudentClassRow, StudentOfferingRow, StudentProhibitedClassRow, StudentRow};

pub struct StudentRecord {
    pub student: StudentRow,
    pub offerings: Vec<StudentOfferingRow>,
    pub classes: Vec<StudentClassRow>,
    pub prohibited: Vec<StudentProhibitedClassRow>,
}

/// Extract a student. Returns `None` for a student without an id.
pub fn extract(el: &Element) -> Option<StudentRecord> {
    let sid = el.id()?;

    let offerings = el
        .children_named("offering")
        .map(|o| StudentOfferingRow {
            student_id: sid.to_string(),
            offering_id: o.attr("id").map(str::to_string),
            weight: to_float(o.attr("weight")),
        })
        .collect();

    let classes = el
        .children_named("class")
        .filter_map(Element::id)
        .map(|cid| StudentClassRow {
            student_id: sid.to_string(),
            class_id: cid.to_string(),
        })
        .collect();

    let prohibited = el
        .children_named("prohibited-class")
        .filter_map(Element::id)
        .map(|cid| StudentProhibitedClassRow {
            student_id: sid.to_string(),
            class_id: cid.to_string(),
        })
        .collect();

    Some(StudentRecord {
        student: StudentRow {
            student_id: sid.to_string(),
        },
        offerings,
        classes,
        prohibited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_links() {
        let el = Element::new("student")
            .with_attr("id", "S1")
            .with_child(Element::new("offering").with_attr("id", "O1").with_attr("weight", "1.0"))
            .with_child(Element::new("offering").with_attr("id", "O2"))
            .with_child(Element::new("class").with_attr("id", "C1"))
            .with_child(Element::new("class"))
            .with_child(Element::new("prohibited-class").with_attr("id", "C9"));
        let r = extract(&el).unwrap();

        assert_eq!(r.student.student_id, "S1");
        assert_eq!(r.offerings.len(), 2);
        assert_eq!(r.offerings[0].weight, Some(1.0));
        assert_eq!(r.offerings[1].weight, None);
        assert_eq!(r.classes.len(), 1);
        assert_eq!(r.classes[0].class_id, "C1");
        assert_eq!(r.prohibited.len(), 1);
        assert_eq!(r.prohibited[0].class_id, "C9");
    }

    #[test]
    fn no_id_no_rows() {
        let el = Element::new("student").with_child(Element::new("class").with_attr("id", "C1"));
        assert!(extract(&el).is_none());
        assert!(extract(&Element::new("student").with_attr("id", "")).is_none());
    }
}
