use crate::coerce::to_float;
use crate::parser::tree::Element;
use crate::tables::{ConstraintClassRow, ConstraintRow};

pub struct ConstraintRecord {
    pub constraint: ConstraintRow,
    pub classes: Vec<ConstraintClassRow>,
}

/// Extract a constraint under the synthetic key `pk`. Class children without
/// an id are skipped and do not advance the position.
pub fn extract(pk: u64, el: &Element) -> ConstraintRecord {
    let pref_raw = el.attr("pref");
    let constraint = ConstraintRow {
        pk,
        external_id: el.attr("id").map(str::to_string),
        kind: el.attr("type").map(str::to_string),
        pref_raw: pref_raw.map(str::to_string),
        pref_numeric: to_float(pref_raw),
    };

    let classes = el
        .children_named("class")
        .filter_map(Element::id)
        .zip(1..)
        .map(|(class_id, order_index)| ConstraintClassRow {
            constraint_pk: pk,
            order_index,
            class_id: class_id.to_string(),
        })
        .collect();

    ConstraintRecord { constraint, classes }
}
