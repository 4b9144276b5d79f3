//! Best-effort value coercions. Every function here is total: text that does
//! not parse yields `None`, never an error.

/// Parse a boolean flag. Accepts true/t/1/yes/y and false/f/0/no/n,
/// case-insensitive and trimmed. Anything else is unknown.
pub fn to_bool(text: Option<&str>) -> Option<bool> {
    let t = text?.trim().to_ascii_lowercase();
    match t.as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

pub fn to_int(text: Option<&str>) -> Option<i128> {
    text?.trim().parse().ok()
}

pub fn to_float(text: Option<&str>) -> Option<f64> {
    text?.trim().parse().ok()
}

/// Split an `"X,Y"` location on the first comma. Both halves are `None` when
/// the location is absent or has no comma; otherwise each half is coerced on
/// its own.
pub fn split_location(loc: Option<&str>) -> (Option<i128>, Option<i128>) {
    match loc.and_then(|l| l.split_once(',')) {
        Some((x, y)) => (to_int(Some(x)), to_int(Some(y))),
        None => (None, None),
    }
}
