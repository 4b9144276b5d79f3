//! Pure element → row mappings, one module per record type. Nothing here
//! writes or keeps state; the caller decides what to do with the rows.

pub mod classes;
pub mod constraints;
pub mod rooms;
pub mod students;
