pub mod classify;
pub mod extract;
pub mod stream;
pub mod tree;

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

use indicatif::ProgressBar;
use tracing::{debug, trace};

use crate::error::Result;
use crate::tables::{InstructorRow, TableCounts, Tables};
use classify::ElementKind;
use extract::{classes, constraints, rooms, students};
use stream::Visitor;
use tree::Element;

/// Single pass: document → rows → tables, then the deferred instructor flush.
pub fn extract<R: BufRead>(source: R, tables: Tables, progress: &ProgressBar) -> Result<TableCounts> {
    let mut extractor = Extractor::new(tables, progress.clone());
    stream::walk(source, &mut extractor)?;
    extractor.finish()
}

/// Walk the document and count elements per kind without writing anything.
pub fn tally<R: BufRead>(source: R) -> Result<KindTally> {
    let mut tally = KindTally::default();
    stream::walk(source, &mut tally)?;
    Ok(tally)
}

/// Emits rows for each definition. Owns the only running state of the pass:
/// the constraint key counter and the set of instructor ids seen so far.
pub struct Extractor {
    tables: Tables,
    progress: ProgressBar,
    next_constraint_pk: u64,
    instructors: BTreeSet<String>,
}

impl Extractor {
    pub fn new(tables: Tables, progress: ProgressBar) -> Self {
        Self {
            tables,
            progress,
            next_constraint_pk: 1,
            instructors: BTreeSet::new(),
        }
    }

    /// Write the distinct instructor ids in ascending order, then close every
    /// table.
    pub fn finish(mut self) -> Result<TableCounts> {
        debug!(instructors = self.instructors.len(), "flushing instructors");
        for instructor_id in std::mem::take(&mut self.instructors) {
            self.tables.instructors.write(&InstructorRow { instructor_id })?;
        }
        self.tables.finish()
    }

    fn room(&mut self, el: &Element) -> Result<()> {
        let r = rooms::extract(el);
        self.tables.rooms.write(&r.room)?;
        if let Some(pattern) = &r.pattern {
            self.tables.room_sharing_patterns.write(pattern)?;
        }
        self.tables.room_sharing_departments.write_all(&r.departments)
    }

    fn class(&mut self, el: &Element) -> Result<()> {
        let r = classes::extract(el);
        self.tables.classes.write(&r.class)?;
        for link in &r.instructors {
            if !self.instructors.contains(&link.instructor_id) {
                self.instructors.insert(link.instructor_id.clone());
            }
        }
        self.tables.class_instructors.write_all(&r.instructors)?;
        self.tables.class_room_options.write_all(&r.room_options)?;
        self.tables.class_time_options.write_all(&r.time_options)
    }

    fn constraint(&mut self, el: &Element) -> Result<()> {
        let pk = self.next_constraint_pk;
        self.next_constraint_pk += 1;
        let r = constraints::extract(pk, el);
        self.tables.constraints.write(&r.constraint)?;
        self.tables.constraint_classes.write_all(&r.classes)
    }

    fn student(&mut self, el: &Element) -> Result<()> {
        let Some(r) = students::extract(el) else {
            debug!("skipping student without id");
            return Ok(());
        };
        self.tables.students.write(&r.student)?;
        self.tables.student_offerings.write_all(&r.offerings)?;
        self.tables.student_classes.write_all(&r.classes)?;
        self.tables.student_prohibited_classes.write_all(&r.prohibited)
    }
}

impl Visitor for Extractor {
    fn visit(&mut self, kind: ElementKind, el: &Element) -> Result<()> {
        match kind {
            ElementKind::RoomDefinition => self.room(el)?,
            ElementKind::ClassDefinition => self.class(el)?,
            ElementKind::Constraint => self.constraint(el)?,
            ElementKind::Student => self.student(el)?,
            // read by the enclosing definition
            ElementKind::RoomReference | ElementKind::ClassReference | ElementKind::Other => {
                return Ok(());
            }
        }
        trace!(?kind, id = el.attr("id"), "handled");
        self.progress.inc(1);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct KindTally {
    counts: BTreeMap<ElementKind, usize>,
}

impl KindTally {
    pub fn get(&self, kind: ElementKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn print(&self) {
        for kind in ElementKind::ALL {
            println!("  {:<20} {:>8}", kind.label(), self.get(kind));
        }
    }
}

impl Visitor for KindTally {
    fn visit(&mut self, kind: ElementKind, _el: &Element) -> Result<()> {
        *self.counts.entry(kind).or_default() += 1;
        Ok(())
    }
}
