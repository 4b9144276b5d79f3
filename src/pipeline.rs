use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use indicatif::ProgressBar;
use tracing::info;

use crate::error::{ExtractError, Result};
use crate::parser::{self, KindTally};
use crate::settings::Settings;
use crate::tables::{TableCounts, Tables};

fn open_input(path: &Path) -> Result<BufReader<File>> {
    if !path.is_file() {
        return Err(ExtractError::InputNotFound(path.to_path_buf()));
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Convert the configured document into the fourteen CSV tables.
pub fn convert(settings: &Settings, progress: &ProgressBar) -> Result<TableCounts> {
    let source = open_input(&settings.input)?;
    fs::create_dir_all(&settings.out_dir)?;
    let tables = Tables::create(&settings.out_dir)?;

    info!(input = %settings.input.display(), out_dir = %settings.out_dir.display(), "extracting");
    let counts = parser::extract(source, tables, progress)?;
    info!(tables = counts.tables.len(), "extraction finished");
    Ok(counts)
}

/// Classify every record element without writing output.
pub fn inspect(settings: &Settings) -> Result<KindTally> {
    let source = open_input(&settings.input)?;
    info!(input = %settings.input.display(), "inspecting");
    parser::tally(source)
}
