//! Zip extraction for the supplier download.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::FeedError;

const WORKBOOK_EXTENSIONS: [&str; 2] = [".xls", ".xlsx"];

fn is_workbook(name: &str) -> bool {
    let lower = name.to_lowercase();
    WORKBOOK_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Returns the name and bytes of the first `.xls`/`.xlsx` member of a zip
/// archive held in memory.
///
/// # Errors
///
/// Returns [`FeedError::Archive`] if `bytes` is not a readable zip, or
/// [`FeedError::MissingWorkbook`] if no member has a workbook extension.
pub fn extract_workbook(bytes: &[u8]) -> Result<(String, Vec<u8>), FeedError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let Some(name) = archive
        .file_names()
        .find(|name| is_workbook(name))
        .map(str::to_owned)
    else {
        let mut archive_members: Vec<String> = archive.file_names().map(str::to_owned).collect();
        archive_members.sort();
        return Err(FeedError::MissingWorkbook { archive_members });
    };

    let mut member = archive.by_name(&name)?;
    let mut contents = Vec::new();
    member.read_to_end(&mut contents)?;

    tracing::debug!(member = %name, bytes = contents.len(), "extracted supplier workbook");
    Ok((name, contents))
}
