//! Download path layout and file naming
//!
//! This module organizes downloaded study material under per-user
//! directories and derives safe file names from PDF display titles.

use std::path::{Path, PathBuf};

use crate::constants::{files, storage};

/// Path layout utility for the downloads directory
///
/// Structure:
/// - Known user: `{root}/user-{id}/{title}.pdf`
/// - Anonymous:  `{root}/anonymous/{title}.pdf`
/// - Per-user index: `{root}/user-{id}/.pdf_index.json`
pub struct DownloadLayout;

impl DownloadLayout {
    /// Directory holding one user's downloads
    pub fn user_dir(root: &Path, user_id: Option<i64>) -> PathBuf {
        match user_id {
            Some(id) => root.join(format!("{}{}", storage::USER_DIR_PREFIX, id)),
            None => root.join(storage::ANONYMOUS_DIR),
        }
    }

    /// Index file recording one user's downloads
    pub fn index_file(root: &Path, user_id: i64) -> PathBuf {
        Self::user_dir(root, Some(user_id)).join(files::PDF_INDEX_FILE)
    }

    /// Destination path for a PDF derived from its display title
    pub fn pdf_destination(root: &Path, user_id: Option<i64>, title: &str) -> PathBuf {
        let file_name = format!("{}.{}", Self::sanitize_title(title), files::PDF_EXTENSION);
        Self::user_dir(root, user_id).join(file_name)
    }

    /// Replace characters that are not legal in file names
    pub fn sanitize_title(title: &str) -> String {
        title
            .chars()
            .map(|c| {
                if files::ILLEGAL_FILENAME_CHARS.contains(&c) {
                    files::FILENAME_REPLACEMENT
                } else {
                    c
                }
            })
            .collect()
    }
}
