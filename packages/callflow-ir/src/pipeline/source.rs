//! Source enumeration and language auto-detection (SPEC_FULL.md §4.1, scenario S8).

use std::path::PathBuf;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::{CallflowError, Result};
use crate::shared::ports::LanguageId;

pub struct SourceFiles {
    pub paths: Vec<PathBuf>,
    pub language: LanguageId,
}

#[derive(Clone, Copy)]
enum Origin {
    /// Named directly on the command line; always included regardless of suffix.
    Explicit,
    /// Found by walking a directory; filtered to the detected language.
    Discovered,
}

/// Walks every directory source (files named directly bypass extension
/// filtering), then resolves the language either from `language` or from the
/// first discovered file's suffix, filtering out files that don't match.
pub fn enumerate_sources(sources: &[PathBuf], language: Option<LanguageId>) -> Result<SourceFiles> {
    let mut candidates: Vec<(PathBuf, Origin)> = Vec::new();
    for src in sources {
        if src.is_dir() {
            for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() {
                    candidates.push((entry.into_path(), Origin::Discovered));
                }
            }
        } else {
            candidates.push((src.clone(), Origin::Explicit));
        }
    }
    // Deterministic, since walkdir's own order varies across platforms/filesystems.
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let detected = match language {
        Some(lang) => lang,
        None => {
            let first_suffix = candidates
                .first()
                .and_then(|(p, _)| p.to_str())
                .and_then(LanguageId::from_file_path);
            match first_suffix {
                Some(lang) => {
                    info!(language = %lang.name(), "auto-detected source language");
                    lang
                }
                None => {
                    return Err(CallflowError::config(
                        "could not auto-detect a source language from the first given path; pass --language explicitly",
                    ));
                }
            }
        }
    };

    let mut paths = Vec::new();
    for (path, origin) in candidates {
        match origin {
            Origin::Explicit => paths.push(path),
            Origin::Discovered => {
                let matches = path
                    .to_str()
                    .and_then(LanguageId::from_file_path)
                    .map(|l| l == detected)
                    .unwrap_or(false);
                if matches {
                    paths.push(path);
                } else {
                    debug!(path = %path.display(), "skipping file whose suffix doesn't match the detected language");
                }
            }
        }
    }

    Ok(SourceFiles { paths, language: detected })
}
