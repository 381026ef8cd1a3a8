use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser;
use crate::resolver::{self, Resolution};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A per-file failure, attributed to the file it occurred in.
///
/// These are contained diagnostics: one file failing never affects sibling
/// files or the overall build.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl ProcessError {
    /// The file this failure is attributed to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// One import resolved to a file inside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Node identity of the import target (root-relative, `/`-separated).
    pub target: String,
    /// Binding names carried by the originating import statement.
    pub specifiers: Vec<String>,
}

/// The successful outcome of processing one source file.
#[derive(Debug, Clone)]
pub struct FileImports {
    /// Node identity of the processed file.
    pub source: String,
    /// Imports that resolved to internal project files, in source order.
    pub imports: Vec<ResolvedImport>,
    /// Specifiers that resolved to nothing. Informational only; they are
    /// dropped from the graph, not errors.
    pub unresolved: Vec<String>,
}

// ---------------------------------------------------------------------------
// Processing
// ---------------------------------------------------------------------------

/// Process a single candidate file: read, parse, extract import statements,
/// and resolve each specifier to a node identity.
///
/// Pure over its inputs, with no shared mutable state, so invocations over
/// different files run safely in parallel. External targets (dependency
/// store, outside the root) are silently excluded; unresolved specifiers are
/// recorded and dropped.
pub fn process_file(project_root: &Path, path: &Path) -> Result<FileImports, ProcessError> {
    let contents = std::fs::read(path).map_err(|source| ProcessError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let statements =
        parser::parse_file_parallel(path, &contents).map_err(|err| ProcessError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let normalized = resolver::normalize_path(path);
    let mut imports = Vec::new();
    let mut unresolved = Vec::new();

    for statement in statements {
        match resolver::resolve_specifier(project_root, &normalized, &statement.specifier) {
            Resolution::Internal(target) => imports.push(ResolvedImport {
                target: resolver::node_id(project_root, &target),
                specifiers: statement.bindings,
            }),
            Resolution::External(_) => {}
            Resolution::Unresolved => unresolved.push(statement.specifier),
        }
    }

    Ok(FileImports {
        source: resolver::node_id(project_root, &normalized),
        imports,
        unresolved,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn internal_imports_are_kept_with_specifiers() {
        let dir = project();
        let root = dir.path();
        write(root, "src/b.ts", "export const b = 1;");
        let a = write(root, "src/a.ts", "import { b } from './b';");

        let result = process_file(root, &a).unwrap();
        assert_eq!(result.source, "src/a.ts");
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].target, "src/b.ts");
        assert_eq!(result.imports[0].specifiers, vec!["b"]);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn external_imports_are_dropped_silently() {
        let dir = project();
        let root = dir.path();
        write(root, "node_modules/react/index.js", "module.exports = {};");
        let a = write(root, "src/a.ts", "import React from 'react';");

        let result = process_file(root, &a).unwrap();
        assert!(result.imports.is_empty());
        assert!(result.unresolved.is_empty(), "external is not unresolved");
    }

    #[test]
    fn unresolved_imports_are_recorded_but_do_not_fail() {
        let dir = project();
        let root = dir.path();
        write(root, "src/b.ts", "export {};");
        let a = write(
            root,
            "src/a.ts",
            "import './missing';\nimport './b';",
        );

        let result = process_file(root, &a).unwrap();
        assert_eq!(result.unresolved, vec!["./missing"]);
        assert_eq!(result.imports.len(), 1, "other imports still resolve");
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = project();
        let root = dir.path();
        let missing = root.join("src/gone.ts");

        match process_file(root, &missing) {
            Err(ProcessError::Read { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn syntax_error_is_a_parse_error() {
        let dir = project();
        let root = dir.path();
        let broken = write(root, "src/broken.ts", "import { from ';;; ===");

        match process_file(root, &broken) {
            Err(ProcessError::Parse { path, .. }) => assert_eq!(path, broken),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
