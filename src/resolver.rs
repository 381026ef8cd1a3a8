use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// The outcome of resolving a single import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved to a file inside the project root. Carries the absolute path.
    Internal(PathBuf),
    /// Resolved to a file inside a dependency store (`node_modules`) or outside
    /// the project root. Excluded from the graph.
    External(PathBuf),
    /// No file found for the specifier.
    Unresolved,
}

/// Extensions probed, in order, when a specifier names no file directly.
pub const PROBE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "ejs", "mjs", "html"];

// ---------------------------------------------------------------------------
// Path handling
// ---------------------------------------------------------------------------

/// Fold `.` and `..` segments out of a path without touching the filesystem.
///
/// Symlinks are not chased: resolution probes the literal paths an import
/// statement spells out, the same way Node's resolver walks them.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Render an absolute path as a graph node identity: project-root-relative,
/// `/`-separated regardless of host OS.
pub fn node_id(project_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(project_root).unwrap_or(path);
    let segments: Vec<&str> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    segments.join("/")
}

/// True if any component of `path` is a `node_modules` directory.
pub fn in_dependency_store(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_str() == Some("node_modules"))
}

// ---------------------------------------------------------------------------
// Node-style resolution
// ---------------------------------------------------------------------------

fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

/// Resolve `candidate` as a file: the exact path first, then with each probe
/// extension appended.
fn load_as_file(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    for ext in PROBE_EXTENSIONS {
        let mut probed = candidate.as_os_str().to_os_string();
        probed.push(".");
        probed.push(ext);
        let probed = PathBuf::from(probed);
        if probed.is_file() {
            return Some(probed);
        }
    }
    None
}

/// Probe `dir/index.<ext>` for each extension, in order.
fn load_index(dir: &Path) -> Option<PathBuf> {
    PROBE_EXTENSIONS.iter().find_map(|ext| {
        let candidate = dir.join(format!("index.{ext}"));
        candidate.is_file().then_some(candidate)
    })
}

/// Resolve `candidate` as a directory: honour a `package.json` `"main"` entry
/// if one resolves, then fall back to `index.<ext>` probing.
fn load_as_directory(candidate: &Path) -> Option<PathBuf> {
    if !candidate.is_dir() {
        return None;
    }

    if let Some(main) = package_main(candidate) {
        let target = normalize_path(&candidate.join(main));
        if let Some(found) = load_as_file(&target).or_else(|| load_index(&target)) {
            return Some(found);
        }
    }

    load_index(candidate)
}

/// Read the `"main"` field from `dir/package.json`, if present and a string.
fn package_main(dir: &Path) -> Option<String> {
    let manifest = dir.join("package.json");
    let contents = std::fs::read_to_string(manifest).ok()?;
    let parsed: serde_json::Value = serde_json::from_str(&contents).ok()?;
    parsed.get("main")?.as_str().map(str::to_owned)
}

/// Walk ancestor directories of `from_dir` probing `node_modules/<specifier>`
/// at each level, nearest first.
fn resolve_in_node_modules(from_dir: &Path, specifier: &str) -> Option<PathBuf> {
    for ancestor in from_dir.ancestors() {
        let candidate = ancestor.join("node_modules").join(specifier);
        if let Some(found) = load_as_file(&candidate).or_else(|| load_as_directory(&candidate)) {
            return Some(found);
        }
    }
    None
}

fn classify(project_root: &Path, resolved: PathBuf) -> Resolution {
    if in_dependency_store(&resolved) || !resolved.starts_with(project_root) {
        Resolution::External(resolved)
    } else {
        Resolution::Internal(resolved)
    }
}

/// Resolve an import specifier from the perspective of `from_file`.
///
/// Relative specifiers resolve against `from_file`'s directory with
/// Node-style file/extension/directory probing; bare specifiers fall back to
/// an ancestor `node_modules` walk. Anything landing in a dependency store or
/// outside `project_root` is [`Resolution::External`]; a miss is
/// [`Resolution::Unresolved`].
pub fn resolve_specifier(project_root: &Path, from_file: &Path, specifier: &str) -> Resolution {
    let Some(from_dir) = from_file.parent() else {
        return Resolution::Unresolved;
    };

    if is_relative_specifier(specifier) {
        let candidate = if specifier.starts_with('/') {
            PathBuf::from(specifier)
        } else {
            normalize_path(&from_dir.join(specifier))
        };
        return match load_as_file(&candidate).or_else(|| load_as_directory(&candidate)) {
            Some(found) => classify(project_root, found),
            None => Resolution::Unresolved,
        };
    }

    match resolve_in_node_modules(from_dir, specifier) {
        // A node_modules hit is external by construction; classify anyway so
        // the dependency-store rule lives in one place.
        Some(found) => classify(project_root, found),
        None => Resolution::Unresolved,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
