use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::ImportGraphConfig;
use crate::resolver;

/// Source file extensions considered for graphing.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Built-in exclusions, matched against the root-relative path: build and
/// tool configuration scripts, and env-suffixed sources. Everything else
/// (markup, manifests, styles) is already outside SOURCE_EXTENSIONS.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[r"\.config\.js$", r"\.env.*$", r"esbuild\.js$"];

fn default_excludes() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DEFAULT_EXCLUDE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("invalid built-in exclude pattern"))
            .collect()
    })
}

/// Walk a project directory and collect candidate source files.
///
/// Respects `.gitignore` rules (unless disabled in config), always excludes
/// `node_modules`, applies the built-in exclusion patterns, and applies any
/// additional glob exclusions from `config.exclude`.
///
/// The returned list is sorted: directory read order is
/// filesystem-dependent, and downstream node numbering follows this list.
pub fn discover_files(root: &Path, config: &ImportGraphConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(config.respect_gitignore())
        // Read .gitignore files even outside a git repository, so exclusions
        // behave the same for standalone directories.
        .require_git(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        // Hard exclusion: no component of the path may be node_modules.
        if resolver::in_dependency_store(path) {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !SOURCE_EXTENSIONS.contains(&ext) {
            continue;
        }

        let relative = resolver::node_id(root, path);
        if default_excludes().iter().any(|re| re.is_match(&relative)) {
            continue;
        }

        if is_excluded_by_config(path, &relative, config) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Returns true if the file matches any exclusion glob from config, either
/// against the whole root-relative path or against a single path component.
fn is_excluded_by_config(path: &Path, relative: &str, config: &ImportGraphConfig) -> bool {
    let Some(patterns) = &config.exclude else {
        return false;
    };

    for pattern in patterns {
        let Ok(matcher) = glob::Pattern::new(pattern) else {
            continue;
        };
        if matcher.matches(relative) {
            return true;
        }
        for component in path.components() {
            if let Some(s) = component.as_os_str().to_str()
                && matcher.matches(s)
            {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "export {};\n").unwrap();
    }

    fn names(root: &Path, config: &ImportGraphConfig) -> Vec<String> {
        discover_files(root, config)
            .unwrap()
            .iter()
            .map(|p| resolver::node_id(root, p))
            .collect()
    }

    #[test]
    fn collects_only_source_extensions() {
        let dir = tmp();
        touch(dir.path(), "src/app.ts");
        touch(dir.path(), "src/view.tsx");
        touch(dir.path(), "src/legacy.js");
        touch(dir.path(), "README.md");
        touch(dir.path(), "data.json");

        let found = names(dir.path(), &ImportGraphConfig::default());
        assert_eq!(found, vec!["src/app.ts", "src/legacy.js", "src/view.tsx"]);
    }

    #[test]
    fn node_modules_is_always_excluded() {
        let dir = tmp();
        touch(dir.path(), "src/app.ts");
        touch(dir.path(), "node_modules/lib/index.js");

        let found = names(dir.path(), &ImportGraphConfig::default());
        assert_eq!(found, vec!["src/app.ts"]);
    }

    #[test]
    fn tool_config_scripts_are_excluded_by_default() {
        let dir = tmp();
        touch(dir.path(), "src/app.ts");
        touch(dir.path(), "webpack.config.js");
        touch(dir.path(), "tailwind.config.js");
        touch(dir.path(), "esbuild.js");

        let found = names(dir.path(), &ImportGraphConfig::default());
        assert_eq!(found, vec!["src/app.ts"]);
    }

    #[test]
    fn config_globs_exclude_paths_and_components() {
        let dir = tmp();
        touch(dir.path(), "src/app.ts");
        touch(dir.path(), "src/generated/schema.ts");
        touch(dir.path(), "fixtures/sample.ts");

        let config = ImportGraphConfig {
            exclude: Some(vec!["generated".to_owned(), "fixtures/*.ts".to_owned()]),
            ..Default::default()
        };
        let found = names(dir.path(), &config);
        assert_eq!(found, vec!["src/app.ts"]);
    }

    #[test]
    fn discovery_order_is_sorted() {
        let dir = tmp();
        touch(dir.path(), "z.ts");
        touch(dir.path(), "a.ts");
        touch(dir.path(), "m/b.ts");

        let found = names(dir.path(), &ImportGraphConfig::default());
        assert_eq!(found, vec!["a.ts", "m/b.ts", "z.ts"]);
    }
}
