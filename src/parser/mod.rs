pub mod imports;

use std::cell::RefCell;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tree_sitter::{Language, Parser};

pub use imports::{ImportInfo, extract_imports};

// Thread-local Parser instances: one per rayon worker thread, zero lock contention.
// Each Parser is initialised once per thread with the appropriate grammar.
thread_local! {
    static PARSER_TS: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()).unwrap();
        p
    });
    static PARSER_TSX: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into()).unwrap();
        p
    });
    static PARSER_JS: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_javascript::LANGUAGE.into()).unwrap();
        p
    });
}

/// Return the tree-sitter [`Language`] for the given file extension, or `None` if the
/// extension is not supported.
///
/// `.ts` and `.tsx` MUST use different grammars: the TypeScript grammar cannot parse
/// JSX, and the TSX grammar breaks angle-bracket type assertions (`<T>expr`). The
/// JavaScript grammar parses module and script sources alike, so no module-vs-script
/// guess is ever made.
pub fn grammar_for_extension(ext: &str) -> Option<Language> {
    match ext {
        "ts" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "js" | "jsx" => Some(tree_sitter_javascript::LANGUAGE.into()),
        _ => None,
    }
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

fn extract_checked(
    path: &Path,
    source: &[u8],
    tree: Option<tree_sitter::Tree>,
) -> Result<Vec<ImportInfo>> {
    let tree = tree.ok_or_else(|| anyhow!("tree-sitter returned no tree for {:?}", path))?;
    // tree-sitter recovers from syntax errors instead of failing; a tree containing
    // ERROR nodes is treated as unparseable so the file yields zero edges.
    if tree.root_node().has_error() {
        return Err(anyhow!("syntax error in {}", path.display()));
    }
    Ok(extract_imports(&tree, source))
}

/// Parse a source file and extract its import statements.
///
/// Allocates a fresh `Parser` on every call, suitable for one-off parses.
/// For bulk parsing use [`parse_file_parallel`] instead.
///
/// # Errors
/// Returns an error if the file extension is unsupported (not
/// `.ts`/`.tsx`/`.js`/`.jsx`) or the source does not parse cleanly.
pub fn parse_file(path: &Path, source: &[u8]) -> Result<Vec<ImportInfo>> {
    let ext = extension_of(path);
    let language = grammar_for_extension(ext)
        .ok_or_else(|| anyhow!("unsupported file extension: {:?}", ext))?;

    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .with_context(|| format!("failed to set tree-sitter language for extension {:?}", ext))?;

    extract_checked(path, source, parser.parse(source, None))
}

/// Parse a source file using thread-local Parser instances (for rayon parallel use).
///
/// Same as [`parse_file`] but reuses a per-thread Parser instead of allocating a
/// new one; each rayon worker gets its own, initialised lazily on first use.
pub fn parse_file_parallel(path: &Path, source: &[u8]) -> Result<Vec<ImportInfo>> {
    let tree = match extension_of(path) {
        "ts" => PARSER_TS.with(|p| p.borrow_mut().parse(source, None)),
        "tsx" => PARSER_TSX.with(|p| p.borrow_mut().parse(source, None)),
        "js" | "jsx" => PARSER_JS.with(|p| p.borrow_mut().parse(source, None)),
        ext => return Err(anyhow!("unsupported file extension: {:?}", ext)),
    };
    extract_checked(path, source, tree)
}
