use tree_sitter::{Node, Tree};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// One import statement extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// The raw module specifier string, e.g. `"react"` or `"./utils"`.
    pub specifier: String,
    /// Display names of the bindings this statement introduces, in source order:
    /// - default import:   `"React (default)"`
    /// - namespace import: `"* as path"`
    /// - named import:     the imported name (`useState`, not a local alias)
    /// - require binding:  the declarator name (`fs` for `const fs = require("fs")`)
    pub bindings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Helper utilities
// ---------------------------------------------------------------------------

fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Extract the literal value of a `string` node (quotes stripped).
///
/// Returns `None` when `node` is not a string literal; template strings and
/// arbitrary expressions are rejected here, which keeps dynamic requires out
/// of the graph.
fn string_literal(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut value = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "string_fragment" {
            value.push_str(node_text(child, source));
        }
    }
    // An empty string literal (`''`) has no fragment children; it is still a
    // string literal and yields an empty specifier.
    Some(value)
}

/// Find the first direct child of `node` with the given kind.
fn find_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

// ---------------------------------------------------------------------------
// ESM import statements
// ---------------------------------------------------------------------------

/// Extract binding names from an `import_statement` node, in source order.
///
/// Handles:
/// - Named:     `import { useState, useEffect as UE } from 'react'`
/// - Default:   `import React from 'react'`
/// - Namespace: `import * as path from 'path'`
/// - Combined:  `import React, { useState } from 'react'`
/// - Bare:      `import './side-effect'` (no bindings)
fn esm_bindings(import_node: Node, source: &[u8]) -> Vec<String> {
    let mut bindings = Vec::new();

    let Some(clause) = find_child_of_kind(import_node, "import_clause") else {
        return bindings;
    };

    let mut cursor = clause.walk();
    for child in clause.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                // Default import: `import React from ...`
                bindings.push(format!("{} (default)", node_text(child, source)));
            }
            "namespace_import" => {
                // `* as ns`: the identifier carries no field name in the grammar.
                if let Some(name) = find_child_of_kind(child, "identifier") {
                    bindings.push(format!("* as {}", node_text(name, source)));
                }
            }
            "named_imports" => {
                named_import_bindings(child, source, &mut bindings);
            }
            _ => {}
        }
    }

    bindings
}

/// Extract the imported names from a `named_imports` node.
///
/// For `import { foo as bar }` the grammar's `name` field holds the imported
/// name (`foo`) and `alias` holds the local binding (`bar`); the imported
/// name is what identifies the dependency, so that is what we keep.
fn named_import_bindings(named_node: Node, source: &[u8], bindings: &mut Vec<String>) {
    let mut cursor = named_node.walk();
    for child in named_node.children(&mut cursor) {
        if child.kind() != "import_specifier" {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name") else {
            continue;
        };
        // `import { "not-an-ident" as x }` uses a string as the imported name.
        if name_node.kind() == "string" {
            if let Some(value) = string_literal(name_node, source) {
                bindings.push(value);
            }
        } else {
            bindings.push(node_text(name_node, source).to_owned());
        }
    }
}

// ---------------------------------------------------------------------------
// CommonJS require statements
// ---------------------------------------------------------------------------

/// If `node` is a `require("literal")` call, return the literal specifier.
fn require_specifier(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "call_expression" {
        return None;
    }
    let callee = node.child_by_field_name("function")?;
    if callee.kind() != "identifier" || node_text(callee, source) != "require" {
        return None;
    }
    let args = node.child_by_field_name("arguments")?;
    let first = args.named_child(0)?;
    string_literal(first, source)
}

/// Match a top-level `const x = require("y")` (or `let`/`var`) declaration.
///
/// Only the first declarator is inspected, and only a plain identifier name
/// yields a binding; destructured requires keep the edge but bind nothing.
fn declaration_require(stmt: Node, source: &[u8]) -> Option<ImportInfo> {
    let declarator = find_child_of_kind(stmt, "variable_declarator")?;
    let value = declarator.child_by_field_name("value")?;
    let specifier = require_specifier(value, source)?;

    let mut bindings = Vec::new();
    if let Some(name) = declarator.child_by_field_name("name")
        && name.kind() == "identifier"
    {
        bindings.push(node_text(name, source).to_owned());
    }

    Some(ImportInfo { specifier, bindings })
}

/// Match a top-level bare `require("y");` expression statement.
fn expression_require(stmt: Node, source: &[u8]) -> Option<ImportInfo> {
    let expr = stmt.named_child(0)?;
    let specifier = require_specifier(expr, source)?;
    Some(ImportInfo {
        specifier,
        bindings: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Extraction entry point
// ---------------------------------------------------------------------------

/// Extract all import statements from a parsed syntax tree, in source order.
///
/// Recognition is a closed match over top-level statement shapes:
/// `import_statement` for ESM, plus `lexical_declaration` /
/// `variable_declaration` / `expression_statement` carrying a
/// `require("literal")` call for CommonJS. Requires nested inside functions
/// or blocks are deliberately not collected, matching a program-body scan.
pub fn extract_imports(tree: &Tree, source: &[u8]) -> Vec<ImportInfo> {
    let mut imports = Vec::new();

    let root = tree.root_node();
    let mut cursor = root.walk();
    for stmt in root.children(&mut cursor) {
        match stmt.kind() {
            "import_statement" => {
                // TS equals-style imports (`import foo = require(...)`) have
                // no source field; skip them.
                let Some(source_node) = stmt.child_by_field_name("source") else {
                    continue;
                };
                if let Some(specifier) = string_literal(source_node, source) {
                    imports.push(ImportInfo {
                        specifier,
                        bindings: esm_bindings(stmt, source),
                    });
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                if let Some(info) = declaration_require(stmt, source) {
                    imports.push(info);
                }
            }
            "expression_statement" => {
                if let Some(info) = expression_require(stmt, source) {
                    imports.push(info);
                }
            }
            _ => {}
        }
    }

    imports
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar_for_extension;

    fn parse(ext: &str, source: &str) -> Tree {
        let language = grammar_for_extension(ext).unwrap();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&language).unwrap();
        parser.parse(source.as_bytes(), None).unwrap()
    }

    fn extract(ext: &str, source: &str) -> Vec<ImportInfo> {
        extract_imports(&parse(ext, source), source.as_bytes())
    }

    #[test]
    fn named_imports_keep_imported_name_not_alias() {
        let imports = extract("ts", "import { useState, useEffect as UE } from 'react';");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "react");
        assert_eq!(imports[0].bindings, vec!["useState", "useEffect"]);
    }

    #[test]
    fn default_import_is_tagged() {
        let imports = extract("ts", "import React from 'react';");
        assert_eq!(imports[0].bindings, vec!["React (default)"]);
    }

    #[test]
    fn namespace_import_is_starred() {
        let imports = extract("ts", "import * as path from 'path';");
        assert_eq!(imports[0].bindings, vec!["* as path"]);
    }

    #[test]
    fn combined_default_and_named_in_source_order() {
        let imports = extract("tsx", "import React, { useState } from 'react';");
        assert_eq!(imports[0].bindings, vec!["React (default)", "useState"]);
    }

    #[test]
    fn side_effect_import_has_no_bindings() {
        let imports = extract("ts", "import './polyfill';");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "./polyfill");
        assert!(imports[0].bindings.is_empty());
    }

    #[test]
    fn const_require_binds_declarator_name() {
        let imports = extract("js", "const fs = require('fs');");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "fs");
        assert_eq!(imports[0].bindings, vec!["fs"]);
    }

    #[test]
    fn bare_require_statement_has_no_bindings() {
        let imports = extract("js", "require('./register');");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "./register");
        assert!(imports[0].bindings.is_empty());
    }

    #[test]
    fn destructured_require_keeps_edge_without_binding() {
        let imports = extract("js", "const { join } = require('path');");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifier, "path");
        assert!(imports[0].bindings.is_empty());
    }

    #[test]
    fn dynamic_require_argument_is_ignored() {
        let imports = extract("js", "const m = require(moduleName);");
        assert!(imports.is_empty());
        let imports = extract("js", "const m = require(`./${name}`);");
        assert!(imports.is_empty());
    }

    #[test]
    fn nested_require_is_not_collected() {
        let src = "function load() { const x = require('./lazy'); return x; }";
        assert!(extract("js", src).is_empty());
    }

    #[test]
    fn statements_are_extracted_in_source_order() {
        let src = "import a from './a';\nconst b = require('./b');\nimport { c } from './c';";
        let imports = extract("ts", src);
        let specifiers: Vec<_> = imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specifiers, vec!["./a", "./b", "./c"]);
    }

    #[test]
    fn jsx_source_parses_with_tsx_grammar() {
        let src = "import App from './App';\nexport const x = <App prop={1} />;";
        let imports = extract("tsx", src);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].bindings, vec!["App (default)"]);
    }
}
