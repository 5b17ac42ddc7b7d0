//! Import line classification.
//!
//! A heuristic over single lines, not a parser: any line that is only a
//! quoted string counts, even outside an `import ( .. )` block.

use std::sync::LazyLock;

use regex::Regex;

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

/// `import` at line start or after a space or quote, followed by a space or
/// a quote. Tabs do not delimit the keyword.
static IMPORT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r#"(?:^|[ "'])import[ "']"#));

/// A lone quoted string with an optional trailing `//` comment.
static QUOTED_PATH: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r#"^(?:"[^"]*"|'[^']*')\s*(?://.*)?$"#));

/// Whether `line` looks like part of an import statement.
#[must_use]
pub fn is_import_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    IMPORT_KEYWORD.is_match(trimmed) || QUOTED_PATH.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_statement_forms() {
        assert!(is_import_line(r#"import "fmt""#));
        assert!(is_import_line(r#"import"fmt""#));
        assert!(is_import_line("import 'fmt'"));
        assert!(is_import_line(r#"    import alias "github.com/co/repo""#));
        assert!(is_import_line("import ("));
    }

    #[test]
    fn test_mid_line_keyword() {
        assert!(is_import_line(r#"package main; import "fmt""#));
        assert!(is_import_line(r#"var s = "a"import "os""#));
        assert!(!is_import_line("import\t\"os\""));
        assert!(!is_import_line("x := 1;\timport\t\"os\""));
        assert!(!is_import_line("reimport(\"x\")"));
        assert!(!is_import_line("importer.Load()"));
    }

    #[test]
    fn test_block_members() {
        assert!(is_import_line(r#"	"context""#));
        assert!(is_import_line(r#"    "github.com/co/repo" // pinned"#));
        assert!(is_import_line("    'single'"));
        assert!(is_import_line(r#""x"   "#));
    }

    #[test]
    fn test_aliased_block_member_is_not_quoted_only() {
        assert!(!is_import_line(r#"    repo "github.com/co/repo""#));
        assert!(!is_import_line(r#"    _ "github.com/lib/pq""#));
    }

    #[test]
    fn test_non_import_lines() {
        assert!(!is_import_line(""));
        assert!(!is_import_line("   \t"));
        assert!(!is_import_line(")"));
        assert!(!is_import_line("  )  "));
        assert!(!is_import_line("("));
        assert!(!is_import_line("func main() {"));
        assert!(!is_import_line(r#"fmt.Println("hello")"#));
        assert!(!is_import_line(r#""a" + "b""#));
        assert!(!is_import_line(r#""x" /* block */"#));
    }

    #[test]
    fn test_quoted_string_false_positive_is_kept() {
        // A bare string in a multi-line call is not an import, but it is accepted.
        assert!(is_import_line(r#"        "github.com/co/repo""#));
    }
}
