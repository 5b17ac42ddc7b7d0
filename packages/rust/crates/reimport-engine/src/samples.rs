//! Built-in Go import shapes for trying a rule before saving it.

use serde::Serialize;

use crate::replace::test_rule;
use crate::rule::Rule;
use crate::types::RuleTestOutcome;

/// Import path used when a rule has no usable `from`.
pub const DEFAULT_SAMPLE_PATH: &str = "github.com/company/repo";

/// A named snippet of Go import code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleCase {
    /// Short label.
    pub name: &'static str,
    /// What the snippet exercises.
    pub description: &'static str,
    /// Go source.
    pub content: String,
}

/// A sample together with the rule's outcome on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleOutcome {
    /// Sample that was tested.
    pub case: SampleCase,
    /// Result of applying the rule.
    pub outcome: RuleTestOutcome,
}

/// Sample snippets built around `path`.
#[must_use]
pub fn sample_cases(path: &str) -> Vec<SampleCase> {
    let p = path;
    vec![
        SampleCase {
            name: "single-line import",
            description: "one import statement on one line",
            content: format!("import \"{p}\""),
        },
        SampleCase {
            name: "import block",
            description: "multi-line import block with several packages",
            content: format!(
                "import (\n    \"context\"\n    \"fmt\"\n    \"{p}\"\n    \"github.com/company/another-repo\"\n)"
            ),
        },
        SampleCase {
            name: "trailing comment",
            description: "import block entry followed by a line comment",
            content: format!(
                "import (\n    \"context\"\n    \"fmt\"\n    \"{p}\" // pinned\n    \"github.com/company/another-repo\"\n)"
            ),
        },
        SampleCase {
            name: "grouped block",
            description: "block split into stdlib, third-party and local groups",
            content: format!(
                "import (\n    \"context\"\n    \"fmt\"\n    \"time\"\n\n    \"github.com/example/third-party-lib\"\n    \"{p}\"\n    \"{p}/internal/svc\"\n    \"{p}/internal/types\"\n    \"{p}/common/errorx\"\n\n    \"github.com/example/framework/core/logx\"\n)"
            ),
        },
        SampleCase {
            name: "mixed forms",
            description: "single-line imports followed by a block",
            content: format!(
                "import \"context\"\nimport \"fmt\"\nimport (\n    \"{p}\"\n    \"github.com/company/another-repo\"\n)"
            ),
        },
        SampleCase {
            name: "aliased import",
            description: "block entries with package aliases",
            content: format!(
                "import (\n    \"context\"\n    \"fmt\"\n    repo \"{p}\"\n    another \"github.com/company/another-repo\"\n)"
            ),
        },
        SampleCase {
            name: "dot and blank import",
            description: "dot import and blank identifier import",
            content: format!(
                "import (\n    \"context\"\n    \"fmt\"\n    . \"{p}\"\n    _ \"github.com/company/another-repo\"\n)"
            ),
        },
        SampleCase {
            name: "versioned path",
            description: "module paths carrying a major version suffix",
            content: format!(
                "import (\n    \"context\"\n    \"fmt\"\n    \"{p}/v2\"\n    \"github.com/company/another-repo/v1.0.0\"\n)"
            ),
        },
    ]
}

/// Try `rule` against every sample built around its own `from`.
#[must_use]
pub fn run_samples(rule: &Rule) -> Vec<SampleOutcome> {
    let path = if rule.from.trim().is_empty() {
        DEFAULT_SAMPLE_PATH
    } else {
        rule.from.as_str()
    };

    sample_cases(path)
        .into_iter()
        .map(|case| {
            let outcome = test_rule(rule, &case.content);
            SampleOutcome { case, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_embed_path() {
        let cases = sample_cases("example.org/x");
        assert_eq!(cases.len(), 8);
        assert!(cases.iter().all(|c| c.content.contains("example.org/x")));
    }

    #[test]
    fn test_run_samples_rewrites_every_case() {
        let rule = Rule::new("local", "github.com/co/repo", "./local/repo");
        let outcomes = run_samples(&rule);
        assert!(outcomes.iter().all(|o| o.outcome.success));
        assert!(
            outcomes
                .iter()
                .all(|o| !o.outcome.result.contains("github.com/co/repo"))
        );
    }

    #[test]
    fn test_run_samples_with_blank_rule() {
        let outcomes = run_samples(&Rule::new("blank", "", "x"));
        assert!(outcomes.iter().all(|o| !o.outcome.success));
        assert!(outcomes[0].case.content.contains(DEFAULT_SAMPLE_PATH));
    }
}
