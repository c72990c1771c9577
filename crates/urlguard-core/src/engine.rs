//! Rule compilation and request evaluation.
//!
//! Rules are evaluated in order. The first rule whose path pattern matches
//! the whole request path and which does not exempt the principal blocks the
//! request; no later rule is consulted. Patterns that fail to compile never
//! block: a broken path pattern disables its rule, a broken exclusion token
//! only keeps its literal-equality half.
//!
//! The `regex` engine matches in linear time, so a hostile pattern cannot
//! backtrack catastrophically. Compiled program size is capped instead.

use regex::{Regex, RegexBuilder};
use regex_syntax::hir::{Hir, Look};
use regex_syntax::Parser;
use serde::Serialize;

use crate::error::{Result, UrlGuardError};
use crate::rule::{PatternField, Rule};

/// Upper bound for one compiled pattern (bytes of compiled program).
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Outcome of evaluating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Blocked by the rule at this position.
    Block { rule: usize },
}

impl Decision {
    pub fn is_block(self) -> bool {
        matches!(self, Decision::Block { .. })
    }
}

/// A pattern that did not compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternDiagnostic {
    pub rule: usize,
    pub field: PatternField,
    pub pattern: String,
    pub reason: String,
}

impl From<PatternDiagnostic> for UrlGuardError {
    fn from(d: PatternDiagnostic) -> Self {
        UrlGuardError::InvalidPattern {
            rule: d.rule,
            field: d.field,
            pattern: d.pattern,
            reason: d.reason,
        }
    }
}

/// Compile `pattern` so that it only matches a whole input string.
///
/// Anchors are added to the parsed pattern, not to its text: a textual
/// wrapper can be swallowed by a trailing `(?x)` comment or recombined with
/// an unbalanced group such as `a)|(b`.
fn compile_whole(pattern: &str) -> std::result::Result<Regex, String> {
    RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| e.to_string())?;
    let hir = Parser::new().parse(pattern).map_err(|e| e.to_string())?;
    let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
    RegexBuilder::new(&anchored.to_string())
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| e.to_string())
}

/// One exclusion token in dual mode: literal name, then whole-string regex.
#[derive(Debug, Clone)]
struct Exemption {
    literal: String,
    pattern: Option<Regex>,
}

impl Exemption {
    fn compile(token: &str) -> (Self, Option<String>) {
        match compile_whole(token) {
            Ok(re) => (
                Self { literal: token.to_string(), pattern: Some(re) },
                None,
            ),
            Err(e) => (Self { literal: token.to_string(), pattern: None }, Some(e)),
        }
    }

    fn admits(&self, principal: &str) -> bool {
        principal == self.literal
            || self.pattern.as_ref().is_some_and(|re| re.is_match(principal))
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    /// `None` => broken path pattern, rule never matches.
    path: Option<Regex>,
    exemptions: Vec<Exemption>,
}

impl CompiledRule {
    fn matches_path(&self, path: &str) -> bool {
        self.path.as_ref().is_some_and(|re| re.is_match(path))
    }

    fn exempts(&self, principal: &str) -> bool {
        self.exemptions.iter().any(|e| e.admits(principal))
    }
}

/// Immutable compiled snapshot of an ordered rule sequence.
///
/// Build once per configuration change, then share (e.g. behind an `Arc`)
/// between any number of concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    compiled: Vec<CompiledRule>,
    diagnostics: Vec<PatternDiagnostic>,
}

impl RuleSet {
    /// Compile every rule. Never fails; patterns that do not compile are
    /// recorded in [`RuleSet::diagnostics`].
    pub fn compile(rules: Vec<Rule>) -> Self {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut diagnostics = Vec::new();

        for (idx, rule) in rules.iter().enumerate() {
            let path = match compile_whole(&rule.pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    diagnostics.push(PatternDiagnostic {
                        rule: idx,
                        field: PatternField::Path,
                        pattern: rule.pattern.clone(),
                        reason: e,
                    });
                    None
                }
            };

            let mut exemptions = Vec::new();
            for tok in rule.exclusion_tokens() {
                let (ex, err) = Exemption::compile(tok);
                if let Some(e) = err {
                    diagnostics.push(PatternDiagnostic {
                        rule: idx,
                        field: PatternField::Exclusion,
                        pattern: tok.to_string(),
                        reason: e,
                    });
                }
                exemptions.push(ex);
            }

            compiled.push(CompiledRule { path, exemptions });
        }

        Self { rules, compiled, diagnostics }
    }

    /// Compile and refuse any rule sequence with a pattern that does not compile.
    pub fn compile_strict(rules: Vec<Rule>) -> Result<Self> {
        let set = Self::compile(rules);
        match set.diagnostics.first() {
            Some(d) => Err(d.clone().into()),
            None => Ok(set),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn diagnostics(&self) -> &[PatternDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate `path` for `principal`, naming the deciding rule on block.
    pub fn decide(&self, path: &str, principal: &str) -> Decision {
        for (idx, rule) in self.compiled.iter().enumerate() {
            if !rule.matches_path(path) {
                continue;
            }
            if rule.exempts(principal) {
                tracing::trace!(rule = idx, %principal, "path matched, principal exempt");
                continue;
            }
            return Decision::Block { rule: idx };
        }
        Decision::Allow
    }

    /// `true` => block.
    pub fn evaluate(&self, path: &str, principal: &str) -> bool {
        self.decide(path, principal).is_block()
    }
}

/// Decide whether `path` is blocked for `principal` under `rules`.
///
/// Same semantics as [`RuleSet::evaluate`], but compiles patterns on the fly
/// and only as far as evaluation actually reaches. Prefer a [`RuleSet`] on hot
/// paths.
pub fn evaluate(path: &str, principal: &str, rules: &[Rule]) -> bool {
    rules.iter().any(|rule| {
        let Ok(re) = compile_whole(&rule.pattern) else {
            return false;
        };
        re.is_match(path)
            && !rule.exclusion_tokens().any(|tok| {
                tok == principal || compile_whole(tok).is_ok_and(|re| re.is_match(principal))
            })
    })
}
