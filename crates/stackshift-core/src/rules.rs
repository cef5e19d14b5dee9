//! Keyword and lookup tables used by the heuristics
//!
//! All string matching the engine does lives here so each table can be
//! tested and extended on its own. Matching is case-insensitive substring
//! matching unless stated otherwise.

use crate::models::{DetectedPattern, PatternCategory, Severity};

/// Frameworks considered close relatives (same component model or a
/// meta-framework built on top of the other).
pub const FRAMEWORK_FAMILIES: &[&[&str]] = &[
    &["react", "next", "next.js", "nextjs", "preact", "remix", "gatsby"],
    &["vue", "nuxt", "nuxt.js", "nuxtjs", "vitepress", "quasar"],
    &["angular", "angularjs", "angular.js"],
    &["svelte", "sveltekit", "svelte-kit"],
    &["express", "koa", "fastify", "nestjs"],
];

/// Package names that indicate a modern bundler is already in place
pub const MODERN_BUILD_TOOLS: &[&str] = &["vite", "esbuild", "turbopack", "@vitejs/plugin-react"];

/// Substring identifying a React-like source framework
pub const REACT_MARKER: &str = "react";

/// Keywords in a pattern description that signal a breaking migration
pub const BREAKING_KEYWORDS: &[&str] = &["breaking", "major"];

/// Skills every migration needs regardless of stack
pub const ALWAYS_REQUIRED_SKILLS: &[&str] = &["Version control", "Code review"];

/// Pattern-name keywords → required skill
pub const SKILL_KEYWORDS: &[(&[&str], &str)] = &[
    (&["typescript", "type"], "TypeScript"),
    (&["api", "endpoint", "interface"], "API design"),
    (&["state", "redux", "store", "context"], "State management"),
    (&["test", "jest", "enzyme", "mocha"], "Testing frameworks"),
    (&["css", "style", "sass", "less"], "CSS/Styling"),
    (&["router", "routing"], "Routing"),
    (&["webpack", "babel", "bundle", "build"], "Build tooling"),
];

/// Breaking-change notes for the synthetic build-tool setup task
pub const BUILD_TOOL_BREAKING_CHANGES: &[&str] = &[
    "Entry point renamed to match the new build tool conventions",
    "index.html moves from public/ to the project root",
    "npm script commands change (start/build/test)",
];

/// Condition under which a breaking-change note applies to a pattern
#[derive(Debug, Clone, Copy)]
pub enum BreakingChangeCondition {
    /// Pattern name contains any of the keywords
    NameContains(&'static [&'static str]),
    SeverityIs(Severity),
    CategoryIs(PatternCategory),
}

impl BreakingChangeCondition {
    pub fn matches(&self, pattern: &DetectedPattern) -> bool {
        match self {
            Self::NameContains(keywords) => contains_any(&pattern.name, keywords),
            Self::SeverityIs(severity) => pattern.severity == *severity,
            Self::CategoryIs(category) => pattern.category == *category,
        }
    }
}

/// A single breaking-change rule
#[derive(Debug, Clone, Copy)]
pub struct BreakingChangeRule {
    pub condition: BreakingChangeCondition,
    pub note: &'static str,
}

/// Rules deriving `breakingChanges` from a pattern, evaluated in order
pub const BREAKING_CHANGE_RULES: &[BreakingChangeRule] = &[
    BreakingChangeRule {
        condition: BreakingChangeCondition::NameContains(&["api", "interface"]),
        note: "API signatures may change; update call sites",
    },
    BreakingChangeRule {
        condition: BreakingChangeCondition::SeverityIs(Severity::High),
        note: "High-impact change: thorough testing required",
    },
    BreakingChangeRule {
        condition: BreakingChangeCondition::CategoryIs(PatternCategory::Structural),
        note: "File structure changes may break imports",
    },
    BreakingChangeRule {
        condition: BreakingChangeCondition::NameContains(&["deprecated"]),
        note: "Deprecated APIs are removed and must be replaced",
    },
];

/// Breaking-change notes that apply to a pattern
pub fn breaking_changes_for(pattern: &DetectedPattern) -> Vec<String> {
    BREAKING_CHANGE_RULES
        .iter()
        .filter(|rule| rule.condition.matches(pattern))
        .map(|rule| rule.note.to_string())
        .collect()
}

/// True when the pattern's description or severity marks it as breaking
pub fn is_breaking_pattern(pattern: &DetectedPattern) -> bool {
    pattern.severity == Severity::High || contains_any(&pattern.description, BREAKING_KEYWORDS)
}

/// Case-insensitive substring match against any keyword
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords.iter().any(|k| haystack.contains(&k.to_lowercase()))
}

/// True when both frameworks belong to the same family (and differ)
pub fn are_related_frameworks(source: &str, target: &str) -> bool {
    let source = source.trim().to_lowercase();
    let target = target.trim().to_lowercase();
    FRAMEWORK_FAMILIES
        .iter()
        .any(|family| family.contains(&source.as_str()) && family.contains(&target.as_str()))
}

/// Skills triggered by a pattern name
pub fn skills_for_pattern_name(name: &str) -> impl Iterator<Item = &'static str> + '_ {
    SKILL_KEYWORDS
        .iter()
        .filter(move |(keywords, _)| contains_any(name, keywords))
        .map(|(_, skill)| *skill)
}

pub fn is_react_like(framework: &str) -> bool {
    framework.to_lowercase().contains(REACT_MARKER)
}

pub fn is_typescript(language: &str) -> bool {
    let language = language.trim().to_lowercase();
    language == "ts" || language.contains("typescript")
}

/// True when any dependency name is a known modern build tool
pub fn has_modern_build_tool<'a>(mut dependency_names: impl Iterator<Item = &'a String>) -> bool {
    dependency_names.any(|name| MODERN_BUILD_TOOLS.contains(&name.as_str()))
}

/// Entry point the build-tool setup should target
///
/// Priority: React+JavaScript → `src/main.jsx`, React+TypeScript →
/// `src/main.tsx`, TypeScript without React → `src/index.ts`, otherwise
/// `src/index.js`.
pub fn entry_point_for(framework: &str, language: &str) -> &'static str {
    match (is_react_like(framework), is_typescript(language)) {
        (true, false) => "src/main.jsx",
        (true, true) => "src/main.tsx",
        (false, true) => "src/index.ts",
        (false, false) => "src/index.js",
    }
}
