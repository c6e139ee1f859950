//! Path classification into [`ChangeGroup`]s.
//!
//! Rules are evaluated top to bottom and the first match wins, so a markdown
//! file under `.github/` is CI and a `*.test.md` file is docs.

use super::ChangeGroup;

/// Directory prefixes holding CI configuration.
const CI_DIRS: &[&str] = &[".github/", ".gitlab/", ".circleci/", ".buildkite/"];

/// Root-level CI configuration files.
const CI_FILES: &[&str] = &[
    ".gitlab-ci.yml",
    ".travis.yml",
    "azure-pipelines.yml",
    "Jenkinsfile",
];

const DOC_DIRS: &[&str] = &["docs/", "doc/"];

/// Root-level documentation file stems, compared case-insensitively.
const DOC_ROOT_STEMS: &[&str] = &["readme", "changelog", "contributing", "license"];

const DOC_EXTENSIONS: &[&str] = &[".md", ".mdx"];

const TEST_DIRS: &[&str] = &["tests/", "test/", "__tests__/", "spec/"];

const NESTED_TEST_DIRS: &[&str] = &["/tests/", "/__tests__/"];

/// Language-specific test file suffixes.
const TEST_SUFFIXES: &[&str] = &[
    "_test.rs",
    "_test.go",
    "_test.py",
    "_spec.rb",
    "Test.java",
    "Tests.cs",
];

const LOCKFILES: &[&str] = &[
    "Cargo.lock",
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "Gemfile.lock",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "go.sum",
    "uv.lock",
    "flake.lock",
    "mix.lock",
    "pubspec.lock",
    "Package.resolved",
];

const BUILD_FILES: &[&str] = &[
    "Cargo.toml",
    "build.rs",
    "package.json",
    "tsconfig.json",
    "go.mod",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "Makefile",
    "CMakeLists.txt",
    "Dockerfile",
    "build.gradle",
    "build.gradle.kts",
    "pom.xml",
    "Gemfile",
    ".eslintrc",
    ".babelrc",
    ".prettierrc",
];

/// Bundler, linter and test-runner config basenames, matched as prefixes
/// so every extension variant (`.js`, `.cjs`, `.mjs`, `.ts`, `.json`) counts.
const BUILD_PREFIXES: &[&str] = &[
    "tsconfig.",
    "eslint.config.",
    ".eslintrc.",
    "vite.config.",
    "vitest.config.",
    "rollup.config.",
    "webpack.config.",
    "babel.config.",
    "jest.config.",
    "prettier.config.",
    ".prettierrc.",
];

const CHORE_DIRS: &[&str] = &[".vscode/", ".idea/"];

const CHORE_FILES: &[&str] = &[
    ".editorconfig",
    ".gitignore",
    ".gitattributes",
    ".npmrc",
    ".nvmrc",
    ".dockerignore",
    ".prettierignore",
    ".eslintignore",
];

/// A single classification rule: if `matches` returns true, the path
/// belongs to `group`.
pub struct Rule {
    pub group: ChangeGroup,
    matches: fn(&Candidate<'_>) -> bool,
}

impl Rule {
    pub fn matches(&self, path: &str) -> bool {
        (self.matches)(&Candidate::new(path))
    }
}

/// Rules in precedence order. [`ChangeGroup::Code`] is the fallback and has
/// no rule of its own.
pub static RULES: &[Rule] = &[
    Rule { group: ChangeGroup::Ci, matches: is_ci },
    Rule { group: ChangeGroup::Docs, matches: is_docs },
    Rule { group: ChangeGroup::Tests, matches: is_tests },
    Rule { group: ChangeGroup::Deps, matches: is_deps },
    Rule { group: ChangeGroup::Build, matches: is_build },
    Rule { group: ChangeGroup::Chore, matches: is_chore },
];

/// A normalized path and its basename.
struct Candidate<'a> {
    path: &'a str,
    basename: &'a str,
}

impl<'a> Candidate<'a> {
    fn new(raw: &'a str) -> Self {
        let path = normalize(raw);
        let basename = path.rsplit('/').next().unwrap_or(path);
        Self { path, basename }
    }

    fn is_root_level(&self) -> bool {
        !self.path.contains('/')
    }
}

/// Strip any leading `./` components.
pub fn normalize(path: &str) -> &str {
    path.trim_start_matches("./")
}

/// Classify a repository-relative path into exactly one group.
pub fn classify(path: &str) -> ChangeGroup {
    let candidate = Candidate::new(path);
    RULES
        .iter()
        .find(|rule| (rule.matches)(&candidate))
        .map(|rule| rule.group)
        .unwrap_or(ChangeGroup::Code)
}

fn is_ci(c: &Candidate<'_>) -> bool {
    CI_DIRS.iter().any(|d| c.path.starts_with(d))
        || (c.is_root_level() && CI_FILES.contains(&c.basename))
}

fn is_docs(c: &Candidate<'_>) -> bool {
    if DOC_DIRS.iter().any(|d| c.path.starts_with(d)) {
        return true;
    }

    let lower = c.basename.to_ascii_lowercase();
    if DOC_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return true;
    }

    if c.is_root_level() {
        let stem = lower.split('.').next().unwrap_or(&lower);
        return DOC_ROOT_STEMS.contains(&stem);
    }

    false
}

fn is_tests(c: &Candidate<'_>) -> bool {
    if TEST_DIRS.iter().any(|d| c.path.starts_with(d))
        || NESTED_TEST_DIRS.iter().any(|d| c.path.contains(d))
    {
        return true;
    }

    // `name.test.ts`, `name.spec.js`: the marker must sit right before the extension.
    if let Some((stem, _ext)) = c.basename.rsplit_once('.') {
        if stem.ends_with(".test") || stem.ends_with(".spec") {
            return true;
        }
    }

    if c.basename.starts_with("test_") && c.basename.ends_with(".py") {
        return true;
    }

    TEST_SUFFIXES.iter().any(|s| c.basename.ends_with(s))
}

fn is_deps(c: &Candidate<'_>) -> bool {
    LOCKFILES.contains(&c.basename)
}

fn is_build(c: &Candidate<'_>) -> bool {
    BUILD_FILES.contains(&c.basename) || BUILD_PREFIXES.iter().any(|p| c.basename.starts_with(p))
}

fn is_chore(c: &Candidate<'_>) -> bool {
    CHORE_DIRS.iter().any(|d| c.path.starts_with(d)) || CHORE_FILES.contains(&c.basename)
}
