//! Typed construction of git argument vectors
//!
//! Flags are accumulated as tagged variants and serialized to strings only
//! at spawn time, so callers never concatenate raw argument strings.

use std::fmt;

use chrono::NaiveDate;

/// A single git command-line flag, rendered to exactly one argument string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitFlag {
    /// `--depth=N` - shallow clone/fetch truncated to N commits
    Depth(u32),
    /// `--shallow-since=DATE` - shallow history cutoff by date
    ShallowSince(NaiveDate),
    /// `--shallow-exclude=REV` - shallow history cutoff by revision
    ShallowExclude(String),
    /// `--single-branch`
    SingleBranch,
    /// `--no-single-branch`
    NoSingleBranch,
    /// `--bare`
    Bare,
    /// `--mirror`
    Mirror,
    /// `--recurse-submodules`
    RecurseSubmodules,
    /// `--origin=NAME` - name the clone's remote something other than origin
    Origin(String),
    /// `--branch=NAME`
    Branch(String),
    /// `--all`
    All,
    /// `--prune`
    Prune,
    /// `--tags`
    Tags,
    /// `--no-tags`
    NoTags,
    /// `--unshallow`
    Unshallow,
    /// `--rebase`
    Rebase,
    /// `--ff-only`
    FfOnly,
    /// `--no-ff`
    NoFf,
    /// `--autostash`
    Autostash,
    /// `--force`
    Force,
    /// `--force-with-lease`
    ForceWithLease,
    /// `--dry-run`
    DryRun,
    /// `--set-upstream`
    SetUpstream,
    /// `--no-verify`
    NoVerify,
    /// `--output-directory=DIR` - where format-patch writes patch files
    OutputDirectory(String),
    /// `-N` - for format-patch, suffix patches with [PATCH] not [PATCH n/m]
    NoNumbered,
    /// `-p` - for request-pull, include the patch text in the summary
    IncludePatch,
}

impl GitFlag {
    /// Render the flag as a single command-line argument
    pub fn render(&self) -> String {
        match self {
            Self::Depth(n) => format!("--depth={n}"),
            Self::ShallowSince(date) => format!("--shallow-since={}", date.format("%Y-%m-%d")),
            Self::ShallowExclude(rev) => format!("--shallow-exclude={rev}"),
            Self::SingleBranch => "--single-branch".to_string(),
            Self::NoSingleBranch => "--no-single-branch".to_string(),
            Self::Bare => "--bare".to_string(),
            Self::Mirror => "--mirror".to_string(),
            Self::RecurseSubmodules => "--recurse-submodules".to_string(),
            Self::Origin(name) => format!("--origin={name}"),
            Self::Branch(name) => format!("--branch={name}"),
            Self::All => "--all".to_string(),
            Self::Prune => "--prune".to_string(),
            Self::Tags => "--tags".to_string(),
            Self::NoTags => "--no-tags".to_string(),
            Self::Unshallow => "--unshallow".to_string(),
            Self::Rebase => "--rebase".to_string(),
            Self::FfOnly => "--ff-only".to_string(),
            Self::NoFf => "--no-ff".to_string(),
            Self::Autostash => "--autostash".to_string(),
            Self::Force => "--force".to_string(),
            Self::ForceWithLease => "--force-with-lease".to_string(),
            Self::DryRun => "--dry-run".to_string(),
            Self::SetUpstream => "--set-upstream".to_string(),
            Self::NoVerify => "--no-verify".to_string(),
            Self::OutputDirectory(dir) => format!("--output-directory={dir}"),
            Self::NoNumbered => "-N".to_string(),
            Self::IncludePatch => "-p".to_string(),
        }
    }
}

impl fmt::Display for GitFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// An ordered git argument vector: subcommand, then flags, then operands
///
/// Immutable once handed to the runner; serialization to strings happens
/// in [`to_args`](Invocation::to_args) at spawn time.
#[derive(Debug, Clone)]
pub struct Invocation {
    subcommand: String,
    flags: Vec<GitFlag>,
    operands: Vec<String>,
}

impl Invocation {
    /// Start an invocation for a git subcommand (`clone`, `fetch`, ...)
    pub fn new(subcommand: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            flags: Vec::new(),
            operands: Vec::new(),
        }
    }

    /// Append a typed flag
    pub fn flag(mut self, flag: GitFlag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Append several typed flags
    pub fn flags(mut self, flags: impl IntoIterator<Item = GitFlag>) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Append a trailing operand (url, refspec, path, ...)
    pub fn operand(mut self, operand: impl Into<String>) -> Self {
        self.operands.push(operand.into());
        self
    }

    /// The leading subcommand
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Whether a given flag is present
    pub fn has_flag(&self, flag: &GitFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Whether this invocation produces a bare or mirror repository
    ///
    /// Clones of either kind get no post-success config side effects.
    pub fn is_bare_or_mirror(&self) -> bool {
        self.has_flag(&GitFlag::Bare) || self.has_flag(&GitFlag::Mirror)
    }

    /// Serialize to the argument vector passed to the git binary
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(1 + self.flags.len() + self.operands.len());
        args.push(self.subcommand.clone());
        args.extend(self.flags.iter().map(GitFlag::render));
        args.extend(self.operands.iter().cloned());
        args
    }

    /// True when the subcommand name is empty
    pub fn is_empty(&self) -> bool {
        self.subcommand.is_empty()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.to_args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_invocation_ordering() {
        let inv = Invocation::new("clone")
            .flag(GitFlag::Depth(1))
            .flag(GitFlag::SingleBranch)
            .operand("https://example.com/repo.git")
            .operand("/tmp/repo");

        assert_eq!(
            inv.to_args(),
            vec![
                "clone",
                "--depth=1",
                "--single-branch",
                "https://example.com/repo.git",
                "/tmp/repo",
            ]
        );
    }

    #[test]
    fn test_shallow_since_renders_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            GitFlag::ShallowSince(date).render(),
            "--shallow-since=2024-03-15"
        );
    }

    #[test]
    fn test_bare_or_mirror_detection() {
        let plain = Invocation::new("clone").operand("url");
        assert!(!plain.is_bare_or_mirror());

        let bare = Invocation::new("clone").flag(GitFlag::Bare).operand("url");
        assert!(bare.is_bare_or_mirror());

        let mirror = Invocation::new("clone")
            .flag(GitFlag::Mirror)
            .operand("url");
        assert!(mirror.is_bare_or_mirror());
    }

    #[test]
    fn test_display_joins_args() {
        let inv = Invocation::new("push")
            .flag(GitFlag::ForceWithLease)
            .operand("origin")
            .operand("main");
        assert_eq!(inv.to_string(), "git push --force-with-lease origin main");
    }

    fn arb_flag() -> impl Strategy<Value = GitFlag> {
        prop_oneof![
            any::<u32>().prop_map(GitFlag::Depth),
            "[a-z][a-z0-9-]{0,16}".prop_map(GitFlag::Origin),
            "[a-z][a-z0-9/-]{0,16}".prop_map(GitFlag::Branch),
            Just(GitFlag::Bare),
            Just(GitFlag::Mirror),
            Just(GitFlag::SingleBranch),
            Just(GitFlag::ForceWithLease),
            Just(GitFlag::Rebase),
            Just(GitFlag::Prune),
        ]
    }

    proptest! {
        /// Every flag renders to exactly one non-empty argument without spaces
        #[test]
        fn prop_flag_renders_single_argument(flag in arb_flag()) {
            let rendered = flag.render();
            prop_assert!(!rendered.is_empty());
            prop_assert!(!rendered.contains(' '));
        }

        /// Flags always serialize between the subcommand and the operands
        #[test]
        fn prop_args_keep_ordering(flags in proptest::collection::vec(arb_flag(), 0..8)) {
            let inv = Invocation::new("fetch")
                .flags(flags.clone())
                .operand("origin");
            let args = inv.to_args();
            prop_assert_eq!(args.len(), flags.len() + 2);
            prop_assert_eq!(&args[0], "fetch");
            prop_assert_eq!(args.last().unwrap(), "origin");
        }
    }
}
