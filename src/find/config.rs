//! Configuration types consumed by the walker

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ArgError;

/// How an entry's age is compared against the requested number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeComparison {
    /// `+N`: modified more than N minutes ago
    Greater,
    /// `-N`: modified less than N minutes ago
    Less,
    /// `N`: modified exactly N minutes ago, to the second
    Exactly,
}

/// Modification-age criterion, written `[+|-]MINUTES` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModAge {
    pub comparison: AgeComparison,
    pub minutes: u64,
}

impl ModAge {
    pub fn new(comparison: AgeComparison, minutes: u64) -> Self {
        Self {
            comparison,
            minutes,
        }
    }

    /// Threshold in seconds.
    pub fn threshold_secs(&self) -> i64 {
        i64::try_from(self.minutes.saturating_mul(60)).unwrap_or(i64::MAX)
    }

    /// Check an age (in whole seconds) against this criterion.
    pub fn matches(&self, age_secs: i64) -> bool {
        let threshold = self.threshold_secs();
        match self.comparison {
            AgeComparison::Greater => age_secs > threshold,
            AgeComparison::Less => age_secs < threshold,
            AgeComparison::Exactly => age_secs == threshold,
        }
    }
}

impl FromStr for ModAge {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArgError::InvalidModAge(s.to_string());
        let (comparison, digits) = match s.as_bytes().first() {
            Some(b'+') => (AgeComparison::Greater, &s[1..]),
            Some(b'-') => (AgeComparison::Less, &s[1..]),
            Some(c) if c.is_ascii_digit() => (AgeComparison::Exactly, s),
            _ => return Err(invalid()),
        };
        // u64::from_str would accept a second sign
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let minutes = digits.parse().map_err(|_| invalid())?;
        Ok(Self::new(comparison, minutes))
    }
}

impl fmt::Display for ModAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.comparison {
            AgeComparison::Greater => write!(f, "+{}", self.minutes),
            AgeComparison::Less => write!(f, "-{}", self.minutes),
            AgeComparison::Exactly => write!(f, "{}", self.minutes),
        }
    }
}

/// A single selection criterion, borrowed from its [`Criteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion<'a> {
    Name(&'a str),
    ModAge(ModAge),
    Inode(u64),
}

impl Criterion<'_> {
    /// Whether evaluating this criterion needs a `stat` of the entry.
    pub fn needs_stat(&self) -> bool {
        !matches!(self, Criterion::Name(_))
    }
}

/// Optional selection criteria.
///
/// These are not combined. Only the highest-priority criterion that is set
/// is evaluated, in the order name, modification age, inode; see
/// [`Criteria::active`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub name: Option<String>,
    pub mod_age: Option<ModAge>,
    pub inode: Option<u64>,
}

impl Criteria {
    /// No criteria: everything is selected.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_mod_age(mod_age: ModAge) -> Self {
        Self {
            mod_age: Some(mod_age),
            ..Self::default()
        }
    }

    pub fn by_inode(inode: u64) -> Self {
        Self {
            inode: Some(inode),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_none()
    }

    /// The criterion that decides selection, or `None` if nothing is set.
    pub fn active(&self) -> Option<Criterion<'_>> {
        if let Some(name) = &self.name {
            Some(Criterion::Name(name))
        } else if let Some(age) = self.mod_age {
            Some(Criterion::ModAge(age))
        } else {
            self.inode.map(Criterion::Inode)
        }
    }
}

/// Effect applied to each selected entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Action {
    /// Print the path, one per line
    #[default]
    Print,
    /// Remove the file or (empty) directory
    Delete,
    /// Run the viewer on the path and forward its output
    View,
    /// Run the mover with the path and a destination
    Move { destination: PathBuf },
}

/// Immutable configuration threaded through a walk.
#[derive(Debug, Clone)]
pub struct FindConfig {
    pub criteria: Criteria,
    pub action: Action,
    /// Descend through symlinks to directories, with cycle detection
    pub follow_links: bool,
    /// Program run by [`Action::View`]
    pub viewer: String,
    /// Program run by [`Action::Move`]
    pub mover: String,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            criteria: Criteria::none(),
            action: Action::Print,
            follow_links: false,
            viewer: "cat".to_string(),
            mover: "mv".to_string(),
        }
    }
}
