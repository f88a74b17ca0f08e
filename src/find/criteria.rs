//! Criteria evaluation
//!
//! Criteria are a priority list, not a conjunction: the first criterion that is
//! set (name, then modification age, then inode) alone decides selection.

use std::time::{SystemTime, UNIX_EPOCH};

use super::config::{Criteria, Criterion};
use super::entry::EntryMetadata;

/// Decide whether `entry` is selected by `criteria`, measuring ages from `now`.
///
/// An entry whose stat could not be read never matches an age or inode
/// criterion. Callers must [`EntryMetadata::probe`] the entry first when
/// [`Criterion::needs_stat`] is true.
pub fn evaluate(entry: &EntryMetadata, criteria: &Criteria, now: SystemTime) -> bool {
    match criteria.active() {
        None => true,
        Some(Criterion::Name(name)) => entry.name == name,
        Some(Criterion::ModAge(age)) => entry
            .stat()
            .is_some_and(|stat| age.matches(age_secs(now, stat.modified))),
        Some(Criterion::Inode(inode)) => entry.stat().is_some_and(|stat| stat.inode == inode),
    }
}

/// Whole seconds elapsed between `modified` and `now`, both truncated to the
/// second. Negative when `modified` is in the future.
pub fn age_secs(now: SystemTime, modified: SystemTime) -> i64 {
    epoch_secs(now).saturating_sub(epoch_secs(modified))
}

fn epoch_secs(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        // Before the epoch: round towards negative infinity like time_t
        Err(e) => {
            let d = e.duration();
            let secs = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
            if d.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::config::{AgeComparison, ModAge};
    use crate::find::entry::Stat;
    use std::path::PathBuf;
    use std::time::Duration;

    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn entry(name: &str, inode: u64, age: Duration) -> EntryMetadata {
        EntryMetadata::new(name.into(), PathBuf::from(format!("./{}", name)), false).with_stat(
            Stat {
                inode,
                modified: now() - age,
            },
        )
    }

    fn unreadable(name: &str) -> EntryMetadata {
        let mut e = EntryMetadata::new(name.into(), PathBuf::from(name), false);
        e.stat = Some(Err(crate::error::FindError::Metadata {
            path: PathBuf::from(name),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }));
        e
    }

    #[test]
    fn test_no_criteria_matches_everything() {
        assert!(evaluate(
            &entry("a", 1, Duration::ZERO),
            &Criteria::none(),
            now()
        ));
        assert!(evaluate(&unreadable("b"), &Criteria::none(), now()));
    }

    #[test]
    fn test_name_is_exact() {
        let criteria = Criteria::by_name("main.rs");
        assert!(evaluate(&entry("main.rs", 1, Duration::ZERO), &criteria, now()));
        assert!(!evaluate(&entry("main.rss", 1, Duration::ZERO), &criteria, now()));
        assert!(!evaluate(&entry("Main.rs", 1, Duration::ZERO), &criteria, now()));
        // No wildcard interpretation
        assert!(!evaluate(
            &entry("main.rs", 1, Duration::ZERO),
            &Criteria::by_name("*.rs"),
            now()
        ));
    }

    #[test]
    fn test_mod_age_ten_minutes_old() {
        let e = entry("f", 1, Duration::from_secs(600));
        let by = |s: &str| Criteria::by_mod_age(s.parse().unwrap());

        assert!(evaluate(&e, &by("+5"), now()));
        assert!(!evaluate(&e, &by("-5"), now()));
        assert!(evaluate(&e, &by("-11"), now()));
        assert!(evaluate(&e, &by("10"), now()));
        assert!(!evaluate(&e, &by("9"), now()));
    }

    #[test]
    fn test_mod_age_exact_needs_whole_second_equality() {
        let e = entry("f", 1, Duration::from_secs(601));
        assert!(!evaluate(
            &e,
            &Criteria::by_mod_age(ModAge::new(AgeComparison::Exactly, 10)),
            now()
        ));
    }

    #[test]
    fn test_inode_match() {
        let criteria = Criteria::by_inode(42);
        assert!(evaluate(&entry("x", 42, Duration::ZERO), &criteria, now()));
        assert!(!evaluate(&entry("y", 43, Duration::ZERO), &criteria, now()));
    }

    #[test]
    fn test_name_shadows_other_criteria() {
        let criteria = Criteria {
            name: Some("keep".into()),
            mod_age: Some(ModAge::new(AgeComparison::Greater, 1000)),
            inode: Some(999),
        };
        // Age and inode would both reject this entry
        assert!(evaluate(&entry("keep", 1, Duration::ZERO), &criteria, now()));
        // And would both accept this one
        assert!(!evaluate(
            &entry("other", 999, Duration::from_secs(1_000_000)),
            &criteria,
            now()
        ));
    }

    #[test]
    fn test_mod_age_shadows_inode() {
        let criteria = Criteria {
            name: None,
            mod_age: Some(ModAge::new(AgeComparison::Less, 5)),
            inode: Some(7),
        };
        assert!(!evaluate(&entry("old", 7, Duration::from_secs(3600)), &criteria, now()));
        assert!(evaluate(&entry("new", 8, Duration::ZERO), &criteria, now()));
    }

    #[test]
    fn test_stat_failure_is_not_a_match() {
        assert!(!evaluate(&unreadable("a"), &Criteria::by_inode(1), now()));
        assert!(!evaluate(
            &unreadable("a"),
            &Criteria::by_mod_age(ModAge::new(AgeComparison::Less, 1_000_000)),
            now()
        ));
        // Name needs no stat
        assert!(evaluate(&unreadable("a"), &Criteria::by_name("a"), now()));
    }

    #[test]
    fn test_age_secs_truncates_to_whole_seconds() {
        let modified = UNIX_EPOCH + Duration::from_millis(1_000_500);
        let now = UNIX_EPOCH + Duration::from_millis(1_600_100);
        assert_eq!(age_secs(now, modified), 600);
        // Future mtime gives a negative age
        assert_eq!(age_secs(modified, now), -600);
    }
}
