use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Release version triple (major.minor.revision).
///
/// Ordering is lexicographic over the three components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

/// Which component a validated release increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Revision,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Revision => "revision",
        };
        f.write_str(name)
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("static version pattern"))
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Version {
            major,
            minor,
            revision,
        }
    }

    /// Extract the first `major.minor.revision` group found anywhere in `text`.
    ///
    /// Prefixes and suffixes are ignored, so `"v2.5.0-rc1"` yields `2.5.0`.
    /// Returns `None` when nothing matches or a component overflows.
    pub fn extract(text: &str) -> Option<Self> {
        let captures = version_pattern().captures(text)?;
        let component = |i: usize| captures.get(i)?.as_str().parse::<u32>().ok();

        Some(Version::new(component(1)?, component(2)?, component(3)?))
    }

    /// Parse the current version out of a tag name
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::extract(tag).ok_or_else(|| {
            ReleaseError::tag(format!(
                "no major.minor.revision version found in tag '{}'",
                tag
            ))
        })
    }

    /// Parse a user-supplied version argument
    pub fn from_argument(argument: &str) -> Result<Self> {
        Self::extract(argument)
            .ok_or_else(|| ReleaseError::InvalidVersionArgument(argument.to_string()))
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version::new(self.major + 1, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor + 1, 0),
            VersionBump::Revision => Version::new(self.major, self.minor, self.revision + 1),
        }
    }

    /// Version proposed when no explicit target is given
    pub fn suggested_next(&self) -> Self {
        self.bump(VersionBump::Revision)
    }

    /// Check that `next` is a single-step release after `self`.
    ///
    /// Rules are exclusive and checked in order: a major change must be
    /// `major + 1` with minor and revision reset to zero, otherwise a minor
    /// change must be `minor + 1` with revision zero, otherwise the revision
    /// must be `revision + 1`.
    pub fn validate_successor(&self, next: &Version) -> Result<VersionBump> {
        let reject = |reason: String| ReleaseError::InvalidIncrement {
            current: *self,
            requested: *next,
            reason,
        };

        if next.major != self.major {
            if Some(next.major) != self.major.checked_add(1) {
                return Err(reject(format!(
                    "major version must go from {} to {}",
                    self.major,
                    u64::from(self.major) + 1
                )));
            }
            if next.minor != 0 || next.revision != 0 {
                return Err(reject(
                    "minor and revision must be 0 after a major increment".to_string(),
                ));
            }
            Ok(VersionBump::Major)
        } else if next.minor != self.minor {
            if Some(next.minor) != self.minor.checked_add(1) {
                return Err(reject(format!(
                    "minor version must go from {} to {}",
                    self.minor,
                    u64::from(self.minor) + 1
                )));
            }
            if next.revision != 0 {
                return Err(reject(
                    "revision must be 0 after a minor increment".to_string(),
                ));
            }
            Ok(VersionBump::Minor)
        } else if Some(next.revision) != self.revision.checked_add(1) {
            Err(reject(format!(
                "revision must go from {} to {}",
                self.revision,
                u64::from(self.revision) + 1
            )))
        } else {
            Ok(VersionBump::Revision)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain() {
        assert_eq!(Version::extract("1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_extract_prefixed_tag() {
        assert_eq!(Version::extract("v0.2.66"), Some(Version::new(0, 2, 66)));
    }

    #[test]
    fn test_extract_ignores_suffix() {
        assert_eq!(Version::extract("v2.5.0-rc1"), Some(Version::new(2, 5, 0)));
    }

    #[test]
    fn test_extract_first_match_wins() {
        assert_eq!(
            Version::extract("release-1.2.3-from-0.9.9"),
            Some(Version::new(1, 2, 3))
        );
    }

    #[test]
    fn test_extract_rejects_short_versions() {
        assert_eq!(Version::extract("v1.2"), None);
        assert_eq!(Version::extract(""), None);
        assert_eq!(Version::extract("latest"), None);
    }

    #[test]
    fn test_extract_overflow_is_none() {
        assert_eq!(Version::extract("99999999999.0.0"), None);
    }

    #[test]
    fn test_from_tag_error() {
        let err = Version::from_tag("nightly").unwrap_err();
        assert!(matches!(err, ReleaseError::Tag(_)));
        assert!(err.to_string().contains("nightly"));
    }

    #[test]
    fn test_from_argument_error() {
        let err = Version::from_argument("two.zero").unwrap_err();
        assert_eq!(err.to_string(), "can't parse version number two.zero");
    }

    #[test]
    fn test_suggested_next() {
        assert_eq!(
            Version::new(1, 2, 3).suggested_next(),
            Version::new(1, 2, 4)
        );
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Major), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Minor), Version::new(1, 3, 0));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 99));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
        assert!(Version::new(1, 2, 4) > Version::new(1, 2, 3));
    }

    #[test]
    fn test_validate_successor_accepts_single_steps() {
        let current = Version::new(1, 2, 3);
        assert_eq!(
            current.validate_successor(&Version::new(2, 0, 0)).unwrap(),
            VersionBump::Major
        );
        assert_eq!(
            current.validate_successor(&Version::new(1, 3, 0)).unwrap(),
            VersionBump::Minor
        );
        assert_eq!(
            current.validate_successor(&Version::new(1, 2, 4)).unwrap(),
            VersionBump::Revision
        );
    }

    #[test]
    fn test_validate_successor_rejects_skips_and_leftovers() {
        let current = Version::new(1, 2, 3);
        let rejected = [
            Version::new(1, 3, 1),
            Version::new(1, 4, 0),
            Version::new(2, 1, 0),
            Version::new(2, 0, 1),
            Version::new(3, 0, 0),
            Version::new(1, 2, 5),
            Version::new(1, 2, 3),
            Version::new(1, 2, 2),
            Version::new(0, 0, 0),
        ];

        for next in rejected {
            let err = current.validate_successor(&next).unwrap_err();
            assert!(
                matches!(err, ReleaseError::InvalidIncrement { .. }),
                "{} -> {} should be rejected",
                current,
                next
            );
        }
    }

    #[test]
    fn test_validate_successor_only_single_steps_pass() {
        let current = Version::new(1, 1, 1);
        let expected = [
            Version::new(2, 0, 0),
            Version::new(1, 2, 0),
            Version::new(1, 1, 2),
        ];

        for major in 0..4 {
            for minor in 0..4 {
                for revision in 0..4 {
                    let next = Version::new(major, minor, revision);
                    let ok = current.validate_successor(&next).is_ok();
                    assert_eq!(ok, expected.contains(&next), "{} -> {}", current, next);
                }
            }
        }
    }

    #[test]
    fn test_validate_successor_at_component_limit() {
        let current = Version::new(u32::MAX, 0, 0);
        assert!(current.validate_successor(&Version::new(0, 0, 0)).is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(3, 1, 7).to_string(), "3.1.7");
        assert_eq!(VersionBump::Minor.to_string(), "minor");
    }
}
