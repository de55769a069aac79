//! npm range expressions.
//!
//! A range is one or more comparator sets joined by `||`. A set is a
//! whitespace-separated list of comparators that must all hold. Before
//! matching, every shorthand is desugared into plain comparators:
//!
//! | Written          | Desugared                    |
//! |------------------|------------------------------|
//! | `^1.2.3`         | `>=1.2.3 <2.0.0-0`           |
//! | `^0.2.3`         | `>=0.2.3 <0.3.0-0`           |
//! | `^0.0.3`         | `>=0.0.3 <0.0.4-0`           |
//! | `~1.2.3`         | `>=1.2.3 <1.3.0-0`           |
//! | `~1`             | `>=1.0.0 <2.0.0-0`           |
//! | `1.x`, `1`       | `>=1.0.0 <2.0.0-0`           |
//! | `>1.2`           | `>=1.3.0`                    |
//! | `<=1.2`          | `<1.3.0-0`                   |
//! | `1.2.3 - 2.3`    | `>=1.2.3 <2.4.0-0`           |
//! | `*`, empty       | any release                  |
//!
//! A version with a pre-release tag only satisfies a set if some comparator
//! in that set carries a pre-release on the same `major.minor.patch`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease};

use crate::error::{Error, Result};
use crate::version::Version;

static PARTIAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(0|[1-9][0-9]*|[xX*])(?:\.(0|[1-9][0-9]*|[xX*])(?:\.(0|[1-9][0-9]*|[xX*])(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?)?)?$",
    )
    .unwrap()
});

/// Smallest possible pre-release tag: `<X.Y.Z-0` excludes every
/// pre-release of `X.Y.Z`.
static LOWEST_PRE: LazyLock<Prerelease> = LazyLock::new(|| Prerelease::new("0").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Comparator {
    Any,
    Bound { op: Op, version: Version },
}

impl Comparator {
    fn bound(op: Op, version: Version) -> Self {
        Self::Bound { op, version }
    }

    fn matches(&self, candidate: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::Bound { op, version } => match op {
                Op::Lt => candidate < version,
                Op::Lte => candidate <= version,
                Op::Gt => candidate > version,
                Op::Gte => candidate >= version,
                Op::Eq => candidate == version,
            },
        }
    }

    fn prerelease_anchor(&self) -> Option<&Version> {
        match self {
            Self::Bound { version, .. } if version.is_prerelease() => Some(version),
            _ => None,
        }
    }
}

/// A comparator no version satisfies (`<0.0.0-0`).
fn nothing() -> Comparator {
    Comparator::bound(Op::Lt, floor(0, 0, 0))
}

fn floor(major: u64, minor: u64, patch: u64) -> Version {
    Version::with_pre(major, minor, patch, LOWEST_PRE.clone())
}

fn next(n: u64) -> u64 {
    n.saturating_add(1)
}

/// A version with optional `x` components, as written inside a range.
#[derive(Debug, Clone)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(token: &str, range: &str) -> Result<Self> {
        let captures = PARTIAL_PATTERN
            .captures(token)
            .ok_or_else(|| Error::range(range, format!("unexpected '{token}'")))?;

        let number = |index: usize| -> Result<Option<u64>> {
            match captures.get(index).map(|m| m.as_str()) {
                None | Some("x") | Some("X") | Some("*") => Ok(None),
                Some(digits) => digits
                    .parse()
                    .map(Some)
                    .map_err(|_| Error::range(range, format!("number too large in '{token}'"))),
            }
        };

        let major = number(1)?;
        // Everything after the first wildcard is a wildcard too.
        let minor = major.and(number(2)?);
        let patch = minor.and(number(3)?);

        let pre = match captures.get(4) {
            Some(tag) if patch.is_some() => {
                Prerelease::new(tag.as_str()).map_err(|e| Error::range(range, e.to_string()))?
            }
            _ => Prerelease::EMPTY,
        };
        if let Some(build) = captures.get(5) {
            BuildMetadata::new(build.as_str()).map_err(|e| Error::range(range, e.to_string()))?;
        }

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn exact(&self, major: u64, minor: u64, patch: u64) -> Version {
        Version::with_pre(major, minor, patch, self.pre.clone())
    }
}

fn caret(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return vec![Comparator::Any];
    };
    let Some(minor) = p.minor else {
        return vec![
            Comparator::bound(Op::Gte, Version::new(major, 0, 0)),
            Comparator::bound(Op::Lt, floor(next(major), 0, 0)),
        ];
    };
    let Some(patch) = p.patch else {
        let upper = if major == 0 {
            floor(0, next(minor), 0)
        } else {
            floor(next(major), 0, 0)
        };
        return vec![
            Comparator::bound(Op::Gte, Version::new(major, minor, 0)),
            Comparator::bound(Op::Lt, upper),
        ];
    };

    let upper = if major > 0 {
        floor(next(major), 0, 0)
    } else if minor > 0 {
        floor(0, next(minor), 0)
    } else {
        floor(0, 0, next(patch))
    };
    vec![
        Comparator::bound(Op::Gte, p.exact(major, minor, patch)),
        Comparator::bound(Op::Lt, upper),
    ]
}

fn tilde(p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return vec![Comparator::Any];
    };
    let Some(minor) = p.minor else {
        return vec![
            Comparator::bound(Op::Gte, Version::new(major, 0, 0)),
            Comparator::bound(Op::Lt, floor(next(major), 0, 0)),
        ];
    };

    let lower = match p.patch {
        Some(patch) => p.exact(major, minor, patch),
        None => Version::new(major, minor, 0),
    };
    vec![
        Comparator::bound(Op::Gte, lower),
        Comparator::bound(Op::Lt, floor(major, next(minor), 0)),
    ]
}

fn primitive(op: Op, p: &Partial) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return match op {
            Op::Gt | Op::Lt => vec![nothing()],
            _ => vec![Comparator::Any],
        };
    };

    if let (Some(minor), Some(patch)) = (p.minor, p.patch) {
        return vec![Comparator::bound(op, p.exact(major, minor, patch))];
    }

    let bumped = match p.minor {
        None => (next(major), 0),
        Some(minor) => (major, next(minor)),
    };
    let zeroed = (major, p.minor.unwrap_or(0));

    match op {
        Op::Eq => vec![
            Comparator::bound(Op::Gte, Version::new(zeroed.0, zeroed.1, 0)),
            Comparator::bound(Op::Lt, floor(bumped.0, bumped.1, 0)),
        ],
        Op::Gt => vec![Comparator::bound(Op::Gte, Version::new(bumped.0, bumped.1, 0))],
        Op::Gte => vec![Comparator::bound(Op::Gte, Version::new(zeroed.0, zeroed.1, 0))],
        Op::Lt => vec![Comparator::bound(Op::Lt, floor(zeroed.0, zeroed.1, 0))],
        Op::Lte => vec![Comparator::bound(Op::Lt, floor(bumped.0, bumped.1, 0))],
    }
}

fn hyphen(from: &Partial, to: &Partial) -> Vec<Comparator> {
    let lower = match (from.major, from.minor, from.patch) {
        (None, _, _) => Comparator::Any,
        (Some(major), None, _) => Comparator::bound(Op::Gte, Version::new(major, 0, 0)),
        (Some(major), Some(minor), None) => {
            Comparator::bound(Op::Gte, Version::new(major, minor, 0))
        }
        (Some(major), Some(minor), Some(patch)) => {
            Comparator::bound(Op::Gte, from.exact(major, minor, patch))
        }
    };
    let upper = match (to.major, to.minor, to.patch) {
        (None, _, _) => Comparator::Any,
        (Some(major), None, _) => Comparator::bound(Op::Lt, floor(next(major), 0, 0)),
        (Some(major), Some(minor), None) => {
            Comparator::bound(Op::Lt, floor(major, next(minor), 0))
        }
        (Some(major), Some(minor), Some(patch)) => {
            Comparator::bound(Op::Lte, to.exact(major, minor, patch))
        }
    };
    vec![lower, upper]
}

fn is_bare_operator(token: &str) -> bool {
    matches!(token, "^" | "~" | "~>" | "<" | ">" | "<=" | ">=" | "=")
}

fn parse_simple(token: &str, range: &str) -> Result<Vec<Comparator>> {
    if let Some(rest) = token.strip_prefix('^') {
        return Ok(caret(&Partial::parse(rest, range)?));
    }
    if let Some(rest) = token.strip_prefix("~>").or_else(|| token.strip_prefix('~')) {
        return Ok(tilde(&Partial::parse(rest, range)?));
    }

    let (op, rest) = if let Some(rest) = token.strip_prefix(">=") {
        (Op::Gte, rest)
    } else if let Some(rest) = token.strip_prefix("<=") {
        (Op::Lte, rest)
    } else if let Some(rest) = token.strip_prefix('>') {
        (Op::Gt, rest)
    } else if let Some(rest) = token.strip_prefix('<') {
        (Op::Lt, rest)
    } else if let Some(rest) = token.strip_prefix('=') {
        (Op::Eq, rest)
    } else {
        (Op::Eq, token)
    };
    Ok(primitive(op, &Partial::parse(rest, range)?))
}

fn parse_set(set: &str, range: &str) -> Result<Vec<Comparator>> {
    let tokens: Vec<&str> = set.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(vec![Comparator::Any]);
    }
    if let [from, "-", to] = tokens.as_slice() {
        return Ok(hyphen(
            &Partial::parse(from, range)?,
            &Partial::parse(to, range)?,
        ));
    }

    // `>= 1.2.3` and `^ 1.2` are written with a gap; glue the operator back on.
    let mut glued: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match glued.last_mut() {
            Some(last) if is_bare_operator(last) => last.push_str(token),
            _ => glued.push(token.to_string()),
        }
    }

    let mut comparators = Vec::new();
    for token in &glued {
        comparators.extend(parse_simple(token, range)?);
    }
    Ok(comparators)
}

fn set_matches(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }
    if !version.is_prerelease() {
        return true;
    }
    set.iter()
        .filter_map(Comparator::prerelease_anchor)
        .any(|anchor| anchor.release_tuple() == version.release_tuple())
}

/// A parsed range expression.
#[derive(Debug, Clone)]
pub struct Range {
    sets: Vec<Vec<Comparator>>,
    raw: String,
}

impl Range {
    /// Parse an npm range expression.
    ///
    /// Tags (`latest`), URLs, paths and other non-range dependency specifiers
    /// are rejected with [`Error::InvalidRange`].
    pub fn parse(input: &str) -> Result<Self> {
        let sets = input
            .split("||")
            .map(|set| parse_set(set, input))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sets,
            raw: input.trim().to_string(),
        })
    }

    /// Check whether `version` falls inside this range.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set_matches(set, version))
    }

    /// The range as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Check a version string against a range string.
///
/// Returns `false` if either side fails to parse.
pub fn satisfies(version: &str, range: &str) -> bool {
    match (Version::parse(version), Range::parse(range)) {
        (Ok(version), Ok(range)) => range.satisfies(&version),
        _ => false,
    }
}
