//! API versions and version resolution.

use std::fmt;
use std::str::FromStr;

use crate::errors::{LibrisError, Result};

/// A `(major, minor)` API version, ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `1`, `1.0`, `v1.0` or `V2.1`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let token = token
            .strip_prefix('v')
            .or_else(|| token.strip_prefix('V'))
            .unwrap_or(token);
        let (major, minor) = match token.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (token, "0"),
        };
        if major.is_empty() || minor.is_empty() {
            return None;
        }
        if !major.bytes().all(|b| b.is_ascii_digit()) || !minor.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ApiVersion::parse(s).ok_or_else(|| format!("invalid API version '{}'", s))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Versions a handler declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSet {
    /// Serves every version
    Any,
    /// Serves exactly these versions
    Only(Vec<ApiVersion>),
}

impl VersionSet {
    pub fn only(versions: &[ApiVersion]) -> Self {
        VersionSet::Only(versions.to_vec())
    }

    pub fn contains(&self, version: &ApiVersion) -> bool {
        match self {
            VersionSet::Any => true,
            VersionSet::Only(vs) => vs.contains(version),
        }
    }

    pub fn overlaps(&self, other: &VersionSet) -> bool {
        match (self, other) {
            (VersionSet::Any, _) | (_, VersionSet::Any) => true,
            (VersionSet::Only(a), VersionSet::Only(b)) => a.iter().any(|v| b.contains(v)),
        }
    }

    /// Explicitly declared versions; empty for `Any`
    pub fn declared(&self) -> &[ApiVersion] {
        match self {
            VersionSet::Any => &[],
            VersionSet::Only(vs) => vs,
        }
    }
}

/// How a requested version is mapped onto declared versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionMatching {
    /// Highest declared version not above the requested one
    #[default]
    Floor,
    /// Only the requested version itself
    Exact,
}

impl FromStr for VersionMatching {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "floor" => Ok(VersionMatching::Floor),
            "exact" => Ok(VersionMatching::Exact),
            other => Err(format!("unknown version matching '{}'", other)),
        }
    }
}

/// Where the version token of a request is read from. One per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSource {
    /// The `v{version}` segment of the route template
    #[default]
    PathSegment,
    /// A request header, e.g. `api-version`
    Header(String),
    /// A query parameter, e.g. `api-version`
    Query(String),
}

impl VersionSource {
    /// Extract the raw token for a request. `path_token` is what the route
    /// template captured for its version segment, if it has one.
    pub fn extract<'a>(
        &self,
        path_token: Option<&'a str>,
        header: impl Fn(&str) -> Option<&'a str>,
        query: Option<&'a str>,
    ) -> Option<&'a str> {
        match self {
            VersionSource::PathSegment => path_token,
            VersionSource::Header(name) => header(name),
            VersionSource::Query(name) => query?.split('&').find_map(|pair| {
                let (k, v) = pair.split_once('=')?;
                (k == name.as_str()).then_some(v)
            }),
        }
    }
}

impl FromStr for VersionSource {
    type Err = String;

    /// `path`, `header:<name>` or `query:<name>`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s.eq_ignore_ascii_case("path") => Ok(VersionSource::PathSegment),
            Some((kind, name)) if !name.trim().is_empty() => {
                match kind.to_ascii_lowercase().as_str() {
                    "header" => Ok(VersionSource::Header(name.trim().to_ascii_lowercase())),
                    "query" => Ok(VersionSource::Query(name.trim().to_string())),
                    _ => Err(format!("unknown version source '{}'", s)),
                }
            }
            _ => Err(format!("unknown version source '{}'", s)),
        }
    }
}

/// Narrows route group candidates to one API version.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    default_version: ApiVersion,
    matching: VersionMatching,
}

impl VersionResolver {
    pub fn new(default_version: ApiVersion, matching: VersionMatching) -> Self {
        Self {
            default_version,
            matching,
        }
    }

    pub fn default_version(&self) -> ApiVersion {
        self.default_version
    }

    /// Resolve `token` against the version sets of a route group.
    ///
    /// Returns the effective version and the indices of the candidates that
    /// serve it.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` if the token is present but not a version
    /// - `NoMatchingVersion` if the group is non-empty and nothing serves the version
    pub fn resolve(
        &self,
        token: Option<&str>,
        sets: &[&VersionSet],
        route: &str,
    ) -> Result<(ApiVersion, Vec<usize>)> {
        let requested = match token {
            Some(t) => ApiVersion::parse(t).ok_or_else(|| {
                LibrisError::malformed_field("version", format!("'{}' is not an API version", t))
            })?,
            None => self.default_version,
        };

        let effective = match self.matching {
            VersionMatching::Exact => requested,
            VersionMatching::Floor => sets
                .iter()
                .flat_map(|s| s.declared())
                .filter(|v| **v <= requested)
                .max()
                .copied()
                .unwrap_or(requested),
        };

        let selected: Vec<usize> = sets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains(&effective))
            .map(|(i, _)| i)
            .collect();

        if selected.is_empty() && !sets.is_empty() {
            return Err(LibrisError::NoMatchingVersion {
                version: requested.to_string(),
                route: route.to_string(),
            });
        }

        tracing::debug!(requested = %requested, effective = %effective, "resolved api version");
        Ok((effective, selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1: ApiVersion = ApiVersion::new(1, 0);
    const V2: ApiVersion = ApiVersion::new(2, 0);

    #[test]
    fn test_parse_forms() {
        assert_eq!(ApiVersion::parse("1"), Some(V1));
        assert_eq!(ApiVersion::parse("1.0"), Some(V1));
        assert_eq!(ApiVersion::parse("v2.0"), Some(V2));
        assert_eq!(ApiVersion::parse("2.10"), Some(ApiVersion::new(2, 10)));
        assert_eq!(ApiVersion::parse("x"), None);
        assert_eq!(ApiVersion::parse("1."), None);
        assert_eq!(ApiVersion::parse("-1.0"), None);
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(ApiVersion::new(1, 10) > ApiVersion::new(1, 9));
        assert!(ApiVersion::new(2, 0) > ApiVersion::new(1, 99));
    }

    #[test]
    fn test_floor_picks_highest_not_above() {
        let resolver = VersionResolver::new(V1, VersionMatching::Floor);
        let v1 = VersionSet::only(&[V1]);
        let v2 = VersionSet::only(&[V2]);
        let (effective, idx) = resolver.resolve(Some("1.5"), &[&v1, &v2], "/r").unwrap();
        assert_eq!(effective, V1);
        assert_eq!(idx, vec![0]);

        let (effective, idx) = resolver.resolve(Some("3.0"), &[&v1, &v2], "/r").unwrap();
        assert_eq!(effective, V2);
        assert_eq!(idx, vec![1]);
    }

    #[test]
    fn test_exact_rejects_in_between() {
        let resolver = VersionResolver::new(V1, VersionMatching::Exact);
        let v1 = VersionSet::only(&[V1]);
        let err = resolver.resolve(Some("1.5"), &[&v1], "/r").unwrap_err();
        assert!(matches!(err, LibrisError::NoMatchingVersion { .. }));
    }

    #[test]
    fn test_any_serves_everything() {
        let resolver = VersionResolver::new(V1, VersionMatching::Floor);
        let any = VersionSet::Any;
        let (_, idx) = resolver.resolve(Some("9.0"), &[&any], "/r").unwrap();
        assert_eq!(idx, vec![0]);
    }

    #[test]
    fn test_absent_token_uses_default() {
        let resolver = VersionResolver::new(V2, VersionMatching::Exact);
        let v2 = VersionSet::only(&[V2]);
        let (effective, _) = resolver.resolve(None, &[&v2], "/r").unwrap();
        assert_eq!(effective, V2);
    }

    #[test]
    fn test_below_every_declared_version() {
        let resolver = VersionResolver::new(V1, VersionMatching::Floor);
        let v2 = VersionSet::only(&[V2]);
        let err = resolver.resolve(Some("1.0"), &[&v2], "/r").unwrap_err();
        assert!(matches!(err, LibrisError::NoMatchingVersion { .. }));
    }

    #[test]
    fn test_malformed_token() {
        let resolver = VersionResolver::new(V1, VersionMatching::Floor);
        let err = resolver.resolve(Some("abc"), &[], "/r").unwrap_err();
        assert!(matches!(err, LibrisError::MalformedInput { .. }));
    }

    #[test]
    fn test_source_parse_and_extract() {
        assert_eq!("path".parse::<VersionSource>(), Ok(VersionSource::PathSegment));
        let header: VersionSource = "header:Api-Version".parse().unwrap();
        assert_eq!(header, VersionSource::Header("api-version".to_string()));
        let query: VersionSource = "query:api-version".parse().unwrap();

        let token = query.extract(None, |_| None, Some("a=1&api-version=2.0"));
        assert_eq!(token, Some("2.0"));
        let token = header.extract(None, |name| (name == "api-version").then_some("1.0"), None);
        assert_eq!(token, Some("1.0"));
        assert!("cookie:x".parse::<VersionSource>().is_err());
    }
}
