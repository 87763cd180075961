//! Media types and header matching.
//!
//! Matching looks at `type/subtype` only. Parameters, including the `q`
//! weight, are parsed and kept for display but never influence a match.

use std::fmt;
use std::str::FromStr;

/// The plain JSON media type, used as the default representation.
pub const APPLICATION_JSON: &str = "application/json";

/// How specific a media type is, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// `*/*` or `type/*`
    Wildcard,
    /// A registered, unsuffixed subtype such as `application/json`
    Generic,
    /// A vendor tree subtype or one with a structured suffix, e.g.
    /// `application/vendor.marvin.book+json`
    Vendor,
}

/// A parsed `type/subtype[;params]` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    main: String,
    sub: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// Parse a single media type. Returns `None` for anything without a
    /// non-empty `type/subtype` pair.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(';');
        let essence = parts.next()?.trim();
        let (main, sub) = essence.split_once('/')?;
        let (main, sub) = (main.trim(), sub.trim());
        if !is_token(main) || !is_token(sub) {
            return None;
        }
        if main == "*" && sub != "*" {
            return None;
        }

        let params = parts
            .filter_map(|p| {
                let (k, v) = p.split_once('=')?;
                let k = k.trim();
                if k.is_empty() {
                    return None;
                }
                Some((k.to_ascii_lowercase(), v.trim().trim_matches('"').to_string()))
            })
            .collect();

        Some(Self {
            main: main.to_ascii_lowercase(),
            sub: sub.to_ascii_lowercase(),
            params,
        })
    }

    /// `application/json`
    pub fn json() -> Self {
        Self {
            main: "application".to_string(),
            sub: "json".to_string(),
            params: Vec::new(),
        }
    }

    pub fn main_type(&self) -> &str {
        &self.main
    }

    pub fn subtype(&self) -> &str {
        &self.sub
    }

    /// Parameter value by (lowercase) name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `type/subtype` without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main, self.sub)
    }

    pub fn is_wildcard(&self) -> bool {
        self.sub == "*"
    }

    pub fn specificity(&self) -> Specificity {
        if self.is_wildcard() {
            Specificity::Wildcard
        } else if self.sub.starts_with("vnd.")
            || self.sub.starts_with("vendor.")
            || self.sub.starts_with("prs.")
            || self.sub.starts_with("x.")
            || self.sub.contains('+')
        {
            Specificity::Vendor
        } else {
            Specificity::Generic
        }
    }

    /// Same `type/subtype`, parameters ignored
    pub fn same_essence(&self, other: &MediaType) -> bool {
        self.main == other.main && self.sub == other.sub
    }

    /// True if `self` is a wildcard covering `other`
    pub fn subsumes(&self, other: &MediaType) -> bool {
        match (self.main.as_str(), self.sub.as_str()) {
            ("*", "*") => true,
            (main, "*") => main == other.main,
            _ => false,
        }
    }

    /// Compatible in either direction
    pub fn is_compatible(&self, other: &MediaType) -> bool {
        self.same_essence(other) || self.subsumes(other) || other.subsumes(self)
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s).ok_or_else(|| format!("invalid media type '{}'", s))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main, self.sub)?;
        for (k, v) in &self.params {
            write!(f, "; {}={}", k, v)?;
        }
        Ok(())
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&^_.+-*".contains(c))
}

/// Split a header value into its media types, dropping malformed parts.
pub fn parse_header(value: &str) -> Vec<MediaType> {
    value.split(',').filter_map(MediaType::parse).collect()
}

/// True iff any media type in `header_value` is compatible with any
/// declared entry. Malformed headers never match.
pub fn matches(header_value: &str, declared: &[MediaType]) -> bool {
    let candidates = parse_header(header_value);
    best_match(&candidates, declared).is_some()
}

/// Rank of one (candidate, declared) pair. Ordered so that a larger rank is
/// the more specific match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchRank {
    /// How specific the caller was
    pub candidate: Specificity,
    /// 2: declared entry is exactly the requested type, 1: declared entry is
    /// the generic default reached through a wildcard, 0: anything else
    pub declared: u8,
}

/// Best matching pair between request candidates and a declared set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMatch {
    pub rank: MatchRank,
    /// The concrete type both sides agree on, when there is one
    pub negotiated: Option<MediaType>,
    /// Index of the matching entry in the request header
    pub position: usize,
}

/// Find the most specific compatible pair, if any.
pub fn best_match(candidates: &[MediaType], declared: &[MediaType]) -> Option<MediaMatch> {
    let mut best: Option<MediaMatch> = None;
    for (position, c) in candidates.iter().enumerate() {
        for d in declared {
            if !c.is_compatible(d) {
                continue;
            }
            let declared_rank = if c.same_essence(d) && !d.is_wildcard() {
                2
            } else if d.specificity() == Specificity::Generic {
                1
            } else {
                0
            };
            let rank = MatchRank {
                candidate: c.specificity(),
                declared: declared_rank,
            };
            let negotiated = if !d.is_wildcard() {
                Some(d.clone())
            } else if !c.is_wildcard() {
                Some(c.clone())
            } else {
                None
            };
            if best.as_ref().map_or(true, |b| rank > b.rank) {
                best = Some(MediaMatch {
                    rank,
                    negotiated,
                    position,
                });
            }
        }
    }
    best
}
