//! Route templates such as `/api/v{version}/authors/{authorId}`.
//!
//! Literal segments match ASCII case-insensitively. A parameter may carry a
//! literal prefix inside its segment (`v{version}`); the parameter named
//! `version` is the route's version segment.

use std::collections::BTreeMap;

use crate::errors::{LibrisError, Result};

/// Name of the parameter that carries the API version token.
pub const VERSION_PARAM: &str = "version";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { prefix: String, name: String },
}

/// Parameters captured by matching a path against a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    /// Raw version token captured by a `{version}` parameter, if any
    pub fn version_token(&self) -> Option<&str> {
        self.params.get(VERSION_PARAM).map(String::as_str)
    }
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// `InvalidRouteTemplate` if the template does not start with `/`, has an
    /// unbalanced or empty `{}` placeholder, text after a placeholder, or a
    /// repeated parameter name.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| LibrisError::InvalidRouteTemplate {
            template: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        let mut seen = Vec::new();
        for part in rest.split('/').filter(|s| !s.is_empty()) {
            match part.find('{') {
                None => {
                    if part.contains('}') {
                        return Err(invalid("unbalanced '}'"));
                    }
                    segments.push(Segment::Literal(part.to_ascii_lowercase()));
                }
                Some(open) => {
                    let name = part[open + 1..]
                        .strip_suffix('}')
                        .ok_or_else(|| invalid("placeholder must close the segment"))?;
                    if name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(invalid("placeholder name must be alphanumeric"));
                    }
                    if seen.contains(&name) {
                        return Err(invalid("repeated placeholder name"));
                    }
                    seen.push(name);
                    segments.push(Segment::Param {
                        prefix: part[..open].to_ascii_lowercase(),
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Template as registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercase form with parameter names erased, used to group templates
    /// that match exactly the same paths.
    pub fn normalized(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Param { prefix, name } if name == VERSION_PARAM => {
                    out.push_str(prefix);
                    out.push_str("{version}");
                }
                Segment::Param { prefix, .. } => {
                    out.push_str(prefix);
                    out.push_str("{}");
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    /// Number of fully literal segments; more literals means a more specific
    /// template.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    pub fn has_version_segment(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param { name, .. } if name == VERSION_PARAM))
    }

    /// Match a request path (no query string). Trailing slashes are ignored.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut route_match = RouteMatch::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if !lit.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Param { prefix, name } => {
                    let head = part.get(..prefix.len())?;
                    if !head.eq_ignore_ascii_case(prefix) {
                        return None;
                    }
                    let value = &part[prefix.len()..];
                    if value.is_empty() {
                        return None;
                    }
                    route_match.params.insert(name.clone(), value.to_string());
                }
            }
        }
        Some(route_match)
    }

    /// Render a concrete path. Returns `None` if a parameter is missing.
    pub fn render(&self, params: &[(&str, &str)]) -> Option<String> {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Param { prefix, name } => {
                    let value = params.iter().find(|(k, _)| k == name)?.1;
                    out.push_str(prefix);
                    out.push_str(value);
                }
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_with_version_prefix() {
        let t = RouteTemplate::parse("/api/v{version}/authors/{authorId}").unwrap();
        let m = t.match_path("/API/v1.0/Authors/abc/").unwrap();
        assert_eq!(m.version_token(), Some("1.0"));
        assert_eq!(m.params["authorId"], "abc");
        assert!(t.has_version_segment());
    }

    #[test]
    fn test_no_match_on_shape() {
        let t = RouteTemplate::parse("/api/authors/{authorId}/books").unwrap();
        assert!(t.match_path("/api/authors/abc").is_none());
        assert!(t.match_path("/api/authors/abc/books/x").is_none());
        assert!(t.match_path("/api/writers/abc/books").is_none());

        let v = RouteTemplate::parse("/api/v{version}/authors").unwrap();
        assert!(v.match_path("/api/v/authors").is_none());
        assert!(v.match_path("/api/x1.0/authors").is_none());
    }

    #[test]
    fn test_normalized_ignores_param_names_and_case() {
        let a = RouteTemplate::parse("/api/Authors/{authorId}/books").unwrap();
        let b = RouteTemplate::parse("/api/authors/{id}/books/").unwrap();
        assert_eq!(a.normalized(), b.normalized());
        assert_eq!(a.normalized(), "/api/authors/{}/books");
    }

    #[test]
    fn test_render() {
        let t = RouteTemplate::parse("/api/authors/{authorId}/books/{bookId}").unwrap();
        assert_eq!(
            t.render(&[("bookId", "b1"), ("authorId", "a1")]).unwrap(),
            "/api/authors/a1/books/b1"
        );
        assert!(t.render(&[("authorId", "a1")]).is_none());
    }

    #[test]
    fn test_invalid_templates() {
        for bad in ["api/x", "/api/{", "/api/{id}x", "/api/{}", "/a/{id}/b/{id}", "/a/b}"] {
            assert!(
                matches!(
                    RouteTemplate::parse(bad),
                    Err(LibrisError::InvalidRouteTemplate { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
