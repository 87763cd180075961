//! Handler registrations and the validated descriptors built from them.

use std::fmt;
use std::str::FromStr;

use crate::media_type::MediaType;
use crate::routing::template::RouteTemplate;
use crate::version::VersionSet;

/// HTTP methods known to the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    /// POST, PUT and PATCH carry a request body whose Content-Type takes
    /// part in selection.
    pub fn is_body_bearing(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

/// One row of the startup registration table.
///
/// Media types are kept as strings here and parsed when the selector is
/// built, so a typo in the table surfaces as a startup error.
#[derive(Debug, Clone)]
pub struct Registration<A> {
    pub action: A,
    pub name: String,
    pub method: HttpMethod,
    pub template: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub versions: VersionSet,
}

impl<A> Registration<A> {
    /// A registration serving every version with default media types.
    pub fn new(action: A, name: impl Into<String>, method: HttpMethod, template: &str) -> Self {
        Self {
            action,
            name: name.into(),
            method,
            template: template.to_string(),
            consumes: Vec::new(),
            produces: Vec::new(),
            versions: VersionSet::Any,
        }
    }

    pub fn consumes(mut self, media_types: &[&str]) -> Self {
        self.consumes = media_types.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn produces(mut self, media_types: &[&str]) -> Self {
        self.produces = media_types.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn versions(mut self, versions: VersionSet) -> Self {
        self.versions = versions;
        self
    }
}

/// A validated, immutable handler descriptor.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor<A> {
    pub(crate) action: A,
    pub(crate) name: String,
    pub(crate) method: HttpMethod,
    pub(crate) template: RouteTemplate,
    pub(crate) consumes: Vec<MediaType>,
    pub(crate) produces: Vec<MediaType>,
    pub(crate) versions: VersionSet,
}

impl<A> HandlerDescriptor<A> {
    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Request media types; empty for methods without a body
    pub fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }

    pub fn produces(&self) -> &[MediaType] {
        &self.produces
    }

    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    /// True if both descriptors would claim the same request.
    ///
    /// Two descriptors overlap when they share a version, declare compatible
    /// produced media types and, for body-bearing methods, compatible consumed
    /// ones. A wildcard is compatible with every type it covers.
    pub fn overlaps(&self, other: &HandlerDescriptor<A>) -> bool {
        let shares = |a: &[MediaType], b: &[MediaType]| {
            a.iter().any(|x| b.iter().any(|y| x.is_compatible(y)))
        };
        self.versions.overlaps(&other.versions)
            && shares(&self.produces, &other.produces)
            && (!self.method.is_body_bearing() || shares(&self.consumes, &other.consumes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::ApiVersion;

    fn descriptor(
        name: &str,
        method: HttpMethod,
        consumes: &[&str],
        produces: &[&str],
        versions: VersionSet,
    ) -> HandlerDescriptor<&'static str> {
        let parse = |v: &[&str]| v.iter().map(|m| MediaType::parse(m).unwrap()).collect();
        HandlerDescriptor {
            action: "a",
            name: name.to_string(),
            method,
            template: RouteTemplate::parse("/x").unwrap(),
            consumes: parse(consumes),
            produces: parse(produces),
            versions,
        }
    }

    #[test]
    fn test_method_parse_and_body() {
        assert_eq!("patch".parse::<HttpMethod>(), Ok(HttpMethod::Patch));
        assert!(HttpMethod::Put.is_body_bearing());
        assert!(!HttpMethod::Get.is_body_bearing());
        assert!("BREW".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_overlap_requires_every_dimension() {
        let v1 = VersionSet::only(&[ApiVersion::new(1, 0)]);
        let v2 = VersionSet::only(&[ApiVersion::new(2, 0)]);
        let json = &["application/json"];
        let vendor = &["application/vendor.x+json"];

        let a = descriptor("a", HttpMethod::Get, &[], json, v1.clone());
        let b = descriptor("b", HttpMethod::Get, &[], json, v2);
        let c = descriptor("c", HttpMethod::Get, &[], vendor, v1.clone());
        let d = descriptor("d", HttpMethod::Get, &[], json, VersionSet::Any);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&d));

        let p = descriptor("p", HttpMethod::Post, json, json, v1.clone());
        let q = descriptor("q", HttpMethod::Post, vendor, json, v1);
        assert!(!p.overlaps(&q));
    }

    #[test]
    fn test_wildcards_overlap_what_they_cover() {
        let v1 = VersionSet::only(&[ApiVersion::new(1, 0)]);
        let app_any = descriptor("app_any", HttpMethod::Get, &[], &["application/*"], v1.clone());
        let all_any = descriptor("all_any", HttpMethod::Get, &[], &["*/*"], v1.clone());
        let json = descriptor("json", HttpMethod::Get, &[], &["application/json"], v1.clone());
        let text = descriptor("text", HttpMethod::Get, &[], &["text/*"], v1.clone());
        assert!(app_any.overlaps(&all_any));
        assert!(all_any.overlaps(&app_any));
        assert!(app_any.overlaps(&json));
        assert!(!app_any.overlaps(&text));

        let p = descriptor("p", HttpMethod::Post, &["application/*"], &["application/json"], v1.clone());
        let q = descriptor("q", HttpMethod::Post, &["application/vendor.x+json"], &["application/json"], v1);
        assert!(p.overlaps(&q));
    }
}
