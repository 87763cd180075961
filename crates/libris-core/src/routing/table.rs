//! The validated route table, grouped by normalized template and method.

use std::collections::BTreeMap;

use crate::errors::{LibrisError, Result};
use crate::media_type::MediaType;
use crate::routing::descriptor::{HandlerDescriptor, HttpMethod, Registration};
use crate::routing::template::{RouteMatch, RouteTemplate};
use crate::version::{ApiVersion, VersionMatching, VersionSource};

/// Process-wide selection defaults, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOptions {
    /// Version used when a request carries no version token
    pub default_version: ApiVersion,
    pub matching: VersionMatching,
    pub version_source: VersionSource,
    /// Given to descriptors that declare no produced media type
    pub default_produces: Vec<MediaType>,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            default_version: ApiVersion::new(1, 0),
            matching: VersionMatching::Floor,
            version_source: VersionSource::PathSegment,
            default_produces: vec![MediaType::json()],
        }
    }
}

/// All descriptors sharing one normalized template and method.
#[derive(Debug, Clone)]
pub struct RouteGroup<A> {
    key: String,
    method: HttpMethod,
    template: RouteTemplate,
    descriptors: Vec<HandlerDescriptor<A>>,
}

impl<A> RouteGroup<A> {
    /// Normalized template shared by the group
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    pub fn descriptors(&self) -> &[HandlerDescriptor<A>] {
        &self.descriptors
    }
}

/// Immutable set of route groups built from the registration table.
#[derive(Debug, Clone)]
pub struct RouteTable<A> {
    groups: Vec<RouteGroup<A>>,
}

impl<A: Clone + PartialEq> RouteTable<A> {
    /// Validate every registration and group them.
    ///
    /// # Errors
    ///
    /// - `InvalidRouteTemplate` / `InvalidMediaType` for unparseable entries
    /// - `DuplicateAction` if an action key appears twice
    /// - `ConflictingRegistration` if two descriptors of one group overlap
    pub fn build(options: &SelectorOptions, registrations: Vec<Registration<A>>) -> Result<Self> {
        let mut groups: BTreeMap<(String, HttpMethod), RouteGroup<A>> = BTreeMap::new();
        let mut seen: Vec<(A, String)> = Vec::new();

        for registration in registrations {
            if let Some((_, name)) = seen.iter().find(|(a, _)| *a == registration.action) {
                return Err(LibrisError::DuplicateAction {
                    action: format!("{} / {}", name, registration.name),
                });
            }
            seen.push((registration.action.clone(), registration.name.clone()));

            let descriptor = build_descriptor(options, registration)?;
            let key = descriptor.template.normalized();

            let group = groups
                .entry((key.clone(), descriptor.method))
                .or_insert_with(|| RouteGroup {
                    key: key.clone(),
                    method: descriptor.method,
                    template: descriptor.template.clone(),
                    descriptors: Vec::new(),
                });

            if let Some(existing) = group.descriptors.iter().find(|d| d.overlaps(&descriptor)) {
                let (first, second) = ordered(existing.name(), descriptor.name());
                return Err(LibrisError::ConflictingRegistration {
                    route: format!("{} {}", descriptor.method, key),
                    first,
                    second,
                });
            }
            tracing::debug!(
                action = descriptor.name(),
                method = %descriptor.method,
                route = %key,
                "registered handler"
            );
            group.descriptors.push(descriptor);
        }

        Ok(Self {
            groups: groups.into_values().collect(),
        })
    }
}

impl<A> RouteTable<A> {
    pub fn groups(&self) -> &[RouteGroup<A>] {
        &self.groups
    }

    /// Most specific group matching `(method, path)`.
    ///
    /// Among matching templates the one with the most literal segments wins;
    /// remaining ties go to the lexicographically smallest key so the outcome
    /// never depends on registration order.
    pub fn find(&self, method: HttpMethod, path: &str) -> Option<(&RouteGroup<A>, RouteMatch)> {
        self.groups
            .iter()
            .filter(|g| g.method == method)
            .filter_map(|g| g.template.match_path(path).map(|m| (g, m)))
            .min_by(|(a, _), (b, _)| {
                b.template
                    .literal_count()
                    .cmp(&a.template.literal_count())
                    .then_with(|| a.key.cmp(&b.key))
            })
    }

    /// Descriptor registered for `action`
    pub fn descriptor(&self, action: &A) -> Option<&HandlerDescriptor<A>>
    where
        A: PartialEq,
    {
        self.groups
            .iter()
            .flat_map(|g| g.descriptors.iter())
            .find(|d| d.action == *action)
    }
}

fn ordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn parse_media_types(action: &str, values: &[String]) -> Result<Vec<MediaType>> {
    values
        .iter()
        .map(|v| {
            MediaType::parse(v).ok_or_else(|| LibrisError::InvalidMediaType {
                action: action.to_string(),
                value: v.clone(),
            })
        })
        .collect()
}

fn build_descriptor<A>(
    options: &SelectorOptions,
    registration: Registration<A>,
) -> Result<HandlerDescriptor<A>> {
    let template = RouteTemplate::parse(&registration.template)?;

    let mut produces = parse_media_types(&registration.name, &registration.produces)?;
    if produces.is_empty() {
        produces = options.default_produces.clone();
    }

    let consumes = if registration.method.is_body_bearing() {
        let consumes = parse_media_types(&registration.name, &registration.consumes)?;
        if consumes.is_empty() {
            vec![MediaType::json()]
        } else {
            consumes
        }
    } else {
        Vec::new()
    };

    Ok(HandlerDescriptor {
        action: registration.action,
        name: registration.name,
        method: registration.method,
        template,
        consumes,
        produces,
        versions: registration.versions,
    })
}
