//! Action selection: one handler per request, or the reason there is none.

use std::collections::BTreeMap;

use crate::errors::{LibrisError, Result};
use crate::media_type::{self, MatchRank, MediaType};
use crate::routing::descriptor::{HandlerDescriptor, HttpMethod, Registration};
use crate::routing::table::{RouteTable, SelectorOptions};
use crate::routing::template::VERSION_PARAM;
use crate::version::{ApiVersion, VersionResolver, VersionSource};

/// The parts of a request that take part in selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub method: HttpMethod,
    /// Request path without the query string
    pub path: &'a str,
    pub accept: Option<&'a str>,
    pub content_type: Option<&'a str>,
    /// Token read from a header or query parameter. Ignored when the version
    /// source is the path segment.
    pub version_token: Option<&'a str>,
}

/// Outcome of a successful selection.
#[derive(Debug, Clone)]
pub struct Selection<'s, A> {
    pub descriptor: &'s HandlerDescriptor<A>,
    /// Route parameters captured from the path, version segment included
    pub params: BTreeMap<String, String>,
    pub version: ApiVersion,
    /// Concrete media type the response is rendered as
    pub response_type: MediaType,
    /// Every version declared on the matched route, ascending
    pub supported_versions: Vec<ApiVersion>,
}

impl<A> Selection<'_, A> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Selects handlers from an immutable route table.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ActionSelector<A> {
    options: SelectorOptions,
    resolver: VersionResolver,
    table: RouteTable<A>,
}

impl<A: Clone + PartialEq> ActionSelector<A> {
    /// Build the selector from the registration table.
    ///
    /// # Errors
    ///
    /// Any registration error from [`RouteTable::build`].
    pub fn new(options: SelectorOptions, registrations: Vec<Registration<A>>) -> Result<Self> {
        let table = RouteTable::build(&options, registrations)?;
        let resolver = VersionResolver::new(options.default_version, options.matching);
        Ok(Self {
            options,
            resolver,
            table,
        })
    }
}

impl<A> ActionSelector<A> {
    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn table(&self) -> &RouteTable<A> {
        &self.table
    }

    /// Select exactly one handler for a request.
    ///
    /// # Errors
    ///
    /// In evaluation order: `RouteNotFound`, `MalformedInput` (bad version
    /// token), `NoMatchingVersion`, `UnsupportedMediaType`, `NotAcceptable`,
    /// `AmbiguousAction`.
    pub fn select(&self, request: &SelectionRequest<'_>) -> Result<Selection<'_, A>> {
        let (group, route_match) = self
            .table
            .find(request.method, request.path)
            .ok_or_else(|| LibrisError::RouteNotFound {
                method: request.method.to_string(),
                path: request.path.to_string(),
            })?;
        let route = format!("{} {}", group.method(), group.key());

        let token = match self.options.version_source {
            VersionSource::PathSegment => route_match.version_token(),
            _ => request.version_token,
        };
        let sets: Vec<_> = group.descriptors().iter().map(|d| d.versions()).collect();
        let (version, indices) = self.resolver.resolve(token, &sets, &route)?;
        let mut supported_versions: Vec<ApiVersion> =
            sets.iter().flat_map(|s| s.declared()).copied().collect();
        supported_versions.sort();
        supported_versions.dedup();
        let candidates: Vec<&HandlerDescriptor<A>> =
            indices.iter().map(|&i| &group.descriptors()[i]).collect();

        // Content-Type: body-bearing methods only
        let consume_ranks: Vec<Option<MatchRank>> = if request.method.is_body_bearing() {
            let offered = request
                .content_type
                .map(media_type::parse_header)
                .unwrap_or_default();
            candidates
                .iter()
                .map(|d| media_type::best_match(&offered, d.consumes()).map(|m| m.rank))
                .collect()
        } else {
            vec![None; candidates.len()]
        };
        let candidates: Vec<(&HandlerDescriptor<A>, Option<MatchRank>)> = candidates
            .into_iter()
            .zip(consume_ranks)
            .filter(|(d, rank)| !d.method().is_body_bearing() || rank.is_some())
            .collect();
        if candidates.is_empty() {
            return Err(LibrisError::UnsupportedMediaType {
                content_type: request.content_type.unwrap_or("<none>").to_string(),
            });
        }

        // Accept: absent means anything
        let accept = request.accept.unwrap_or("*/*");
        let acceptable = media_type::parse_header(accept);
        let ranked: Vec<_> = candidates
            .into_iter()
            .filter_map(|(d, consume)| {
                media_type::best_match(&acceptable, d.produces()).map(|m| (d, (consume, m.rank), m))
            })
            .collect();
        if ranked.is_empty() {
            return Err(LibrisError::NotAcceptable {
                accept: accept.to_string(),
            });
        }

        let top = ranked
            .iter()
            .map(|(_, rank, _)| *rank)
            .max()
            .ok_or_else(|| LibrisError::Internal {
                message: "empty candidate set after ranking".to_string(),
            })?;
        let mut winners: Vec<_> = ranked.into_iter().filter(|(_, rank, _)| *rank == top).collect();
        // Equally specific: the entry listed first in Accept wins
        if let Some(first) = winners.iter().map(|(_, _, m)| m.position).min() {
            winners.retain(|(_, _, m)| m.position == first);
        }
        if winners.len() > 1 {
            let mut names: Vec<String> = winners.iter().map(|(d, _, _)| d.name().to_string()).collect();
            names.sort();
            return Err(LibrisError::AmbiguousAction {
                route,
                candidates: names,
            });
        }
        let (descriptor, _, produced) = winners.remove(0);

        let response_type = produced
            .negotiated
            .or_else(|| descriptor.produces().iter().find(|m| !m.is_wildcard()).cloned())
            .unwrap_or_else(MediaType::json);

        tracing::debug!(
            action = descriptor.name(),
            api_version = %version,
            media_type = %response_type,
            "selected action"
        );

        Ok(Selection {
            descriptor,
            params: route_match.params,
            version,
            response_type,
            supported_versions,
        })
    }

    /// Render the route of `action` with the given parameters, for links
    /// such as `Location` headers. A template with a version segment gets
    /// the default version unless `params` names one.
    pub fn link(&self, action: &A, params: &[(&str, &str)]) -> Option<String>
    where
        A: PartialEq,
    {
        let descriptor = self.table.descriptor(action)?;
        let default_version = self.options.default_version.to_string();
        let mut all: Vec<(&str, &str)> = params.to_vec();
        if !all.iter().any(|(k, _)| *k == VERSION_PARAM) {
            all.push((VERSION_PARAM, &default_version));
        }
        descriptor.template().render(&all)
    }
}
