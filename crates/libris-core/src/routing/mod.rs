//! Media-type driven action resolution.
//!
//! Handlers are registered once from an explicit table. Requests are
//! resolved by route, then API version, then `Content-Type`, then `Accept`,
//! with a specificity tie-break among what remains.

pub mod descriptor;
pub mod selector;
pub mod table;
pub mod template;

pub use descriptor::{HandlerDescriptor, HttpMethod, Registration};
pub use selector::{ActionSelector, Selection, SelectionRequest};
pub use table::{RouteGroup, RouteTable, SelectorOptions};
pub use template::{RouteMatch, RouteTemplate, VERSION_PARAM};
