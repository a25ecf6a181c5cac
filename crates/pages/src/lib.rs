//! Page shells composing fetches, forms and relation selectors.
//!
//! One generic page per kind, parameterized by [`EntityType`]:
//! * [`ListPage`]: cached list first, then revalidate; loading, banner or table
//! * [`CreatePage`]: form from per-kind defaults; create, then navigate to the list
//! * [`EditPage`]: [`Loadable`] record fetch; update, then navigate to the list
//!
//! Every page owns a [`PageScope`]. After [`PageScope::unmount`] late results
//! are discarded and never reach the page or the [`RecordCache`].
//!
//! [`EntityType`]: bistro_schema::EntityType
//! [`RecordCache`]: bistro_client::RecordCache

#![warn(missing_docs)]

mod context;
mod create;
mod edit;
mod error;
mod form;
mod list;
mod loadable;
mod route;
mod scope;
mod view;

#[cfg(test)]
mod fixtures;

pub use context::PageContext;
pub use create::CreatePage;
pub use edit::EditPage;
pub use error::PageError;
pub use form::EntityForm;
pub use list::{ListPage, ListView, Table};
pub use loadable::Loadable;
pub use route::{History, Navigator, Route, RouteError};
pub use scope::PageScope;
pub use bistro_forms::RelationOption;
pub use view::{FieldView, FormView};
