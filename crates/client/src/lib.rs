//! Client-side core for the Philand budget tracker.
//!
//! The backend owns all canonical data; this crate mirrors it read-only
//! through a typed REST surface and keeps the view-state machinery every
//! screen shares: a keyed [`QueryCache`] with request de-duplication and
//! prefix invalidation, page-local [`EntryFilter`] state, a
//! [`MutationDispatcher`] that runs the success/error tail of every write,
//! and pure derived view models in [`view`].

pub use cache::{FetchGen, QueryCache, QueryStatus};
pub use error::{ClientError, Result};
pub use filter::{DatePreset, EntryFilter, KindFilter, SortField, SortOrder, SummaryPeriod};
pub use http::ApiClient;
pub use keys::QueryKey;
pub use mutation::{MutationDispatcher, MutationSpec, NoticeLevel, NotificationPort};
pub use session::{Session, SessionContext};

mod api;
mod cache;
mod error;
mod filter;
mod http;
mod keys;
mod mutation;
mod session;

pub mod export;
pub mod money;
pub mod permissions;
pub mod view;
