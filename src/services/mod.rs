pub mod backend;
pub mod collection_store;
pub mod notifications;
pub mod pagination;
pub mod projection;
pub mod recommendations;
pub mod related;

pub use backend::{HttpBackend, MovieBackend};
pub use collection_store::CollectionStore;
pub use notifications::{Notice, NoticeLevel, Notifier};
pub use pagination::{PaginatedView, PAGE_SIZE};
pub use projection::{project, ProjectionConfig, SortDirection, SortKey};
pub use recommendations::{AcceptOutcome, EngineState, RecommendationEngine};
pub use related::{ExpansionEnd, RelatedBrowser, RelatedExpansion, RELATED_LIMIT};
