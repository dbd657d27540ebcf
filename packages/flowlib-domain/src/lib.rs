pub mod filter_state;
pub mod pagination;
pub mod record;

pub use filter_state::{FilterState, SortOption, SourceFilter};
pub use pagination::{
	DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, clamp_page, clamp_page_size, clamp_page_size_with, page_offset,
	parse_int_prefix,
};
pub use record::{
	Category, DatasetMeta, IntegrationSummary, SearchResponse, Source, TriggerType,
	UnknownVariant, WorkflowRecord, parse_timestamp,
};
