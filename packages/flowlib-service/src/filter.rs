use flowlib_domain::{FilterState, WorkflowRecord};

/// Keeps the records every structured predicate admits, preserving their order. The free-text
/// query is handled by the search stage and ignored here.
pub fn apply_filters<'a, I>(records: I, filters: &FilterState) -> Vec<&'a WorkflowRecord>
where
	I: IntoIterator<Item = &'a WorkflowRecord>,
{
	records.into_iter().filter(|record| filters.admits(record)).collect()
}
