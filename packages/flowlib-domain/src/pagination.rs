pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const MAX_PAGE_SIZE: usize = 48;

/// Reads the leading base-10 integer of `raw`, ignoring leading whitespace and any trailing
/// text (`"2.5"` reads as 2, `"12abc"` as 12). Values past the `i64` range saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
	let trimmed = raw.trim_start();
	let (negative, digits) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};
	let len = digits.bytes().take_while(u8::is_ascii_digit).count();

	if len == 0 {
		return None;
	}

	let mut value: i64 = 0;

	for digit in digits.bytes().take(len) {
		value = value.saturating_mul(10).saturating_add(i64::from(digit - b'0'));
	}

	Some(if negative { -value } else { value })
}

pub fn clamp_page(value: Option<i64>) -> usize {
	match value {
		Some(page) if page >= 1 => usize::try_from(page).unwrap_or(usize::MAX),
		_ => 1,
	}
}

pub fn clamp_page_size(value: Option<i64>) -> usize {
	clamp_page_size_with(value, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Non-positive or missing sizes fall back to `default`; everything is capped at `max`.
pub fn clamp_page_size_with(value: Option<i64>, default: usize, max: usize) -> usize {
	let max = max.max(1);

	match value {
		Some(size) if size >= 1 => usize::try_from(size).unwrap_or(usize::MAX).min(max),
		_ => default.clamp(1, max),
	}
}

/// Offset of the first record on `page` (1-based), saturating instead of overflowing.
pub fn page_offset(page: usize, page_size: usize) -> usize {
	page.saturating_sub(1).saturating_mul(page_size)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_int_prefix_reads_leading_digits() {
		assert_eq!(parse_int_prefix("2"), Some(2));
		assert_eq!(parse_int_prefix("  7 "), Some(7));
		assert_eq!(parse_int_prefix("2.9"), Some(2));
		assert_eq!(parse_int_prefix("12abc"), Some(12));
		assert_eq!(parse_int_prefix("-3"), Some(-3));
		assert_eq!(parse_int_prefix("+4"), Some(4));
		assert_eq!(parse_int_prefix("abc"), None);
		assert_eq!(parse_int_prefix(""), None);
		assert_eq!(parse_int_prefix("-"), None);
		assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
	}

	#[test]
	fn clamp_page_is_total() {
		assert_eq!(clamp_page(None), 1);
		assert_eq!(clamp_page(Some(0)), 1);
		assert_eq!(clamp_page(Some(-5)), 1);
		assert_eq!(clamp_page(Some(i64::MIN)), 1);
		assert_eq!(clamp_page(Some(3)), 3);
	}

	#[test]
	fn clamp_page_size_defaults_and_caps() {
		assert_eq!(clamp_page_size(None), 24);
		assert_eq!(clamp_page_size(Some(0)), 24);
		assert_eq!(clamp_page_size(Some(-1)), 24);
		assert_eq!(clamp_page_size(Some(10)), 10);
		assert_eq!(clamp_page_size(Some(48)), 48);
		assert_eq!(clamp_page_size(Some(49)), 48);
		assert_eq!(clamp_page_size(Some(i64::MAX)), 48);
		assert_eq!(clamp_page_size_with(None, 100, 10), 10);
		assert_eq!(clamp_page_size_with(Some(5), 24, 0), 1);
	}

	#[test]
	fn page_offset_saturates() {
		assert_eq!(page_offset(1, 24), 0);
		assert_eq!(page_offset(3, 10), 20);
		assert_eq!(page_offset(usize::MAX, 48), usize::MAX);
	}
}
