use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Case and diacritic folding shared by matching and name ordering.
pub fn fold(text: &str) -> String {
	text.nfkd().filter(|ch| !is_combining_mark(*ch)).flat_map(char::to_lowercase).collect()
}

pub fn fold_chars(text: &str) -> Vec<char> {
	text.nfkd().filter(|ch| !is_combining_mark(*ch)).flat_map(char::to_lowercase).collect()
}

/// Length normalization for a field value: `1 / sqrt(tokens)`, rounded to three decimals. Tokens
/// are whitespace separated, so `Auto-tag` counts once.
pub fn field_norm(text: &str) -> f64 {
	let words = text.split_whitespace().count().max(1) as f64;

	(1_000.0 / words.sqrt()).round() / 1_000.0
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fold_strips_case_and_marks() {
		assert_eq!(fold("Crème Brûlée"), "creme brulee");
		assert_eq!(fold("ＡＰＩ"), "api");
		assert_eq!(fold_chars("Ñu"), vec!['n', 'u']);
	}

	#[test]
	fn field_norm_shrinks_with_word_count() {
		assert_eq!(field_norm("slack"), 1.0);
		assert_eq!(field_norm("chat digest"), 0.707);
		assert_eq!(field_norm("auto tag support tickets"), 0.5);
		assert_eq!(field_norm("Auto-tag support tickets"), 0.577);
		assert_eq!(field_norm("google-sheets"), 1.0);
		assert_eq!(field_norm(""), 1.0);
	}
}
