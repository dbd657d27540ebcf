use std::collections::HashMap;

/// Longest pattern handled by one bit-parallel pass.
pub const MAX_PATTERN_CHARS: usize = 32;
/// Lowest score of any match short of the whole field equalling the pattern.
pub const MIN_PARTIAL_SCORE: f64 = 0.001;

/// A folded query compiled for approximate substring matching.
#[derive(Debug)]
pub struct Pattern {
	chars: Vec<char>,
	chunks: Vec<Chunk>,
	min_run: usize,
}
impl Pattern {
	/// `threshold` bounds the accepted error ratio; `min_run` is the shortest run of exactly
	/// matching characters a match must contain.
	pub fn new(folded: &[char], threshold: f64, min_run: usize) -> Self {
		let chunks =
			split_chunks(folded).into_iter().map(|chars| Chunk::new(chars, threshold)).collect();

		Self { chars: folded.to_vec(), chunks, min_run: min_run.max(1) }
	}

	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Error ratio of the best occurrence in `text`, anywhere in it. Only a field equal to the
	/// pattern scores `0.0`; any other match scores at least [`MIN_PARTIAL_SCORE`]. Long patterns
	/// average their chunks, counting a missed chunk as `1.0`.
	pub fn score(&self, text: &[char]) -> Option<f64> {
		if self.chunks.is_empty() || text.is_empty() {
			return None;
		}
		if text == self.chars.as_slice() {
			return Some(0.0);
		}

		let mut total = 0.0;
		let mut matched = false;

		for chunk in &self.chunks {
			match chunk.best_errors(text, self.min_run) {
				Some(errors) => {
					matched = true;
					total +=
						(errors as f64 / chunk.chars.len() as f64).max(MIN_PARTIAL_SCORE);
				},
				None => total += 1.0,
			}
		}

		matched.then(|| total / self.chunks.len() as f64)
	}
}

#[derive(Debug)]
struct Chunk {
	chars: Vec<char>,
	masks: HashMap<char, u64>,
	max_errors: usize,
}
impl Chunk {
	fn new(chars: Vec<char>, threshold: f64) -> Self {
		let mut masks = HashMap::new();

		for (pos, ch) in chars.iter().enumerate() {
			*masks.entry(*ch).or_insert(0_u64) |= 1 << pos;
		}

		let allowed = (threshold.clamp(0.0, 1.0) * chars.len() as f64 + 1e-9).floor() as usize;
		// Allowing as many errors as characters would match anything.
		let max_errors = allowed.min(chars.len().saturating_sub(1));

		Self { chars, masks, max_errors }
	}

	// Row `d` bit `i` is set when `chars[..=i]` ends at the current text position with at most
	// `d` edits.
	fn best_errors(&self, text: &[char], min_run: usize) -> Option<usize> {
		let accept = 1_u64 << (self.chars.len() - 1);
		let mut rows: Vec<u64> = (0..=self.max_errors).map(|d| (1_u64 << d) - 1).collect();
		let mut ends = Vec::new();

		for (pos, ch) in text.iter().enumerate() {
			let mask = self.masks.get(ch).copied().unwrap_or(0);
			let mut previous = rows[0];

			rows[0] = ((previous << 1) | 1) & mask;

			for errors in 1..rows.len() {
				let current = rows[errors];

				rows[errors] = (((current << 1) | 1) & mask)
					| ((previous << 1) | 1)
					| ((rows[errors - 1] << 1) | 1)
					| previous;
				previous = current;
			}

			if let Some(errors) = rows.iter().position(|row| row & accept != 0) {
				ends.push((errors, pos));
			}
		}

		ends.sort_by_key(|(errors, _)| *errors);

		ends.into_iter()
			.find(|&(errors, end)| {
				let span = (self.chars.len() + errors).min(end + 1);

				self.has_exact_run(&text[end + 1 - span..=end], min_run)
			})
			.map(|(errors, _)| errors)
	}

	fn has_exact_run(&self, window: &[char], min_run: usize) -> bool {
		if min_run <= 1 {
			return true;
		}
		if window.len() < min_run || self.chars.len() < min_run {
			return false;
		}

		window.windows(min_run).any(|run| self.chars.windows(min_run).any(|part| part == run))
	}
}

fn split_chunks(chars: &[char]) -> Vec<Vec<char>> {
	if chars.is_empty() {
		return Vec::new();
	}
	if chars.len() <= MAX_PATTERN_CHARS {
		return vec![chars.to_vec()];
	}

	let mut chunks: Vec<Vec<char>> =
		chars.chunks_exact(MAX_PATTERN_CHARS).map(<[char]>::to_vec).collect();

	// The tail overlaps the previous chunk so every chunk has full width.
	if chars.len() % MAX_PATTERN_CHARS != 0 {
		chunks.push(chars[chars.len() - MAX_PATTERN_CHARS..].to_vec());
	}

	chunks
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chars(raw: &str) -> Vec<char> {
		raw.chars().collect()
	}

	fn score(pattern: &str, text: &str) -> Option<f64> {
		Pattern::new(&chars(pattern), 0.4, 2).score(&chars(text))
	}

	#[test]
	fn only_whole_field_matches_score_zero() {
		assert_eq!(score("slack", "slack"), Some(0.0));
		assert_eq!(score("slack", "chat digest to slack"), Some(MIN_PARTIAL_SCORE));
		assert_eq!(score("slack", "slack digest"), Some(MIN_PARTIAL_SCORE));
	}

	#[test]
	fn tolerates_small_misspellings() {
		let typo = score("slakc", "chat digest to slack").expect("typo should match");

		assert!(typo > 0.0 && typo <= 0.4, "unexpected score {typo}");
		assert_eq!(score("invoise", "expense invoice router"), Some(1.0 / 7.0));
	}

	#[test]
	fn rejects_distant_text() {
		assert_eq!(score("zzzz", "chat digest to slack"), None);
		assert_eq!(score("slack", ""), None);
		assert_eq!(Pattern::new(&[], 0.4, 2).score(&chars("anything")), None);
	}

	#[test]
	fn requires_a_run_of_exact_characters() {
		let pattern = Pattern::new(&chars("abcde"), 0.4, 2);

		assert_eq!(pattern.score(&chars("axcxe")), None);
		assert_eq!(Pattern::new(&chars("abcde"), 0.4, 1).score(&chars("axcxe")), Some(0.4));
	}

	#[test]
	fn zero_threshold_only_accepts_exact_occurrences() {
		let pattern = Pattern::new(&chars("notion"), 0.0, 2);

		assert_eq!(pattern.score(&chars("sync to notion")), Some(MIN_PARTIAL_SCORE));
		assert_eq!(pattern.score(&chars("sync to notian")), None);
	}

	#[test]
	fn long_patterns_average_their_chunks() {
		let long = "summarize every incoming support ticket";
		let text = format!("bot that will {long} automatically");
		let pattern = Pattern::new(&chars(long), 0.4, 2);

		assert!(long.chars().count() > MAX_PATTERN_CHARS);
		assert_eq!(pattern.score(&chars(&text)), Some(MIN_PARTIAL_SCORE));

		let half = "summarize every incoming supportzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz";
		let partial = Pattern::new(&chars(half), 0.4, 2)
			.score(&chars("summarize every incoming support ticket"))
			.expect("first chunk matches");

		assert_eq!(partial, (MIN_PARTIAL_SCORE + 1.0) / 2.0);
	}
}
