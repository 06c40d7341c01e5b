/// Minutes needed to read `word_count` words, rounded up.
///
/// An empty body reads in zero minutes; anything else takes at least one.
pub fn read_time_minutes(word_count: usize, words_per_minute: usize) -> u32 {
    if word_count == 0 {
        return 0;
    }
    word_count.div_ceil(words_per_minute.max(1)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WORDS_PER_MINUTE;

    #[test]
    fn test_read_time() {
        assert_eq!(read_time_minutes(0, WORDS_PER_MINUTE), 0);
        assert_eq!(read_time_minutes(1, WORDS_PER_MINUTE), 1);
        assert_eq!(read_time_minutes(200, WORDS_PER_MINUTE), 1);
        assert_eq!(read_time_minutes(201, WORDS_PER_MINUTE), 2);
        assert_eq!(read_time_minutes(1500, WORDS_PER_MINUTE), 8);
    }

    #[test]
    fn test_matches_ceiling_for_all_small_counts() {
        for words in 1..2_000usize {
            let expected = (words as f64 / 200.0).ceil() as u32;
            assert_eq!(read_time_minutes(words, WORDS_PER_MINUTE), expected);
        }
    }
}
