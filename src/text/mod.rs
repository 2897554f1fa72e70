//! Text preprocessing: cleanup, tokenization, stemming and stop words.

mod normalize;
mod stem;
mod stop_words;

pub use normalize::normalize;
pub use stem::{stem, tokenize_and_stem};
pub use stop_words::{ENGLISH_STOP_WORDS, is_stop_word};

/// Normalize raw text and return its stemmed tokens.
pub fn preprocess(text: &str) -> Vec<String> {
    tokenize_and_stem(&normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_keeps_hashtag_and_stem_of_great() {
        let tokens = preprocess("@user This is #great!!");
        assert_eq!(tokens, vec!["thi", "#great"]);
        assert!(tokens.iter().any(|token| token.contains("great")));
        assert!(tokens.iter().any(|token| token.starts_with('#')));
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(preprocess("@someone !!! 123").is_empty());
    }
}
