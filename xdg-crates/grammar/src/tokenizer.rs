/// Splits a sentence into the surface forms of its nodes.
pub trait Tokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String>;
}

/// Splits on whitespace and detaches sentence-final punctuation from the last word.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceTokenizer;

const FINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        let mut tokens: Vec<String> = sentence.split_whitespace().map(str::to_owned).collect();
        if let Some(last) = tokens.last_mut() {
            if let Some(mark) = last.chars().last().filter(|c| FINAL_PUNCTUATION.contains(c)) {
                if last.chars().count() > 1 {
                    let _ = last.pop();
                    tokens.push(mark.to_string());
                }
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::Tokenizer;
    use super::WhitespaceTokenizer;

    #[test]
    fn final_punctuation_is_a_token_of_its_own() {
        assert_eq!(
            WhitespaceTokenizer.tokenize("the dog  barks."),
            vec!["the", "dog", "barks", "."]
        );
        assert_eq!(WhitespaceTokenizer.tokenize("who ?"), vec!["who", "?"]);
        assert_eq!(WhitespaceTokenizer.tokenize("."), vec!["."]);
        assert!(WhitespaceTokenizer.tokenize("  ").is_empty());
    }
}
