pub fn normalize_token(value: &str) -> String {
  value
    .to_lowercase()
    .chars()
    .map(|c| if c.is_alphanumeric() { c } else { ' ' })
    .collect::<String>()
    .split_whitespace()
    .collect::<Vec<&str>>()
    .join("_")
}

/// Lower-cases, drops everything that is neither alphanumeric nor whitespace,
/// then splits on whitespace. Punctuation inside a word is removed, not split on.
pub fn tokenize_words(text: &str) -> Vec<String> {
  text
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    .collect::<String>()
    .split_whitespace()
    .map(|t| t.to_string())
    .collect()
}
