/// Split text into whitespace-delimited words, skipping empty runs.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|word| !word.is_empty())
}

/// A valid word contains no characters below the space character.
pub fn is_valid_word(word: &str) -> bool {
    word.chars().all(|c| c >= ' ')
}
