use std::sync::OnceLock;

use regex::Regex;

static SENTENCE_BREAK: OnceLock<Regex> = OnceLock::new();

fn sentence_break() -> &'static Regex {
    SENTENCE_BREAK.get_or_init(|| {
        Regex::new(r"[.!?]\s+").expect("valid sentence pattern")
    })
}

/// Split on terminal punctuation followed by whitespace.
///
/// The punctuation stays with the sentence it ends. Sentences that are empty
/// after trimming are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for found in sentence_break().find_iter(text) {
        // terminal punctuation is a single ASCII byte
        let end = found.start() + 1;
        push_trimmed(&mut sentences, &text[start..end]);
        start = found.end();
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
