//! Token-budgeted chunking of transcript text.

mod accumulator;
mod sentences;


use self::accumulator::ChunkAccumulator;

pub use self::sentences::split_sentences;

/// Split `text` into chunks whose token counts stay within `budget`.
///
/// Sentences are packed greedily. A sentence that alone exceeds the budget is
/// split at word boundaries and emitted as standalone chunks. Counting is
/// delegated to `count_tokens` per sentence and, in the fallback, per word.
pub fn chunk_text<F>(text: &str, count_tokens: F, budget: usize) -> Vec<String>
where
    F: Fn(&str) -> usize,
{
    if text.is_empty() {
        return Vec::new();
    }
    let mut accumulator = ChunkAccumulator::new(budget);
    for sentence in split_sentences(text) {
        let tokens = count_tokens(sentence);
        accumulator.handle_sentence(sentence, tokens, &count_tokens);
    }
    accumulator.finish_chunk();
    accumulator.into_chunks()
}
