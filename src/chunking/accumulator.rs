use tracing::debug;

pub(super) struct ChunkAccumulator<'a> {
    chunks: Vec<String>,
    current: Vec<&'a str>,
    current_tokens: usize,
    budget: usize,
}

impl<'a> ChunkAccumulator<'a> {
    pub(super) fn new(budget: usize) -> Self {
        Self {
            chunks: Vec::new(),
            current: Vec::new(),
            current_tokens: 0,
            budget,
        }
    }

    pub(super) fn handle_sentence<F>(&mut self, sentence: &'a str, tokens: usize, count_tokens: F)
    where
        F: Fn(&str) -> usize,
    {
        if self.split_if_oversized(sentence, tokens, count_tokens) {
            return;
        }
        // Close the running chunk if this sentence would push it past budget
        if !self.current.is_empty() && self.current_tokens + tokens > self.budget {
            self.finish_chunk();
        }
        self.current.push(sentence);
        self.current_tokens += tokens;
    }

    pub(super) fn finish_chunk(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.chunks.push(self.current.join(" "));
        self.current.clear();
        self.current_tokens = 0;
    }

    pub(super) fn into_chunks(self) -> Vec<String> {
        self.chunks
    }

    /// Word-level fallback for a sentence that cannot fit a chunk on its own.
    fn split_if_oversized<F>(&mut self, sentence: &'a str, tokens: usize, count_tokens: F) -> bool
    where
        F: Fn(&str) -> usize,
    {
        if tokens <= self.budget {
            return false;
        }
        debug!(
            sentence_tokens = tokens,
            budget = self.budget,
            "sentence exceeds budget; splitting on words"
        );
        self.finish_chunk();
        for word in sentence.split_whitespace() {
            let word_tokens = count_tokens(word);
            if !self.current.is_empty() && self.current_tokens + word_tokens > self.budget {
                self.finish_chunk();
            }
            self.current.push(word);
            self.current_tokens += word_tokens;
        }
        self.finish_chunk();
        true
    }
}
