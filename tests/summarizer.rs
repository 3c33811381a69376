mod support;

use support::{summary_of, ScriptedProvider};
use tubesum::provider::ProviderError;
use tubesum::summarizer::{RecursiveSummarizer, SummarizeError};
use tubesum::types::{SummarizerConfig, SummaryBounds};

fn config(budget: usize) -> SummarizerConfig {
    SummarizerConfig {
        chunk_token_budget: budget,
        ..SummarizerConfig::default()
    }
}

const THREE_SENTENCES: &str =
    "a1 a2 a3 a4 a5 a6. b1 b2 OVERFLOW b4 b5 b6. c1 c2 c3 c4 c5 c6.";

#[test]
fn empty_text_never_calls_provider() {
    let provider = ScriptedProvider::new();
    let summarizer = RecursiveSummarizer::new(&provider, config(880));

    assert_eq!(summarizer.summarize(""), Err(SummarizeError::EmptyInput));
    assert_eq!(summarizer.summarize("  \n\t "), Err(SummarizeError::EmptyInput));
    assert_eq!(provider.call_count(), 0);
}

#[test]
fn single_chunk_skips_merge_pass() {
    let provider = ScriptedProvider::new();
    let summarizer = RecursiveSummarizer::new(&provider, config(880));
    let text = "One two three. Four five six!";

    let run = summarizer.run(text).unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(run.summary, summary_of(text));
    assert_eq!(run.chunk_count, 1);
    assert!(!run.merged);
    assert_eq!(provider.calls()[0].bounds, SummaryBounds::new(220, 60));
}

#[test]
fn multiple_chunks_get_one_merge_pass() {
    let provider = ScriptedProvider::new();
    let summarizer = RecursiveSummarizer::new(&provider, config(10));

    let run = summarizer.run(THREE_SENTENCES).unwrap();

    assert_eq!(run.chunk_count, 3);
    assert_eq!(provider.call_count(), 3 + 1);
    assert_eq!(
        run.partials,
        vec!["S(a1..a6.)", "S(b1..b6.)", "S(c1..c6.)"]
    );

    let calls = provider.calls();
    let merge = calls.last().unwrap();
    assert_eq!(merge.text, "S(a1..a6.) S(b1..b6.) S(c1..c6.)");
    assert_eq!(merge.bounds, SummaryBounds::new(240, 80));
    assert_eq!(run.summary, summary_of(&merge.text));
    assert!(run.merged);
}

#[test]
fn oversized_sentence_is_summarized_in_pieces() {
    let provider = ScriptedProvider::new();
    let summarizer = RecursiveSummarizer::new(&provider, config(880));
    let text = vec!["word"; 2000].join(" ");

    let run = summarizer.run(&text).unwrap();

    assert_eq!(run.chunk_count, 3);
    for call in &provider.calls()[..3] {
        assert!(call.text.split_whitespace().count() <= 880);
    }
    assert_eq!(provider.call_count(), 4);
}

#[test]
fn overflowing_chunk_is_bisected_in_place() {
    let provider = ScriptedProvider::new().overflow_on("OVERFLOW", 1);
    let summarizer = RecursiveSummarizer::new(&provider, config(10));

    let run = summarizer.run(THREE_SENTENCES).unwrap();

    assert_eq!(run.recovered_overflows, 1);
    assert_eq!(
        run.partials,
        vec![
            "S(a1..a6.)",
            "S(b1..OVERFLOW)",
            "S(b4..b6.)",
            "S(c1..c6.)",
        ]
    );

    let calls = provider.calls();
    // a, b (overflow), b-head, b-tail, c, merge
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[2].text, "b1 b2 OVERFLOW");
    assert_eq!(calls[3].text, "b4 b5 b6.");
    assert_eq!(calls[2].bounds, SummaryBounds::new(200, 40));
    assert_eq!(calls[3].bounds, SummaryBounds::new(200, 40));
    assert_eq!(calls[5].bounds, SummaryBounds::new(240, 80));
}

#[test]
fn single_overflowing_chunk_still_merges_its_halves() {
    let provider = ScriptedProvider::new().overflow_on("OVERFLOW", 1);
    let summarizer = RecursiveSummarizer::new(&provider, config(880));

    let run = summarizer.run("one two OVERFLOW four").unwrap();

    assert_eq!(run.chunk_count, 1);
    assert_eq!(run.partials, vec!["S(one..two)", "S(OVERFLOW..four)"]);
    assert!(run.merged);
    assert_eq!(provider.call_count(), 4);
}

#[test]
fn single_word_overflow_is_fatal() {
    let provider = ScriptedProvider::new().overflow_on("OVERFLOW", usize::MAX);
    let summarizer = RecursiveSummarizer::new(&provider, config(880));

    let err = summarizer.summarize("OVERFLOW").unwrap_err();

    assert_eq!(err, SummarizeError::Overflow { chunk: 0, words: 1 });
    assert_eq!(provider.call_count(), 1);
}

#[test]
fn overflowing_half_is_not_bisected_again() {
    let provider = ScriptedProvider::new().overflow_on("OVERFLOW", usize::MAX);
    let summarizer = RecursiveSummarizer::new(&provider, config(880));

    let err = summarizer.summarize("x OVERFLOW y").unwrap_err();

    assert_eq!(err, SummarizeError::Overflow { chunk: 0, words: 2 });
    assert_eq!(provider.call_count(), 3);
}

#[test]
fn provider_failure_is_not_retried() {
    let provider = ScriptedProvider::new().fail_on("b4");
    let summarizer = RecursiveSummarizer::new(&provider, config(10));

    let err = summarizer.summarize(THREE_SENTENCES).unwrap_err();

    assert_eq!(
        err,
        SummarizeError::Provider {
            chunk: 1,
            source: ProviderError::Failed("model crashed".into()),
        }
    );
    assert_eq!(provider.call_count(), 2);
}

#[test]
fn merge_failure_is_reported() {
    let provider = ScriptedProvider::new().fail_on("S(");
    let summarizer = RecursiveSummarizer::new(&provider, config(10));

    let err = summarizer.summarize(THREE_SENTENCES).unwrap_err();

    assert!(matches!(err, SummarizeError::Merge(ProviderError::Failed(_))));
    assert_eq!(provider.call_count(), 4);
}

#[test]
fn bounds_come_from_config() {
    let provider = ScriptedProvider::new();
    let config = SummarizerConfig {
        chunk_token_budget: 10,
        chunk_bounds: SummaryBounds::new(50, 5),
        merge_bounds: SummaryBounds::new(70, 7),
        ..SummarizerConfig::default()
    };
    let summarizer = RecursiveSummarizer::new(&provider, config);

    summarizer.summarize(THREE_SENTENCES).unwrap();

    let bounds: Vec<SummaryBounds> = provider.calls().iter().map(|c| c.bounds).collect();
    assert_eq!(
        bounds,
        vec![
            SummaryBounds::new(50, 5),
            SummaryBounds::new(50, 5),
            SummaryBounds::new(50, 5),
            SummaryBounds::new(70, 7),
        ]
    );
}
