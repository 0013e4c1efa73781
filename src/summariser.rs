//! Summarisation orchestration: one TL;DR paragraph plus a bounded list of
//! bullet-point highlights.
//!
//! Two model invocations share a single token budget derived from the
//! caller's `max_chars`. The bullet draft goes through [`parse_bullets`],
//! which falls back to sentence splitting when the model ignores the
//! line-per-bullet instruction.

use thiserror::Error;

use crate::model::{GenerationParams, ModelError, SummarisationModel};

/// Hard cap on model input, in characters. Applied uniformly before any
/// model invocation.
const MAX_INPUT_CHARS: usize = 4000;

/// Inclusive clamp range for the token budget derived from `max_chars`
const MIN_TOKENS: usize = 50;
const MAX_TOKENS: usize = 200;

/// Upper bound on returned bullet points
const MAX_BULLETS: usize = 5;

/// Instruction prefixed to the input for the bullet-draft invocation
const BULLET_INSTRUCTION: &str = "Summarise the following text into 3–5 short bullet points. Return them as separate lines, each starting with a dash '-'.\n\n";

#[derive(Error, Debug)]
pub enum SummariseError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// The summariser's output: a TL;DR paragraph and at most five bullets,
/// each non-empty after trimming. Display-only, no further lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryResult {
    pub tldr: String,
    pub bullet_points: Vec<String>,
}

/// Owns one model instance for its lifetime.
///
/// Calls are stateless with respect to each other, but the summariser is
/// not assumed safe for concurrent use; each logical session should own
/// its own instance.
pub struct Summariser<M> {
    model: M,
}

impl<M: SummarisationModel> Summariser<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Summarise `text` into a TL;DR and bullet points.
    ///
    /// Empty (after trimming) input short-circuits to an empty result
    /// without touching the model. A model response with no candidate for
    /// the TL;DR call is fatal; a degenerate bullet draft is recovered by
    /// the sentence-split fallback instead.
    pub async fn summarise(
        &self,
        text: &str,
        max_chars: usize,
    ) -> Result<SummaryResult, SummariseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SummaryResult::default());
        }

        let text = truncate_chars(text, MAX_INPUT_CHARS);

        // One budget governs both invocations.
        let effective_tokens = max_chars.clamp(MIN_TOKENS, MAX_TOKENS);
        let params = GenerationParams {
            max_length: effective_tokens,
            min_length: effective_tokens / 4,
            do_sample: false,
            truncation: true,
        };

        let tldr = self.model.generate(text, &params).await?.trim().to_string();

        let bullet_prompt = format!("{BULLET_INSTRUCTION}{text}");
        let draft = self.model.generate(&bullet_prompt, &params).await?;
        let bullet_points = parse_bullets(&draft);

        Ok(SummaryResult {
            tldr,
            bullet_points,
        })
    }
}

/// Truncate to the first `max_chars` characters (code points, not bytes).
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Turn a raw bullet draft into a clean list of at most five bullets.
///
/// Line-based parse first: trim each line, drop empties, strip one leading
/// `-`/`•`/`*` marker and re-trim. If that yields one entry or fewer the
/// model did not produce line-separated bullets, so the draft is re-split
/// on `". "` instead, with `•` characters removed and trailing periods
/// stripped from each fragment.
pub fn parse_bullets(draft: &str) -> Vec<String> {
    let mut bullets: Vec<String> = Vec::new();
    for line in draft.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line = line.strip_prefix(['-', '•', '*']).map_or(line, str::trim);
        if !line.is_empty() {
            bullets.push(line.to_string());
        }
    }

    if bullets.len() <= 1 {
        let flat = draft.replace('•', "");
        bullets = flat
            .split(". ")
            .map(|fragment| fragment.trim().trim_end_matches('.'))
            .filter(|fragment| !fragment.is_empty())
            .map(String::from)
            .collect();
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted model: returns canned candidates in order and records
    /// every call it receives.
    struct MockModel {
        responses: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<(String, GenerationParams)>>,
    }

    impl MockModel {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, GenerationParams)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SummarisationModel for MockModel {
        async fn generate(
            &self,
            text: &str,
            params: &GenerationParams,
        ) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push((text.to_string(), *params));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(ModelError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn empty_input_returns_empty_result_without_model_call() {
        let summariser = Summariser::new(MockModel::new(&[]));

        let result = summariser.summarise("   \n\t  ", 300).await.unwrap();

        assert_eq!(result, SummaryResult::default());
        assert!(summariser.model.calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_input_is_capped_at_4000_chars() {
        let summariser = Summariser::new(MockModel::new(&["tldr", "- a\n- b"]));
        let input = "x".repeat(4500);

        summariser.summarise(&input, 300).await.unwrap();

        let calls = summariser.model.calls();
        assert_eq!(calls[0].0.chars().count(), 4000);
        assert_eq!(calls[0].0, input[..4000]);
        // the bullet prompt wraps the same capped text
        assert_eq!(calls[1].0, format!("{BULLET_INSTRUCTION}{}", &input[..4000]));
    }

    #[tokio::test]
    async fn multibyte_input_is_capped_on_char_boundaries() {
        let summariser = Summariser::new(MockModel::new(&["tldr", "- a\n- b"]));
        let input = "é".repeat(4100);

        summariser.summarise(&input, 300).await.unwrap();

        let calls = summariser.model.calls();
        assert_eq!(calls[0].0.chars().count(), 4000);
    }

    #[tokio::test]
    async fn token_budget_is_clamped_and_shared() {
        let summariser = Summariser::new(MockModel::new(&["t", "- a\n- b", "t", "- a\n- b"]));

        summariser.summarise("some text", 30).await.unwrap();
        summariser.summarise("some text", 350).await.unwrap();

        let calls = summariser.model.calls();
        // max_chars=30 clamps up to 50 tokens, min 12
        assert_eq!(calls[0].1.max_length, 50);
        assert_eq!(calls[0].1.min_length, 12);
        assert_eq!(calls[1].1, calls[0].1);
        // max_chars=350 clamps down to 200 tokens, min 50
        assert_eq!(calls[2].1.max_length, 200);
        assert_eq!(calls[2].1.min_length, 50);
    }

    #[tokio::test]
    async fn decoding_is_deterministic_with_truncation() {
        let summariser = Summariser::new(MockModel::new(&["t", "- a\n- b"]));

        summariser.summarise("some text", 300).await.unwrap();

        for (_, params) in summariser.model.calls() {
            assert!(!params.do_sample);
            assert!(params.truncation);
        }
    }

    #[tokio::test]
    async fn tldr_is_trimmed_first_candidate() {
        let summariser = Summariser::new(MockModel::new(&["  the gist \n", "- a\n- b"]));

        let result = summariser.summarise("some text", 300).await.unwrap();

        assert_eq!(result.tldr, "the gist");
        assert_eq!(result.bullet_points, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn missing_tldr_candidate_is_fatal() {
        let summariser = Summariser::new(MockModel::new(&[]));

        let err = summariser.summarise("some text", 300).await;

        assert!(matches!(
            err,
            Err(SummariseError::Model(ModelError::EmptyResponse))
        ));
    }

    #[test]
    fn parses_dashed_lines() {
        let bullets = parse_bullets("- First point\n- Second point\n- Third point");

        assert_eq!(bullets, vec!["First point", "Second point", "Third point"]);
    }

    #[test]
    fn strips_alternative_markers_and_blank_lines() {
        let bullets = parse_bullets("• One\n\n* Two\n   Three  \n");

        assert_eq!(bullets, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn falls_back_to_sentence_splitting() {
        let bullets = parse_bullets("First point. Second point. Third point.");

        assert_eq!(bullets, vec!["First point", "Second point", "Third point"]);
    }

    #[test]
    fn fallback_removes_bullet_chars_and_trailing_periods() {
        let bullets = parse_bullets("• One thing. • Another thing.");

        assert_eq!(bullets, vec!["One thing", "Another thing"]);
    }

    #[test]
    fn single_bulleted_line_still_takes_the_fallback() {
        // One parsed bullet is treated the same as none.
        let bullets = parse_bullets("- Only point covering everything");

        assert_eq!(bullets, vec!["- Only point covering everything"]);
    }

    #[test]
    fn line_parse_is_capped_at_five() {
        let bullets = parse_bullets("- a\n- b\n- c\n- d\n- e\n- f\n- g");

        assert_eq!(bullets, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn fallback_is_capped_at_five() {
        let bullets = parse_bullets("One. Two. Three. Four. Five. Six. Seven.");

        assert_eq!(bullets.len(), 5);
        assert_eq!(bullets[4], "Five");
    }

    #[test]
    fn empty_draft_yields_no_bullets() {
        assert!(parse_bullets("").is_empty());
        assert!(parse_bullets("   \n  ").is_empty());
    }
}
