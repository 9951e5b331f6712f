//! Logic-mode expansion: delegate keyword derivation to an LLM completion
//! with a strict JSON-array response contract.
//!
//! The completion is a typed boundary: either the response parses into a
//! non-empty list of strings, or the request fails. An unparseable first
//! response gets exactly one retry with a stricter reformulation prompt.
//! There is no silent fallback to the heuristic expander.

use crate::error::ExpansionError;
use crate::expand::KeywordSet;
use crate::llm::ChatBackend;

/// Cap on keywords taken from the completion, matching the heuristic's bound.
const MAX_KEYWORDS: usize = 5;

pub async fn expand_with_llm(
    chat: &dyn ChatBackend,
    domain: &str,
) -> Result<KeywordSet, ExpansionError> {
    let first = chat
        .complete(&build_keyword_prompt(domain))
        .await
        .map_err(|e| ExpansionError(format!("chat completion failed: {e:#}")))?;

    match parse_keywords(&first) {
        Ok(keywords) => return KeywordSet::new(keywords),
        Err(e) => {
            tracing::warn!("First keyword completion unparseable ({e}), retrying stricter");
        }
    }

    let second = chat
        .complete(&build_strict_prompt(domain))
        .await
        .map_err(|e| ExpansionError(format!("chat completion retry failed: {e:#}")))?;

    let keywords = parse_keywords(&second)
        .map_err(|e| ExpansionError(format!("completion unparseable after retry: {e}")))?;
    KeywordSet::new(keywords)
}

fn build_keyword_prompt(domain: &str) -> String {
    format!(
        "You help users discover high-quality GitHub resources for a technology domain. \
         The user is interested in: \"{domain}\".\n\n\
         Generate a list of 5 diverse English search keywords covering different resource \
         types (tutorials, guides, roadmaps, awesome lists, best practices, example projects). \
         If the domain is not in English, translate it first and produce English keywords.\n\n\
         Respond with ONLY a JSON array of 5 strings. No explanation.\n\
         Example: [\"docker tutorial\", \"kubernetes guide\", \"containerization roadmap\", \
         \"awesome containers\", \"docker best practices\"]"
    )
}

/// Reformulated prompt used after a parse failure: shorter, with the output
/// shape stated twice and nothing else asked for.
fn build_strict_prompt(domain: &str) -> String {
    format!(
        "Output a JSON array of exactly 5 English GitHub search keywords for the domain \
         \"{domain}\". Output MUST be a bare JSON array of strings, for example \
         [\"a\", \"b\", \"c\", \"d\", \"e\"]. Do not output markdown fences, prose, or \
         anything except the JSON array."
    )
}

/// Parse the completion into a keyword list or a structured failure.
///
/// Tolerates surrounding prose and markdown fences by extracting the outermost
/// bracketed span, but the span itself must be a valid JSON string array.
fn parse_keywords(content: &str) -> Result<Vec<String>, String> {
    let json_str = match (content.find('['), content.rfind(']')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => return Err("no JSON array found in completion".to_string()),
    };

    let keywords: Vec<String> =
        serde_json::from_str(json_str).map_err(|e| format!("invalid JSON array: {e}"))?;
    if keywords.iter().all(|k| k.trim().is_empty()) {
        return Err("completion contained no usable keywords".to_string());
    }
    Ok(keywords.into_iter().take(MAX_KEYWORDS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedChat {
        responses: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedChat {
        fn new(responses: Vec<&'static str>) -> Self {
            Self {
                responses,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedChat {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .responses
                .get(i)
                .copied()
                .unwrap_or("out of responses")
                .to_string())
        }
    }

    #[test]
    fn test_parse_clean_json_array() {
        let keywords =
            parse_keywords(r#"["docker tutorial", "kubernetes guide"]"#).unwrap();
        assert_eq!(keywords, vec!["docker tutorial", "kubernetes guide"]);
    }

    #[test]
    fn test_parse_json_embedded_in_text() {
        let input = "Sure! Here you go:\n[\"rust web\", \"axum examples\"]\nHope that helps.";
        let keywords = parse_keywords(input).unwrap();
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn test_parse_json_in_markdown_code_block() {
        let input = "```json\n[\"ml roadmap\", \"awesome ml\"]\n```";
        assert_eq!(parse_keywords(input).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_truncates_to_cap() {
        let input = r#"["a", "b", "c", "d", "e", "f", "g"]"#;
        assert_eq!(parse_keywords(input).unwrap().len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_keywords("I don't understand the question.").is_err());
    }

    #[test]
    fn test_parse_unclosed_bracket_is_an_error() {
        assert!(parse_keywords("[\"partial").is_err());
    }

    #[test]
    fn test_parse_empty_array_is_an_error() {
        assert!(parse_keywords("[]").is_err());
    }

    #[tokio::test]
    async fn test_first_good_response_needs_no_retry() {
        let chat = ScriptedChat::new(vec![r#"["kubernetes", "docker swarm", "helm charts"]"#]);
        let set = expand_with_llm(&chat, "container orchestration").await.unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unparseable_first_response_retried_once() {
        let chat = ScriptedChat::new(vec![
            "As an AI, I would suggest several excellent keywords.",
            r#"["terraform modules", "ansible playbooks"]"#,
        ]);
        let set = expand_with_llm(&chat, "infrastructure as code").await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_two_unparseable_responses_fail_expansion() {
        let chat = ScriptedChat::new(vec!["nonsense", "still nonsense"]);
        let err = expand_with_llm(&chat, "quantum computing").await.unwrap_err();
        assert!(err.to_string().contains("after retry"));
        assert_eq!(chat.calls.load(Ordering::SeqCst), 2);
    }
}
