//! Standard-mode expansion: a deterministic text heuristic with no external
//! calls. Tokenizes the domain, strips stopwords, expands known technology
//! aliases, and pads with generic discovery phrases to land in the 3-5 range.

/// Upper bound on derived phrases per request.
pub const MAX_KEYWORDS: usize = 5;

/// Lower bound the heuristic pads toward (the set may be smaller only if the
/// cleaned domain itself is the sole usable phrase, which padding prevents).
pub const MIN_KEYWORDS: usize = 3;

// "learning" and similar are deliberately absent: they appear inside
// technology phrases ("machine learning") that the alias table matches on.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "for", "in", "on", "to", "with", "about", "best", "top",
    "some", "good", "great", "my", "me", "i", "want", "find", "stuff", "things", "please",
];

/// Known technology aliases: a normalized domain phrase or token on the left
/// maps to concrete search phrases that practitioners actually use.
const ALIASES: &[(&str, &[&str])] = &[
    ("container orchestration", &["kubernetes", "docker swarm"]),
    ("containers", &["docker", "kubernetes"]),
    ("containerization", &["docker", "kubernetes"]),
    ("machine learning", &["deep learning", "neural networks"]),
    ("deep learning", &["pytorch", "tensorflow"]),
    ("artificial intelligence", &["machine learning", "llm"]),
    ("natural language processing", &["nlp", "transformers"]),
    ("frontend", &["react", "vue"]),
    ("web framework", &["rest api framework", "http server"]),
    ("devops", &["ci cd", "infrastructure as code"]),
    ("infrastructure as code", &["terraform", "ansible"]),
    ("message queue", &["kafka", "rabbitmq"]),
    ("databases", &["postgresql", "sqlite"]),
    ("quantitative finance", &["algorithmic trading", "backtesting"]),
    ("blockchain", &["ethereum", "smart contracts"]),
    ("observability", &["prometheus", "distributed tracing"]),
];

/// Derive search phrases from a non-blank domain description.
///
/// The cleaned domain phrase always comes first, so the original intent is
/// preserved even when no alias matches.
pub fn derive_keywords(domain: &str) -> Vec<String> {
    let cleaned = clean_phrase(domain);
    let base = if cleaned.is_empty() {
        domain.trim().to_lowercase()
    } else {
        cleaned
    };

    let mut keywords = vec![base.clone()];

    // Whole-phrase alias first, then per-token aliases.
    for (pattern, expansions) in ALIASES {
        if base == *pattern {
            keywords.extend(expansions.iter().map(|s| s.to_string()));
        }
    }
    if keywords.len() == 1 {
        for token in base.split_whitespace() {
            for (pattern, expansions) in ALIASES {
                if token == *pattern {
                    keywords.extend(expansions.iter().map(|s| s.to_string()));
                }
            }
        }
    }

    // Pad with generic discovery phrases until the minimum is reached.
    let padding = [format!("awesome {base}"), format!("{base} tutorial")];
    for pad in padding {
        if keywords.len() >= MIN_KEYWORDS {
            break;
        }
        keywords.push(pad);
    }

    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Lowercase the phrase and drop stopword tokens.
fn clean_phrase(domain: &str) -> String {
    domain
        .to_lowercase()
        .split_whitespace()
        .filter(|tok| !STOPWORDS.contains(tok))
        .collect::<Vec<_>>()
        .join(" ")
}
