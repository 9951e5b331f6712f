use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// GitHub search API configuration
    pub github: GithubConfig,
    /// LLM provider configuration (logic mode only)
    pub llm: LlmConfig,
    /// Maximum entries in the final ranked report
    pub max_report_entries: usize,
    /// Whole-request timeout in seconds; in-flight searches are abandoned
    /// when it elapses
    pub request_timeout_secs: u64,
    /// Lowercase substrings that disqualify a candidate when found in its
    /// name or description
    pub blocklist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL for the GitHub REST API
    pub api_url: String,
    /// Personal access token; unauthenticated requests get a far lower
    /// rate-limit budget
    pub token: Option<String>,
    /// Results fetched per keyword (first page only)
    pub per_page: usize,
    /// Retries per keyword after a rate-limit response
    pub rate_limit_retries: u32,
    /// Delay before the first rate-limit retry; doubled for each subsequent one
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for an OpenAI-compatible chat completions API
    pub base_url: String,
    /// Model name for keyword generation
    pub model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7111".to_string(),
            github: GithubConfig::default(),
            llm: LlmConfig::default(),
            max_report_entries: 20,
            request_timeout_secs: 60,
            blocklist: Vec::new(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            per_page: 10,
            rate_limit_retries: 2,
            backoff_ms: 500,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
            temperature: 0.3,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("AWESOME_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config.github.api_url = url;
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            config.github.token = Some(token);
        }
        if let Ok(val) = std::env::var("GITHUB_PER_PAGE") {
            if let Ok(v) = val.parse() {
                config.github.per_page = v;
            }
        }
        if let Ok(val) = std::env::var("GITHUB_RATE_LIMIT_RETRIES") {
            if let Ok(v) = val.parse() {
                config.github.rate_limit_retries = v;
            }
        }
        if let Ok(val) = std::env::var("GITHUB_BACKOFF_MS") {
            if let Ok(v) = val.parse() {
                config.github.backoff_ms = v;
            }
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(v) = val.parse() {
                config.llm.temperature = v;
            }
        }
        if let Ok(val) = std::env::var("AWESOME_SEARCH_MAX_REPORT_ENTRIES") {
            if let Ok(v) = val.parse() {
                config.max_report_entries = v;
            }
        }
        if let Ok(val) = std::env::var("AWESOME_SEARCH_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.request_timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("AWESOME_SEARCH_BLOCKLIST") {
            config.blocklist = val
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }
}
