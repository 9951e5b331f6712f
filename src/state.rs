use std::sync::Arc;

use crate::config::Config;
use crate::github::GithubSearch;
use crate::llm::OpenAiChat;
use crate::pipeline::Pipeline;

/// Shared application state. Everything inside is read-only after startup,
/// so clones are cheap and requests stay fully isolated.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let searcher = Arc::new(GithubSearch::new(
            http_client.clone(),
            config.github.clone(),
            config.blocklist.clone(),
        ));
        let chat = Arc::new(OpenAiChat::new(http_client, config.llm.clone()));
        let pipeline = Arc::new(Pipeline::new(searcher, chat, &config));

        Ok(Self { config, pipeline })
    }
}
