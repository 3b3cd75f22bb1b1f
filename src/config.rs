use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL used for the catalog lookup cache
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Jikan (MyAnimeList) API base URL
    #[serde(default = "default_jikan_api_url")]
    pub jikan_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendations returned when a request does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Candidates fetched by genre when a request does not ask for a pool size
    #[serde(default = "default_candidate_pool_size")]
    pub candidate_pool_size: usize,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_jikan_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_count() -> usize {
    5
}

fn default_candidate_pool_size() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
