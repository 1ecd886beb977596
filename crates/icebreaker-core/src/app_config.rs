/// Hard upper bound on entity-resolution cycles, whatever the configuration says.
pub const RESOLVER_CYCLE_CEILING: u32 = 15;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub user_agent: String,

    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub serp_api_key: String,
    pub serp_base_url: String,
    pub proxycurl_api_key: String,
    pub proxycurl_base_url: String,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub twitter_base_url: String,

    pub request_timeout_secs: u64,
    pub call_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,

    pub resolver_max_cycles: u32,
    pub activity_fetch_count: u32,
    pub schema_retry: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("openai_api_key", &"[redacted]")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("serp_api_key", &"[redacted]")
            .field("serp_base_url", &self.serp_base_url)
            .field("proxycurl_api_key", &"[redacted]")
            .field("proxycurl_base_url", &self.proxycurl_base_url)
            .field("rapidapi_key", &"[redacted]")
            .field("rapidapi_host", &self.rapidapi_host)
            .field("twitter_base_url", &self.twitter_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("resolver_max_cycles", &self.resolver_max_cycles)
            .field("activity_fetch_count", &self.activity_fetch_count)
            .field("schema_retry", &self.schema_retry)
            .finish()
    }
}
