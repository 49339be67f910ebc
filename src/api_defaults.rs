// Remote REST API used when the configuration does not provide one.
pub const GITHUB_API_URL: &str = "https://api.github.com";

// https://docs.github.com/en/rest/using-the-rest-api/getting-started-with-the-rest-api#media-types
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

pub const USER_AGENT: &str = "tagcall";

pub const JSON_CONTENT_TYPE: &str = "application/json";

// Relative to $HOME
pub const CONFIG_PATH: &str = ".config/tagcall/config.toml";

// Environment variables take precedence over the config file.
pub const USERNAME_ENV_VAR: &str = "GITHUB_USERNAME";
pub const ACCESS_TOKEN_ENV_VAR: &str = "GITHUB_ACCESS_TOKEN";

// Global timeout for a whole HTTP call, including reading the body.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
