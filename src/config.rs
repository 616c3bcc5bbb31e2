use std::net::SocketAddr;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_log_config")]
    pub log_config: String,
    #[serde(default)]
    pub question_service: QuestionServiceConfig,
    #[serde(default)]
    pub quiz_service: QuizServiceConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct QuestionServiceConfig {
    pub host: String,
    pub port: u16,
    /// JSON array of questions loaded at startup.
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct QuizServiceConfig {
    pub host: String,
    pub port: u16,
    pub question_service_url: String,
}

fn default_log_config() -> String {
    "log4rs.yaml".to_string()
}

impl Default for QuestionServiceConfig {
    fn default() -> Self {
        QuestionServiceConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            seed_file: None,
        }
    }
}

impl Default for QuizServiceConfig {
    fn default() -> Self {
        QuizServiceConfig {
            host: "127.0.0.1".to_string(),
            port: 8090,
            question_service_url: "http://127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    /// Reads `<name>.toml` if present, then `QUIZ_PLATFORM__*` variables.
    pub fn load(name: &str) -> Result<Config, ::config::ConfigError> {
        dotenvy::dotenv().ok();

        ::config::Config::builder()
            .add_source(::config::File::with_name(name).required(false))
            .add_source(
                ::config::Environment::with_prefix("QUIZ_PLATFORM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Config>()
    }
}

impl QuestionServiceConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl QuizServiceConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
