use secrecy::SecretString;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

pub const OPENAI_API_BASE: &str = "https://api.openai.com";

// credential record lives at ~/<CREDENTIAL_DIR>/<CREDENTIAL_FILE>
pub const CREDENTIAL_DIR: &str = ".openai";
pub const CREDENTIAL_FILE: &str = "api_key.json";

pub const DEFAULT_TEMPERATURE: i64 = 0;
pub const DEFAULT_SAMPLE_COUNT: i64 = 1;

#[derive(Default, Clone)]
pub struct ApiKey {
    pub key: SecretString,
    pub is_set: bool,
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self {
            key: value.into(),
            is_set: !value.is_empty(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Home Directory Error: could not locate the home directory")]
    HomeDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("The completion service returned no choices")]
    NoCandidates,
}

// Completion models offered in the selector. The order here is the order in
// the combo box and the first variant is the initial selection.
#[derive(Default, Display, EnumString, EnumIter, Debug, Clone, Copy,
    PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum CompletionModel {
    #[default]
    #[strum(serialize = "code-davinci-002")]
    #[serde(rename = "code-davinci-002")]
    CodeDavinci002,
    #[strum(serialize = "code-cushman-001")]
    #[serde(rename = "code-cushman-001")]
    CodeCushman001,
    #[strum(serialize = "text-davinci-003")]
    #[serde(rename = "text-davinci-003")]
    TextDavinci003,
    #[strum(serialize = "text-curie-001")]
    #[serde(rename = "text-curie-001")]
    TextCurie001,
    #[strum(serialize = "text-babbage-001")]
    #[serde(rename = "text-babbage-001")]
    TextBabbage001,
    #[strum(serialize = "text-ada-001")]
    #[serde(rename = "text-ada-001")]
    TextAda001,
}

impl CompletionModel {
    /// Maximum number of tokens the model may be asked to generate.
    pub fn ceiling(self) -> u32 {
        match self {
            CompletionModel::CodeDavinci002 => 8000,
            CompletionModel::CodeCushman001 => 2048,
            CompletionModel::TextDavinci003 => 4000,
            CompletionModel::TextCurie001 => 2048,
            CompletionModel::TextBabbage001 => 2048,
            CompletionModel::TextAda001 => 2048,
        }
    }

    pub fn all() -> impl Iterator<Item = CompletionModel> {
        CompletionModel::iter()
    }
}

// everything the dispatcher needs for one call, built fresh on each submit
#[derive(Clone)]
pub struct GenerationRequest {
    pub api_key: ApiKey,
    pub model: CompletionModel,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: i64,
    pub n: i64,
}

/// Parses an integer form field, substituting `default` for anything that is
/// not a plain integer (empty, letters, overflow).
pub fn parse_or_default(input: &str, default: i64) -> i64 {
    input.trim().parse::<i64>().unwrap_or(default)
}

/// Keeps only what an integer field accepts: an optional leading minus sign
/// followed by ASCII digits. Returns true when `input` was modified.
pub fn retain_integer_chars(input: &mut String) -> bool {
    let filtered: String = input
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
        .map(|(_, c)| c)
        .collect();
    if filtered != *input {
        *input = filtered;
        return true;
    }
    false
}

pub fn mask_key_secure(key: &str) -> String {
    let char_count = key.chars().count();

    // too short to reveal anything
    if char_count <= 4 {
        return "***".to_string();
    }

    let start: String = key.chars().take(2).collect();
    let end: String = key.chars().rev().take(2).collect::<Vec<_>>()
    .into_iter().rev().collect();

    format!("{}..{}", start, end)
}
