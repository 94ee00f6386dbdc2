use std::sync::{Arc, Mutex};
use eframe::egui::{self};
use log::{error, info, warn};
use rust_i18n::t;
use tokio::runtime::Handle;
use crate::common::{AppError, ApiKey, CompletionModel, DEFAULT_SAMPLE_COUNT, DEFAULT_TEMPERATURE, GenerationRequest, parse_or_default};
use crate::credentials::CredentialStore;
use crate::gui::form::ui_form;
use crate::gui::response::ui_response;
use crate::gui::top_panel::ui_top_panel;
use crate::openai::CompletionClient;

mod top_panel;
mod form;
mod response;

pub struct MyAppPermanent {
    pub rt: Handle,
    pub app_language: Mutex<String>,
}

// All form state lives here; widgets read and write these fields and the
// event handlers are methods.
pub struct State {
    perma: Arc<MyAppPermanent>,
    credentials: Option<CredentialStore>,
    client: CompletionClient,
    api_key_entered: String,
    model: CompletionModel,
    prompt: String,
    max_tokens: u32,
    max_tokens_ceiling: u32,
    temperature_entered: String,
    n_entered: String,
    response: String,
}

impl State {
    pub fn new(
        permanent: Arc<MyAppPermanent>,
        credentials: Option<CredentialStore>,
        client: CompletionClient,
    ) -> Self {
        let api_key_entered = match &credentials {
            Some(store) => store.load(),
            None => String::new(),
        };
        let model = CompletionModel::default();

        Self {
            perma: permanent,
            credentials,
            client,
            api_key_entered,
            model,
            prompt: String::new(),
            max_tokens: model.ceiling() / 2,
            max_tokens_ceiling: model.ceiling(),
            temperature_entered: String::new(),
            n_entered: String::new(),
            response: String::new(),
        }
    }

    /// Persists the key field; called on every edit.
    pub fn on_api_key_changed(&mut self) {
        let Some(store) = &self.credentials else {
            warn!("No credential location available, key not saved");
            return;
        };
        if let Err(error) = store.store(&self.api_key_entered) {
            error!("Error saving the API key to {}: {}",
                store.path().display(), error);
        }
    }

    /// Switching to a model with a different ceiling resets the slider to
    /// half of the new ceiling.
    pub fn on_model_changed(&mut self, model: CompletionModel) {
        self.model = model;
        let ceiling = model.ceiling();
        if self.max_tokens_ceiling == ceiling {
            return;
        }
        self.max_tokens_ceiling = ceiling;
        self.max_tokens = ceiling / 2;
        info!("model {} selected, max tokens reset to {}", model, self.max_tokens);
    }

    pub fn on_max_tokens_changed(&mut self, value: u32) {
        self.max_tokens = value.clamp(1, self.max_tokens_ceiling);
    }

    pub fn max_tokens_label(&self) -> String {
        t!("max_tokens_label", value = self.max_tokens).to_string()
    }

    pub fn build_request(&self) -> GenerationRequest {
        GenerationRequest {
            api_key: ApiKey::from(self.api_key_entered.as_str()),
            model: self.model,
            prompt: self.prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: parse_or_default(&self.temperature_entered,
                DEFAULT_TEMPERATURE),
            n: parse_or_default(&self.n_entered, DEFAULT_SAMPLE_COUNT),
        }
    }

    /// Runs one completion, blocking the calling thread until it returns.
    pub fn on_submit(&mut self) {
        let request = self.build_request();
        if !request.api_key.is_set {
            warn!("submitting without an API key");
        }
        info!("submitting prompt of {} bytes to {}", request.prompt.len(),
            request.model);
        let result = self.perma.rt.block_on(
            self.client.create_completion(&request));
        self.show_result(result);
    }

    pub fn show_result(&mut self, result: Result<String, AppError>) {
        match result {
            Ok(text) => {
                self.response = text;
            }
            Err(error) => {
                error!("completion failed: {}", error);
                self.response = error.to_string();
            }
        }
    }
}

pub struct MyApp {
    perma: Arc<MyAppPermanent>,
    state: State,
}

impl MyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>,
            permanent: MyAppPermanent) -> Self {
        let perma_arc = Arc::new(permanent);
        let credentials = match CredentialStore::default_location() {
            Ok(store) => Some(store),
            Err(error) => {
                error!("{}", error);
                None
            }
        };

        Self {
            perma: perma_arc.clone(),
            state: State::new(perma_arc, credentials, CompletionClient::default()),
        }
    }
}

impl eframe::App for MyApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(app_language) = self.perma.app_language.lock() {
            eframe::set_value(storage, "app_language", &*app_language);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        ui_top_panel(ctx, state);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui_form(ui, state);
            ui.add_space(10.0);
            ui_response(ui, state);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    // Helper: state with a temp credential file and a client aimed at `url`
    fn setup_state(rt: &Runtime, dir: &tempfile::TempDir, url: &str) -> State {
        let perma = Arc::new(MyAppPermanent {
            rt: rt.handle().clone(),
            app_language: Mutex::new("en".to_string()),
        });
        let store = CredentialStore::at(dir.path().join("api_key.json"));
        State::new(perma, Some(store), CompletionClient::with_base_url(url))
    }

    #[test]
    fn test_initial_state() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let state = setup_state(&rt, &dir, "http://127.0.0.1:9");

        assert_eq!(state.api_key_entered, "");
        assert_eq!(state.model, CompletionModel::CodeDavinci002);
        assert_eq!(state.max_tokens_ceiling, 8000);
        assert_eq!(state.max_tokens, 4000);
        assert_eq!(state.max_tokens_label(), "Max tokens: 4000");
    }

    #[test]
    fn test_key_is_persisted_and_reloaded() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut state = setup_state(&rt, &dir, "http://127.0.0.1:9");

        state.api_key_entered = "sk-live".to_string();
        state.on_api_key_changed();

        let reloaded = setup_state(&rt, &dir, "http://127.0.0.1:9");
        assert_eq!(reloaded.api_key_entered, "sk-live");
    }

    #[test]
    fn test_model_change_resets_to_midpoint() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut state = setup_state(&rt, &dir, "http://127.0.0.1:9");

        state.on_max_tokens_changed(7000);
        state.on_model_changed(CompletionModel::TextCurie001);
        assert_eq!(state.max_tokens_ceiling, 2048);
        assert_eq!(state.max_tokens, 1024);

        // same ceiling: the value is kept
        state.on_max_tokens_changed(1500);
        state.on_model_changed(CompletionModel::TextAda001);
        assert_eq!(state.model, CompletionModel::TextAda001);
        assert_eq!(state.max_tokens, 1500);

        state.on_model_changed(CompletionModel::TextDavinci003);
        assert_eq!(state.max_tokens, 2000);
    }

    #[test]
    fn test_slider_is_bounded() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut state = setup_state(&rt, &dir, "http://127.0.0.1:9");

        state.on_model_changed(CompletionModel::CodeCushman001);
        state.on_max_tokens_changed(9000);
        assert_eq!(state.max_tokens, 2048);
        state.on_max_tokens_changed(0);
        assert_eq!(state.max_tokens, 1);
    }

    #[test]
    fn test_request_fallbacks() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut state = setup_state(&rt, &dir, "http://127.0.0.1:9");

        state.temperature_entered = "abc".to_string();
        state.n_entered = String::new();
        let request = state.build_request();
        assert_eq!(request.temperature, 0);
        assert_eq!(request.n, 1);

        state.temperature_entered = "1".to_string();
        state.n_entered = "3".to_string();
        let request = state.build_request();
        assert_eq!(request.temperature, 1);
        assert_eq!(request.n, 3);
    }

    #[test]
    fn test_submit_success_replaces_response() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/completions")
            .match_header("authorization", "Bearer sk-form")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "code-davinci-002",
                "prompt": "# sum a list",
                "max_tokens": 4000,
                "temperature": 0,
                "n": 1,
            })))
            .with_status(200)
            .with_body(r#"{"choices": [{"text": "sum(xs)"}, {"text": "other"}]}"#)
            .create();

        let mut state = setup_state(&rt, &dir, &server.url());
        state.api_key_entered = "sk-form".to_string();
        state.prompt = "# sum a list".to_string();
        state.temperature_entered = "hot".to_string();
        state.response = "previous".to_string();
        state.on_submit();

        mock.assert();
        assert_eq!(state.response, "sum(xs)");
    }

    #[test]
    fn test_submit_failure_shows_only_error() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/completions")
            .with_status(429)
            .with_body(r#"{"error": {"message": "You exceeded your current quota"}}"#)
            .create();

        let mut state = setup_state(&rt, &dir, &server.url());
        state.response = "previous".to_string();
        state.on_submit();

        assert_eq!(state.response, "You exceeded your current quota (HTTP 429)");
    }

    #[test]
    fn test_show_result_error_text() {
        let rt = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut state = setup_state(&rt, &dir, "http://127.0.0.1:9");

        state.response = "old output".to_string();
        state.show_result(Err(AppError::NoCandidates));
        assert_eq!(state.response, AppError::NoCandidates.to_string());
    }
}
