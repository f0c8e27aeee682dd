use std::sync::Arc;

use sendyourpicks_core::api::{ApiClient, ApiError};
use sendyourpicks_core::auth::{AuthClient, AuthProvider, CookieJar};
use sendyourpicks_core::logging::Logger;
use sendyourpicks_core::Config;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AuthProvider>,
    pub api: ApiClient,
    pub logger: Logger,
    storage_key: Arc<str>,
}

impl AppState {
    pub fn new(config: &Config, provider: Arc<dyn AuthProvider>, logger: Logger) -> Result<Self, ApiError> {
        let api = ApiClient::from_config(config, logger.clone())?;
        Ok(Self {
            provider,
            api,
            logger,
            storage_key: config.auth_storage_key().into(),
        })
    }

    /// Auth client bound to one request's cookies.
    pub fn auth_client(&self, jar: CookieJar) -> AuthClient {
        AuthClient::new(
            Arc::clone(&self.provider),
            self.storage_key.as_ref(),
            jar,
            self.logger.clone(),
        )
    }
}
