use std::sync::Arc;
use std::time::Duration;

use answer_service::AnswerService;
use answer_service_http::{HttpAnswerService, HttpServiceConfig, HTTP_SERVICE_ID};
use answer_service_mock::{MockAnswerService, MOCK_SERVICE_ID};
use askdesk::EnvConfig;

pub const DEFAULT_SERVICE_ID: &str = HTTP_SERVICE_ID;

/// Simulated latency for the local mock so the waiting state is visible.
const MOCK_LATENCY: Duration = Duration::from_millis(300);

pub fn service_from_config(config: &EnvConfig) -> Result<Arc<dyn AnswerService>, String> {
    service_for_id(config.service.as_deref().unwrap_or(DEFAULT_SERVICE_ID), config)
}

pub fn service_for_id(service_id: &str, config: &EnvConfig) -> Result<Arc<dyn AnswerService>, String> {
    match service_id {
        HTTP_SERVICE_ID => {
            let mut http_config = HttpServiceConfig::new();
            if let Some(base_url) = config.base_url.as_deref() {
                http_config = http_config.with_base_url(base_url);
            }
            if let Some(timeout) = config.timeout {
                http_config = http_config.with_timeout(timeout);
            }

            let service = HttpAnswerService::new(http_config).map_err(|error| error.to_string())?;
            Ok(Arc::new(service))
        }
        MOCK_SERVICE_ID => Ok(Arc::new(MockAnswerService::new().with_delay(MOCK_LATENCY))),
        unknown => Err(format!(
            "Unsupported service '{unknown}'. Available services: {HTTP_SERVICE_ID}, {MOCK_SERVICE_ID}"
        )),
    }
}
