use crate::config::ProbeConfig;
use crate::probes::types::{
    ModelDetails, ModelInventory, ModelSummary, OpenAiModelsResponse, ShowResponse, TagsResponse,
};
use crate::probes::{http_client, preview};

/// List models via the native `/api/tags` endpoint. Zero models is a valid
/// inventory, not an error.
pub fn list_native_models(config: &ProbeConfig) -> ModelInventory {
    let endpoint = config.native_url("tags");
    let mut inventory = empty_inventory("native", &endpoint);

    let client = match http_client(config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            inventory.error = Some(e.to_string());
            return inventory;
        }
    };

    match client.get(&endpoint).headers(config.headers()).send() {
        Ok(response) => {
            let status = response.status();
            inventory.status_code = Some(status.as_u16());
            if status.is_success() {
                match response.json::<TagsResponse>() {
                    Ok(tags) => {
                        inventory.models = tags
                            .models
                            .into_iter()
                            .map(|entry| ModelSummary {
                                name: entry.name,
                                size_bytes: entry.size,
                                modified_at: entry.modified_at,
                                created: None,
                            })
                            .collect();
                        inventory.count = inventory.models.len();
                    }
                    Err(e) => {
                        inventory.error = Some(format!("malformed response body: {}", e));
                    }
                }
            } else {
                let body = response.text().unwrap_or_default();
                inventory.error = Some(preview(&body, 200));
            }
        }
        Err(e) => {
            inventory.error = Some(e.to_string());
        }
    }

    inventory
}

/// List models via the OpenAI-compatible `/v1/models` endpoint.
pub fn list_openai_models(config: &ProbeConfig) -> ModelInventory {
    let endpoint = config.openai_url("models");
    let mut inventory = empty_inventory("openai", &endpoint);

    let client = match http_client(config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            inventory.error = Some(e.to_string());
            return inventory;
        }
    };

    match client.get(&endpoint).headers(config.headers()).send() {
        Ok(response) => {
            let status = response.status();
            inventory.status_code = Some(status.as_u16());
            if status.is_success() {
                match response.json::<OpenAiModelsResponse>() {
                    Ok(models) => {
                        inventory.models = models
                            .data
                            .into_iter()
                            .map(|entry| ModelSummary {
                                name: entry.id,
                                size_bytes: None,
                                modified_at: None,
                                created: entry.created,
                            })
                            .collect();
                        inventory.count = inventory.models.len();
                    }
                    Err(e) => {
                        inventory.error = Some(format!("malformed response body: {}", e));
                    }
                }
            } else {
                let body = response.text().unwrap_or_default();
                inventory.error = Some(preview(&body, 200));
            }
        }
        Err(e) => {
            inventory.error = Some(e.to_string());
        }
    }

    inventory
}

/// Fetch model metadata via `POST /api/show`.
pub fn show_model(config: &ProbeConfig, model: &str) -> ModelDetails {
    let mut details = ModelDetails {
        model: model.to_string(),
        parameters: None,
        template_chars: None,
        modelfile_chars: None,
        status_code: None,
        error: None,
    };

    let client = match http_client(config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            details.error = Some(e.to_string());
            return details;
        }
    };

    let payload = serde_json::json!({ "name": model });
    match client
        .post(config.native_url("show"))
        .headers(config.headers())
        .json(&payload)
        .send()
    {
        Ok(response) => {
            let status = response.status();
            details.status_code = Some(status.as_u16());
            if status.is_success() {
                match response.json::<ShowResponse>() {
                    Ok(show) => {
                        details.parameters = show.parameters;
                        details.template_chars = show.template.map(|t| t.chars().count());
                        details.modelfile_chars = show.modelfile.map(|m| m.chars().count());
                    }
                    Err(e) => {
                        details.error = Some(format!("malformed response body: {}", e));
                    }
                }
            } else {
                let body = response.text().unwrap_or_default();
                details.error = Some(preview(&body, 300));
            }
        }
        Err(e) => {
            details.error = Some(e.to_string());
        }
    }

    details
}

/// The configured model, or the first model the service lists when none is
/// configured. Errors when the service lists none either.
pub fn resolve_model(config: &ProbeConfig) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(model) = &config.model {
        return Ok(model.clone());
    }

    let inventory = list_native_models(config);
    if let Some(error) = inventory.error {
        return Err(format!("cannot pick a model, model listing failed: {}", error).into());
    }
    inventory
        .models
        .first()
        .map(|m| m.name.clone())
        .ok_or_else(|| "no model configured and the service lists none; pass --model".into())
}

fn empty_inventory(api: &str, endpoint: &str) -> ModelInventory {
    ModelInventory {
        api: api.to_string(),
        endpoint: endpoint.to_string(),
        count: 0,
        models: Vec::new(),
        status_code: None,
        error: None,
    }
}
