//! Workshop advice from an OpenAI-compatible chat-completions endpoint.

use super::{
    find_or_not_found,
    invoices::{ClientBilling, InvoiceService},
    planning::PlanningService,
    validate_not_blank,
};
use crate::{
    config::AppConfig,
    entities::{Client, ClientModel, PlanningEventModel},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::{fmt::Write as _, sync::Arc, time::Duration};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

const SYSTEM_PROMPT: &str = "Tu es un assistant professionnel pour un garage automobile. \
Tu aides le personnel à gérer les clients, les réparations, le planning et la facturation. \
Réponds en français, de façon concise et pratique.";

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AdviceRequest {
    #[validate(custom = "validate_not_blank")]
    pub message: String,
    /// Adds the client's billing and upcoming appointments to the prompt
    #[serde(default)]
    pub client_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdviceResponse {
    pub advice: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Clone)]
pub struct AdvisorService {
    db: Arc<DatabaseConnection>,
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    invoices: InvoiceService,
    planning: PlanningService,
}

impl AdvisorService {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let timeout = Duration::from_secs(config.ai_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            invoices: InvoiceService::new(db.clone()),
            planning: PlanningService::new(db.clone()),
            db,
            client,
            base_url: config.ai_base_url.trim_end_matches('/').to_string(),
            model: config.ai_model.clone(),
            api_key: config.ai_api_key().map(str::to_string),
        }
    }

    #[instrument(skip(self, request), fields(client_id = ?request.client_id))]
    pub async fn advise(&self, request: AdviceRequest) -> Result<AdviceResponse, ServiceError> {
        request.validate()?;

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ServiceError::ServiceUnavailable("AI assistant is not configured".to_string())
        })?;

        let context = match request.client_id {
            Some(client_id) => self.client_context(client_id).await?,
            None => "Aucun client sélectionné.".to_string(),
        };

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: format!("Contexte: {}\nQuestion: {}", context, request.message.trim()),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "AI provider rejected the request");
            return Err(ServiceError::ExternalServiceError(format!(
                "AI provider responded with status {}",
                status
            )));
        }

        let completion: ChatResponse = response.json().await?;
        let advice = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ServiceError::ExternalServiceError("AI provider returned no answer".to_string())
            })?;

        info!(chars = advice.len(), "AI advice received");
        Ok(AdviceResponse { advice })
    }

    async fn client_context(&self, client_id: i32) -> Result<String, ServiceError> {
        let client = find_or_not_found::<Client, _>(&*self.db, client_id, "Client").await?;
        let billing = self.invoices.billing_for_client(client_id).await?;
        let upcoming = self
            .planning
            .upcoming_for_client(client_id, Utc::now())
            .await?;

        Ok(describe_client(&client, &billing, &upcoming))
    }
}

fn describe_client(
    client: &ClientModel,
    billing: &ClientBilling,
    upcoming: &[PlanningEventModel],
) -> String {
    let mut text = format!("Client {}", client.display_name());
    if let Some(phone) = &client.phone {
        let _ = write!(text, " (tél. {})", phone);
    }
    let _ = write!(
        text,
        ". {} facture(s), total facturé {} € HT / {} € TTC.",
        billing.invoice_count, billing.total_ht, billing.total_ttc
    );

    if upcoming.is_empty() {
        text.push_str(" Aucun rendez-vous à venir.");
    } else {
        text.push_str(" Rendez-vous à venir:");
        for event in upcoming {
            let _ = write!(
                text,
                "\n- {} {}: {} ({})",
                event.start_at.format("%d/%m/%Y %H:%M"),
                event.car_registration,
                event.work_description,
                event.technician_name
            );
        }
    }

    text
}
