//! Discord REST client
//!
//! Thin adapter over Discord's HTTP API (v10). Calls are single-shot: no
//! retries, no rate-limit queueing. The caller decides what a failure
//! means; here every HTTP status collapses into one of the three
//! `PlatformError` variants.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use warden_core::{GuildDirectory, PlatformClient, PlatformError, PlatformResult, Snowflake};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Audit-log reason header understood by Discord moderation endpoints
const AUDIT_REASON_HEADER: &str = "X-Audit-Log-Reason";

#[derive(Debug, Deserialize)]
struct GuildPayload {
    owner_id: String,
}

#[derive(Debug, Deserialize)]
struct MemberPayload {
    #[serde(default)]
    roles: Vec<String>,
}

/// Discord REST adapter
///
/// Holds one connection-pooled `reqwest::Client`; cloning shares the pool.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    auth_header: HeaderValue,
}

impl DiscordClient {
    /// Build a client for the given bot token
    ///
    /// # Errors
    /// Returns `Unavailable` when the token cannot form a valid header or
    /// the underlying HTTP client cannot be constructed.
    pub fn new(api_base: impl Into<String>, bot_token: &str) -> PlatformResult<Self> {
        let mut auth_header = HeaderValue::from_str(&format!("Bot {bot_token}"))
            .map_err(|_| PlatformError::Unavailable("bot token is not header-safe".to_string()))?;
        auth_header.set_sensitive(true);

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PlatformError::Unavailable(format!("http client init failed: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, self.auth_header.clone())
    }

    /// Attach the audit-log reason when it survives header encoding
    fn with_reason(builder: RequestBuilder, reason: &str) -> RequestBuilder {
        match HeaderValue::from_str(reason) {
            Ok(value) => builder.header(AUDIT_REASON_HEADER, value),
            Err(_) => {
                debug!("audit reason not header-safe, omitted");
                builder
            }
        }
    }

    async fn send(&self, builder: RequestBuilder) -> PlatformResult<Response> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(PlatformError::PermissionDenied)
            }
            StatusCode::NOT_FOUND => Err(PlatformError::NotFound),
            other => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %other, body = %body, "discord request rejected");
                Err(PlatformError::Unavailable(format!(
                    "discord returned {other}"
                )))
            }
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> PlatformError {
    if err.is_timeout() {
        PlatformError::Unavailable("discord request timed out".to_string())
    } else {
        PlatformError::Unavailable(format!("discord request failed: {err}"))
    }
}

fn parse_snowflake(raw: &str) -> PlatformResult<Snowflake> {
    raw.parse()
        .map_err(|_| PlatformError::Unavailable(format!("malformed snowflake in response: {raw}")))
}

#[async_trait]
impl PlatformClient for DiscordClient {
    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id, minutes))]
    async fn timeout_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        minutes: i32,
        reason: &str,
    ) -> PlatformResult<()> {
        let until = Utc::now() + ChronoDuration::minutes(i64::from(minutes));
        let builder = self
            .authed(
                self.http
                    .patch(self.url(&format!("/guilds/{guild_id}/members/{user_id}"))),
            )
            .json(&json!({
                "communication_disabled_until": until.to_rfc3339(),
            }));
        self.send(Self::with_reason(builder, reason)).await?;
        Ok(())
    }

    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn kick_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> PlatformResult<()> {
        let builder = self.authed(
            self.http
                .delete(self.url(&format!("/guilds/{guild_id}/members/{user_id}"))),
        );
        self.send(Self::with_reason(builder, reason)).await?;
        Ok(())
    }

    #[instrument(skip(self, reason), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn ban_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> PlatformResult<()> {
        let builder = self
            .authed(
                self.http
                    .put(self.url(&format!("/guilds/{guild_id}/bans/{user_id}"))),
            )
            .json(&json!({}));
        self.send(Self::with_reason(builder, reason)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id, role_id = %role_id))]
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        let builder = self.authed(self.http.put(self.url(&format!(
            "/guilds/{guild_id}/members/{user_id}/roles/{role_id}"
        ))));
        self.send(builder).await?;
        Ok(())
    }

    #[instrument(skip(self, content), fields(channel_id = %channel_id))]
    async fn send_log_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        let builder = self
            .authed(
                self.http
                    .post(self.url(&format!("/channels/{channel_id}/messages"))),
            )
            .json(&json!({ "content": content }));
        self.send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl GuildDirectory for DiscordClient {
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn owner_of(&self, guild_id: Snowflake) -> PlatformResult<Snowflake> {
        let response = self
            .send(self.authed(self.http.get(self.url(&format!("/guilds/{guild_id}")))))
            .await?;
        let guild: GuildPayload = response
            .json()
            .await
            .map_err(|e| PlatformError::Unavailable(format!("malformed guild payload: {e}")))?;
        parse_snowflake(&guild.owner_id)
    }

    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    async fn role_ids_of(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<Vec<Snowflake>> {
        let response = self
            .send(self.authed(self.http.get(
                self.url(&format!("/guilds/{guild_id}/members/{user_id}")),
            )))
            .await?;
        let member: MemberPayload = response
            .json()
            .await
            .map_err(|e| PlatformError::Unavailable(format!("malformed member payload: {e}")))?;
        member
            .roles
            .iter()
            .map(|raw| parse_snowflake(raw))
            .collect()
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
