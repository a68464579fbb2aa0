//! Consent token manager
//!
//! Issues, verifies and revokes the time-boxed codes patients use to
//! authorize access to their federated record. Multiple concurrent tokens per
//! universal id are allowed; each is independently valid.

use crate::adapters::store::traits::{ConsentStore, IdentityStore};
use crate::config::schema::ConsentConfig;
use crate::core::consent::code::generate_consent_code;
use crate::domain::clock::Clock;
use crate::domain::consent::ConsentToken;
use crate::domain::ids::{ConsentCode, TokenId, UniversalId};
use crate::domain::{PassportError, Result};
use std::sync::Arc;

/// Issues, verifies and revokes consent tokens
pub struct ConsentTokenManager {
    consents: Arc<dyn ConsentStore>,
    identities: Arc<dyn IdentityStore>,
    clock: Arc<dyn Clock>,
    policy: ConsentConfig,
}

impl ConsentTokenManager {
    /// Create a new manager
    pub fn new(
        consents: Arc<dyn ConsentStore>,
        identities: Arc<dyn IdentityStore>,
        clock: Arc<dyn Clock>,
        policy: ConsentConfig,
    ) -> Self {
        Self {
            consents,
            identities,
            clock,
            policy,
        }
    }

    /// Issue a new token for a universal id
    ///
    /// # Errors
    ///
    /// - [`PassportError::Validation`] if `duration_minutes` is not positive
    ///   or exceeds the configured maximum.
    /// - [`PassportError::NotFound`] if no identity is bound to the id.
    pub async fn issue(
        &self,
        universal_id: &UniversalId,
        duration_minutes: i64,
        issued_by: &str,
    ) -> Result<ConsentToken> {
        if duration_minutes <= 0 {
            return Err(PassportError::Validation(format!(
                "Consent duration must be positive, got {duration_minutes}"
            )));
        }
        if duration_minutes > self.policy.max_duration_minutes {
            return Err(PassportError::Validation(format!(
                "Consent duration {duration_minutes} exceeds the maximum of {} minutes",
                self.policy.max_duration_minutes
            )));
        }

        if self
            .identities
            .find_by_universal_id(universal_id)
            .await?
            .is_none()
        {
            return Err(PassportError::NotFound(format!(
                "No identity bound to universal id {universal_id}"
            )));
        }

        let code = generate_consent_code()?;
        let token = ConsentToken::new(
            universal_id.clone(),
            code,
            self.clock.now(),
            duration_minutes,
            issued_by,
        );

        self.consents.insert_token(&token).await?;

        // The code itself never reaches the log.
        tracing::info!(
            token_id = %token.token_id,
            universal_id = %token.universal_id,
            expires_at = %token.expires_at,
            issued_by = %token.issued_by,
            "Consent token issued"
        );

        Ok(token)
    }

    /// Whether a matching active, unexpired token exists for the code
    ///
    /// Under the single-use policy a successful verification consumes the
    /// matched token; otherwise the code stays replayable until expiry or
    /// revocation.
    pub async fn verify(&self, universal_id: &UniversalId, code: &ConsentCode) -> Result<bool> {
        Ok(self.find_valid(universal_id, code).await?.is_some())
    }

    /// Find the valid token matching a code, applying the single-use policy
    ///
    /// Returns the matched token so callers can attribute the access to it.
    pub async fn find_valid(
        &self,
        universal_id: &UniversalId,
        code: &ConsentCode,
    ) -> Result<Option<ConsentToken>> {
        let now = self.clock.now();
        let tokens = self.consents.tokens_for_identity(universal_id).await?;

        let matched = tokens
            .into_iter()
            .find(|token| token.is_valid(now) && &token.code == code);

        let Some(token) = matched else {
            return Ok(None);
        };

        if self.policy.single_use {
            self.consents.deactivate_token(&token.token_id).await?;
            tracing::debug!(token_id = %token.token_id, "Single-use consent token consumed");
        }

        Ok(Some(token))
    }

    /// Revoke a token
    ///
    /// Idempotent: revoking an already-revoked token is not an error. Once
    /// revoked, verification fails for that token regardless of remaining
    /// lifetime. Returns whether a token with that id exists.
    pub async fn revoke(&self, token_id: &TokenId) -> Result<bool> {
        let existed = self.consents.deactivate_token(token_id).await?;
        if existed {
            tracing::info!(token_id = %token_id, "Consent token revoked");
        }
        Ok(existed)
    }

    /// Look up a token by id
    ///
    /// # Errors
    ///
    /// [`PassportError::NotFound`] if the id is unknown.
    pub async fn get_by_id(&self, token_id: &TokenId) -> Result<ConsentToken> {
        self.consents.find_token(token_id).await?.ok_or_else(|| {
            PassportError::NotFound(format!("No consent token with id {token_id}"))
        })
    }
}
