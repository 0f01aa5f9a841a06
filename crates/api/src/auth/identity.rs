use std::sync::Arc;

use chrono::Utc;

use infra::audit::AuditLog;
use infra::models::UserAccount;
use infra::store::{collections, DocumentStore, StoreError};

use crate::auth::password::PasswordService;
use crate::auth::JwtService;
use crate::error::AppError;

/// Email/password identity provider over the `users` collection.
/// Sessions are stateless JWTs; sign-in, sign-up and sign-out leave audit
/// records like every other actor-visible action.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn DocumentStore>,
    jwt: JwtService,
    audit: AuditLog,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub token: String,
}

impl IdentityService {
    pub fn new(store: Arc<dyn DocumentStore>, jwt: JwtService) -> Self {
        let audit = AuditLog::new(store.clone());
        Self { store, jwt, audit }
    }

    pub async fn sign_up(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AppError> {
        if display_name.trim().is_empty() || email.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Name and email are required".to_string(),
            ));
        }
        PasswordService::validate_password_strength(password)?;
        if self.find_by_email(email).await?.is_some() {
            return Err(AppError::BadRequest(
                "An account with this email already exists".to_string(),
            ));
        }

        let account = UserAccount {
            email: email.to_string(),
            display_name: display_name.to_string(),
            password_hash: PasswordService::hash_password(password)?,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&account)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let id = self.store.add(collections::USERS, value).await?;

        self.audit
            .append(
                Some(display_name),
                "registered and logged in as new user.",
            )
            .await;

        let token = self
            .jwt
            .create_token(&id, account.email.clone(), account.display_name.clone())?;
        Ok(AuthenticatedUser {
            id,
            email: account.email,
            display_name: account.display_name,
            token,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AppError> {
        let Some((id, account)) = self.find_by_email(email).await? else {
            return Err(AppError::Auth);
        };
        if !PasswordService::verify_password(password, &account.password_hash)? {
            return Err(AppError::Auth);
        }

        self.audit
            .append(Some(&account.display_name), "logged in")
            .await;

        let token = self
            .jwt
            .create_token(&id, account.email.clone(), account.display_name.clone())?;
        Ok(AuthenticatedUser {
            id,
            email: account.email,
            display_name: account.display_name,
            token,
        })
    }

    /// Credential check ahead of a password change. No token is issued and
    /// nothing is audited.
    pub async fn reauthenticate(&self, email: &str, password: &str) -> Result<(), AppError> {
        let Some((_, account)) = self.find_by_email(email).await? else {
            return Err(AppError::Auth);
        };
        if !PasswordService::verify_password(password, &account.password_hash)? {
            return Err(AppError::Auth);
        }
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        PasswordService::validate_password_strength(new_password)?;
        let doc = self
            .store
            .get(collections::USERS, user_id)
            .await?
            .ok_or_else(|| StoreError::not_found(collections::USERS, user_id))?;
        let mut account: UserAccount = doc.parse().map_err(AppError::from)?;
        account.password_hash = PasswordService::hash_password(new_password)?;
        let value = serde_json::to_value(&account)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        self.store.update(collections::USERS, user_id, value).await?;
        Ok(())
    }

    /// Tokens are stateless, so signing out only leaves the audit record.
    pub async fn sign_out(&self, display_name: Option<&str>) {
        self.audit.append(display_name, "logged out.").await;
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(String, UserAccount)>, AppError> {
        let docs = self.store.list(collections::USERS).await?;
        for doc in docs {
            let account: UserAccount = doc.parse().map_err(AppError::from)?;
            if account.email == email {
                return Ok(Some((doc.id, account)));
            }
        }
        Ok(None)
    }
}
