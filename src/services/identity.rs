//! Identity service implementation
//!
//! This service handles user registration, activation, credential
//! verification, and the admin operations over users, roles, and
//! groups.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::database::repositories::{GroupRepository, UserRepository};
use crate::models::group::{Group, GroupWithMembers};
use crate::models::user::{CreateUserRequest, SignUpRequest, SignInRequest, User};
use crate::services::gate::{ADMIN_GROUP, DEFAULT_GROUP};
use crate::services::notification::{activation_email, Notifier};
use crate::utils::errors::{EventHubError, Result};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Field-level validation of the registration form. Uniqueness checks
/// happen separately, against the store.
pub fn validate_sign_up_form(form: &SignUpRequest) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    let username_re = Regex::new(r"^[\w.@+-]+$").expect("valid username pattern");
    let email_re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern");

    if form.username.trim().is_empty() {
        errors.insert("username".to_string(), "This field is required".to_string());
    } else if !username_re.is_match(form.username.trim()) {
        errors.insert(
            "username".to_string(),
            "Enter a valid username: letters, digits and @/./+/-/_ only".to_string(),
        );
    }

    if !email_re.is_match(form.email.trim()) {
        errors.insert("email".to_string(), "Enter a valid email address".to_string());
    }

    if form.password1.len() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password1".to_string(),
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if form.password1 != form.password2 {
        errors.insert("password2".to_string(), "Passwords do not match".to_string());
    }

    errors
}

/// Identity service for account lifecycle and admin role management
#[derive(Clone)]
pub struct IdentityService {
    users: UserRepository,
    groups: GroupRepository,
    notifier: Arc<dyn Notifier>,
    settings: Settings,
}

impl IdentityService {
    pub fn new(
        users: UserRepository,
        groups: GroupRepository,
        notifier: Arc<dyn Notifier>,
        settings: Settings,
    ) -> Self {
        Self { users, groups, notifier, settings }
    }

    /// Register a new account: inactive until the emailed activation
    /// link is followed. The activation email is fire-and-forget.
    pub async fn sign_up(&self, form: SignUpRequest) -> Result<User> {
        let mut errors = validate_sign_up_form(&form);

        if errors.is_empty() {
            if self.users.find_by_username(form.username.trim()).await?.is_some() {
                errors.insert("username".to_string(), "A user with that username already exists".to_string());
            }
            if self.users.find_by_email(form.email.trim()).await?.is_some() {
                errors.insert("email".to_string(), "A user with that email already exists".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(EventHubError::Validation(errors));
        }

        let password_hash = hash_password(&form.password1)?;

        let user = self.users.create(CreateUserRequest {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password_hash,
            first_name: form.first_name,
            last_name: form.last_name,
        }).await?;

        // Every new account lands in the default group.
        let default_group = self.groups.get_or_create(DEFAULT_GROUP).await?;
        self.groups.add_user(user.id, default_group.id).await?;

        let token = Uuid::new_v4().to_string();
        self.users.store_activation_token(user.id, &token).await?;

        let message = activation_email(&user, &token, &self.settings.server.frontend_url);
        if let Err(e) = self.notifier.send(message).await {
            warn!(user_id = user.id, error = %e, "Failed to send activation email");
        }

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Activate an account from the emailed link. Tokens are deleted on
    /// use, so a replayed token fails the same way a wrong one does.
    pub async fn activate(&self, user_id: i64, token: &str) -> Result<User> {
        let user = self.users.find_by_id(user_id).await?
            .ok_or(EventHubError::UserNotFound { user_id })?;

        let stored = self.users.find_activation_token(user_id).await?;

        match stored {
            Some(expected) if expected == token => {
                let user = self.users.activate(user.id).await?;
                self.users.delete_activation_token(user.id).await?;
                info!(user_id = user.id, "Account activated");
                Ok(user)
            }
            _ => {
                warn!(user_id = user_id, "Invalid activation attempt");
                Err(EventHubError::InvalidActivationToken)
            }
        }
    }

    /// Verify credentials for sign-in. Unknown username, wrong password
    /// and inactive account all collapse into one error.
    pub async fn authenticate(&self, form: &SignInRequest) -> Result<User> {
        let user = self.users.find_by_username(form.username.trim()).await?
            .ok_or(EventHubError::InvalidCredentials)?;

        if !verify_password(&form.password, &user.password_hash) {
            return Err(EventHubError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(EventHubError::InvalidCredentials);
        }

        Ok(user)
    }

    /// List all users with the name of their first group, for the
    /// admin dashboard
    pub async fn list_users_with_role(&self) -> Result<Vec<(User, Option<String>)>> {
        let users = self.users.list_all().await?;
        let mut result = Vec::with_capacity(users.len());

        for user in users {
            let role = self.users.group_names(user.id).await?.into_iter().next();
            result.push((user, role));
        }

        Ok(result)
    }

    /// Delete a user account. Superusers cannot be deleted.
    pub async fn delete_user(&self, admin_id: i64, user_id: i64) -> Result<String> {
        let user = self.users.find_by_id(user_id).await?
            .ok_or(EventHubError::UserNotFound { user_id })?;

        if user.is_superuser {
            return Err(EventHubError::Protected(
                "Cannot delete a superuser account".to_string()
            ));
        }

        let username = user.username.clone();
        self.users.delete(user.id).await?;
        crate::utils::logging::log_admin_action(admin_id, "delete_user", Some(&username));

        Ok(username)
    }

    /// Assign a user to exactly one role, clearing prior memberships
    pub async fn assign_role(&self, admin_id: i64, user_id: i64, group_id: i64) -> Result<(User, Group)> {
        let user = self.users.find_by_id(user_id).await?
            .ok_or(EventHubError::UserNotFound { user_id })?;
        let group = self.groups.find_by_id(group_id).await?
            .ok_or(EventHubError::GroupNotFound { group_id })?;

        self.groups.clear_user_groups(user.id).await?;
        self.groups.add_user(user.id, group.id).await?;
        crate::utils::logging::log_admin_action(admin_id, "assign_role", Some(&group.name));

        Ok((user, group))
    }

    /// All groups, for role assignment
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.groups.list_all().await
    }

    /// Groups together with their members, for the admin group listing
    pub async fn list_groups_with_members(&self) -> Result<Vec<GroupWithMembers>> {
        self.groups.list_with_members().await
    }

    /// Create a group with a unique name
    pub async fn create_group(&self, name: &str) -> Result<Group> {
        let name = name.trim();

        if name.is_empty() {
            return Err(EventHubError::field("name", "This field is required"));
        }

        if self.groups.find_by_name(name).await?.is_some() {
            return Err(EventHubError::field("name", "A group with that name already exists"));
        }

        self.groups.create(name).await
    }

    /// Delete a group. The "admin" group is protected.
    pub async fn delete_group(&self, admin_id: i64, group_id: i64) -> Result<String> {
        let group = self.groups.find_by_id(group_id).await?
            .ok_or(EventHubError::GroupNotFound { group_id })?;

        if group.name.to_lowercase() == ADMIN_GROUP {
            return Err(EventHubError::Protected(
                "Cannot delete the 'admin' group".to_string()
            ));
        }

        let name = group.name.clone();
        self.groups.delete(group.id).await?;
        crate::utils::logging::log_admin_action(admin_id, "delete_group", Some(&name));

        Ok(name)
    }

    /// Remove a user from one group. Superusers cannot be removed.
    pub async fn remove_user_from_group(&self, admin_id: i64, group_id: i64, user_id: i64) -> Result<(User, Group)> {
        let group = self.groups.find_by_id(group_id).await?
            .ok_or(EventHubError::GroupNotFound { group_id })?;
        let user = self.users.find_by_id(user_id).await?
            .ok_or(EventHubError::UserNotFound { user_id })?;

        if user.is_superuser {
            return Err(EventHubError::Protected(
                "Cannot remove a superuser from this group".to_string()
            ));
        }

        self.groups.remove_user(user.id, group.id).await?;
        crate::utils::logging::log_admin_action(admin_id, "remove_user_from_group", Some(&user.username));

        Ok((user, group))
    }
}

/// Hash a password into an Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| EventHubError::Config(format!("Password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
