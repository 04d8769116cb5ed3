//! Access-control gate
//!
//! Maps (user, requested capability) to allow/deny based on the
//! superuser flag, group membership, and stored permission codenames.
//! The decision itself is a pure function over a loaded `UserProfile`.

use tracing::{debug, warn};
use crate::database::repositories::UserRepository;
use crate::models::user::UserProfile;
use crate::utils::errors::{EventHubError, Result};

/// Built-in group names
pub const ADMIN_GROUP: &str = "admin";
pub const ORGANIZER_GROUP: &str = "Organizer";
pub const PARTICIPANT_GROUP: &str = "Participant";
pub const DEFAULT_GROUP: &str = "User";

/// Capabilities gated operations ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    AddCategory,
    OrganizerDashboard,
    AdminArea,
}

impl Capability {
    /// Stored permission codename backing this capability, for the
    /// capabilities that are permission-gated rather than group-gated.
    pub fn permission_codename(&self) -> Option<&'static str> {
        match self {
            Capability::CreateEvent => Some("events.add_event"),
            Capability::UpdateEvent => Some("events.change_event"),
            Capability::DeleteEvent => Some("events.delete_event"),
            Capability::AddCategory => Some("events.add_category"),
            Capability::OrganizerDashboard | Capability::AdminArea => None,
        }
    }
}

/// Access-control service
#[derive(Debug, Clone)]
pub struct AccessGate {
    users: UserRepository,
}

impl AccessGate {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Pure decision over an already-loaded profile
    pub fn allows(profile: &UserProfile, capability: Capability) -> bool {
        // Superusers bypass every check
        if profile.user.is_superuser {
            return true;
        }

        match capability {
            Capability::AdminArea => profile.in_group(ADMIN_GROUP),
            Capability::OrganizerDashboard => profile.in_group(ORGANIZER_GROUP),
            _ => capability
                .permission_codename()
                .map(|codename| profile.has_permission(codename))
                .unwrap_or(false),
        }
    }

    /// Load the user's profile
    pub async fn profile(&self, user_id: i64) -> Result<UserProfile> {
        self.users
            .load_profile(user_id)
            .await?
            .ok_or(EventHubError::UserNotFound { user_id })
    }

    /// Check a capability for a user
    pub async fn check(&self, user_id: i64, capability: Capability) -> Result<bool> {
        let profile = self.profile(user_id).await?;
        Ok(Self::allows(&profile, capability))
    }

    /// Require a capability, returning the profile on success
    pub async fn require(&self, user_id: i64, capability: Capability) -> Result<UserProfile> {
        let profile = self.profile(user_id).await?;

        if Self::allows(&profile, capability) {
            debug!(user_id = user_id, capability = ?capability, "Access granted");
            Ok(profile)
        } else {
            warn!(user_id = user_id, capability = ?capability, "Access denied");
            Err(EventHubError::PermissionDenied(format!(
                "User {} lacks required capability: {:?}",
                user_id, capability
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use chrono::Utc;
    use crate::models::user::User;

    fn profile(is_superuser: bool, groups: &[&str], permissions: &[&str]) -> UserProfile {
        UserProfile {
            user: User {
                id: 1,
                username: "u".to_string(),
                email: "u@example.com".to_string(),
                password_hash: String::new(),
                first_name: None,
                last_name: None,
                is_active: true,
                is_superuser,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            groups: groups.iter().map(|g| g.to_string()).collect(),
            permissions: permissions.iter().map(|p| p.to_string()).collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn test_superuser_bypasses_all_checks() {
        let p = profile(true, &[], &[]);
        assert!(AccessGate::allows(&p, Capability::CreateEvent));
        assert!(AccessGate::allows(&p, Capability::AdminArea));
        assert!(AccessGate::allows(&p, Capability::OrganizerDashboard));
        assert!(AccessGate::allows(&p, Capability::AddCategory));
    }

    #[test]
    fn test_admin_group_gates_admin_area_only() {
        let p = profile(false, &[ADMIN_GROUP], &[]);
        assert!(AccessGate::allows(&p, Capability::AdminArea));
        assert!(!AccessGate::allows(&p, Capability::CreateEvent));
        assert!(!AccessGate::allows(&p, Capability::OrganizerDashboard));
    }

    #[test]
    fn test_organizer_with_permissions() {
        let p = profile(
            false,
            &[ORGANIZER_GROUP],
            &["events.add_event", "events.change_event", "events.delete_event", "events.add_category"],
        );
        assert!(AccessGate::allows(&p, Capability::OrganizerDashboard));
        assert!(AccessGate::allows(&p, Capability::CreateEvent));
        assert!(AccessGate::allows(&p, Capability::UpdateEvent));
        assert!(AccessGate::allows(&p, Capability::DeleteEvent));
        assert!(AccessGate::allows(&p, Capability::AddCategory));
        assert!(!AccessGate::allows(&p, Capability::AdminArea));
    }

    #[test]
    fn test_plain_participant_is_denied_everywhere() {
        let p = profile(false, &[PARTICIPANT_GROUP], &[]);
        assert!(!AccessGate::allows(&p, Capability::CreateEvent));
        assert!(!AccessGate::allows(&p, Capability::UpdateEvent));
        assert!(!AccessGate::allows(&p, Capability::AddCategory));
        assert!(!AccessGate::allows(&p, Capability::OrganizerDashboard));
        assert!(!AccessGate::allows(&p, Capability::AdminArea));
    }

    #[test]
    fn test_permission_without_group_still_allows() {
        // Permissions are granted through groups, but the gate only
        // looks at the resolved codename set.
        let p = profile(false, &["Helpers"], &["events.add_category"]);
        assert!(AccessGate::allows(&p, Capability::AddCategory));
        assert!(!AccessGate::allows(&p, Capability::CreateEvent));
    }
}
