//! Services module
//!
//! This module contains business logic services

pub mod gate;
pub mod identity;
pub mod rsvp;
pub mod dashboard;
pub mod catalog;
pub mod notification;

// Re-export commonly used services
pub use gate::{AccessGate, Capability};
pub use identity::IdentityService;
pub use rsvp::{RsvpService, RsvpOutcome};
pub use dashboard::DashboardService;
pub use catalog::CatalogService;
pub use notification::{Notifier, SmtpNotifier, LogNotifier, EmailMessage};

use std::sync::Arc;

use crate::config::Settings;
use crate::database::connection::DatabasePool;
use crate::database::repositories::{CategoryRepository, EventRepository, GroupRepository, UserRepository};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub gate: AccessGate,
    pub identity: IdentityService,
    pub rsvp: RsvpService,
    pub dashboard: DashboardService,
    pub catalog: CatalogService,
    pub users: UserRepository,
    pub events: EventRepository,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, settings: Settings, notifier: Arc<dyn Notifier>) -> Self {
        let users = UserRepository::new(pool.clone());
        let groups = GroupRepository::new(pool.clone());
        let categories = CategoryRepository::new(pool.clone());
        let events = EventRepository::new(pool);

        let gate = AccessGate::new(users.clone());
        let identity = IdentityService::new(users.clone(), groups, notifier.clone(), settings);
        let rsvp = RsvpService::new(events.clone(), notifier);
        let dashboard = DashboardService::new(events.clone(), users.clone(), categories.clone());
        let catalog = CatalogService::new(events.clone(), categories);

        Self {
            gate,
            identity,
            rsvp,
            dashboard,
            catalog,
            users,
            events,
        }
    }

    /// Pick the notifier implementation for the configured environment
    pub fn notifier_from_settings(settings: &Settings) -> Arc<dyn Notifier> {
        match &settings.email {
            Some(email) => Arc::new(SmtpNotifier::new(email.clone())),
            None => Arc::new(LogNotifier),
        }
    }
}
