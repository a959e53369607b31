use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::engine::AggregationEngine;
use super::report::{assemble, AdminAdvancedResponse, ReportShapeError};
use crate::marketplace::domain::{UserId, UserRole};
use crate::marketplace::store::{MarketplaceStore, StoreError};

/// Caller identity as established by the upstream authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Option<UserId>,
    pub role: UserRole,
}

impl Actor {
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            role: UserRole::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminAccessView {
    pub ok: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<UserId>,
}

/// Admin-only dashboard reporting over a marketplace store.
pub struct AdminDashboardService<S> {
    engine: AggregationEngine<S>,
}

impl<S> AdminDashboardService<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            engine: AggregationEngine::new(store),
        }
    }

    /// Build the advanced dashboard as of `now`. Non-admin actors are refused
    /// before the store is queried.
    pub fn advanced(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<AdminAdvancedResponse, DashboardError> {
        self.authorize(actor)?;

        let started = Instant::now();
        let computation = self.engine.compute(now)?;
        let response = assemble(computation)?;

        info!(
            %now,
            elapsed_ms = started.elapsed().as_millis() as u64,
            total_bookings = response.total_bookings,
            "advanced dashboard generated"
        );
        Ok(response)
    }

    pub fn admin_check(&self, actor: &Actor) -> Result<AdminAccessView, DashboardError> {
        self.authorize(actor)?;
        Ok(AdminAccessView {
            ok: true,
            message: "Admin access granted",
            admin_id: actor.user_id,
        })
    }

    fn authorize(&self, actor: &Actor) -> Result<(), DashboardError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(DashboardError::Forbidden { role: actor.role })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("admin access only (caller role: {role})")]
    Forbidden { role: UserRole },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("dashboard shape violation: {0}")]
    Shape(#[from] ReportShapeError),
}
