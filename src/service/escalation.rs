//! Escalation Scheduler
//!
//! Runs the SLA sweep on a fixed interval in the background.

use crate::service::ComplaintService;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to the background sweep task
pub struct EscalationScheduler {
    handle: JoinHandle<()>,
}

impl EscalationScheduler {
    /// Spawn the sweep loop. The first sweep runs one full interval after start.
    pub fn start(service: Arc<ComplaintService>, interval: Duration) -> Self {
        tracing::info!(
            interval_secs = interval.as_secs(),
            sla_hours = service.config().sla_hours,
            "Starting escalation scheduler"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                ticker.tick().await;

                tracing::debug!("Running escalation sweep");
                match service.check_and_escalate(Utc::now()).await {
                    Ok(count) => tracing::debug!(escalated = count, "Escalation sweep done"),
                    Err(e) => tracing::error!(error = %e, "Escalation sweep failed"),
                }
            }
        });

        Self { handle }
    }

    /// Stop the sweep loop
    pub fn stop(self) {
        self.handle.abort();
        tracing::info!("Escalation scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{ServiceConfig, StoreNotifier};
    use crate::store::{
        ComplaintDraft, Database, NewComplaint, Priority, Role, Status,
    };

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_escalates_stale_complaints() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let user = db
            .create_user("S", "s@example.com", "h", Role::User, Utc::now())
            .unwrap();
        let stale = db
            .insert_complaint(
                &NewComplaint {
                    title: "Old".into(),
                    description: "d".into(),
                    category: "General".into(),
                    priority: Priority::Low,
                    is_anonymous: false,
                    anonymous_email: None,
                    user_id: Some(user.id),
                },
                None,
                None,
                Utc::now() - chrono::Duration::hours(72),
            )
            .unwrap();

        let service = Arc::new(ComplaintService::new(
            db.clone(),
            Arc::new(StoreNotifier::new(db.clone())),
            ServiceConfig::default(),
        ));
        let fresh = service
            .create(
                &user,
                ComplaintDraft {
                    title: "New".into(),
                    description: "d".into(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let scheduler = EscalationScheduler::start(service, Duration::from_secs(60));
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        let stale = db.get_complaint(stale.complaint_id).unwrap().unwrap();
        assert_eq!(stale.status, Status::Escalated);
        assert_eq!(stale.priority, Priority::Critical);
        let fresh = db.get_complaint(fresh.complaint_id).unwrap().unwrap();
        assert_eq!(fresh.status, Status::New);

        scheduler.stop();
    }
}
