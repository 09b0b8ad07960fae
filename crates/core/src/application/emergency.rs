// Emergency Control - per-organization pause flag

use crate::domain::{QueueConfig, QueueState};
use crate::error::Result;
use crate::port::OrganizationStore;
use tracing::{info, warn};

/// Persist a new emergency flag/message and re-derive waiting ETAs
///
/// The penalty is part of the ETA formula rather than a stored delta, so
/// repeated calls with `stop = true` apply it exactly once.
pub async fn set_emergency<S>(
    store: &S,
    state: &mut QueueState,
    stop: bool,
    message: Option<String>,
) -> Result<QueueConfig>
where
    S: OrganizationStore + ?Sized,
{
    let previous = state.config().clone();

    let mut next = previous.clone();
    next.emergency_stop = stop;
    next.emergency_message = message.unwrap_or_default();

    store.save_config(&next).await?;
    state.set_config(next.clone());

    match (previous.emergency_stop, stop) {
        (false, true) => warn!(
            org_id = %next.org_id,
            penalty_minutes = next.emergency_penalty_minutes,
            waiting = state.waiting_count(),
            message = %next.emergency_message,
            "Emergency stop activated"
        ),
        (true, false) => info!(org_id = %next.org_id, "Emergency stop cleared"),
        _ => info!(org_id = %next.org_id, emergency_stop = stop, "Emergency message updated"),
    }

    Ok(next)
}

/// Current emergency settings (read-only)
pub fn get_emergency(state: &QueueState) -> QueueConfig {
    state.config().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Organization, Ticket};
    use crate::port::mocks::InMemoryStore;

    async fn setup() -> (InMemoryStore, QueueState) {
        let store = InMemoryStore::new();
        let org = Organization::new("org", 0, "Clinic", "desk@clinic.test", &QueueConfig::new("org"))
            .unwrap();
        store.insert_organization(&org).await.unwrap();

        let mut state = QueueState::new(org.queue.clone());
        for token in 1..=2 {
            state
                .admit(Ticket::new(format!("t-{}", token), 0, "org", "C", format!("c{}", token), token))
                .unwrap();
        }
        (store, state)
    }

    fn etas(state: &QueueState) -> Vec<u32> {
        state
            .list_waiting()
            .iter()
            .map(|t| t.estimated_wait_minutes)
            .collect()
    }

    #[tokio::test]
    async fn test_repeated_activation_is_idempotent() {
        let (store, mut state) = setup().await;

        set_emergency(&store, &mut state, true, Some("Power cut".into())).await.unwrap();
        set_emergency(&store, &mut state, true, Some("Power cut".into())).await.unwrap();
        assert_eq!(etas(&state), vec![25, 30]);

        let stored = store.load_config(&"org".to_string()).await.unwrap().unwrap();
        assert!(stored.emergency_stop);
        assert_eq!(stored.emergency_message, "Power cut");
    }

    #[tokio::test]
    async fn test_toggle_off_and_on_reapplies_once() {
        let (store, mut state) = setup().await;

        set_emergency(&store, &mut state, true, None).await.unwrap();
        let cleared = set_emergency(&store, &mut state, false, None).await.unwrap();
        assert!(!cleared.emergency_stop);
        assert_eq!(cleared.emergency_message, "");
        assert_eq!(etas(&state), vec![5, 10]);

        set_emergency(&store, &mut state, true, None).await.unwrap();
        assert_eq!(etas(&state), vec![25, 30]);
        assert!(get_emergency(&state).emergency_stop);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_state_untouched() {
        let (store, mut state) = setup().await;
        store.fail_config_writes(true);

        assert!(set_emergency(&store, &mut state, true, None).await.is_err());
        assert!(!get_emergency(&state).emergency_stop);
        assert_eq!(etas(&state), vec![5, 10]);
    }
}
