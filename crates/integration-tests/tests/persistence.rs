//! Durability: queue state survives a service restart

mod common;

use common::{open_service, TempDb};
use walkin_core::application::{JoinRequest, QueueServiceConfig};
use walkin_core::domain::TicketStatus;
use walkin_core::error::ErrorKind;

#[tokio::test]
async fn test_restart_restores_queue_and_counter() {
    let db = TempDb::new();
    let path = db.path();

    let (org_id, served_id) = {
        let service = open_service(&path, QueueServiceConfig::default()).await;
        let org = service
            .register_organization("Riverside Clinic", "desk@riverside.test")
            .await
            .unwrap();

        let mut ids = Vec::new();
        for (name, contact) in [("Bob", "555-2"), ("Amy", "555-3"), ("Cai", "555-4")] {
            let outcome = service
                .join(&org.id, JoinRequest::new(name, contact))
                .await
                .unwrap();
            ids.push(outcome.ticket.id);
        }
        service.serve(&org.id, &ids[0]).await.unwrap();
        service
            .set_emergency(&org.id, true, Some("Back soon".to_string()))
            .await
            .unwrap();

        (org.id, ids[0].clone())
    };

    let service = open_service(&path, QueueServiceConfig::default()).await;

    let snapshot = service.snapshot(&org_id).await.unwrap();
    assert!(snapshot.config.emergency_stop);
    assert_eq!(snapshot.config.emergency_message, "Back soon");
    let waiting: Vec<_> = snapshot
        .waiting
        .iter()
        .map(|t| (t.token_number, t.position, t.estimated_wait_minutes))
        .collect();
    assert_eq!(waiting, vec![(2, 1, 25), (3, 2, 30)]);

    // Served ticket stays completed
    let served = service.status_of(&org_id, 1).await.unwrap();
    assert_eq!(served.id, served_id);
    assert_eq!(served.status, TicketStatus::Completed);
    let err = service.serve(&org_id, &served_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    // Counter continues where it left off
    let next = service
        .join(&org_id, JoinRequest::new("Dee", "555-5"))
        .await
        .unwrap();
    assert_eq!(next.ticket.token_number, 4);
    assert_eq!(next.ticket.position, 3);

    // Re-join is still recognized after restart
    let again = service
        .join(&org_id, JoinRequest::new("Amy", "555-3"))
        .await
        .unwrap();
    assert!(again.existing);
    assert_eq!(again.ticket.token_number, 2);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let db = TempDb::new();
    let service = open_service(&db.path(), QueueServiceConfig::default()).await;
    service
        .register_organization("Riverside Clinic", "desk@riverside.test")
        .await
        .unwrap();

    let err = service
        .register_organization("Riverside Clinic", "other@riverside.test")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);

    let err = service
        .register_organization("   ", "x@y.test")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_unknown_organization() {
    let db = TempDb::new();
    let service = open_service(&db.path(), QueueServiceConfig::default()).await;

    let err = service
        .join("no-such-org", JoinRequest::new("Bob", "555-2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service.get_emergency("no-such-org").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
