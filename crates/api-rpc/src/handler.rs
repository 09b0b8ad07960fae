//! RPC Method Handlers
//!
//! Translates JSON-RPC parameters into queue service calls.

use crate::error::to_rpc_error;
use crate::types::{
    CallNextRequest, CallNextResponse, EmergencyResponse, EntryCodeRequest, EntryCodeResponse,
    GetEmergencyRequest, GetOrgRequest, JoinRequest, JoinResponse, ListRequest, ListResponse,
    OrganizationResponse, RegisterOrgRequest, SetEmergencyRequest, StatusRequest,
    TicketActionRequest, TicketActionResponse, TicketView,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use walkin_core::application::{self, QueueService};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
}

impl RpcHandler {
    pub fn new(service: Arc<QueueService>) -> Self {
        Self { service }
    }

    /// org.register.v1
    pub async fn register(
        &self,
        params: RegisterOrgRequest,
    ) -> Result<OrganizationResponse, ErrorObjectOwned> {
        let org = self
            .service
            .register_organization(&params.name, &params.contact_email)
            .await
            .map_err(to_rpc_error)?;
        Ok(org.into())
    }

    /// org.get.v1
    pub async fn get_organization(
        &self,
        params: GetOrgRequest,
    ) -> Result<OrganizationResponse, ErrorObjectOwned> {
        let org = self
            .service
            .organization(&params.org_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(org.into())
    }

    /// org.entry_code.v1
    pub async fn entry_code(
        &self,
        params: EntryCodeRequest,
    ) -> Result<EntryCodeResponse, ErrorObjectOwned> {
        let outcome = self
            .service
            .issue_entry_code(&params.org_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(outcome.into())
    }

    /// queue.join.v1
    pub async fn join(&self, params: JoinRequest) -> Result<JoinResponse, ErrorObjectOwned> {
        let outcome = self
            .service
            .join(
                &params.org_id,
                application::JoinRequest::new(params.display_name, params.contact),
            )
            .await
            .map_err(to_rpc_error)?;
        Ok(outcome.into())
    }

    /// queue.status.v1
    pub async fn status(&self, params: StatusRequest) -> Result<TicketView, ErrorObjectOwned> {
        let ticket = self
            .service
            .status_of(&params.org_id, params.token_number)
            .await
            .map_err(to_rpc_error)?;
        Ok(ticket.into())
    }

    /// queue.list.v1
    pub async fn list(&self, params: ListRequest) -> Result<ListResponse, ErrorObjectOwned> {
        let snapshot = self
            .service
            .snapshot(&params.org_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(snapshot.into())
    }

    /// queue.serve.v1
    pub async fn serve(
        &self,
        params: TicketActionRequest,
    ) -> Result<TicketActionResponse, ErrorObjectOwned> {
        let outcome = self
            .service
            .serve(&params.org_id, &params.ticket_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(outcome.into())
    }

    /// queue.call_next.v1
    pub async fn call_next(
        &self,
        params: CallNextRequest,
    ) -> Result<CallNextResponse, ErrorObjectOwned> {
        let outcome = self
            .service
            .call_next(&params.org_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(match outcome {
            Some(outcome) => CallNextResponse {
                ticket: Some(outcome.ticket.into()),
                warnings: outcome.warnings,
            },
            None => CallNextResponse {
                ticket: None,
                warnings: Vec::new(),
            },
        })
    }

    /// queue.begin_processing.v1
    pub async fn begin_processing(
        &self,
        params: TicketActionRequest,
    ) -> Result<TicketActionResponse, ErrorObjectOwned> {
        let outcome = self
            .service
            .begin_processing(&params.org_id, &params.ticket_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(outcome.into())
    }

    /// queue.emergency.set.v1
    pub async fn set_emergency(
        &self,
        params: SetEmergencyRequest,
    ) -> Result<EmergencyResponse, ErrorObjectOwned> {
        let config = self
            .service
            .set_emergency(&params.org_id, params.stop, params.message)
            .await
            .map_err(to_rpc_error)?;
        Ok(config.into())
    }

    /// queue.emergency.get.v1
    pub async fn get_emergency(
        &self,
        params: GetEmergencyRequest,
    ) -> Result<EmergencyResponse, ErrorObjectOwned> {
        let config = self
            .service
            .get_emergency(&params.org_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(config.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use walkin_core::application::QueueServiceConfig;
    use walkin_core::domain::TicketStatus;
    use walkin_core::port::mocks::{
        InMemoryStore, RecordingNotifier, SequentialIdProvider, SteppingTimeProvider,
    };
    use walkin_core::port::JsonCodeRenderer;

    async fn setup() -> (RpcHandler, String) {
        let service = QueueService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
            Arc::new(JsonCodeRenderer),
            Arc::new(SequentialIdProvider::new("id")),
            Arc::new(SteppingTimeProvider::new(1_000, 1)),
            QueueServiceConfig::default(),
        );
        let handler = RpcHandler::new(Arc::new(service));
        let org = handler
            .register(RegisterOrgRequest {
                name: "Clinic".to_string(),
                contact_email: "desk@clinic.test".to_string(),
            })
            .await
            .unwrap();
        (handler, org.org_id)
    }

    fn join_req(org_id: &str, name: &str, contact: &str) -> JoinRequest {
        JoinRequest {
            org_id: org_id.to_string(),
            display_name: name.to_string(),
            contact: contact.to_string(),
        }
    }

    #[tokio::test]
    async fn test_join_and_list() {
        let (handler, org_id) = setup().await;

        let bob = handler.join(join_req(&org_id, "Bob", "555-2")).await.unwrap();
        assert_eq!(bob.ticket.token_number, 1);
        assert_eq!(bob.ticket.position, 1);
        assert!(bob.code.unwrap().starts_with("data:application/json,"));

        handler.join(join_req(&org_id, "Amy", "555-3")).await.unwrap();

        let list = handler
            .list(ListRequest {
                org_id: org_id.clone(),
            })
            .await
            .unwrap();
        let positions: Vec<_> = list.tickets.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert!(!list.emergency_stop);
    }

    #[tokio::test]
    async fn test_serve_twice_is_invalid_transition() {
        let (handler, org_id) = setup().await;
        let bob = handler.join(join_req(&org_id, "Bob", "555-2")).await.unwrap();

        let action = || TicketActionRequest {
            org_id: org_id.clone(),
            ticket_id: bob.ticket.ticket_id.clone(),
        };
        let served = handler.serve(action()).await.unwrap();
        assert_eq!(served.ticket.status, TicketStatus::Completed);

        let err = handler.serve(action()).await.unwrap_err();
        assert_eq!(err.code(), code::INVALID_TRANSITION);
    }

    #[tokio::test]
    async fn test_validation_and_not_found_codes() {
        let (handler, org_id) = setup().await;

        let err = handler.join(join_req(&org_id, " ", "555-2")).await.unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);

        let err = handler
            .status(StatusRequest {
                org_id: org_id.clone(),
                token_number: 42,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);

        let err = handler
            .join(join_req("missing-org", "Bob", "555-2"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_next_on_empty_queue() {
        let (handler, org_id) = setup().await;
        let called = handler.call_next(CallNextRequest { org_id }).await.unwrap();
        assert!(called.ticket.is_none());
    }

    #[tokio::test]
    async fn test_emergency_round_trip() {
        let (handler, org_id) = setup().await;
        handler.join(join_req(&org_id, "Bob", "555-2")).await.unwrap();

        let set = handler
            .set_emergency(SetEmergencyRequest {
                org_id: org_id.clone(),
                stop: true,
                message: Some("Doctor called away".to_string()),
            })
            .await
            .unwrap();
        assert!(set.emergency_stop);

        let got = handler
            .get_emergency(GetEmergencyRequest {
                org_id: org_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(got.emergency_message, "Doctor called away");

        let status = handler
            .status(StatusRequest {
                org_id,
                token_number: 1,
            })
            .await
            .unwrap();
        assert_eq!(status.estimated_wait_minutes, 25);
    }

    #[tokio::test]
    async fn test_duplicate_registration_code() {
        let (handler, _) = setup().await;
        let err = handler
            .register(RegisterOrgRequest {
                name: "Clinic".to_string(),
                contact_email: "other@clinic.test".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::DUPLICATE);
    }

    #[tokio::test]
    async fn test_get_organization_and_entry_code() {
        let (handler, org_id) = setup().await;

        let org = handler
            .get_organization(GetOrgRequest {
                org_id: org_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(org.name, "Clinic");

        let entry = handler
            .entry_code(EntryCodeRequest {
                org_id: org_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(entry.org_id, org_id);
        assert_eq!(entry.organization, "Clinic");
        assert!(entry.rendered.starts_with("data:application/json,"));
        assert!(entry.rendered.contains(&entry.code));

        let err = handler
            .get_organization(GetOrgRequest {
                org_id: "ghost".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);
    }
}
