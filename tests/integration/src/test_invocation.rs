//! Single-call invocation behavior: request shape, projection, diagnostics,
//! and the confirmation gate.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use opkit_core::{
        AutoConfirm, BoundParams, CancelToken, ClientConfig, ClientError, CollectingHost, DenyAll,
        InvocationOptions, Invoker, PipelineError, execute,
    };
    use opkit_model::{Payload, builtin_catalog};

    use crate::{ScriptedClient, init_tracing, shift_page};

    #[tokio::test]
    async fn test_should_send_empty_request_and_project_items_by_default() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![Ok(shift_page(&["zs-1"], ""))]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();

        execute(
            schema,
            BoundParams::new(),
            &InvocationOptions::default(),
            &invoker,
            &AutoConfirm,
            &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap();

        assert_eq!(client.calls(), 1);
        let (operation, request) = &client.requests()[0];
        assert_eq!(operation, "ListZonalShifts");
        assert!(request.is_empty(), "unbound optional members must be absent");
        assert_eq!(
            host.outputs(),
            vec![&json!([{"ZonalShiftId": "zs-1", "Status": "ACTIVE"}])]
        );
    }

    #[tokio::test]
    async fn test_should_omit_composite_with_no_set_leaves() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Update-MQBroker").unwrap();
        let mut response = Payload::new();
        response.insert("BrokerId", json!("b-1"));
        let client = Arc::new(ScriptedClient::new(vec![Ok(response)]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();

        let mut bound = BoundParams::new();
        bound.bind(schema, "BrokerId", json!("b-1")).unwrap();
        bound
            .bind(schema, "Logs", json!({"Audit": null, "General": null}))
            .unwrap();
        let options = InvocationOptions {
            force: true,
            ..InvocationOptions::default()
        };

        execute(
            schema, bound, &options, &invoker, &AutoConfirm, &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap();

        let (_, request) = &client.requests()[0];
        assert!(request.get("Logs").is_none());
        // Default select for Update-MQBroker extracts BrokerId.
        assert_eq!(host.outputs(), vec![&json!("b-1")]);
    }

    #[tokio::test]
    async fn test_should_echo_input_parameter_with_pass_thru() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Stop-ZonalShift").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![Ok(Payload::new())]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();

        let mut bound = BoundParams::new();
        bound.bind(schema, "ZonalShiftId", json!("zs-7")).unwrap();
        let options = InvocationOptions {
            pass_thru: true,
            force: true,
            ..InvocationOptions::default()
        };

        execute(
            schema, bound, &options, &invoker, &AutoConfirm, &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap();

        assert_eq!(host.outputs(), vec![&json!("zs-7")]);
    }

    #[tokio::test]
    async fn test_should_skip_call_when_confirmation_declined() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Update-MQBroker").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();

        let mut bound = BoundParams::new();
        bound.bind(schema, "BrokerId", json!("b-1")).unwrap();

        execute(
            schema,
            bound,
            &InvocationOptions::default(),
            &invoker,
            &DenyAll,
            &mut host,
            &CancelToken::never(),
        )
        .await
        .expect("declined confirmation is a clean no-op");

        assert_eq!(client.calls(), 0);
        assert!(host.records.is_empty());
    }

    #[tokio::test]
    async fn test_should_reference_endpoint_in_name_resolution_failure() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-AccountInformation").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![Err(
            ClientError::NameResolution {
                host: "account.nowhere.example".to_owned(),
            },
        )]));
        let config = ClientConfig {
            endpoint_url: Some("https://account.nowhere.example".to_owned()),
            ..ClientConfig::default()
        };
        let invoker = Invoker::new(client.clone(), config);
        let mut host = CollectingHost::new();

        let err = execute(
            schema,
            BoundParams::new(),
            &InvocationOptions::default(),
            &invoker,
            &AutoConfirm,
            &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap_err();

        match err {
            PipelineError::Transport { endpoint, message } => {
                assert!(endpoint.contains("https://account.nowhere.example"));
                assert!(message.contains("account.nowhere.example"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
