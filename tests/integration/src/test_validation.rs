//! Validation behavior: failures that must surface before any remote call.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use opkit_core::{
        AutoConfirm, BoundParams, CancelToken, ClientConfig, CollectingHost, InvocationOptions,
        Invoker, PipelineError, execute,
    };
    use opkit_model::builtin_catalog;

    use crate::{ScriptedClient, init_tracing, shift_page};

    #[tokio::test]
    async fn test_should_fail_before_any_call_when_required_param_unbound() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Start-ZonalShift").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
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

        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(client.calls(), 0, "validation must precede network activity");
    }

    #[tokio::test]
    async fn test_should_fail_before_any_call_when_pass_thru_combined_with_select() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Stop-ZonalShift").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();
        let mut bound = BoundParams::new();
        bound.bind(schema, "ZonalShiftId", json!("zs-1")).unwrap();
        let options = InvocationOptions {
            select: Some("ZonalShiftId".to_owned()),
            pass_thru: true,
            force: true,
            ..InvocationOptions::default()
        };

        let err = execute(
            schema, bound, &options, &invoker, &AutoConfirm, &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_should_warn_and_proceed_when_required_param_explicitly_null() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Start-ZonalShift").unwrap();

        let mut response = shift_page(&[], "");
        response.insert("ZonalShiftId", json!("zs-9"));
        let client = Arc::new(ScriptedClient::new(vec![Ok(response)]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();

        let mut bound = BoundParams::new();
        bound.bind(schema, "ResourceIdentifier", Value::Null).unwrap();
        bound.bind(schema, "AwayFrom", json!("use1-az1")).unwrap();
        bound.bind(schema, "ExpiresIn", json!("2h")).unwrap();
        let options = InvocationOptions {
            force: true,
            ..InvocationOptions::default()
        };

        execute(
            schema, bound, &options, &invoker, &AutoConfirm, &mut host,
            &CancelToken::never(),
        )
        .await
        .expect("explicit null is a warning, not an abort");

        assert_eq!(client.calls(), 1);
        let (_, request) = &client.requests()[0];
        assert!(
            request.get("ResourceIdentifier").is_none(),
            "null member must be omitted from the request"
        );
    }

    #[tokio::test]
    async fn test_should_reject_enum_value_at_bind_time() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let mut bound = BoundParams::new();

        let err = bound.bind(schema, "Status", json!("PAUSED")).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(m) if m.contains("PAUSED")));
    }

    #[tokio::test]
    async fn test_should_reject_select_that_does_not_resolve() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();
        let options = InvocationOptions {
            select: Some("Shifts.Items".to_owned()),
            ..InvocationOptions::default()
        };

        let err = execute(
            schema,
            BoundParams::new(),
            &options,
            &invoker,
            &AutoConfirm,
            &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(client.calls(), 0);
    }
}
