//! Pagination loop behavior.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use opkit_core::{
        AutoConfirm, BoundParams, CancelToken, ClientConfig, ClientError, CollectingHost,
        InvocationOptions, Invoker, PipelineRecord, execute,
    };
    use opkit_model::builtin_catalog;

    use crate::{ScriptedClient, init_tracing, shift_page};

    #[tokio::test]
    async fn test_should_issue_one_call_per_token_until_empty() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(shift_page(&["zs-1"], "A")),
            Ok(shift_page(&["zs-2"], "B")),
            Ok(shift_page(&["zs-3"], "")),
        ]));
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

        assert_eq!(client.calls(), 3, "tokens A, B, empty mean exactly 3 calls");
        let requests = client.requests();
        assert!(requests[0].1.get("NextToken").is_none());
        assert_eq!(requests[1].1.get_str("NextToken"), Some("A"));
        assert_eq!(requests[2].1.get_str("NextToken"), Some("B"));

        // Pages arrive in order; items keep service order within a page.
        assert_eq!(host.outputs().len(), 3);
        assert_eq!(
            host.outputs()[0],
            &json!([{"ZonalShiftId": "zs-1", "Status": "ACTIVE"}])
        );
    }

    #[tokio::test]
    async fn test_should_fetch_at_most_one_page_for_first_n_consumer() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(shift_page(&["zs-1", "zs-2", "zs-3", "zs-4", "zs-5"], "A")),
            Ok(shift_page(&["zs-6"], "")),
        ]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::first(1);

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
        assert_eq!(host.records.len(), 1);
    }

    #[tokio::test]
    async fn test_should_respect_manual_paging_mode() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![Ok(shift_page(&["zs-1"], "A"))]));
        let invoker = Invoker::new(client.clone(), ClientConfig::default());
        let mut host = CollectingHost::new();
        let mut bound = BoundParams::new();
        bound.bind(schema, "NextToken", json!("seed")).unwrap();
        let options = InvocationOptions {
            auto_paginate: false,
            ..InvocationOptions::default()
        };

        execute(
            schema, bound, &options, &invoker, &AutoConfirm, &mut host,
            &CancelToken::never(),
        )
        .await
        .unwrap();

        assert_eq!(client.calls(), 1);
        // The caller's token is sent; the returned token is not followed.
        assert_eq!(client.requests()[0].1.get_str("NextToken"), Some("seed"));
    }

    #[tokio::test]
    async fn test_should_attach_error_record_after_partial_emission() {
        init_tracing();
        let catalog = builtin_catalog();
        let schema = catalog.by_command("Get-ZonalShiftList").unwrap();
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(shift_page(&["zs-1"], "A")),
            Err(ClientError::Service {
                code: "ThrottlingException".to_owned(),
                message: "rate exceeded".to_owned(),
            }),
        ]));
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
        .expect("failure after emission is captured on the stream");

        assert_eq!(host.records.len(), 2);
        assert!(matches!(
            &host.records[1],
            PipelineRecord::Error(record) if record.code == "ThrottlingException"
        ));
    }
}
