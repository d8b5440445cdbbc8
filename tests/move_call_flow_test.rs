use anyhow::Result;
use httpmock::prelude::*;
use serde_json::{json, Value};
use sui_dash::{CallRequest, CommandRunner, DashConfig, DashError};
use tempfile::TempDir;

const PACKAGE: &str = "0xabc";

fn rpc_result(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

fn vault_modules() -> Value {
    json!({
        "coin": {
            "fileFormatVersion": 6,
            "address": PACKAGE,
            "name": "coin",
            "exposedFunctions": {}
        },
        "vault": {
            "fileFormatVersion": 6,
            "address": PACKAGE,
            "name": "vault",
            "exposedFunctions": {
                "deposit": {
                    "visibility": "Public",
                    "isEntry": true,
                    "typeParameters": [{"abilities": []}],
                    "parameters": [
                        {"MutableReference": {"Struct": {"address": PACKAGE, "module": "vault", "name": "Vault", "typeArguments": []}}},
                        "U64",
                        {"TypeParameter": 0},
                        {"MutableReference": {"Struct": {"address": "0x2", "module": "tx_context", "name": "TxContext", "typeArguments": []}}}
                    ],
                    "return": []
                },
                "withdraw": {
                    "visibility": "Public",
                    "isEntry": true,
                    "typeParameters": [],
                    "parameters": [],
                    "return": []
                }
            }
        }
    })
}

/// 以臨時 TOML 檔建立指向 mock server 的執行器
async fn runner_for(server: &MockServer, extra: &str) -> Result<(TempDir, CommandRunner)> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("sui-dash.toml");
    let config_content = format!(
        r#"
[network]
rpc_endpoint = "{}"
timeout_seconds = 5

[wallet]
address = "0x1"

[execution]
gas_budget = 2000000
{}
"#,
        server.url("/"),
        extra
    );
    tokio::fs::write(&config_path, config_content).await?;

    let config = DashConfig::from_file(&config_path)?;
    config.validate_config()?;
    Ok((temp_dir, CommandRunner::new(config)?))
}

fn mock_modules(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body_partial(r#"{"method": "sui_getNormalizedMoveModulesByPackage", "params": ["0xabc"]}"#);
        then.status(200).json_body(rpc_result(vault_modules()));
    })
}

fn deposit_request() -> CallRequest {
    CallRequest {
        package: PACKAGE.to_string(),
        module: "vault".to_string(),
        function: "deposit".to_string(),
        args: vec!["0x5".to_string(), "10".to_string()],
        type_args: vec!["0x2::sui::SUI".to_string()],
        ..CallRequest::default()
    }
}

#[tokio::test]
async fn test_list_modules_and_functions() -> Result<()> {
    let server = MockServer::start();
    let modules_mock = mock_modules(&server);
    let (_dir, runner) = runner_for(&server, "").await?;

    assert_eq!(runner.modules(PACKAGE).await?, "coin\nvault");
    assert_eq!(runner.functions(PACKAGE, "vault").await?, "deposit\nwithdraw");
    assert_eq!(runner.functions(PACKAGE, "coin").await?, "");

    modules_mock.assert_hits(3);
    Ok(())
}

#[tokio::test]
async fn test_params_skip_tx_context() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let (_dir, runner) = runner_for(&server, "\n[output]\nformat = \"json\"\n").await?;

    let output: Value = serde_json::from_str(&runner.params(PACKAGE, "vault", "deposit").await?)?;

    let parameters = output["parameters"].as_array().unwrap();
    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters[0]["type_tag"], "&mut vault::Vault");
    assert_eq!(parameters[1]["type_tag"], "U64");

    let type_parameters = output["typeParameters"].as_array().unwrap();
    assert_eq!(type_parameters.len(), 1);
    assert_eq!(type_parameters[0]["name"], "T0");
    Ok(())
}

#[tokio::test]
async fn test_dry_run_encodes_arguments() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let (_dir, runner) = runner_for(&server, "").await?;

    let request = CallRequest {
        dry_run: true,
        ..deposit_request()
    };
    let output: Value = serde_json::from_str(&runner.call(&request).await?)?;

    assert_eq!(output["target"], "0xabc::vault::deposit");
    assert_eq!(output["typeArguments"], json!(["0x2::sui::SUI"]));
    assert_eq!(output["arguments"][0]["kind"], "object");
    assert_eq!(output["arguments"][0]["objectId"], "0x5");
    assert_eq!(output["arguments"][1]["type"], "u64");
    // 10 的 u64 小端序位元組
    assert_eq!(output["arguments"][1]["bcs"], "CgAAAAAAAAA=");
    Ok(())
}

#[tokio::test]
async fn test_extra_args_and_type_override() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let (_dir, runner) = runner_for(&server, "").await?;

    let request = CallRequest {
        args: vec!["0x5".to_string(), "10".to_string(), "hello".to_string()],
        arg_types: vec![(1, "u8".to_string())],
        dry_run: true,
        ..deposit_request()
    };
    let output: Value = serde_json::from_str(&runner.call(&request).await?)?;

    let arguments = output["arguments"].as_array().unwrap();
    assert_eq!(arguments.len(), 3);
    assert_eq!(arguments[1]["type"], "u8");
    assert_eq!(arguments[2]["type"], "string");
    assert_eq!(arguments[2]["value"], "hello");
    Ok(())
}

#[tokio::test]
async fn test_overflowing_argument_is_rejected() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let (_dir, runner) = runner_for(&server, "").await?;

    let request = CallRequest {
        args: vec!["0x5".to_string(), "300".to_string()],
        arg_types: vec![(1, "u8".to_string())],
        dry_run: true,
        ..deposit_request()
    };
    let err = runner.call(&request).await.unwrap_err();
    assert!(matches!(err, DashError::EncodeError { .. }));
    Ok(())
}

#[tokio::test]
async fn test_call_without_signature_returns_tx_bytes() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let build_mock = server.mock(|when, then| {
        when.method(POST).path("/").json_body_partial(
            r#"{"method": "unsafe_moveCall", "params": ["0x1", "0xabc", "vault", "deposit", ["0x2::sui::SUI"], ["0x5", "10"], null, "2000000"]}"#,
        );
        then.status(200)
            .json_body(rpc_result(json!({"txBytes": "AAEC", "gas": [], "inputObjects": []})));
    });
    let (_dir, runner) = runner_for(&server, "").await?;

    let output: Value = serde_json::from_str(&runner.call(&deposit_request()).await?)?;

    build_mock.assert();
    assert_eq!(output["status"], "awaiting_signature");
    assert_eq!(output["txBytes"], "AAEC");
    Ok(())
}

#[tokio::test]
async fn test_call_with_signature_submits_signed_bytes() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let build_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body_partial(r#"{"method": "unsafe_moveCall"}"#);
        then.status(200)
            .json_body(rpc_result(json!({"txBytes": "REBUILT"})));
    });
    let execute_mock = server.mock(|when, then| {
        when.method(POST).path("/").json_body_partial(
            r#"{"method": "sui_executeTransactionBlock", "params": ["AAEC", ["c2lnbmF0dXJl"]]}"#,
        );
        then.status(200).json_body(rpc_result(json!({
            "digest": "9xQm",
            "effects": {"status": {"status": "success"}},
            "objectChanges": [{"type": "mutated"}]
        })));
    });
    let (_dir, runner) = runner_for(&server, "").await?;

    let request = CallRequest {
        signatures: vec!["c2lnbmF0dXJl".to_string()],
        tx_bytes: Some("AAEC".to_string()),
        ..deposit_request()
    };
    let output: Value = serde_json::from_str(&runner.call(&request).await?)?;

    execute_mock.assert();
    assert_eq!(build_mock.hits(), 0);
    assert_eq!(output["digest"], "9xQm");
    assert_eq!(output["status"], "success");
    assert_eq!(output["objectChanges"], 1);
    Ok(())
}

#[tokio::test]
async fn test_signature_without_tx_bytes_is_rejected() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let build_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body_partial(r#"{"method": "unsafe_moveCall"}"#);
        then.status(200)
            .json_body(rpc_result(json!({"txBytes": "AAEC"})));
    });
    let execute_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body_partial(r#"{"method": "sui_executeTransactionBlock"}"#);
        then.status(200).json_body(rpc_result(json!({"digest": "x"})));
    });
    let (_dir, runner) = runner_for(&server, "").await?;

    let request = CallRequest {
        signatures: vec!["c2ln".to_string()],
        ..deposit_request()
    };
    let err = runner.call(&request).await.unwrap_err();

    assert!(matches!(err, DashError::ValidationError { .. }));
    assert_eq!(build_mock.hits(), 0);
    assert_eq!(execute_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_execution_is_an_error() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body_partial(r#"{"method": "sui_executeTransactionBlock"}"#);
        then.status(200).json_body(rpc_result(json!({
            "digest": "bad1",
            "effects": {"status": {"status": "failure", "error": "InsufficientGas"}}
        })));
    });
    let (_dir, runner) = runner_for(&server, "").await?;

    let request = CallRequest {
        signatures: vec!["c2ln".to_string()],
        tx_bytes: Some("AAEC".to_string()),
        ..deposit_request()
    };
    let err = runner.call(&request).await.unwrap_err();
    match err {
        DashError::ExecutionError { message } => assert!(message.contains("InsufficientGas")),
        other => panic!("unexpected error {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_module_is_rejected() -> Result<()> {
    let server = MockServer::start();
    mock_modules(&server);
    let (_dir, runner) = runner_for(&server, "").await?;

    let err = runner.functions(PACKAGE, "missing").await.unwrap_err();
    assert!(matches!(err, DashError::ValidationError { .. }));

    let err = runner.modules("not-hex").await.unwrap_err();
    assert!(matches!(err, DashError::ValidationError { .. }));
    Ok(())
}

#[tokio::test]
async fn test_encode_single_argument() -> Result<()> {
    let server = MockServer::start();
    let (_dir, runner) = runner_for(&server, "").await?;

    let output: Value = serde_json::from_str(&runner.encode("u128", "340282366920938463463374607431768211455")?)?;
    assert_eq!(output["value"], "340282366920938463463374607431768211455");
    assert_eq!(output["bcs"], "/////////////////////w==");

    let object: Value = serde_json::from_str(&runner.encode("&mut vault::Vault", "0x5")?)?;
    assert_eq!(object["kind"], "object");
    Ok(())
}
