use crate::domain::model::{
    Balance, CoinMetadata, ExecutionOutcome, MoveCall, NormalizedModule, Page, SuiObjectResponse,
    TransactionBlockBytes, TransactionResponse,
};
use crate::domain::ports::{SuiReader, TransactionExecutor};
use crate::utils::error::{DashError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Sui 全節點的 JSON-RPC 客戶端
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    endpoint: String,
    client: Client,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    pub fn new(endpoint: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 發送一次 JSON-RPC 2.0 請求並取出 `result`
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!("📡 RPC {} #{} -> {}", method, id, self.endpoint);
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        tracing::debug!("RPC {} #{} response status: {}", method, id, status);

        if !status.is_success() {
            return Err(DashError::RpcResponseError {
                method: method.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        let envelope: RpcEnvelope = response.json().await?;
        if let Some(error) = envelope.error {
            tracing::warn!("RPC {} failed: {} ({})", method, error.message, error.code);
            return Err(DashError::RpcError {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(envelope.result).map_err(|e| DashError::RpcResponseError {
            method: method.to_string(),
            message: e.to_string(),
        })
    }

    /// `unsafe_moveCall`：由節點組出未簽名的交易位元組
    pub async fn build_move_call(
        &self,
        signer: &str,
        call: &MoveCall,
        gas_object: Option<&str>,
        gas_budget: u64,
    ) -> Result<TransactionBlockBytes> {
        let (package, module, function) = split_target(&call.target)?;
        let arguments: Vec<Value> = call.arguments.iter().map(|a| a.to_sui_json()).collect();

        self.call(
            "unsafe_moveCall",
            json!([
                signer,
                package,
                module,
                function,
                call.type_arguments,
                arguments,
                gas_object,
                gas_budget.to_string(),
            ]),
        )
        .await
    }

    pub async fn execute_transaction(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> Result<TransactionResponse> {
        self.call(
            "sui_executeTransactionBlock",
            json!([
                tx_bytes,
                signatures,
                {
                    "showEffects": true,
                    "showRawEffects": true,
                    "showObjectChanges": true,
                },
                "WaitForLocalExecution",
            ]),
        )
        .await
    }
}

/// `package::module::function` → 三段
pub fn split_target(target: &str) -> Result<(&str, &str, &str)> {
    let mut parts = target.splitn(3, "::");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(m), Some(f)) if !p.is_empty() && !m.is_empty() && !f.is_empty() => {
            Ok((p, m, f))
        }
        _ => Err(DashError::validation(format!(
            "Move call target must look like package::module::function, got {:?}",
            target
        ))),
    }
}

#[async_trait]
impl SuiReader for JsonRpcClient {
    async fn normalized_modules(
        &self,
        package: &str,
    ) -> Result<BTreeMap<String, NormalizedModule>> {
        self.call("sui_getNormalizedMoveModulesByPackage", json!([package]))
            .await
    }

    async fn all_balances(&self, owner: &str) -> Result<Vec<Balance>> {
        self.call("suix_getAllBalances", json!([owner])).await
    }

    async fn coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>> {
        self.call("suix_getCoinMetadata", json!([coin_type])).await
    }

    async fn owned_objects(
        &self,
        owner: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<SuiObjectResponse>> {
        self.call(
            "suix_getOwnedObjects",
            json!([
                owner,
                {
                    "options": {
                        "showType": true,
                        "showOwner": true,
                        "showDisplay": true,
                    }
                },
                cursor,
                limit,
            ]),
        )
        .await
    }
}

/// 以 RPC 建立交易的錢包連接器。
///
/// 不持有私鑰：沒有簽名時建立並回傳待簽名的交易位元組；
/// 有外部簽名時，必須連同簽名所對應的原始交易位元組一起送出，不會重新建立。
pub struct RpcTransactionExecutor {
    client: JsonRpcClient,
    sender: String,
    gas_object: Option<String>,
    gas_budget: u64,
    signatures: Vec<String>,
    signed_tx_bytes: Option<String>,
}

impl RpcTransactionExecutor {
    pub fn new(client: JsonRpcClient, sender: &str, gas_budget: u64) -> Self {
        Self {
            client,
            sender: sender.to_string(),
            gas_object: None,
            gas_budget,
            signatures: Vec::new(),
            signed_tx_bytes: None,
        }
    }

    pub fn with_gas_object(mut self, gas_object: Option<String>) -> Self {
        self.gas_object = gas_object;
        self
    }

    pub fn with_signatures(mut self, signatures: Vec<String>) -> Self {
        self.signatures = signatures;
        self
    }

    /// 簽名時所用的交易位元組（base64）
    pub fn with_signed_tx_bytes(mut self, tx_bytes: Option<String>) -> Self {
        self.signed_tx_bytes = tx_bytes.filter(|b| !b.trim().is_empty());
        self
    }
}

#[async_trait]
impl TransactionExecutor for RpcTransactionExecutor {
    fn current_address(&self) -> Option<&str> {
        Some(self.sender.as_str()).filter(|s| !s.is_empty())
    }

    async fn sign_and_execute(&self, call: &MoveCall) -> Result<ExecutionOutcome> {
        let sender = self
            .current_address()
            .ok_or_else(|| DashError::MissingConfigError {
                field: "wallet.address".to_string(),
            })?;

        let tx_bytes = match (&self.signed_tx_bytes, self.signatures.is_empty()) {
            (None, true) => {
                let built = self
                    .client
                    .build_move_call(sender, call, self.gas_object.as_deref(), self.gas_budget)
                    .await?;
                return Ok(ExecutionOutcome::AwaitingSignature {
                    tx_bytes: built.tx_bytes,
                });
            }
            (Some(tx_bytes), false) => tx_bytes,
            // 重新建立的位元組可能與簽名時不同（gas 物件版本、參考 gas 價格）
            (None, false) => {
                return Err(DashError::validation(
                    "Signatures require the exact txBytes they were produced over",
                ))
            }
            (Some(_), true) => {
                return Err(DashError::validation(
                    "txBytes were supplied without any signature",
                ))
            }
        };

        tracing::debug!("✍️ Submitting signed transaction for {}", call.target);
        let response = self
            .client
            .execute_transaction(tx_bytes, &self.signatures)
            .await?;
        if response.status() == Some("failure") {
            let reason = response
                .effects
                .as_ref()
                .and_then(|e| e.get("status"))
                .and_then(|s| s.get("error"))
                .and_then(|e| e.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(DashError::ExecutionError {
                message: format!("transaction {} failed: {}", response.digest, reason),
            });
        }
        Ok(ExecutionOutcome::Executed(response))
    }
}
