use crate::adapters::output::{render, render_list, OutputFormat};
use crate::adapters::rpc::{JsonRpcClient, RpcTransactionExecutor};
use crate::config::DashConfig;
use crate::core::encode::encode_argument;
use crate::core::move_executor::MoveExecutor;
use crate::core::objects::ObjectBrowser;
use crate::core::wallet::WalletDashboard;
use crate::domain::model::{ExecutionOutcome, TransactionResponse};
use crate::utils::error::{DashError, ErrorCategory, Result};
use crate::utils::validation::is_hex_input;
use serde_json::{json, Value};
use std::time::Duration;

/// 呼叫表單的使用者輸入
#[derive(Debug, Clone, Default)]
pub struct CallRequest {
    pub package: String,
    pub module: String,
    pub function: String,
    pub args: Vec<String>,
    pub arg_types: Vec<(usize, String)>,
    pub type_args: Vec<String>,
    pub signatures: Vec<String>,
    /// 簽名所對應的交易位元組，先前由未簽名的 call 取得
    pub tx_bytes: Option<String>,
    pub gas_budget: Option<u64>,
    pub gas_object: Option<String>,
    pub dry_run: bool,
}

/// 每個子命令對應一個方法，回傳已排版的輸出
pub struct CommandRunner {
    config: DashConfig,
    client: JsonRpcClient,
}

impl CommandRunner {
    pub fn new(config: DashConfig) -> Result<Self> {
        let client = JsonRpcClient::new(config.rpc_endpoint(), config.network.timeout_seconds)?;
        tracing::debug!("🔗 Using RPC endpoint {}", client.endpoint());
        Ok(Self { config, client })
    }

    fn format(&self) -> OutputFormat {
        self.config.output.format
    }

    async fn load_package(&self, package: &str) -> Result<MoveExecutor<JsonRpcClient>> {
        let mut executor = MoveExecutor::new(self.client.clone());
        if package.trim().is_empty() || !executor.set_package(package) {
            return Err(DashError::validation(format!(
                "Package address must be hexadecimal: '{}'",
                package
            )));
        }
        executor.query_package().await?;
        Ok(executor)
    }

    async fn load_function(
        &self,
        package: &str,
        module: &str,
        function: &str,
    ) -> Result<MoveExecutor<JsonRpcClient>> {
        let mut executor = self.load_package(package).await?;

        if !executor.modules().iter().any(|m| m == module) {
            return Err(DashError::validation(format!(
                "Module '{}' not found in package {}",
                module, package
            )));
        }
        executor.select_module(module);

        if !executor.functions().iter().any(|f| f == function) {
            return Err(DashError::validation(format!(
                "Function '{}' not found in {}::{}",
                function, package, module
            )));
        }
        executor.select_function(function);
        Ok(executor)
    }

    pub async fn modules(&self, package: &str) -> Result<String> {
        let executor = self.load_package(package).await?;
        render_list("module", executor.modules(), self.format())
    }

    pub async fn functions(&self, package: &str, module: &str) -> Result<String> {
        let mut executor = self.load_package(package).await?;
        if !executor.modules().iter().any(|m| m == module) {
            return Err(DashError::validation(format!(
                "Module '{}' not found in package {}",
                module, package
            )));
        }
        executor.select_module(module);
        render_list("function", executor.functions(), self.format())
    }

    pub async fn params(&self, package: &str, module: &str, function: &str) -> Result<String> {
        let executor = self.load_function(package, module, function).await?;

        match self.format() {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "typeParameters": executor.type_parameters(),
                "parameters": executor.parameters(),
            }))?),
            format => {
                let mut sections = Vec::new();
                if !executor.type_parameters().is_empty() {
                    sections.push(render(executor.type_parameters(), format)?);
                }
                sections.push(render(executor.parameters(), format)?);
                Ok(sections.join("\n\n"))
            }
        }
    }

    pub async fn call(&self, request: &CallRequest) -> Result<String> {
        let mut executor = self
            .load_function(&request.package, &request.module, &request.function)
            .await?;

        for (index, value) in request.args.iter().enumerate() {
            let id = match executor.parameters().get(index) {
                Some(param) => param.id,
                None => executor.add_parameter(),
            };
            executor.update_parameter_value(id, value);
        }

        for (index, type_tag) in &request.arg_types {
            let id = executor
                .parameters()
                .get(*index)
                .map(|p| p.id)
                .ok_or_else(|| {
                    DashError::validation(format!("No parameter at index {}", index))
                })?;
            executor.update_parameter_type(id, type_tag);
        }

        for (index, value) in request.type_args.iter().enumerate() {
            let id = match executor.type_parameters().get(index) {
                Some(slot) => slot.id,
                None => executor.add_type_parameter(),
            };
            executor.update_type_parameter_value(id, value);
        }

        if request.dry_run {
            let call = executor.build_call()?;
            let arguments = call
                .arguments
                .iter()
                .map(|arg| arg.describe())
                .collect::<Result<Vec<Value>>>()?;
            return Ok(serde_json::to_string_pretty(&json!({
                "target": call.target,
                "typeArguments": call.type_arguments,
                "arguments": arguments,
            }))?);
        }

        let sender = self.config.wallet_address().unwrap_or_default();
        // 設定檔中的簽名只用於明確提供的交易位元組
        let signatures = if !request.signatures.is_empty() {
            request.signatures.clone()
        } else if request.tx_bytes.is_some() {
            self.config.wallet.signatures.clone()
        } else {
            Vec::new()
        };
        let wallet = RpcTransactionExecutor::new(
            self.client.clone(),
            sender,
            request.gas_budget.unwrap_or(self.config.execution.gas_budget),
        )
        .with_gas_object(
            request
                .gas_object
                .clone()
                .or_else(|| self.config.execution.gas_object.clone()),
        )
        .with_signatures(signatures)
        .with_signed_tx_bytes(request.tx_bytes.clone());

        match executor.execute(&wallet).await? {
            ExecutionOutcome::AwaitingSignature { tx_bytes } => Ok(serde_json::to_string_pretty(
                &json!({ "status": "awaiting_signature", "txBytes": tx_bytes }),
            )?),
            ExecutionOutcome::Executed(response) => describe_response(&response),
        }
    }

    pub async fn submit(&self, tx_bytes: &str, signatures: &[String]) -> Result<String> {
        if signatures.is_empty() {
            return Err(DashError::validation("At least one signature is required"));
        }
        let response = self.client.execute_transaction(tx_bytes, signatures).await?;
        describe_response(&response)
    }

    pub async fn balances(&self, owner: &str) -> Result<String> {
        let mut dashboard =
            WalletDashboard::new(self.client.clone(), "", self.config.query.concurrent_requests);
        if !dashboard.set_address(owner) {
            return Err(DashError::validation(format!(
                "Wallet address must be hexadecimal: '{}'",
                owner
            )));
        }
        let rows = dashboard.query().await?;
        render(&rows, self.format())
    }

    /// 依固定間隔重新整理餘額，直到收到 Ctrl-C
    pub async fn watch_balances(&self, owner: &str, interval_secs: Option<u64>) -> Result<()> {
        let period = interval_secs
            .unwrap_or(self.config.query.refetch_interval_secs)
            .max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs(period));
        tracing::info!("👀 Watching balances of {} every {}s", owner, period);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.balances(owner).await {
                        Ok(output) => {
                            println!("── {} ──", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
                            println!("{}", output);
                        }
                        // 網路錯誤時保留上一次的畫面，下一輪再試
                        Err(e) if e.category() == ErrorCategory::Network => {
                            tracing::warn!("⚠️ Refresh failed: {}", e);
                            eprintln!("❌ {}", e.user_friendly_message());
                        }
                        Err(e) => return Err(e),
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Stopped watching balances");
                    return Ok(());
                }
            }
        }
    }

    pub async fn objects(&self, owner: &str) -> Result<String> {
        if owner.trim().is_empty() || !is_hex_input(owner) {
            return Err(DashError::validation(format!(
                "Owner address must be hexadecimal: '{}'",
                owner
            )));
        }
        let browser = ObjectBrowser::new(
            self.client.clone(),
            self.config.query.page_size,
            self.config.query.max_pages,
        );
        let rows = browser.fetch_all(owner).await?;
        render(&rows, self.format())
    }

    pub fn encode(&self, type_tag: &str, value: &str) -> Result<String> {
        let argument = encode_argument(type_tag, value)?;
        Ok(serde_json::to_string_pretty(&argument.describe()?)?)
    }

    #[cfg(feature = "cli")]
    pub async fn dispatch(&self, cli: &crate::config::CliConfig) -> Result<Option<String>> {
        use crate::config::Command;

        let output = match &cli.command {
            Command::Modules { package } => self.modules(package).await?,
            Command::Functions { package, module } => self.functions(package, module).await?,
            Command::Params {
                package,
                module,
                function,
            } => self.params(package, module, function).await?,
            Command::Call {
                package,
                module,
                function,
                args,
                arg_types,
                type_args,
                signatures,
                tx_bytes,
                gas_budget,
                gas_object,
                dry_run,
            } => {
                let request = CallRequest {
                    package: package.clone(),
                    module: module.clone(),
                    function: function.clone(),
                    args: args.clone(),
                    arg_types: arg_types.clone(),
                    type_args: type_args.clone(),
                    signatures: signatures.clone(),
                    tx_bytes: tx_bytes.clone(),
                    gas_budget: *gas_budget,
                    gas_object: gas_object.clone(),
                    dry_run: *dry_run,
                };
                self.call(&request).await?
            }
            Command::Submit {
                tx_bytes,
                signatures,
            } => self.submit(tx_bytes, signatures).await?,
            Command::Balances {
                owner,
                watch,
                interval,
            } => {
                let owner = cli.owner_address(owner.as_deref(), &self.config)?;
                if *watch {
                    self.watch_balances(&owner, *interval).await?;
                    return Ok(None);
                }
                self.balances(&owner).await?
            }
            Command::Objects { owner } => {
                let owner = cli.owner_address(owner.as_deref(), &self.config)?;
                self.objects(&owner).await?
            }
            Command::Encode { type_tag, value } => self.encode(type_tag, value)?,
        };

        Ok(Some(output))
    }
}

fn describe_response(response: &TransactionResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(&json!({
        "digest": response.digest,
        "status": response.status().unwrap_or("unknown"),
        "objectChanges": response.object_changes.as_ref().map(Vec::len).unwrap_or(0),
    }))?)
}
