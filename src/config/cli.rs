use crate::adapters::output::OutputFormat;
use crate::config::toml_config::{DashConfig, Network};
use crate::utils::error::{DashError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sui-dash")]
#[command(about = "Browse Sui Move packages, wallet balances and owned objects")]
pub struct CliConfig {
    /// TOML 配置檔路徑
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub network: Option<Network>,

    #[arg(long, global = true, help = "Override the JSON-RPC endpoint")]
    pub rpc_url: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, global = true, help = "Wallet address used as sender and owner")]
    pub address: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 列出套件中的模組
    Modules { package: String },

    /// 列出模組公開的函式
    Functions { package: String, module: String },

    /// 顯示函式自動產生的參數與型別參數欄位
    Params {
        package: String,
        module: String,
        function: String,
    },

    /// 建立 Move 呼叫；提供簽名與對應的 --tx-bytes 時直接送出
    Call {
        package: String,
        module: String,
        function: String,

        /// 依序填入參數值，多出的值以 string 型別新增
        #[arg(long = "arg")]
        args: Vec<String>,

        /// 覆寫參數型別，格式為 INDEX=TYPE (例如 0=u64)
        #[arg(long = "arg-type", value_parser = parse_index_override)]
        arg_types: Vec<(usize, String)>,

        /// 依序填入型別參數
        #[arg(long = "type-arg")]
        type_args: Vec<String>,

        #[arg(long = "signature", requires = "tx_bytes")]
        signatures: Vec<String>,

        /// 簽名時所用的交易位元組（由未簽名的 call 輸出）
        #[arg(long)]
        tx_bytes: Option<String>,

        #[arg(long)]
        gas_budget: Option<u64>,

        #[arg(long)]
        gas_object: Option<String>,

        /// 只輸出編碼後的呼叫，不連線建立交易
        #[arg(long)]
        dry_run: bool,
    },

    /// 送出已簽名的交易位元組
    Submit {
        tx_bytes: String,

        #[arg(long = "signature", required = true)]
        signatures: Vec<String>,
    },

    /// 顯示錢包的代幣餘額
    Balances {
        #[arg(value_name = "ADDRESS")]
        owner: Option<String>,

        /// 依 refetch_interval_secs 持續重新整理
        #[arg(long)]
        watch: bool,

        #[arg(long)]
        interval: Option<u64>,
    },

    /// 列出地址擁有的物件
    Objects {
        #[arg(value_name = "ADDRESS")]
        owner: Option<String>,
    },

    /// 以指定型別編碼單一參數並顯示 BCS 結果
    Encode {
        #[arg(value_name = "TYPE")]
        type_tag: String,
        value: String,
    },
}

fn parse_index_override(input: &str) -> std::result::Result<(usize, String), String> {
    let (index, type_tag) = input
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=TYPE, got '{}'", input))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid index '{}': {}", index, e))?;
    Ok((index, type_tag.trim().to_string()))
}

impl CliConfig {
    /// 載入配置檔（若有）並套用命令列覆寫
    pub fn resolve(&self) -> Result<DashConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                DashConfig::from_file(path)?
            }
            None => DashConfig::default(),
        };

        if let Some(network) = self.network {
            config.network.name = network;
            // 指定網路時改用該網路的預設端點
            config.network.rpc_endpoint = None;
        }
        if let Some(rpc_url) = &self.rpc_url {
            config.network.rpc_endpoint = Some(rpc_url.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(address) = &self.address {
            config.wallet.address = Some(address.clone());
        }

        Ok(config)
    }

    /// 子命令的位址參數優先，其次是全域設定
    pub fn owner_address(&self, explicit: Option<&str>, config: &DashConfig) -> Result<String> {
        explicit
            .filter(|a| !a.is_empty())
            .or_else(|| config.wallet_address())
            .map(str::to_string)
            .ok_or_else(|| DashError::MissingConfigError {
                field: "wallet.address".to_string(),
            })
    }
}
