use crate::adapters::output::OutputFormat;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{
    validate_hex_address, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 內建的網路預設值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub network: NetworkConfig,
    pub wallet: WalletConfig,
    pub query: QueryConfig,
    pub execution: ExecutionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: Network,
    /// 覆寫預設的 RPC 端點
    pub rpc_endpoint: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: Network::default(),
            rpc_endpoint: None,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub address: Option<String>,
    /// 由外部錢包產生的簽名（base64）
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub page_size: usize,
    pub max_pages: usize,
    pub concurrent_requests: usize,
    pub refetch_interval_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_pages: 20,
            concurrent_requests: 5,
            refetch_interval_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub gas_budget: u64,
    pub gas_object: Option<String>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            gas_budget: 10_000_000,
            gas_object: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl DashConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUI_ADDRESS})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 實際使用的 RPC 端點：明確設定優先，否則使用網路預設值
    pub fn rpc_endpoint(&self) -> &str {
        self.network
            .rpc_endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.network.name.rpc_url())
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet.address.as_deref().filter(|a| !a.is_empty())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("network.rpc_endpoint", self.rpc_endpoint())?;
        validate_positive_number(
            "network.timeout_seconds",
            self.network.timeout_seconds as usize,
            1,
        )?;

        if let Some(address) = self.wallet_address() {
            validate_hex_address("wallet.address", address)?;
        }
        if let Some(gas_object) = &self.execution.gas_object {
            validate_hex_address("execution.gas_object", gas_object)?;
        }

        validate_positive_number("query.page_size", self.query.page_size, 1)?;
        validate_positive_number("query.max_pages", self.query.max_pages, 1)?;
        validate_positive_number("query.concurrent_requests", self.query.concurrent_requests, 1)?;
        validate_positive_number(
            "query.refetch_interval_secs",
            self.query.refetch_interval_secs as usize,
            1,
        )?;

        if self.execution.gas_budget == 0 {
            return Err(DashError::InvalidConfigValueError {
                field: "execution.gas_budget".to_string(),
                value: "0".to_string(),
                reason: "Gas budget must be positive".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for DashConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
