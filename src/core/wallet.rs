use crate::core::balance::format_balance;
use crate::domain::model::{Balance, CoinMetadata};
use crate::domain::ports::SuiReader;
use crate::utils::error::Result;
use crate::utils::validation::is_hex_input;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;

/// 錢包餘額頁中的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinBalanceRow {
    pub coin_type: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub icon_url: Option<String>,
    pub coin_object_count: u64,
    pub raw_balance: String,
    pub balance: String,
}

impl CoinBalanceRow {
    fn from_parts(coin: Balance, metadata: Option<CoinMetadata>) -> Result<Self> {
        let metadata = metadata.unwrap_or_default();
        let balance = format_balance(&coin.total_balance, metadata.decimals)?;
        let symbol = if metadata.symbol.is_empty() {
            "Unknown".to_string()
        } else {
            metadata.symbol
        };

        Ok(Self {
            coin_type: coin.coin_type,
            symbol,
            name: metadata.name,
            decimals: metadata.decimals,
            icon_url: metadata.icon_url.filter(|url| !url.is_empty()),
            coin_object_count: coin.coin_object_count,
            raw_balance: coin.total_balance,
            balance,
        })
    }
}

/// 錢包儀表板：查詢某地址的所有代幣餘額與代幣資訊
pub struct WalletDashboard<R: SuiReader> {
    reader: R,
    address: String,
    concurrent_requests: usize,
}

impl<R: SuiReader> WalletDashboard<R> {
    pub fn new(reader: R, address: &str, concurrent_requests: usize) -> Self {
        let mut dashboard = Self {
            reader,
            address: String::new(),
            concurrent_requests: concurrent_requests.max(1),
        };
        dashboard.set_address(address);
        dashboard
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// 空字串或十六進位地址才接受
    pub fn set_address(&mut self, input: &str) -> bool {
        if input.is_empty() || is_hex_input(input) {
            self.address = input.to_string();
            true
        } else {
            tracing::debug!("Rejected wallet address input: {}", input);
            false
        }
    }

    /// 取得非零餘額的代幣，依 coin type 排序
    pub async fn query(&self) -> Result<Vec<CoinBalanceRow>> {
        if self.address.trim().is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("👛 Querying wallet: {}", self.address);
        let balances = self.reader.all_balances(&self.address).await?;
        let total = balances.len();
        let coins: Vec<Balance> = balances
            .into_iter()
            .filter(|coin| coin.total_balance != "0")
            .collect();
        tracing::debug!("{} of {} coin types have a non-zero balance", coins.len(), total);

        // 保持順序的有限並發查詢
        let metadata: Vec<Option<CoinMetadata>> = stream::iter(coins.iter())
            .map(|coin| self.reader.coin_metadata(&coin.coin_type))
            .buffered(self.concurrent_requests)
            .try_collect()
            .await?;

        let mut rows = coins
            .into_iter()
            .zip(metadata)
            .map(|(coin, meta)| CoinBalanceRow::from_parts(coin, meta))
            .collect::<Result<Vec<_>>>()?;
        rows.sort_by(|a, b| a.coin_type.cmp(&b.coin_type));

        Ok(rows)
    }
}
