use crate::domain::model::{
    Balance, CoinMetadata, ExecutionOutcome, MoveCall, NormalizedModule, Page, SuiObjectResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// 鏈上查詢介面（由 RPC 客戶端實作）
#[async_trait]
pub trait SuiReader: Send + Sync {
    async fn normalized_modules(&self, package: &str)
        -> Result<BTreeMap<String, NormalizedModule>>;
    async fn all_balances(&self, owner: &str) -> Result<Vec<Balance>>;
    async fn coin_metadata(&self, coin_type: &str) -> Result<Option<CoinMetadata>>;
    async fn owned_objects(
        &self,
        owner: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<SuiObjectResponse>>;
}

/// 錢包連接器：提供目前地址，並負責簽名與執行呼叫
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    fn current_address(&self) -> Option<&str>;
    async fn sign_and_execute(&self, call: &MoveCall) -> Result<ExecutionOutcome>;
}
