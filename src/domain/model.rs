use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Move 參數的宣告型別，對應 `sui_getNormalizedMoveModulesByPackage` 回傳的 JSON 形狀。
///
/// 原始型別以字串表示（`"U64"`），其餘以單鍵物件表示（`{"Struct": {...}}`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveNormalizedType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Struct(MoveStructRef),
    Vector(Box<MoveNormalizedType>),
    TypeParameter(u16),
    Reference(Box<MoveNormalizedType>),
    MutableReference(Box<MoveNormalizedType>),
}

impl MoveNormalizedType {
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            MoveNormalizedType::Bool => Some("Bool"),
            MoveNormalizedType::U8 => Some("U8"),
            MoveNormalizedType::U16 => Some("U16"),
            MoveNormalizedType::U32 => Some("U32"),
            MoveNormalizedType::U64 => Some("U64"),
            MoveNormalizedType::U128 => Some("U128"),
            MoveNormalizedType::U256 => Some("U256"),
            MoveNormalizedType::Address => Some("Address"),
            MoveNormalizedType::Signer => Some("Signer"),
            _ => None,
        }
    }
}

impl fmt::Display for MoveNormalizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.primitive_name() {
            return f.write_str(name);
        }
        match self {
            MoveNormalizedType::Struct(s) => write!(f, "{}", s),
            MoveNormalizedType::Vector(inner) => write!(f, "vector<{}>", inner),
            MoveNormalizedType::TypeParameter(index) => write!(f, "T{}", index),
            MoveNormalizedType::Reference(inner) => write!(f, "&{}", inner),
            MoveNormalizedType::MutableReference(inner) => write!(f, "&mut {}", inner),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveStructRef {
    pub address: String,
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<MoveNormalizedType>,
}

impl fmt::Display for MoveStructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if !self.type_arguments.is_empty() {
            let args: Vec<String> = self.type_arguments.iter().map(|t| t.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedModule {
    #[serde(default)]
    pub file_format_version: u32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exposed_functions: BTreeMap<String, NormalizedFunction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFunction {
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub is_entry: bool,
    /// ability 集合，只用來計算型別參數個數
    #[serde(default)]
    pub type_parameters: Vec<serde_json::Value>,
    #[serde(default)]
    pub parameters: Vec<MoveNormalizedType>,
    #[serde(default, rename = "return")]
    pub return_types: Vec<MoveNormalizedType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    #[serde(default)]
    pub coin_object_count: u64,
    pub total_balance: String,
    #[serde(default)]
    pub locked_balance: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinMetadata {
    #[serde(default)]
    pub decimals: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// 游標分頁的一頁結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiObjectResponse {
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    pub object_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub owner: Option<serde_json::Value>,
    #[serde(default)]
    pub display: Option<serde_json::Value>,
}

/// 使用者表單中的一個呼叫參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub id: u32,
    pub value: String,
    pub type_tag: String,
}

/// 使用者表單中的一個型別參數槽位
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeParameter {
    pub id: u32,
    pub name: String,
    pub value: String,
}

/// 具型別的純值參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureValue {
    String(String),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Bool(bool),
    Address(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgument {
    Pure(PureValue),
    /// 以物件 ID 傳遞的鏈上物件
    Object(String),
}

/// 交給錢包連接器的呼叫描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    pub target: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<CallArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockBytes {
    pub tx_bytes: String,
    #[serde(default)]
    pub gas: Vec<serde_json::Value>,
    #[serde(default)]
    pub input_objects: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<serde_json::Value>,
    #[serde(default)]
    pub object_changes: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub raw_effects: Option<Vec<u8>>,
}

impl TransactionResponse {
    /// `effects.status.status`，例如 `success` 或 `failure`
    pub fn status(&self) -> Option<&str> {
        self.effects
            .as_ref()?
            .get("status")?
            .get("status")?
            .as_str()
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// 交易位元組已建立，等待外部錢包簽名
    AwaitingSignature { tx_bytes: String },
    Executed(TransactionResponse),
}
