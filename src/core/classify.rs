use crate::domain::model::{MoveNormalizedType, MoveStructRef};

/// Tag shown for generic type-parameter slots.
pub const GENERIC_TAG: &str = "T";
/// Tag for the platform's built-in `0x1::string::String`.
pub const STRING_TAG: &str = "string";
/// Tag for shapes the encoding table has no entry for.
pub const UNKNOWN_TAG: &str = "unknown";

/// 將宣告的參數形狀分類成型別標籤，供編碼表使用。
///
/// - 原始型別名稱原樣返回（`U64`、`Bool`…）
/// - 泛型參數返回 `T`
/// - `&S` / `&mut S` 返回 `&module::Name` / `&mut module::Name`
/// - `0x1::string::String` 返回 `string`，其他 struct 返回 `module::Name`
pub fn classify_parameter(param: &MoveNormalizedType) -> String {
    if let Some(name) = param.primitive_name() {
        return name.to_string();
    }

    match param {
        MoveNormalizedType::TypeParameter(_) => GENERIC_TAG.to_string(),
        MoveNormalizedType::Reference(inner) => match inner.as_ref() {
            MoveNormalizedType::Struct(s) => format!("&{}::{}", s.module, s.name),
            _ => UNKNOWN_TAG.to_string(),
        },
        MoveNormalizedType::MutableReference(inner) => match inner.as_ref() {
            MoveNormalizedType::Struct(s) => format!("&mut {}::{}", s.module, s.name),
            _ => UNKNOWN_TAG.to_string(),
        },
        MoveNormalizedType::Struct(s) if is_string_struct(s) => STRING_TAG.to_string(),
        MoveNormalizedType::Struct(s) => format!("{}::{}", s.module, s.name),
        _ => UNKNOWN_TAG.to_string(),
    }
}

fn is_string_struct(s: &MoveStructRef) -> bool {
    s.module == "string" && s.name == "String"
}

/// `TxContext` is injected by the runtime and never supplied by the caller.
pub fn is_tx_context(param: &MoveNormalizedType) -> bool {
    match param {
        MoveNormalizedType::Reference(inner) | MoveNormalizedType::MutableReference(inner) => {
            matches!(
                inner.as_ref(),
                MoveNormalizedType::Struct(s) if s.module == "tx_context" && s.name == "TxContext"
            )
        }
        _ => false,
    }
}

/// Index of a bare generic parameter such as `x: T0`.
pub fn type_parameter_index(param: &MoveNormalizedType) -> Option<u16> {
    match param {
        MoveNormalizedType::TypeParameter(index) => Some(*index),
        _ => None,
    }
}
