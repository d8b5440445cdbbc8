use crate::domain::model::{CallArgument, PureValue};
use crate::utils::error::{DashError, Result};
use alloy_primitives::{hex, U256};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::fmt;

// 256 / 8 bits = 32 bytes
pub const BYTES_256_OFFSET: usize = 32;
pub const ADDRESS_LENGTH: usize = 32;

/// 編碼表的分派鍵，由使用者可編輯的型別標籤推導而來
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    String,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Bool,
    Address,
    Object,
}

impl ArgKind {
    /// 標籤 → 編碼器。無法辨識的標籤一律視為物件引用。
    pub fn from_tag(tag: &str) -> Self {
        if tag == "string" {
            return ArgKind::String;
        }

        let unsigned = [
            ("u8", ArgKind::U8),
            ("u16", ArgKind::U16),
            ("u32", ArgKind::U32),
            ("u64", ArgKind::U64),
            ("u128", ArgKind::U128),
            ("u256", ArgKind::U256),
        ];
        if let Some((_, kind)) = unsigned
            .iter()
            .find(|(name, _)| tag.eq_ignore_ascii_case(name))
        {
            return *kind;
        }

        match tag {
            "bool" | "Bool" => ArgKind::Bool,
            "address" | "Address" => ArgKind::Address,
            // `&...`, `&mut ...`, `module::Name`, `unknown`
            _ => ArgKind::Object,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::String => "string",
            ArgKind::U8 => "u8",
            ArgKind::U16 => "u16",
            ArgKind::U32 => "u32",
            ArgKind::U64 => "u64",
            ArgKind::U128 => "u128",
            ArgKind::U256 => "u256",
            ArgKind::Bool => "bool",
            ArgKind::Address => "address",
            ArgKind::Object => "object",
        }
    }
}

/// 把使用者輸入的字串依型別標籤轉成呼叫參數。
///
/// 64 位元以上的整數以精確整數解析，不經過浮點數。
pub fn encode_argument(type_tag: &str, value: &str) -> Result<CallArgument> {
    let kind = ArgKind::from_tag(type_tag);
    let pure = match kind {
        ArgKind::String => PureValue::String(value.to_string()),
        ArgKind::U8 => PureValue::U8(narrow(type_tag, value, parse_u128(type_tag, value)?)?),
        ArgKind::U16 => PureValue::U16(narrow(type_tag, value, parse_u128(type_tag, value)?)?),
        ArgKind::U32 => PureValue::U32(narrow(type_tag, value, parse_u128(type_tag, value)?)?),
        ArgKind::U64 => PureValue::U64(narrow(type_tag, value, parse_u128(type_tag, value)?)?),
        ArgKind::U128 => PureValue::U128(parse_u128(type_tag, value)?),
        ArgKind::U256 => PureValue::U256(parse_u256(type_tag, value)?),
        ArgKind::Bool => PureValue::Bool(value == "true" || value == "1"),
        ArgKind::Address => PureValue::Address(value.to_string()),
        ArgKind::Object => return Ok(CallArgument::Object(value.to_string())),
    };
    Ok(CallArgument::Pure(pure))
}

/// Splits `0x`-prefixed hex from decimal; empty input reads as zero.
fn digits_and_radix(value: &str) -> (&str, u32) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ("0", 10);
    }
    match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (trimmed, 10),
    }
}

fn parse_u128(type_tag: &str, value: &str) -> Result<u128> {
    let (digits, radix) = digits_and_radix(value);
    u128::from_str_radix(digits, radix).map_err(|e| DashError::encode(type_tag, value, e.to_string()))
}

fn parse_u256(type_tag: &str, value: &str) -> Result<U256> {
    let (digits, radix) = digits_and_radix(value);
    U256::from_str_radix(digits, radix as u64)
        .map_err(|e| DashError::encode(type_tag, value, e.to_string()))
}

fn narrow<T: TryFrom<u128>>(type_tag: &str, value: &str, wide: u128) -> Result<T> {
    T::try_from(wide).map_err(|_| {
        DashError::encode(
            type_tag,
            value,
            format!("value does not fit in {}", type_tag.to_ascii_lowercase()),
        )
    })
}

/// 解析十六進位地址並左補零到 32 bytes
pub fn address_to_bytes(address: &str) -> Result<[u8; ADDRESS_LENGTH]> {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    if digits.is_empty()
        || digits.len() > ADDRESS_LENGTH * 2
        || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(DashError::encode(
            "address",
            address,
            format!("expected 1 to {} hex characters", ADDRESS_LENGTH * 2),
        ));
    }

    let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
    hex::decode_to_array::<_, ADDRESS_LENGTH>(padded)
        .map_err(|e| DashError::encode("address", address, e.to_string()))
}

pub fn bytes_to_address(bytes: &[u8]) -> String {
    hex::encode_prefixed(bytes)
}

fn bcs_err(kind: ArgKind, e: bcs::Error) -> DashError {
    DashError::DecodeError {
        type_tag: kind.name().to_string(),
        reason: e.to_string(),
    }
}

impl PureValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            PureValue::String(_) => ArgKind::String,
            PureValue::U8(_) => ArgKind::U8,
            PureValue::U16(_) => ArgKind::U16,
            PureValue::U32(_) => ArgKind::U32,
            PureValue::U64(_) => ArgKind::U64,
            PureValue::U128(_) => ArgKind::U128,
            PureValue::U256(_) => ArgKind::U256,
            PureValue::Bool(_) => ArgKind::Bool,
            PureValue::Address(_) => ArgKind::Address,
        }
    }

    /// BCS encoding as the Move VM expects it for a pure input.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>> {
        let encoded = match self {
            PureValue::String(s) => bcs::to_bytes(s),
            PureValue::U8(v) => bcs::to_bytes(v),
            PureValue::U16(v) => bcs::to_bytes(v),
            PureValue::U32(v) => bcs::to_bytes(v),
            PureValue::U64(v) => bcs::to_bytes(v),
            PureValue::U128(v) => bcs::to_bytes(v),
            PureValue::U256(v) => return Ok(v.to_le_bytes::<BYTES_256_OFFSET>().to_vec()),
            PureValue::Bool(v) => bcs::to_bytes(v),
            PureValue::Address(a) => return Ok(address_to_bytes(a)?.to_vec()),
        };
        encoded.map_err(|e| DashError::encode(self.kind().name(), &self.to_string(), e.to_string()))
    }

    pub fn from_bcs_bytes(kind: ArgKind, bytes: &[u8]) -> Result<Self> {
        let value = match kind {
            ArgKind::String => PureValue::String(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::U8 => PureValue::U8(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::U16 => PureValue::U16(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::U32 => PureValue::U32(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::U64 => PureValue::U64(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::U128 => PureValue::U128(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::Bool => PureValue::Bool(bcs::from_bytes(bytes).map_err(|e| bcs_err(kind, e))?),
            ArgKind::U256 => {
                let le_bytes: [u8; BYTES_256_OFFSET] =
                    bytes.try_into().map_err(|_| DashError::DecodeError {
                        type_tag: kind.name().to_string(),
                        reason: format!("expected {} bytes, got {}", BYTES_256_OFFSET, bytes.len()),
                    })?;
                PureValue::U256(U256::from_le_bytes(le_bytes))
            }
            ArgKind::Address => {
                if bytes.len() != ADDRESS_LENGTH {
                    return Err(DashError::DecodeError {
                        type_tag: kind.name().to_string(),
                        reason: format!("expected {} bytes, got {}", ADDRESS_LENGTH, bytes.len()),
                    });
                }
                PureValue::Address(bytes_to_address(bytes))
            }
            ArgKind::Object => {
                return Err(DashError::DecodeError {
                    type_tag: kind.name().to_string(),
                    reason: "object references are not pure values".to_string(),
                })
            }
        };
        Ok(value)
    }

    /// SuiJson form used by `unsafe_moveCall`: 64-bit and wider integers travel as strings.
    pub fn to_sui_json(&self) -> Value {
        match self {
            PureValue::String(s) | PureValue::Address(s) => Value::String(s.clone()),
            PureValue::U8(v) => json!(v),
            PureValue::U16(v) => json!(v),
            PureValue::U32(v) => json!(v),
            PureValue::U64(v) => Value::String(v.to_string()),
            PureValue::U128(v) => Value::String(v.to_string()),
            PureValue::U256(v) => Value::String(v.to_string()),
            PureValue::Bool(v) => Value::Bool(*v),
        }
    }
}

impl fmt::Display for PureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PureValue::String(s) | PureValue::Address(s) => f.write_str(s),
            PureValue::U8(v) => write!(f, "{}", v),
            PureValue::U16(v) => write!(f, "{}", v),
            PureValue::U32(v) => write!(f, "{}", v),
            PureValue::U64(v) => write!(f, "{}", v),
            PureValue::U128(v) => write!(f, "{}", v),
            PureValue::U256(v) => write!(f, "{}", v),
            PureValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl CallArgument {
    pub fn to_sui_json(&self) -> Value {
        match self {
            CallArgument::Pure(pure) => pure.to_sui_json(),
            CallArgument::Object(id) => Value::String(id.clone()),
        }
    }

    /// 給人看的描述，純值附上 base64 的 BCS 位元組
    pub fn describe(&self) -> Result<Value> {
        match self {
            CallArgument::Pure(pure) => Ok(json!({
                "kind": "pure",
                "type": pure.kind().name(),
                "value": pure.to_string(),
                "bcs": BASE64_STANDARD.encode(pure.to_bcs_bytes()?),
            })),
            CallArgument::Object(id) => Ok(json!({
                "kind": "object",
                "objectId": id,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U128_MAX: &str = "340282366920938463463374607431768211455";
    const U256_MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    fn pure(tag: &str, value: &str) -> PureValue {
        match encode_argument(tag, value).unwrap() {
            CallArgument::Pure(p) => p,
            other => panic!("expected pure argument, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_dispatch() {
        assert_eq!(ArgKind::from_tag("string"), ArgKind::String);
        assert_eq!(ArgKind::from_tag("U64"), ArgKind::U64);
        assert_eq!(ArgKind::from_tag("u64"), ArgKind::U64);
        assert_eq!(ArgKind::from_tag("U256"), ArgKind::U256);
        assert_eq!(ArgKind::from_tag("Bool"), ArgKind::Bool);
        assert_eq!(ArgKind::from_tag("address"), ArgKind::Address);
        assert_eq!(ArgKind::from_tag("&seaVault::OwnerCap"), ArgKind::Object);
        assert_eq!(ArgKind::from_tag("&mut seaVault::SeaVault"), ArgKind::Object);
        assert_eq!(ArgKind::from_tag("my_module::MyStruct"), ArgKind::Object);
        assert_eq!(ArgKind::from_tag("unknown"), ArgKind::Object);
        assert_eq!(ArgKind::from_tag("T"), ArgKind::Object);
    }

    #[test]
    fn test_string_argument() {
        let value = pure("string", "Hello World");
        assert_eq!(value, PureValue::String("Hello World".to_string()));
        let bytes = value.to_bcs_bytes().unwrap();
        assert_eq!(bytes[0], 11);
        assert_eq!(&bytes[1..], b"Hello World");
    }

    #[test]
    fn test_fixed_width_integers() {
        assert_eq!(pure("u8", "255"), PureValue::U8(255));
        assert_eq!(pure("u16", "65535"), PureValue::U16(65535));
        assert_eq!(pure("u32", "4294967295"), PureValue::U32(4294967295));
        assert_eq!(pure("u64", "1000000"), PureValue::U64(1_000_000));
        assert_eq!(pure("U64", "1000000"), PureValue::U64(1_000_000));
        assert_eq!(pure("u128", U128_MAX), PureValue::U128(u128::MAX));
        assert_eq!(pure("U256", U256_MAX), PureValue::U256(U256::MAX));

        assert_eq!(pure("u32", "7").to_bcs_bytes().unwrap(), vec![7, 0, 0, 0]);
        assert_eq!(pure("u64", "0x10"), PureValue::U64(16));
        assert_eq!(pure("u8", ""), PureValue::U8(0));
    }

    #[test]
    fn test_integer_errors() {
        assert!(encode_argument("u8", "256").is_err());
        assert!(encode_argument("u64", "18446744073709551616").is_err());
        assert!(encode_argument("u64", "not_a_number").is_err());
        assert!(encode_argument("u16", "-1").is_err());
    }

    #[test]
    fn test_bool_argument() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1", true),
            ("0", false),
            ("TRUE", false),
            ("False", false),
            ("", false),
        ];
        for (input, expected) in cases {
            assert_eq!(pure("bool", input), PureValue::Bool(expected), "input {:?}", input);
        }
        assert_eq!(pure("Bool", "1"), PureValue::Bool(true));
    }

    #[test]
    fn test_address_passes_through() {
        let addr = "0x0000000000000000000000000000000000000001";
        assert_eq!(pure("address", addr), PureValue::Address(addr.to_string()));

        let bytes = pure("Address", "0x2").to_bcs_bytes().unwrap();
        assert_eq!(bytes.len(), ADDRESS_LENGTH);
        assert_eq!(bytes[31], 2);
        assert!(bytes[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_malformed_address_is_an_encode_error() {
        let too_long = format!("0x{}", "1".repeat(65));
        for bad in ["0xa\u{e9}", "0x\u{e9}\u{e9}", "0xzz", "0x", too_long.as_str()] {
            let err = PureValue::Address(bad.to_string()).to_bcs_bytes().unwrap_err();
            assert!(matches!(err, DashError::EncodeError { .. }), "{:?} gave {:?}", bad, err);
        }

        // describe() 走同一條編碼路徑，不可 panic
        assert!(encode_argument("address", "0xa\u{e9}").unwrap().describe().is_err());
    }

    #[test]
    fn test_address_bytes_round_trip() {
        let bytes = address_to_bytes("0xABC").unwrap();
        let text = bytes_to_address(&bytes);
        assert_eq!(text.len(), 2 + ADDRESS_LENGTH * 2);
        assert!(text.ends_with("0abc"));
        assert_eq!(address_to_bytes(&text).unwrap(), bytes);
    }

    #[test]
    fn test_object_references() {
        assert_eq!(
            encode_argument("&seaVault::OwnerCap", "0x123abc").unwrap(),
            CallArgument::Object("0x123abc".to_string())
        );
        assert_eq!(
            encode_argument("&mut seaVault::SeaVault", "0x456def").unwrap(),
            CallArgument::Object("0x456def".to_string())
        );
        assert_eq!(
            encode_argument("my_module::MyStruct", "0x789ghi").unwrap(),
            CallArgument::Object("0x789ghi".to_string())
        );
        assert_eq!(
            encode_argument("vector<u8>", "0xabc").unwrap(),
            CallArgument::Object("0xabc".to_string())
        );
    }

    #[test]
    fn test_u128_max_round_trip_keeps_digits() {
        let value = pure("u128", U128_MAX);
        let bytes = value.to_bcs_bytes().unwrap();
        assert_eq!(bytes.len(), 16);
        let decoded = PureValue::from_bcs_bytes(ArgKind::U128, &bytes).unwrap();
        assert_eq!(decoded.to_string(), U128_MAX);
    }

    #[test]
    fn test_u256_round_trip() {
        let value = pure("u256", U256_MAX);
        let bytes = value.to_bcs_bytes().unwrap();
        assert_eq!(bytes.len(), BYTES_256_OFFSET);
        let decoded = PureValue::from_bcs_bytes(ArgKind::U256, &bytes).unwrap();
        assert_eq!(decoded.to_string(), U256_MAX);
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert!(PureValue::from_bcs_bytes(ArgKind::U64, &[1, 2, 3]).is_err());
        assert!(PureValue::from_bcs_bytes(ArgKind::U256, &[0; 8]).is_err());
        assert!(PureValue::from_bcs_bytes(ArgKind::Object, &[]).is_err());
    }

    #[test]
    fn test_sui_json_rendering() {
        assert_eq!(pure("u8", "5").to_sui_json(), json!(5));
        assert_eq!(pure("u64", "5").to_sui_json(), json!("5"));
        assert_eq!(pure("bool", "1").to_sui_json(), json!(true));
        assert_eq!(
            CallArgument::Object("0x5".to_string()).to_sui_json(),
            json!("0x5")
        );
    }
}
