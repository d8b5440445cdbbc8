use crate::utils::error::{DashError, Result};

/// Fractional digits shown for coin balances.
pub const DISPLAY_PRECISION: usize = 6;

/// 將整數餘額依小數位數換算成顯示字串（四捨五入到 `precision` 位）。
///
/// 全程以十進位字串運算，不經過浮點數，超大餘額也不會失去精度。
pub fn format_units(raw: &str, decimals: u8, precision: usize) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DashError::validation(format!(
            "balance must be a non-negative integer, got {:?}",
            raw
        )));
    }

    let decimals = decimals as usize;
    let padded = format!("{:0>width$}", raw, width = decimals + 1);
    let split = padded.len() - decimals;
    let (int_part, frac_part) = padded.split_at(split);

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();

    if decimals <= precision {
        digits.extend(frac_part.bytes().map(|b| b - b'0'));
        digits.extend(std::iter::repeat(0).take(precision - decimals));
    } else {
        digits.extend(frac_part[..precision].bytes().map(|b| b - b'0'));
        let round_up = frac_part.as_bytes()[precision] >= b'5';
        if round_up && increment(&mut digits) {
            digits.insert(0, 1);
        }
    }

    // 進位可能讓整數部分多一位，小數永遠是最後 precision 位
    let (int_digits, frac_digits) = digits.split_at(digits.len() - precision);

    let mut out: String = int_digits.iter().map(|d| (b'0' + d) as char).collect();
    let trimmed = out.trim_start_matches('0');
    out = if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    };

    if precision > 0 {
        out.push('.');
        out.extend(frac_digits.iter().map(|d| (b'0' + d) as char));
    }
    Ok(out)
}

/// Adds one to a big-endian decimal digit vector; returns true on overflow.
fn increment(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return false;
        }
    }
    true
}

pub fn format_balance(raw: &str, decimals: u8) -> Result<String> {
    format_units(raw, decimals, DISPLAY_PRECISION)
}
