use crate::core::objects::OwnedObjectRow;
use crate::core::wallet::CoinBalanceRow;
use crate::domain::model::{Parameter, TypeParameter};
use crate::utils::error::{DashError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// 可以表格形式輸出的資料列
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for CoinBalanceRow {
    fn headers() -> &'static [&'static str] {
        &["SYMBOL", "BALANCE", "COIN TYPE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.balance.clone(),
            self.coin_type.clone(),
        ]
    }
}

impl TableRow for OwnedObjectRow {
    fn headers() -> &'static [&'static str] {
        &["OBJECT ID", "TYPE", "VERSION"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.object_id.clone(),
            self.object_type.clone(),
            self.version.clone(),
        ]
    }
}

impl TableRow for Parameter {
    fn headers() -> &'static [&'static str] {
        &["ID", "TYPE", "VALUE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.type_tag.clone(), self.value.clone()]
    }
}

impl TableRow for TypeParameter {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "VALUE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.value.clone()]
    }
}

pub fn render<T: Serialize + TableRow>(rows: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(T::headers(), rows.iter().map(|r| r.cells()))),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => render_csv(rows),
    }
}

/// 單欄名稱列表（模組、函式）
pub fn render_list(header: &str, items: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(items.join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([header])?;
            for item in items {
                writer.write_record([item])?;
            }
            finish_csv(writer)
        }
    }
}

fn render_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| DashError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| DashError::ValidationError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// 依欄寬對齊的純文字表格
pub fn render_table<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(headers.iter().map(|h| h.to_string()).collect())];
    lines.extend(rows.into_iter().map(format_line));
    lines.join("\n")
}
