//! Google Sheets v4 values API client.

mod token;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::{Grid, TableStore};

pub use token::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource};

/// Default API endpoint.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Default number of leading columns read from a worksheet.
pub const DEFAULT_COLUMNS: usize = 6;

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<serde_json::Value>>,
}

/// A worksheet store backed by one Google spreadsheet.
pub struct GoogleSheetsStore {
    client: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    columns: usize,
    numeric_columns: Vec<usize>,
    tokens: Arc<dyn TokenSource>,
}

impl GoogleSheetsStore {
    /// Create a client for `spreadsheet_id`, authorizing with `tokens`.
    pub fn new(spreadsheet_id: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            columns: DEFAULT_COLUMNS,
            numeric_columns: Vec::new(),
            tokens,
        }
    }

    /// Point the client at another endpoint.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Limit reads to the first `columns` columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Send whole-number cells in these 0-based columns as numbers.
    ///
    /// Every other cell is written as text. Values are stored `RAW`, so
    /// the sheet never parses them as formulas or dates.
    pub fn with_numeric_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.numeric_columns = columns.into_iter().collect();
        self
    }

    fn read_range(&self, worksheet: &str) -> String {
        format!("{worksheet}!A:{}", column_letter(self.columns))
    }

    fn values_url(&self, target: &str) -> Result<reqwest::Url> {
        let base = &self.api_base;
        let id = self.spreadsheet_id.as_str();
        let mut url = reqwest::Url::parse(base)
            .map_err(|e| StoreError::config(format!("bad api_base {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::config(format!("bad api_base {base}")))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", id, "values", target]);
        Ok(url)
    }

    fn to_values(&self, grid: &Grid) -> Vec<Vec<serde_json::Value>> {
        grid.iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, cell)| self.cell_value(col, cell))
                    .collect()
            })
            .collect()
    }

    fn cell_value(&self, col: usize, cell: &str) -> serde_json::Value {
        if self.numeric_columns.contains(&col)
            && let Ok(n) = cell.parse::<u64>()
            && n.to_string() == cell
        {
            return serde_json::Value::from(n);
        }
        serde_json::Value::String(cell.to_string())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl TableStore for GoogleSheetsStore {
    async fn read(&self, worksheet: &str) -> Result<Grid> {
        let range = self.read_range(worksheet);
        log::debug!("Reading {range} from spreadsheet {}", self.spreadsheet_id);

        let token = self.tokens.token().await?;
        let response = self
            .client
            .get(self.values_url(&range)?)
            .bearer_auth(token)
            .send()
            .await?;
        let body: ValueRange = Self::check(response).await?.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write(&self, worksheet: &str, grid: &Grid) -> Result<()> {
        log::debug!(
            "Overwriting {worksheet} in spreadsheet {} with {} rows",
            self.spreadsheet_id,
            grid.len()
        );
        let token = self.tokens.token().await?;

        let response = self
            .client
            .post(self.values_url(&format!("{worksheet}:clear"))?)
            .bearer_auth(&token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::check(response).await?;

        let range = format!("{worksheet}!A1");
        let response = self
            .client
            .put(self.values_url(&range)?)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&token)
            .json(&ValueRangeBody {
                range: &range,
                major_dimension: "ROWS",
                values: self.to_values(grid),
            })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Spreadsheet column name for a 1-based index (1 = A, 27 = AA).
fn column_letter(mut index: usize) -> String {
    let mut name = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        name.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
