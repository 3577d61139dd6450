//! Untyped kline table as parsed from archive CSV, and the column sets that
//! drive parsing and normalization.

/// Ordered columns of a raw archive row.
pub const RAW_COLUMNS: [&str; 12] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "close_time",
    "quote_asset_volume",
    "trades",
    "taker_buy_base",
    "taker_buy_quote",
    "ignore",
];

/// Columns retained by normalization.
pub const TARGET_COLUMNS: [&str; 11] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "close_time",
    "quote_asset_volume",
    "trades",
    "taker_buy_base",
    "taker_buy_quote",
];

/// Integer-epoch columns converted to timestamps.
pub const DATETIME_COLUMNS: [&str; 2] = ["timestamp", "close_time"];

/// Price columns: zero means missing, gaps are forward- then back-filled.
pub const PRICE_COLUMNS: [&str; 4] = ["open", "high", "low", "close"];

/// Market-activity columns: gaps are filled with zero.
pub const MARKET_ACTIVITY_COLUMNS: [&str; 5] = [
    "volume",
    "quote_asset_volume",
    "trades",
    "taker_buy_base",
    "taker_buy_quote",
];

/// One named column of raw cells. `None` is an empty or absent field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    /// Column name.
    pub name: String,
    /// Cell values, one per row.
    pub values: Vec<Option<String>>,
}

/// A column-oriented table of untyped cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    columns: Vec<RawColumn>,
}

impl RawTable {
    /// Creates a table from the given columns.
    ///
    /// Columns shorter than the longest one are padded with `None`.
    #[must_use]
    pub fn new(mut columns: Vec<RawColumn>) -> Self {
        let rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(rows, None);
        }
        Self { columns }
    }

    /// Builds a table from row-oriented cells.
    ///
    /// Rows shorter than `names` are padded with `None`; extra cells are
    /// dropped.
    #[must_use]
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Option<String>>>) -> Self {
        let mut columns: Vec<RawColumn> = names
            .iter()
            .map(|name| RawColumn {
                name: (*name).to_string(),
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.values.push(cells.next().flatten());
            }
        }

        Self { columns }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the cells of a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Appends a column, replacing any column with the same name.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        let name = name.into();
        self.columns.retain(|c| c.name != name);
        self.columns.push(RawColumn { name, values });
        Self::new(self.columns)
    }

    /// Removes a column by name, returning its cells.
    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Option<String>>> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx).values)
    }

    /// Returns the required columns that are absent from this table.
    #[must_use]
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| (*name).to_string())
            .collect()
    }
}
