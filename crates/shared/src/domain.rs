use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CellValueError;

macro_rules! id_newtype {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_newtype!(TableId, "table-");
id_newtype!(RowId, "row-");

impl RowId {
    /// Calendar year shown in the Year cell of this row.
    pub fn default_year(self, current_year: i32) -> i32 {
        current_year + 1 - self.0 as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellName {
    Year,
    January,
    February,
    March,
    Q1,
    April,
    May,
    June,
    Q2,
    July,
    August,
    September,
    Q3,
    October,
    November,
    December,
    Q4,
    #[serde(rename = "YTD")]
    Ytd,
}

impl CellName {
    /// Header order of a row. Flattening for gap analysis walks this order.
    pub const ALL: [CellName; 18] = [
        CellName::Year,
        CellName::January,
        CellName::February,
        CellName::March,
        CellName::Q1,
        CellName::April,
        CellName::May,
        CellName::June,
        CellName::Q2,
        CellName::July,
        CellName::August,
        CellName::September,
        CellName::Q3,
        CellName::October,
        CellName::November,
        CellName::December,
        CellName::Q4,
        CellName::Ytd,
    ];

    pub const INPUT: [CellName; 12] = [
        CellName::January,
        CellName::February,
        CellName::March,
        CellName::April,
        CellName::May,
        CellName::June,
        CellName::July,
        CellName::August,
        CellName::September,
        CellName::October,
        CellName::November,
        CellName::December,
    ];

    pub const DERIVED: [CellName; 6] = [
        CellName::Year,
        CellName::Q1,
        CellName::Q2,
        CellName::Q3,
        CellName::Q4,
        CellName::Ytd,
    ];

    pub fn is_input(self) -> bool {
        !self.is_derived()
    }

    pub fn is_derived(self) -> bool {
        matches!(
            self,
            CellName::Year
                | CellName::Q1
                | CellName::Q2
                | CellName::Q3
                | CellName::Q4
                | CellName::Ytd
        )
    }

    /// Form key of the cell, e.g. `January`.
    pub fn key(self) -> &'static str {
        match self {
            CellName::Year => "Year",
            CellName::January => "January",
            CellName::February => "February",
            CellName::March => "March",
            CellName::Q1 => "Q1",
            CellName::April => "April",
            CellName::May => "May",
            CellName::June => "June",
            CellName::Q2 => "Q2",
            CellName::July => "July",
            CellName::August => "August",
            CellName::September => "September",
            CellName::Q3 => "Q3",
            CellName::October => "October",
            CellName::November => "November",
            CellName::December => "December",
            CellName::Q4 => "Q4",
            CellName::Ytd => "YTD",
        }
    }

    /// Column title shown in the table header.
    pub fn label(self) -> &'static str {
        match self {
            CellName::Year => "Year",
            CellName::January => "Jan",
            CellName::February => "Feb",
            CellName::March => "Mar",
            CellName::Q1 => "Q1",
            CellName::April => "Apr",
            CellName::May => "May",
            CellName::June => "June",
            CellName::Q2 => "Q2",
            CellName::July => "July",
            CellName::August => "Aug",
            CellName::September => "Sep",
            CellName::Q3 => "Q3",
            CellName::October => "Oct",
            CellName::November => "Nov",
            CellName::December => "Dec",
            CellName::Q4 => "Q4",
            CellName::Ytd => "YTD",
        }
    }
}

impl fmt::Display for CellName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CellName {
    type Err = CellValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellName::ALL
            .into_iter()
            .find(|name| name.key() == s)
            .ok_or_else(|| CellValueError::UnknownCell(s.to_string()))
    }
}

/// Raw cell payload as a form host submits it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

/// Content of one cell: empty, or a finite number. Zero is a filled value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<RawCell>", into = "Option<f64>")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
}

impl CellValue {
    pub fn is_filled(self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    pub fn number(self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(n),
        }
    }

    /// Arithmetic view of the cell; empty cells count as zero.
    pub fn or_zero(self) -> f64 {
        self.number().unwrap_or(0.0)
    }

    pub fn parse(raw: &str) -> Result<Self, CellValueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(CellValue::Empty);
        }
        let n: f64 = trimmed
            .parse()
            .map_err(|_| CellValueError::NotNumeric(raw.to_string()))?;
        CellValue::try_from_f64(n)
    }

    fn try_from_f64(n: f64) -> Result<Self, CellValueError> {
        if n.is_finite() {
            Ok(CellValue::Number(n))
        } else {
            Err(CellValueError::NotFinite)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl TryFrom<Option<RawCell>> for CellValue {
    type Error = CellValueError;

    fn try_from(value: Option<RawCell>) -> Result<Self, Self::Error> {
        match value {
            None => Ok(CellValue::Empty),
            Some(RawCell::Number(n)) => CellValue::try_from_f64(n),
            Some(RawCell::Text(text)) => CellValue::parse(&text),
        }
    }
}

impl From<CellValue> for Option<f64> {
    fn from(value: CellValue) -> Self {
        value.number()
    }
}

/// Shape of a form session: how many tables, and how many years per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub table_count: u32,
    pub row_count: u32,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            table_count: 1,
            row_count: 1,
        }
    }
}

impl FormState {
    pub fn table_ids(self) -> impl Iterator<Item = TableId> {
        (1..=self.table_count).map(TableId)
    }

    /// Rows in display order, oldest year first.
    pub fn row_ids(self) -> impl Iterator<Item = RowId> {
        (1..=self.row_count).rev().map(RowId)
    }
}

pub type RowValues = BTreeMap<CellName, CellValue>;
pub type TableValues = BTreeMap<RowId, RowValues>;

/// Values of every table in a form, `table -> row -> cell -> value`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
    tables: BTreeMap<TableId, TableValues>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, table: TableId) -> Option<&TableValues> {
        self.tables.get(&table)
    }

    pub fn row(&self, table: TableId, row: RowId) -> Option<&RowValues> {
        self.table(table)?.get(&row)
    }

    /// Missing tables, rows or cells read as empty.
    pub fn cell(&self, table: TableId, row: RowId, name: CellName) -> CellValue {
        self.row(table, row)
            .and_then(|cells| cells.get(&name).copied())
            .unwrap_or_default()
    }

    pub fn table_mut(&mut self, table: TableId) -> Option<&mut TableValues> {
        self.tables.get_mut(&table)
    }

    pub fn set_cell(&mut self, table: TableId, row: RowId, name: CellName, value: CellValue) {
        self.tables
            .entry(table)
            .or_default()
            .entry(row)
            .or_default()
            .insert(name, value);
    }

    pub fn table_ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.keys().copied()
    }

    pub fn row_ids(&self, table: TableId) -> Vec<RowId> {
        self.table(table)
            .map(|rows| rows.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drops tables and rows outside `state` and adds the missing ones, so
    /// every table holds every row of the session.
    pub fn conform_to(&mut self, state: FormState) {
        self.tables
            .retain(|table, _| (1..=state.table_count).contains(&table.0));
        for table in state.table_ids() {
            let rows = self.tables.entry(table).or_default();
            rows.retain(|row, _| (1..=state.row_count).contains(&row.0));
            for row in state.row_ids() {
                rows.entry(row).or_default();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
