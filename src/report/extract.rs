//! CSV codec for monthly extracts
//!
//! Column layout, in order:
//! `ID, CodigoTransacao, CodigoProd, NomeProd, QuantidadeProd, ValorTransacao, DataTransacao`.
//! Amounts carry exactly two fraction digits, dates are `DD/MM/YYYY` (UTC).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Money, TransactionRecord};
use crate::store::StoreError;

/// Header row of every extract
pub const HEADER: [&str; 7] = [
    "ID",
    "CodigoTransacao",
    "CodigoProd",
    "NomeProd",
    "QuantidadeProd",
    "ValorTransacao",
    "DataTransacao",
];

const DATE_FORMAT: &str = "%d/%m/%Y";

/// One line of an extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "CodigoTransacao")]
    pub transaction_code: i64,
    #[serde(rename = "CodigoProd")]
    pub product_id: i64,
    #[serde(rename = "NomeProd")]
    pub product_name: String,
    #[serde(rename = "QuantidadeProd")]
    pub quantity: i32,
    #[serde(rename = "ValorTransacao", with = "two_digits")]
    pub amount: Money,
    #[serde(rename = "DataTransacao", with = "day_month_year")]
    pub date: NaiveDate,
}

impl From<&TransactionRecord> for ReportRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            id: record.id,
            transaction_code: record.transaction_code,
            product_id: record.product_id,
            product_name: record.product_name.clone(),
            quantity: record.quantity,
            amount: record.amount,
            date: record.timestamp.date_naive(),
        }
    }
}

/// Encode records as a CSV document, header first.
pub fn write_csv(records: &[TransactionRecord]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(ReportRow::from(record))?;
    }

    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

/// Decode a CSV document produced by [`write_csv`].
pub fn read_csv(bytes: &[u8]) -> Result<Vec<ReportRow>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

mod two_digits {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::domain::Money;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

mod day_month_year {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record(code: i64, amount: rust_decimal::Decimal, name: &str) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            transaction_code: code,
            product_id: 12,
            product_name: name.to_string(),
            quantity: 2,
            amount: Money::new(amount).unwrap(),
            timestamp: Utc.with_ymd_and_hms(2023, 3, 15, 18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_and_formatting() {
        let record = record(1, dec!(10), "Espresso");
        let csv = String::from_utf8(write_csv(&[record.clone()]).unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("ID,CodigoTransacao,CodigoProd,NomeProd,QuantidadeProd,ValorTransacao,DataTransacao")
        );
        assert_eq!(
            lines.next().map(str::to_string),
            Some(format!("{},1,12,Espresso,2,10.00,15/03/2023", record.id))
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_amount_and_date_recovered_exactly() {
        let records = vec![
            record(1, dec!(10.00), "Espresso"),
            record(2, dec!(0.05), "Sugar"),
            record(3, dec!(1234.5), "Beans, 5kg"),
        ];

        let rows = read_csv(&write_csv(&records).unwrap()).unwrap();

        assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row.amount, record.amount);
            assert_eq!(row.date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
            assert_eq!(row.product_name, record.product_name);
            assert_eq!(row.id, record.id);
        }
    }

    #[test]
    fn test_empty_extract_has_header_only() {
        let csv = write_csv(&[]).unwrap();
        assert!(read_csv(&csv).unwrap().is_empty());
        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1);
    }
}
