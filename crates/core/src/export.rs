//! CSV export of transactions in Brazilian locale.
//!
//! `;` separates fields so that `,` can serve as the decimal separator;
//! dates are written `dd/mm/yyyy`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use financeflow_shared::AppError;

use crate::transaction::{TransactionKind, TransactionStatus};

/// Column titles, in order.
pub const EXPORT_HEADER: [&str; 7] = [
    "Data",
    "Descrição",
    "Tipo",
    "Valor",
    "Conta",
    "Categoria",
    "Status",
];

/// CSV export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The buffered output could not be finalised.
    #[error("failed to finish CSV output: {0}")]
    Finish(String),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// One exported transaction, with names already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Booking date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Direction.
    pub kind: TransactionKind,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Source account name.
    pub account_name: String,
    /// Category name, empty when uncategorised.
    pub category_name: Option<String>,
    /// Lifecycle state.
    pub status: TransactionStatus,
}

/// Formats an amount with two decimals and a decimal comma.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2)).replace('.', ",")
}

/// Writes the header and one line per row.
///
/// # Errors
///
/// Returns `ExportError` if the CSV writer fails.
pub fn write_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for row in rows {
        writer.write_record([
            row.date.format("%d/%m/%Y").to_string().as_str(),
            row.description.as_str(),
            row.kind.label_pt(),
            format_amount(row.amount).as_str(),
            row.account_name.as_str(),
            row.category_name.as_deref().unwrap_or_default(),
            row.status.label_pt(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Finish(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Finish(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::date;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1234.5), "1234,50")]
    #[case(dec!(0.01), "0,01")]
    #[case(dec!(100), "100,00")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_write_csv_uses_brazilian_layout() {
        let rows = vec![
            ExportRow {
                date: date(2024, 3, 9),
                description: "Mercado; feira".to_string(),
                kind: TransactionKind::Expense,
                amount: dec!(87.9),
                account_name: "Nubank".to_string(),
                category_name: Some("Alimentação".to_string()),
                status: TransactionStatus::Completed,
            },
            ExportRow {
                date: date(2024, 3, 10),
                description: "Reserva".to_string(),
                kind: TransactionKind::Transfer,
                amount: dec!(500),
                account_name: "Itaú".to_string(),
                category_name: None,
                status: TransactionStatus::Pending,
            },
        ];

        let out = write_csv(&rows).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Data;Descrição;Tipo;Valor;Conta;Categoria;Status");
        assert_eq!(
            lines[1],
            "09/03/2024;\"Mercado; feira\";Despesa;87,90;Nubank;Alimentação;Concluída"
        );
        assert_eq!(lines[2], "10/03/2024;Reserva;Transferência;500,00;Itaú;;Pendente");
    }

    #[test]
    fn test_write_csv_empty_has_header_only() {
        assert_eq!(write_csv(&[]).unwrap().lines().count(), 1);
    }
}
