use chrono::Datelike;
use serde::Serialize;

use super::{PeriodSummary, aggregate};
use crate::core::{PeriodKey, Result, TaxType};
use crate::selector::{DocumentSelector, DocumentSource};

/// Summary of one masa pajak inside a [`YearOverview`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: u32,
    pub summary: PeriodSummary,
    pub document_count: usize,
}

/// Twelve monthly summaries and the year-to-date total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOverview {
    pub company: String,
    pub year: i32,
    pub tax_type: TaxType,
    pub months: Vec<MonthSummary>,
    pub total: PeriodSummary,
}

impl YearOverview {
    /// Months with at least one selected document.
    pub fn active_months(&self) -> impl Iterator<Item = &MonthSummary> {
        self.months.iter().filter(|m| m.document_count > 0)
    }
}

/// Build the monthly breakdown for `company`/`year`/`tax_type`.
///
/// Selects the whole year once and buckets by posting month, so the total
/// always equals the sum of the months.
pub fn year_overview<S: DocumentSource>(
    selector: &DocumentSelector<S>,
    company: &str,
    year: i32,
    tax_type: TaxType,
) -> Result<YearOverview> {
    let key = PeriodKey::yearly(company, year, tax_type);
    let documents = selector.select(&key)?;

    let months = (1..=12)
        .map(|month| {
            let in_month: Vec<_> = documents
                .iter()
                .filter(|d| d.posting_date.month() == month)
                .cloned()
                .collect();
            Ok(MonthSummary {
                month,
                summary: aggregate(&in_month, tax_type)?,
                document_count: in_month.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(YearOverview {
        company: key.company,
        year,
        tax_type,
        months,
        total: aggregate(&documents, tax_type)?,
    })
}
