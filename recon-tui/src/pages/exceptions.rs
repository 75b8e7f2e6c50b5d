use recon_table::{Alignment, Color, Column, HierarchicalTable, Row, TableError};

use super::{Page, Summary};
use crate::config::Settings;
use crate::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExceptionType {
    NotMatchQty,
    NearMatchQty,
    NotMatchInternal,
    NotMatchExternal,
}

impl ExceptionType {
    fn label(self) -> &'static str {
        match self {
            ExceptionType::NotMatchQty => "Quantity Mismatch",
            ExceptionType::NearMatchQty => "Near Match",
            ExceptionType::NotMatchInternal => "Missing Internal",
            ExceptionType::NotMatchExternal => "Missing External",
        }
    }

    /// Row style hint; the dashboard theme maps it to the accent bar colour.
    fn style_hint(self) -> &'static str {
        match self {
            ExceptionType::NotMatchQty => "border-l-exception-not-match-qty",
            ExceptionType::NearMatchQty => "border-l-exception-near-match-qty",
            ExceptionType::NotMatchInternal => "border-l-exception-not-match-internal",
            ExceptionType::NotMatchExternal => "border-l-exception-not-match-external",
        }
    }

    fn color(self) -> &'static str {
        match self {
            ExceptionType::NotMatchQty => "exception-not-match-qty",
            ExceptionType::NearMatchQty => "exception-near-match-qty",
            ExceptionType::NotMatchInternal => "exception-not-match-internal",
            ExceptionType::NotMatchExternal => "exception-not-match-external",
        }
    }
}

/// Theme colours for exception badges and row hints.
pub const STYLE_HINTS: [(&str, Color); 8] = [
    ("exception-not-match-qty", NOT_MATCH_QTY),
    ("exception-near-match-qty", NEAR_MATCH_QTY),
    ("exception-not-match-internal", NOT_MATCH_INTERNAL),
    ("exception-not-match-external", NOT_MATCH_EXTERNAL),
    ("border-l-exception-not-match-qty", NOT_MATCH_QTY),
    ("border-l-exception-near-match-qty", NEAR_MATCH_QTY),
    ("border-l-exception-not-match-internal", NOT_MATCH_INTERNAL),
    ("border-l-exception-not-match-external", NOT_MATCH_EXTERNAL),
];

const NOT_MATCH_QTY: Color = Color::oklch(0.63, 0.21, 25.0);
const NEAR_MATCH_QTY: Color = Color::oklch(0.80, 0.16, 85.0);
const NOT_MATCH_INTERNAL: Color = Color::oklch(0.62, 0.19, 300.0);
const NOT_MATCH_EXTERNAL: Color = Color::oklch(0.65, 0.15, 230.0);

struct Exception {
    id: &'static str,
    cusip: &'static str,
    security: &'static str,
    fund: &'static str,
    dealer: &'static str,
    internal: f64,
    external: f64,
    variance: f64,
    kind: ExceptionType,
    last_updated: &'static str,
    lots: &'static [Exception],
}

const LOTS_1: [Exception; 2] = [
    Exception {
        id: "1a",
        cusip: "912828XM5",
        security: "US Treasury Note 2.5% 2027 - Lot A",
        fund: "Fund A1",
        dealer: "Goldman Sachs",
        internal: 500_000.0,
        external: 475_000.0,
        variance: -0.05,
        kind: ExceptionType::NotMatchQty,
        last_updated: "2024-01-15",
        lots: &[],
    },
    Exception {
        id: "1b",
        cusip: "912828XM5",
        security: "US Treasury Note 2.5% 2027 - Lot B",
        fund: "Fund A1",
        dealer: "Goldman Sachs",
        internal: 500_000.0,
        external: 475_000.0,
        variance: -0.05,
        kind: ExceptionType::NotMatchQty,
        last_updated: "2024-01-15",
        lots: &[],
    },
];

const EXCEPTIONS: [Exception; 4] = [
    Exception {
        id: "1",
        cusip: "912828XM5",
        security: "US Treasury Note 2.5% 2027",
        fund: "Fund A1",
        dealer: "Goldman Sachs",
        internal: 1_000_000.0,
        external: 950_000.0,
        variance: -0.05,
        kind: ExceptionType::NotMatchQty,
        last_updated: "2024-01-15",
        lots: &LOTS_1,
    },
    Exception {
        id: "2",
        cusip: "037833100",
        security: "Apple Inc Common Stock",
        fund: "Fund B2",
        dealer: "JP Morgan",
        internal: 750_000.0,
        external: 770_000.0,
        variance: 0.027,
        kind: ExceptionType::NearMatchQty,
        last_updated: "2024-01-15",
        lots: &[],
    },
    Exception {
        id: "3",
        cusip: "594918104",
        security: "Microsoft Corp Common Stock",
        fund: "Fund C3",
        dealer: "Morgan Stanley",
        internal: 0.0,
        external: 500_000.0,
        variance: 1.0,
        kind: ExceptionType::NotMatchInternal,
        last_updated: "2024-01-14",
        lots: &[],
    },
    Exception {
        id: "4",
        cusip: "79466L302",
        security: "Salesforce Inc Common Stock",
        fund: "Fund D4",
        dealer: "Merrill Lynch",
        internal: 300_000.0,
        external: 0.0,
        variance: -1.0,
        kind: ExceptionType::NotMatchExternal,
        last_updated: "2024-01-14",
        lots: &[],
    },
];

impl Exception {
    /// Fields shared by exceptions and their lots.
    fn base_row(&self) -> Row {
        Row::new(self.id)
            .field("cusip", self.cusip)
            .field("security", self.security)
            .field("fund", self.fund)
            .field("dealer", self.dealer)
            .field("internalPosition", format::currency(self.internal))
            .field("externalPosition", format::currency(self.external))
            .field("variance", format::variance(self.variance))
            .field("exceptionType", format::badge(self.kind.label(), self.kind.color()))
            .field("lastUpdated", self.last_updated)
    }

    fn row(&self) -> Row {
        let row = self.base_row().style_hint(self.kind.style_hint());
        if self.lots.is_empty() {
            row
        } else {
            row.children(self.lots.iter().map(Exception::base_row).collect())
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("cusip", "CUSIP"),
        Column::new("security", "Security"),
        Column::new("fund", "Fund"),
        Column::new("dealer", "Dealer"),
        Column::new("internalPosition", "Internal Position").align(Alignment::Right),
        Column::new("externalPosition", "External Position").align(Alignment::Right),
        Column::new("variance", "Variance").align(Alignment::Right),
        Column::new("exceptionType", "Exception Type"),
        Column::new("lastUpdated", "Last Updated"),
    ]
}

pub fn page(settings: &Settings) -> Result<Page, TableError> {
    let rows = EXCEPTIONS.iter().map(Exception::row).collect();
    let table = HierarchicalTable::new(columns(), rows)?.with_options(
        settings.table_options("Search exceptions by CUSIP, security, fund, or dealer..."),
    );
    let summary = Summary {
        total: "Total Exceptions",
        tally: "exceptionType",
        rate: None,
    };
    Ok(Page::new("Exceptions", table).with_summary(summary))
}
