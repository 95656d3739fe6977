//! Report Assembler: profitability rows into titled, totalled tables, and
//! the `.xlsx` renderer that writes them.

pub mod assemble;
pub mod error;
pub mod layout;
pub mod table;
pub mod xlsx;

pub use assemble::{assemble, fbo_stock_report, FboStockRow};
pub use error::ReportError;
pub use layout::{Field, ReportKind};
pub use table::{Cell, Report, Sheet};
pub use xlsx::write_report;
