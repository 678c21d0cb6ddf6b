mod budget;
mod source;

pub use budget::BudgetedReader;
pub use source::TiffSource;
