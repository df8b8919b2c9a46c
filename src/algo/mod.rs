/// Tabular methods over dense state-action value tables
pub mod tabular;
