use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Portfolio analysis requires at least one known asset")]
    EmptyPortfolio,
}
