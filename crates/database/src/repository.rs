use crate::DbError;
use chrono::NaiveDate;
use core_types::{AssetDetail, AssetProfile, AssetQuote, PricePoint};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;

/// The `MarketRepository` provides a high-level, application-specific
/// interface to the asset store. It encapsulates all SQL queries and data
/// access logic.
#[derive(Debug, Clone)]
pub struct MarketRepository {
    pool: PgPool,
}

/// An asset row joined with its latest price, as fetched from the database.
/// NUMERIC columns come back as `Decimal` and are converted to `f64` at this
/// boundary; price fields stay `None` when no price row exists yet.
#[derive(FromRow, Debug, Clone)]
struct AssetQuoteRow {
    symbol: String,
    name: String,
    sector: String,
    industry: String,
    market_cap: i64,
    current_price: Option<Decimal>,
    change: Option<Decimal>,
    change_percent: Option<Decimal>,
}

impl AssetQuoteRow {
    fn into_quote(self) -> AssetQuote {
        AssetQuote {
            symbol: self.symbol,
            name: self.name,
            sector: self.sector,
            industry: self.industry,
            market_cap: self.market_cap,
            current_price: self.current_price.and_then(|d| d.to_f64()),
            change: self.change.and_then(|d| d.to_f64()),
            change_percent: self.change_percent.and_then(|d| d.to_f64()),
        }
    }
}

#[derive(FromRow, Debug, Clone)]
struct PriceRow {
    date: NaiveDate,
    close_price: Decimal,
    volume: i64,
}

const LATEST_QUOTE_SELECT: &str = r#"
    SELECT
        a.symbol,
        a.name,
        a.sector,
        a.industry,
        a.market_cap,
        p.close_price AS current_price,
        p.close_price - p.open_price AS change,
        CASE
            WHEN p.open_price > 0 THEN
                ROUND((p.close_price - p.open_price) / p.open_price * 100, 2)
            ELSE 0
        END AS change_percent
    FROM assets a
    LEFT JOIN asset_prices p ON p.symbol = a.symbol
        AND p.date = (
            SELECT MAX(date) FROM asset_prices p2
            WHERE p2.symbol = a.symbol
        )
"#;

impl MarketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A cheap liveness probe for health endpoints.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Fetches every asset with its latest quote, ordered by symbol.
    pub async fn list_assets(&self) -> Result<Vec<AssetQuote>, DbError> {
        let sql = format!("{LATEST_QUOTE_SELECT} ORDER BY a.symbol");
        let rows = sqlx::query_as::<_, AssetQuoteRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AssetQuoteRow::into_quote).collect())
    }

    /// Fetches one asset's profile and latest quote, or `None` when the
    /// symbol is unknown.
    pub async fn get_asset(&self, symbol: &str) -> Result<Option<AssetDetail>, DbError> {
        let sql = format!("{LATEST_QUOTE_SELECT} WHERE a.symbol = $1");
        let row = sqlx::query_as::<_, AssetQuoteRow>(&sql)
            .bind(symbol)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| {
            let quote = r.into_quote();
            AssetDetail {
                profile: quote.profile(),
                current_price: quote.current_price,
                change: quote.change,
                change_percent: quote.change_percent,
            }
        }))
    }

    /// Fetches the trailing `days` of closing prices, oldest first. May be
    /// empty or shorter than requested; the analytics layer handles short
    /// series.
    pub async fn price_history(&self, symbol: &str, days: i32) -> Result<Vec<f64>, DbError> {
        let closes = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT close_price
            FROM asset_prices
            WHERE symbol = $1 AND date >= CURRENT_DATE - $2
            ORDER BY date ASC
            "#,
        )
        .bind(symbol)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(closes
            .into_iter()
            .map(|d| d.to_f64().unwrap_or_default())
            .collect())
    }

    /// Fetches the most recent price rows, newest first.
    pub async fn recent_prices(&self, symbol: &str, limit: i64) -> Result<Vec<PricePoint>, DbError> {
        let rows = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT date, close_price, volume
            FROM asset_prices
            WHERE symbol = $1
            ORDER BY date DESC
            LIMIT $2
            "#,
        )
        .bind(symbol)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PricePoint {
                date: r.date,
                close_price: r.close_price.to_f64().unwrap_or_default(),
                volume: r.volume,
            })
            .collect())
    }

    /// Inserts or updates an asset's master data. Used by the seed command.
    pub async fn upsert_asset(&self, profile: &AssetProfile) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO assets (symbol, name, sector, industry, market_cap)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (symbol) DO UPDATE SET
                name = EXCLUDED.name,
                sector = EXCLUDED.sector,
                industry = EXCLUDED.industry,
                market_cap = EXCLUDED.market_cap
            "#,
        )
        .bind(&profile.symbol)
        .bind(&profile.name)
        .bind(&profile.sector)
        .bind(&profile.industry)
        .bind(profile.market_cap)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts one daily price row, overwriting any existing row for the
    /// same (symbol, date).
    pub async fn insert_price(
        &self,
        symbol: &str,
        date: NaiveDate,
        open_price: f64,
        close_price: f64,
        volume: i64,
    ) -> Result<(), DbError> {
        let open = Decimal::from_f64(open_price)
            .ok_or_else(|| DbError::InvalidValue(format!("open_price {open_price}")))?;
        let close = Decimal::from_f64(close_price)
            .ok_or_else(|| DbError::InvalidValue(format!("close_price {close_price}")))?;

        sqlx::query(
            r#"
            INSERT INTO asset_prices (symbol, date, open_price, close_price, volume)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (symbol, date) DO UPDATE SET
                open_price = EXCLUDED.open_price,
                close_price = EXCLUDED.close_price,
                volume = EXCLUDED.volume
            "#,
        )
        .bind(symbol)
        .bind(date)
        .bind(open)
        .bind(close)
        .bind(volume)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
