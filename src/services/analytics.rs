use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::Result;

/// Rollup window selectable from the dashboard. Unrecognized values fall
/// back to a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl Period {
    pub fn parse(s: &str) -> Self {
        match s {
            "24h" => Self::Last24Hours,
            "30d" => Self::Last30Days,
            _ => Self::Last7Days,
        }
    }

    pub fn start_from(self, end: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Last24Hours => end - Duration::hours(24),
            Self::Last7Days => end - Duration::days(7),
            Self::Last30Days => end - Duration::days(30),
        }
    }
}

/// Headline counters for the admin dashboard
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Stats {
    pub total_revenue: Decimal,
    pub total_transactions: i64,
    pub pending_transactions: i64,
    pub today_transactions: i64,
}

pub async fn stats(pool: &PgPool) -> Result<Stats> {
    let today_start = Utc::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();

    let stats = sqlx::query_as::<_, Stats>(
        r#"
        SELECT
            COALESCE(SUM(amount) FILTER (WHERE status = 'success'), 0) AS total_revenue,
            COUNT(*) AS total_transactions,
            COUNT(*) FILTER (WHERE status = 'pending') AS pending_transactions,
            COUNT(*) FILTER (WHERE created_at >= $1) AS today_transactions
        FROM transactions
        "#,
    )
    .bind(today_start)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub transactions: i64,
    pub revenue: Decimal,
}

/// Windowed rollup over the ledger
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_revenue: Decimal,
    pub total_transactions: i64,
    pub successful_transactions: i64,
    pub failed_transactions: i64,
    pub pending_transactions: i64,
    pub average_transaction_value: Decimal,
    pub daily_stats: Vec<DailyStat>,
}

#[derive(Debug, FromRow)]
struct SummaryTotals {
    total_revenue: Decimal,
    total_transactions: i64,
    successful_transactions: i64,
    failed_transactions: i64,
    pending_transactions: i64,
}

/// Pure reads; revenue counts success-status amounts only, and the average
/// is defined as zero when nothing succeeded.
pub async fn summarize(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Summary> {
    let totals = sqlx::query_as::<_, SummaryTotals>(
        r#"
        SELECT
            COALESCE(SUM(amount) FILTER (WHERE status = 'success'), 0) AS total_revenue,
            COUNT(*) AS total_transactions,
            COUNT(*) FILTER (WHERE status = 'success') AS successful_transactions,
            COUNT(*) FILTER (WHERE status = 'failed') AS failed_transactions,
            COUNT(*) FILTER (WHERE status = 'pending') AS pending_transactions
        FROM transactions
        WHERE created_at >= $1 AND created_at <= $2
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let daily_stats = sqlx::query_as::<_, DailyStat>(
        r#"
        SELECT
            created_at::date AS date,
            COUNT(*) AS transactions,
            COALESCE(SUM(amount) FILTER (WHERE status = 'success'), 0) AS revenue
        FROM transactions
        WHERE created_at >= $1 AND created_at <= $2
        GROUP BY created_at::date
        ORDER BY created_at::date
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(Summary {
        total_revenue: totals.total_revenue,
        total_transactions: totals.total_transactions,
        successful_transactions: totals.successful_transactions,
        failed_transactions: totals.failed_transactions,
        pending_transactions: totals.pending_transactions,
        average_transaction_value: average_success_value(
            totals.total_revenue,
            totals.successful_transactions,
        ),
        daily_stats,
    })
}

/// Average successful-transaction value, two decimal places; zero (not an
/// error) when nothing succeeded in the window.
fn average_success_value(revenue: Decimal, success_count: i64) -> Decimal {
    if success_count > 0 {
        (revenue / Decimal::from(success_count)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!(Period::parse("24h"), Period::Last24Hours);
        assert_eq!(Period::parse("7d"), Period::Last7Days);
        assert_eq!(Period::parse("30d"), Period::Last30Days);
        // Junk defaults to a week
        assert_eq!(Period::parse("90d"), Period::Last7Days);
        assert_eq!(Period::parse(""), Period::Last7Days);
    }

    #[test]
    fn test_period_window() {
        let end = Utc::now();

        assert_eq!(Period::Last24Hours.start_from(end), end - Duration::hours(24));
        assert_eq!(Period::Last7Days.start_from(end), end - Duration::days(7));
        assert_eq!(Period::Last30Days.start_from(end), end - Duration::days(30));
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        assert_eq!(average_success_value(dec("100.00"), 3), dec("33.33"));
        assert_eq!(average_success_value(dec("200.00"), 2), dec("100.00"));
    }

    #[test]
    fn test_average_with_no_successes_is_zero() {
        assert_eq!(average_success_value(Decimal::ZERO, 0), Decimal::ZERO);
        // A nonzero revenue with zero count cannot happen, but the guard
        // still must not divide
        assert_eq!(average_success_value(dec("10.00"), 0), Decimal::ZERO);
    }
}
