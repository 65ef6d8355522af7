use chrono::Datelike;
use serde::Serialize;

use crate::models::transaction::{Transaction, TransactionStatus};

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    pub rejected: u64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub transactions: StatusCounts,
    /// Revenue and nights only count confirmed bookings.
    pub confirmed_revenue: f64,
    pub confirmed_nights: u64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub revenue: f64,
    pub bookings: u64,
}

pub struct ReportService;

impl ReportService {
    pub fn revenue_summary(transactions: &[Transaction]) -> RevenueSummary {
        let mut counts = StatusCounts::default();
        let mut confirmed_revenue = 0.0;
        let mut confirmed_nights = 0u64;

        for tx in transactions {
            match tx.status {
                TransactionStatus::Pending => counts.pending += 1,
                TransactionStatus::Confirmed => {
                    counts.confirmed += 1;
                    confirmed_revenue += tx.total_price;
                    confirmed_nights += tx.nights as u64;
                }
                TransactionStatus::Cancelled => counts.cancelled += 1,
                TransactionStatus::Rejected => counts.rejected += 1,
            }
        }

        RevenueSummary {
            transactions: counts,
            confirmed_revenue,
            confirmed_nights,
        }
    }

    /// Confirmed revenue bucketed by check-in month. Always returns twelve
    /// buckets so the dashboard renders empty months too.
    pub fn monthly_revenue(transactions: &[Transaction], year: i32) -> Vec<MonthlyRevenue> {
        let mut months: Vec<MonthlyRevenue> = (1..=12)
            .map(|month| MonthlyRevenue {
                month,
                revenue: 0.0,
                bookings: 0,
            })
            .collect();

        for tx in transactions {
            if tx.status != TransactionStatus::Confirmed || tx.check_in.year() != year {
                continue;
            }
            let bucket = &mut months[tx.check_in.month0() as usize];
            bucket.revenue += tx.total_price;
            bucket.bookings += 1;
        }

        months
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mongodb::bson::oid::ObjectId;

    fn transaction(
        status: TransactionStatus,
        check_in: NaiveDate,
        nights: u32,
        total_price: f64,
    ) -> Transaction {
        Transaction {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            room_id: ObjectId::new(),
            property_id: ObjectId::new(),
            booking_code: "test-code".to_string(),
            check_in,
            check_out: check_in + chrono::Duration::days(nights as i64),
            nights,
            total_price,
            peak_season_days: 0,
            status,
            created_at: None,
            updated_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_counts_statuses_and_confirmed_revenue() {
        let transactions = vec![
            transaction(TransactionStatus::Confirmed, date(2024, 1, 1), 3, 450.0),
            transaction(TransactionStatus::Confirmed, date(2024, 2, 1), 2, 200.0),
            transaction(TransactionStatus::Pending, date(2024, 3, 1), 4, 800.0),
            transaction(TransactionStatus::Cancelled, date(2024, 3, 5), 1, 100.0),
            transaction(TransactionStatus::Rejected, date(2024, 4, 1), 2, 300.0),
        ];

        let summary = ReportService::revenue_summary(&transactions);

        assert_eq!(summary.transactions.confirmed, 2);
        assert_eq!(summary.transactions.pending, 1);
        assert_eq!(summary.transactions.cancelled, 1);
        assert_eq!(summary.transactions.rejected, 1);
        assert_eq!(summary.confirmed_revenue, 650.0);
        assert_eq!(summary.confirmed_nights, 5);
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let summary = ReportService::revenue_summary(&[]);
        assert_eq!(summary.confirmed_revenue, 0.0);
        assert_eq!(summary.confirmed_nights, 0);
        assert_eq!(summary.transactions, StatusCounts::default());
    }

    #[test]
    fn monthly_revenue_buckets_by_check_in_month() {
        let transactions = vec![
            transaction(TransactionStatus::Confirmed, date(2024, 1, 10), 3, 450.0),
            transaction(TransactionStatus::Confirmed, date(2024, 1, 20), 2, 200.0),
            transaction(TransactionStatus::Confirmed, date(2024, 7, 1), 5, 1500.0),
            // Not confirmed and wrong year: both ignored
            transaction(TransactionStatus::Pending, date(2024, 1, 15), 2, 999.0),
            transaction(TransactionStatus::Confirmed, date(2023, 1, 15), 2, 999.0),
        ];

        let months = ReportService::monthly_revenue(&transactions, 2024);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].revenue, 650.0);
        assert_eq!(months[0].bookings, 2);
        assert_eq!(months[6].revenue, 1500.0);
        assert_eq!(months[6].bookings, 1);
        assert_eq!(months[11].revenue, 0.0);
    }
}
