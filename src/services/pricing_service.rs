use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::peak_season_rate::PeakSeasonRate;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidStayRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("nightly price must be positive, got {0}")]
    NonPositivePrice(f64),
    #[error("seasonal window ends {end} before it starts {start}")]
    InvalidSeasonWindow { start: NaiveDate, end: NaiveDate },
}

/// A date-bounded nightly override. Both bounds are inclusive calendar days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
}

impl From<&PeakSeasonRate> for SeasonWindow {
    fn from(rate: &PeakSeasonRate) -> Self {
        SeasonWindow {
            start_date: rate.start_date,
            end_date: rate.end_date,
            price: rate.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub total_price: f64,
    pub nights: u32,
    pub base_price: f64,
    pub peak_season_days: u32,
    /// Highest seasonal override applied across the stay, 0 when no night
    /// fell inside a window.
    pub peak_season_rate_per_night: f64,
}

pub struct PricingService;

impl PricingService {
    /// Price a stay night by night. Each night is the calendar day at
    /// `check_in + i`; a night inside one or more seasonal windows is charged
    /// the highest matching window price, every other night is charged
    /// `price_per_night`.
    ///
    /// Rejects reversed stays, non-positive base prices, and windows whose
    /// end precedes their start instead of normalizing them away.
    pub fn quote_stay(
        check_in: NaiveDate,
        check_out: NaiveDate,
        price_per_night: f64,
        seasons: &[SeasonWindow],
    ) -> Result<PricingQuote, PricingError> {
        if check_out <= check_in {
            return Err(PricingError::InvalidStayRange {
                check_in,
                check_out,
            });
        }
        if price_per_night <= 0.0 {
            return Err(PricingError::NonPositivePrice(price_per_night));
        }
        for season in seasons {
            if season.end_date < season.start_date {
                return Err(PricingError::InvalidSeasonWindow {
                    start: season.start_date,
                    end: season.end_date,
                });
            }
        }

        let nights = (check_out - check_in).num_days() as u32;

        let mut total_price = 0.0;
        let mut peak_season_days = 0;
        let mut peak_season_rate_per_night: f64 = 0.0;

        for i in 0..nights {
            let night = check_in + Duration::days(i as i64);

            match Self::nightly_override(night, seasons) {
                Some(rate) => {
                    total_price += rate;
                    peak_season_days += 1;
                    peak_season_rate_per_night = peak_season_rate_per_night.max(rate);
                }
                None => total_price += price_per_night,
            }
        }

        Ok(PricingQuote {
            total_price,
            nights,
            base_price: price_per_night,
            peak_season_days,
            peak_season_rate_per_night,
        })
    }

    /// Highest window price covering `night`, if any. Overlapping windows are
    /// tolerated but logged, so the tie-break stays auditable.
    fn nightly_override(night: NaiveDate, seasons: &[SeasonWindow]) -> Option<f64> {
        let mut matches = seasons
            .iter()
            .filter(|s| s.start_date <= night && night <= s.end_date)
            .map(|s| s.price);

        let first = matches.next()?;
        let mut best = first;
        let mut extra = 0;
        for price in matches {
            best = best.max(price);
            extra += 1;
        }
        if extra > 0 {
            log::warn!(
                "{} seasonal windows overlap on {}, charging the highest ({})",
                extra + 1,
                night,
                best
            );
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate, price: f64) -> SeasonWindow {
        SeasonWindow {
            start_date: start,
            end_date: end,
            price,
        }
    }

    #[test]
    fn stay_without_seasons_is_nights_times_base() {
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &[]).unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total_price, 300.0);
        assert_eq!(quote.peak_season_days, 0);
        assert_eq!(quote.peak_season_rate_per_night, 0.0);
        assert_eq!(quote.base_price, 100.0);
    }

    #[test]
    fn single_night_window_marks_exactly_one_night() {
        // Nights checked are Jan 1, 2 and 3; only Jan 2 is inside the window.
        let seasons = [window(date(2024, 1, 2), date(2024, 1, 2), 250.0)];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &seasons)
                .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total_price, 450.0);
        assert_eq!(quote.peak_season_days, 1);
        assert_eq!(quote.peak_season_rate_per_night, 250.0);
    }

    #[test]
    fn window_spanning_entire_stay_prices_every_night() {
        let seasons = [window(date(2024, 1, 1), date(2024, 1, 3), 200.0)];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &seasons)
                .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total_price, 600.0);
        assert_eq!(quote.peak_season_days, 3);
    }

    #[test]
    fn overlapping_windows_charge_the_highest_price() {
        let seasons = [
            window(date(2024, 1, 2), date(2024, 1, 2), 250.0),
            window(date(2024, 1, 2), date(2024, 1, 2), 300.0),
        ];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &seasons)
                .unwrap();

        assert_eq!(quote.total_price, 500.0);
        assert_eq!(quote.peak_season_days, 1);
        assert_eq!(quote.peak_season_rate_per_night, 300.0);
    }

    #[test]
    fn overlap_order_does_not_matter() {
        let ascending = [
            window(date(2024, 1, 2), date(2024, 1, 2), 250.0),
            window(date(2024, 1, 2), date(2024, 1, 2), 300.0),
        ];
        let descending = [
            window(date(2024, 1, 2), date(2024, 1, 2), 300.0),
            window(date(2024, 1, 2), date(2024, 1, 2), 250.0),
        ];

        let a = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &ascending)
            .unwrap();
        let b = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &descending)
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn window_on_first_night_boundary() {
        let seasons = [window(date(2024, 1, 1), date(2024, 1, 1), 400.0)];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 3), 100.0, &seasons)
                .unwrap();

        assert_eq!(quote.nights, 2);
        assert_eq!(quote.peak_season_days, 1);
        assert_eq!(quote.total_price, 500.0);
    }

    #[test]
    fn window_starting_on_checkout_never_applies() {
        // The last night of a Jan 1 -> Jan 4 stay is Jan 3.
        let seasons = [window(date(2024, 1, 4), date(2024, 1, 6), 500.0)];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &seasons)
                .unwrap();

        assert_eq!(quote.peak_season_days, 0);
        assert_eq!(quote.total_price, 300.0);
    }

    #[test]
    fn stay_outside_all_windows_has_no_peak_nights() {
        let seasons = [window(date(2024, 6, 1), date(2024, 8, 31), 900.0)];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &seasons)
                .unwrap();

        assert_eq!(quote.peak_season_days, 0);
        assert_eq!(quote.peak_season_rate_per_night, 0.0);
        assert_eq!(quote.total_price, 300.0);
    }

    #[test]
    fn peak_and_base_nights_always_sum_to_nights() {
        let seasons = [
            window(date(2024, 1, 2), date(2024, 1, 3), 250.0),
            window(date(2024, 1, 5), date(2024, 1, 5), 300.0),
        ];
        let quote =
            PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 7), 100.0, &seasons)
                .unwrap();

        let base_nights = quote.nights - quote.peak_season_days;
        assert_eq!(quote.nights, 6);
        assert_eq!(quote.peak_season_days, 3);
        assert_eq!(
            quote.total_price,
            base_nights as f64 * 100.0 + 250.0 + 250.0 + 300.0
        );
    }

    #[test]
    fn quoting_twice_yields_identical_results() {
        let seasons = [window(date(2024, 1, 2), date(2024, 1, 3), 250.0)];
        let a = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 5), 120.0, &seasons)
            .unwrap();
        let b = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 5), 120.0, &seasons)
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn reversed_stay_is_rejected() {
        let err = PricingService::quote_stay(date(2024, 1, 4), date(2024, 1, 1), 100.0, &[])
            .unwrap_err();

        assert_eq!(
            err,
            PricingError::InvalidStayRange {
                check_in: date(2024, 1, 4),
                check_out: date(2024, 1, 1),
            }
        );
    }

    #[test]
    fn zero_length_stay_is_rejected() {
        let err = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 1), 100.0, &[])
            .unwrap_err();

        assert!(matches!(err, PricingError::InvalidStayRange { .. }));
    }

    #[test]
    fn non_positive_base_price_is_rejected() {
        let err = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 0.0, &[])
            .unwrap_err();
        assert_eq!(err, PricingError::NonPositivePrice(0.0));

        let err = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), -10.0, &[])
            .unwrap_err();
        assert_eq!(err, PricingError::NonPositivePrice(-10.0));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let seasons = [window(date(2024, 1, 5), date(2024, 1, 2), 250.0)];
        let err = PricingService::quote_stay(date(2024, 1, 1), date(2024, 1, 4), 100.0, &seasons)
            .unwrap_err();

        assert_eq!(
            err,
            PricingError::InvalidSeasonWindow {
                start: date(2024, 1, 5),
                end: date(2024, 1, 2),
            }
        );
    }
}
