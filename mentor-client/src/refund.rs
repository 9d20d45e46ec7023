//! Display-side refund window. The server decides refunds; this only drives
//! whether the refund action is offered and how the remaining time reads.

use crate::models::{PaymentDetails, PaymentStatus, RefundStatus};
use chrono::{DateTime, Utc};

pub const REFUND_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundWindow {
    pub days_elapsed: i64,
    pub days_remaining: i64,
}

impl RefundWindow {
    /// Whole days since the charge, clamped at zero for clocks running behind.
    pub fn from_charged_at(charged_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days_elapsed = (now - charged_at).num_days().max(0);
        Self {
            days_elapsed,
            days_remaining: (REFUND_WINDOW_DAYS - days_elapsed).max(0),
        }
    }

    pub fn is_open(&self) -> bool {
        self.days_elapsed < REFUND_WINDOW_DAYS
    }

    pub fn remaining_wording(&self) -> String {
        match self.days_remaining {
            1 => "1 more day".to_string(),
            n => format!("{} more days", n),
        }
    }
}

/// Whether the refund action should be shown for a payment, and the window
/// text that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundAffordance {
    Available { window: RefundWindow },
    Hidden { reason: &'static str },
}

impl RefundAffordance {
    pub fn for_payment(details: &PaymentDetails, now: DateTime<Utc>) -> Self {
        if details.payment_status == PaymentStatus::Refunded
            || matches!(
                details.refund_status,
                Some(RefundStatus::Pending) | Some(RefundStatus::Succeeded)
            )
        {
            return RefundAffordance::Hidden {
                reason: "already refunded",
            };
        }

        if details.payment_status != PaymentStatus::Succeeded {
            return RefundAffordance::Hidden {
                reason: "payment not captured",
            };
        }

        let Some(charged_at) = details.charged_at else {
            return RefundAffordance::Hidden {
                reason: "payment not captured",
            };
        };

        let window = RefundWindow::from_charged_at(charged_at, now);
        if window.is_open() {
            RefundAffordance::Available { window }
        } else {
            RefundAffordance::Hidden {
                reason: "refund window closed",
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RefundAffordance::Available { .. })
    }

    pub fn message(&self) -> String {
        match self {
            RefundAffordance::Available { window } => format!(
                "You can request a refund for {}",
                window.remaining_wording()
            ),
            RefundAffordance::Hidden { reason } => format!("Refund unavailable: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn paid(charged_days_ago: i64, now: DateTime<Utc>) -> PaymentDetails {
        PaymentDetails {
            amount: 2599,
            currency: "usd".into(),
            payment_status: PaymentStatus::Succeeded,
            charged_at: Some(now - Duration::days(charged_days_ago)),
            refunded_at: None,
            refunded_amount: None,
            refund_status: None,
        }
    }

    #[test]
    fn shown_at_29_days_with_one_day_left() {
        let now = Utc::now();
        let affordance = RefundAffordance::for_payment(&paid(29, now), now);
        match &affordance {
            RefundAffordance::Available { window } => {
                assert_eq!(window.days_remaining, 1);
                assert_eq!(window.remaining_wording(), "1 more day");
            }
            other => panic!("expected refund to be offered, got {:?}", other),
        }
        assert_eq!(
            affordance.message(),
            "You can request a refund for 1 more day"
        );
    }

    #[test]
    fn hidden_from_exactly_30_days() {
        let now = Utc::now();
        assert!(!RefundAffordance::for_payment(&paid(30, now), now).is_available());
        assert!(!RefundAffordance::for_payment(&paid(31, now), now).is_available());
    }

    #[test]
    fn partial_days_round_down() {
        let now = Utc::now();
        let charged = now - Duration::days(29) - Duration::hours(23);
        let window = RefundWindow::from_charged_at(charged, now);
        assert_eq!(window.days_elapsed, 29);
        assert!(window.is_open());
    }

    #[test]
    fn plural_wording() {
        let now = Utc::now();
        let window = RefundWindow::from_charged_at(now - Duration::days(2), now);
        assert_eq!(window.remaining_wording(), "28 more days");
    }

    #[test]
    fn hidden_for_refunded_or_uncaptured_payments() {
        let now = Utc::now();

        let mut refunded = paid(1, now);
        refunded.payment_status = PaymentStatus::Refunded;
        assert!(!RefundAffordance::for_payment(&refunded, now).is_available());

        let mut pending_refund = paid(1, now);
        pending_refund.refund_status = Some(RefundStatus::Pending);
        assert!(!RefundAffordance::for_payment(&pending_refund, now).is_available());

        let mut created = paid(1, now);
        created.payment_status = PaymentStatus::Created;
        assert!(!RefundAffordance::for_payment(&created, now).is_available());

        let mut no_charge_date = paid(1, now);
        no_charge_date.charged_at = None;
        assert!(!RefundAffordance::for_payment(&no_charge_date, now).is_available());
    }

    #[test]
    fn future_charge_date_counts_as_today() {
        let now = Utc::now();
        let window = RefundWindow::from_charged_at(now + Duration::hours(3), now);
        assert_eq!(window.days_elapsed, 0);
        assert_eq!(window.days_remaining, 30);
    }
}
