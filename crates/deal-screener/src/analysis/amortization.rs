use super::domain::{require_non_negative, require_positive, DealError, FinancingTerms};
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: u32 = 12;

/// Fixed-rate financing figures derived from a purchase price and loan terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub down_payment_amount: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_cash_invested: f64,
    pub monthly_rate: f64,
    pub number_of_payments: u32,
    pub total_of_payments: f64,
    pub total_interest: f64,
    pub first_payment_interest: f64,
    pub first_payment_principal: f64,
}

/// One month of the repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    pub period: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub remaining_balance: f64,
}

/// Computes down payment, loan size, and the level monthly payment.
///
/// `repair_cost` only contributes to `total_cash_invested`; it is never financed.
pub fn amortize(
    purchase_price: f64,
    repair_cost: f64,
    terms: &FinancingTerms,
) -> Result<AmortizationResult, DealError> {
    require_positive("purchase_price", purchase_price)?;
    require_non_negative("repair_cost", repair_cost)?;
    terms.validate()?;

    let number_of_payments = terms.loan_term_years * MONTHS_PER_YEAR;

    let down_payment_amount = purchase_price * terms.down_payment_percent / 100.0;
    let loan_amount = purchase_price - down_payment_amount;
    let monthly_rate = terms.annual_interest_rate_percent / 100.0 / MONTHS_PER_YEAR as f64;
    let monthly_payment = level_payment(loan_amount, monthly_rate, number_of_payments);

    let total_of_payments = monthly_payment * number_of_payments as f64;
    let total_interest = if monthly_rate == 0.0 {
        0.0
    } else {
        total_of_payments - loan_amount
    };
    let first_payment_interest = loan_amount * monthly_rate;

    Ok(AmortizationResult {
        down_payment_amount,
        loan_amount,
        monthly_payment,
        total_cash_invested: down_payment_amount + repair_cost,
        monthly_rate,
        number_of_payments,
        total_of_payments,
        total_interest,
        first_payment_interest,
        first_payment_principal: monthly_payment - first_payment_interest,
    })
}

fn level_payment(principal: f64, monthly_rate: f64, number_of_payments: u32) -> f64 {
    if principal == 0.0 {
        return 0.0;
    }

    let periods = number_of_payments as f64;
    if monthly_rate == 0.0 {
        return principal / periods;
    }

    // discounted form stays finite when (1 + r)^n overflows at steep rates
    let discount = 1.0 - (1.0 + monthly_rate).powf(-periods);
    if discount <= 0.0 {
        // rate too small to register in f64; the loan is effectively interest free
        return principal / periods;
    }

    principal * monthly_rate / discount
}

impl AmortizationResult {
    /// Month-by-month principal and interest split. The final period absorbs
    /// floating-point drift so the balance closes at zero.
    pub fn schedule(&self) -> Vec<AmortizationPeriod> {
        let mut balance = self.loan_amount;
        let mut periods = Vec::with_capacity(self.number_of_payments as usize);

        for period in 1..=self.number_of_payments {
            let interest = balance * self.monthly_rate;
            let mut principal = self.monthly_payment - interest;
            if period == self.number_of_payments || principal > balance {
                principal = balance;
            }
            balance -= principal;

            periods.push(AmortizationPeriod {
                period,
                payment: principal + interest,
                interest,
                principal,
                remaining_balance: balance,
            });
        }

        periods
    }

    /// Outstanding principal after `payments_made` level payments.
    pub fn balance_after(&self, payments_made: u32) -> f64 {
        let made = payments_made.min(self.number_of_payments);
        if made == self.number_of_payments {
            return 0.0;
        }

        // present value of the payments still owed
        let remaining = (self.number_of_payments - made) as f64;
        let discount = 1.0 - (1.0 + self.monthly_rate).powf(-remaining);
        let balance = if discount <= 0.0 {
            self.loan_amount - self.monthly_payment * made as f64
        } else {
            self.monthly_payment * discount / self.monthly_rate
        };

        balance.max(0.0)
    }

    /// Principal repaid over the first `payments_made` payments.
    pub fn equity_paid_down(&self, payments_made: u32) -> f64 {
        self.loan_amount - self.balance_after(payments_made)
    }
}
