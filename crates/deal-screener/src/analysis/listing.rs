use super::domain::{require_non_negative, DealError, PropertyFinancials};
use super::expenses::{estimate_monthly_expenses, ExpenseBreakdown, OperatingExpenseAssumptions};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listing record as supplied by the external property catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: Option<u8>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub estimated_rent: Option<f64>,
    #[serde(default)]
    pub estimated_arv: Option<f64>,
    #[serde(default)]
    pub estimated_repair_cost: f64,
    /// Annual property taxes.
    #[serde(default)]
    pub property_taxes: f64,
    /// Monthly HOA dues.
    #[serde(default)]
    pub hoa_fees: f64,
    #[serde(default)]
    pub days_on_market: Option<u32>,
    #[serde(default)]
    pub listing_date: Option<NaiveDate>,
}

impl ListingSnapshot {
    /// Reported days on market, falling back to the listing date.
    pub fn days_on_market_as_of(&self, as_of: NaiveDate) -> Option<u32> {
        if let Some(days) = self.days_on_market {
            return Some(days);
        }

        self.listing_date
            .map(|listed| (as_of - listed).num_days().max(0))
            .and_then(|days| u32::try_from(days).ok())
    }

    /// Converts the listing into deal inputs, estimating operating expenses from
    /// taxes, HOA dues, and the rent-based allowances.
    pub fn to_financials(
        &self,
        assumptions: &OperatingExpenseAssumptions,
    ) -> Result<(PropertyFinancials, Option<ExpenseBreakdown>), DealError> {
        require_non_negative("estimated_repair_cost", self.estimated_repair_cost)?;

        let mut financials = PropertyFinancials::new(self.price)
            .with_rehab(self.estimated_repair_cost, self.estimated_arv);

        let breakdown = match self.estimated_rent {
            Some(rent) => {
                let breakdown = estimate_monthly_expenses(
                    self.price,
                    rent,
                    self.property_taxes,
                    self.hoa_fees,
                    assumptions,
                )?;
                financials = financials.with_rent(rent, breakdown.total());
                Some(breakdown)
            }
            None => None,
        };

        financials.validate()?;
        Ok((financials, breakdown))
    }

    pub fn market_key(&self) -> (String, String) {
        (self.city.clone(), self.state.clone())
    }
}

/// Catalog-side filter; matching is the catalog's job, not the engine's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<u8>,
    #[serde(default)]
    pub property_type: Option<String>,
}

impl ListingQuery {
    /// Reference matcher for in-memory catalogs.
    pub fn matches(&self, listing: &ListingSnapshot) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |wanted| wanted.eq_ignore_ascii_case(actual))
        };

        text_matches(&self.city, &listing.city)
            && text_matches(&self.state, &listing.state)
            && self.min_price.map_or(true, |min| listing.price >= min)
            && self.max_price.map_or(true, |max| listing.price <= max)
            && self
                .min_bedrooms
                .map_or(true, |min| listing.bedrooms.is_some_and(|beds| beds >= min))
            && self.property_type.as_deref().map_or(true, |wanted| {
                listing
                    .property_type
                    .as_deref()
                    .is_some_and(|actual| actual.eq_ignore_ascii_case(wanted))
            })
    }
}
