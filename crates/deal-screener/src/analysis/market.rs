use super::domain::{require_finite, require_non_negative, require_positive, DealError};
use super::listing::ListingSnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Informational rental demand indicator supplied by the market-data feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    Moderate,
    High,
}

impl DemandLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DemandLevel::Low => "Low",
            DemandLevel::Moderate => "Moderate",
            DemandLevel::High => "High",
        }
    }
}

/// Aggregate market conditions for one geography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub average_price: f64,
    pub average_rent: f64,
    pub average_days_on_market: f64,
    pub appreciation_rate_percent: f64,
    /// Months of supply at the current sales pace.
    pub inventory_months: f64,
    #[serde(default)]
    pub rental_demand: Option<DemandLevel>,
}

/// Trend inputs the catalog cannot derive from listings alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrendInputs {
    pub appreciation_rate_percent: f64,
    pub inventory_months: f64,
    #[serde(default)]
    pub rental_demand: Option<DemandLevel>,
}

impl MarketSignal {
    pub fn validate(&self) -> Result<(), DealError> {
        require_positive("average_price", self.average_price)?;
        require_non_negative("average_rent", self.average_rent)?;
        require_non_negative("average_days_on_market", self.average_days_on_market)?;
        require_finite("appreciation_rate_percent", self.appreciation_rate_percent)?;
        require_non_negative("inventory_months", self.inventory_months)?;
        Ok(())
    }

    /// Averages price, rent, and days on market across a geography's listings.
    ///
    /// Listings without rent or days-on-market data are left out of those
    /// averages only. Returns `None` for an empty slice.
    pub fn from_listings(
        listings: &[ListingSnapshot],
        trends: &MarketTrendInputs,
        as_of: NaiveDate,
    ) -> Option<Self> {
        if listings.is_empty() {
            return None;
        }

        let average_price = mean(listings.iter().map(|listing| listing.price))?;
        let average_rent =
            mean(listings.iter().filter_map(|listing| listing.estimated_rent)).unwrap_or(0.0);
        let average_days_on_market = mean(
            listings
                .iter()
                .filter_map(|listing| listing.days_on_market_as_of(as_of))
                .map(f64::from),
        )
        .unwrap_or(0.0);

        Some(Self {
            average_price,
            average_rent,
            average_days_on_market,
            appreciation_rate_percent: trends.appreciation_rate_percent,
            inventory_months: trends.inventory_months,
            rental_demand: trends.rental_demand,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Operator-tunable cut-offs for market classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketThresholds {
    pub sellers_max_inventory_months: f64,
    pub sellers_max_days_on_market: f64,
    pub sellers_min_appreciation_percent: f64,
    pub buyers_min_inventory_months: f64,
    pub buyers_min_days_on_market: f64,
    pub buyers_max_appreciation_percent: f64,
    /// Appreciation within +/- this band reads as a stable price trend.
    pub stable_band_percent: f64,
}

impl Default for MarketThresholds {
    fn default() -> Self {
        Self {
            sellers_max_inventory_months: 4.0,
            sellers_max_days_on_market: 30.0,
            sellers_min_appreciation_percent: 0.0,
            buyers_min_inventory_months: 6.0,
            buyers_min_days_on_market: 60.0,
            buyers_max_appreciation_percent: 0.0,
            stable_band_percent: 1.0,
        }
    }
}

impl MarketThresholds {
    pub fn validate(&self) -> Result<(), DealError> {
        require_non_negative("sellers_max_inventory_months", self.sellers_max_inventory_months)?;
        require_non_negative("sellers_max_days_on_market", self.sellers_max_days_on_market)?;
        require_finite(
            "sellers_min_appreciation_percent",
            self.sellers_min_appreciation_percent,
        )?;
        require_non_negative("buyers_min_inventory_months", self.buyers_min_inventory_months)?;
        require_non_negative("buyers_min_days_on_market", self.buyers_min_days_on_market)?;
        require_finite(
            "buyers_max_appreciation_percent",
            self.buyers_max_appreciation_percent,
        )?;
        require_non_negative("stable_band_percent", self.stable_band_percent)?;

        if self.sellers_max_inventory_months > self.buyers_min_inventory_months {
            return Err(DealError::invalid(
                "sellers_max_inventory_months",
                "must not exceed buyers_min_inventory_months",
            ));
        }
        if self.sellers_max_days_on_market > self.buyers_min_days_on_market {
            return Err(DealError::invalid(
                "sellers_max_days_on_market",
                "must not exceed buyers_min_days_on_market",
            ));
        }
        if self.buyers_max_appreciation_percent > self.sellers_min_appreciation_percent {
            return Err(DealError::invalid(
                "buyers_max_appreciation_percent",
                "must not exceed sellers_min_appreciation_percent",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    SellersMarket,
    BuyersMarket,
    BalancedMarket,
}

impl MarketType {
    pub fn label(&self) -> &'static str {
        match self {
            MarketType::SellersMarket => "Seller's Market",
            MarketType::BuyersMarket => "Buyer's Market",
            MarketType::BalancedMarket => "Balanced Market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    Stable,
    Declining,
}

impl PriceTrend {
    pub fn label(&self) -> &'static str {
        match self {
            PriceTrend::Rising => "Rising",
            PriceTrend::Stable => "Stable",
            PriceTrend::Declining => "Declining",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketVerdict {
    pub market_type: MarketType,
    pub market_label: &'static str,
    pub price_trend: PriceTrend,
    pub appreciation_rate_percent: f64,
    pub average_days_on_market: f64,
    pub inventory_months: f64,
    pub rent_yield_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_demand: Option<DemandLevel>,
}

pub fn classify_market(
    signal: &MarketSignal,
    thresholds: &MarketThresholds,
) -> Result<MarketVerdict, DealError> {
    signal.validate()?;
    thresholds.validate()?;

    let appreciation = signal.appreciation_rate_percent;
    let sellers = signal.inventory_months <= thresholds.sellers_max_inventory_months
        && signal.average_days_on_market <= thresholds.sellers_max_days_on_market
        && appreciation > thresholds.sellers_min_appreciation_percent;
    let buyers = signal.inventory_months >= thresholds.buyers_min_inventory_months
        && signal.average_days_on_market >= thresholds.buyers_min_days_on_market
        && appreciation <= thresholds.buyers_max_appreciation_percent;

    let market_type = match (sellers, buyers) {
        (true, false) => MarketType::SellersMarket,
        (false, true) => MarketType::BuyersMarket,
        _ => MarketType::BalancedMarket,
    };

    let price_trend = if appreciation > thresholds.stable_band_percent {
        PriceTrend::Rising
    } else if appreciation < -thresholds.stable_band_percent {
        PriceTrend::Declining
    } else {
        PriceTrend::Stable
    };

    Ok(MarketVerdict {
        market_type,
        market_label: market_type.label(),
        price_trend,
        appreciation_rate_percent: appreciation,
        average_days_on_market: signal.average_days_on_market,
        inventory_months: signal.inventory_months,
        rent_yield_percent: signal.average_rent * 12.0 / signal.average_price * 100.0,
        rental_demand: signal.rental_demand,
    })
}
