//! Lottery parameters
//!
//! Designed to be stored in chain config and adjusted only by governance.
//! Missing fields fall back to [`LotteryParams::default`].

use crate::errors::ParamsError;
use crate::types::{Amount, TOKEN_UNIT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryParams {
    /// Price of one ticket in base units. Purchases below it are rejected.
    pub ticket_price: Amount,
    /// Epochs of expansion required before winners can be extracted
    pub min_expansion_epochs: u64,
    /// Upper bound on prize ranks (and so on tickets drawn) per game
    pub max_prize_ranks: usize,
}

impl Default for LotteryParams {
    fn default() -> Self {
        Self {
            // 10 whole tokens
            ticket_price: 10 * TOKEN_UNIT,
            min_expansion_epochs: 3,
            max_prize_ranks: 64,
        }
    }
}

impl LotteryParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.ticket_price == 0 {
            return Err(ParamsError::ZeroTicketPrice);
        }
        if self.max_prize_ranks == 0 {
            return Err(ParamsError::ZeroPrizeRanks);
        }
        Ok(())
    }

    /// Parse and validate parameters from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Number of tickets `amount` buys and the amount actually charged.
    /// The remainder below one ticket price is never charged.
    pub fn tickets_for(&self, amount: Amount) -> (Amount, Amount) {
        let tickets = amount / self.ticket_price;
        (tickets, tickets * self.ticket_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = LotteryParams::default();
        assert_eq!(params.ticket_price, 10_000_000_000_000_000_000);
        assert_eq!(params.min_expansion_epochs, 3);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params = LotteryParams::from_json_str(r#"{ "min_expansion_epochs": 5 }"#).unwrap();
        assert_eq!(params.min_expansion_epochs, 5);
        assert_eq!(params.ticket_price, LotteryParams::default().ticket_price);
    }

    #[test]
    fn large_prices_parse() {
        let params =
            LotteryParams::from_json_str(r#"{ "ticket_price": 100000000000000000000 }"#).unwrap();
        assert_eq!(params.ticket_price, 100 * TOKEN_UNIT);
    }

    #[test]
    fn zero_price_rejected() {
        let err = LotteryParams::from_json_str(r#"{ "ticket_price": 0 }"#).unwrap_err();
        assert!(matches!(err, ParamsError::ZeroTicketPrice));
    }

    #[test]
    fn zero_ranks_rejected() {
        let params = LotteryParams {
            max_prize_ranks: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ParamsError::ZeroPrizeRanks)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = LotteryParams::from_json_str("{ ticket_price: }").unwrap_err();
        assert!(matches!(err, ParamsError::Parse(_)));
    }

    #[test]
    fn remainder_is_not_charged() {
        let params = LotteryParams::default();
        let (tickets, charged) = params.tickets_for(10 * params.ticket_price + 7);
        assert_eq!(tickets, 10);
        assert_eq!(charged, 10 * params.ticket_price);
    }
}
