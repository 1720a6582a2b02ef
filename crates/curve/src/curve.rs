//! Coupon premium curve.
//!
//! Prices the premium paid on coupons as a function of the protocol debt
//! ratio `d = total_redeemable / total_supply`, the current risk rate `r`
//! (18-decimal fraction in `[0, 1]`) and the number of epochs `e` the debt
//! has been outstanding.
//!
//! The multiplier is a product `m = w(r, e) · level(d)`. The weight blends
//! an age term that decays from 1 toward a seasoned floor with a fixed
//! risk share:
//!
//! - `age(e) = a + (1 - a) · K / (e + K)`
//! - `w(r, e) = (1 - r) · age(e) + r · c`
//!
//! so `w` stays in `[0, 1]`. The debt level splits at `d = 1/2`:
//!
//! - below threshold: `level = 4 · d · (1 - d)`, rising to 1 at the threshold
//!   and never reaching it, so the premium stays under face value
//! - at or above it: `level = 1 + κ · (2d - 1)^2`, starting at 1 and growing
//!   quadratically, so the premium can exceed face value
//!
//! The curve is continuous at the threshold and never decreases in `d` for
//! fixed `r` and `e`. The coupon amount is `floor(coupons · m)`.

use crate::decimal::Decimal;
use crate::errors::{CurveError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Epoch scale `K` of the age decay.
const FRESHNESS_EPOCHS: u128 = 910;
/// Seasoned floor `a` of the age term, scaled by `10^18` (0.04935).
const SEASONED_WEIGHT: u128 = 49_350_000_000_000_000;
/// Weight `c` carried by the risk share, scaled by `10^18` (0.4842).
const RISK_WEIGHT: u128 = 484_200_000_000_000_000;
/// Curvature `κ` of the above-threshold level, scaled by `10^18` (6.8407).
const ABOVE_CURVATURE: u128 = 6_840_700_000_000_000_000;
/// Scale of the below-threshold parabola `4 · d · (1 - d)`.
const BELOW_SCALE: u128 = 4;

/// Which side of the 50% debt ratio a pricing falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    BelowThreshold,
    AboveThreshold,
}

/// Classify a debt position. The comparison `2 · redeemable < supply` is
/// exact, so the regime never depends on fixed-point truncation.
pub fn regime(total_supply: u128, total_redeemable: u128) -> Result<Regime> {
    if total_supply == 0 {
        return Err(CurveError::DivisionByZero);
    }
    let below = total_redeemable
        .checked_mul(2)
        .is_some_and(|twice| twice < total_supply);
    Ok(if below {
        Regime::BelowThreshold
    } else {
        Regime::AboveThreshold
    })
}

/// Coupons issued for `total_coupons` face value at the given debt position.
pub fn calculate_coupons(
    total_supply: u128,
    total_redeemable: u128,
    total_coupons: u128,
    risk_rate: u128,
    outstanding_epochs: u64,
) -> Result<u128> {
    let regime = regime(total_supply, total_redeemable)?;
    if total_coupons == 0 {
        return Ok(0);
    }

    let multiplier = regime_multiplier(
        regime,
        total_supply,
        total_redeemable,
        risk_rate,
        outstanding_epochs,
    )?;
    let amount = multiplier.mul_integer(total_coupons)?.floor()?;

    debug!(
        target: "curve",
        regime = ?regime,
        total_supply,
        total_redeemable,
        total_coupons,
        outstanding_epochs,
        amount,
        "Priced coupons"
    );
    Ok(amount)
}

/// Premium multiplier (coupon amount per unit of face value), truncated to
/// 18 decimals.
pub fn premium_multiplier(
    total_supply: u128,
    total_redeemable: u128,
    risk_rate: u128,
    outstanding_epochs: u64,
) -> Result<Decimal> {
    let regime = regime(total_supply, total_redeemable)?;
    regime_multiplier(
        regime,
        total_supply,
        total_redeemable,
        risk_rate,
        outstanding_epochs,
    )
}

fn regime_multiplier(
    regime: Regime,
    total_supply: u128,
    total_redeemable: u128,
    risk_rate: u128,
    outstanding_epochs: u64,
) -> Result<Decimal> {
    let weight = premium_weight(risk_rate, outstanding_epochs)?;
    let level = debt_level(regime, total_supply, total_redeemable)?;
    weight.mul(&level)
}

fn premium_weight(risk_rate: u128, outstanding_epochs: u64) -> Result<Decimal> {
    let one = Decimal::one();
    let risk = Decimal::from_raw(risk_rate);
    let survival = one
        .sub(&risk)
        .map_err(|_| CurveError::ArithmeticOverflow("risk rate exceeds one"))?;

    let seasoned = Decimal::from_raw(SEASONED_WEIGHT);
    let freshness = Decimal::ratio(
        FRESHNESS_EPOCHS,
        u128::from(outstanding_epochs) + FRESHNESS_EPOCHS,
    )?;
    let age = seasoned.add(&one.sub(&seasoned)?.mul(&freshness)?)?;

    survival
        .mul(&age)?
        .add(&risk.mul(&Decimal::from_raw(RISK_WEIGHT))?)
}

fn debt_level(regime: Regime, total_supply: u128, total_redeemable: u128) -> Result<Decimal> {
    let one = Decimal::one();
    match regime {
        Regime::BelowThreshold => {
            let debt_ratio = Decimal::ratio(total_redeemable, total_supply)?;
            debt_ratio
                .mul(&one.sub(&debt_ratio)?)?
                .mul_integer(BELOW_SCALE)
        }
        Regime::AboveThreshold => {
            let supply = BigUint::from(total_supply);
            let excess_numer = BigUint::from(total_redeemable) * 2u32 - &supply;
            let excess = Decimal::ratio_big(&excess_numer, &supply)?;
            let curvature = Decimal::from_raw(ABOVE_CURVATURE);
            one.add(&curvature.mul(&excess.mul(&excess)?)?)
        }
    }
}

/// Economic inputs read once from governance and reused across quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSnapshot {
    pub total_supply: u128,
    pub total_redeemable: u128,
    /// Risk rate scaled by `10^18`.
    pub risk_rate: u128,
    pub outstanding_epochs: u64,
}

impl DebtSnapshot {
    pub fn regime(&self) -> Result<Regime> {
        regime(self.total_supply, self.total_redeemable)
    }

    pub fn quote(&self, total_coupons: u128) -> Result<u128> {
        calculate_coupons(
            self.total_supply,
            self.total_redeemable,
            total_coupons,
            self.risk_rate,
            self.outstanding_epochs,
        )
    }

    pub fn multiplier(&self) -> Result<Decimal> {
        premium_multiplier(
            self.total_supply,
            self.total_redeemable,
            self.risk_rate,
            self.outstanding_epochs,
        )
    }
}
