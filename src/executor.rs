//! executor.rs - Trade execution for detected arbitrage loops
//!
//! Only a dry-run executor ships here: it walks the loop with a fixed stake
//! and reports what each conversion would yield, without placing orders.

use async_trait::async_trait;
use log::info;
use rust_decimal::Decimal;

use crate::models::{ArbitrageLoop, TradeLeg, TradeReceipt};

/// Trait defining the interface for trade executors
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    /// Carry out every conversion of the loop in order
    async fn execute(&self, opportunity: &ArbitrageLoop) -> anyhow::Result<TradeReceipt>;
}

/// Simulates a loop with decimal arithmetic and logs each leg.
#[derive(Debug, Clone)]
pub struct DryRunExecutor {
    stake: Decimal,
}

impl DryRunExecutor {
    pub fn new(stake: Decimal) -> Self {
        DryRunExecutor { stake }
    }

    pub fn stake(&self) -> Decimal {
        self.stake
    }

    /// Convert the stake hop by hop through the loop.
    pub fn simulate(&self, opportunity: &ArbitrageLoop) -> anyhow::Result<TradeReceipt> {
        let mut legs = Vec::with_capacity(opportunity.hop_count());
        let mut amount = self.stake;

        for (pair, &rate) in opportunity.sequence().windows(2).zip(opportunity.rates()) {
            let rate = Decimal::from_f64_retain(rate).ok_or_else(|| {
                anyhow::anyhow!("rate {} for {}->{} is not representable", rate, pair[0], pair[1])
            })?;
            let amount_out = amount
                .checked_mul(rate)
                .ok_or_else(|| anyhow::anyhow!("amount overflow on {}->{}", pair[0], pair[1]))?;

            legs.push(TradeLeg {
                from: pair[0].clone(),
                to: pair[1].clone(),
                rate,
                amount_in: amount,
                amount_out,
            });
            amount = amount_out;
        }

        Ok(TradeReceipt {
            legs,
            amount_in: self.stake,
            amount_out: amount,
            profit: amount - self.stake,
            executed_at: chrono::Utc::now(),
        })
    }
}

#[async_trait]
impl TradeExecutor for DryRunExecutor {
    async fn execute(&self, opportunity: &ArbitrageLoop) -> anyhow::Result<TradeReceipt> {
        let receipt = self.simulate(opportunity)?;

        info!("Dry run: {}", opportunity.format_path());
        for leg in &receipt.legs {
            info!(
                "   {:.6} {} -> {:.6} {} @ {}",
                leg.amount_in, leg.from, leg.amount_out, leg.to, leg.rate
            );
        }
        if let Some(start) = opportunity.start() {
            info!(
                "Dry run result: {:.6} -> {:.6} {} (profit {:.6})",
                receipt.amount_in, receipt.amount_out, start, receipt.profit
            );
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use rust_decimal_macros::dec;

    fn two_hop() -> ArbitrageLoop {
        ArbitrageLoop::new(
            vec![Currency::new("A"), Currency::new("B"), Currency::new("A")],
            vec![2.0, 0.75],
            1.5,
        )
    }

    #[test]
    fn test_simulate_legs() {
        let receipt = DryRunExecutor::new(dec!(100)).simulate(&two_hop()).unwrap();

        assert_eq!(receipt.legs.len(), 2);
        assert_eq!(receipt.legs[0].amount_out, dec!(200));
        assert_eq!(receipt.legs[1].amount_in, dec!(200));
        assert_eq!(receipt.amount_out, dec!(150));
        assert_eq!(receipt.profit, dec!(50));
    }

    #[tokio::test]
    async fn test_execute_returns_receipt() {
        let executor = DryRunExecutor::new(dec!(10));
        let receipt = executor.execute(&two_hop()).await.unwrap();

        assert_eq!(receipt.amount_in, executor.stake());
        assert_eq!(receipt.legs[1].to.as_str(), "A");
        assert!(receipt.profit > Decimal::ZERO);
    }
}
