//! Replays a scenario against an in-memory ledger.

use anyhow::Context;
use alloy::primitives::Address;
use chrono::{TimeZone, Utc};
use serde::Serialize;

use yield_assets::{CollateralAsset, MockCollateral, RewardAsset, YieldToken};
use yield_common::config::AppConfig;
use yield_common::types::{DecodedEvent, Timestamp};
use yield_decoders::{YieldFarmDecoder, encode_event};
use yield_engine::{AccrualLedger, Clock, LedgerSnapshot, ManualClock};

use crate::scenario::{Scenario, Step};

type SimLedger = AccrualLedger<MockCollateral, YieldToken, ManualClock>;

/// Result of a single step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub step: String,
    pub timestamp: Timestamp,
    /// `ok`, or the ledger error code.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Amount minted by a successful claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed: Option<String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardBalance {
    pub account: Address,
    pub balance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub genesis_timestamp: Timestamp,
    pub final_timestamp: Timestamp,
    pub outcomes: Vec<StepOutcome>,
    pub snapshot: LedgerSnapshot,
    pub reward_balances: Vec<RewardBalance>,
    /// Ledger events as an indexer would see them, one block per step.
    pub logs: Vec<DecodedEvent>,
}

impl SimulationReport {
    pub fn failed_steps(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }
}

/// Deploy tokens and ledger, fund and approve the scenario accounts.
fn deploy(
    config: &AppConfig,
    scenario: &Scenario,
    clock: ManualClock,
) -> anyhow::Result<SimLedger> {
    let mut collateral = MockCollateral::new(
        config.collateral_address,
        scenario.deployer,
        config.collateral_supply,
    );
    for setup in &scenario.accounts {
        let funding = setup.funding.value()?;
        if !funding.is_zero() {
            collateral
                .transfer(scenario.deployer, setup.address, funding)
                .with_context(|| format!("funding {} with {}", setup.address, funding))?;
        }
        collateral.approve(setup.address, config.ledger_address, setup.approval.value()?);
    }

    let mut reward = YieldToken::new(config.reward_address, scenario.deployer);
    let capability = reward
        .transfer_ownership(scenario.deployer, config.ledger_address)
        .context("granting mint rights to the ledger")?;

    AccrualLedger::new(config.ledger_address, collateral, reward, capability, clock)
        .context("creating ledger")
}

/// Run every step in order. Ledger errors are recorded, not fatal; malformed
/// amounts in the scenario are.
pub fn run(config: &AppConfig, scenario: &Scenario) -> anyhow::Result<SimulationReport> {
    let clock = ManualClock::new(config.genesis_timestamp);
    let mut ledger = deploy(config, scenario, clock.clone())?;
    let decoder = YieldFarmDecoder::new();

    let mut outcomes = Vec::with_capacity(scenario.steps.len());
    let mut logs = Vec::new();

    for (index, step) in scenario.steps.iter().enumerate() {
        let seen = ledger.events().len();
        let mut claimed = None;

        let result = match step {
            Step::Deposit { account, amount } => {
                ledger.deposit_liquidity(*account, amount.value()?)
            }
            Step::Remove { account, amount } => ledger.remove_liquidity(*account, amount.value()?),
            Step::Claim { account } => ledger.claim_yield(*account).map(|minted| {
                claimed = Some(minted.to_string());
            }),
            Step::Approve { account, amount } => {
                let ledger_address = ledger.address();
                ledger
                    .collateral_mut()
                    .approve(*account, ledger_address, amount.value()?);
                Ok(())
            }
            Step::Advance { seconds } => {
                clock.advance(*seconds);
                Ok(())
            }
        };

        let timestamp = clock.now();
        let outcome = match result {
            Ok(()) => StepOutcome {
                index,
                step: step.to_string(),
                timestamp,
                status: "ok".to_string(),
                error: None,
                claimed,
            },
            Err(e) => {
                tracing::info!(index, step = %step, error = %e, "Step rejected");
                StepOutcome {
                    index,
                    step: step.to_string(),
                    timestamp,
                    status: e.code().to_string(),
                    error: Some(e.to_string()),
                    claimed: None,
                }
            }
        };
        outcomes.push(outcome);

        let block_timestamp = Utc
            .timestamp_opt(timestamp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);
        for (log_index, event) in ledger.events()[seen..].iter().enumerate() {
            let log = encode_event(event, ledger.address());
            if let Some(mut decoded) = decoder.decode(&log, index as u64, block_timestamp) {
                decoded.log_index = Some(log_index as u64);
                logs.push(decoded);
            }
        }
    }

    let mut reward_balances: Vec<RewardBalance> = scenario
        .accounts
        .iter()
        .map(|setup| RewardBalance {
            account: setup.address,
            balance: ledger.reward().balance_of(setup.address).to_string(),
        })
        .collect();
    reward_balances.sort_by_key(|b| b.account);

    let report = SimulationReport {
        genesis_timestamp: config.genesis_timestamp,
        final_timestamp: clock.now(),
        outcomes,
        snapshot: ledger.snapshot(),
        reward_balances,
        logs,
    };

    tracing::info!(
        steps = report.outcomes.len(),
        failed = report.failed_steps(),
        events = report.logs.len(),
        total_principal = %report.snapshot.total_principal,
        "Scenario replayed"
    );

    Ok(report)
}
