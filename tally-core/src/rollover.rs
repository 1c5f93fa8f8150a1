//! Monthly rollover: freeze total assets as the baseline for next month's
//! growth figure.

use crate::asset::Asset;
use crate::config::FinancialConfig;
use crate::derive::total_assets_cny;
use crate::month::MonthToken;

/// Advance the snapshot if the calendar month has moved past it.
///
/// Idempotent within a month: once `last_snapshot_month == current`, repeated
/// checks change nothing. The snapshot month never rolls backward, so a config
/// whose snapshot is ahead of the clock is left alone.
///
/// The snapshot uses live balances at the time of the check. If the app was
/// closed across a month boundary, the first evaluation after restart commits
/// whatever the balances are then, not the balances at the boundary itself.
///
/// Returns true when a snapshot was committed.
pub fn check_rollover(config: &mut FinancialConfig, assets: &[Asset], current: MonthToken) -> bool {
    if config.last_snapshot_month >= current {
        return false;
    }
    let total = total_assets_cny(assets, config.usd_cny_rate);
    config.last_month_total_assets = total;
    config.last_snapshot_month = current;
    true
}
