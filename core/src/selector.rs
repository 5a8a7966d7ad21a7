//! Eligible-target selection.
//!
//! An account is eligible when its status is `active` and, if a whitelist
//! is configured, its id is on it. Order of the result is whatever the
//! store returns and is only ever used for a uniform draw.

use crate::{
    error::SeedResult,
    rng::SeedRng,
    store::{AccountQuery, AlertStore},
    types::AccountId,
};

pub fn select_eligible<S: AlertStore + ?Sized>(
    store: &S,
    whitelist: &[String],
) -> SeedResult<Vec<AccountId>> {
    if !whitelist.is_empty() {
        log::info!("[seed] Filtering by whitelist: {whitelist:?}");
    }
    let query = AccountQuery::eligible(whitelist);
    log::debug!("[seed:debug] Applying filters: {}", query.describe());

    let rows = store.select_accounts(&query)?;
    log::debug!("[seed:debug] Query response data count: {}", rows.len());

    Ok(rows.into_iter().map(|r| r.stripe_account_id).collect())
}

/// Diagnostic read of the whitelisted ids with no status filter, logging each
/// one's status. Failures are logged and swallowed; eligibility never depends
/// on this.
pub fn precheck_whitelist<S: AlertStore + ?Sized>(store: &S, whitelist: &[String]) {
    log::debug!("[seed:debug] Performing pre-check for whitelisted accounts: {whitelist:?}");
    match store.select_accounts(&AccountQuery::by_ids(whitelist)) {
        Ok(rows) if rows.is_empty() => {
            log::debug!("[seed:debug] Whitelisted account(s) not found in pre-check.");
        }
        Ok(rows) => {
            for row in rows {
                log::debug!(
                    "[seed:debug] Pre-check data for {}: status={:?}",
                    row.stripe_account_id,
                    row.status
                );
            }
        }
        Err(e) => log::debug!("[seed:debug] Pre-check query failed: {e}"),
    }
}

/// Uniform pick. `None` when nothing is eligible.
pub fn pick_target<'a>(eligible: &'a [AccountId], rng: &mut SeedRng) -> Option<&'a AccountId> {
    if eligible.is_empty() {
        return None;
    }
    eligible.get(rng.index(eligible.len()))
}
