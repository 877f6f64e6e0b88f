//! # Store Configuration
//!
//! Consignment terms and startup options, with environment overrides.
//!
//! ## Environment Variables
//! | Variable                      | Default | Meaning                          |
//! |-------------------------------|---------|----------------------------------|
//! | `BRECHO_TERM_MONTHS`          | 3       | Consignment period in months     |
//! | `BRECHO_EXPIRING_WINDOW_DAYS` | 30      | "Próximo a expirar" window       |
//! | `BRECHO_CREDIT_SHARE_BPS`     | 5000    | Store credit share (bps)         |
//! | `BRECHO_CASH_SHARE_BPS`       | 4000    | Cash share (bps)                 |
//! | `BRECHO_SEED`                 | false   | Load the demo data set at start  |
//!
//! Invalid values are logged and ignored; the default stays in effect.

use std::str::FromStr;

use brecho_core::types::{ConsignmentPolicy, ShareRate};
use tracing::warn;

/// Store configuration.
///
/// ## Example
/// ```rust
/// use brecho_store::StoreConfig;
///
/// let config = StoreConfig::new().seed_demo(true);
/// assert!(config.seed_demo);
/// assert_eq!(config.policy.term_months, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Terms applied to new consignments and statements.
    pub policy: ConsignmentPolicy,

    /// Whether the demo data set is loaded on open.
    /// Default: false
    pub seed_demo: bool,
}

impl StoreConfig {
    /// Creates a configuration with the shop's default terms.
    pub fn new() -> Self {
        StoreConfig::default()
    }

    /// Sets the consignment terms.
    pub fn policy(mut self, policy: ConsignmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets whether demo data is loaded.
    pub fn seed_demo(mut self, seed: bool) -> Self {
        self.seed_demo = seed;
        self
    }

    /// Creates a configuration from environment variables and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = StoreConfig::default();

        if let Some(months) = parse_var::<u32>(&lookup, "BRECHO_TERM_MONTHS") {
            if months > 0 {
                config.policy.term_months = months;
            } else {
                warn!("BRECHO_TERM_MONTHS must be positive, keeping default");
            }
        }

        if let Some(days) = parse_var::<i64>(&lookup, "BRECHO_EXPIRING_WINDOW_DAYS") {
            if days >= 0 {
                config.policy.expiring_window_days = days;
            } else {
                warn!("BRECHO_EXPIRING_WINDOW_DAYS must not be negative, keeping default");
            }
        }

        let credit = parse_var::<u32>(&lookup, "BRECHO_CREDIT_SHARE_BPS");
        let cash = parse_var::<u32>(&lookup, "BRECHO_CASH_SHARE_BPS");
        let credit_bps = credit.unwrap_or(config.policy.credit_share.bps());
        let cash_bps = cash.unwrap_or(config.policy.cash_share.bps());

        // The two shares together may not exceed the sale price.
        if credit_bps.checked_add(cash_bps).is_some_and(|total| total <= 10_000) {
            config.policy.credit_share = ShareRate::from_bps(credit_bps);
            config.policy.cash_share = ShareRate::from_bps(cash_bps);
        } else {
            warn!(
                credit_bps,
                cash_bps, "Supplier shares exceed 100%, keeping defaults"
            );
        }

        if let Some(seed) = lookup("BRECHO_SEED") {
            config.seed_demo = matches!(seed.trim(), "1" | "true" | "yes");
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = StoreConfig::from_lookup(lookup(&[]));
        assert_eq!(config.policy, ConsignmentPolicy::default());
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("BRECHO_TERM_MONTHS", "2"),
            ("BRECHO_EXPIRING_WINDOW_DAYS", "15"),
            ("BRECHO_CREDIT_SHARE_BPS", "4500"),
            ("BRECHO_SEED", "true"),
        ]));
        assert_eq!(config.policy.term_months, 2);
        assert_eq!(config.policy.expiring_window_days, 15);
        assert_eq!(config.policy.credit_share.bps(), 4500);
        assert_eq!(config.policy.cash_share.bps(), 4000);
        assert!(config.seed_demo);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("BRECHO_TERM_MONTHS", "0"),
            ("BRECHO_EXPIRING_WINDOW_DAYS", "soon"),
            ("BRECHO_CREDIT_SHARE_BPS", "7000"),
        ]));
        assert_eq!(config.policy, ConsignmentPolicy::default());
    }

    #[test]
    fn test_huge_share_is_ignored() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("BRECHO_CREDIT_SHARE_BPS", "4294967295"),
            ("BRECHO_CASH_SHARE_BPS", "1"),
        ]));
        assert_eq!(config.policy, ConsignmentPolicy::default());

        let config = StoreConfig::from_lookup(lookup(&[("BRECHO_CASH_SHARE_BPS", "4294967295")]));
        assert_eq!(config.policy.cash_share.bps(), 4000);
    }

    #[test]
    fn test_builder() {
        let policy = ConsignmentPolicy {
            term_months: 6,
            ..ConsignmentPolicy::default()
        };
        let config = StoreConfig::new().policy(policy).seed_demo(true);
        assert_eq!(config.policy.term_months, 6);
        assert!(config.seed_demo);
    }
}
