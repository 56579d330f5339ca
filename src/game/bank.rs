//! Per-domain scenario pools and the session's sampled subsets

use crate::domain::{CertificationConfig, Player, Scenario};
use rand::rngs::StdRng;
use rand::seq::index;
use std::collections::BTreeMap;

/// Authored scenarios grouped by domain, plus the subset sampled for this
/// session.
///
/// A domain's subset is drawn the first time the domain is visited and then
/// stays fixed, in sampled order, for the rest of the session.
#[derive(Debug)]
pub struct ScenarioBank {
    pools: BTreeMap<u32, Vec<Scenario>>,
    /// Indices into `pools[domain]`, in play order
    selected: BTreeMap<u32, Vec<usize>>,
    per_domain: usize,
    rng: StdRng,
}

impl ScenarioBank {
    pub fn new(pools: BTreeMap<u32, Vec<Scenario>>, per_domain: usize, rng: StdRng) -> Self {
        Self {
            pools,
            selected: BTreeMap::new(),
            per_domain,
            rng,
        }
    }

    /// Build pools for domains `1..=domain_count`; scenarios filed under
    /// other domain numbers are ignored
    pub fn from_config(config: &CertificationConfig, rng: StdRng) -> Self {
        let pools = (1..=config.domain_count)
            .map(|domain| (domain, config.scenarios_for_domain(domain).to_vec()))
            .collect();
        Self::new(pools, config.scoring.scenarios_per_domain as usize, rng)
    }

    pub fn pool_size(&self, domain: u32) -> usize {
        self.pools.get(&domain).map(Vec::len).unwrap_or(0)
    }

    pub fn is_sampled(&self, domain: u32) -> bool {
        self.selected.contains_key(&domain)
    }

    /// The session subset for `domain`, sampling it on first use
    pub fn selection(&mut self, domain: u32) -> Vec<&Scenario> {
        self.ensure_sampled(domain);
        let pool = self.pools.get(&domain);
        self.selected
            .get(&domain)
            .into_iter()
            .flatten()
            .filter_map(|&i| pool.and_then(|p| p.get(i)))
            .collect()
    }

    /// First scenario of the domain's subset the player has not completed
    pub fn next_unplayed(&mut self, domain: u32, player: &Player) -> Option<&Scenario> {
        self.ensure_sampled(domain);
        let pool = self.pools.get(&domain)?;
        self.selected
            .get(&domain)?
            .iter()
            .filter_map(|&i| pool.get(i))
            .find(|scenario| !player.has_completed(scenario.id().as_str()))
    }

    fn ensure_sampled(&mut self, domain: u32) {
        if self.selected.contains_key(&domain) {
            return;
        }
        let available = self.pool_size(domain);
        let count = self.per_domain.min(available);
        let picks = if count > 0 {
            index::sample(&mut self.rng, available, count).into_vec()
        } else {
            Vec::new()
        };
        log::debug!(
            "Sampled {} of {} scenarios for domain {}",
            picks.len(),
            available,
            domain
        );
        self.selected.insert(domain, picks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pool(domain: u32, size: usize) -> Vec<Scenario> {
        (0..size)
            .map(|i| Scenario::new(format!("d{}_s{:02}", domain, i), domain))
            .collect()
    }

    fn bank(per_domain: usize) -> ScenarioBank {
        let mut pools = BTreeMap::new();
        pools.insert(1, pool(1, 12));
        pools.insert(2, pool(2, 3));
        pools.insert(3, Vec::new());
        ScenarioBank::new(pools, per_domain, StdRng::seed_from_u64(7))
    }

    fn ids(selection: &[&Scenario]) -> Vec<String> {
        selection.iter().map(|s| s.id().to_string()).collect()
    }

    #[test]
    fn samples_configured_count_without_replacement() {
        let mut bank = bank(5);
        let picked = ids(&bank.selection(1));

        assert_eq!(picked.len(), 5);
        let mut unique = picked.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn small_pool_is_used_whole() {
        let mut bank = bank(5);
        let mut picked = ids(&bank.selection(2));
        picked.sort();
        assert_eq!(picked, vec!["d2_s00", "d2_s01", "d2_s02"]);
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut bank = bank(5);
        let player = Player::new("p", 100, 100, 3, 0, Vec::new());
        assert!(bank.selection(3).is_empty());
        assert!(bank.next_unplayed(3, &player).is_none());
        assert!(bank.next_unplayed(9, &player).is_none());
    }

    #[test]
    fn subset_is_fixed_once_sampled() {
        let mut bank = bank(4);
        assert!(!bank.is_sampled(1));
        let first = ids(&bank.selection(1));
        let second = ids(&bank.selection(1));
        assert!(bank.is_sampled(1));
        assert_eq!(first, second);
    }

    #[test]
    fn next_unplayed_walks_subset_in_order() {
        let mut bank = bank(3);
        let order = ids(&bank.selection(1));
        let mut player = Player::new("p", 100, 100, 3, 0, Vec::new());

        for expected in &order {
            let next = bank.next_unplayed(1, &player).unwrap().clone();
            assert_eq!(next.id().as_str(), expected);
            player.complete_scenario(next.id());
        }

        assert!(bank.next_unplayed(1, &player).is_none());
    }

    #[test]
    fn same_seed_same_selection() {
        let mut a = bank(5);
        let mut b = bank(5);
        assert_eq!(ids(&a.selection(1)), ids(&b.selection(1)));
    }
}
