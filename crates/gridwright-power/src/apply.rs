//! Commit step: writes a [`DispatchResult`] back into the world.
//!
//! Resolution itself never mutates anything. This is the one place that
//! does, so a host can inspect a result before deciding to commit it.

use std::collections::BTreeMap;

use gridwright_core::entity::EntityStore;
use gridwright_core::fixed::Fixed64;
use gridwright_core::id::{EntityId, PlayerId};
use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchResult;

/// Running totals for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAccount {
    pub balance: Fixed64,
    pub energy_sold_kwh: Fixed64,
}

/// Where income and sales are credited.
pub trait PlayerLedger {
    fn credit_income(&mut self, player: PlayerId, amount: Fixed64);
    fn record_energy_sold(&mut self, player: PlayerId, kwh: Fixed64);
}

impl PlayerLedger for BTreeMap<PlayerId, PlayerAccount> {
    fn credit_income(&mut self, player: PlayerId, amount: Fixed64) {
        let account = self.entry(player).or_default();
        account.balance = account.balance.saturating_add(amount);
    }

    fn record_energy_sold(&mut self, player: PlayerId, kwh: Fixed64) {
        let account = self.entry(player).or_default();
        account.energy_sold_kwh = account.energy_sold_kwh.saturating_add(kwh);
    }
}

/// What an apply pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub fuel_updates: usize,
    pub players_credited: usize,
    /// Plant ids in the result that no longer resolve to a tanked plant.
    pub skipped: Vec<EntityId>,
}

/// Commit fuel levels and player credits from a resolution.
pub fn apply_dispatch(
    store: &mut EntityStore,
    ledger: &mut impl PlayerLedger,
    result: &DispatchResult,
) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for (&plant, &level) in &result.current_fuel_storage_by_plant_id {
        match store.set_fuel(plant, level) {
            Ok(()) => summary.fuel_updates += 1,
            Err(e) => {
                log::warn!("skipping fuel update for {plant:?}: {e}");
                summary.skipped.push(plant);
            }
        }
    }

    for (&player, &income) in &result.income_per_player {
        ledger.credit_income(player, income);
        summary.players_credited += 1;
    }
    for (&player, &kwh) in &result.power_sold_per_player_kwh {
        ledger.record_energy_sold(player, kwh);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use crate::dispatch::resolve;
    use crate::view::PowerSnapshot;
    use gridwright_core::test_utils::*;
    use gridwright_spatial::HexGrid;

    const OWNER: PlayerId = PlayerId(7);

    fn fuel_of(store: &EntityStore, id: EntityId) -> Fixed64 {
        store
            .get(id)
            .and_then(|e| e.as_plant())
            .and_then(|p| p.fuel)
            .map(|f| f.current)
            .unwrap()
    }

    #[test]
    fn apply_commits_fuel_and_income() {
        let mut store = EntityStore::new();
        let plant = store.insert(coal_plant(Some(OWNER), hex(0, -1), 100.0, 0.1, 0.5, 40.0));
        store.insert(pole_at(Some(OWNER), north(0, 0)));
        let map = map_with_population(&[(hex(0, 0), 1)]);
        let result = resolve(&PowerSnapshot::capture(&store), &map, &DispatchConfig::default());

        let mut ledger: BTreeMap<PlayerId, PlayerAccount> = BTreeMap::new();
        let summary = apply_dispatch(&mut store, &mut ledger, &result);

        assert_eq!(summary.fuel_updates, 1);
        assert_eq!(summary.players_credited, 1);
        assert!(summary.skipped.is_empty());
        assert_eq!(fuel_of(&store, plant), fixed(35.0));
        let account = ledger[&OWNER];
        assert_eq!(account.balance, fixed(10.0) * fixed(0.1));
        assert_eq!(account.energy_sold_kwh, fixed(10.0));
    }

    #[test]
    fn repeated_cycles_accumulate() {
        let mut store = EntityStore::new();
        let plant = store.insert(coal_plant(Some(OWNER), hex(0, -1), 100.0, 0.1, 1.0, 25.0));
        store.insert(pole_at(Some(OWNER), north(0, 0)));
        let map = map_with_population(&[(hex(0, 0), 1)]);
        let mut ledger: BTreeMap<PlayerId, PlayerAccount> = BTreeMap::new();

        for _ in 0..3 {
            let result =
                resolve(&PowerSnapshot::capture(&store), &map, &DispatchConfig::default());
            apply_dispatch(&mut store, &mut ledger, &result);
        }
        // 25 - 3 * 10, floored at zero.
        assert_eq!(fuel_of(&store, plant), Fixed64::ZERO);
        assert_eq!(ledger[&OWNER].energy_sold_kwh, fixed(30.0));

        // Out of fuel: the fourth cycle sells nothing.
        let result = resolve(&PowerSnapshot::capture(&store), &map, &DispatchConfig::default());
        assert!(result.income_per_player.is_empty());
    }

    #[test]
    fn removed_plants_are_skipped() {
        let mut store = EntityStore::new();
        let plant = store.insert(coal_plant(None, hex(3, 3), 100.0, 0.1, 0.5, 40.0));
        let result = resolve(
            &PowerSnapshot::capture(&store),
            &HexGrid::new(),
            &DispatchConfig::default(),
        );
        store.remove(plant);

        let mut ledger: BTreeMap<PlayerId, PlayerAccount> = BTreeMap::new();
        let summary = apply_dispatch(&mut store, &mut ledger, &result);
        assert_eq!(summary.fuel_updates, 0);
        assert_eq!(summary.skipped, vec![plant]);
        assert!(ledger.is_empty());
    }
}
