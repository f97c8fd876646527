//! Saved/watched lots: append-only price history, notes and sorting.

use serde::{Deserialize, Serialize};

use super::entities::Settings;
use crate::util::unix_now;

/// Derived lot key.
///
/// Known weakness: two different lots of the same vehicle at the same bid
/// collide (both at $0 is common on fresh listings). Kept to preserve the
/// existing dedup semantics; a site-provided lot number would be the real
/// fix.
pub fn lot_id(year: &str, make: &str, model: &str, current_bid: i64) -> String {
    format!("{year}_{make}_{model}_{current_bid}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// One observed bid, appended whenever the price moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: i64,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotNote {
    pub text: String,
    pub timestamp: u64,
}

/// Fields captured from an auction listing when the user saves it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LotSeed {
    pub year: String,
    pub make: String,
    pub model: String,
    pub current_bid: i64,
    pub scrap_value: i64,
    pub profit: i64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedLot {
    pub id: String,
    pub year: String,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub title: Option<String>,
    pub current_bid: i64,
    pub scrap_value: i64,
    pub profit: i64,
    /// Set once when first saved, survives re-saves.
    pub saved_at: u64,
    pub last_checked: u64,
    pub price_history: Vec<PriceSample>,
    #[serde(default)]
    pub notes: Vec<LotNote>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotSort {
    SavedAt,
    Profit,
    Price,
    ScrapValue,
}

/// In-memory collection of saved lots, persisted via `util::persistence`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LotStore {
    lots: Vec<SavedLot>,
}

impl LotStore {
    pub fn lots(&self) -> &[SavedLot] {
        &self.lots
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SavedLot> {
        self.lots.iter().find(|lot| lot.id == id)
    }

    pub fn is_saved(&self, year: &str, make: &str, model: &str, current_bid: i64) -> bool {
        let id = lot_id(year, make, model, current_bid);
        self.lots.iter().any(|lot| lot.id == id)
    }

    /// Saves or re-saves a lot. A re-save refreshes the analysis fields and
    /// reseeds the price history, but keeps the original save time and any
    /// notes.
    pub fn save(&mut self, seed: LotSeed) -> &SavedLot {
        let id = lot_id(&seed.year, &seed.make, &seed.model, seed.current_bid);
        let now = unix_now();
        let lot = SavedLot {
            id: id.clone(),
            year: seed.year,
            make: seed.make,
            model: seed.model,
            title: seed.title,
            current_bid: seed.current_bid,
            scrap_value: seed.scrap_value,
            profit: seed.profit,
            saved_at: now,
            last_checked: now,
            price_history: vec![PriceSample {
                price: seed.current_bid,
                timestamp: now,
            }],
            notes: Vec::new(),
        };

        if let Some(position) = self.lots.iter().position(|existing| existing.id == id) {
            let existing = &self.lots[position];
            let updated = SavedLot {
                saved_at: existing.saved_at,
                notes: existing.notes.clone(),
                ..lot
            };
            self.lots[position] = updated;
            &self.lots[position]
        } else {
            self.lots.push(lot);
            self.lots.last().expect("just pushed")
        }
    }

    /// Records a freshly observed bid. The price history grows only when
    /// the bid actually changed; `last_checked` always advances.
    pub fn update(&mut self, id: &str, new_bid: i64) -> Option<&SavedLot> {
        let lot = self.lots.iter_mut().find(|lot| lot.id == id)?;
        let now = unix_now();
        if lot.price_history.last().map(|sample| sample.price) != Some(new_bid) {
            lot.price_history.push(PriceSample {
                price: new_bid,
                timestamp: now,
            });
        }
        lot.current_bid = new_bid;
        lot.last_checked = now;
        Some(lot)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lots.len();
        self.lots.retain(|lot| lot.id != id);
        self.lots.len() != before
    }

    pub fn add_note(&mut self, id: &str, text: impl Into<String>) -> bool {
        let Some(lot) = self.lots.iter_mut().find(|lot| lot.id == id) else {
            return false;
        };
        lot.notes.push(LotNote {
            text: text.into(),
            timestamp: unix_now(),
        });
        true
    }

    /// A sorted copy; the stored order (insertion order) is untouched.
    pub fn sorted(&self, sort: LotSort) -> Vec<SavedLot> {
        let mut lots = self.lots.clone();
        match sort {
            LotSort::SavedAt => lots.sort_by(|a, b| b.saved_at.cmp(&a.saved_at)),
            LotSort::Profit => lots.sort_by(|a, b| b.profit.cmp(&a.profit)),
            LotSort::Price => lots.sort_by(|a, b| a.current_bid.cmp(&b.current_bid)),
            LotSort::ScrapValue => lots.sort_by(|a, b| b.scrap_value.cmp(&a.scrap_value)),
        }
        lots
    }
}

/// Everything written to the state file between sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub lots: LotStore,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(bid: i64) -> LotSeed {
        LotSeed {
            year: "2014".to_string(),
            make: "HONDA".to_string(),
            model: "ACCORD".to_string(),
            current_bid: bid,
            scrap_value: 620,
            profit: 140,
            title: None,
        }
    }

    #[test]
    fn id_is_derived_and_collision_prone() {
        assert_eq!(lot_id("2014", "HONDA", "ACCORD", 0), "2014_HONDA_ACCORD_0");
        assert_eq!(
            lot_id("2018", "FORD", "F150 PICKUP 2WD", 250),
            "2018_FORD_F150_PICKUP_2WD_250"
        );
        // Two distinct listings of the same vehicle at the same bid collide.
        assert_eq!(
            lot_id("2014", "HONDA", "ACCORD", 0),
            lot_id("2014", "HONDA", "ACCORD", 0)
        );
    }

    #[test]
    fn save_seeds_price_history() {
        let mut store = LotStore::default();
        let lot = store.save(seed(300));
        assert_eq!(lot.price_history.len(), 1);
        assert_eq!(lot.price_history[0].price, 300);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn resave_keeps_saved_at_and_notes() {
        let mut store = LotStore::default();
        let id = store.save(seed(300)).id.clone();
        let original_saved_at = store.get(&id).unwrap().saved_at;
        store.add_note(&id, "frame looks straight");

        let resaved = store.save(seed(300));
        assert_eq!(resaved.saved_at, original_saved_at);
        assert_eq!(resaved.notes.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_appends_history_only_on_change() {
        let mut store = LotStore::default();
        let id = store.save(seed(300)).id.clone();

        store.update(&id, 300);
        assert_eq!(store.get(&id).unwrap().price_history.len(), 1);

        store.update(&id, 450);
        let lot = store.get(&id).unwrap();
        assert_eq!(lot.price_history.len(), 2);
        assert_eq!(lot.current_bid, 450);
        assert_eq!(lot.price_history.last().unwrap().price, 450);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut store = LotStore::default();
        assert!(store.update("nope", 100).is_none());
    }

    #[test]
    fn remove_and_is_saved() {
        let mut store = LotStore::default();
        let id = store.save(seed(300)).id.clone();
        assert!(store.is_saved("2014", "HONDA", "ACCORD", 300));
        assert!(store.remove(&id));
        assert!(!store.is_saved("2014", "HONDA", "ACCORD", 300));
        assert!(!store.remove(&id));
    }

    #[test]
    fn sorted_orders_without_mutating() {
        let mut store = LotStore::default();
        store.save(seed(500));
        let mut other = seed(100);
        other.model = "CIVIC".to_string();
        other.profit = 900;
        other.scrap_value = 450;
        store.save(other);

        let by_profit = store.sorted(LotSort::Profit);
        assert_eq!(by_profit[0].profit, 900);
        let by_price = store.sorted(LotSort::Price);
        assert_eq!(by_price[0].current_bid, 100);
        let by_scrap = store.sorted(LotSort::ScrapValue);
        assert_eq!(by_scrap[0].scrap_value, 620);
        // Insertion order untouched.
        assert_eq!(store.lots()[0].model, "ACCORD");
    }
}
