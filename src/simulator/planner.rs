//! Purchase planning for a single trip to the shops.
//!
//! Planning is deterministic: the same gold, capacity and shop access always
//! yield the same plan. Candidates are ordered by cost, most expensive first,
//! with ties kept in catalog declaration order (near shop before far shop).

use crate::economy::{ShopId, ShopItem};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a trip's shopping list is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PurchaseStrategy {
    /// Most expensive affordable items first, then fill with cheaper ones.
    #[default]
    Greedy,
    /// Exhaustive search for the plan that spends the most gold.
    MaxSpend,
    /// Greedy, but once `count_threshold` abaci are planned, skip non-abacus
    /// items costing `price_cutoff` or less.
    AbacusGreedy {
        count_threshold: u32,
        price_cutoff: u32,
    },
}

impl PurchaseStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            PurchaseStrategy::Greedy => "greedy",
            PurchaseStrategy::MaxSpend => "max-spend",
            PurchaseStrategy::AbacusGreedy { .. } => "abacus-greedy",
        }
    }
}

impl FromStr for PurchaseStrategy {
    type Err = String;

    /// Parses the strategy name; abacus parameters are filled in by the caller.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(PurchaseStrategy::Greedy),
            "max-spend" => Ok(PurchaseStrategy::MaxSpend),
            "abacus-greedy" => Ok(PurchaseStrategy::AbacusGreedy {
                count_threshold: 0,
                price_cutoff: 0,
            }),
            other => Err(format!(
                "Purchase strategy must be one of: greedy, max-spend, abacus-greedy (got {other})"
            )),
        }
    }
}

/// Items chosen for one trip, grouped by the shop they are bought at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurchasePlan {
    pub near_items: Vec<ShopItem>,
    pub far_items: Vec<ShopItem>,
}

impl PurchasePlan {
    fn push(&mut self, shop: ShopId, item: ShopItem) {
        match shop {
            ShopId::Near => self.near_items.push(item),
            ShopId::Far => self.far_items.push(item),
        }
    }

    pub fn items_at(&self, shop: ShopId) -> &[ShopItem] {
        match shop {
            ShopId::Near => &self.near_items,
            ShopId::Far => &self.far_items,
        }
    }

    /// All planned items, near shop first.
    pub fn items(&self) -> impl Iterator<Item = &ShopItem> {
        self.near_items.iter().chain(self.far_items.iter())
    }

    pub fn total_cost(&self) -> i64 {
        self.items().map(|item| item.cost as i64).sum()
    }

    pub fn total_items(&self) -> usize {
        self.near_items.len() + self.far_items.len()
    }

    pub fn visits_far_shop(&self) -> bool {
        !self.far_items.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    shop: ShopId,
    item: ShopItem,
}

/// Shelf items from the given shops, sorted by cost descending (stable).
fn sorted_candidates(shops: &[ShopId]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = shops
        .iter()
        .flat_map(|&shop| shop.items().iter().map(move |&item| Candidate { shop, item }))
        .collect();
    candidates.sort_by(|a, b| b.item.cost.cmp(&a.item.cost));
    candidates
}

fn reachable_shops(use_far_shop: bool) -> &'static [ShopId] {
    if use_far_shop {
        &ShopId::ALL
    } else {
        &ShopId::ALL[..1]
    }
}

/// Plan a regular purchase trip with the configured strategy.
pub fn plan_purchase(
    strategy: PurchaseStrategy,
    gold: i64,
    capacity: usize,
    use_far_shop: bool,
) -> PurchasePlan {
    if gold <= 0 || capacity == 0 {
        return PurchasePlan::default();
    }
    let candidates = sorted_candidates(reachable_shops(use_far_shop));

    match strategy {
        PurchaseStrategy::Greedy => plan_greedy(&candidates, gold, capacity, None),
        PurchaseStrategy::MaxSpend => plan_max_spend(&candidates, gold, capacity),
        PurchaseStrategy::AbacusGreedy {
            count_threshold,
            price_cutoff,
        } => plan_greedy(
            &candidates,
            gold,
            capacity,
            Some((count_threshold, price_cutoff)),
        ),
    }
}

/// Plan the walk made right after buying the shop.
///
/// Only one shop is visited: whichever sells the most expensive item that is
/// still affordable. The far shop wins only when strictly more expensive.
pub fn plan_initial_walk(gold: i64, capacity: usize, use_far_shop: bool) -> PurchasePlan {
    if gold <= 0 || capacity == 0 {
        return PurchasePlan::default();
    }
    let max_affordable = |shop: ShopId| {
        shop.items()
            .iter()
            .map(|item| item.cost as i64)
            .filter(|&cost| cost <= gold)
            .max()
    };
    let near_max = max_affordable(ShopId::Near);
    let far_max = if use_far_shop {
        max_affordable(ShopId::Far)
    } else {
        None
    };
    let shop = if far_max > near_max {
        ShopId::Far
    } else {
        ShopId::Near
    };
    plan_greedy(&sorted_candidates(&[shop]), gold, capacity, None)
}

fn plan_greedy(
    candidates: &[Candidate],
    mut gold: i64,
    capacity: usize,
    abacus_rule: Option<(u32, u32)>,
) -> PurchasePlan {
    let mut plan = PurchasePlan::default();
    let mut abaci_in_plan = 0;

    for candidate in candidates {
        let slots_left = capacity - plan.total_items();
        if slots_left == 0 {
            break;
        }

        let is_abacus = abacus_rule.is_some() && candidate.item.is_abacus();
        if let Some((count_threshold, price_cutoff)) = abacus_rule {
            if abaci_in_plan >= count_threshold
                && !is_abacus
                && candidate.item.cost <= price_cutoff
            {
                continue;
            }
        }

        let cost = candidate.item.cost as i64;
        let copies = ((gold / cost).max(0) as usize).min(slots_left);
        for _ in 0..copies {
            plan.push(candidate.shop, candidate.item);
            gold -= cost;
            if is_abacus {
                abaci_in_plan += 1;
            }
        }
    }

    plan
}

/// Depth-first search over copy counts, most copies of the most expensive
/// items tried first. Highest spend wins, then most items.
struct MaxSpendSearch<'a> {
    candidates: &'a [Candidate],
    cheapest: i64,
    selection: Vec<usize>,
    best_cost: i64,
    best_items: usize,
    best_counts: Vec<usize>,
}

impl MaxSpendSearch<'_> {
    fn record(&mut self, current_cost: i64) {
        let total_items: usize = self.selection.iter().sum();
        let better = current_cost > self.best_cost
            || (current_cost == self.best_cost && total_items > self.best_items);
        if better {
            self.best_cost = current_cost;
            self.best_items = total_items;
            self.best_counts.clone_from(&self.selection);
        }
    }

    fn search(&mut self, index: usize, capacity: usize, gold: i64, current_cost: i64) {
        if index >= self.candidates.len() || capacity == 0 || gold < self.cheapest {
            self.record(current_cost);
            return;
        }

        let cost = self.candidates[index].item.cost as i64;
        let max_copies = ((gold / cost) as usize).min(capacity);
        for copies in (0..=max_copies).rev() {
            self.selection[index] = copies;
            let spent = copies as i64 * cost;
            self.search(index + 1, capacity - copies, gold - spent, current_cost + spent);
        }
        self.selection[index] = 0;
    }
}

fn plan_max_spend(candidates: &[Candidate], gold: i64, capacity: usize) -> PurchasePlan {
    let Some(cheapest) = candidates.iter().map(|c| c.item.cost as i64).min() else {
        return PurchasePlan::default();
    };
    let mut search = MaxSpendSearch {
        candidates,
        cheapest,
        selection: vec![0; candidates.len()],
        best_cost: 0,
        best_items: 0,
        best_counts: vec![0; candidates.len()],
    };
    search.search(0, capacity, gold, 0);

    let mut plan = PurchasePlan::default();
    for (candidate, &count) in candidates.iter().zip(&search.best_counts) {
        for _ in 0..count {
            plan.push(candidate.shop, candidate.item);
        }
    }
    plan
}
