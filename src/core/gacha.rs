use crate::domain::model::{Budget, MenuItem, MenuSnapshot, Selection};
use rand::seq::SliceRandom;
use rand::Rng;

/// Extra rounds allowed per menu item when zero-priced items exist.
const ZERO_PRICE_ROUNDS_PER_ITEM: usize = 4;

/// Randomized greedy-fit draw.
///
/// Every round reshuffles the whole menu and takes the first item that fits the
/// remaining budget. The draw ends on the first round with no affordable item.
/// Reshuffling each round gives every item the same chance of being considered
/// next regardless of price, which tilts sessions toward many cheap dishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gacha;

impl Gacha {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, budget: Budget, snapshot: &MenuSnapshot) -> Selection {
        self.draw_with_rng(budget, snapshot.items(), &mut rand::thread_rng())
    }

    pub fn draw_with_rng<R: Rng + ?Sized>(
        &self,
        budget: Budget,
        menu: &[MenuItem],
        rng: &mut R,
    ) -> Selection {
        // Own copy per draw; the snapshot itself is never permuted.
        let mut pool: Vec<&MenuItem> = menu.iter().collect();
        let max_hits = round_cap(budget.yen(), menu);

        let mut remaining = budget.yen();
        let mut items = Vec::new();

        loop {
            pool.shuffle(rng);

            let hit = pool.iter().find_map(|item| {
                price_of(item)
                    .filter(|price| *price <= remaining)
                    .map(|price| (*item, price))
            });

            let Some((item, price)) = hit else {
                break;
            };

            // Free hits use up the cap without spending, so on a menu mixing free
            // and paid items the draw may stop while paid items still fit.
            if items.len() >= max_hits {
                tracing::warn!(
                    "Gacha round cap {} reached with {} yen left, stopping draw",
                    max_hits,
                    remaining
                );
                break;
            }

            remaining -= price;
            items.push(item.clone());
        }

        tracing::debug!(
            "Drew {} items for {} yen, {} yen left",
            items.len(),
            budget.yen(),
            remaining
        );

        Selection {
            items,
            spent: budget.yen() - remaining,
            remaining,
        }
    }
}

fn price_of(item: &MenuItem) -> Option<u64> {
    u64::try_from(item.price).ok()
}

/// Upper bound on hits for one draw.
///
/// Positive prices alone bound the draw by `budget / min_price`. Zero-priced
/// items never reduce the budget, so they get a fixed allowance per item.
fn round_cap(budget: u64, menu: &[MenuItem]) -> usize {
    let prices = menu.iter().filter_map(price_of);
    let min_positive = prices.clone().filter(|p| *p > 0).min();
    let has_free = prices.clone().any(|p| p == 0);

    let paid_rounds = match min_positive {
        Some(min) => usize::try_from(budget / min).unwrap_or(usize::MAX),
        None => 0,
    };
    let free_rounds = if has_free {
        menu.len().saturating_mul(ZERO_PRICE_ROUNDS_PER_ITEM)
    } else {
        0
    };

    paid_rounds.saturating_add(free_rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new(1202, "ミラノ風ドリア", 300),
            MenuItem::new(1301, "辛味チキン", 300),
            MenuItem::new(1401, "小エビのサラダ", 350),
            MenuItem::new(2301, "ペペロンチーノ", 400),
            MenuItem::new(3001, "フォッカチオ", 150),
            MenuItem::new(4101, "ティラミス", 300),
            MenuItem::new(5001, "グラスワイン", 100),
            MenuItem::new(2102, "イカの墨入りスパゲッティ", 500),
        ]
    }

    fn assert_budget_consistent(budget: u64, selection: &Selection) {
        let mut remaining = budget;
        for item in &selection.items {
            let price = item.price as u64;
            assert!(price <= remaining, "{} exceeds remaining {}", price, remaining);
            remaining -= price;
        }
        assert_eq!(selection.remaining, remaining);
        assert_eq!(selection.spent + selection.remaining, budget);
    }

    #[test]
    fn test_draw_stays_within_budget() {
        let gacha = Gacha::new();
        let menu = menu();
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let budget = seed * 17;
            let selection = gacha.draw_with_rng(Budget::new(budget), &menu, &mut rng);
            assert_budget_consistent(budget, &selection);
        }
    }

    #[test]
    fn test_draw_exhausts_affordable_items() {
        let gacha = Gacha::new();
        let menu = menu();
        let mut rng = StdRng::seed_from_u64(7);
        let selection = gacha.draw_with_rng(Budget::new(1000), &menu, &mut rng);
        // The draw only stops once nothing fits, so the remainder is below the cheapest item.
        assert!(selection.remaining < 100);
    }

    #[test]
    fn test_empty_menu_yields_nothing() {
        let gacha = Gacha::new();
        let mut rng = StdRng::seed_from_u64(1);
        for budget in [0, 1, 1000, u64::MAX] {
            let selection = gacha.draw_with_rng(Budget::new(budget), &[], &mut rng);
            assert!(selection.is_empty());
            assert_eq!(selection.remaining, budget);
        }
    }

    #[test]
    fn test_all_items_over_budget() {
        let gacha = Gacha::new();
        let mut rng = StdRng::seed_from_u64(2);
        let selection = gacha.draw_with_rng(Budget::new(99), &menu(), &mut rng);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_single_item_uniform_price() {
        let gacha = Gacha::new();
        let menu = vec![MenuItem::new(1, "フォッカチオ", 150)];
        let mut rng = StdRng::seed_from_u64(3);
        let selection = gacha.draw_with_rng(Budget::new(1000), &menu, &mut rng);
        assert_eq!(selection.len(), 1000 / 150);
        assert_eq!(selection.remaining, 1000 % 150);
    }

    #[test]
    fn test_zero_price_item_terminates() {
        let gacha = Gacha::new();
        let menu = vec![MenuItem::new(1, "お水", 0)];
        let mut rng = StdRng::seed_from_u64(4);
        let selection = gacha.draw_with_rng(Budget::new(1000), &menu, &mut rng);
        assert_eq!(selection.len(), ZERO_PRICE_ROUNDS_PER_ITEM);
        assert_eq!(selection.remaining, 1000);
    }

    #[test]
    fn test_zero_price_mixed_menu_terminates() {
        let gacha = Gacha::new();
        let mut menu = menu();
        menu.push(MenuItem::new(9, "お水", 0));
        let mut rng = StdRng::seed_from_u64(5);
        let selection = gacha.draw_with_rng(Budget::new(1000), &menu, &mut rng);
        assert!(selection.len() <= round_cap(1000, &menu));
        assert_budget_consistent(1000, &selection);
    }

    #[test]
    fn test_round_cap_can_leave_affordable_budget() {
        let gacha = Gacha::new();
        let menu = vec![MenuItem::new(1, "お水", 0), MenuItem::new(2, "プチフォッカ", 100)];
        let cap = round_cap(1000, &menu);
        assert_eq!(cap, 10 + 2 * ZERO_PRICE_ROUNDS_PER_ITEM);

        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = gacha.draw_with_rng(Budget::new(1000), &menu, &mut rng);
            assert!(selection.len() <= cap);
            assert_budget_consistent(1000, &selection);
            if selection.remaining > 0 {
                // Only the cap stops a draw that could still afford a paid item.
                assert_eq!(selection.len(), cap);
            }
        }
    }

    #[test]
    fn test_draw_does_not_mutate_snapshot() {
        let gacha = Gacha::new();
        let snapshot = MenuSnapshot::new(menu(), None);
        let before: Vec<_> = snapshot.items().to_vec();
        let _ = gacha.draw(Budget::new(5000), &snapshot);
        assert_eq!(snapshot.items(), before.as_slice());
    }

    #[test]
    fn test_same_seed_same_draw() {
        let gacha = Gacha::new();
        let menu = menu();
        let a = gacha.draw_with_rng(Budget::new(1500), &menu, &mut StdRng::seed_from_u64(11));
        let b = gacha.draw_with_rng(Budget::new(1500), &menu, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_pick_is_uniform_when_everything_fits() {
        // With a budget covering every dish, the first hit is just the head of a
        // uniform shuffle, so each item should lead roughly equally often.
        let gacha = Gacha::new();
        let menu = menu();
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts: HashMap<String, usize> = HashMap::new();
        let trials = 8000;
        for _ in 0..trials {
            let selection = gacha.draw_with_rng(Budget::new(10_000), &menu, &mut rng);
            *counts.entry(selection.items[0].name.clone()).or_default() += 1;
        }
        let expected = trials / menu.len();
        for (name, count) in counts {
            assert!(
                count > expected * 7 / 10 && count < expected * 13 / 10,
                "{} led {} times, expected about {}",
                name,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_round_cap() {
        assert_eq!(round_cap(1000, &[]), 0);
        assert_eq!(round_cap(1000, &[MenuItem::new(1, "a", 300)]), 3);
        assert_eq!(
            round_cap(1000, &[MenuItem::new(1, "a", 300), MenuItem::new(2, "b", 0)]),
            3 + 2 * ZERO_PRICE_ROUNDS_PER_ITEM
        );
    }
}
