use crate::ledger::Product;

/// Products recommended for a separate reserve so the rest fits the safe threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SetAsideSuggestion<'a> {
    /// Positions into the slice handed to [`SetAsideService::suggest`], largest parcel first.
    pub positions: Vec<usize>,
    pub products: Vec<&'a Product>,
    /// Sum of the selected parcels; never below `target_shortfall`.
    pub total: f64,
    pub target_shortfall: f64,
}

impl SetAsideSuggestion<'_> {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

pub struct SetAsideService;

impl SetAsideService {
    /// Installment load above what the safe threshold allows.
    pub fn target_shortfall(total_load: f64, monthly_profit: f64, safe_percentage: f64) -> f64 {
        total_load - monthly_profit * (safe_percentage / 100.0)
    }

    /// Greedy pick of the largest parcels until they cover the shortfall.
    ///
    /// This favours few, large payments; it is not the minimum-overshoot subset.
    /// Equal parcels keep their original order. Returns `None` when there is
    /// nothing to cover.
    pub fn suggest<'a>(
        active: &[&'a Product],
        monthly_profit: f64,
        safe_percentage: f64,
    ) -> Option<SetAsideSuggestion<'a>> {
        if active.is_empty() {
            return None;
        }
        let total_load: f64 = active.iter().map(|product| product.parcel).sum();
        let target_shortfall = Self::target_shortfall(total_load, monthly_profit, safe_percentage);
        if target_shortfall <= 0.0 {
            return None;
        }

        let mut order: Vec<usize> = (0..active.len()).collect();
        order.sort_by(|&a, &b| active[b].parcel.total_cmp(&active[a].parcel));

        let mut positions = Vec::new();
        let mut total = 0.0;
        for position in order {
            if total >= target_shortfall {
                break;
            }
            total += active[position].parcel;
            positions.push(position);
        }

        let products: Vec<&'a Product> = positions.iter().map(|&pos| active[pos]).collect();
        tracing::debug!(
            picked = products.len(),
            total,
            target_shortfall,
            "computed set-aside suggestion"
        );
        Some(SetAsideSuggestion {
            positions,
            products,
            total,
            target_shortfall,
        })
    }
}
