//! Primary-axis space distribution.
//!
//! Surplus space is shared among stretchy children in proportion to their
//! stretch weights; a deficit is taken from children in proportion to how far
//! they sit above their minimum. Both directions use the same freeze loop:
//! children that would cross a bound are pinned to it, and the space they
//! could not absorb is handed to the remaining children on the next pass.
//! Children pinned in the same pass are frozen together, in insertion order.

use crate::config::LayoutConfig;

/// One participant in a distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistributionItem {
    /// Natural extent, already clamped to `[min, max]`.
    pub natural: f32,
    pub min: f32,
    pub max: f32,
    /// Stretch weight. Zero means the item never grows.
    pub weight: f32,
}

/// Result of a distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    /// Final extent per item, in input order.
    pub sizes: Vec<f32>,
    /// Space left after placing every item. Negative when the items overflow.
    pub leftover: f32,
}

/// Split `available` among `items`.
pub fn distribute(items: &[DistributionItem], available: f32, config: &LayoutConfig) -> Distribution {
    let natural_total: f32 = items.iter().map(|i| i.natural).sum();
    let slack = available - natural_total;

    let sizes = if slack > config.epsilon && items.iter().any(|i| i.weight > 0.0) {
        grow(items, available, config)
    } else if slack < -config.epsilon {
        shrink(items, available, config)
    } else {
        items.iter().map(|i| i.natural).collect()
    };

    let leftover = available - sizes.iter().sum::<f32>();
    Distribution { sizes, leftover }
}

fn grow(items: &[DistributionItem], available: f32, config: &LayoutConfig) -> Vec<f32> {
    let mut sizes: Vec<f32> = items.iter().map(|i| i.natural).collect();
    let mut frozen: Vec<bool> = items
        .iter()
        .map(|i| i.weight <= 0.0 || i.natural >= i.max)
        .collect();

    let mut settled = false;
    for pass in 0..config.max_distribution_passes {
        let total_weight: f32 = items
            .iter()
            .zip(&frozen)
            .filter(|&(_, &f)| !f)
            .map(|(i, _)| i.weight)
            .sum();
        if total_weight <= 0.0 {
            settled = true;
            break;
        }

        let used: f32 = items
            .iter()
            .zip(&frozen)
            .zip(&sizes)
            .map(|((i, &f), &s)| if f { s } else { i.natural })
            .sum();
        let free = available - used;
        if free <= config.epsilon {
            settled = true;
            break;
        }

        let mut clamped = false;
        for (index, item) in items.iter().enumerate() {
            if frozen[index] {
                continue;
            }
            let target = item.natural + free * item.weight / total_weight;
            if target >= item.max {
                sizes[index] = item.max;
                frozen[index] = true;
                clamped = true;
            } else {
                sizes[index] = target;
            }
        }

        tracing::trace!(pass, free, clamped, "grow pass");
        if !clamped {
            settled = true;
            break;
        }
    }

    if !settled {
        tracing::debug!(
            passes = config.max_distribution_passes,
            "growth stopped at the pass limit with space left to hand out"
        );
    }

    sizes
}

fn shrink(items: &[DistributionItem], available: f32, config: &LayoutConfig) -> Vec<f32> {
    let mut sizes: Vec<f32> = items.iter().map(|i| i.natural).collect();
    let mut frozen: Vec<bool> = items
        .iter()
        .map(|i| i.natural - i.min <= 0.0)
        .collect();

    let mut settled = false;
    for pass in 0..config.max_distribution_passes {
        let total_room: f32 = items
            .iter()
            .zip(&frozen)
            .filter(|&(_, &f)| !f)
            .map(|(i, _)| i.natural - i.min)
            .sum();
        if total_room <= 0.0 {
            settled = true;
            break;
        }

        let used: f32 = items
            .iter()
            .zip(&frozen)
            .zip(&sizes)
            .map(|((i, &f), &s)| if f { s } else { i.natural })
            .sum();
        let deficit = used - available;
        if deficit <= config.epsilon {
            settled = true;
            break;
        }

        let mut clamped = false;
        for (index, item) in items.iter().enumerate() {
            if frozen[index] {
                continue;
            }
            let room = item.natural - item.min;
            let target = item.natural - deficit * room / total_room;
            if target <= item.min {
                sizes[index] = item.min;
                frozen[index] = true;
                clamped = true;
            } else {
                sizes[index] = target;
            }
        }

        tracing::trace!(pass, deficit, clamped, "shrink pass");
        if !clamped {
            settled = true;
            break;
        }
    }

    if !settled {
        tracing::debug!(
            passes = config.max_distribution_passes,
            "shrinking stopped at the pass limit with a deficit left"
        );
    }

    sizes
}
