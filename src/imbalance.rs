use num_traits::ToPrimitive;

use crate::solution::Solution;

/// Calculates the total weight of each section of a labeling.
///
/// Section `l` lands at index `l - 1`; unassigned vertices and labels above
/// `k_section` count toward no section.
pub fn compute_parts_load(labels: &[usize], k_section: usize, weights: &[i64]) -> Vec<i64> {
    let mut loads = vec![0; k_section];

    for (&label, w) in labels.iter().zip(weights) {
        if (1..=k_section).contains(&label) {
            loads[label - 1] += w;
        }
    }

    loads
}

/// Compute imbalance after passing part loads.
///
/// This is the largest relative overload of a section against the ideal load,
/// zero when every section weighs the same.
pub fn compute_imbalance_from_part_loads(part_loads: &[i64]) -> f64 {
    let total_weight: i64 = part_loads.iter().sum();

    let ideal_part_weight = total_weight.to_f64().unwrap_or(0.0) / part_loads.len().to_f64().unwrap_or(1.0);
    if ideal_part_weight == 0.0 {
        return 0.0;
    }

    part_loads
        .iter()
        .map(|part_weight| {
            let part_weight: f64 = part_weight.to_f64().unwrap_or(0.0);
            (part_weight - ideal_part_weight) / ideal_part_weight
        })
        .fold(0.0f64, |acc, dev| acc.max(dev))
}

/// Compute the imbalance of the given labeling.
pub fn imbalance(k_section: usize, labels: &[usize], weights: &[i64]) -> f64 {
    if k_section == 0 {
        return 0.0;
    }

    let part_loads = compute_parts_load(labels, k_section, weights);

    compute_imbalance_from_part_loads(&part_loads)
}

/// Compute the imbalance of a solution with the vertex weights of its graph.
pub fn solution_imbalance(solution: &Solution<'_>) -> f64 {
    imbalance(solution.k_section(), solution.labels(), solution.graph().vertex_weights())
}
