use scoring_core::WeightConfig;

/// Weighted blend of the technical and fundamental scores into the final
/// 0-100 composite. The technical side carries the sum of the four signal
/// weights, the fundamental side the `fundamentals` weight. A zero total
/// weight falls back to the technical score unweighted.
pub fn composite_score(technical: i64, fundamental: i64, weights: &WeightConfig) -> i64 {
    let tech_w = weights.technical_weight();
    let total_w = weights.total_weight();
    if total_w <= 0.0 {
        return technical;
    }

    let fund_w = weights.fundamentals;
    let blended =
        technical as f64 * (tech_w / total_w) + fundamental as f64 * (fund_w / total_w);
    blended.clamp(0.0, 100.0).round() as i64
}
