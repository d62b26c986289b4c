//! Compute-budget instruction construction and priority-fee parsing
//! (spec §4.5 step 3, §9 "priority-fee unit").

use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;

/// `sol * 10^12`, the contract this crate follows for converting a
/// SOL-denominated priority fee into micro-lamports per compute unit
/// (spec §9: "compute-unit price is in micro-lamports per compute unit;
/// the SOL-denominated input is converted as `sol * 10^12`").
const SOL_TO_MICRO_LAMPORTS_PER_CU: f64 = 1_000_000_000_000.0;

/// Parses a task's `priority_fee_sol` field into micro-lamports per
/// compute unit. `"default"` and `""` both map to the default rate.
pub fn parse_priority_fee_micro_lamports(priority_fee_sol: &str) -> u64 {
    let trimmed = priority_fee_sol.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default") {
        return crate::consts::DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS;
    }
    match trimmed.parse::<f64>() {
        Ok(sol) if sol >= 0.0 => (sol * SOL_TO_MICRO_LAMPORTS_PER_CU).round() as u64,
        _ => crate::consts::DEFAULT_COMPUTE_UNIT_PRICE_MICRO_LAMPORTS,
    }
}

/// Builds the compute-unit-limit and compute-unit-price instructions
/// (spec §4.5 step 3). A zero limit falls back to the default.
pub fn build_priority_instructions(compute_unit_limit: u32, priority_fee_sol: &str) -> Vec<Instruction> {
    let limit = if compute_unit_limit == 0 {
        crate::consts::DEFAULT_COMPUTE_UNIT_LIMIT
    } else {
        compute_unit_limit
    };
    let price = parse_priority_fee_micro_lamports(priority_fee_sol);

    vec![
        ComputeBudgetInstruction::set_compute_unit_limit(limit),
        ComputeBudgetInstruction::set_compute_unit_price(price),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_string_maps_to_five_thousand_micro_lamports() {
        assert_eq!(parse_priority_fee_micro_lamports("default"), 5_000);
    }

    #[test]
    fn empty_string_maps_to_default() {
        assert_eq!(parse_priority_fee_micro_lamports(""), 5_000);
    }

    #[test]
    fn numeric_sol_value_scales_by_10_to_the_12() {
        assert_eq!(parse_priority_fee_micro_lamports("0.000001"), 1_000_000);
    }

    #[test]
    fn zero_compute_unit_limit_falls_back_to_default() {
        let instructions = build_priority_instructions(0, "default");
        assert_eq!(instructions.len(), 2);
    }
}
