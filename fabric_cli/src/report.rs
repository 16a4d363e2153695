//! Human-readable and JSON rendering of calculator output.

use serde::Serialize;

use fabric_core::calculations::area_weight::piece_weight_formula;
use fabric_core::calculations::blend::BlendResult;
use fabric_core::calculations::lint_loss::wash_label;
use fabric_core::calculations::shrinkage::{display_pct, formulas};
use fabric_core::calculations::{CalculationOutput, ShrinkageResult};
use fabric_core::{CalcError, CalcResult, CalculationItem};

const RULE: &str = "═══════════════════════════════════════";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CalcResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_error(error: &CalcError, json: bool) {
    if json {
        if let Ok(text) = serde_json::to_string_pretty(error) {
            eprintln!("{}", text);
            return;
        }
    }
    eprintln!("Error [{}]: {}", error.error_code(), error);
}

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title.to_uppercase());
    println!("{}", RULE);
}

pub fn print_output(item: &CalculationItem, output: &CalculationOutput) {
    banner(item.tool_name());

    match output {
        CalculationOutput::Gsm(r) => {
            println!("  GSM:      {} g/m²", r.gsm_display());
            println!("  Weight:   {} oz/yd²", r.oz_display());
        }
        CalculationOutput::PieceWeight(r) => {
            let (g, kg, lb) = r.display();
            if let CalculationItem::PieceWeight(input) = item {
                println!("  Formula:  {}", piece_weight_formula(input.unit));
            }
            println!("  Weight:   {} g / {} kg / {} lb", g, kg, lb);
        }
        CalculationOutput::Shrinkage(r) => {
            if let CalculationItem::Shrinkage(input) = item {
                let [shrinkage, differential, gsm] = formulas(input.unit);
                println!("  Shrinkage:    {}", shrinkage);
                println!("  Differential: {}", differential);
                println!("  GSM:          {}", gsm);
                println!();
            }
            print_shrinkage(r);
        }
        CalculationOutput::FiberComposition(r) => {
            let (dissolved, residue) = r.display();
            println!("  {:<10} {}%  ({} g dissolved)", r.dissolved.display_name(), dissolved, r.dissolved_weight);
            println!("  {:<10} {}%  ({} g residue)", r.residue.display_name(), residue, r.residue_weight);
        }
        CalculationOutput::LintLoss(r) => {
            println!("  Total loss: {}%  ({} g)", r.total_loss_display(), r.total_lint);
            for wash in r.contributing() {
                println!("  {:<10} {} g  {}%", wash_label(wash.wash), wash.weight, wash.percentage);
            }
        }
        CalculationOutput::Solution(r) => {
            println!("  Chemical: {} g", r.required_display());
            println!();
            println!("  {}", r.instructions);
        }
        CalculationOutput::Dilution(r) => {
            let (chemical, water) = r.display();
            println!("  Chemical: {} ml", chemical);
            println!("  Water:    {} ml", water);
            println!();
            println!("  {}", r.instructions);
        }
        CalculationOutput::Blend(r) => print_blend(r),
        CalculationOutput::YarnCount(r) => {
            let (count, tm) = r.display();
            println!("  Count (Ne):        {}", count);
            println!("  Twist multiplier:  {}", tm);
        }
        CalculationOutput::UnitConversion(r) => {
            println!("  {} -> {}: {} {}", r.from, r.to, r.display(), r.symbol);
        }
    }

    if let Some(error) = output.error() {
        println!();
        println!("  [WARN] {}", error);
    }
    println!("{}", RULE);
}

fn print_shrinkage(r: &ShrinkageResult) {
    println!("Shrinkage:");
    for c in &r.components {
        println!("  {:<10} {:>8} {}", c.component.display_name(), display_pct(c.shrinkage_pct), c.classification.marker());
    }
    println!();
    println!("Differential vs width:");
    for d in &r.differentials {
        println!("  {:<10} {:>8} {}", d.trim.display_name(), d.display(), d.classification.marker());
    }
    println!();
    match r.gsm {
        Some(gsm) => println!("  Auto GSM: {:.1} g/m²", gsm),
        None => println!("  Auto GSM: -"),
    }
    println!();
    println!("  RESULT: {}", if r.has_warning() { "[WARN]" } else { "[OK]" });
}

fn print_blend(r: &BlendResult) {
    let (cotton, polyester) = r.display();
    println!("  Cotton:    {}%", cotton);
    println!("  Polyester: {}%", polyester);
    println!("  Total:     {}", r.total_input);
    println!();
    for row in &r.rows {
        println!("  {:<10} poly {}", row.label, row.display());
    }
}
