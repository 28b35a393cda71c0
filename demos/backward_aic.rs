//! # Backward Elimination by AIC
//!
//! Fits a linear model with two real predictors and two pure-noise
//! columns, then runs bounded backward elimination. The search removes
//! the noise columns one at a time and stops at the local AIC optimum,
//! printing each step through the text trace.
//!
//! Run with: `cargo run --example backward_aic`

use std::sync::Arc;

use backstep::prelude::*;
use faer::{Col, Mat};

fn main() {
    println!("=== Backward Elimination by AIC ===\n");

    // Deterministic pseudo-random data: y = 1 + 2*x1 - 1.5*x2 + noise,
    // with n1 and n2 unrelated to the response.
    let n = 80;
    let mut state = 42u64;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut x = Mat::zeros(n, 4);
    let mut y = Col::zeros(n);
    for i in 0..n {
        for j in 0..4 {
            x[(i, j)] = next();
        }
        y[i] = 1.0 + 2.0 * x[(i, 0)] - 1.5 * x[(i, 1)] + 0.4 * next();
    }

    let names = vec![
        "x1".to_string(),
        "x2".to_string(),
        "n1".to_string(),
        "n2".to_string(),
    ];
    let data = Arc::new(LinearDataset::new(names, x, y).expect("dataset should build"));
    let model = LinearModel::fit(data).expect("fit should succeed");

    println!("Full model: y ~ x1 + x2 + n1 + n2 (n1, n2 are noise)\n");

    let search = BackwardElimination::builder()
        .criterion(Criterion::Aic)
        .verbosity(2)
        .build();

    let mut trace = TextTrace::new(std::io::stdout());
    let selection = search
        .run_traced(model, &Scope::none(), &mut trace)
        .expect("search should succeed");

    println!("\n{}", selection);
    println!("Selected terms: {:?}", selection.model.terms());
    println!(
        "AIC: {:.4} -> {:.4}",
        selection.initial_criterion(),
        selection.final_criterion()
    );
}
