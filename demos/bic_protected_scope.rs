//! # BIC Search with a Protected Scope
//!
//! Runs backward elimination under BIC while forcing an exposure term to
//! stay in the model, and uses the keep callback to collect the term
//! count and criterion of every accepted sub-model.
//!
//! Run with: `cargo run --example bic_protected_scope`

use std::sync::Arc;

use backstep::prelude::*;
use faer::{Col, Mat};

fn main() {
    println!("=== BIC Elimination with a Protected Exposure ===\n");

    // y depends on the exposure and one covariate; the other two
    // covariates are noise. The exposure is protected regardless of its
    // contribution.
    let n = 120;
    let mut state = 7u64;
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
        y[i] = 0.5 + 0.8 * x[(i, 0)] + 1.2 * x[(i, 1)] + 0.5 * next();
    }

    let names = vec![
        "exposure".to_string(),
        "age".to_string(),
        "z1".to_string(),
        "z2".to_string(),
    ];
    let data = Arc::new(LinearDataset::new(names, x, y).expect("dataset should build"));
    let model = LinearModel::fit(data).expect("fit should succeed");

    let search = BackwardElimination::builder()
        .criterion(Criterion::Bic)
        .verbosity(1)
        .build();

    let mut trace = TextTrace::new(std::io::stdout());
    let (selection, kept) = search
        .run_with_keep(
            model,
            &Scope::protect(["exposure"]),
            |m, criterion| (m.terms().len(), criterion),
            &mut trace,
        )
        .expect("search should succeed");

    println!("\n{}", selection);
    println!("Selected terms: {:?}", selection.model.terms());

    println!("\nKept models (terms, BIC):");
    for (n_terms, bic) in &kept {
        println!("  {} terms  BIC = {:.4}", n_terms, bic);
    }
}
