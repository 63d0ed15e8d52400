//! DCP Checker Example
//!
//! Reads statements, one per line, from stdin (or a built-in program when
//! stdin is a terminal) and prints every expression tree with its curvature,
//! sign and DCP violations.
//!
//! ```text
//! RUST_LOG=dcpcheck=debug cargo run --example dcp_check < model.dcp
//! ```

use std::io::{self, BufRead, IsTerminal};

use dcpcheck::prelude::*;
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = "\
variable x y
parameter positive a b c
a * square(x) <= log(y) + b
a * log(x) <= square(y) + b
max(x, y) == (y + square(b))
huber_circ(x, y, 2) + norm(x, Inf) - sqrt(y)
c * square(log(x))
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== DCP Check ===\n");

    let lines: Vec<String> = if io::stdin().is_terminal() {
        PROGRAM.lines().map(str::to_string).collect()
    } else {
        io::stdin().lock().lines().map_while(|l| l.ok()).collect()
    };

    let mut parser = Parser::new();
    for line in &lines {
        match parser.parse(line) {
            Ok(None) => {}
            Ok(Some(expr)) => {
                println!("{line}");
                print_tree(&expr, 1);
                println!();
            }
            Err(e) => println!("{line}\n  error: {e}\n"),
        }
    }

    let certified = parser.statements().iter().filter(|e| e.is_dcp()).count();
    println!(
        "{certified} of {} statements follow the DCP rules.",
        parser.statements().len()
    );
}

fn print_tree(expr: &Expression, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{}  [{}, {}]",
        expr.short_name(),
        expr.curvature(),
        expr.sign()
    );

    let parts = expr.partition_violations();
    for v in &parts.unsorted {
        println!("{indent}  ! {v}");
    }
    for (i, child) in expr.children().iter().enumerate() {
        if let Some(found) = parts.indexed.get(&i) {
            for v in found {
                println!("{indent}  ! {} in '{}'", v.kind(), child.text());
            }
        }
        print_tree(child, depth + 1);
    }
}
