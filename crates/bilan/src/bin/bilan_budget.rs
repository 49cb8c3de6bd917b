//! bilan-budget - Budget tracking and chart comparison.

fn main() -> std::process::ExitCode {
    bilan::cmd::budget_cmd::main()
}
