//! bilan-report - Aggregate a ledger export into a statement.

fn main() -> std::process::ExitCode {
    bilan::cmd::report_cmd::main()
}
