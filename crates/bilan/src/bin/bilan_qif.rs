//! bilan-qif - Export a ledger as QIF.

fn main() -> std::process::ExitCode {
    bilan::cmd::qif_cmd::main()
}
