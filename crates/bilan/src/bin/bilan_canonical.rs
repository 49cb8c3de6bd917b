//! bilan-canonical - Convert a ledger export to the canonical form.

fn main() -> std::process::ExitCode {
    bilan::cmd::canonical_cmd::main()
}
