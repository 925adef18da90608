use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = sympta::run().await {
        eprintln!("sympta: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
