use dotenv::dotenv;
use lam_hello::pipeline::run_demo;
use lam_hello::telemetry::init_tracing;
use lam_hello::DemoConfig;
use std::process::ExitCode;
use tracing::error;

async fn run() -> anyhow::Result<()> {
    let config = DemoConfig::from_env()?;
    let stdout = std::io::stdout();
    run_demo(&config, stdout.lock()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    if let Err(err) = init_tracing() {
        eprintln!("warning: tracing disabled: {err}");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(demo) = err.downcast_ref::<lam_hello::DemoError>() {
                error!(kind = demo.kind(), "demo failed");
            }
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
