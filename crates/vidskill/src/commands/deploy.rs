use crate::commands::status::print_report;
use crate::session;
use colored::Colorize;
use vidskill_core::orchestrator;

pub async fn handle() -> anyhow::Result<()> {
    let ctx = session::connect().await?;
    println!(
        "{} {}",
        "Deploying".blue().bold(),
        ctx.project.project_name.cyan()
    );

    let report = orchestrator::deploy(&ctx).await?;

    println!();
    println!("{}", "Deployment complete".green().bold());
    print_report(&report);
    Ok(())
}
