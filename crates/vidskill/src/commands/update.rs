use crate::session;
use colored::Colorize;
use vidskill_core::{UpdateTarget, orchestrator};

pub async fn handle(target: UpdateTarget) -> anyhow::Result<()> {
    let ctx = session::connect().await?;
    let what = match target {
        UpdateTarget::Lambda => "lambda",
        UpdateTarget::WebPlayer => "web player",
        UpdateTarget::Stacks => "stacks",
    };
    println!("{} {}", "Updating".blue().bold(), what.cyan());

    orchestrator::update(&ctx, target).await?;

    println!("{}", format!("Updated {}", what).green());
    Ok(())
}
