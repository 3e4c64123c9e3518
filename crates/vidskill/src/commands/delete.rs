use crate::session;
use colored::Colorize;
use dialoguer::Confirm;
use vidskill_core::orchestrator;

pub async fn handle(yes: bool) -> anyhow::Result<()> {
    let ctx = session::connect().await?;

    if !yes {
        let prompt = format!(
            "Delete the skill, {} and {}? Demo content and uploaded artifacts are removed too",
            ctx.project.lambda_stack_name(),
            ctx.project.artifact_stack_name()
        );
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    orchestrator::delete(&ctx).await?;
    println!("{}", "Deployment deleted".green().bold());
    Ok(())
}
