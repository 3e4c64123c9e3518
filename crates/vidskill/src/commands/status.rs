use crate::session;
use colored::Colorize;
use vidskill_core::{StatusReport, orchestrator};

pub async fn handle() -> anyhow::Result<()> {
    let ctx = session::connect().await?;
    let report = orchestrator::status(&ctx).await;
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &StatusReport) {
    if !report.is_deployed() {
        println!("{}", "Not deployed".yellow());
        return;
    }

    for stack in &report.stacks {
        println!();
        match &stack.status {
            Some(status) => println!("{} ({})", stack.name.bold(), status.cyan()),
            None => {
                println!("{} ({})", stack.name.bold(), "not found".yellow());
                continue;
            }
        }

        let id_width = stack
            .resources
            .iter()
            .map(|r| r.logical_id.len())
            .max()
            .unwrap_or(0)
            .max("LOGICAL ID".len());
        let type_width = stack
            .resources
            .iter()
            .map(|r| r.resource_type.len())
            .max()
            .unwrap_or(0)
            .max("TYPE".len());
        let status_width = stack
            .resources
            .iter()
            .map(|r| r.status.len())
            .max()
            .unwrap_or(0)
            .max("STATUS".len());

        println!(
            "  {:<id_width$}  {:<type_width$}  {:<status_width$}  PHYSICAL ID",
            "LOGICAL ID", "TYPE", "STATUS"
        );
        for r in &stack.resources {
            println!(
                "  {:<id_width$}  {:<type_width$}  {:<status_width$}  {}",
                r.logical_id,
                r.resource_type,
                r.status,
                r.physical_id.as_deref().unwrap_or("-")
            );
        }
    }

    println!();
    match &report.skill_id {
        Some(id) => println!("{} {}", "Skill:".bold(), id.green()),
        None => println!("{} {}", "Skill:".bold(), "not created".yellow()),
    }
}
