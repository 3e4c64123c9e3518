use crate::session;
use colored::Colorize;
use vidskill_core::{SkillAction, orchestrator};

pub async fn handle(action: SkillAction) -> anyhow::Result<()> {
    let ctx = session::connect().await?;
    orchestrator::skill(&ctx, action).await?;

    let done = match action {
        SkillAction::UpdateManifest => "Skill manifest updated",
        SkillAction::WebPlayerLogs(true) => "Web player logging enabled",
        SkillAction::WebPlayerLogs(false) => "Web player logging disabled",
    };
    println!("{}", done.green());
    Ok(())
}
