mod commands;
mod session;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use vidskill_core::DeployError;

#[derive(Parser)]
#[command(name = "vidskill")]
#[command(about = "Deploy the video skill reference app to your AWS account", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create vidskill.json and the skill registry credentials
    Init,
    /// Deploy stacks, artifacts, demo content and the skill
    Deploy,
    /// Rebuild and upload one part of a running deployment
    Update(UpdateArgs),
    /// Delete the skill and both stacks
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show stack resources and the skill id
    Status,
    /// Update the skill manifest or toggle web player logging
    Skill(SkillArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct UpdateArgs {
    /// Rebuild the lambda bundle and push it into the function
    #[arg(long)]
    lambda: bool,
    /// Rebuild and upload the web player
    #[arg(long)]
    web_player: bool,
    /// Re-apply both stack templates
    #[arg(long)]
    stacks: bool,
}

#[derive(Args)]
#[group(multiple = false)]
struct SkillArgs {
    /// Turn on web player logging in the skill function
    #[arg(long)]
    enable_web_player_logs: bool,
    /// Turn off web player logging in the skill function
    #[arg(long)]
    disable_web_player_logs: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Version => {
            println!("vidskill {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Init => commands::init::handle(),
        Commands::Deploy => commands::deploy::handle().await,
        Commands::Update(args) => {
            let target = if args.lambda {
                vidskill_core::UpdateTarget::Lambda
            } else if args.web_player {
                vidskill_core::UpdateTarget::WebPlayer
            } else {
                vidskill_core::UpdateTarget::Stacks
            };
            commands::update::handle(target).await
        }
        Commands::Delete { yes } => commands::delete::handle(yes).await,
        Commands::Status => commands::status::handle().await,
        Commands::Skill(args) => {
            let action = if args.enable_web_player_logs {
                vidskill_core::SkillAction::WebPlayerLogs(true)
            } else if args.disable_web_player_logs {
                vidskill_core::SkillAction::WebPlayerLogs(false)
            } else {
                vidskill_core::SkillAction::UpdateManifest
            };
            commands::skill::handle(action).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        let message = match e.downcast_ref::<DeployError>() {
            Some(deploy_error) => deploy_error.user_message(),
            None => format!("{:#}", e),
        };
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(1);
    }
}
