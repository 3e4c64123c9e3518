use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};
use vidskill_config::project::{validate_country, validate_locale, validate_project_name};
use vidskill_config::{
    DeployRegion, PROJECT_CONFIG_FILE, PathsConfig, ProjectConfig, SkillCredentials,
};

pub fn handle() -> anyhow::Result<()> {
    println!("{}", "Setting up vidskill".blue().bold());

    let config_path = std::env::current_dir()?.join(PROJECT_CONFIG_FILE);
    let write_project = !config_path.exists()
        || Confirm::new()
            .with_prompt(format!("{} exists. Overwrite it?", config_path.display()))
            .default(false)
            .interact()?;

    if write_project {
        let project = prompt_project()?;
        project.save(&config_path)?;
        println!("{} {}", "Wrote".green(), config_path.display());
    }

    let credentials_path = vidskill_config::credentials_path()?;
    let write_credentials = !credentials_path.exists()
        || Confirm::new()
            .with_prompt("Skill registry credentials exist. Replace them?")
            .default(false)
            .interact()?;

    if write_credentials {
        let credentials = prompt_credentials()?;
        credentials.save(&credentials_path)?;
        println!("{} {}", "Wrote".green(), credentials_path.display());
    }

    println!();
    println!("Next: {}", "vidskill deploy".cyan());
    Ok(())
}

fn prompt_project() -> anyhow::Result<ProjectConfig> {
    let project_name: String = Input::new()
        .with_prompt("Project name")
        .validate_with(|name: &String| {
            validate_project_name(name).map_err(|e| e.to_string())
        })
        .interact_text()?;

    let regions: Vec<&str> = DeployRegion::ALL.iter().map(|r| r.as_str()).collect();
    let region_index = Select::new()
        .with_prompt("AWS region")
        .items(&regions)
        .default(0)
        .interact()?;
    let region = DeployRegion::ALL[region_index];

    let aws_profile: String = Input::new()
        .with_prompt("AWS profile (empty for the default chain)")
        .allow_empty(true)
        .interact_text()?;

    let country: String = Input::new()
        .with_prompt("Country")
        .default("US".to_string())
        .validate_with(|country: &String| validate_country(country).map_err(|e| e.to_string()))
        .interact_text()?;

    let locales: String = Input::new()
        .with_prompt("Locales (comma separated)")
        .default("en-US".to_string())
        .validate_with(|locales: &String| {
            split_list(locales)
                .iter()
                .try_for_each(|l| validate_locale(l))
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let vendor_id: String = Input::new()
        .with_prompt("Skill registry vendor id")
        .validate_with(|id: &String| {
            if id.trim().is_empty() {
                Err("vendor id must not be empty".to_string())
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let skill_name: String = Input::new()
        .with_prompt("Skill name")
        .default(project_name.clone())
        .interact_text()?;

    let content_base_url: String = Input::new()
        .with_prompt("Demo content base URL")
        .validate_with(|url: &String| {
            if url.starts_with("https://") || url.starts_with("http://") {
                Ok(())
            } else {
                Err("must be an http(s) URL".to_string())
            }
        })
        .interact_text()?;

    let project = ProjectConfig {
        skill_name: (skill_name != project_name).then_some(skill_name),
        project_name,
        region,
        aws_profile: (!aws_profile.trim().is_empty()).then(|| aws_profile.trim().to_string()),
        country,
        locales: split_list(&locales),
        vendor_id: vendor_id.trim().to_string(),
        content_base_url,
        paths: PathsConfig::default(),
        migration_timeout_secs: 3600,
    };
    project.validate()?;
    Ok(project)
}

fn prompt_credentials() -> anyhow::Result<SkillCredentials> {
    println!(
        "{}",
        "Skill registry access uses a Login with Amazon security profile".dimmed()
    );
    let client_id: String = Input::new().with_prompt("Client id").interact_text()?;
    let client_secret = Password::new().with_prompt("Client secret").interact()?;
    let refresh_token = Password::new().with_prompt("Refresh token").interact()?;
    Ok(SkillCredentials::new(client_id, client_secret, refresh_token))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
