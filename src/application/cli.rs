#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CareerGoal;
use crate::domain::models::ClientError;
use crate::domain::models::StudentProfile;
use crate::domain::services::ResumeSubmission;
use crate::domain::services::SessionStore;
use crate::domain::services::StudentFetcher;
use crate::infrastructure::backends::BackendManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- 1-9 - Open a page from the navigation bar.
- h - Go to the home page.
- r - Reload your student record.
- m - Load job market data on the career explorer.
- Up/Down/Enter - Select and complete skills on the learning path.
- CTRL+S - Analyze the resume in the form.
- Esc - Dismiss a notification, or leave the current page.
- q / CTRL+C - Exit PathfinderAI.
        "#;

    return text.trim().to_string();
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn read_resume(file: Option<&String>) -> Result<String> {
    if let Some(file) = file {
        return Ok(fs::read_to_string(file).await?);
    }

    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;

    return Ok(text);
}

/// Loads the persisted session, failing when there isn't one.
async fn active_session() -> Result<(SessionStore, String)> {
    let session = SessionStore::load_default().await;
    let student_id = match session.get() {
        Some(student_id) => student_id.to_string(),
        None => bail!("No active session. Run `pathfinder analyze` to get started."),
    };

    return Ok((session, student_id));
}

/// Clears the session when the backend no longer knows the student, then
/// hands the error back.
async fn settle_update(
    session: &mut SessionStore,
    student_id: &str,
    res: Result<(), ClientError>,
) -> Result<()> {
    StudentFetcher::settle(session, student_id, &res).await?;
    if let Err(ClientError::InvalidSession(_)) = res {
        bail!("Student {student_id} was not found. The session has been cleared.");
    }
    res?;

    return Ok(());
}

async fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let text = read_resume(matches.get_one::<String>("file")).await?;
    let backend = BackendManager::get()?;
    let mut session = SessionStore::load_default().await;

    let analyzed = ResumeSubmission::default()
        .submit(backend.as_ref(), &mut session, &text)
        .await
        .map_err(|err| return anyhow::anyhow!(err.submission_message()))?;

    eprintln!(
        "{}",
        Paint::green(format!("Resume analyzed. Student ID: {}", analyzed.student_id))
    );
    println!("{}", serde_json::to_string_pretty(&analyzed.record)?);

    return Ok(());
}

async fn run_student() -> Result<()> {
    let backend = BackendManager::get()?;
    let mut session = SessionStore::load_default().await;

    let student_id = session.get().map(|e| return e.to_string());
    let res =
        StudentFetcher::fetch_student_data(backend.as_ref(), &mut session, &CancellationToken::new())
            .await;

    match res {
        Ok(Some(record)) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Ok(None) => {
            bail!("No active session. Run `pathfinder analyze` to get started.");
        }
        Err(ClientError::InvalidSession(_)) => {
            bail!(
                "Student {} was not found. The session has been cleared.",
                student_id.unwrap_or_default()
            );
        }
        Err(err) => return Err(err.into()),
    }

    return Ok(());
}

async fn run_session(matches: &ArgMatches) -> Result<()> {
    let mut session = SessionStore::load_default().await;

    match matches.subcommand() {
        Some(("clear", _)) => {
            session.clear().await?;
            println!("Session cleared");
        }
        Some(("path", _)) => {
            println!("{}", session.file_path().to_string_lossy());
        }
        _ => match session.get() {
            Some(student_id) => println!("{student_id}"),
            None => println!("No active session"),
        },
    }

    return Ok(());
}

async fn run_progress(matches: &ArgMatches) -> Result<()> {
    let skill = match matches.get_one::<String>("skill") {
        Some(skill) => skill,
        None => bail!("A skill is required"),
    };

    let (mut session, student_id) = active_session().await?;
    let backend = BackendManager::get()?;
    let res = backend.update_progress(&student_id, skill).await;
    settle_update(&mut session, &student_id, res).await?;

    println!("Marked {skill} as complete");
    return Ok(());
}

fn profile_from_matches(matches: &ArgMatches) -> StudentProfile {
    let get = |name: &str| return matches.get_one::<String>(name).cloned();

    return StudentProfile {
        name: get("name"),
        email: get("email"),
        education: get("education"),
        career_goal: get("career-goal").map(|title| {
            return CareerGoal {
                title,
                reason: get("career-reason"),
            };
        }),
    };
}

async fn run_profile(matches: &ArgMatches) -> Result<()> {
    let set_matches = match matches.subcommand() {
        Some(("set", set_matches)) => set_matches,
        _ => {
            subcommand_profile().print_long_help()?;
            return Ok(());
        }
    };

    let profile = profile_from_matches(set_matches);
    if profile.is_empty() {
        bail!("Nothing to update. Pass at least one of --name, --email, --education or --career-goal.");
    }

    let (mut session, student_id) = active_session().await?;
    let backend = BackendManager::get()?;
    let res = backend.update_profile(&student_id, &profile).await;
    settle_update(&mut session, &student_id, res).await?;

    println!("Profile updated");
    return Ok(());
}

async fn run_resources(matches: &ArgMatches) -> Result<()> {
    let skill = match matches.get_one::<String>("skill") {
        Some(skill) => skill,
        None => bail!("A skill is required"),
    };

    let resources = BackendManager::get()?.get_resources(skill).await?;
    if resources.is_empty() {
        println!("No resources found for {skill}");
        return Ok(());
    }

    for resource in resources {
        println!("- {} ({}) {}", resource.title, resource.kind, resource.url);
    }

    return Ok(());
}

async fn run_market() -> Result<()> {
    let market_data = BackendManager::get()?.get_market_data().await?;
    println!("{}", serde_json::to_string_pretty(&market_data)?);

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for PathfinderAI")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running PathfinderAI with environment variable RUST_LOG=pathfinder")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_analyze() -> Command {
    return Command::new("analyze")
        .about("Analyze a resume without starting the UI. Reads from stdin when no file is given.")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Path to a plain text resume.")
                .num_args(1),
        );
}

fn subcommand_session() -> Command {
    return Command::new("session")
        .about("Inspect or clear the stored session. Prints the current student ID by default.")
        .subcommand(Command::new("show").about("Print the current student ID."))
        .subcommand(Command::new("clear").about("Forget the current student."))
        .subcommand(Command::new("path").about("Print the session file path."));
}

fn arg_skill() -> Arg {
    return Arg::new("skill")
        .short('s')
        .long("skill")
        .help("Skill name as it appears in your learning path.")
        .num_args(1)
        .required(true);
}

fn subcommand_profile() -> Command {
    let field = |name: &'static str, help: &'static str| {
        return Arg::new(name).long(name).help(help).num_args(1);
    };

    return Command::new("profile")
        .about("Manage your student profile.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("set")
                .about("Update profile fields. Fields that aren't passed are left out of the update.")
                .arg(field("name", "Your full name."))
                .arg(field("email", "Your email address."))
                .arg(field("education", "Your highest education."))
                .arg(field("career-goal", "The career you are working towards."))
                .arg(
                    field("career-reason", "Why you chose your career goal.")
                        .requires("career-goal"),
                ),
        );
}

pub fn build() -> Command {
    let hotkeys_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(line.to_string()).underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("pathfinder")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_analyze())
        .subcommand(Command::new("student").about("Print your current student record as JSON."))
        .subcommand(subcommand_session())
        .subcommand(
            Command::new("progress")
                .about("Mark a learning path skill as complete.")
                .arg(arg_skill()),
        )
        .subcommand(subcommand_profile())
        .subcommand(
            Command::new("resources")
                .about("List learning resources for a skill.")
                .arg(arg_skill().help("Skill to look up.")),
        )
        .subcommand(Command::new("market").about("Print job market data as JSON."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("PATHFINDER_API_URL")
                .num_args(1)
                .help(format!("Base URL of the PathfinderAI API. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckTimeout.to_string())
                .long(ConfigKey::HealthCheckTimeout.to_string())
                .env("PATHFINDER_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before giving up on the startup health check. [default: {}]", Config::default(ConfigKey::HealthCheckTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("PATHFINDER_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for any API request to complete. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionFile.to_string())
                .long(ConfigKey::SessionFile.to_string())
                .env("PATHFINDER_SESSION_FILE")
                .num_args(1)
                .help(format!("Where the current student ID is stored. [default: {}]", Config::default(ConfigKey::SessionFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("PATHFINDER_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        );
}

/// Handles subcommands. Returns true when the UI should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir()
                        .unwrap_or_default()
                        .join("pathfinder/debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        Some((name, subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;

            match name {
                "analyze" => run_analyze(subcmd_matches).await?,
                "student" => run_student().await?,
                "session" => run_session(subcmd_matches).await?,
                "progress" => run_progress(subcmd_matches).await?,
                "profile" => run_profile(subcmd_matches).await?,
                "resources" => run_resources(subcmd_matches).await?,
                "market" => run_market().await?,
                _ => {
                    build().print_long_help()?;
                }
            }

            return Ok(false);
        }
        None => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
