mod config;
mod poller;
mod render;
mod session;

use config::UiConfig;
use gdclone_core::CloneClient;
use session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliMode {
    Status,
    Login,
    Parse(String),
    Clone(String),
    ShowConfig,
    Help,
}

fn parse_cli_mode<I>(args: I) -> anyhow::Result<CliMode>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().skip(1);
    let mut mode = CliMode::Status;
    while let Some(arg) = args.next() {
        mode = match arg.as_str() {
            "--status" => CliMode::Status,
            "--login" => CliMode::Login,
            "--parse" => {
                let url = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--parse requires a share URL"))?;
                CliMode::Parse(url)
            }
            "--clone" => {
                let url = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--clone requires a share URL"))?;
                CliMode::Clone(url)
            }
            "--show-config" => CliMode::ShowConfig,
            "--help" | "-h" => {
                print_help();
                return Ok(CliMode::Help);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        };
    }
    Ok(mode)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mode = parse_cli_mode(std::env::args())?;
    if mode == CliMode::Help {
        return Ok(());
    }
    let config = UiConfig::from_env();
    if mode == CliMode::ShowConfig {
        println!("{}", serde_json::to_string_pretty(&config.snapshot())?);
        return Ok(());
    }

    let client = CloneClient::with_base_url(&config.api_base)?;
    let mut session = Session::new(client, config.poll_interval);
    session.check_auth().await;

    match mode {
        CliMode::Status => {
            println!(
                "Authenticated: {}",
                if session.authenticated() { "yes" } else { "no" }
            );
            if !session.authenticated() {
                println!("Run `gdclone-ui --login` to sign in with Google.");
            }
        }
        CliMode::Login => {
            let Some(url) = session.login().await else {
                anyhow::bail!(
                    "{}",
                    session.error().unwrap_or("login request failed")
                );
            };
            println!("Open this URL in your browser:\n{url}");
            println!("After granting access, re-run `gdclone-ui --status` to confirm.");
        }
        CliMode::Parse(url) => {
            resolve_share_url(&mut session, url).await?;
        }
        CliMode::Clone(url) => {
            resolve_share_url(&mut session, url).await?;
            run_clone(&mut session).await?;
        }
        CliMode::ShowConfig | CliMode::Help => unreachable!("handled before session setup"),
    }
    Ok(())
}

async fn resolve_share_url(session: &mut Session, url: String) -> anyhow::Result<()> {
    if !session.authenticated() {
        anyhow::bail!("not signed in; run `gdclone-ui --login` first");
    }
    session.set_source_url(url);
    session.parse_url().await;
    if let Some(err) = session.error() {
        anyhow::bail!("{err}");
    }
    let Some(item) = session.resolved() else {
        anyhow::bail!("backend returned no item metadata");
    };
    println!("{}", render::describe_resolved(item));
    Ok(())
}

async fn run_clone(session: &mut Session) -> anyhow::Result<()> {
    session.start_clone().await;
    if let Some(err) = session.error() {
        anyhow::bail!("{err}");
    }
    let Some(job) = session.job() else {
        anyhow::bail!("clone did not start");
    };
    eprintln!("[gdclone-ui] clone started: task={}", job.task_id);

    while session.polling() {
        let interrupted = tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                true
            }
            applied = session.next_progress() => {
                let _ = applied;
                false
            }
        };
        if interrupted {
            eprintln!("[gdclone-ui] interrupted; the clone keeps running on the server");
            session.reset();
            return Ok(());
        }
        if let Some(job) = session.job() {
            eprintln!("[gdclone-ui] {}", render::progress_line(&job.snapshot));
        }
    }

    if let Some(job) = session.job() {
        for item_error in &job.snapshot.errors {
            eprintln!("[gdclone-ui] item error: {item_error}");
        }
    }
    if let Some(success) = session.success() {
        println!("{success}");
        return Ok(());
    }
    if let Some(err) = session.error() {
        anyhow::bail!("{err}");
    }
    Ok(())
}

fn print_help() {
    println!(
        "Usage: gdclone-ui [--status | --login | --parse <share-url> | --clone <share-url> | --show-config]"
    );
    println!("  --status       Check whether the backend session is signed in");
    println!("  --login        Print the Google sign-in URL");
    println!("  --parse <url>  Resolve a Drive share URL into item metadata");
    println!("  --clone <url>  Resolve a share URL, start a clone, and stream progress");
    println!("  --show-config  Print the effective configuration as JSON");
}
