use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_host::command::HELP;
use todo_host::{Command, Config, Page, Session};

fn draw(session: &Session) {
    print!("{}", Page::new(&session.app().view(), session.focus()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the page on stdout stays readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let mut session = Session::from_config(&config)?;
    info!(base_url = %config.base_url, user_id = config.user_id, "starting todo session");

    session.start();
    session.settle().await;
    draw(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(command) => session.dispatch(|app| command.apply(app)),
                    Err(err) => {
                        eprintln!("{err}");
                        continue;
                    }
                }
                draw(&session);
            }
            Some(event) = session.next_event() => {
                session.handle(event);
                session.poll_ready();
                draw(&session);
            }
        }
    }

    session.shutdown();
    Ok(())
}
