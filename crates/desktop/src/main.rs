//! `crmdesk`: take orders from the terminal.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use crmdesk_client::{ClientConfig, HttpCrmClient};
use crmdesk_desktop::settings::TOKEN_VAR;
use crmdesk_desktop::terminal::{self, Step};
use crmdesk_desktop::{FormSettings, OrderForm};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    crmdesk_observability::init();

    let config = ClientConfig::from_env().context("reading API configuration")?;
    tracing::info!(base_url = config.base_url(), "starting");
    let client = HttpCrmClient::new(config).context("building HTTP client")?;
    let mut form = OrderForm::new(client, FormSettings::from_env());

    println!("{}", terminal::HELP);

    if let Ok(token) = std::env::var(TOKEN_VAR) {
        if let Step::Print(out) = terminal::execute(&mut form, terminal::Command::Token(token)).await {
            println!("{out}");
        }
        if form.is_authenticated() {
            if let Step::Print(out) = terminal::execute(&mut form, terminal::Command::Load).await {
                println!("{out}");
            }
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("writing prompt")?;

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        let command = match terminal::parse(&line) {
            Ok(command) => command,
            Err(terminal::CommandError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match terminal::execute(&mut form, command).await {
            Step::Print(out) => println!("{out}"),
            Step::Quit => break,
        }
    }

    tracing::info!("bye");
    Ok(())
}
