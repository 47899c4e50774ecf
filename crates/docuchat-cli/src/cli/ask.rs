//! One-shot question command (non-streaming).

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use docuchat_client::ApiClient;
use docuchat_core::api::ChatApi;

/// Send a single question and print the answer text.
pub async fn ask_once(api: &ApiClient, question: &str, session: Option<&str>) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("question cannot be empty");
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is valid"),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let result = api.ask(question, session).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            println!();
            println!("{answer}");
            println!();
            Ok(())
        }
        Err(err) => {
            eprintln!(
                "\n  {} Could not get an answer: {err}",
                style("!").red().bold()
            );
            Err(err.into())
        }
    }
}
