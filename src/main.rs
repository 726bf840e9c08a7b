use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use receptionist::llm::types::LlmError;
use receptionist::{
    Dashboard, ErrorCode, Faq, GeminiClient, KnowledgeBase, KnowledgeError, Language, LlmChat, Orchestrator,
    OrchestratorConfig, Sender, TurnEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("gateway setup failed: {0}")]
    Llm(#[from] LlmError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid FAQ file {path}: {source}")]
    FaqFile { path: PathBuf, source: serde_json::Error },
    #[error("invalid FAQ file {path}: {source}")]
    FaqEntry { path: PathBuf, source: KnowledgeError },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "receptionist", about = "Multilingual AI receptionist chat console")]
struct Cli {
    /// Language the receptionist converses in.
    #[arg(long, env = "RECEPTIONIST_LANGUAGE", default_value = "en")]
    language: Language,

    /// JSON file with an array of `{question, answer}` entries. Defaults to
    /// the starter knowledge base.
    #[arg(long, env = "RECEPTIONIST_FAQS")]
    faqs: Option<PathBuf>,

    #[arg(long, env = "RECEPTIONIST_COMPANY")]
    company: Option<String>,
}

const HELP: &str = "\
commands:
  /lang <en|es|fr|de>      switch conversation language
  /leads                   list captured leads
  /faqs                    list knowledge base entries
  /faq show <id>
  /faq add <question> | <answer>
  /faq edit <id> <question> | <answer>
  /faq rm <id>
  /summary                 dashboard overview as JSON
  /reset                   forget the model conversation
  /help                    show this help
  /quit                    exit";

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let llm = GeminiClient::from_env()?;
    tracing::info!(model = llm.model(), "receptionist: llm client ready");
    let llm: Arc<dyn LlmChat> = Arc::new(llm);

    let mut config = OrchestratorConfig::from_env();
    if let Some(company) = cli.company {
        config.company = company;
    }
    let orchestrator = Arc::new(Orchestrator::new(llm, config));

    let mut dashboard = Dashboard::new(orchestrator.clone(), cli.language);
    if let Some(path) = cli.faqs {
        dashboard = dashboard.with_knowledge(load_faqs(path)?);
    }

    for message in dashboard.transcript() {
        println!("assistant: {}", message.text);
    }
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            match run_command(&mut dashboard, &orchestrator, command) {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) => {
                    eprintln!("error: {e}");
                    continue;
                }
            }
        }

        run_turn(&mut dashboard, line).await;
    }
    Ok(())
}

fn load_faqs(path: PathBuf) -> Result<KnowledgeBase, CliError> {
    let raw = std::fs::read_to_string(&path)?;
    let faqs: Vec<Faq> = serde_json::from_str(&raw).map_err(|source| CliError::FaqFile { path: path.clone(), source })?;
    KnowledgeBase::from_faqs(faqs).map_err(|source| CliError::FaqEntry { path, source })
}

async fn run_turn(dashboard: &mut Dashboard, line: &str) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event);
        }
    });

    let result = dashboard.submit_streaming(line, &tx).await;
    drop(tx);
    let _ = printer.await;

    if let Err(e) = result {
        tracing::warn!(error = %e, code = e.error_code(), "receptionist: turn rejected");
        eprintln!("error: {e}");
    }
}

fn print_event(event: &TurnEvent) {
    match event {
        TurnEvent::Message(message) if message.sender == Sender::Assistant => {
            println!("[{}] assistant: {}", message.timestamp, message.text);
        }
        TurnEvent::Message(_) => {}
        TurnEvent::LeadCreated(lead) => {
            println!("  + lead: {} <{}> {} ({})", lead.name, lead.email, lead.phone, lead.interest);
        }
    }
}

/// Returns `Ok(false)` when the console should exit.
fn run_command(dashboard: &mut Dashboard, orchestrator: &Orchestrator, command: &str) -> Result<bool, CliError> {
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    match name {
        "quit" | "exit" => return Ok(false),
        "help" => println!("{HELP}"),
        "lang" => match rest.parse::<Language>() {
            Ok(language) => {
                dashboard.set_language(language);
                println!("language: {}", language.native_name());
                if let Some(greeting) = dashboard.transcript().last() {
                    println!("assistant: {}", greeting.text);
                }
            }
            Err(e) => eprintln!("error: {e}"),
        },
        "leads" => {
            for lead in dashboard.leads() {
                println!("{}  {} <{}> {} ({})", lead.id, lead.name, lead.email, lead.phone, lead.interest);
            }
        }
        "faqs" => {
            for faq in dashboard.knowledge().faqs() {
                println!("{}", format_faq(faq));
            }
        }
        "faq" => match run_faq_command(dashboard.knowledge_mut(), rest) {
            Ok(msg) => println!("{msg}"),
            Err(FaqCommandError::Knowledge(e)) => eprintln!("error [{}]: {e}", e.error_code()),
            Err(e) => eprintln!("{e}"),
        },
        "summary" => println!("{}", serde_json::to_string_pretty(&dashboard.summary())?),
        "reset" => {
            orchestrator.reset_session();
            println!("conversation reset");
        }
        other => eprintln!("unknown command /{other}; try /help"),
    }
    Ok(true)
}

const FAQ_USAGE: &str = "usage: /faq show <id> | add <question> | <answer> | edit <id> <question> | <answer> | rm <id>";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum FaqCommandError {
    #[error("{}", FAQ_USAGE)]
    Usage,
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Apply one `/faq` subcommand and return the line to print.
fn run_faq_command(knowledge: &mut KnowledgeBase, args: &str) -> Result<String, FaqCommandError> {
    let (action, rest) = args.split_once(' ').unwrap_or((args, ""));
    let rest = rest.trim();
    match action {
        "show" => {
            let faq = knowledge.get(rest).ok_or_else(|| KnowledgeError::NotFound(rest.to_string()))?;
            Ok(format_faq(faq))
        }
        "add" => {
            let (question, answer) = split_entry(rest);
            let id = knowledge.add(question, answer)?;
            Ok(format!("added {id}"))
        }
        "edit" => {
            let (id, entry) = rest.split_once(' ').ok_or(FaqCommandError::Usage)?;
            let (question, answer) = split_entry(entry);
            knowledge.update(id, question, answer)?;
            let faq = knowledge.get(id).ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;
            Ok(format!("updated {}", format_faq(faq)))
        }
        "rm" => {
            let faq = knowledge.remove(rest)?;
            Ok(format!("removed: {}", faq.question))
        }
        _ => Err(FaqCommandError::Usage),
    }
}

fn split_entry(entry: &str) -> (&str, &str) {
    let (question, answer) = entry.split_once('|').unwrap_or((entry, ""));
    (question.trim(), answer.trim())
}

fn format_faq(faq: &Faq) -> String {
    format!("[{}] Q: {}\n    A: {}", faq.id, faq.question, faq.answer)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
