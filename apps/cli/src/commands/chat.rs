//! Interactive chat mode.
//!
//! A REPL over the orchestrator. Each line is one run; slash commands
//! switch modes, start games and attach files. Attachments apply to the
//! next message only.

use crate::config::CliConfig;
use anyhow::{Result, anyhow};
use azai_abstraction::{AspectRatio, Attachment};
use azai_orchestrator::{
    GameType, GenerationConfig, Mode, Orchestrator, OrchestratorInput, resolve_prompt,
};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{build_orchestrator, load_attachment, parse_mode, print_result, run_turn};

/// One parsed line of REPL input.
#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    Help,
    Quit,
    SetMode(Option<Mode>),
    Game(GameType),
    Attach(PathBuf),
    Detach,
    Ratio(AspectRatio),
    Personas,
    Message(String),
}

fn parse_line(line: &str) -> Result<ReplCommand> {
    let Some(command) = line.strip_prefix('/') else {
        return Ok(ReplCommand::Message(line.to_string()));
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name, arg) {
        ("help" | "h", _) => Ok(ReplCommand::Help),
        ("quit" | "exit" | "q", _) => Ok(ReplCommand::Quit),
        ("personas", _) => Ok(ReplCommand::Personas),
        ("detach", _) => Ok(ReplCommand::Detach),
        ("mode", "") => Err(anyhow!("Usage: /mode <auto|chat|image|research|code|game[:type]>")),
        ("mode", mode) => Ok(ReplCommand::SetMode(parse_mode(Some(mode), None)?)),
        ("game", "") => Err(anyhow!("Usage: /game <20_questions|rpg|trivia|custom>")),
        ("game", game) => Ok(ReplCommand::Game(game.parse()?)),
        ("attach", "") => Err(anyhow!("Usage: /attach <path>")),
        ("attach", path) => Ok(ReplCommand::Attach(PathBuf::from(path))),
        ("ratio", "") => Err(anyhow!("Usage: /ratio <1:1|16:9|9:16|4:3|3:4>")),
        ("ratio", ratio) => Ok(ReplCommand::Ratio(ratio.parse()?)),
        _ => Err(anyhow!("Unknown command: /{} (try /help)", name)),
    }
}

/// Per-session REPL state.
struct ChatSession {
    orchestrator: Orchestrator,
    mode: Option<Mode>,
    attachment: Option<Attachment>,
    aspect_ratio: AspectRatio,
    output_dir: PathBuf,
}

impl ChatSession {
    /// Sends one message. The pending attachment is consumed.
    async fn send(&mut self, raw: &str, opening_turn: bool) -> Result<()> {
        let attachment = self.attachment.take();
        let prompt = resolve_prompt(raw, attachment.is_some(), self.mode, opening_turn);
        let input = OrchestratorInput::new(prompt)
            .with_attachment(attachment)
            .with_config(GenerationConfig { aspect_ratio: self.aspect_ratio })
            .with_mode(self.mode);

        let result = run_turn(&self.orchestrator, &input, false).await;
        print_result(&result, &self.output_dir)
    }

    /// Switches mode, opening a game when one is chosen.
    async fn switch_mode(&mut self, mode: Option<Mode>) -> Result<()> {
        self.mode = mode;
        match mode {
            None => println!("{} auto", "Mode:".yellow().bold()),
            Some(mode) => println!("{} {}", "Mode:".yellow().bold(), mode),
        }

        match mode {
            Some(Mode::Game(GameType::Custom)) => {
                println!("Describe the game you want to play.");
                Ok(())
            }
            Some(Mode::Game(_)) => {
                // The opening turn carries no attachment; keep it for the next message.
                let pending = self.attachment.take();
                let opened = self.send("", true).await;
                self.attachment = pending;
                opened
            }
            _ => Ok(()),
        }
    }

    async fn handle(&mut self, command: ReplCommand) -> Result<bool> {
        match command {
            ReplCommand::Quit => return Ok(false),
            ReplCommand::Help => print_help(),
            ReplCommand::Personas => {
                for persona in self.orchestrator.personas() {
                    println!(
                        "  {} {}",
                        persona.name.color(super::render::persona_color(&persona.color)).bold(),
                        format!("({})", persona.id).dimmed()
                    );
                }
            }
            ReplCommand::SetMode(mode) => self.switch_mode(mode).await?,
            ReplCommand::Game(game) => self.switch_mode(Some(Mode::Game(game))).await?,
            ReplCommand::Attach(path) => {
                let attachment = load_attachment(&path)?;
                println!(
                    "{} {} ({})",
                    "Attached:".green().bold(),
                    path.display(),
                    attachment.mime_type
                );
                self.attachment = Some(attachment);
            }
            ReplCommand::Detach => {
                self.attachment = None;
                println!("Attachment cleared.");
            }
            ReplCommand::Ratio(ratio) => {
                self.aspect_ratio = ratio;
                println!("{} {}", "Aspect ratio:".yellow().bold(), ratio);
            }
            ReplCommand::Message(text) => self.send(&text, false).await?,
        }
        Ok(true)
    }
}

/// Execute the chat command.
pub async fn execute(
    config: &CliConfig,
    mode: Option<String>,
    game: Option<String>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let mut session = ChatSession {
        orchestrator: build_orchestrator(config)?,
        mode: None,
        attachment: None,
        aspect_ratio: config.aspect_ratio()?,
        output_dir: output_dir.map_or_else(|| config.output_dir(), Path::to_path_buf),
    };
    let initial_mode = parse_mode(mode.as_deref(), game.as_deref())?;

    print_banner(config);
    if initial_mode.is_some() {
        session.switch_mode(initial_mode).await?;
    }

    loop {
        print!("\n{} ", ">".green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();

        // A blank line only means something when a file is attached.
        if line.is_empty() && session.attachment.is_none() {
            continue;
        }

        let keep_going = match parse_line(line) {
            Ok(command) => session.handle(command).await,
            Err(e) => Err(e),
        };
        match keep_going {
            Ok(true) => {}
            Ok(false) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => eprintln!("\n{}: {}", "Error".red().bold(), e),
        }
    }

    Ok(())
}

fn print_banner(config: &CliConfig) {
    println!();
    println!("{}", "╔═══════════════════════════════════════════╗".cyan().bold());
    println!(
        "{}{}{}",
        "║  ".cyan().bold(),
        "AZ AI Interactive Chat".white().bold(),
        "                   ║".cyan().bold()
    );
    println!("{}", "╚═══════════════════════════════════════════╝".cyan().bold());
    println!();
    println!("{} {}", "Engine:".yellow().bold(), config.engine());
    println!("{} {}", "Models:".yellow().bold(), config.chat_model());
    println!();
    println!("{} /help /mode /game /attach /ratio /personas /quit", "Commands:".green().bold());
}

fn print_help() {
    println!();
    let commands = [
        ("/help, /h", "Show this help message"),
        ("/mode <mode>", "auto, chat, image, research, code or game[:type]"),
        ("/game <type>", "Start 20_questions, rpg, trivia or custom"),
        ("/attach <path>", "Send a file with the next message"),
        ("/detach", "Drop the pending attachment"),
        ("/ratio <ratio>", "Aspect ratio for generated images"),
        ("/personas", "List the personas consulted in chat mode"),
        ("/quit, /exit, /q", "Exit chat"),
    ];

    for (cmd, desc) in commands {
        println!("  {} - {}", cmd.green().bold(), desc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(parse_line("hello there").unwrap(), ReplCommand::Message("hello there".into()));
        assert_eq!(parse_line("").unwrap(), ReplCommand::Message(String::new()));
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_line("/q").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_line("/mode auto").unwrap(), ReplCommand::SetMode(None));
        assert_eq!(parse_line("/mode research").unwrap(), ReplCommand::SetMode(Some(Mode::Research)));
        assert_eq!(
            parse_line("/mode game:rpg").unwrap(),
            ReplCommand::SetMode(Some(Mode::Game(GameType::Rpg)))
        );
        assert_eq!(parse_line("/game trivia").unwrap(), ReplCommand::Game(GameType::Trivia));
        assert_eq!(
            parse_line("/attach ./cat photo.png").unwrap(),
            ReplCommand::Attach(PathBuf::from("./cat photo.png"))
        );
        assert_eq!(parse_line("/ratio 16:9").unwrap(), ReplCommand::Ratio(AspectRatio::Landscape));
    }

    #[tokio::test]
    async fn test_game_opening_keeps_pending_attachment() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CliConfig { engine: Some("mock".to_string()), ..Default::default() };
        let mut session = ChatSession {
            orchestrator: build_orchestrator(&config).unwrap(),
            mode: None,
            attachment: Some(Attachment::new("text/plain", b"abc".to_vec())),
            aspect_ratio: AspectRatio::default(),
            output_dir: temp_dir.path().to_path_buf(),
        };

        session.switch_mode(Some(Mode::Game(GameType::Trivia))).await.unwrap();
        assert_eq!(session.mode, Some(Mode::Game(GameType::Trivia)));
        assert_eq!(session.attachment.as_ref().map(|a| a.data.as_slice()), Some(&b"abc"[..]));

        session.handle(ReplCommand::SetMode(Some(Mode::Code))).await.unwrap();
        session.handle(ReplCommand::Message("look at this".to_string())).await.unwrap();
        assert!(session.attachment.is_none());
    }

    #[test]
    fn test_bad_commands() {
        assert!(parse_line("/mode").is_err());
        assert!(parse_line("/mode video").is_err());
        assert!(parse_line("/game chess").is_err());
        assert!(parse_line("/ratio 2:1").is_err());
        assert!(parse_line("/teleport").is_err());
    }
}
