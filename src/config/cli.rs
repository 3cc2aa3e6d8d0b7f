use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::domain::model::Language;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "nanou-tarot")]
#[command(about = "Bilingual tarot draws, rule-based readings and AI interpretations")]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the interpretation mode (demo, live, auto)
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8080
        #[arg(long)]
        bind: Option<String>,
    },
    /// Draw cards and print them
    Draw(DrawArgs),
    /// Draw cards and print the rule-based reading
    Read(ReadArgs),
    /// Draw cards and ask for a premium interpretation
    Premium(PremiumArgs),
    /// Draw cards, then answer questions one by one (stdin when no -q is given)
    Chat(ChatArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DrawArgs {
    /// Number of cards (clamped to a 1, 3 or 5 card spread)
    #[arg(short = 'n', long, default_value = "3")]
    pub count: usize,

    /// Reading language (fr or en)
    #[arg(short, long, default_value = "fr", value_parser = parse_language)]
    pub lang: Language,

    /// Allow reversed cards for this draw
    #[arg(long)]
    pub reversals: bool,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct ReadArgs {
    #[command(flatten)]
    pub draw: DrawArgs,

    /// Question asked to the cards
    #[arg(short, long, default_value = "")]
    pub question: String,
}

#[derive(Debug, Clone, Args)]
pub struct PremiumArgs {
    #[command(flatten)]
    pub draw: DrawArgs,

    #[arg(short, long, default_value = "")]
    pub question: String,

    /// Allow the transcript to be written to the journal
    #[arg(long)]
    pub consent: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ChatArgs {
    #[command(flatten)]
    pub draw: DrawArgs,

    /// Question to ask; repeat for several turns
    #[arg(short, long)]
    pub question: Vec<String>,
}

fn parse_language(value: &str) -> std::result::Result<Language, String> {
    Ok(Language::parse(value))
}

impl Cli {
    /// 環境變數 → TOML 檔案 → 命令列參數，後者覆蓋前者
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env()?;

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            let file = TomlConfig::from_file(path)?;
            config = config.merge_file(&file)?;
        }

        if let Some(mode) = &self.mode {
            config.mode = mode.parse()?;
            tracing::info!("🔧 Mode overridden to: {}", config.mode);
        }

        if let Command::Serve { bind: Some(bind) } = &self.command {
            config.bind_addr = bind.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::parse_from([
            "nanou-tarot",
            "--mode",
            "demo",
            "serve",
            "--bind",
            "0.0.0.0:9000",
        ]);
        assert_eq!(cli.mode.as_deref(), Some("demo"));
        assert!(matches!(cli.command, Command::Serve { bind: Some(ref b) } if b == "0.0.0.0:9000"));
    }

    #[test]
    fn test_parse_read_args() {
        let cli = Cli::parse_from([
            "nanou-tarot",
            "read",
            "-n",
            "5",
            "--lang",
            "en",
            "--seed",
            "7",
            "-q",
            "my work?",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Read(args) => {
                assert_eq!(args.draw.count, 5);
                assert_eq!(args.draw.lang, Language::En);
                assert_eq!(args.draw.seed, Some(7));
                assert_eq!(args.question, "my work?");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_chat_questions() {
        let cli = Cli::parse_from([
            "nanou-tarot",
            "chat",
            "-n",
            "1",
            "-q",
            "love?",
            "-q",
            "money?",
        ]);
        match cli.command {
            Command::Chat(args) => {
                assert_eq!(args.draw.count, 1);
                assert_eq!(args.question, vec!["love?", "money?"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["nanou-tarot", "chat"]);
        assert!(matches!(cli.command, Command::Chat(ref args) if args.question.is_empty()));
    }

    #[test]
    fn test_unknown_language_falls_back_to_french() {
        let cli = Cli::parse_from(["nanou-tarot", "draw", "--lang", "de"]);
        match cli.command {
            Command::Draw(args) => assert_eq!(args.lang, Language::Fr),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_mode_override_is_rejected() {
        let cli = Cli::parse_from(["nanou-tarot", "--mode", "psychic", "draw"]);
        assert!(cli.load_config().is_err());
    }
}
