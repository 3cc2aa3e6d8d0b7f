use clap::Parser;
use nanou_tarot::app::build_orchestrator;
use nanou_tarot::config::cli::{ChatArgs, Cli, Command, DrawArgs, PremiumArgs, ReadArgs};
use nanou_tarot::config::AppConfig;
use nanou_tarot::core::draw::{DrawEngine, DrawOptions};
use nanou_tarot::core::reading::{base_reading, compose, disclaimer, ChatTranscript};
use nanou_tarot::domain::catalog::Catalog;
use nanou_tarot::domain::model::{CardInput, ReadingRequest, Spread, SpreadSize};
use nanou_tarot::server::{self, AppState};
use nanou_tarot::utils::error::{ErrorSeverity, TarotError};
use nanou_tarot::utils::{logger, validation::Validate};
use std::io::BufRead;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    match cli.command {
        Command::Serve { .. } => logger::init_server_logger(config.production, cli.verbose),
        _ => logger::init_cli_logger(cli.verbose),
    }
    if cli.verbose {
        tracing::debug!("Mode: {}, data dir: {}", config.mode, config.data_dir);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Serve { .. } => {
            let state = AppState::from_config(config.clone())?;
            server::serve(state, &config.bind_addr).await?;
            return Ok(());
        }
        Command::Draw(args) => run_draw(&config, args),
        Command::Read(args) => run_read(&config, args),
        Command::Premium(args) => run_premium(&config, args).await,
        Command::Chat(args) => run_chat(&config, args),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn draw_spread(config: &AppConfig, args: &DrawArgs) -> Result<Spread, TarotError> {
    let catalog = Catalog::shared();
    let options = DrawOptions {
        reversals: args.reversals || config.reversals,
    };
    let size = SpreadSize::clamp(args.count);

    match args.seed {
        Some(seed) => DrawEngine::seeded(catalog, seed, options).spread(size),
        None => DrawEngine::from_entropy(catalog, options).spread(size),
    }
}

fn run_draw(config: &AppConfig, args: &DrawArgs) -> Result<(), TarotError> {
    let spread = draw_spread(config, args)?;
    println!("{}", base_reading(&spread, args.lang));
    Ok(())
}

fn run_read(config: &AppConfig, args: &ReadArgs) -> Result<(), TarotError> {
    let spread = draw_spread(config, &args.draw)?;
    let reading = compose(Some(&spread), &args.question, args.draw.lang);
    println!("{}\n\n{}", reading.text, disclaimer(args.draw.lang));
    Ok(())
}

fn run_chat(config: &AppConfig, args: &ChatArgs) -> Result<(), TarotError> {
    let spread = draw_spread(config, &args.draw)?;
    let mut chat = ChatTranscript::open(Some(spread), args.draw.lang);
    for message in chat.messages() {
        println!("{}\n", message);
    }

    let mut reply = |question: &str| {
        if let Some(message) = chat.ask(question) {
            println!("{}\n", message);
        }
    };
    if args.question.is_empty() {
        for line in std::io::stdin().lock().lines() {
            reply(&line?);
        }
    } else {
        for question in &args.question {
            reply(question);
        }
    }

    println!("{}", disclaimer(args.draw.lang));
    Ok(())
}

async fn run_premium(config: &AppConfig, args: &PremiumArgs) -> Result<(), TarotError> {
    let spread = draw_spread(config, &args.draw)?;
    let orchestrator = build_orchestrator(config)?;

    let request = ReadingRequest {
        cards: spread.draw().cards().iter().map(CardInput::from).collect(),
        question: args.question.clone(),
        lang: args.draw.lang,
        consent: args.consent,
    };

    tracing::info!("🔮 Asking for a premium interpretation ({})", config.mode);
    let interpretation = orchestrator.interpret(&request).await?;

    println!("{}", base_reading(&spread, args.draw.lang));
    println!();
    println!("{}", interpretation.pretty);
    Ok(())
}
