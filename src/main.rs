use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use holdem_ledger::config::Config;
use holdem_ledger::ledger::{self, PointAdjustment, Session, Store};
use holdem_ledger::scoring::{self, DateRange};
use holdem_ledger::{auth, output, LedgerError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_NOT_FOUND: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORE: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a config file interactively
    Init,
    /// Show or change the ranking rules
    Rules {
        #[command(subcommand)]
        action: RulesCommand,
    },
    /// Record, list, inspect and delete games
    Game {
        #[command(subcommand)]
        action: GameCommand,
    },
    /// Manual point corrections
    Adjust {
        #[command(subcommand)]
        action: AdjustCommand,
    },
    /// Point and score rankings over an optional date range
    Ranking {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
        /// Also write point.csv and score.csv (to DIR, the configured export_dir, or .)
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },
    /// List every nickname that has played
    Players,
    /// One player's game log and totals
    Player {
        nickname: String,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Print the current rules
    Show,
    /// Edit the rules interactively (admin)
    Edit,
    /// Replace the rules from flags (admin)
    Set {
        /// Rank points as RANK=POINTS; replaces the whole table when given
        #[arg(long = "rank", value_name = "RANK=POINTS")]
        ranks: Vec<String>,
        /// Bonus for a session without rebuy
        #[arg(long, allow_hyphen_values = true)]
        first_buyin: Option<i64>,
        /// Bonus for every participation
        #[arg(long, allow_hyphen_values = true)]
        participation: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum GameCommand {
    /// Record a game
    Add {
        /// Game name
        #[arg(long)]
        name: String,
        /// Game date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Start time (HH:MM)
        #[arg(long)]
        open_time: Option<String>,
        /// Cost of one buy-in
        #[arg(long)]
        buyin_cost: Option<String>,
        /// Total prize pool
        #[arg(long)]
        prize_pool: Option<String>,
        /// Player result as nickname:buyin:rebuy:cashout:rank (repeatable)
        #[arg(short, long = "player", value_name = "SPEC", required = true)]
        players: Vec<String>,
        /// Extra award as nickname:amount:reason (repeatable, not ranked)
        #[arg(long = "bonus", value_name = "SPEC")]
        bonuses: Vec<String>,
    },
    /// List recorded games
    List,
    /// Show one game's log by its number in `game list`
    Show { index: usize },
    /// Delete a game by its number in `game list`
    Remove { index: usize },
}

#[derive(Subcommand, Debug)]
enum AdjustCommand {
    /// Add a point correction
    Add {
        #[arg(long)]
        nickname: String,
        /// Points to add (negative to subtract)
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "")]
        reason: String,
        /// Date of the correction (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List point corrections
    List,
}

#[derive(Parser, Debug)]
#[command(name = "holdem-ledger")]
#[command(about = "Hold'em meetup ledger: results, points and rankings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/holdem-ledger/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the ledger file (overrides data_file from the config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = holdem_ledger::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match holdem_ledger::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let data_path = cli.data.map(PathBuf::from).unwrap_or_else(|| config.data_path());
    let mut store = match Store::open(&data_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{:#}", anyhow::Error::from(e));
            std::process::exit(EXIT_STORE);
        }
    };

    let start_time = Instant::now();
    if let Err(e) = run(cli.command, &config, &mut store) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LedgerError>() {
        Some(LedgerError::Unauthorized) => EXIT_AUTH,
        Some(LedgerError::Parse { .. }) | Some(LedgerError::Validation(_)) => EXIT_INPUT,
        Some(LedgerError::NotFound(_)) => EXIT_NOT_FOUND,
        Some(LedgerError::Store { .. }) | None => EXIT_STORE,
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Convert a 1-based number from `game list` to a store position
fn position(index: usize) -> anyhow::Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| LedgerError::NotFound("game #0 (games are numbered from 1)".to_string()).into())
}

fn run(command: Commands, config: &Config, store: &mut Store) -> anyhow::Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        // Handled before the store is opened
        Commands::Init => {}

        Commands::Rules { action } => match action {
            RulesCommand::Show => println!("{}", output::format_rules(store.rules())),
            RulesCommand::Edit => {
                auth::require_admin(config.admin_password())?;
                let rules = holdem_ledger::config::run_rules_wizard(store.rules())?;
                store.replace_rules(rules)?;
                store.save()?;
                println!();
                println!("{}", output::format_rules(store.rules()));
                println!("Rules saved.");
            }
            RulesCommand::Set {
                ranks,
                first_buyin,
                participation,
            } => {
                auth::require_admin(config.admin_password())?;
                let mut rules = store.rules().clone();
                if !ranks.is_empty() {
                    rules.rank_points = ranks
                        .iter()
                        .map(|r| ledger::parse_rank_points(r))
                        .collect::<holdem_ledger::Result<BTreeMap<u32, i64>>>()?;
                }
                if let Some(v) = first_buyin {
                    rules.first_buyin = v;
                }
                if let Some(v) = participation {
                    rules.participation = v;
                }
                store.replace_rules(rules)?;
                store.save()?;
                println!("{}", output::format_rules(store.rules()));
                println!("Rules saved.");
            }
        },

        Commands::Game { action } => match action {
            GameCommand::Add {
                name,
                date,
                open_time,
                buyin_cost,
                prize_pool,
                players,
                bonuses,
            } => {
                let date = match date {
                    Some(d) => ledger::parse_date(&d)?,
                    None => today(),
                };
                let players = players
                    .iter()
                    .map(|spec| ledger::parse_player_spec(spec))
                    .collect::<holdem_ledger::Result<Vec<_>>>()?;

                let mut session = Session::new(name.trim(), date, players);
                session.open_time = open_time.as_deref().map(ledger::parse_time).transpose()?;
                session.buyin_cost = buyin_cost
                    .as_deref()
                    .map(|s| ledger::parse_amount("buyin_cost", s))
                    .transpose()?;
                session.prize_pool = prize_pool
                    .as_deref()
                    .map(|s| ledger::parse_amount("prize_pool", s))
                    .transpose()?;
                session.bonuses = bonuses
                    .iter()
                    .map(|spec| ledger::parse_bonus_spec(spec))
                    .collect::<holdem_ledger::Result<Vec<_>>>()?;

                let label = session.label(store.sessions().len());
                store.add_session(session)?;
                store.save()?;
                println!("Saved game {}", label);
            }
            GameCommand::List => {
                println!("{}", output::format_game_list(store.sessions(), use_colors));
            }
            GameCommand::Show { index } => {
                let session = store.session(position(index)?)?;
                let rows = scoring::per_game_detail(session, store.rules());
                println!("{}", output::format_game_detail(session, &rows, use_colors));
            }
            GameCommand::Remove { index } => {
                let pos = position(index)?;
                let removed = store.remove_session(pos)?;
                store.save()?;
                println!("Deleted game {}", removed.label(pos));
            }
        },

        Commands::Adjust { action } => match action {
            AdjustCommand::Add {
                nickname,
                amount,
                reason,
                date,
            } => {
                let adjustment = PointAdjustment {
                    nickname: nickname.trim().to_string(),
                    amount: ledger::parse_amount("amount", &amount)?,
                    reason: reason.trim().to_string(),
                    date: match date {
                        Some(d) => ledger::parse_date(&d)?,
                        None => today(),
                    },
                };
                let summary = format!(
                    "{} {} on {}",
                    adjustment.nickname,
                    output::format_points(adjustment.amount),
                    adjustment.date
                );
                store.add_adjustment(adjustment)?;
                store.save()?;
                println!("Saved adjustment: {}", summary);
            }
            AdjustCommand::List => {
                println!("{}", output::format_adjustments(store.adjustments(), use_colors));
            }
        },

        Commands::Ranking {
            from,
            to,
            tsv,
            export,
        } => {
            let start = from.as_deref().map(ledger::parse_date).transpose()?;
            let end = to.as_deref().map(ledger::parse_date).transpose()?;
            let range = DateRange::new(start, end)?;

            let ranking =
                scoring::aggregate_ranking(store.sessions(), store.adjustments(), store.rules(), &range);

            if tsv {
                println!("# points");
                println!("{}", output::format_standings_tsv(&ranking.points));
                println!("# score");
                println!("{}", output::format_standings_tsv(&ranking.scores));
            } else {
                println!("Cumulative points");
                println!("{}", output::format_point_ranking(&ranking.points, use_colors));
                println!();
                println!("Score");
                println!("{}", output::format_score_ranking(&ranking.scores, use_colors));
            }

            if let Some(dir) = export {
                let dir = dir
                    .or_else(|| config.export_dir.clone())
                    .unwrap_or_else(|| PathBuf::from("."));
                for path in output::export_ranking(&dir, &ranking)? {
                    eprintln!("Exported {}", path.display());
                }
            }
        }

        Commands::Players => {
            let players = scoring::list_players(store.sessions());
            if players.is_empty() {
                println!("No players recorded.");
            } else {
                println!("{}", players.join("\n"));
            }
        }

        Commands::Player { nickname } => {
            let history = scoring::per_player_history(
                nickname.trim(),
                store.sessions(),
                store.adjustments(),
                store.rules(),
            )?;
            println!("{}", output::format_player_history(&history, use_colors));
        }
    }

    Ok(())
}
