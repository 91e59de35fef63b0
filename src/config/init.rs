use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, DEFAULT_ADMIN_PASSWORD};
use crate::ledger::parse_rank_points;
use crate::scoring::RankingRules;

/// Line-based prompt over any reader/writer pair (stdin/stdout in the wizards)
struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write prompt")
    }

    /// Prompt with a message and return the trimmed input.
    fn ask(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt with a default value. Returns default if input is empty.
    fn ask_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.ask(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Yes/no question. Returns bool based on input and default.
    fn ask_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.ask(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Integer prompt that repeats until the input parses
    fn ask_integer(&mut self, message: &str, default: i64) -> Result<i64> {
        loop {
            let input = self.ask_with_default(message, &default.to_string())?;
            match input.parse::<i64>() {
                Ok(v) => return Ok(v),
                Err(_) => self.say("  Invalid: must be a whole number. Try again.")?,
            }
        }
    }
}

/// Interactive rule editor.
///
/// Walks ranks 1-3 first, then lets the operator add or change further ranks
/// as "RANK=POINTS". Returns the new rule set; the caller replaces the stored
/// one with it.
pub fn run_rules_wizard(current: &RankingRules) -> Result<RankingRules> {
    let stdin = std::io::stdin();
    edit_rules(&mut Prompt::new(stdin.lock(), std::io::stdout()), current)
}

fn edit_rules<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    current: &RankingRules,
) -> Result<RankingRules> {
    let mut rules = current.clone();

    prompt.say("")?;
    prompt.say("Rank points")?;
    prompt.say("-----------")?;
    for rank in 1..=3 {
        let points = prompt.ask_integer(
            &format!("Points for rank {}", rank),
            rules.points_for_rank(rank),
        )?;
        rules.rank_points.insert(rank, points);
    }

    let extra: Vec<_> = rules.rank_points.iter().filter(|(r, _)| **r > 3).collect();
    if !extra.is_empty() {
        let listed: Vec<String> = extra.iter().map(|(r, p)| format!("{}={}", r, p)).collect();
        prompt.say(&format!("Other ranks: {}", listed.join(", ")))?;
    }

    let mut more = prompt.ask_yes_no("Set points for another rank?", false)?;
    while more {
        let entry = prompt.ask("  Rank and points (e.g. '4=1', '5=0' to zero it): ")?;
        match parse_rank_points(&entry) {
            Ok((0, _)) => prompt.say("  Invalid: ranks start at 1. Try again.")?,
            Ok((rank, points)) => {
                rules.rank_points.insert(rank, points);
            }
            Err(e) => prompt.say(&format!("  Invalid: {}. Try again.", e))?,
        }
        more = prompt.ask_yes_no("  Set another rank?", false)?;
    }

    prompt.say("")?;
    prompt.say("Other points")?;
    prompt.say("------------")?;
    rules.first_buyin = prompt.ask_integer("Bonus for no rebuy (first buy-in)", rules.first_buyin)?;
    rules.participation = prompt.ask_integer("Participation bonus", rules.participation)?;

    Ok(rules)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), std::io::stdout());

    prompt.say("")?;
    prompt.say("Hold'em Ledger Setup")?;
    prompt.say("====================")?;
    prompt.say("")?;

    let default_data = crate::ledger::get_data_path();
    let data_file = prompt.ask_with_default(
        "Where should the ledger be stored?",
        &default_data.display().to_string(),
    )?;

    let admin_password = loop {
        let pw = rpassword::prompt_password("Admin password for rule changes (blank keeps the default): ")
            .context("Failed to read password")?;
        if pw.trim().is_empty() {
            break None;
        }
        let confirm = rpassword::prompt_password("Repeat admin password: ")
            .context("Failed to read password")?;
        if confirm == pw {
            break Some(pw);
        }
        prompt.say("  Passwords do not match. Try again.")?;
    };
    if admin_password.is_none() {
        prompt.say(&format!(
            "  Using the default password '{}'. Change it before sharing the ledger.",
            DEFAULT_ADMIN_PASSWORD
        ))?;
    }

    let export_dir = prompt.ask_with_default("Default directory for CSV exports", ".")?;

    let config = Config {
        data_file: Some(PathBuf::from(&data_file)),
        admin_password,
        export_dir: Some(PathBuf::from(export_dir)),
    };

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    save_and_seed(&mut prompt, &config, default_config_path)?;
    Ok(())
}

/// Write the config, then seed the ledger's rules if the ledger does not exist
/// yet. Returns false if the operator declined to overwrite an existing
/// config; nothing is written in that case.
fn save_and_seed<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    config: &Config,
    default_config_path: PathBuf,
) -> Result<bool> {
    prompt.say("")?;
    let path_str = prompt.ask_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt.ask_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            prompt.say("Aborted.")?;
            return Ok(false);
        }
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    prompt.say("")?;
    prompt.say(&format!("Config written to {}", config_path.display()))?;

    let data_path = config.data_path();
    if !data_path.exists() && prompt.ask_yes_no("Configure ranking rules now? (n accepts defaults)", true)? {
        let rules = edit_rules(prompt, &RankingRules::default())?;
        let mut store = crate::ledger::Store::open(&data_path)?;
        store.replace_rules(rules)?;
        store.save()?;
        prompt.say(&format!("Ledger created at {}", data_path.display()))?;
    }

    prompt.say("Run `holdem-ledger game add --help` to record your first game.")?;

    Ok(true)
}
