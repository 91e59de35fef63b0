use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::ledger::{PointAdjustment, Session};
use crate::scoring::{GameRow, HistorySource, PlayerHistory, RankingRules, Standing};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an amount without trailing zeros: 10 -> "10", 7.5 -> "7.5", 1/3 -> "0.33"
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a point value with an explicit sign: "+20", "-5.5", "0"
pub fn format_points(value: f64) -> String {
    // -0.0 would otherwise print as "-0"
    if value == 0.0 {
        "0".to_string()
    } else if value > 0.0 {
        format!("+{}", format_amount(value))
    } else {
        format_amount(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Plain,
    Bold,
    Dimmed,
    /// Green when positive, red when negative
    Signed(f64),
}

struct Cell {
    text: String,
    style: Style,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: Style::Plain }
    }

    fn styled(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style }
    }
}

/// Column-aligned table. `flex` names the column that is truncated when the
/// terminal is too narrow.
struct Table {
    headers: Vec<&'static str>,
    right: Vec<bool>,
    flex: usize,
    rows: Vec<Vec<Cell>>,
}

const SEPARATOR: &str = "  ";
const MIN_FLEX_WIDTH: usize = 8;

impl Table {
    fn new(headers: Vec<&'static str>, right: Vec<bool>, flex: usize) -> Self {
        Self { headers, right, flex, rows: Vec::new() }
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn render(&self, use_colors: bool, term_width: Option<usize>) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.text.chars().count());
            }
        }

        if let Some(limit) = term_width {
            let total: usize = widths.iter().sum::<usize>() + SEPARATOR.len() * (widths.len() - 1);
            if total > limit {
                let overflow = total - limit;
                widths[self.flex] = widths[self.flex]
                    .saturating_sub(overflow)
                    .max(MIN_FLEX_WIDTH.min(widths[self.flex]));
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let header: Vec<String> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| self.pad(i, &truncate(h, widths[i]), widths[i]))
            .collect();
        let header = header.join(SEPARATOR).trim_end().to_string();
        lines.push(if use_colors { header.bold().to_string() } else { header });

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let padded = self.pad(i, &truncate(&cell.text, widths[i]), widths[i]);
                    if use_colors {
                        paint(&padded, cell.style)
                    } else {
                        padded
                    }
                })
                .collect();
            lines.push(cells.join(SEPARATOR).trim_end().to_string());
        }

        lines.join("\n")
    }

    fn pad(&self, column: usize, text: &str, width: usize) -> String {
        if self.right[column] {
            format!("{:>width$}", text, width = width)
        } else {
            format!("{:<width$}", text, width = width)
        }
    }
}

fn paint(text: &str, style: Style) -> String {
    match style {
        Style::Plain => text.to_string(),
        Style::Bold => text.bold().to_string(),
        Style::Dimmed => text.dimmed().to_string(),
        Style::Signed(v) if v > 0.0 => text.green().to_string(),
        Style::Signed(v) if v < 0.0 => text.red().to_string(),
        Style::Signed(_) => text.to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn standings_table<T: Copy>(
    standings: &[Standing<T>],
    value_header: &'static str,
    render_value: impl Fn(T) -> Cell,
) -> Table {
    let mut table = Table::new(vec!["#", "Nickname", value_header], vec![true, false, true], 1);
    for (idx, standing) in standings.iter().enumerate() {
        let name_style = if idx == 0 { Style::Bold } else { Style::Plain };
        table.push(vec![
            Cell::styled(format!("{}.", idx + 1), Style::Dimmed),
            Cell::styled(standing.nickname.clone(), name_style),
            render_value(standing.value),
        ]);
    }
    table
}

/// Cumulative point ranking, best first
pub fn format_point_ranking(standings: &[Standing<f64>], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No results in this period.".to_string();
    }
    standings_table(standings, "Points", |v| Cell::styled(format_points(v), Style::Signed(v)))
        .render(use_colors, get_terminal_width())
}

/// Rule-based score ranking, best first
pub fn format_score_ranking(standings: &[Standing<i64>], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No results in this period.".to_string();
    }
    standings_table(standings, "Score", |v| Cell::styled(v.to_string(), Style::Bold))
        .render(use_colors, get_terminal_width())
}

/// Standings as tab-separated values for scripting: rank, nickname, value (no headers, no colors)
pub fn format_standings_tsv<T: Display>(standings: &[Standing<T>]) -> String {
    standings
        .iter()
        .enumerate()
        .map(|(idx, s)| format!("{}\t{}\t{}", idx + 1, s.nickname, s.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_rules(rules: &RankingRules) -> String {
    let mut lines = vec!["Rank points:".to_string()];
    if rules.rank_points.is_empty() {
        lines.push("  (none)".to_string());
    }
    for (rank, points) in &rules.rank_points {
        lines.push(format!("  {:>3}  {}", rank, points));
    }
    lines.push("  other ranks  0".to_string());
    lines.push(format!("First buy-in bonus: {}", rules.first_buyin));
    lines.push(format!("Participation bonus: {}", rules.participation));
    lines.join("\n")
}

/// One line per game: "1. Friday (2024-03-01)  6 players"
pub fn format_game_list(sessions: &[Session], use_colors: bool) -> String {
    if sessions.is_empty() {
        return "No games recorded.".to_string();
    }
    sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let count = format!(
                "{} player{}",
                session.players.len(),
                if session.players.len() == 1 { "" } else { "s" }
            );
            if use_colors {
                format!("{}  {}", session.label(idx), count.dimmed())
            } else {
                format!("{}  {}", session.label(idx), count)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-game log: header, optional session details, then one row per player
pub fn format_game_detail(session: &Session, rows: &[GameRow], use_colors: bool) -> String {
    let title = format!("{} / {}", session.name, session.date);
    let mut out = vec![if use_colors { title.bold().to_string() } else { title }];

    let mut details = Vec::new();
    if let Some(time) = session.open_time {
        details.push(format!("Opened: {}", time.format("%H:%M")));
    }
    if let Some(cost) = session.buyin_cost {
        details.push(format!("Buy-in cost: {}", format_amount(cost)));
    }
    if let Some(pool) = session.prize_pool {
        details.push(format!("Prize pool: {}", format_amount(pool)));
    }
    if !details.is_empty() {
        out.push(details.join("  |  "));
    }
    out.push(String::new());

    let mut table = Table::new(
        vec!["Rank", "Nickname", "Buy-in", "Rebuy", "Cashout", "Points", "Score"],
        vec![true, false, true, true, true, true, true],
        1,
    );
    for row in rows {
        table.push(vec![
            Cell::plain(row.rank.to_string()),
            Cell::plain(row.nickname.clone()),
            Cell::plain(format_amount(row.buyin)),
            Cell::plain(row.rebuy.to_string()),
            Cell::plain(format_amount(row.cashout)),
            Cell::styled(format_points(row.net), Style::Signed(row.net)),
            Cell::styled(row.score.to_string(), Style::Bold),
        ]);
    }
    out.push(table.render(use_colors, get_terminal_width()));

    if !session.bonuses.is_empty() {
        out.push(String::new());
        out.push("Bonuses:".to_string());
        for bonus in &session.bonuses {
            out.push(format!(
                "  {}  {}  {}",
                bonus.nickname,
                format_points(bonus.amount),
                bonus.reason
            ));
        }
    }

    out.join("\n")
}

/// Player history: totals block followed by one row per game or adjustment
pub fn format_player_history(history: &PlayerHistory, use_colors: bool) -> String {
    let totals = &history.totals;
    let title = history.nickname.clone();
    let mut out = vec![
        if use_colors { title.bold().to_string() } else { title },
        format!("  Games played:     {}", totals.games),
        format!("  Cumulative points: {}", format_points(totals.net)),
        format!("  Cumulative score:  {}", totals.score),
        String::new(),
    ];

    let mut table = Table::new(
        vec!["Date", "Game", "Rank", "Points", "Score"],
        vec![false, false, true, true, true],
        1,
    );
    for row in &history.rows {
        let (label, rank, style) = match &row.source {
            HistorySource::Game { name, rank } => (name.clone(), rank.to_string(), Style::Plain),
            HistorySource::Adjustment { reason } => {
                let label = if reason.is_empty() {
                    "(adjustment)".to_string()
                } else {
                    format!("(adjustment) {}", reason)
                };
                (label, "-".to_string(), Style::Dimmed)
            }
        };
        table.push(vec![
            Cell::plain(row.date.to_string()),
            Cell::styled(label, style),
            Cell::plain(rank),
            Cell::styled(format_points(row.net), Style::Signed(row.net)),
            Cell::plain(row.score.to_string()),
        ]);
    }
    out.push(table.render(use_colors, get_terminal_width()));
    out.join("\n")
}

pub fn format_adjustments(adjustments: &[PointAdjustment], use_colors: bool) -> String {
    if adjustments.is_empty() {
        return "No point adjustments recorded.".to_string();
    }
    let mut table = Table::new(
        vec!["Date", "Nickname", "Points", "Reason"],
        vec![false, false, true, false],
        3,
    );
    for adj in adjustments {
        table.push(vec![
            Cell::plain(adj.date.to_string()),
            Cell::plain(adj.nickname.clone()),
            Cell::styled(format_points(adj.amount), Style::Signed(adj.amount)),
            Cell::plain(adj.reason.clone()),
        ]);
    }
    table.render(use_colors, get_terminal_width())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BonusEntry, PlayerEntry};
    use crate::scoring::{per_game_detail, per_player_history};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn standing<T>(nickname: &str, value: T) -> Standing<T> {
        Standing { nickname: nickname.to_string(), value }
    }

    fn sample_session() -> Session {
        Session::new(
            "Friday",
            date(1),
            vec![
                PlayerEntry::new("B", 10.0, 2, 0.0, 5),
                PlayerEntry::new("A", 10.0, 0, 30.0, 1),
            ],
        )
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10.0), "10");
        assert_eq!(format_amount(7.5), "7.5");
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
        assert_eq!(format_amount(-2.25), "-2.25");
        assert_eq!(format_amount(2.001), "2");
    }

    #[test]
    fn test_format_points_sign() {
        assert_eq!(format_points(20.0), "+20");
        assert_eq!(format_points(-5.5), "-5.5");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(-0.0), "0");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 20), "Short");
        assert_eq!(truncate("This is a very long name", 15), "This is a ve...");
        assert_eq!(truncate("Hello", 3), "Hel");
    }

    #[test]
    fn test_point_ranking_empty() {
        assert_eq!(format_point_ranking(&[], false), "No results in this period.");
        assert_eq!(format_score_ranking(&[], false), "No results in this period.");
    }

    #[test]
    fn test_table_alignment() {
        let standings = vec![standing("A", 20.0), standing("Longname", -30.0)];
        let out = standings_table(&standings, "Points", |v| Cell::plain(format_points(v)))
            .render(false, None);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("{:>2}  {:<8}  {:>6}", "#", "Nickname", "Points"));
        assert_eq!(lines[1], format!("{:>2}  {:<8}  {:>6}", "1.", "A", "+20"));
        assert_eq!(lines[2], format!("{:>2}  {:<8}  {:>6}", "2.", "Longname", "-30"));
    }

    #[test]
    fn test_table_truncates_flex_column() {
        let standings = vec![standing("An extremely long nickname indeed", 1i64)];
        let out = standings_table(&standings, "Score", |v| Cell::plain(v.to_string()))
            .render(false, Some(24));
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("..."));
        assert!(row.chars().count() <= 24);
    }

    #[test]
    fn test_standings_tsv() {
        let standings = vec![standing("A", 12i64), standing("B", 1)];
        assert_eq!(format_standings_tsv(&standings), "1\tA\t12\n2\tB\t1");
        assert_eq!(format_standings_tsv::<i64>(&[]), "");
    }

    #[test]
    fn test_format_rules() {
        let out = format_rules(&RankingRules::default());
        assert!(out.contains("    1  10"));
        assert!(out.contains("    3  3"));
        assert!(out.contains("First buy-in bonus: 1"));
        assert!(out.contains("Participation bonus: 1"));
    }

    #[test]
    fn test_format_game_list() {
        assert_eq!(format_game_list(&[], false), "No games recorded.");
        let out = format_game_list(&[sample_session()], false);
        assert_eq!(out, "1. Friday (2024-03-01)  2 players");
    }

    #[test]
    fn test_format_game_detail() {
        let mut session = sample_session();
        session.prize_pool = Some(50.0);
        session.bonuses.push(BonusEntry {
            nickname: "A".to_string(),
            amount: 5.0,
            reason: "royal flush".to_string(),
        });
        let rows = per_game_detail(&session, &RankingRules::default());
        let out = format_game_detail(&session, &rows, false);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Friday / 2024-03-01");
        assert_eq!(lines[1], "Prize pool: 50");
        assert!(lines[3].starts_with("Rank"));
        // Sorted by rank: A first
        assert!(lines[4].contains("A"));
        assert!(lines[4].ends_with(&format!("{:>6}  {:>5}", "+20", "12")));
        assert!(lines[5].ends_with(&format!("{:>6}  {:>5}", "-30", "1")));
        assert!(out.contains("A  +5  royal flush"));
    }

    #[test]
    fn test_format_player_history() {
        let sessions = vec![sample_session()];
        let adjustments = vec![PointAdjustment {
            nickname: "A".to_string(),
            amount: -5.0,
            reason: "late".to_string(),
            date: date(2),
        }];
        let history =
            per_player_history("A", &sessions, &adjustments, &RankingRules::default()).unwrap();
        let out = format_player_history(&history, false);

        assert!(out.contains("Games played:     1"));
        assert!(out.contains("Cumulative points: +15"));
        assert!(out.contains("Cumulative score:  12"));
        assert!(out.contains("2024-03-01  Friday"));
        assert!(out.contains("(adjustment) late"));
    }

    #[test]
    fn test_format_adjustments() {
        assert_eq!(format_adjustments(&[], false), "No point adjustments recorded.");
        let out = format_adjustments(
            &[PointAdjustment {
                nickname: "A".to_string(),
                amount: 3.0,
                reason: "dealer tip".to_string(),
                date: date(4),
            }],
            false,
        );
        assert!(out.lines().nth(1).unwrap().starts_with("2024-03-04  A"));
        assert!(out.contains("+3  dealer tip"));
    }
}
