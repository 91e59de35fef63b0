use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::{Ranking, Standing};

pub const POINT_EXPORT_FILE: &str = "point.csv";
pub const SCORE_EXPORT_FILE: &str = "score.csv";

/// Write standings as CSV with a header row: nickname,<value_header>
pub fn write_standings_csv<W, T, F>(
    writer: W,
    standings: &[Standing<T>],
    value_header: &str,
    render_value: F,
) -> Result<()>
where
    W: Write,
    T: Copy,
    F: Fn(T) -> String,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["nickname", value_header])
        .context("Failed to write CSV header")?;
    for standing in standings {
        out.write_record([standing.nickname.as_str(), render_value(standing.value).as_str()])
            .with_context(|| format!("Failed to write CSV row for '{}'", standing.nickname))?;
    }
    out.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export both rankings as spreadsheet-friendly CSV files in `dir`.
///
/// Returns the paths written: point.csv then score.csv.
pub fn export_ranking(dir: &Path, ranking: &Ranking) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let point_path = dir.join(POINT_EXPORT_FILE);
    let file = std::fs::File::create(&point_path)
        .with_context(|| format!("Failed to create {}", point_path.display()))?;
    write_standings_csv(file, &ranking.points, "points", |v| v.to_string())?;

    let score_path = dir.join(SCORE_EXPORT_FILE);
    let file = std::fs::File::create(&score_path)
        .with_context(|| format!("Failed to create {}", score_path.display()))?;
    write_standings_csv(file, &ranking.scores, "score", |v| v.to_string())?;

    log::info!(
        "Exported {} point rows and {} score rows to {}",
        ranking.points.len(),
        ranking.scores.len(),
        dir.display()
    );

    Ok(vec![point_path, score_path])
}
