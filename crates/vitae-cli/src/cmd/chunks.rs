use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Datelike;
use std::path::Path;
use vitae_core::config::Config;
use vitae_core::range::{chunk, Granularity};

pub fn run(
    config_path: &Path,
    granularity: &str,
    from: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let granularity = match granularity {
        "month" => Granularity::Month,
        "year" => Granularity::Year,
        other => anyhow::bail!("unknown granularity '{other}': expected 'month' or 'year'"),
    };

    let (year, month) = match from {
        Some(s) => parse_year_month(s)?,
        None => {
            let cfg = Config::load(config_path).context("failed to load config")?;
            let since = cfg.development.coding_since;
            (since.year(), since.month())
        }
    };

    let ranges = chunk(granularity, year, month);

    if json {
        return print_json(&ranges);
    }

    if ranges.is_empty() {
        println!("(no ranges — start is not before now)");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = ranges
        .iter()
        .map(|r| {
            vec![
                r.from.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                r.to.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ]
        })
        .collect();
    print_table(&["FROM", "TO"], &rows);
    Ok(())
}

fn parse_year_month(s: &str) -> anyhow::Result<(i32, u32)> {
    let (y, m) = s
        .split_once('-')
        .with_context(|| format!("invalid --from '{s}': expected YYYY-MM"))?;
    let year: i32 = y.parse().with_context(|| format!("invalid year in '{s}'"))?;
    let month: u32 = m.parse().with_context(|| format!("invalid month in '{s}'"))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("invalid month {month}: expected 1-12");
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_month() {
        assert_eq!(parse_year_month("2024-03").unwrap(), (2024, 3));
        assert_eq!(parse_year_month("1999-12").unwrap(), (1999, 12));
    }

    #[test]
    fn rejects_bad_month() {
        assert!(parse_year_month("2024-13").is_err());
        assert!(parse_year_month("2024-0").is_err());
        assert!(parse_year_month("2024").is_err());
        assert!(parse_year_month("march").is_err());
    }
}
