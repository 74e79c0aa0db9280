use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use std::path::Path;
use std::time::Duration;
use vitae_core::config::{Config, WarnLevel};
use vitae_core::github::GithubClient;
use vitae_core::stats::{self, Aggregates, StatsRecord};
use vitae_core::throttle::FixedDelay;
use vitae_core::{publish, template};

pub fn run(
    config_path: &Path,
    template_path: &Path,
    dry_run: bool,
    message: &str,
    pace: u64,
    json: bool,
) -> anyhow::Result<()> {
    let cfg = Config::load(config_path).context("failed to load config")?;

    let today = Utc::now().date_naive();
    let errors: Vec<String> = cfg
        .validate(today)
        .into_iter()
        .filter(|w| w.level == WarnLevel::Error)
        .map(|w| w.message)
        .collect();
    if !errors.is_empty() {
        anyhow::bail!("invalid config: {}", errors.join("; "));
    }

    let template_text = std::fs::read_to_string(template_path)
        .with_context(|| format!("failed to read template {}", template_path.display()))?;

    let client = GithubClient::from_env()?;
    let pacer = FixedDelay(Duration::from_secs(pace));

    let rt = tokio::runtime::Runtime::new()?;
    let (agg, rendered, publish_calls) = rt.block_on(async {
        let login = cfg.authentication.login.as_str();
        let since = cfg.development.coding_since;
        let now = Utc::now();

        // Strictly sequential: one aggregator at a time, to keep API usage
        // predictable under the remote rate limit.
        let contributions = stats::contributions_since(&client, login, since, now).await?;
        let lines = stats::lines_since(&client, login, since, now, &pacer).await?;
        let repos = stats::repos_of(&client, login).await?;
        let agg = Aggregates { contributions, lines, repos };

        let record = StatsRecord::new(&cfg, &agg, today)?;
        let rendered = template::render(&template_text, &record.placeholders());

        let publish_calls = if dry_run {
            None
        } else {
            let receipt = publish::publish(
                &client,
                login,
                &cfg.authentication.repository,
                &cfg.authentication.document_path,
                &rendered,
                message,
            )
            .await?;
            Some(receipt.api_calls)
        };
        Ok::<_, vitae_core::VitaeError>((agg, rendered, publish_calls))
    })?;

    let total_calls = agg.api_calls() + publish_calls.unwrap_or(0);

    if json {
        #[derive(serde::Serialize)]
        struct RunReport<'a> {
            aggregates: &'a Aggregates,
            published: bool,
            total_api_calls: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            rendered: Option<&'a str>,
        }
        return print_json(&RunReport {
            aggregates: &agg,
            published: publish_calls.is_some(),
            total_api_calls: total_calls,
            rendered: dry_run.then_some(rendered.as_str()),
        });
    }

    if dry_run {
        // The rendered document is the output; pipe it wherever.
        print!("{rendered}");
        return Ok(());
    }

    println!(
        "Contributions: {} ({} calls)",
        agg.contributions.total, agg.contributions.api_calls
    );
    println!(
        "Lines: +{} / -{} ({} calls)",
        agg.lines.additions, agg.lines.deletions, agg.lines.api_calls
    );
    println!(
        "Repositories: {} with {} stars ({} calls)",
        agg.repos.repos, agg.repos.stars, agg.repos.api_calls
    );
    println!(
        "Published {}/{}/{}",
        cfg.authentication.login, cfg.authentication.repository, cfg.authentication.document_path
    );
    println!("Total API calls: {total_calls}");
    Ok(())
}
