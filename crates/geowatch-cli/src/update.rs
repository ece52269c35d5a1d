//! The update run: reconcile both domains, flush caches, write the report.

use anyhow::Context as _;
use chrono::Utc;

use geowatch_report::{commit_summary, render_report, HumanDate};
use geowatch_scraper::{BulletinClient, Endpoints};
use geowatch_store::Store;
use geowatch_sync::{reconcile_earthquakes, reconcile_volcanoes, RunReport};

use crate::config::AppConfig;

/// Runs one full update cycle.
///
/// The two domains run as independent tasks; a failure in one is logged and
/// does not stop the other. Caches are flushed even after a partial failure
/// so whatever succeeded is kept.
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = Store::new(&config.data_dir);
    let client = BulletinClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build http client")?;
    let endpoints = Endpoints::new(&config.base_url);

    let mut quake_cache = store
        .load_earthquakes()
        .context("failed to load earthquake cache")?;
    let mut volcano_cache = store
        .load_volcanoes()
        .context("failed to load volcano cache")?;

    let mut report = RunReport::new(Utc::now());

    let (quake_result, volcano_result) = tokio::join!(
        reconcile_earthquakes(&client, &endpoints, &mut quake_cache),
        reconcile_volcanoes(&client, &endpoints, &mut volcano_cache),
    );

    match quake_result {
        Ok(updated) => report.earthquakes_updated = updated,
        Err(err) => tracing::error!(error = %err, "earthquake run failed"),
    }
    match volcano_result {
        Ok(updated) => report.volcanoes_updated = updated,
        Err(err) => tracing::error!(error = %err, "volcano run failed"),
    }

    // Flush whatever succeeded, failures notwithstanding.
    if let Some(cache) = &mut quake_cache {
        store
            .save_earthquakes(cache)
            .context("failed to save earthquake cache")?;
    }
    if let Some(cache) = &mut volcano_cache {
        store
            .save_volcanoes(cache)
            .context("failed to save volcano cache")?;
    }

    if report.is_empty() {
        tracing::info!("no changes this run");
        return Ok(());
    }

    tracing::info!(
        earthquakes = report.earthquakes_updated.len(),
        volcanoes = report.volcanoes_updated.len(),
        "changes detected"
    );

    let human = HumanDate::from_utc(report.run_timestamp);
    store
        .save_report(&human.file_stamp, &render_report(&report))
        .context("failed to save report")?;

    if let Some(summary) = commit_summary(&report) {
        println!("{summary}");
    }

    Ok(())
}
