use std::io::Write;

use anyhow::{Context, Result};
use follower_core::ProfileId;
use follower_engine::{EngineEvent, EngineHandle, Orchestrator, ScrapeResponse};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};

use crate::config::AppConfig;

/// Scrapes every input in order and writes one JSON result per line.
///
/// Returns `true` when every scrape succeeded.
pub fn run(config: AppConfig, inputs: &[String], out: &mut impl Write) -> Result<bool> {
    let mut all_ok = true;
    let mut jobs = Vec::new();

    for input in inputs {
        match ProfileId::parse(input) {
            Ok(profile_id) => jobs.push(profile_id),
            Err(err) => {
                scrape_warn!("Skipping {:?}: {}", input, err);
                write_response(out, &ScrapeResponse::invalid_request(&err))?;
                all_ok = false;
            }
        }
    }
    if jobs.is_empty() {
        return Ok(all_ok);
    }

    let orchestrator =
        Orchestrator::over_http(config.endpoints, &config.fetch, config.collector)?;
    let engine = EngineHandle::new(orchestrator, config.credential);
    for (job_id, profile_id) in (1u64..).zip(jobs.iter().cloned()) {
        scrape_info!("Queued job_id={} profile={}", job_id, profile_id);
        engine.enqueue(job_id, profile_id);
    }

    let mut remaining = jobs.len();
    while remaining > 0 {
        let event = engine
            .recv()
            .context("scrape worker stopped before finishing all jobs")?;
        match event {
            EngineEvent::Progress(progress) => {
                scrape_debug!(
                    "job_id={} page={} total={}",
                    progress.job_id,
                    progress.page,
                    progress.total
                );
            }
            EngineEvent::TokenRefreshed { job_id, page } => {
                scrape_debug!("job_id={} refreshed token at page {}", job_id, page);
            }
            EngineEvent::ScrapeCompleted {
                job_id,
                profile_id,
                response,
            } => {
                scrape_info!(
                    "job_id={} profile={} status={}",
                    job_id,
                    profile_id,
                    response.http_status()
                );
                all_ok &= response.success;
                write_response(out, &response)?;
                remaining -= 1;
            }
        }
    }

    Ok(all_ok)
}

fn write_response(out: &mut impl Write, response: &ScrapeResponse) -> Result<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_inputs_are_answered_without_scraping() {
        let mut out = Vec::new();
        let inputs = vec!["".to_string(), "https://example.com/users/1".to_string()];

        let ok = run(AppConfig::default(), &inputs, &mut out).unwrap();

        assert!(!ok);
        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["success"], false);
        assert_eq!(lines[0]["error"], "missing profile url or id");
        assert!(lines[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("could not extract a profile id"));
    }

    #[test]
    fn no_inputs_is_trivially_ok() {
        let mut out = Vec::new();
        assert!(run(AppConfig::default(), &[], &mut out).unwrap());
        assert!(out.is_empty());
    }
}
