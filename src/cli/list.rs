//! List mode: show the certification packs found on disk

use crate::domain::{CertificationRepository, CertificationSummary};
use anyhow::Context;

pub fn render_list(summaries: &[CertificationSummary]) -> String {
    if summaries.is_empty() {
        return "No certifications found.".to_string();
    }

    let mut out = String::from("Available certifications:\n\n");
    for summary in summaries {
        out.push_str(&format!(
            "  {:<12} {} ({} domains)\n",
            summary.id, summary.name, summary.domain_count
        ));
        if !summary.full_name.is_empty() && summary.full_name != summary.name {
            out.push_str(&format!("  {:<12} {}\n", "", summary.full_name));
        }
        if !summary.organization.is_empty() {
            out.push_str(&format!("  {:<12} by {}\n", "", summary.organization));
        }
    }
    out
}

pub async fn run_list(repository: &dyn CertificationRepository) -> anyhow::Result<()> {
    let summaries = repository
        .discover()
        .await
        .context("Failed to discover certifications")?;
    println!("{}", render_list(&summaries));
    Ok(())
}
