//! Renders reports as tables or JSON.

use alloy_primitives::{Address, B256, U256};
use retryable_finder::{ClassificationResult, InboxSummary, PairFailure, Report};
use retryable_protocol::{NitroChain, RetryableStatus};
use std::fmt::Write;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Style, object::Columns},
};

/// The output format of a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable tables.
    #[default]
    Table,
    /// Pretty printed JSON.
    Json,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Block")]
    block: u64,
    #[tabled(rename = "Seq")]
    sequence_number: U256,
    #[tabled(rename = "Status")]
    status: RetryableStatus,
    #[tabled(rename = "Parent Tx")]
    parent_tx_hash: B256,
    #[tabled(rename = "Ticket Creation Tx")]
    create_tx_hash: B256,
    #[tabled(rename = "Auto-redeem Tx")]
    retry_tx_hash: String,
}

impl From<&ClassificationResult> for ResultRow {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            block: result.block_number,
            sequence_number: result.sequence_number,
            status: result.status,
            parent_tx_hash: result.parent_tx_hash,
            create_tx_hash: result.create_tx_hash,
            retry_tx_hash: result.retry_tx_hash.map_or_else(|| "-".to_string(), |h| h.to_string()),
        }
    }
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Block")]
    block: u64,
    #[tabled(rename = "Seq")]
    sequence_number: U256,
    #[tabled(rename = "Parent Tx")]
    parent_tx_hash: B256,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&PairFailure> for FailureRow {
    fn from(failure: &PairFailure) -> Self {
        Self {
            block: failure.block_number,
            sequence_number: failure.sequence_number,
            parent_tx_hash: failure.parent_tx_hash,
            kind: failure.error.kind(),
            error: failure.error.to_string(),
        }
    }
}

#[derive(Tabled)]
struct InboxRow {
    #[tabled(rename = "Inbox")]
    inbox: Address,
    #[tabled(rename = "First Block")]
    first_block: u64,
    #[tabled(rename = "Last Block")]
    last_block: u64,
    #[tabled(rename = "Messages")]
    messages: usize,
    #[tabled(rename = "Retryables")]
    retryables: usize,
    #[tabled(rename = "By Kind")]
    kinds: String,
}

impl From<&InboxSummary> for InboxRow {
    fn from(summary: &InboxSummary) -> Self {
        let kinds = summary
            .kinds
            .iter()
            .map(|k| format!("{}={}", k.kind, k.count))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            inbox: summary.inbox,
            first_block: summary.first_block,
            last_block: summary.last_block,
            messages: summary.messages(),
            retryables: summary.retryables(),
            kinds,
        }
    }
}

fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.modify(Columns::first(), Alignment::right());
    table.to_string()
}

/// Renders a finder report.
///
/// Tables list the pending retryables with the reason each needs attention, the redeemed ones and
/// the ones that could not be classified. Empty sections are omitted.
pub fn report(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut out = String::new();
    if report.is_empty() {
        writeln!(out, "No retryables found.")?;
        return Ok(out);
    }
    if !report.pending.is_empty() {
        writeln!(out, "Pending retryables ({}):", report.pending.len())?;
        writeln!(out, "{}", table(report.pending.iter().map(ResultRow::from)))?;
        for status in RetryableStatus::ALL.into_iter().filter(|s| s.is_pending()) {
            let count = report.pending_with_status(status).count();
            if count > 0 {
                writeln!(out, "  {status}: {count} ({})", status.reason())?;
            }
        }
    }
    if !report.redeemed.is_empty() {
        writeln!(out, "Redeemed retryables ({}):", report.redeemed.len())?;
        writeln!(out, "{}", table(report.redeemed.iter().map(ResultRow::from)))?;
    }
    if !report.failures.is_empty() {
        writeln!(out, "Unclassified retryables ({}):", report.failures.len())?;
        writeln!(out, "{}", table(report.failures.iter().map(FailureRow::from)))?;
    }
    Ok(out)
}

/// Renders the inboxes discovered behind a bridge.
pub fn inboxes(summaries: &[InboxSummary], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
        OutputFormat::Table if summaries.is_empty() => Ok("No inbox messages found.".to_string()),
        OutputFormat::Table => Ok(table(summaries.iter().map(InboxRow::from))),
    }
}

/// Renders the known networks.
pub fn networks(chains: &[NitroChain], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(chains)?),
        OutputFormat::Table => Ok(table(chains)),
    }
}
