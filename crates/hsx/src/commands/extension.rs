//! Extension record commands

use anyhow::Result;
use hsx_core::types::ExtensionRecord;
use hsx_extensions::ExtensionStore;
use tabled::{Table, Tabled};

use super::Context;
use crate::cli::{ExtensionCommands, ExtensionListArgs, ExtensionRemoveRecordArgs};
use crate::output;

pub fn run(cmd: ExtensionCommands, ctx: &Context) -> Result<()> {
    match cmd {
        ExtensionCommands::List(args) => list(args, ctx),
        ExtensionCommands::RemoveRecord(args) => remove_record(args, ctx),
    }
}

#[derive(Tabled, serde::Serialize)]
struct RecordRow {
    id: String,
    #[tabled(rename = "type")]
    kind: String,
    thumbprint: String,
}

impl From<&ExtensionRecord> for RecordRow {
    fn from(record: &ExtensionRecord) -> Self {
        Self {
            id: record.id.clone(),
            kind: record.kind.to_string(),
            thumbprint: match (&record.thumbprint, &record.thumbprint_algorithm) {
                (Some(t), Some(alg)) => format!("{} ({})", t, alg),
                (Some(t), None) => t.clone(),
                (None, _) => "-".to_string(),
            },
        }
    }
}

fn list(args: ExtensionListArgs, ctx: &Context) -> Result<()> {
    let (_, channel) = ctx.open()?;
    let store = ExtensionStore::new(&channel, args.service.as_str());
    let rows: Vec<RecordRow> = store.list()?.iter().map(RecordRow::from).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        output::warning(&format!("No extension records registered for {}", args.service));
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

fn remove_record(args: ExtensionRemoveRecordArgs, ctx: &Context) -> Result<()> {
    let (_, channel) = ctx.open()?;
    let store = ExtensionStore::new(&channel, args.service.as_str());
    store.delete(&args.id)?;
    output::success(&format!("Deleted extension record {}", args.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsx_core::types::ExtensionKind;

    #[test]
    fn test_record_row() {
        let record = ExtensionRecord::new(
            "Default-RDP-Production-Ext-0",
            ExtensionKind::remote_desktop(),
            "",
            "",
        )
        .with_thumbprint("ABC", "sha1");
        let row = RecordRow::from(&record);
        assert_eq!(row.thumbprint, "ABC (sha1)");
        assert_eq!(row.kind, "Microsoft.Windows.Azure.Extensions.RDP");

        let bare = ExtensionRecord::new("x", ExtensionKind::diagnostics(), "", "");
        assert_eq!(RecordRow::from(&bare).thumbprint, "-");
    }
}
