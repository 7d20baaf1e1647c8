use anyhow::{Context, Result};

use super::super::{args::ExtractCommand, exit_status::ExitStatus, report};
use crate::{
    core::{Dictionary, ExtractContext, ExtractOptions},
    json_writer::{JsonWriter, to_pretty_json},
};

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let verbose = cmd.common.verbose;
    let options = ExtractOptions {
        pattern: cmd.pattern.clone(),
        config_dir: std::env::current_dir().context("Failed to get current directory")?,
        mode: cmd.key_mode(),
        verbose,
    };

    let writer = cmd.output.as_deref().map(JsonWriter::new);
    let mut dictionary = match &writer {
        Some(writer) if !cmd.overwrite => writer.read_existing()?,
        _ => Dictionary::new(),
    };

    let ctx = ExtractContext::new(&options)?;
    if ctx.files.is_empty() {
        report::print_no_files_warning(&cmd.pattern);
    }

    let summary = ctx.run(&mut dictionary)?;

    match &writer {
        Some(writer) => writer.save(&dictionary)?,
        None => println!("{}", to_pretty_json(&dictionary)?),
    }

    report::print_parse_warning(summary.parse_errors.len(), verbose);
    if let Some(output) = &cmd.output {
        report::print_success(&summary, output);
    }

    if summary.parse_errors.is_empty() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}
