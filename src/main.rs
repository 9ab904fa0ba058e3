use std::env;
use std::process::ExitCode;

use serde::Serialize;
use vgmio::{Command, VgmFile};

#[derive(Serialize)]
struct Summary<'a> {
    version: String,
    header: &'a vgmio::Header,
    gd3: &'a vgmio::Gd3Tags,
    command_count: usize,
    total_wait_samples: u64,
    data_block_bytes: Option<usize>,
}

fn summarize(vgm: &VgmFile) -> vgmio::VgmResult<Summary<'_>> {
    let total_wait_samples = vgm
        .commands
        .iter()
        .filter_map(Command::wait_samples)
        .map(u64::from)
        .sum();

    Ok(Summary {
        version: vgm.version_str()?,
        header: &vgm.header,
        gd3: &vgm.gd3,
        command_count: vgm.commands.len(),
        total_wait_samples,
        data_block_bytes: vgm.data_block.as_ref().map(Vec::len),
    })
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: vgmio <file.vgm|file.vgz>");
            return ExitCode::FAILURE;
        },
    };

    let vgm = match VgmFile::from_path(&path) {
        Ok(vgm) => vgm,
        Err(e) => {
            eprintln!("error [{}]: {}", e.category(), e);
            return ExitCode::FAILURE;
        },
    };

    let summary = match summarize(&vgm) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error [{}]: {}", e.category(), e);
            return ExitCode::FAILURE;
        },
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("error: failed to render summary: {}", e);
            ExitCode::FAILURE
        },
    }
}
