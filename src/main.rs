use anyhow::{bail, Context};
use glasspen::hotkey::{self, HotkeyTrigger};

const USAGE: &str = "usage: glasspen [--toggle | --quit]";

fn trigger_from_args(args: &[String]) -> anyhow::Result<Option<HotkeyTrigger>> {
    match args {
        [] => Ok(None),
        [flag] if flag == "--toggle" => Ok(Some(HotkeyTrigger::ToggleMode)),
        [flag] if flag == "--quit" => Ok(Some(HotkeyTrigger::Quit)),
        _ => bail!("{USAGE}"),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match trigger_from_args(&args)? {
        Some(trigger) => hotkey::send(trigger)
            .with_context(|| format!("could not reach a running overlay ({})", trigger.command())),
        None => glasspen::run().context("glasspen overlay failed"),
    }
}
