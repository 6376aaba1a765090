use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use riskband_core::{evaluate, Patient};
use riskband_note::render;
use riskband_phrase::parse_phrase;

#[derive(Parser, Debug)]
#[command(
    name = "riskband-cli",
    about = "Band one patient's cardiovascular risk inputs and print the note."
)]
struct Args {
    /// Path to a smart-phrase text file.
    #[arg(short, long, conflicts_with = "fields")]
    input: Option<PathBuf>,
    /// Path to a JSON field mapping (the form boundary contract).
    #[arg(short, long)]
    fields: Option<PathBuf>,
    /// Print the structured result as JSON instead of the rendered note.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let patient: Patient = match (&args.input, &args.fields) {
        (Some(path), None) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read smart-phrase file {:?}", path))?;
            parse_phrase(&text)?
        }
        (None, Some(path)) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read fields file {:?}", path))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Fields file {:?} is not a valid patient mapping", path))?
        }
        _ => anyhow::bail!("Provide exactly one of --input or --fields"),
    };

    let result = evaluate(&patient)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&patient, &result));
    }

    Ok(())
}
