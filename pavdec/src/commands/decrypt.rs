use crate::utils;
use anyhow::{Result, bail};
use clap::Args;
use kdam::{BarExt, Column, RichProgress, term::Colorizer, tqdm};
use log::{LevelFilter, debug, error, info};
use pav_mpeg::decrypt::{Decrypted, PavDecryptingProcessor};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Recover the key of each .PAV file and write the decrypted MPEG-1 stream.
#[derive(Debug, Clone, Args)]
pub struct Decrypt {
    /// Files, directories or glob patterns. Directories are searched for *.PAV files.
    #[arg(default_value = "iso_contents")]
    input: Vec<String>,

    /// Directory where NAME.mpg files are written.
    #[arg(short, long, default_value = "extracted")]
    output: PathBuf,

    /// Number of files decrypted in parallel. Defaults to the number of cpus.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Minimum tail autocorrelation for a key length to be tried.
    #[arg(long, default_value_t = 0.90)]
    confidence: f64,

    /// Tail window sizes tried for each key length, as multiples of it.
    #[arg(long, value_delimiter = ',', default_values_t = [3, 5, 8, 12, 20])]
    window_multipliers: Vec<usize>,

    /// Longest key length tried.
    #[arg(long, default_value_t = 128)]
    max_key_len: usize,
}

struct Outcome {
    input: PathBuf,
    /// Size of the written stream.
    result: pav_mpeg::Result<usize>,
}

impl Decrypt {
    pub fn execute(self) -> Result<()> {
        let processor = PavDecryptingProcessor::builder()
            .confidence_threshold(self.confidence)
            .window_multipliers(self.window_multipliers.iter().copied())
            .max_key_len(self.max_key_len)
            .build()?;

        let files = utils::collect_inputs(&self.input)?;

        if files.is_empty() {
            bail!("no input files found.");
        }

        let outputs = utils::output_paths(&files, &self.output, "mpg")?;

        if !self.output.exists() {
            fs::create_dir_all(&self.output)?;
        }

        info!(
            "Decrypting {} file(s) into {}",
            files.len(),
            self.output.to_string_lossy().colorize("cyan")
        );

        let pb = Mutex::new(progress_bar(files.len(), log::max_level()));
        let mut pool = rayon::ThreadPoolBuilder::new();

        if let Some(threads) = self.threads {
            pool = pool.num_threads(threads);
        }

        let outcomes = pool.build()?.install(|| {
            files
                .par_iter()
                .zip(&outputs)
                .map(|(input, output)| {
                    let result = processor.decrypt_file_to_file(input, output);
                    let line = report(input, output, &result);

                    match pb.lock().as_deref_mut() {
                        Ok(Some(pb)) => {
                            let _ = pb.write(line);
                            let _ = pb.update(1);
                        }
                        _ if result.is_err() => error!("{}", line),
                        _ => info!("{}", line),
                    }

                    Outcome {
                        input: input.to_owned(),
                        result: result.map(|x| x.payload.len()),
                    }
                })
                .collect::<Vec<_>>()
        });

        if let Ok(Some(pb)) = pb.lock().as_deref_mut() {
            let _ = pb.clear();
        }

        summary(&outcomes)
    }
}

/// Progress bar for `total` files, only drawn when info messages are shown.
fn progress_bar(total: usize, level: LevelFilter) -> Option<RichProgress> {
    if level < LevelFilter::Info {
        return None;
    }

    Some(RichProgress::new(
        tqdm!(total = total, unit = " FILE".to_owned()),
        vec![
            Column::Text("[bold blue]Decrypting".to_owned()),
            Column::Animation,
            Column::Percentage(0),
            Column::Text("•".to_owned()),
            Column::CountTotal,
            Column::Text("•".to_owned()),
            Column::ElapsedTime,
        ],
    ))
}

fn report(input: &Path, output: &Path, result: &pav_mpeg::Result<Decrypted>) -> String {
    let name = utils::file_name(input);

    match result {
        Ok(decrypted) => {
            debug!(
                "{} key {} window {:#X}..{:#X} -> {}",
                name,
                hex::encode_upper(&decrypted.key.key),
                decrypted.key.window.start,
                decrypted.key.window.end,
                output.to_string_lossy()
            );

            format!(
                "{} {} key_len={} enc@{:#X} end={} size={} key={}",
                "OK".colorize("bold green"),
                name,
                decrypted.key.key.len(),
                decrypted.scan.boundary,
                if decrypted.end_code {
                    "ok".colorize("green")
                } else {
                    "missing".colorize("yellow")
                },
                utils::format_bytes(decrypted.payload.len(), 1),
                utils::display_key(&decrypted.key.key).colorize("cyan"),
            )
        }
        Err(e) => format!("{} {} {}", "FAIL".colorize("bold red"), name, e),
    }
}

fn summary(outcomes: &[Outcome]) -> Result<()> {
    let mut failed = 0;
    let mut total = 0;

    for outcome in outcomes {
        match &outcome.result {
            Ok(size) => total += size,
            Err(_) => failed += 1,
        }
    }

    info!(
        "{}/{} file(s) decrypted ({})",
        outcomes.len() - failed,
        outcomes.len(),
        utils::format_bytes(total, 2)
    );

    if failed > 0 {
        let names = outcomes
            .iter()
            .filter(|x| x.result.is_err())
            .map(|x| utils::file_name(&x.input))
            .collect::<Vec<_>>();
        bail!("{} file(s) failed: {}", failed, names.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Args, Commands};
    use clap::Parser;

    #[test]
    fn test_decrypt_args() {
        let args = Args::parse_from([
            "pavdec",
            "decrypt",
            "disc/VIDEO",
            "-o",
            "out",
            "--threads",
            "2",
            "--window-multipliers",
            "4,6",
            "--max-key-len",
            "32",
        ]);

        let Commands::Decrypt(decrypt) = args.command else {
            panic!("expected decrypt");
        };

        assert_eq!(decrypt.input, ["disc/VIDEO"]);
        assert_eq!(decrypt.output, PathBuf::from("out"));
        assert_eq!(decrypt.threads, Some(2));
        assert_eq!(decrypt.confidence, 0.90);
        assert_eq!(decrypt.window_multipliers, [4, 6]);
        assert_eq!(decrypt.max_key_len, 32);
    }

    #[test]
    fn test_decrypt_defaults() {
        let args = Args::parse_from(["pavdec", "decrypt"]);

        let Commands::Decrypt(decrypt) = args.command else {
            panic!("expected decrypt");
        };

        assert_eq!(decrypt.input, ["iso_contents"]);
        assert_eq!(decrypt.output, PathBuf::from("extracted"));
        assert_eq!(decrypt.window_multipliers, [3, 5, 8, 12, 20]);
        assert_eq!(decrypt.max_key_len, 128);
    }

    #[test]
    fn test_quiet_has_no_progress_bar() {
        assert!(progress_bar(4, LevelFilter::Warn).is_none());
        assert!(progress_bar(4, LevelFilter::Off).is_none());
        assert!(progress_bar(4, LevelFilter::Info).is_some());
        assert!(progress_bar(4, LevelFilter::Trace).is_some());
    }

    #[test]
    fn test_summary_fails_on_any_error() {
        let outcomes = [Outcome {
            input: PathBuf::from("BAD.PAV"),
            result: Err(pav_mpeg::Error::InvalidKey(0)),
        }];
        let err = summary(&outcomes).unwrap_err();
        assert!(err.to_string().contains("BAD.PAV"));
        assert!(summary(&[]).is_ok());
    }
}
