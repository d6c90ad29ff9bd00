use crate::utils;
use anyhow::{Result, bail};
use clap::Args;
use kdam::term::Colorizer;
use log::error;
use pav_mpeg::analysis::{self, Analysis};
use serde::Serialize;
use std::{fs, path::Path};

/// Print the structure of .PAV files without decrypting them.
#[derive(Debug, Clone, Args)]
pub struct Analyze {
    /// Files, directories or glob patterns. Directories are searched for *.PAV files.
    #[arg(required = true)]
    input: Vec<String>,

    /// Print one json document with every report instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    file: String,
    #[serde(flatten)]
    analysis: Analysis,
}

impl Analyze {
    pub fn execute(self) -> Result<()> {
        let files = utils::collect_inputs(&self.input)?;

        if files.is_empty() {
            bail!("no input files found.");
        }

        let mut reports = vec![];
        let mut failed = 0;

        for file in &files {
            match analyze_file(file) {
                Ok(analysis) => {
                    if !self.json {
                        print!("{}", describe(&utils::file_name(file), &analysis));
                    }

                    reports.push(Report {
                        file: file.to_string_lossy().into_owned(),
                        analysis,
                    });
                }
                Err(e) => {
                    error!("{}: {}", utils::file_name(file), e);
                    failed += 1;
                }
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }

        if failed > 0 {
            bail!("{} of {} file(s) could not be analyzed.", failed, files.len());
        }

        Ok(())
    }
}

fn analyze_file(path: &Path) -> Result<Analysis> {
    Ok(analysis::analyze(&fs::read(path)?)?)
}

fn describe(name: &str, analysis: &Analysis) -> String {
    let mut text = format!(
        "{} {}\n",
        "File".colorize("bold green"),
        name.colorize("cyan")
    );

    text += &format!("  size       {}\n", utils::format_bytes(analysis.size, 2));
    text += &format!(
        "  clear      {} bytes, {} units ({} packs, {} video, {} audio, {} padding)\n",
        analysis.clear_len,
        analysis.scan.counts.total(),
        analysis.scan.counts.packs,
        analysis.scan.counts.video_pes,
        analysis.scan.counts.audio_pes,
        analysis.scan.counts.padding_pes,
    );

    if let Some(pack) = &analysis.scan.first_pack {
        text += &format!(
            "  first pack scr={} mux_rate={} bytes/s\n",
            pack.scr, pack.mux_rate
        );
    }

    text += &format!(
        "  encrypted  {:#X}.. {} bytes ({:.1}%)\n",
        analysis.scan.boundary, analysis.encrypted_len, analysis.encrypted_percent
    );
    text += &format!(
        "  last bytes {} (end code {})\n",
        hex::encode_upper(&analysis.last_bytes),
        if analysis.end_code {
            "clear".colorize("green")
        } else {
            "not found".colorize("yellow")
        }
    );

    match &analysis.periodicity {
        Some(periodicity) => {
            text += &format!(
                "  period     {} ({:.2}%) pattern {}\n",
                periodicity.key_len,
                periodicity.confidence * 100.0,
                hex::encode_upper(&periodicity.pattern)
            );

            if let Some(key) = &periodicity.key {
                text += &format!(
                    "  key        {} {}\n",
                    utils::display_key(key).colorize("bold cyan"),
                    hex::encode_upper(key)
                );
            }
        }
        None => text += "  period     none\n",
    }

    if let Some(distribution) = &analysis.distribution {
        text += &format!(
            "  bytes      {} sampled, frequency {}..{} (ratio {:.2})\n",
            distribution.sampled,
            distribution.min_frequency,
            distribution.max_frequency,
            distribution.ratio
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pav_mpeg::{MAGIC, decrypt::SubtractionCipher};

    fn sample() -> Vec<u8> {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&[
            0x00, 0x00, 0x01, 0xBA, 0x21, 0x00, 0x01, 0x00, 0x01, 0x80, 0x1B, 0x91,
        ]);
        let boundary = data.len();
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0xE0, 0x00, 0x03, 0x10, 0x20, 0x30]);
        data.resize(data.len() + 120, 0xFF);
        data.extend_from_slice(&[0x00, 0x00, 0x01, 0xB9]);
        SubtractionCipher::new(&b"WCW"[..])
            .unwrap()
            .encrypt_in_place(&mut data, boundary);
        data
    }

    #[test]
    fn test_describe() {
        let analysis = analysis::analyze(&sample()).unwrap();
        let text = describe("INTRO.PAV", &analysis);

        assert!(text.contains("INTRO.PAV"));
        assert!(text.contains("0x16.."));
        assert!(text.contains("WCW"));
        assert!(text.contains("574357"));
    }

    #[test]
    fn test_json_report() {
        let report = Report {
            file: "INTRO.PAV".to_owned(),
            analysis: analysis::analyze(&sample()).unwrap(),
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["file"], "INTRO.PAV");
        assert_eq!(value["scan"]["boundary"], 22);
        assert_eq!(value["periodicity"]["key_len"], 3);
        assert_eq!(value["end_code"], false);
    }
}
