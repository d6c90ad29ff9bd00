use anyhow::{Result, bail};
use log::warn;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(super) fn format_bytes(bytesval: usize, precision: usize) -> String {
    let mut val = bytesval as f32;

    for unit in ["bytes", "KiB", "MiB", "GiB", "TiB"] {
        if val < 1024.0 {
            return format!("{:.precision$} {}", val, unit, precision = precision);
        }

        val /= 1024.0;
    }

    format!("{:.precision$} PiB", val, precision = precision)
}

/// Printable ASCII as is, everything else as `.`.
pub(super) fn display_key(key: &[u8]) -> String {
    key.iter()
        .map(|&x| {
            if (32..127).contains(&x) {
                x as char
            } else {
                '.'
            }
        })
        .collect()
}

pub(super) fn is_pav(path: &Path) -> bool {
    path.extension()
        .is_some_and(|x| x.eq_ignore_ascii_case("pav"))
}

/// Expand files, directories and glob patterns into a sorted list of
/// canonical file paths.
///
/// Directories contribute their `*.pav` files (any case). Explicit files are
/// taken as given. A file reached through several inputs is listed once.
pub(super) fn collect_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = vec![];

    for input in inputs {
        let path = Path::new(input);
        let before = files.len();

        if path.is_dir() {
            for entry in fs::read_dir(path)? {
                let entry = entry?.path();

                if entry.is_file() && is_pav(&entry) {
                    files.push(entry);
                }
            }
        } else if path.is_file() {
            files.push(path.to_owned());
        } else {
            for entry in glob::glob(input)? {
                let entry = entry?;

                if entry.is_file() {
                    files.push(entry);
                }
            }
        }

        if files.len() == before {
            warn!("No .PAV files found for {}", input);
        }
    }

    let mut files = files
        .into_iter()
        .map(fs::canonicalize)
        .collect::<std::io::Result<Vec<_>>>()?;
    files.sort();
    files.dedup();
    Ok(files)
}

/// `NAME.PAV` becomes `directory/NAME.<extension>`.
pub(super) fn output_path(input: &Path, directory: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    directory.join(stem).with_extension(extension)
}

/// Output path of every input, in order.
///
/// Fails when two inputs would be written to the same file, for example
/// `INTRO.PAV` from two different discs.
pub(super) fn output_paths(
    inputs: &[PathBuf],
    directory: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let outputs = inputs
        .iter()
        .map(|x| output_path(x, directory, extension))
        .collect::<Vec<_>>();

    for (i, output) in outputs.iter().enumerate() {
        if let Some(j) = outputs[..i].iter().position(|x| x == output) {
            bail!(
                "{} and {} would both be written to {}.",
                inputs[j].to_string_lossy(),
                inputs[i].to_string_lossy(),
                output.to_string_lossy()
            );
        }
    }

    Ok(outputs)
}

pub(super) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512, 0), "512 bytes");
        assert_eq!(format_bytes(1536, 1), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024, 0), "3 MiB");
    }

    #[test]
    fn test_display_key() {
        assert_eq!(display_key(b"WCW\x00\xFF~"), "WCW..~");
    }

    #[test]
    fn test_is_pav() {
        assert!(is_pav(Path::new("iso/INTRO.PAV")));
        assert!(is_pav(Path::new("intro.pav")));
        assert!(!is_pav(Path::new("intro.mpg")));
        assert!(!is_pav(Path::new("PAV")));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("iso/MATCH01.PAV"), Path::new("out"), "mpg"),
            Path::new("out/MATCH01.mpg")
        );
    }

    fn scratch_dir(name: &str) -> Result<PathBuf> {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../target/pavdec-tests")
            .join(name);
        fs::create_dir_all(&dir)?;
        Ok(fs::canonicalize(dir)?)
    }

    #[test]
    fn test_collect_inputs() -> Result<()> {
        let dir = scratch_dir("inputs")?;

        for name in ["B.PAV", "a.pav", "notes.txt"] {
            fs::write(dir.join(name), b"")?;
        }

        let dir_str = dir.to_string_lossy().into_owned();
        let files = collect_inputs(&[dir_str.clone(), format!("{}/B.PAV", dir_str)])?;

        assert_eq!(files, [dir.join("B.PAV"), dir.join("a.pav")]);
        Ok(())
    }

    #[test]
    fn test_same_file_listed_once() -> Result<()> {
        let dir = scratch_dir("spellings")?;
        fs::create_dir_all(dir.join("disc1"))?;
        fs::create_dir_all(dir.join("disc2"))?;
        fs::write(dir.join("disc1/INTRO.PAV"), b"")?;

        let files = collect_inputs(&[
            dir.join("disc1").to_string_lossy().into_owned(),
            dir.join("disc2/../disc1/INTRO.PAV")
                .to_string_lossy()
                .into_owned(),
        ])?;

        assert_eq!(files, [dir.join("disc1/INTRO.PAV")]);
        Ok(())
    }

    #[test]
    fn test_output_collision() -> Result<()> {
        let dir = scratch_dir("collision")?;

        for disc in ["disc1", "disc2"] {
            fs::create_dir_all(dir.join(disc))?;
            fs::write(dir.join(disc).join("INTRO.PAV"), b"")?;
        }

        let files = collect_inputs(&[
            dir.join("disc1").to_string_lossy().into_owned(),
            dir.join("disc2").to_string_lossy().into_owned(),
            dir.join("disc2/../disc1/INTRO.PAV")
                .to_string_lossy()
                .into_owned(),
        ])?;
        assert_eq!(files.len(), 2);

        let err = output_paths(&files, Path::new("out"), "mpg").unwrap_err();
        assert!(err.to_string().contains("INTRO.mpg"));

        let outputs = output_paths(&files[..1], Path::new("out"), "mpg")?;
        assert_eq!(outputs, [Path::new("out/INTRO.mpg")]);
        Ok(())
    }
}
