//! Container encoding.
//!
//! WAV is written with `hound`. MP3 is produced by streaming raw 16-bit PCM
//! into the LAME encoder (`lame`), which also embeds ID3 title/artist tags.
//!
//! Output is written to a temporary file next to the destination and renamed
//! into place only once encoding has succeeded, so a failed export never
//! leaves a partial file behind.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};

use tempfile::NamedTempFile;

use crate::audio::AudioBuffer;
use crate::config::ExportConfig;
use crate::error::AudiobookError;

/// Output container, chosen from the output file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Wav,
    Mp3,
}

impl OutputFormat {
    /// `.mp3` (any case) selects MP3; everything else is WAV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("mp3") => OutputFormat::Mp3,
            _ => OutputFormat::Wav,
        }
    }
}

/// Optional tags embedded in lossy output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none()
    }

    fn lame_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(title) = &self.title {
            args.push("--tt".to_string());
            args.push(title.clone());
        }
        if let Some(artist) = &self.artist {
            args.push("--ta".to_string());
            args.push(artist.clone());
        }
        args
    }
}

/// Directory the output file will be created in.
pub fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Encode `buffer` to `path`, picking the container from the extension.
///
/// `metadata` only applies to MP3 output; WAV files carry no tags.
pub fn export(
    buffer: &AudioBuffer,
    path: &Path,
    metadata: Option<&Metadata>,
    config: &ExportConfig,
) -> Result<(), AudiobookError> {
    let mut temp = temp_output(output_dir(path))?;

    match OutputFormat::from_path(path) {
        OutputFormat::Wav => {
            log::info!("Writing WAV ({:.1}s)", buffer.duration().as_secs_f64());
            write_wav(buffer, BufWriter::new(temp.as_file_mut()))?;
        }
        OutputFormat::Mp3 => {
            log::info!("Encoding MP3 ({:.1}s)", buffer.duration().as_secs_f64());
            let metadata = metadata.filter(|m| !m.is_empty());
            encode_mp3(buffer, temp.path(), metadata, config)?;
        }
    }

    temp.persist(path)?;
    Ok(())
}

/// Temporary sibling of the output, created with the same permissions as
/// any new file (`0o666` minus the umask) rather than tempfile's `0o600`.
fn temp_output(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".audiobook-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_wav<W>(buffer: &AudioBuffer, writer: W) -> Result<(), AudiobookError>
where
    W: Write + std::io::Seek,
{
    let mut writer = hound::WavWriter::new(writer, wav_spec(buffer.sample_rate()))?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// `lame -s` takes the input rate in kHz.
fn sample_rate_khz(sample_rate: u32) -> String {
    (sample_rate as f64 / 1000.0).to_string()
}

fn encode_mp3(
    buffer: &AudioBuffer,
    out_path: &Path,
    metadata: Option<&Metadata>,
    config: &ExportConfig,
) -> Result<(), AudiobookError> {
    let lame: PathBuf = config
        .lame_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("lame"));

    let mut command = Command::new(&lame);
    command
        .args(["--quiet", "-r", "--signed", "--bitwidth", "16", "--little-endian", "-m", "m"])
        .arg("-s")
        .arg(sample_rate_khz(buffer.sample_rate()))
        .arg("-b")
        .arg(config.mp3_bitrate_kbps.to_string());
    if let Some(metadata) = metadata {
        command.arg("--add-id3v2").args(metadata.lame_args());
    }
    command.arg("-").arg(out_path);

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AudiobookError::EncoderNotFound(lame.display().to_string())
            } else {
                AudiobookError::Io(e)
            }
        })?;

    let fed = match child.stdin.take() {
        Some(stdin) => feed_pcm(stdin, buffer.samples()),
        None => Ok(()),
    };

    // The encoder's own report wins over a broken pipe on our side.
    let output = child.wait_with_output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AudiobookError::Encoder(format!(
            "{} exited with code {:?}: {}",
            lame.display(),
            output.status.code(),
            stderr.trim()
        )));
    }
    fed?;

    Ok(())
}

/// Stream little-endian samples to the encoder, closing its stdin when done.
fn feed_pcm(stdin: ChildStdin, samples: &[i16]) -> io::Result<()> {
    let mut writer = BufWriter::new(stdin);
    for sample in samples {
        writer.write_all(&sample.to_le_bytes())?;
    }
    writer.flush()
}
