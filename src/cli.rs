use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pitchshift::analysis::{dominant_frequency, WaveformPeaks};
use pitchshift::{AudioBuffer, ShiftParams, WindowType};

const DEBUG_FFT_SIZE: usize = 8192;
const DEBUG_WAVEFORM_COLUMNS: usize = 72;
const DEBUG_WAVEFORM_ROWS: usize = 15;

/// Shift the pitch of a WAV file without changing its duration.
#[derive(Debug, Parser)]
#[command(name = "pitch-shifter", version)]
struct Args {
    /// Input WAV file
    #[arg(short, long)]
    source: PathBuf,

    /// Output WAV file (mono, same sample rate and bit depth)
    #[arg(short, long)]
    out: PathBuf,

    /// Shift in semitones; negative lowers the pitch
    #[arg(short, long, allow_negative_numbers = true)]
    pitch: Option<i32>,

    /// Wet/dry mix, 1.0 = fully shifted, 0.0 = original
    #[arg(short, long, allow_negative_numbers = true)]
    blend: Option<f64>,

    /// STFT frame length in samples
    #[arg(short, long)]
    chunk_size: Option<usize>,

    /// Fraction of each frame shared with the next
    #[arg(short = 'e', long)]
    overlap: Option<f64>,

    /// Verbose logging plus a waveform and frequency report of the result
    #[arg(short, long)]
    debug: bool,

    /// Keep the time-stretched output instead of resampling to the source length
    #[arg(long)]
    no_resample: bool,

    /// Channel of a multi-channel source to process
    #[arg(long)]
    channel: Option<usize>,

    /// Analysis window: hann or blackman-harris
    #[arg(long, value_parser = parse_window_str)]
    window: Option<WindowType>,

    /// JSON parameter preset; explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn params(&self) -> Result<ShiftParams, pitchshift::PitchShiftError> {
        let mut params = match &self.config {
            Some(path) => ShiftParams::from_json_file(path)?,
            None => ShiftParams::default(),
        };
        if let Some(p) = self.pitch {
            params.pitch_semitones = p;
        }
        if let Some(b) = self.blend {
            params.blend = b;
        }
        if let Some(c) = self.chunk_size {
            params.chunk_size = c;
        }
        if let Some(e) = self.overlap {
            params.overlap = e;
        }
        if let Some(ch) = self.channel {
            params.channel = ch;
        }
        if let Some(w) = self.window {
            params.window = w;
        }
        if self.no_resample {
            params.resample = false;
        }
        params.validate()?;
        Ok(params)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let params = match args.params() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("ERROR: Invalid parameters: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let buffer = match pitchshift::io::wav::read_wav_file(&args.source) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("ERROR: Failed to read {}: {}", args.source.display(), e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Input: {} frames, {} Hz, {} ch, {}-bit, {:.2}s",
        buffer.num_frames(),
        buffer.sample_rate,
        buffer.channels,
        buffer.bits_per_sample,
        buffer.duration_secs()
    );
    log::debug!("Parameters: {}", params);

    let start = std::time::Instant::now();
    let output = match pitchshift::pitch_shift_buffer(&buffer, &params) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("ERROR: Pitch shifting failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();

    eprintln!(
        "Output: {} frames, {:.2}s ({:+} semitones, ratio {:.4})",
        output.num_frames(),
        output.duration_secs(),
        params.pitch_semitones,
        params.pitch_ratio()
    );
    log::debug!("Processing time: {:.3}s", elapsed.as_secs_f64());

    if let Err(e) = pitchshift::io::wav::write_wav_file(&args.out, &output) {
        eprintln!("ERROR: Failed to write {}: {}", args.out.display(), e);
        return ExitCode::FAILURE;
    }
    eprintln!("Written to {}", args.out.display());

    if args.debug {
        print_report(&output);
    }

    ExitCode::SUCCESS
}

fn print_report(output: &AudioBuffer) {
    let samples: Vec<f64> = output.data.iter().map(|&s| s as f64).collect();
    let peaks = WaveformPeaks::compute(&samples, DEBUG_WAVEFORM_COLUMNS);
    eprintln!("{}", peaks.render_ascii(DEBUG_WAVEFORM_ROWS));

    let freq = dominant_frequency(&samples, output.sample_rate, DEBUG_FFT_SIZE);
    if freq > 0.0 {
        eprintln!("Dominant frequency: {:.1} Hz", freq);
    } else {
        eprintln!("Dominant frequency: n/a (output shorter than {} samples or silent)", DEBUG_FFT_SIZE);
    }
}

fn parse_window_str(s: &str) -> Result<WindowType, String> {
    WindowType::from_name(s).ok_or_else(|| {
        format!("unknown window type '{}' (use hann or blackman-harris)", s)
    })
}
