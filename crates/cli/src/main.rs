// Copyright (c) 2024 Mike Tsao

//! `crtone` renders a coordinated-reset stimulation session to a WAV file,
//! with a CSV log of the pattern choices alongside it.

use clap::Parser;
use crtone::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Sample rate in Hz (1000-44100)
    #[clap(short = 'r', long, value_parser)]
    sample_rate: Option<usize>,

    /// Peak amplitude of each tone burst (1-32767)
    #[clap(short = 'a', long, value_parser)]
    amplitude: Option<i16>,

    /// Timing jitter, in percent of a quarter CR period (0-23.5)
    #[clap(short = 'j', long, value_parser)]
    jitter: Option<f64>,

    /// Stimulation length in seconds, not counting the intro (1-14400)
    #[clap(short = 't', long, value_parser)]
    duration: Option<f64>,

    /// Output channels (4 or 6)
    #[clap(short = 'c', long, value_parser)]
    channels: Option<usize>,

    /// Declare the rear pair as side speakers instead of back speakers
    #[clap(short = 's', long, value_parser)]
    side: bool,

    /// Seconds of identification tone per channel before the pattern (0-30)
    #[clap(short = 'i', long, value_parser)]
    intro: Option<f64>,

    /// Seed for reproducible output
    #[clap(long, value_parser)]
    seed: Option<u64>,

    /// Read settings from a JSON file; other options override it
    #[clap(long, value_parser)]
    config: Option<PathBuf>,

    /// WAV file to write (default is derived from the settings)
    #[clap(short = 'o', long, value_parser)]
    output: Option<PathBuf>,

    /// CSV pattern log to write (default is next to the WAV file)
    #[clap(short = 'l', long, value_parser)]
    log: Option<PathBuf>,

    /// Don't write a pattern log
    #[clap(long, value_parser)]
    no_log: bool,

    /// Enable debug logging
    #[clap(short = 'd', long, value_parser)]
    debug: bool,

    /// Print version and exit
    #[clap(short = 'v', long, value_parser)]
    version: bool,
}
impl Args {
    /// Starts from the config file (or defaults) and applies every option the
    /// user gave explicitly.
    fn configuration(&self) -> anyhow::Result<Configuration> {
        let mut c = match &self.config {
            Some(path) => Configuration::from_json_file(path)?,
            None => Configuration::default(),
        };
        if let Some(sample_rate) = self.sample_rate {
            c.sample_rate = SampleRate::new(sample_rate);
        }
        if let Some(amplitude) = self.amplitude {
            c.amplitude = amplitude;
        }
        if let Some(jitter) = self.jitter {
            c.jitter = jitter / 100.0;
        }
        if let Some(duration) = self.duration {
            c.duration = Seconds(duration);
        }
        if let Some(channels) = self.channels {
            c.channel_count = channels;
        }
        if self.side {
            c.use_side_channels = true;
        }
        if let Some(intro) = self.intro {
            c.intro = Seconds(intro);
        }
        if self.seed.is_some() {
            c.seed = self.seed;
        }
        c.validate()?;
        Ok(c)
    }
}

/// Names the output after the settings that matter most when comparing
/// sessions, e.g. `vcr_4ch_44100Hz_7200s_j0.0.wav`.
fn default_output_path(c: &Configuration) -> PathBuf {
    PathBuf::from(format!(
        "vcr_{}ch_{}Hz_{}s_j{:.1}{}.wav",
        c.channel_count,
        c.sample_rate.0,
        c.duration.0,
        c.jitter * 100.0,
        if c.intro.0 > 0.0 {
            format!("_intro{}s", c.intro.0)
        } else {
            String::default()
        }
    ))
}

fn print_status(c: &Configuration, wav_path: &Path, log_path: Option<&Path>) {
    eprintln!("crtone {}", crtone::app_version());
    eprintln!("  output:      {}", wav_path.display());
    if let Some(log_path) = log_path {
        eprintln!("  pattern log: {}", log_path.display());
    }
    eprintln!(
        "  {} channels ({}), {} Hz, amplitude {}",
        c.channel_count,
        if c.use_side_channels { "side" } else { "back" },
        c.sample_rate.0,
        c.amplitude
    );
    eprintln!(
        "  {} s at {} Hz CR, jitter {:.1}%, intro {} s per channel",
        c.duration.0,
        c.cr_frequency.0,
        c.jitter * 100.0,
        c.intro.0
    );
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.version {
        println!("{}", crtone::app_version());
        return Ok(());
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if args.debug { "debug" } else { "info" },
    ))
    .init();

    let configuration = match args.configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    let wav_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&configuration));
    let log_path = if args.no_log {
        None
    } else {
        Some(
            args.log
                .clone()
                .unwrap_or_else(|| wav_path.with_extension("csv")),
        )
    };
    if log_path.as_deref() == Some(wav_path.as_path()) {
        anyhow::bail!("pattern log would overwrite {}", wav_path.display());
    }
    print_status(&configuration, &wav_path, log_path.as_deref());

    let session = Session::new_with(configuration)?;
    let summary = session.render_to_path(&wav_path, log_path.as_deref())?;
    eprintln!(
        "Done: {} frames ({:.1} s) in {} phrases",
        summary.frames_written,
        summary.duration().0,
        summary.phrases
    );
    Ok(())
}
