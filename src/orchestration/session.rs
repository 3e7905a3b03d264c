// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use anyhow::Context;
use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::Path,
};

/// What a finished render produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderSummary {
    /// The frame count the header declared before rendering began.
    pub declared_frames: u64,
    /// The frame count actually written, and finally declared.
    pub frames_written: u64,
    /// Phrases rendered, not counting the intro.
    pub phrases: usize,
    /// Rows written to the pattern log.
    pub log_rows: usize,
    /// Frames per second.
    pub sample_rate: SampleRate,
}
impl RenderSummary {
    /// The rendered audio's length.
    pub fn duration(&self) -> Seconds {
        self.sample_rate.seconds_of(self.frames_written as usize)
    }
}

/// Renders one stimulation session: header, intro, phrases, and the final
/// header fix-up.
#[derive(Clone, Debug, Default)]
pub struct Session {
    configuration: Configuration,
}
impl Session {
    /// Checks the configuration and prepares a session for it.
    pub fn new_with(configuration: Configuration) -> Result<Self, ConfigurationError> {
        configuration.validate()?;
        Ok(Self { configuration })
    }

    /// The session's configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Renders with the random source the configuration asks for: seeded if
    /// it names a seed, otherwise seeded from the OS.
    pub fn render<W: Write + Seek, L: Write>(
        &self,
        sink: W,
        log_sink: L,
    ) -> anyhow::Result<RenderSummary> {
        let source = match self.configuration.seed {
            Some(seed) => Rng::new_with_seed(seed as u128),
            None => Rng::default(),
        };
        self.render_with_source(source, sink, log_sink)
    }

    /// Renders using the given random source.
    pub fn render_with_source<S: PatternSource, W: Write + Seek, L: Write>(
        &self,
        source: S,
        sink: W,
        log_sink: L,
    ) -> anyhow::Result<RenderSummary> {
        let c = &self.configuration;
        let descriptor = WavHeaderDescriptor::new_with(c);
        log::info!(
            "rendering {} s of {}-channel CR stimulation at {} Hz, jitter {:.1}%, intro {} s",
            c.duration.0,
            c.channel_count,
            c.sample_rate.0,
            c.jitter * 100.0,
            c.intro.0
        );

        let mut writer = WavWriter::new(sink, descriptor)?;
        let mut pattern_log =
            PatternLog::new(log_sink).context("couldn't write pattern log header")?;
        let mut scheduler = PatternScheduler::new_with(c, source);
        let frames_written = scheduler.run(&mut writer, &mut pattern_log)?;
        writer.finalize()?;
        let log_rows = pattern_log.rows();
        pattern_log
            .into_inner()
            .context("couldn't flush pattern log")?;

        let summary = RenderSummary {
            declared_frames: descriptor.frame_count,
            frames_written,
            phrases: scheduler.cycle(),
            log_rows,
            sample_rate: c.sample_rate,
        };
        log::info!(
            "wrote {} frames ({:.1} s) in {} phrases",
            summary.frames_written,
            summary.duration().0,
            summary.phrases
        );
        Ok(summary)
    }

    /// Renders to a WAV file, and to a CSV pattern log if `log_path` is given.
    pub fn render_to_path(
        &self,
        wav_path: &Path,
        log_path: Option<&Path>,
    ) -> anyhow::Result<RenderSummary> {
        let wav = File::create(wav_path)
            .with_context(|| format!("couldn't create {}", wav_path.display()))?;
        let log_sink: Box<dyn Write> = match log_path {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("couldn't create {}", path.display()))?,
            )),
            None => Box::new(std::io::sink()),
        };
        self.render(BufWriter::new(wav), log_sink)
            .with_context(|| format!("while rendering {}", wav_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, SeekFrom};

    /// A seekable sink that runs out of room after `capacity` bytes and
    /// counts any writes attempted once it has.
    #[derive(Debug, Default)]
    struct FullDisk {
        inner: Cursor<Vec<u8>>,
        capacity: usize,
        failed: bool,
        writes_after_failure: usize,
    }
    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failed {
                self.writes_after_failure += 1;
            }
            if self.inner.get_ref().len() + buf.len() > self.capacity {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }
    impl Seek for FullDisk {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn invalid_configurations_never_render() {
        let c = Configuration {
            channel_count: 5,
            ..Default::default()
        };
        assert_eq!(
            Session::new_with(c).err(),
            Some(ConfigurationError::ChannelCount(5))
        );
    }

    #[test]
    fn summary_reports_declared_and_written_frames() {
        let c = ConfigurationBuilder::default()
            .sample_rate(SampleRate::new(8000))
            .duration(Seconds(11.0))
            .seed(Some(9))
            .build()
            .unwrap();
        let session = Session::new_with(c).unwrap();
        let summary = session
            .render(Cursor::new(Vec::new()), std::io::sink())
            .unwrap();

        // round(11 / 3.33) = 3 phrases declared, but the clock only stops
        // once it reaches 11 s, which takes 4.
        assert_eq!(summary.declared_frames, 80000);
        assert_eq!(summary.phrases, 4);
        // 800-frame tones, 533-frame gaps, 5333-frame silent bars.
        assert_eq!(summary.frames_written, 4 * (3 * 4 * (800 + 533) + 2 * 5333));
        assert_eq!(summary.log_rows, 20);
    }

    #[test]
    fn sink_failure_ends_the_run() {
        let c = ConfigurationBuilder::default()
            .sample_rate(SampleRate::new(8000))
            .duration(Seconds(20.0))
            .seed(Some(9))
            .build()
            .unwrap();
        let session = Session::new_with(c).unwrap();
        // Room for the header but not for the first phrase.
        let mut sink = FullDisk {
            capacity: 200_000,
            ..Default::default()
        };
        let mut log = Vec::new();

        let e = session.render(&mut sink, &mut log).unwrap_err();
        assert!(matches!(
            e.downcast_ref::<RenderError>(),
            Some(RenderError::Io(_))
        ));
        assert!(sink.failed);
        assert_eq!(sink.writes_after_failure, 0);
        assert_eq!(sink.inner.get_ref().len(), 68);

        // Only the first phrase was logged before the failed drain.
        let log = String::from_utf8(log).unwrap();
        assert_eq!(log.lines().count(), 1 + 5);
    }
}
