//! rodio adapter
//!
//! Exposes an `AudioStream` as a `rodio::Source` of interleaved `i16`
//! samples, so the stream can be appended to a `rodio::Sink`.

use std::io::Read;
use std::time::Duration;

use rodio::Source;

use super::decoder::DecodeError;
use super::formats::WAV_HEADER_SIZE;
use super::stream::AudioStream;

const READ_CHUNK: usize = 0x1000;

/// Sample iterator over an [`AudioStream`]
pub struct StreamSource<R: Read> {
    stream: AudioStream<R>,
    channels: u16,
    sample_rate: u32,
    total_duration: Option<Duration>,
    loop_start: Option<Duration>,
    buf: Vec<u8>,
    buf_ofs: usize,
    buf_len: usize,
    error: Option<DecodeError>,
}

impl<R: Read> StreamSource<R> {
    /// Wrap `stream`. A synthetic WAV header, if enabled, is skipped.
    pub fn new(mut stream: AudioStream<R>) -> Result<Self, DecodeError> {
        if stream.has_wav_header() {
            let mut skip = [0u8; WAV_HEADER_SIZE];
            let mut skipped = 0;
            while skipped < WAV_HEADER_SIZE {
                let n = stream.read(&mut skip[skipped..])?;
                if n == 0 {
                    break;
                }
                skipped += n;
            }
        }

        let header = stream.header();
        let channels = u16::from(header.channels);
        let sample_rate = header.sample_rate().max(0) as u32;
        let total_duration = Duration::try_from_secs_f64(header.length_seconds()).ok();
        let loop_start = if header.looped() {
            Duration::try_from_secs_f64(header.loop_start_seconds()).ok()
        } else {
            None
        };

        Ok(Self {
            stream,
            channels,
            sample_rate,
            total_duration,
            loop_start,
            buf: vec![0u8; READ_CHUNK],
            buf_ofs: 0,
            buf_len: 0,
            error: None,
        })
    }

    /// Where playback should resume when looping, if the track loops
    pub fn loop_start(&self) -> Option<Duration> {
        self.loop_start
    }

    /// The error that ended iteration early, if any
    pub fn take_error(&mut self) -> Option<DecodeError> {
        self.error.take()
    }

    fn refill(&mut self) -> bool {
        // Keep a dangling odd byte at the front.
        self.buf.copy_within(self.buf_ofs..self.buf_len, 0);
        self.buf_len -= self.buf_ofs;
        self.buf_ofs = 0;

        match self.stream.read(&mut self.buf[self.buf_len..]) {
            Ok(0) => false,
            Ok(n) => {
                self.buf_len += n;
                true
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }
}

impl<R: Read> Iterator for StreamSource<R> {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        while self.buf_len - self.buf_ofs < 2 {
            if self.error.is_some() || !self.refill() {
                return None;
            }
        }
        let sample = i16::from_le_bytes([self.buf[self.buf_ofs], self.buf[self.buf_ofs + 1]]);
        self.buf_ofs += 2;
        Some(sample)
    }
}

impl<R: Read> Source for StreamSource<R> {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        self.total_duration
    }
}
